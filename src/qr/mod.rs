//! QR code rendering
//!
//! Matrix encoding is delegated to the `qrcode` crate; this module only turns
//! a module grid into self-contained SVG markup.

use std::fmt::Write as _;

use qrcode::{Color, QrCode};

use crate::config::QrConfig;
use crate::errors::Result;

/// A square grid of dark/light modules.
pub trait QrMatrix {
    fn module_count(&self) -> usize;
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

impl QrMatrix for QrCode {
    fn module_count(&self) -> usize {
        self.width()
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        // qrcode indexes by (x, y)
        self[(col, row)] == Color::Dark
    }
}

/// Rendering options for [`render_svg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOptions {
    /// Quiet zone around the symbol, in pixels.
    pub offset: usize,
    /// Foreground colour.
    pub color: String,
    /// Background colour; no background rect is emitted when unset.
    pub fill: Option<String>,
    /// Pixel size of one module.
    pub module_size: usize,
    pub shape_rendering: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            color: "#000000".to_string(),
            fill: None,
            module_size: 11,
            shape_rendering: "crispEdges".to_string(),
        }
    }
}

impl From<&QrConfig> for SvgOptions {
    fn from(config: &QrConfig) -> Self {
        Self {
            offset: config.offset,
            color: config.color.clone(),
            fill: config.fill.clone(),
            module_size: config.module_size,
            shape_rendering: config.shape_rendering.clone(),
        }
    }
}

/// Side length of the rendered canvas.
pub fn dimension(matrix: &impl QrMatrix, options: &SvgOptions) -> usize {
    matrix.module_count() * options.module_size + 2 * options.offset
}

/// Renders one `<rect>` per dark module, one line per matrix row.
pub fn render_svg(matrix: &impl QrMatrix, options: &SvgOptions) -> String {
    let size = options.module_size;
    let dimension = dimension(matrix, options);
    let color = css_color(&options.color);

    let mut lines = Vec::with_capacity(matrix.module_count() + 4);
    lines.push(r#"<?xml version="1.0" standalone="yes"?>"#.to_string());
    lines.push(format!(
        r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="{d}" height="{d}" shape-rendering="{sr}" viewBox="0 0 {d} {d}">"#,
        d = dimension,
        sr = options.shape_rendering
    ));

    if let Some(fill) = &options.fill {
        lines.push(format!(
            r#"<rect width="{d}" height="{d}" x="0" y="0" style="fill:{fill}"/>"#,
            d = dimension,
            fill = css_color(fill)
        ));
    }

    for row in 0..matrix.module_count() {
        let mut line = String::new();
        for col in 0..matrix.module_count() {
            if !matrix.is_dark(row, col) {
                continue;
            }
            let _ = write!(
                line,
                r#"<rect width="{size}" height="{size}" x="{x}" y="{y}" style="fill:{color}"/>"#,
                x = col * size + options.offset,
                y = row * size + options.offset,
            );
        }
        lines.push(line);
    }

    lines.push("</svg>".to_string());
    lines.join("\n")
}

/// Encodes `url` and renders it with the default options.
pub fn generate(url: &str) -> Result<String> {
    generate_with(url, &SvgOptions::default())
}

pub fn generate_with(url: &str, options: &SvgOptions) -> Result<String> {
    let code = QrCode::new(url.as_bytes())?;
    Ok(render_svg(&code, options))
}

/// Bare hex colours (`000`, `ffffff`) get a leading `#`; anything else is
/// passed through as a CSS colour.
fn css_color(color: &str) -> String {
    let is_bare_hex = matches!(color.len(), 3 | 6) && color.chars().all(|c| c.is_ascii_hexdigit());
    if is_bare_hex {
        format!("#{}", color)
    } else {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid(Vec<Vec<bool>>);

    impl QrMatrix for Grid {
        fn module_count(&self) -> usize {
            self.0.len()
        }

        fn is_dark(&self, row: usize, col: usize) -> bool {
            self.0[row][col]
        }
    }

    fn diagonal() -> Grid {
        Grid(vec![vec![true, false], vec![false, true]])
    }

    #[test]
    fn test_rect_positions_follow_row_and_column() {
        let svg = render_svg(&diagonal(), &SvgOptions::default());
        let lines: Vec<&str> = svg.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[2],
            r#"<rect width="11" height="11" x="0" y="0" style="fill:#000000"/>"#
        );
        assert_eq!(
            lines[3],
            r#"<rect width="11" height="11" x="11" y="11" style="fill:#000000"/>"#
        );
        assert_eq!(lines[4], "</svg>");
    }

    #[test]
    fn test_light_modules_emit_nothing() {
        let grid = Grid(vec![vec![false, false], vec![false, true]]);
        let svg = render_svg(&grid, &SvgOptions::default());
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(r#"x="11" y="11""#));
    }

    #[test]
    fn test_offset_and_module_size_shape_the_canvas() {
        let options = SvgOptions {
            offset: 4,
            module_size: 3,
            ..SvgOptions::default()
        };
        assert_eq!(dimension(&diagonal(), &options), 14);
        let svg = render_svg(&diagonal(), &options);
        assert!(svg.contains(r#"width="14" height="14""#));
        assert!(svg.contains(r#"viewBox="0 0 14 14""#));
        assert!(svg.contains(r#"x="7" y="7""#));
    }

    #[test]
    fn test_background_only_when_fill_set() {
        let plain = render_svg(&diagonal(), &SvgOptions::default());
        assert_eq!(plain.lines().count(), 5);

        let options = SvgOptions {
            fill: Some("fff".to_string()),
            color: "000".to_string(),
            ..SvgOptions::default()
        };
        let filled = render_svg(&diagonal(), &options);
        let lines: Vec<&str> = filled.lines().collect();
        assert_eq!(
            lines[2],
            r#"<rect width="22" height="22" x="0" y="0" style="fill:#fff"/>"#
        );
        assert!(filled.contains("fill:#000\""));
    }

    #[test]
    fn test_shape_rendering_hint() {
        let svg = render_svg(&diagonal(), &SvgOptions::default());
        assert!(svg.contains(r#"shape-rendering="crispEdges""#));
        assert!(svg.starts_with("<?xml"));
        assert!(!svg.contains("href"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate("http://change.me/abc123").unwrap();
        let b = generate("http://change.me/abc123").unwrap();
        assert_eq!(a, b);
        let c = generate("http://change.me/abc124").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_canvas_matches_symbol_width() {
        let url = "http://change.me/abc123";
        let code = QrCode::new(url.as_bytes()).unwrap();
        let expected = code.width() * 11;
        let svg = generate(url).unwrap();
        assert!(svg.contains(&format!(r#"width="{0}" height="{0}""#, expected)));
    }
}
