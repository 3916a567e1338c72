//! Content negotiation between the JSON:API and plain representations.

use super::constants::{HTML_MEDIA_TYPE, JSON_API_MEDIA_TYPE, JSON_MEDIA_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    JsonApi,
    Html,
}

impl Format {
    pub fn content_type(self) -> &'static str {
        match self {
            Format::JsonApi => JSON_API_MEDIA_TYPE,
            Format::Html => HTML_MEDIA_TYPE,
        }
    }

    /// Format forced by a path extension. `xml` has no representation of
    /// its own and leaves negotiation to the `Accept` header.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Format::JsonApi),
            "html" | "txt" => Some(Format::Html),
            _ => None,
        }
    }

    fn for_media_range(range: &str) -> Option<Self> {
        match range {
            JSON_API_MEDIA_TYPE | JSON_MEDIA_TYPE | "application/*" | "*/*" => Some(Format::JsonApi),
            "text/html" | "text/plain" | "text/*" => Some(Format::Html),
            _ => None,
        }
    }
}

/// Picks the representation for an `Accept` header.
///
/// Ranges are tried by descending `q` (document order on ties); `q=0`
/// ranges are skipped. A missing or empty header selects JSON:API, a header
/// that names nothing we serve selects the plain representation.
pub fn negotiate(accept: Option<&str>) -> Format {
    let Some(accept) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
        return Format::JsonApi;
    };

    let mut ranges: Vec<(String, f32)> = accept
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let range = pieces.next()?.trim().to_ascii_lowercase();
            if range.is_empty() {
                return None;
            }
            let quality = pieces
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((range, quality))
        })
        .filter(|(_, quality)| *quality > 0.0)
        .collect();

    // stable sort keeps document order for equal weights
    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranges
        .iter()
        .find_map(|(range, _)| Format::for_media_range(range))
        .unwrap_or(Format::Html)
}
