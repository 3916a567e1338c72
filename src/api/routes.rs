//! Path normalization
//!
//! Anything in front of the last `shortcodes`/`suggestion` segment is
//! ignored, so the service can sit behind arbitrary stage or mount
//! prefixes. A format extension on the last segment is stripped and
//! reported separately.

use std::borrow::Cow;

use super::constants::{FORMAT_EXTENSIONS, SHORTCODES_SEGMENT, SUGGESTION_SEGMENT};
use super::negotiation::Format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Suggestion,
    Shortcodes,
    /// Member route; the code is lowercased.
    Shortcode(String),
    Unknown,
}

impl Route {
    /// Methods the route answers, in the form CORS headers advertise them.
    pub fn allowed_methods(&self) -> Option<&'static str> {
        match self {
            Route::Suggestion | Route::Shortcodes => Some("GET,OPTIONS"),
            Route::Shortcode(_) => Some("HEAD,OPTIONS"),
            Route::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub route: Route,
    /// Format forced by the extension, if it maps to one.
    pub format: Option<Format>,
}

pub fn resolve(path: &str) -> ResolvedPath {
    let mut segments: Vec<Cow<'_, str>> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).unwrap_or(Cow::Borrowed(s)))
        .collect();

    let mut format = None;
    if let Some(last) = segments.last_mut()
        && let Some((stem, extension)) = split_extension(last)
    {
        format = Format::from_extension(&extension);
        *last = Cow::Owned(stem);
    }

    let anchor = segments
        .iter()
        .rposition(|s| s == SHORTCODES_SEGMENT || s == SUGGESTION_SEGMENT);

    let route = match anchor {
        None => Route::Unknown,
        Some(index) => {
            let rest = &segments[index + 1..];
            match (segments[index].as_ref(), rest) {
                (SUGGESTION_SEGMENT, []) => Route::Suggestion,
                (SHORTCODES_SEGMENT, []) => Route::Shortcodes,
                (SHORTCODES_SEGMENT, [code]) => Route::Shortcode(code.to_lowercase()),
                _ => Route::Unknown,
            }
        }
    };

    ResolvedPath { route, format }
}

/// `abc.json` → (`abc`, `json`); only known format extensions count.
pub fn split_extension(segment: &str) -> Option<(String, String)> {
    let (stem, extension) = segment.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    if stem.is_empty() || !FORMAT_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    Some((stem.to_string(), extension))
}
