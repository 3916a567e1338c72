use serde::{Deserialize, Serialize};

/// A persisted shortcode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcode {
    pub name: String,
    pub destination: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub access_count: u64,
}

impl Shortcode {
    /// Builds a fresh record. The name is normalized so every record in a
    /// store is keyed by its lowercase form.
    pub fn new(name: &str, destination: impl Into<String>, ssl: bool) -> Self {
        Self {
            name: normalize_name(name),
            destination: destination.into(),
            ssl,
            access_count: 0,
        }
    }
}

/// Shortcode names are case-insensitive.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_name() {
        let shortcode = Shortcode::new(" AbC123 ", "http://x.io", true);
        assert_eq!(shortcode.name, "abc123");
        assert_eq!(shortcode.access_count, 0);
        assert!(shortcode.ssl);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let shortcode: Shortcode =
            serde_json::from_str(r#"{"name":"abc","destination":"www.yahoo.com"}"#)
                .expect("record should deserialize");
        assert!(!shortcode.ssl);
        assert_eq!(shortcode.access_count, 0);
    }
}
