//! JSON:API and plain-text rendering of shortcode documents.

use serde_json::{Map, Value, json};

use super::constants::{
    ATTR_DESTINATION, ATTR_NAME, ATTR_QR_CODE, ATTR_SSL, SHORTCODE_TYPE, SUGGESTION_TYPE,
};
use super::negotiation::Format;
use crate::errors::{Result, ShortcoderError};
use crate::qr;
use crate::storage::Shortcode;

/// Attribute selection requested through `fields[shortcodes]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fieldset(Option<Vec<String>>);

impl Fieldset {
    /// Every attribute.
    pub fn all() -> Self {
        Self(None)
    }

    /// `name,destination` → those two. An empty value selects nothing.
    pub fn parse(raw: Option<&str>) -> Self {
        Self(raw.map(|list| {
            list.split(',')
                .map(|f| f.trim().to_ascii_lowercase())
                .filter(|f| !f.is_empty())
                .collect()
        }))
    }

    pub fn includes(&self, attribute: &str) -> bool {
        match &self.0 {
            None => true,
            Some(fields) => fields.iter().any(|f| f == attribute),
        }
    }
}

/// What a response body describes.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Shortcode(&'a Shortcode),
    Shortcodes(&'a [Shortcode]),
    Suggestion(&'a str),
    /// Bare `meta` document carrying a message.
    Meta(&'a str),
}

#[derive(Debug, Clone)]
pub struct ResourceSerializer {
    service_base_url: String,
    qr_options: qr::SvgOptions,
}

impl ResourceSerializer {
    pub fn new(service_base_url: impl Into<String>) -> Self {
        Self {
            service_base_url: service_base_url.into(),
            qr_options: qr::SvgOptions::default(),
        }
    }

    pub fn with_qr_options(mut self, options: qr::SvgOptions) -> Self {
        self.qr_options = options;
        self
    }

    pub fn generated_link(&self, name: &str) -> String {
        format!("{}/{}", self.service_base_url.trim_end_matches('/'), name)
    }

    pub fn render(&self, document: Document<'_>, fields: &Fieldset, format: Format) -> Result<String> {
        match format {
            Format::JsonApi => Ok(self.to_json(document, fields)?.to_string()),
            Format::Html => Ok(self.to_plain(document)),
        }
    }

    pub fn to_json(&self, document: Document<'_>, fields: &Fieldset) -> Result<Value> {
        let value = match document {
            Document::Shortcode(shortcode) => json!({ "data": self.resource(shortcode, fields)? }),
            Document::Shortcodes(shortcodes) => {
                let data = shortcodes
                    .iter()
                    .map(|s| self.resource(s, fields))
                    .collect::<Result<Vec<_>>>()?;
                json!({ "data": data })
            }
            Document::Suggestion(name) => json!({
                "data": {
                    "type": SUGGESTION_TYPE,
                    "id": name,
                    "attributes": { ATTR_NAME: name },
                    "meta": { "generated_link": self.generated_link(name) },
                }
            }),
            Document::Meta(message) => json!({ "meta": { "message": message } }),
        };
        Ok(value)
    }

    fn resource(&self, shortcode: &Shortcode, fields: &Fieldset) -> Result<Value> {
        let link = self.generated_link(&shortcode.name);

        let mut attributes = Map::new();
        if fields.includes(ATTR_NAME) {
            attributes.insert(ATTR_NAME.into(), Value::from(shortcode.name.as_str()));
        }
        if fields.includes(ATTR_DESTINATION) {
            attributes.insert(
                ATTR_DESTINATION.into(),
                Value::from(shortcode.destination.as_str()),
            );
        }
        if fields.includes(ATTR_SSL) {
            attributes.insert(ATTR_SSL.into(), Value::from(shortcode.ssl));
        }
        // rendering is the expensive part, skip it unless asked for
        if fields.includes(ATTR_QR_CODE) {
            let svg = qr::generate_with(&link, &self.qr_options)?;
            attributes.insert(ATTR_QR_CODE.into(), Value::from(svg));
        }

        Ok(json!({
            "type": SHORTCODE_TYPE,
            "id": shortcode.name,
            "attributes": attributes,
            "meta": {
                "generated_link": link,
                "access_count": shortcode.access_count,
            },
        }))
    }

    fn to_plain(&self, document: Document<'_>) -> String {
        match document {
            Document::Shortcode(shortcode) => plain_line(shortcode),
            Document::Shortcodes(shortcodes) => shortcodes
                .iter()
                .map(plain_line)
                .collect::<Vec<_>>()
                .join("\n"),
            Document::Suggestion(name) => name.to_string(),
            Document::Meta(message) => message.to_string(),
        }
    }
}

fn plain_line(shortcode: &Shortcode) -> String {
    format!("{} -> {}", shortcode.name, shortcode.destination)
}

/// `{"errors": [...]}` document for an error. Faults only expose their
/// summary message.
pub fn error_document(err: &ShortcoderError) -> Value {
    let status = err.http_status();
    json!({
        "errors": [{
            "status": status.as_str(),
            "title": status.canonical_reason().unwrap_or("Error"),
            "message": err.message(),
        }]
    })
}

pub fn render_error(err: &ShortcoderError, format: Format) -> String {
    match format {
        Format::JsonApi => error_document(err).to_string(),
        Format::Html => err.message().to_string(),
    }
}
