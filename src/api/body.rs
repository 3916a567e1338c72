//! Request body parsing for the write operations.
//!
//! JSON bodies may be JSON:API documents (`data.attributes`) or a bare
//! attribute object. Anything else is read as a form.

use serde_json::{Map, Value};

use super::constants::{ATTR_DESTINATION, ATTR_NAME, ATTR_SSL};
use crate::errors::{Result, ShortcoderError};

/// Attributes a client may send when creating or updating a shortcode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeParams {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub ssl: Option<bool>,
}

impl ShortcodeParams {
    /// Destination with surrounding whitespace removed; `None` when blank.
    pub fn destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

pub fn parse_params(content_type: Option<&str>, body: &[u8]) -> Result<ShortcodeParams> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ShortcodeParams::default());
    }

    let is_json = match content_type {
        Some(ct) => media_type(ct).ends_with("json"),
        // no declared type: sniff
        None => body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{'),
    };

    if is_json {
        parse_json(body)
    } else {
        parse_form(body)
    }
}

fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn parse_json(body: &[u8]) -> Result<ShortcodeParams> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| ShortcoderError::validation(format!("Malformed JSON body: {}", e)))?;

    let Value::Object(root) = document else {
        return Err(ShortcoderError::validation(
            "Request body must be a JSON object",
        ));
    };

    let attributes = match root.get("data").and_then(|d| d.get("attributes")) {
        Some(Value::Object(attributes)) => attributes,
        Some(_) => {
            return Err(ShortcoderError::validation(
                "data.attributes must be a JSON object",
            ));
        }
        None => &root,
    };

    Ok(ShortcodeParams {
        name: string_attribute(attributes, ATTR_NAME)?,
        destination: string_attribute(attributes, ATTR_DESTINATION)?,
        ssl: match attributes.get(ATTR_SSL) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::String(raw)) => Some(parse_flag(raw)?),
            Some(Value::Number(n)) => Some(parse_flag(&n.to_string())?),
            Some(_) => return Err(invalid_flag(ATTR_SSL)),
        },
    })
}

fn string_attribute(attributes: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ShortcoderError::validation(format!(
            "Attribute '{}' must be a string",
            key
        ))),
    }
}

fn parse_form(body: &[u8]) -> Result<ShortcodeParams> {
    let mut params = ShortcodeParams::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            ATTR_NAME => params.name = Some(value.into_owned()),
            ATTR_DESTINATION => params.destination = Some(value.into_owned()),
            ATTR_SSL => params.ssl = Some(parse_flag(&value)?),
            _ => {}
        }
    }
    Ok(params)
}

/// Parses a boolean flag the way forms and loose JSON clients send it.
pub fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(invalid_flag(ATTR_SSL)),
    }
}

fn invalid_flag(key: &str) -> ShortcoderError {
    ShortcoderError::validation(format!("Attribute '{}' must be a boolean", key))
}
