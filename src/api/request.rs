//! Framework-neutral request handed to the controller
//!
//! Both the actix server and the invocation adapter build one of these at
//! their boundary; nothing past that point sees raw framework types.

use std::collections::{BTreeMap, HashMap};

use actix_web::http::Method;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    query: Vec<(String, String)>,
    /// Lowercased header name → value
    headers: HashMap<String, String>,
    /// CGI-style variables (`REQUEST_METHOD`, `HTTP_ACCEPT`, ...)
    environment: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let mut environment = BTreeMap::new();
        environment.insert("REQUEST_METHOD".to_string(), method.to_string());
        environment.insert("SCRIPT_NAME".to_string(), String::new());
        environment.insert("PATH_INFO".to_string(), path.clone());
        environment.insert("QUERY_STRING".to_string(), String::new());
        environment.insert("SERVER_NAME".to_string(), "localhost".to_string());
        environment.insert("SERVER_PORT".to_string(), "443".to_string());

        Self {
            method,
            path,
            query: Vec::new(),
            headers: HashMap::new(),
            environment,
            body: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_query(key, value);
        self
    }

    /// Appends a raw (percent-encoded) query string.
    pub fn with_query_string(mut self, query_string: &str) -> Self {
        for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            self.push_query(key, value);
        }
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn push_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
        let query_string = self.query_string();
        self.environment
            .insert("QUERY_STRING".to_string(), query_string);
    }

    /// Registers a header under its lowercased name and as an `HTTP_*`
    /// environment variable.
    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let key = name.to_ascii_lowercase();
        if key == "content-type" {
            self.environment
                .insert("CONTENT_TYPE".to_string(), value.clone());
        }
        self.environment
            .insert(environment_key(name), value.clone());
        self.headers.insert(key, value);
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Last value wins when a key repeats.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str)
    }
}

/// `X-Api-Key` → `HTTP_X_API_KEY`
fn environment_key(header: &str) -> String {
    format!("HTTP_{}", header.to_ascii_uppercase().replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let request = ApiRequest::get("/shortcodes").with_header("Accept", "application/json");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
        assert!(request.headers().contains_key("accept"));
    }

    #[test]
    fn test_headers_are_projected_into_environment() {
        let request = ApiRequest::get("/shortcodes")
            .with_header("X-Api-Key", "secret")
            .with_header("Content-Type", "application/vnd.api+json");
        assert_eq!(request.env_var("HTTP_X_API_KEY"), Some("secret"));
        assert_eq!(
            request.env_var("CONTENT_TYPE"),
            Some("application/vnd.api+json")
        );
        assert_eq!(request.env_var("REQUEST_METHOD"), Some("GET"));
        assert_eq!(request.env_var("PATH_INFO"), Some("/shortcodes"));
    }

    #[test]
    fn test_query_string_parsing_and_rebuild() {
        let request = ApiRequest::get("/shortcodes")
            .with_query_string("destination=www.yahoo.com&fields%5Bshortcodes%5D=name");
        assert_eq!(request.query_param("destination"), Some("www.yahoo.com"));
        assert_eq!(request.query_param("fields[shortcodes]"), Some("name"));
        assert_eq!(
            request.env_var("QUERY_STRING"),
            Some("destination=www.yahoo.com&fields%5Bshortcodes%5D=name")
        );
    }

    #[test]
    fn test_repeated_query_key_last_wins() {
        let request = ApiRequest::get("/shortcodes")
            .with_query("destination", "a")
            .with_query("destination", "b");
        assert_eq!(request.query_param("destination"), Some("b"));
        assert_eq!(request.query_pairs().len(), 2);
    }
}
