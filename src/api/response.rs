use actix_web::http::StatusCode;

/// Framework-neutral response produced by the controller.
///
/// The body is kept as a list of chunks; adapters collapse it with
/// [`ApiResponse::body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    headers: Vec<(String, String)>,
    chunks: Vec<String>,
}

impl ApiResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Sets a header, replacing any previous value with the same name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// All chunks concatenated.
    pub fn body(&self) -> String {
        self.chunks.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_concatenate_into_body() {
        let response = ApiResponse::ok().with_chunk("ab").with_chunk("").with_chunk("cd");
        assert_eq!(response.body(), "abcd");
        assert_eq!(response.chunks().len(), 3);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let response = ApiResponse::ok()
            .with_header("Content-Type", "text/html")
            .with_header("content-type", "application/vnd.api+json");
        assert_eq!(response.headers().len(), 1);
        assert_eq!(
            response.header("CONTENT-TYPE"),
            Some("application/vnd.api+json")
        );
    }
}
