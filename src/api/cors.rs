//! CORS policy
//!
//! Only the public read API is cross-origin: preflights on every route,
//! the collection-level `GET`s, and a successful member `HEAD`. Member reads
//! and all writes stay same-origin and never carry these headers.

use actix_web::http::Method;

use super::constants::CORS_ALLOWED_HEADERS;
use super::response::ApiResponse;
use super::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_origin: String,
}

impl CorsPolicy {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    /// Method list to advertise for this request, or `None` when the
    /// exchange is same-origin only.
    pub fn methods_for(&self, route: &Route, method: &Method) -> Option<&'static str> {
        let methods = route.allowed_methods()?;
        match (route, method) {
            (_, m) if *m == Method::OPTIONS => Some(methods),
            (Route::Suggestion | Route::Shortcodes, m) if *m == Method::GET => Some(methods),
            (Route::Shortcode(_), m) if *m == Method::HEAD => Some(methods),
            _ => None,
        }
    }

    /// Adds the CORS headers the policy grants to `response`.
    pub fn apply(&self, route: &Route, method: &Method, response: &mut ApiResponse) {
        let Some(methods) = self.methods_for(route, method) else {
            return;
        };
        if *method == Method::HEAD && !response.status.is_success() {
            return;
        }
        response.set_header("Access-Control-Allow-Origin", self.allow_origin.clone());
        response.set_header("Access-Control-Allow-Headers", CORS_ALLOWED_HEADERS);
        response.set_header("Access-Control-Allow-Methods", methods);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn member() -> Route {
        Route::Shortcode("abc123".to_string())
    }

    #[test]
    fn test_preflight_method_lists() {
        let policy = CorsPolicy::new("*");
        assert_eq!(
            policy.methods_for(&Route::Suggestion, &Method::OPTIONS),
            Some("GET,OPTIONS")
        );
        assert_eq!(
            policy.methods_for(&Route::Shortcodes, &Method::OPTIONS),
            Some("GET,OPTIONS")
        );
        assert_eq!(
            policy.methods_for(&member(), &Method::OPTIONS),
            Some("HEAD,OPTIONS")
        );
    }

    #[test]
    fn test_same_origin_exchanges() {
        let policy = CorsPolicy::new("*");
        assert_eq!(policy.methods_for(&member(), &Method::GET), None);
        assert_eq!(policy.methods_for(&member(), &Method::PUT), None);
        assert_eq!(policy.methods_for(&member(), &Method::DELETE), None);
        assert_eq!(policy.methods_for(&Route::Shortcodes, &Method::POST), None);
        assert_eq!(policy.methods_for(&Route::Unknown, &Method::OPTIONS), None);
    }

    #[test]
    fn test_apply_sets_headers() {
        let policy = CorsPolicy::new("https://app.link.me");
        let mut response = ApiResponse::ok();
        policy.apply(&Route::Shortcodes, &Method::GET, &mut response);
        assert_eq!(
            response.header("Access-Control-Allow-Origin"),
            Some("https://app.link.me")
        );
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some(CORS_ALLOWED_HEADERS)
        );
        assert_eq!(
            response.header("Access-Control-Allow-Methods"),
            Some("GET,OPTIONS")
        );
    }

    #[test]
    fn test_failed_head_gets_no_headers() {
        let policy = CorsPolicy::new("*");
        let mut response = ApiResponse::new(StatusCode::NOT_FOUND);
        policy.apply(&member(), &Method::HEAD, &mut response);
        assert!(response.headers().is_empty());
    }
}
