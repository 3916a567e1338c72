//! actix-web binding
//!
//! Every request goes through one default service that converts it into an
//! [`ApiRequest`], runs the controller and converts the result back.
//! Faults propagate as [`ShortcoderError`], whose `ResponseError` impl
//! renders the JSON:API 500 body.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};

use super::controller::ShortcodeController;
use super::request::ApiRequest;
use super::response::ApiResponse;
use crate::errors::ShortcoderError;

/// Shared controller handle stored in app data.
pub type SharedController = web::Data<Arc<ShortcodeController>>;

pub async fn dispatch(
    req: HttpRequest,
    body: web::Bytes,
    controller: SharedController,
) -> Result<HttpResponse, ShortcoderError> {
    let request = to_api_request(&req, &body);
    let response = controller.handle(&request).await?;
    Ok(to_http_response(&response))
}

pub fn to_api_request(req: &HttpRequest, body: &[u8]) -> ApiRequest {
    let mut request = ApiRequest::new(req.method().clone(), req.path())
        .with_query_string(req.query_string())
        .with_body(body.to_vec());
    for (name, value) in req.headers() {
        // non-UTF-8 header values are dropped
        if let Ok(value) = value.to_str() {
            request.insert_header(name.as_str(), value);
        }
    }
    request
}

pub fn to_http_response(response: &ApiResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(response.status);
    for (name, value) in response.headers() {
        builder.insert_header((name.as_str(), value.as_str()));
    }
    builder.body(response.body())
}

/// Mounts the controller as the app's default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::to(dispatch));
}
