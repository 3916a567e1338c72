//! Event ⇄ request translation and fault isolation.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use base64::{Engine, engine::general_purpose::STANDARD};
use futures_util::FutureExt;
use tokio::sync::OnceCell;
use tracing::{debug, error};

use super::event::{InvocationEvent, InvocationResponse, Trigger};
use crate::api::constants::JSON_API_MEDIA_TYPE;
use crate::api::serializer::error_document;
use crate::api::{ApiRequest, ApiResponse, ShortcodeController};
use crate::config::get_config;
use crate::errors::{Result, ShortcoderError};

/// Built on the first invocation and reused while the container lives.
static APPLICATION: OnceCell<Arc<ShortcodeController>> = OnceCell::const_new();

pub async fn application() -> Result<Arc<ShortcodeController>> {
    APPLICATION
        .get_or_try_init(|| async {
            let config = get_config();
            ShortcodeController::from_config(&config).map(Arc::new)
        })
        .await
        .cloned()
}

/// Runtime entry point: never fails, faults become 500 envelopes.
pub async fn handler(event: InvocationEvent) -> InvocationResponse {
    let trigger = event.trigger();
    match application().await {
        Ok(controller) => handle_event(&controller, event).await,
        Err(e) => {
            error!("Application initialization failed: {}", e);
            fault_response(&e, trigger)
        }
    }
}

pub async fn handle_event(
    controller: &ShortcodeController,
    event: InvocationEvent,
) -> InvocationResponse {
    let trigger = event.trigger();
    let outcome = AssertUnwindSafe(async {
        let request = to_api_request(&event)?;
        controller.handle(&request).await
    })
    .catch_unwind()
    .await;

    match outcome {
        Ok(Ok(response)) => to_invocation_response(&response, trigger),
        Ok(Err(e)) => {
            error!("Invocation failed: {}", e);
            fault_response(&e, trigger)
        }
        Err(payload) => {
            let err = ShortcoderError::unexpected(panic_message(payload.as_ref()));
            error!("Invocation panicked: {}", err);
            fault_response(&err, trigger)
        }
    }
}

pub fn to_api_request(event: &InvocationEvent) -> Result<ApiRequest> {
    let raw_method = event.http_method.as_deref().unwrap_or_default();
    let method = Method::from_bytes(raw_method.as_bytes()).map_err(|_| {
        ShortcoderError::unexpected(format!("Invalid HTTP method '{}'", raw_method))
    })?;

    let body = match event.body.as_deref() {
        None => Vec::new(),
        Some(body) if event.is_base64_encoded.unwrap_or(false) => STANDARD.decode(body)?,
        Some(body) => body.as_bytes().to_vec(),
    };

    let mut request =
        ApiRequest::new(method, event.path.clone().unwrap_or_default()).with_body(body);
    for (key, value) in event.query_string_parameters.iter().flatten() {
        request.push_query(key.as_str(), value.as_str());
    }
    for (name, value) in event.headers.iter().flatten() {
        request.insert_header(name, value.as_str());
    }

    debug!(
        "Translated {:?} event into {} {}",
        event.trigger(),
        request.method,
        request.path
    );
    Ok(request)
}

pub fn to_invocation_response(response: &ApiResponse, trigger: Trigger) -> InvocationResponse {
    InvocationResponse {
        status_code: response.status.as_u16(),
        headers: response
            .headers()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        body: response.body(),
        is_base64_encoded: base64_flag(trigger),
    }
}

/// 500 envelope carrying only the fault's summary message.
pub fn fault_response(err: &ShortcoderError, trigger: Trigger) -> InvocationResponse {
    let summary = ShortcoderError::unexpected(err.message());
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), JSON_API_MEDIA_TYPE.to_string());

    InvocationResponse {
        status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        headers,
        body: error_document(&summary).to_string(),
        is_base64_encoded: base64_flag(trigger),
    }
}

fn base64_flag(trigger: Trigger) -> Option<bool> {
    match trigger {
        Trigger::LoadBalancer => Some(false),
        Trigger::ApiGateway => None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown panic".to_string()
    }
}
