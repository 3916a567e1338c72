//! Shortcode resource controller
//!
//! Routes a normalized [`ApiRequest`] to the matching operation and builds
//! the negotiated [`ApiResponse`]. Client errors (400/404/409) are answered
//! here; faults are returned as `Err` for the adapters to convert.

use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use tracing::{error, info, trace, warn};

use super::body::parse_params;
use super::constants::{
    DESTINATION_PARAM, MAX_NAME_LENGTH, SHORTCODE_FIELDS_PARAM, SHORTCODES_SEGMENT,
    SUGGESTION_ATTEMPTS, SUGGESTION_SEGMENT,
};
use super::cors::CorsPolicy;
use super::negotiation::{Format, negotiate};
use super::request::ApiRequest;
use super::response::ApiResponse;
use super::routes::{self, Route};
use super::serializer::{Document, Fieldset, ResourceSerializer, render_error};
use crate::config::{ServiceConfig, StaticConfig};
use crate::errors::{Result, ShortcoderError};
use crate::qr::SvgOptions;
use crate::storage::{Shortcode, ShortcodeStore, StoreFactory, normalize_name};
use crate::utils::generate_random_code;

/// Per-request rendering context.
struct Negotiated {
    format: Format,
    fields: Fieldset,
}

pub struct ShortcodeController {
    store: Arc<dyn ShortcodeStore>,
    settings: ServiceConfig,
    serializer: ResourceSerializer,
    cors: CorsPolicy,
}

impl ShortcodeController {
    pub fn new(store: Arc<dyn ShortcodeStore>, settings: ServiceConfig) -> Self {
        Self {
            serializer: ResourceSerializer::new(settings.service_base_url.clone())
                .with_qr_options(SvgOptions::from(&settings.qr)),
            cors: CorsPolicy::new(settings.cross_origin_domain.clone()),
            store,
            settings,
        }
    }

    /// Builds the store named by the configuration and wires it in.
    pub fn from_config(config: &StaticConfig) -> Result<Self> {
        let store = StoreFactory::create(config)?;
        Ok(Self::new(store, config.service.clone()))
    }

    pub fn store(&self) -> &Arc<dyn ShortcodeStore> {
        &self.store
    }

    pub async fn handle(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let resolved = routes::resolve(&request.path);
        let negotiated = Negotiated {
            format: resolved
                .format
                .unwrap_or_else(|| negotiate(request.header("accept"))),
            fields: Fieldset::parse(request.query_param(SHORTCODE_FIELDS_PARAM)),
        };
        trace!(
            "{} {} resolved to {:?} ({:?})",
            request.method, request.path, resolved.route, negotiated.format
        );

        let mut response = match self.dispatch(&resolved.route, request, &negotiated).await {
            Ok(response) => response,
            Err(e) if e.is_client_error() => {
                warn!("{} {} rejected: {}", request.method, request.path, e);
                error_response(&e, negotiated.format)
            }
            Err(e) => {
                error!("{} {} failed: {}", request.method, request.path, e);
                return Err(e);
            }
        };

        self.cors
            .apply(&resolved.route, &request.method, &mut response);
        Ok(response)
    }

    async fn dispatch(
        &self,
        route: &Route,
        request: &ApiRequest,
        negotiated: &Negotiated,
    ) -> Result<ApiResponse> {
        match (route, &request.method) {
            (Route::Unknown, _) => Err(ShortcoderError::not_found(format!(
                "No resource at {}",
                request.path
            ))),
            (_, &Method::OPTIONS) => Ok(ApiResponse::ok()),
            (Route::Suggestion, &Method::GET) => self.suggest(negotiated).await,
            (Route::Shortcodes, &Method::GET) => self.list(request, negotiated).await,
            (Route::Shortcodes, &Method::POST) => self.create(request, negotiated).await,
            (Route::Shortcode(code), &Method::HEAD) => self.head(code).await,
            (Route::Shortcode(code), &Method::GET) => self.show(code, negotiated).await,
            (Route::Shortcode(code), &Method::PUT) => self.update(code, request, negotiated).await,
            (Route::Shortcode(code), &Method::DELETE) => self.delete(code, negotiated).await,
            (_, method) => Err(ShortcoderError::not_found(format!(
                "{} is not supported on {}",
                method, request.path
            ))),
        }
    }

    async fn suggest(&self, negotiated: &Negotiated) -> Result<ApiResponse> {
        for _ in 0..SUGGESTION_ATTEMPTS {
            let candidate = generate_random_code(self.settings.suggestion_length);
            if !self.store.exists(&candidate).await? {
                trace!("Suggesting shortcode '{}'", candidate);
                return self.document(StatusCode::OK, Document::Suggestion(&candidate), negotiated);
            }
        }
        Err(ShortcoderError::unexpected(format!(
            "No free shortcode after {} attempts",
            SUGGESTION_ATTEMPTS
        )))
    }

    async fn list(&self, request: &ApiRequest, negotiated: &Negotiated) -> Result<ApiResponse> {
        let destination = request
            .query_param(DESTINATION_PARAM)
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                ShortcoderError::validation(format!(
                    "Query parameter '{}' is required",
                    DESTINATION_PARAM
                ))
            })?;

        let shortcodes = self.store.find_by_destination(destination).await?;
        self.document(StatusCode::OK, Document::Shortcodes(&shortcodes), negotiated)
    }

    async fn head(&self, code: &str) -> Result<ApiResponse> {
        let status = if self.store.exists(&normalize_name(code)).await? {
            StatusCode::OK
        } else {
            StatusCode::NOT_FOUND
        };
        Ok(ApiResponse::new(status))
    }

    async fn show(&self, code: &str, negotiated: &Negotiated) -> Result<ApiResponse> {
        let shortcode = self.find(code).await?;
        self.document(StatusCode::OK, Document::Shortcode(&shortcode), negotiated)
    }

    async fn create(&self, request: &ApiRequest, negotiated: &Negotiated) -> Result<ApiResponse> {
        let params = parse_params(request.content_type(), &request.body)?;
        let name = params
            .name()
            .ok_or_else(|| ShortcoderError::validation("Attribute 'name' is required"))?;
        let destination = params
            .destination()
            .ok_or_else(|| ShortcoderError::validation("Attribute 'destination' is required"))?;

        let shortcode = Shortcode::new(name, destination, params.ssl.unwrap_or(false));
        validate_name(&shortcode.name)?;

        if self.store.exists(&shortcode.name).await? {
            return Err(already_exists(&shortcode.name));
        }
        // a concurrent create can still win between the check and the write
        self.store.insert(shortcode.clone()).await?;
        info!(
            "Created shortcode '{}' -> {}",
            shortcode.name, shortcode.destination
        );

        let location = format!(
            "{}/{}/{}",
            self.settings.api_base_url.trim_end_matches('/'),
            SHORTCODES_SEGMENT,
            shortcode.name
        );
        Ok(self
            .document(StatusCode::CREATED, Document::Shortcode(&shortcode), negotiated)?
            .with_header("Location", location))
    }

    async fn update(
        &self,
        code: &str,
        request: &ApiRequest,
        negotiated: &Negotiated,
    ) -> Result<ApiResponse> {
        let mut shortcode = self.find(code).await?;
        let params = parse_params(request.content_type(), &request.body)?;

        if params.destination.is_some() {
            let destination = params.destination().ok_or_else(|| {
                ShortcoderError::validation("Attribute 'destination' must not be empty")
            })?;
            shortcode.destination = destination.to_string();
        }
        if let Some(ssl) = params.ssl {
            shortcode.ssl = ssl;
        }

        self.store.update(shortcode.clone()).await?;
        info!(
            "Updated shortcode '{}' -> {} (ssl: {})",
            shortcode.name, shortcode.destination, shortcode.ssl
        );
        self.document(StatusCode::OK, Document::Shortcode(&shortcode), negotiated)
    }

    async fn delete(&self, code: &str, negotiated: &Negotiated) -> Result<ApiResponse> {
        let name = normalize_name(code);
        self.store.remove(&name).await.map_err(|e| match e {
            ShortcoderError::NotFound(_) => not_found(&name),
            other => other,
        })?;
        info!("Deleted shortcode '{}'", name);

        let message = format!("Shortcode '{}' deleted", name);
        self.document(StatusCode::OK, Document::Meta(&message), negotiated)
    }

    async fn find(&self, code: &str) -> Result<Shortcode> {
        let name = normalize_name(code);
        self.store
            .get(&name)
            .await?
            .ok_or_else(|| not_found(&name))
    }

    fn document(
        &self,
        status: StatusCode,
        document: Document<'_>,
        negotiated: &Negotiated,
    ) -> Result<ApiResponse> {
        let body = self
            .serializer
            .render(document, &negotiated.fields, negotiated.format)?;
        Ok(ApiResponse::new(status)
            .with_header("Content-Type", negotiated.format.content_type())
            .with_chunk(body))
    }
}

/// Names must stay addressable as a single path segment.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ShortcoderError::validation("Attribute 'name' is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ShortcoderError::validation(format!(
            "Attribute 'name' must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ShortcoderError::validation(
            "Attribute 'name' must not contain whitespace, '/', '?' or '#'",
        ));
    }
    if routes::split_extension(name).is_some() {
        return Err(ShortcoderError::validation(
            "Attribute 'name' must not end in a format extension",
        ));
    }
    // routing anchors on the last of these segments
    if [SHORTCODES_SEGMENT, SUGGESTION_SEGMENT]
        .iter()
        .any(|segment| name.eq_ignore_ascii_case(segment))
    {
        return Err(ShortcoderError::validation(format!(
            "Attribute 'name' must not be the reserved word '{}'",
            name
        )));
    }
    Ok(())
}

fn not_found(name: &str) -> ShortcoderError {
    ShortcoderError::not_found(format!("Shortcode '{}' not found", name))
}

fn already_exists(name: &str) -> ShortcoderError {
    ShortcoderError::conflict(format!("Shortcode '{}' already exists", name))
}

fn error_response(err: &ShortcoderError, format: Format) -> ApiResponse {
    ApiResponse::new(err.http_status())
        .with_header("Content-Type", format.content_type())
        .with_chunk(render_error(err, format))
}
