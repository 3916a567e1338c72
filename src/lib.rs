//! Shortcoder - JSON:API shortcode service
//!
//! Maps short, human-typable codes to destination URLs and exposes them as a
//! content-negotiated JSON:API resource, servable over plain HTTP or from a
//! serverless HTTP integration.
//!
//! # Architecture
//! - `api`: resource controller, serializer, CORS policy and actix binding
//! - `lambda`: invocation adapter for serverless events
//! - `qr`: QR code SVG rendering
//! - `storage`: record store trait and bundled backends
//! - `config`: configuration management
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod lambda;
pub mod qr;
pub mod storage;
pub mod system;
pub mod utils;
