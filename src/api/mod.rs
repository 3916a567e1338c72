//! HTTP resource layer for shortcodes
//!
//! - `request` / `response`: framework-neutral exchange types
//! - `routes`: path normalization
//! - `negotiation` / `serializer`: representation selection and rendering
//! - `cors`: per-route CORS policy
//! - `controller`: the resource operations
//! - `server` / `middleware`: actix-web binding

pub mod body;
pub mod constants;
pub mod controller;
pub mod cors;
pub mod middleware;
pub mod negotiation;
pub mod request;
pub mod response;
pub mod routes;
pub mod serializer;
pub mod server;

pub use controller::ShortcodeController;
pub use request::ApiRequest;
pub use response::ApiResponse;
