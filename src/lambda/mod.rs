//! Serverless invocation adapter
//!
//! Translates HTTP integration events into [`crate::api::ApiRequest`]s, runs
//! them through the shared controller and translates the result back.
//! Every fault, panics included, becomes a 500 envelope.

pub mod adapter;
pub mod event;

pub use adapter::{application, handle_event, handler};
pub use event::{InvocationEvent, InvocationResponse, Trigger};
