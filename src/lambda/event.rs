//! Wire types of the serverless HTTP integration (API gateway proxy and
//! application load balancer share this shape).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvocationEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<String>,
    pub is_base64_encoded: Option<bool>,
    pub request_context: Option<Value>,
}

/// What delivered the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ApiGateway,
    LoadBalancer,
}

impl InvocationEvent {
    pub fn trigger(&self) -> Trigger {
        match &self.request_context {
            Some(Value::Object(context)) if context.contains_key("elb") => Trigger::LoadBalancer,
            _ => Trigger::ApiGateway,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Load balancers require the flag, gateways do without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_base64_encoded: Option<bool>,
}
