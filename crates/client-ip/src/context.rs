// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::request::RequestLike;

/// The context field that holds the resolved client IP
pub const IP_CONTEXT_FIELD: &str = "ip";

/// What a plugin may see and change of the per-request execution context.
///
/// The context is owned by the framework running the request; plugins only read the request
/// and add fields that later stages of the same request can read back.
pub trait PluginContext {
    fn request(&self) -> Option<&RequestLike>;

    /// Add (or overwrite) a field
    fn extend(&mut self, field: &str, value: Value);
}

/// A per-request execution context: the incoming request plus any fields plugins have added
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request: Option<RequestLike>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(request: RequestLike) -> Self {
        Self {
            request: Some(request),
            fields: Map::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.get(IP_CONTEXT_FIELD).and_then(Value::as_str)
    }
}

impl PluginContext for ExecutionContext {
    fn request(&self) -> Option<&RequestLike> {
        self.request.as_ref()
    }

    fn extend(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }
}
