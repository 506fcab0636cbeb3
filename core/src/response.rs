//! Response envelope handling.
//!
//! Every body the service returns is a JSON object whose integer `code` field
//! says whether the call succeeded. The HTTP status is not consulted.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

pub const SUCCESS_CODE: i64 = 200;

/// A successful response body, returned whole (including `code`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApiResult(Map<String, Value>);

impl ApiResult {
    /// The `code` field. Always 200 for values produced by `process_response`.
    pub fn code(&self) -> Option<i64> {
        self.0.get("code").and_then(Value::as_i64)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserialize the body into a caller-defined type.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// Consuming `decode`, without copying the body.
    pub fn into_decoded<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0))
    }
}

impl Deref for ApiResult {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<Value> for ApiResult {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::Object(map) if *map == self.0)
    }
}

/// Decode a raw response body into an `ApiResult`.
///
/// Bodies that are not JSON, or that decode to anything other than a
/// non-empty object, are reported as `ApiError::Connection`. A `code` that is
/// not exactly the integer 200 becomes `ApiError::Remote`, carrying that code
/// (0 when missing or non-integer) and the `error` field as the message.
pub fn process_response(raw_body: &str) -> Result<ApiResult> {
    let data: Value = serde_json::from_str(raw_body).map_err(|err| {
        tracing::debug!(error = %err, body_len = raw_body.len(), "response body is not valid JSON");
        ApiError::from(err)
    })?;

    let map = match data {
        Value::Object(map) if !map.is_empty() => map,
        other => {
            tracing::debug!(kind = json_kind(&other), "response body is empty or not an object");
            return Err(ApiError::connection(format!(
                "expected a non-empty JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    let code = map.get("code").and_then(Value::as_i64);
    if code != Some(SUCCESS_CODE) {
        let message = match map.get("error") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
        };
        return Err(ApiError::Remote {
            code: code.unwrap_or(0),
            message,
        });
    }

    Ok(ApiResult(map))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "empty object",
    }
}
