//! Uniform wrapper around AbuseIPDB response bodies.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Title used for errors synthesized locally.
pub const INTERNAL_ERROR_TITLE: &str = "Internal Error";

/// One entry of the `errors` array returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiError {
    /// Human readable description.
    #[serde(default)]
    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status echoed by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Offending parameter, e.g. `{"parameter": "ipAddress"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

impl ApiError {
    /// Create an error carrying only a detail message.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            title: None,
            status: None,
            source: None,
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => ApiError::new(s.clone()),
            Value::Object(_) => serde_json::from_value(value.clone())
                .unwrap_or_else(|_| ApiError::new(value.to_string())),
            other => ApiError::new(other.to_string()),
        }
    }
}

/// Raw response text plus its parsed JSON form.
///
/// The text is kept untouched; `blacklist` in plaintext mode returns a
/// newline separated list that does not parse, in which case only
/// [`plaintext`](Self::plaintext) carries content.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    plaintext: String,
    parsed: Option<Value>,
}

impl ApiResponse {
    /// Wrap a raw response body.
    pub fn new(plaintext: impl Into<String>) -> Self {
        let plaintext = plaintext.into();
        let parsed = if plaintext.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&plaintext).ok()
        };

        Self { plaintext, parsed }
    }

    /// Response standing in for a failed transport call.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Build a response shaped like an API error, for failures that never
    /// reached the API.
    pub fn from_error_message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        let body = json!({
            "errors": [
                {
                    "title": INTERNAL_ERROR_TITLE,
                    "detail": message,
                }
            ]
        });

        Self {
            plaintext: body.to_string(),
            parsed: Some(body),
        }
    }

    /// Raw response text.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// Parsed JSON document, if the body was valid JSON.
    pub fn object(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    /// Top level JSON object with keys in document order.
    pub fn to_map(&self) -> Option<Map<String, Value>> {
        match &self.parsed {
            Some(Value::Object(map)) => Some(map.clone()),
            _ => None,
        }
    }

    /// True when the body was empty, as after a transport failure.
    pub fn is_empty(&self) -> bool {
        self.plaintext.is_empty()
    }

    /// Entries of the top level `errors` array.
    pub fn errors(&self) -> Vec<ApiError> {
        self.parsed
            .as_ref()
            .and_then(|v| v.get("errors"))
            .and_then(Value::as_array)
            .map(|errors| errors.iter().map(ApiError::from_value).collect())
            .unwrap_or_default()
    }

    /// True when the body carries at least one error.
    pub fn has_error(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Deserialize the `data` member into a typed model.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self
            .parsed
            .as_ref()
            .and_then(|v| v.get("data"))
            .ok_or_else(|| Error::InvalidResponse("response has no data member".to_string()))?;

        serde_json::from_value(data.clone())
            .map_err(|e| Error::InvalidResponse(format!("failed to parse data: {}", e)))
    }

    /// Turn an API error body into [`Error::RemoteApi`].
    pub fn into_result(self) -> Result<Self> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::RemoteApi(errors))
        }
    }
}

impl From<String> for ApiResponse {
    fn from(plaintext: String) -> Self {
        Self::new(plaintext)
    }
}
