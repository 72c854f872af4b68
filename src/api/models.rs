use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound body. Fields are kept loosely typed so a non-string `code` is
/// judged by presence rather than rejected by the decoder.
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub language: Value,
}

impl ExplainRequest {
    /// Code to explain, or `None` when the field is absent, `null`, `false`,
    /// `0` or `""`. Other non-string values are sent as their JSON text.
    pub fn code(&self) -> Option<String> {
        match &self.code {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_str()
    }
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
