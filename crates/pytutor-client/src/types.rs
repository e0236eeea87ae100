// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the tutoring backend's JSON bodies.

use serde::Deserialize;

/// Error body returned by the backend on non-2xx responses.
///
/// Shape: `{"error": "...", "request_id": "...", "details": ...}`. Every field
/// is optional so that foreign error bodies (proxies, gateways) still parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl BackendErrorBody {
    /// Parses `body` if it is a JSON object; `None` for plain-text bodies.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Body of the backend health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_error_shape() {
        let body = r#"{"error":"Field 'question' is required.","request_id":"abc","details":{"k":1}}"#;
        let parsed = BackendErrorBody::parse(body).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("Field 'question' is required."));
        assert_eq!(parsed.request_id.as_deref(), Some("abc"));
        assert!(parsed.details.is_some());
    }

    #[test]
    fn plain_text_error_is_not_parsed() {
        assert_eq!(BackendErrorBody::parse("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn health_body_ignores_extra_fields() {
        let parsed: HealthBody = serde_json::from_str(r#"{"status":"ok","uptime":3}"#).unwrap();
        assert_eq!(parsed.status, "ok");
    }
}
