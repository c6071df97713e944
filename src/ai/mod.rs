//! Boundary to the external text-generation service.
//!
//! The core never interprets narrative text: it builds a request from a
//! prompt template, hands it to a [`NarrativeService`] and treats whatever
//! comes back as opaque.

pub mod gemini;
pub mod prompts;

pub use gemini::*;
pub use prompts::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing message for any failed generation.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate response. Please try again.";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Text service is not configured: {0} is unset")]
    NotConfigured(String),

    #[error("Cannot reach text service at {0}")]
    Connection(String),

    #[error("Text service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Text service returned no candidates")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SupportedLanguage {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "kn")]
    Kannada,
}

impl SupportedLanguage {
    pub const ALL: &'static [SupportedLanguage] = &[
        Self::English,
        Self::Tamil,
        Self::Hindi,
        Self::Telugu,
        Self::Malayalam,
        Self::Kannada,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Tamil => "ta",
            Self::Hindi => "hi",
            Self::Telugu => "te",
            Self::Malayalam => "ml",
            Self::Kannada => "kn",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Tamil => "Tamil",
            Self::Hindi => "Hindi",
            Self::Telugu => "Telugu",
            Self::Malayalam => "Malayalam",
            Self::Kannada => "Kannada",
        }
    }
}

impl std::str::FromStr for SupportedLanguage {
    type Err = String;

    /// Accepts either the two-letter code or the English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == s || lang.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported language: {s}"))
    }
}

impl std::fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub prompt_text: String,
    pub system_preamble: String,
    pub target_language: SupportedLanguage,
}

/// Wire shape returned to callers: `{success: true, data}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayResponse {
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<String, GatewayError>> for GatewayResponse {
    fn from(result: Result<String, GatewayError>) -> Self {
        match result {
            Ok(text) => Self::ok(text),
            Err(e) => {
                tracing::warn!(error = %e, "Narrative generation failed");
                Self::failed(GENERATION_FAILED_MESSAGE)
            }
        }
    }
}

/// Anything that can turn a narrative request into text.
pub trait NarrativeService {
    fn complete(&self, request: &NarrativeRequest) -> Result<String, GatewayError>;
}

/// Stand-in when no API key is configured; every call fails so callers
/// take their offline fallback.
pub struct OfflineNarrativeService;

impl NarrativeService for OfflineNarrativeService {
    fn complete(&self, _request: &NarrativeRequest) -> Result<String, GatewayError> {
        Err(GatewayError::NotConfigured(
            crate::config::GEMINI_API_KEY_ENV.into(),
        ))
    }
}

/// Gemini when configured, otherwise the offline stand-in.
pub fn narrative_service_from_env() -> Box<dyn NarrativeService> {
    match GeminiClient::from_env() {
        Ok(client) => {
            tracing::debug!(model = %client.model(), "Using Gemini text service");
            Box::new(client)
        }
        Err(e) => {
            tracing::info!(reason = %e, "Text service unavailable, running offline");
            Box::new(OfflineNarrativeService)
        }
    }
}

/// Mock service for testing — returns a fixed response or always fails.
pub struct MockNarrativeService {
    response: Option<String>,
    calls: std::sync::Mutex<Vec<NarrativeRequest>>,
}

impl MockNarrativeService {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<NarrativeRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl NarrativeService for MockNarrativeService {
    fn complete(&self, request: &NarrativeRequest) -> Result<String, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.response
            .clone()
            .ok_or_else(|| GatewayError::Connection("mock".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NarrativeRequest {
        NarrativeRequest {
            prompt_text: "hello".into(),
            system_preamble: "be kind".into(),
            target_language: SupportedLanguage::Tamil,
        }
    }

    #[test]
    fn response_json_shape() {
        let ok = serde_json::to_value(GatewayResponse::ok("text")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": "text"}));

        let failed = serde_json::to_value(GatewayResponse::failed("boom")).unwrap();
        assert_eq!(failed, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn failed_result_maps_to_generic_message() {
        let response = GatewayResponse::from(Err(GatewayError::EmptyResponse));
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
    }

    #[test]
    fn request_serializes_camel_case() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["promptText"], "hello");
        assert_eq!(json["systemPreamble"], "be kind");
        assert_eq!(json["targetLanguage"], "ta");
    }

    #[test]
    fn language_parses_code_or_name() {
        assert_eq!("hi".parse::<SupportedLanguage>().unwrap(), SupportedLanguage::Hindi);
        assert_eq!("kannada".parse::<SupportedLanguage>().unwrap(), SupportedLanguage::Kannada);
        assert!("fr".parse::<SupportedLanguage>().is_err());
        assert_eq!(SupportedLanguage::ALL.len(), 6);
    }

    #[test]
    fn mock_records_calls() {
        let service = MockNarrativeService::new("done");
        assert_eq!(service.complete(&request()).unwrap(), "done");
        assert_eq!(service.calls(), vec![request()]);
    }

    #[test]
    fn offline_service_reports_missing_key() {
        let err = OfflineNarrativeService.complete(&request()).unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured(ref var) if var == "GEMINI_API_KEY"));
    }

    #[test]
    fn failing_mock_errors() {
        let service = MockNarrativeService::failing();
        assert!(service.complete(&request()).is_err());
        assert_eq!(service.calls().len(), 1);
    }
}
