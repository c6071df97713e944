use serde::{Deserialize, Serialize};

use super::{GatewayError, NarrativeRequest, NarrativeService};
use crate::config;

/// Gemini HTTP client for hosted text generation.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client configured from `GEMINI_API_KEY` / `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = config::gemini_api_key()
            .ok_or_else(|| GatewayError::NotConfigured(config::GEMINI_API_KEY_ENV.into()))?;
        Self::new(
            config::GEMINI_BASE_URL,
            &api_key,
            &config::gemini_model(),
            config::GEMINI_TIMEOUT_SECS,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// One generateContent round trip with the given text as the only part.
    pub fn generate(&self, text: &str) -> Result<String, GatewayError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    GatewayError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    GatewayError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GatewayError::ResponseParsing(e.to_string()))?;
        parsed.first_text()
    }
}

impl NarrativeService for GeminiClient {
    /// Preamble-prefixed call first; on any failure, one direct call with
    /// the bare prompt.
    fn complete(&self, request: &NarrativeRequest) -> Result<String, GatewayError> {
        let full_prompt = if request.system_preamble.is_empty() {
            request.prompt_text.clone()
        } else {
            format!("{}\n\n{}", request.system_preamble, request.prompt_text)
        };

        match self.generate(&full_prompt) {
            Ok(text) => {
                tracing::debug!(model = %self.model, chars = text.len(), "Gemini response received");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "Gemini call failed, retrying with bare prompt");
                self.generate(&request.prompt_text)
            }
        }
    }
}

/// Request body for generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body from generateContent
#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Result<String, GatewayError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_client_constructor() {
        let client = GeminiClient::new("https://example.test/", "k", "gemini-1.5-flash", 30).unwrap();
        assert_eq!(client.base_url, "https://example.test");
        assert_eq!(client.timeout_secs, 30);
        assert_eq!(client.model(), "gemini-1.5-flash");
    }

    #[test]
    fn endpoint_embeds_model_and_key() {
        let client = GeminiClient::new(config::GEMINI_BASE_URL, "secret", "gemini-1.5-flash", 30).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn first_candidate_text_extracted() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]}},{"content":{"parts":[{"text":"other"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text().unwrap(), "first");
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(parsed.first_text(), Err(GatewayError::EmptyResponse)));
    }

    #[test]
    fn unreachable_host_fails_after_fallback() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = GeminiClient::new("http://127.0.0.1:9", "k", "m", 2).unwrap();
        let request = NarrativeRequest {
            prompt_text: "p".into(),
            system_preamble: "s".into(),
            target_language: Default::default(),
        };
        assert!(client.complete(&request).is_err());
    }
}
