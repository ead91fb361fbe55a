//! Provider client seams and the Gemini HTTP implementation.
//!
//! [`ProviderConnector`] is the "constructor taking a credential": each call
//! yields a fresh [`ProviderClient`] bound to that key. A [`ChatSession`]
//! layers the conversational context (policy instruction, temperature and
//! prior exchanges) on top of a client, the way the hosted SDK's chat object
//! does.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::utils::url::generate_content_url;

/// Error text fragments that identify a failure to reach the provider at all.
const NETWORK_FAILURE_SIGNATURES: &[&str] = &[
    "Failed to fetch",
    "NetworkError",
    "error sending request",
    "dns error",
    "Connection refused",
];

#[derive(Debug)]
pub enum ProviderError {
    /// The HTTP request could not be completed.
    Transport(reqwest::Error),

    /// The provider answered with a non-success status.
    Status {
        status: u16,
        /// Condensed error text extracted from the response body.
        summary: String,
    },

    /// The response body was not the expected JSON shape.
    Decode(String),

    /// Any other failure reported by a client implementation.
    Other(String),
}

impl ProviderError {
    /// Returns true when the failure looks like the provider was unreachable
    /// rather than a rejected or malformed request.
    pub fn is_network_failure(&self) -> bool {
        if let ProviderError::Transport(err) = self {
            if err.is_connect() || err.is_timeout() {
                return true;
            }
        }
        let text = self.to_string();
        NETWORK_FAILURE_SIGNATURES
            .iter()
            .any(|signature| text.contains(signature))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(err) => write!(f, "{err}"),
            ProviderError::Status { status, summary } => {
                write!(f, "Gemini API request failed with status {status}: {summary}")
            }
            ProviderError::Decode(detail) => write!(f, "Malformed Gemini response: {detail}"),
            ProviderError::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProviderError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err)
        }
    }
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;
}

pub trait ProviderConnector: Send + Sync {
    fn connect(&self, credential: &str) -> Arc<dyn ProviderClient>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub system_instruction: String,
    pub temperature: f32,
}

/// Body of one user turn: bare text, or an ordered list of parts.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Text(String),
    Parts(Vec<Part>),
}

impl MessagePayload {
    pub fn into_parts(self) -> Vec<Part> {
        match self {
            MessagePayload::Text(text) => vec![Part::text(text)],
            MessagePayload::Parts(parts) => parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: Option<String>,
}

/// Conversational context held against one provider client.
pub struct ChatSession {
    client: Arc<dyn ProviderClient>,
    model: String,
    config: SessionConfig,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(
        client: Arc<dyn ProviderClient>,
        model: impl Into<String>,
        config: SessionConfig,
        history: Vec<Content>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            config,
            history,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Sends one user turn. The exchange is only recorded in the session
    /// history when the provider call succeeds.
    pub async fn send_message(&mut self, payload: MessagePayload) -> Result<Reply, ProviderError> {
        let user_content = Content::new("user", payload.into_parts());

        let mut contents = self.history.clone();
        contents.push(user_content.clone());

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(self.config.system_instruction.clone())),
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
            }),
        };

        let response = self.client.generate(&self.model, &request).await?;
        let text = response.text();

        self.history.push(user_content);
        if let Some(content) = response.first_content() {
            let mut content = content.clone();
            content.role = Some("model".to_string());
            self.history.push(content);
        }

        Ok(Reply { text })
    }
}

/// Builds Gemini REST clients sharing one connection pool.
#[derive(Clone)]
pub struct GeminiConnector {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl ProviderConnector for GeminiConnector {
    fn connect(&self, credential: &str) -> Arc<dyn ProviderClient> {
        Arc::new(GeminiClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: credential.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = generate_content_url(&self.base_url, model);

        info!(%url, turns = request.contents.len(), "sending generateContent request");
        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received generateContent response");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<GenerateContentResponse>(&body)
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Collapses an error body into a single diagnostic line.
fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value).filter(|s| !s.is_empty()) {
            return summary;
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{FakeConnector, FakeOutcome};

    fn session_config() -> SessionConfig {
        SessionConfig {
            system_instruction: "policy".to_string(),
            temperature: 0.4,
        }
    }

    #[test]
    fn summarize_error_body_prefers_nested_message() {
        let body = r#"{"error":{"code":400,"message":"API key not\n valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(summarize_error_body(body), "API key not valid");
    }

    #[test]
    fn summarize_error_body_handles_plain_text_and_empty() {
        assert_eq!(summarize_error_body("  bad   gateway \n"), "bad gateway");
        assert_eq!(summarize_error_body(""), "<empty>");
        assert_eq!(summarize_error_body(r#"{"status":"failed"}"#), r#"{"status":"failed"}"#);
    }

    #[test]
    fn network_failure_signatures_are_detected() {
        assert!(ProviderError::Other("TypeError: Failed to fetch".into()).is_network_failure());
        assert!(ProviderError::Other("NetworkError when attempting".into()).is_network_failure());
        assert!(!ProviderError::Other("quota exceeded".into()).is_network_failure());
        assert!(!ProviderError::Status {
            status: 500,
            summary: "internal".into()
        }
        .is_network_failure());
    }

    #[test]
    fn gemini_client_debug_redacts_key() {
        let connector = GeminiConnector::new("https://example.invalid");
        let client = GeminiClient {
            http: connector.http.clone(),
            base_url: connector.base_url.clone(),
            api_key: "secret-key".to_string(),
        };
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("***"));
    }

    #[tokio::test]
    async fn send_message_sends_history_policy_and_temperature() {
        let connector = FakeConnector::new(vec![FakeOutcome::Reply("hint".into())]);
        let client = connector.connect("key-1");
        let prior = vec![
            Content::new("user", vec![Part::text("earlier")]),
            Content::new("model", vec![Part::text("earlier reply")]),
        ];
        let mut session = ChatSession::new(client, "test-model", session_config(), prior);

        let reply = session
            .send_message(MessagePayload::Text("What is 2+2?".into()))
            .await
            .expect("reply");
        assert_eq!(reply.text.as_deref(), Some("hint"));

        let calls = connector.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.credential, "key-1");
        assert_eq!(call.model, "test-model");
        assert_eq!(call.request.contents.len(), 3);
        assert_eq!(
            call.request.contents[2].parts,
            vec![Part::text("What is 2+2?")]
        );
        assert_eq!(
            call.request.system_instruction,
            Some(Content::text("policy"))
        );
        assert_eq!(
            call.request.generation_config,
            Some(GenerationConfig { temperature: 0.4 })
        );

        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history()[3].role.as_deref(), Some("model"));
    }

    #[tokio::test]
    async fn failed_send_leaves_history_untouched() {
        let connector = FakeConnector::new(vec![FakeOutcome::Error("quota exceeded".into())]);
        let mut session =
            ChatSession::new(connector.connect("key"), "m", session_config(), Vec::new());

        let err = session
            .send_message(MessagePayload::Text("hi".into()))
            .await
            .expect_err("provider error");
        assert_eq!(err.to_string(), "quota exceeded");
        assert!(session.history().is_empty());
    }
}
