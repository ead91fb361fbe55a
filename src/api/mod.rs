//! Wire types for the Gemini `generateContent` endpoint.

pub mod client;
pub mod connectivity;

use serde::{Deserialize, Serialize};

pub use client::{
    ChatSession, GeminiConnector, MessagePayload, ProviderClient, ProviderConnector,
    ProviderError, Reply, SessionConfig,
};

/// MIME type attached to every inline image part. Uploads are not sniffed.
pub const INLINE_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.into()),
            parts,
        }
    }

    /// Role-less content, as used for the system instruction.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inline_data: Option<InlineData>,
    /// Set on reasoning summaries some models return alongside the answer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn inline_image(data: impl Into<String>) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: INLINE_IMAGE_MIME.to_string(),
                data: data.into(),
            }),
            ..Self::default()
        }
    }

    pub fn is_inline_data(&self) -> bool {
        self.inline_data.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joined answer text of the first candidate, skipping thought parts.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought.unwrap_or(false))
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first()?.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = GenerateContentRequest {
            contents: vec![Content::new(
                "user",
                vec![Part::inline_image("QUJD"), Part::text("Solve this problem.")],
            )],
            system_instruction: Some(Content::text("be a tutor")),
            generation_config: Some(GenerationConfig { temperature: 0.5 }),
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": "QUJD"}},
                        {"text": "Solve this problem."}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "be a tutor"}]},
                "generationConfig": {"temperature": 0.5}
            })
        );
    }

    #[test]
    fn response_text_joins_parts_and_skips_thoughts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "thinking about it", "thought": true},
                        {"text": "Step 1. "},
                        {"text": "Step 2."}
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .expect("deserialize");

        assert_eq!(response.text().as_deref(), Some("Step 1. Step 2."));
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }

    #[test]
    fn response_without_text_yields_none() {
        let empty: GenerateContentResponse =
            serde_json::from_value(json!({})).expect("deserialize");
        assert!(empty.text().is_none());

        let blank: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}}]
        }))
        .expect("deserialize");
        assert!(blank.text().is_none());

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .expect("deserialize");
        assert!(blocked.text().is_none());
    }

    #[test]
    fn whitespace_only_text_is_still_a_reply() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .expect("deserialize");
        assert_eq!(response.text().as_deref(), Some("   "));
    }
}
