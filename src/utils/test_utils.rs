use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, ProviderClient,
    ProviderConnector, ProviderError,
};
use crate::core::app::App;
use crate::core::config::data::Config;
use crate::ui::theme::Theme;

/// Scripted result for one provider call.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Reply(String),
    Empty,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub credential: String,
    pub model: String,
    pub request: GenerateContentRequest,
}

#[derive(Default)]
struct FakeState {
    outcomes: VecDeque<FakeOutcome>,
    connections: Vec<String>,
    calls: Vec<RecordedCall>,
}

/// In-memory provider that replays scripted outcomes and records traffic.
/// Calls beyond the script answer "ok".
#[derive(Clone)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new(outcomes: Vec<FakeOutcome>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                outcomes: outcomes.into(),
                ..FakeState::default()
            })),
        }
    }

    pub fn connections(&self) -> Vec<String> {
        self.state.lock().unwrap().connections.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl ProviderConnector for FakeConnector {
    fn connect(&self, credential: &str) -> Arc<dyn ProviderClient> {
        self.state
            .lock()
            .unwrap()
            .connections
            .push(credential.to_string());
        Arc::new(FakeClient {
            credential: credential.to_string(),
            state: self.state.clone(),
        })
    }
}

struct FakeClient {
    credential: String,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl ProviderClient for FakeClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                credential: self.credential.clone(),
                model: model.to_string(),
                request: request.clone(),
            });
            state
                .outcomes
                .pop_front()
                .unwrap_or_else(|| FakeOutcome::Reply("ok".to_string()))
        };

        match outcome {
            FakeOutcome::Reply(text) => Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content::new("model", vec![Part::text(text)])),
                    finish_reason: Some("STOP".to_string()),
                }],
            }),
            FakeOutcome::Empty => Ok(GenerateContentResponse::default()),
            FakeOutcome::Error(message) => Err(ProviderError::Other(message)),
        }
    }
}

pub fn create_test_app() -> App {
    App::new(
        &Config::default(),
        Some("test-key".to_string()),
        Theme::dark_default(),
    )
}

pub fn create_test_app_without_credential() -> App {
    App::new(&Config::default(), None, Theme::dark_default())
}

/// Smallest valid JPEG-ish payload for attachment tests.
pub const TINY_IMAGE_DATA_URI: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ==";
