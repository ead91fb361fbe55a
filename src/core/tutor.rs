//! Runs turns end to end: reseed the session, then dispatch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::connectivity::ConnectivityProbe;
use crate::api::{Content, ProviderConnector};
use crate::core::conversation::Conversation;
use crate::core::dispatcher::{DispatchError, MessageDispatcher};
use crate::core::message::Message;
use crate::core::policy::{dispatch_text, transcript_text};
use crate::core::session::SessionManager;

/// Everything needed to run one turn against the provider.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Id of the user message that started the turn.
    pub turn_id: String,
    pub credential: String,
    /// History as it stood before the user message.
    pub history: Vec<Content>,
    /// Text to dispatch, placeholders already applied.
    pub text: String,
    pub image: Option<String>,
}

impl TurnRequest {
    /// Appends the user message for `text`/`image` to the conversation and
    /// marks it busy.
    ///
    /// An image sent without text is recorded with a friendly placeholder
    /// and dispatched with the solve prompt.
    pub fn start(
        conversation: &mut Conversation,
        credential: impl Into<String>,
        text: &str,
        image: Option<String>,
    ) -> Self {
        let has_image = image.is_some();
        let turn_id = conversation.next_id();
        let message = Message::user(
            turn_id.clone(),
            transcript_text(text, has_image),
            image.clone(),
        );
        let history = conversation.begin_turn(message);
        Self {
            turn_id,
            credential: credential.into(),
            history,
            text: dispatch_text(text, has_image),
            image,
        }
    }
}

#[derive(Debug)]
pub struct TurnOutcome {
    pub turn_id: String,
    pub result: Result<String, DispatchError>,
}

pub struct Tutor {
    sessions: SessionManager,
    dispatcher: MessageDispatcher,
}

impl Tutor {
    pub fn new(
        connector: Arc<dyn ProviderConnector>,
        connectivity: Arc<dyn ConnectivityProbe>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(connector, model),
            dispatcher: MessageDispatcher::new(connectivity),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Rebuilds the session from the request's credential and history, then
    /// sends the turn.
    pub async fn run_turn(&mut self, request: TurnRequest) -> TurnOutcome {
        let TurnRequest {
            turn_id,
            credential,
            history,
            text,
            image,
        } = request;

        self.sessions.initialize_session(&credential, history);
        let result = self
            .dispatcher
            .send(&mut self.sessions, &text, image.as_deref())
            .await;
        debug!(%turn_id, ok = result.is_ok(), "turn settled");
        TurnOutcome { turn_id, result }
    }
}

/// Handle to the task that owns the [`Tutor`].
///
/// Requests are processed strictly one after another, so the session has a
/// single writer without any locking.
#[derive(Clone)]
pub struct TurnService {
    tx: mpsc::UnboundedSender<TurnRequest>,
}

impl TurnService {
    pub fn spawn(mut tutor: Tutor) -> (Self, mpsc::UnboundedReceiver<TurnOutcome>) {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<TurnRequest>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let outcome = tutor.run_turn(request).await;
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        (Self { tx: request_tx }, outcome_rx)
    }

    /// Queues a turn. Returns false when the worker has shut down.
    pub fn submit(&self, request: TurnRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::connectivity::StaticConnectivity;
    use crate::api::Part;
    use crate::utils::test_utils::{FakeConnector, FakeOutcome};

    fn request(credential: &str, history: Vec<Content>, text: &str) -> TurnRequest {
        TurnRequest {
            turn_id: "t".into(),
            credential: credential.into(),
            history,
            text: text.into(),
            image: None,
        }
    }

    #[test]
    fn start_applies_placeholders_for_image_only_turns() {
        let mut conversation = Conversation::new();
        let request = TurnRequest::start(
            &mut conversation,
            "key",
            "",
            Some("data:image/png;base64,AAAA".into()),
        );

        assert!(conversation.is_busy());
        assert!(request.history.is_empty());
        assert_eq!(request.text, crate::core::policy::IMAGE_ONLY_PROMPT);
        let recorded = conversation.messages().last().expect("user message");
        assert_eq!(recorded.id, request.turn_id);
        assert_eq!(recorded.content, crate::core::policy::IMAGE_ONLY_USER_TEXT);
        assert!(recorded.image.is_some());
    }

    #[tokio::test]
    async fn every_turn_reconnects_with_latest_credential() {
        let connector = FakeConnector::new(vec![
            FakeOutcome::Reply("one".into()),
            FakeOutcome::Reply("two".into()),
        ]);
        let mut tutor = Tutor::new(
            Arc::new(connector.clone()),
            Arc::new(StaticConnectivity(true)),
            "m",
        );

        tutor.run_turn(request("key-1", Vec::new(), "a")).await;
        let history = vec![
            Content::new("user", vec![Part::text("a")]),
            Content::new("model", vec![Part::text("one")]),
        ];
        let outcome = tutor.run_turn(request("key-2", history, "b")).await;

        assert_eq!(outcome.result.expect("reply"), "two");
        assert_eq!(
            connector.connections(),
            vec!["key-1".to_string(), "key-2".to_string()]
        );
        let calls = connector.calls();
        assert_eq!(calls[1].credential, "key-2");
        assert_eq!(calls[1].request.contents.len(), 3);
    }

    #[tokio::test]
    async fn service_processes_requests_in_order() {
        let connector = FakeConnector::new(vec![
            FakeOutcome::Reply("first".into()),
            FakeOutcome::Error("boom".into()),
        ]);
        let tutor = Tutor::new(
            Arc::new(connector),
            Arc::new(StaticConnectivity(true)),
            "m",
        );
        let (service, mut outcomes) = TurnService::spawn(tutor);

        assert!(service.submit(request("k", Vec::new(), "a")));
        assert!(service.submit(request("k", Vec::new(), "b")));

        let first = outcomes.recv().await.expect("first outcome");
        assert_eq!(first.result.expect("reply"), "first");
        let second = outcomes.recv().await.expect("second outcome");
        assert!(matches!(second.result, Err(DispatchError::Provider(_))));
    }
}
