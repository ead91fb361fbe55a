use super::*;
use std::sync::Arc;

use crate::api::connectivity::StaticConnectivity;
use crate::core::message::{Role, WELCOME_ID};
use crate::core::policy::{EMPTY_REPLY_TEXT, ERROR_REPLY_TEXT, IMAGE_ONLY_PROMPT};
use crate::core::tutor::Tutor;
use crate::utils::test_utils::{
    create_test_app, create_test_app_without_credential, FakeConnector, FakeOutcome,
    TINY_IMAGE_DATA_URI,
};

fn tutor(connector: &FakeConnector, online: bool) -> Tutor {
    Tutor::new(
        Arc::new(connector.clone()),
        Arc::new(StaticConnectivity(online)),
        "gemini-test",
    )
}

#[test]
fn submit_without_credential_only_sets_status() {
    let mut app = create_test_app_without_credential();
    app.composer.set_text("What is 2+2?");

    assert_eq!(app.mode(), AppMode::KeyEntry);
    assert!(app.submit().is_none());
    assert_eq!(app.status.as_deref(), Some(NO_CREDENTIAL_STATUS));
    assert_eq!(app.conversation.messages().len(), 1);
    assert!(!app.is_busy());
    assert_eq!(app.composer.text(), "What is 2+2?");
}

#[test]
fn composer_is_disabled_while_a_reply_is_pending() {
    let mut app = create_test_app();
    app.composer.set_text("first");
    assert!(app.input_enabled());
    assert!(app.submit().is_some());

    assert!(!app.input_enabled());
    app.composer.set_text("second");
    assert!(app.submit().is_none());
    assert_eq!(app.conversation.messages().len(), 2);
    assert_eq!(app.composer.text(), "second");
}

#[test]
fn blank_submission_is_ignored() {
    let mut app = create_test_app();
    app.composer.set_text("  ");
    assert!(app.submit().is_none());
    assert!(!app.is_busy());
    assert_eq!(app.conversation.messages().len(), 1);
}

#[test]
fn submitted_text_keeps_its_whitespace() {
    let mut app = create_test_app();
    app.composer.set_text("    indented code\n  y = 2  ");

    let request = app.submit().expect("turn request");
    assert_eq!(request.text, "    indented code\n  y = 2  ");
    let recorded = app.conversation.messages().last().expect("user message");
    assert_eq!(recorded.content, "    indented code\n  y = 2  ");
}

#[tokio::test]
async fn text_turn_round_trip() {
    let connector = FakeConnector::new(vec![FakeOutcome::Reply("Step 1: ...".into())]);
    let mut tutor = tutor(&connector, true);
    let mut app = create_test_app();

    app.composer.set_text("What is 2+2?");
    let request = app.submit().expect("turn request");
    assert!(app.is_busy());
    assert_eq!(request.credential, "test-key");
    assert!(request.history.is_empty());

    let outcome = tutor.run_turn(request).await;
    app.settle(outcome);

    let messages = app.conversation.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].id, WELCOME_ID);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "What is 2+2?");
    assert_eq!(messages[2].role, Role::Model);
    assert_eq!(messages[2].content, "Step 1: ...");
    assert!(!messages[2].is_error);
    assert!(!app.is_busy());

    let calls = connector.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gemini-test");
    let sent = &calls[0].request.contents;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].parts[0].text.as_deref(), Some("What is 2+2?"));
}

#[tokio::test]
async fn image_only_turn_sends_image_before_solve_prompt() {
    let connector = FakeConnector::new(vec![FakeOutcome::Reply("Let's look.".into())]);
    let mut tutor = tutor(&connector, true);
    let mut app = create_test_app();

    app.composer.attach(Attachment {
        path: "problem.jpg".into(),
        data_uri: TINY_IMAGE_DATA_URI.to_string(),
    });
    let request = app.submit().expect("turn request");
    app.settle(tutor.run_turn(request).await);

    let calls = connector.calls();
    let parts = &calls[0].request.contents[0].parts;
    assert_eq!(parts.len(), 2);
    assert!(parts[0].is_inline_data());
    assert_eq!(
        parts[0].inline_data.as_ref().map(|d| d.data.as_str()),
        Some("/9j/4AAQSkZJRgABAQ==")
    );
    assert_eq!(parts[1].text.as_deref(), Some(IMAGE_ONLY_PROMPT));
    assert!(app.composer.attachment().is_none());
}

#[tokio::test]
async fn offline_turn_appends_error_without_calling_provider() {
    let connector = FakeConnector::new(Vec::new());
    let mut tutor = tutor(&connector, false);
    let mut app = create_test_app();

    app.composer.set_text("hello");
    let request = app.submit().expect("turn request");
    app.settle(tutor.run_turn(request).await);

    let last = app.conversation.messages().last().expect("error bubble");
    assert!(last.is_error);
    assert_eq!(last.role, Role::Model);
    assert_eq!(last.content, ERROR_REPLY_TEXT);
    assert!(!app.is_busy());
    assert!(connector.calls().is_empty());
}

#[tokio::test]
async fn failed_turns_are_left_out_of_later_history() {
    let connector = FakeConnector::new(vec![
        FakeOutcome::Error("quota exceeded".into()),
        FakeOutcome::Empty,
    ]);
    let mut tutor = tutor(&connector, true);
    let mut app = create_test_app();

    app.composer.set_text("first");
    let request = app.submit().expect("first turn");
    app.settle(tutor.run_turn(request).await);
    assert!(app.conversation.messages()[2].is_error);

    app.composer.set_text("second");
    let request = app.submit().expect("second turn");
    // The failed turn's user message stays, its error bubble does not.
    assert_eq!(request.history.len(), 1);
    app.settle(tutor.run_turn(request).await);

    let last = app.conversation.messages().last().expect("reply");
    assert_eq!(last.content, EMPTY_REPLY_TEXT);
    assert!(!last.is_error);
}

#[test]
fn submit_key_validates_and_enters_chat() {
    let mut app = create_test_app_without_credential();
    app.key_input.insert_str("   ");
    assert!(matches!(app.submit_key(), Err(AuthError::EmptyKey)));
    assert_eq!(app.mode(), AppMode::KeyEntry);

    app.key_input = key_textarea(&app.theme);
    app.key_input.insert_str(" AIzaSyExample ");
    assert_eq!(app.submit_key().expect("key"), "AIzaSyExample");
    assert_eq!(app.mode(), AppMode::Chat);
    assert_eq!(app.credential(), Some("AIzaSyExample"));
    assert!(app.key_input.lines().join("").is_empty());
}

#[test]
fn attaching_a_missing_file_reports_status() {
    let mut app = create_test_app();
    app.attach_image(Path::new("/definitely/not/here.png"));
    assert!(app.composer.attachment().is_none());
    assert!(app
        .status
        .as_deref()
        .is_some_and(|s| s.starts_with("Failed to read")));
}

#[test]
fn scroll_is_clamped_to_transcript_height() {
    let mut app = create_test_app();
    app.scroll_up(50);
    assert_eq!(app.clamp_scroll(10), 0);
    assert_eq!(app.scroll_from_bottom, 10);
    app.scroll_down(3);
    assert_eq!(app.clamp_scroll(10), 3);
    app.scroll_to_bottom();
    assert_eq!(app.clamp_scroll(10), 10);
}
