use super::*;
use crate::utils::test_utils::create_test_app;
use std::fs;
use tempfile::TempDir;

#[test]
fn plain_text_is_processed_as_message() {
    let mut app = create_test_app();
    match process_input(&mut app, "What is 2+2?") {
        CommandResult::ProcessAsMessage(text) => assert_eq!(text, "What is 2+2?"),
        _ => panic!("expected message"),
    }
}

#[test]
fn unknown_commands_are_sent_as_messages() {
    let mut app = create_test_app();
    assert!(matches!(
        process_input(&mut app, "/sqrt 16"),
        CommandResult::ProcessAsMessage(text) if text == "/sqrt 16"
    ));
    assert!(matches!(
        process_input(&mut app, "/"),
        CommandResult::ProcessAsMessage(_)
    ));
}

#[test]
fn help_lists_commands_in_status() {
    let mut app = create_test_app();
    assert!(matches!(
        process_input(&mut app, "/help"),
        CommandResult::Continue
    ));
    let status = app.status.clone().expect("status");
    for command in all_commands() {
        assert!(status.contains(command.usage));
    }
}

#[test]
fn help_with_a_topic_shows_its_description() {
    let mut app = create_test_app();
    process_input(&mut app, "/help /image");
    assert_eq!(
        app.status.as_deref(),
        Some("/image <path>: Attach a photo of a problem to the next message.")
    );

    process_input(&mut app, "/help nope");
    assert_eq!(app.status.as_deref(), Some("Unknown command: /nope"));
}

#[test]
fn image_and_detach_manage_the_attachment() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("worksheet.png");
    fs::write(&path, [0x89, b'P', b'N', b'G']).expect("write image");

    let mut app = create_test_app();
    let input = format!("/image {}", path.display());
    assert!(matches!(
        process_input(&mut app, &input),
        CommandResult::Continue
    ));
    let attachment = app.composer.attachment().expect("attached");
    assert_eq!(attachment.mime_type(), "image/png");

    process_input(&mut app, "/detach");
    assert!(app.composer.attachment().is_none());
    process_input(&mut app, "/detach");
    assert_eq!(app.status.as_deref(), Some("No image attached"));
}

#[test]
fn image_without_path_shows_usage() {
    let mut app = create_test_app();
    process_input(&mut app, "/IMAGE");
    assert_eq!(app.status.as_deref(), Some("Usage: /image <path>"));
    assert!(app.composer.attachment().is_none());
}

#[test]
fn log_command_sets_file_then_toggles() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tutor.log");
    let mut app = create_test_app();

    process_input(&mut app, "/log");
    assert!(app
        .status
        .as_deref()
        .is_some_and(|s| s.starts_with("Log error")));

    process_input(&mut app, &format!("/log {}", path.display()));
    assert!(app.logging.is_active());
    process_input(&mut app, "/log");
    assert!(!app.logging.is_active());
}

#[test]
fn quit_requests_exit() {
    let mut app = create_test_app();
    assert!(matches!(
        process_input(&mut app, "/quit"),
        CommandResult::Quit
    ));
}
