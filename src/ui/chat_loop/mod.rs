//! Main chat event loop
//!
//! Terminal events arrive from a reader task, finished turns from the
//! [`TurnService`] worker. Both feed the same loop, which owns the [`App`]
//! and redraws after every change.

mod lifecycle;

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::api::ProviderError;
use crate::auth::KeyringCredentials;
use crate::commands::{process_input, CommandResult};
use crate::core::app::{App, AppMode};
use crate::core::dispatcher::DispatchError;
use crate::core::tutor::{TurnOutcome, TurnRequest, TurnService, Tutor};
use crate::ui::renderer::ui;
use crate::utils::input::sanitize_text_input;

const PAGE_SCROLL_ROWS: u16 = 10;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// What the loop should do after a key press.
#[derive(Debug)]
pub(crate) enum KeyOutcome {
    Continue,
    Dispatch(TurnRequest),
    /// A key was accepted on the key screen and should be persisted.
    KeySelected(String),
    Quit,
}

fn save_key(app: &mut App, keyring: &KeyringCredentials, key: &str) {
    if let Err(err) = keyring.store(key) {
        warn!(error = %err, "could not save API key to keyring");
        app.set_status(format!("Key not saved ({err}); using it for this session"));
    }
}

fn handle_key_entry(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Enter => match app.submit_key() {
            Ok(credential) => return KeyOutcome::KeySelected(credential),
            Err(err) => app.set_status(err.to_string()),
        },
        KeyCode::Esc => {
            app.key_input.select_all();
            app.key_input.cut();
        }
        _ => {
            app.key_input.input(tui_textarea::Input::from(key));
        }
    }
    KeyOutcome::Continue
}

fn submit_composer(app: &mut App) -> KeyOutcome {
    let text = app.composer.text();
    match process_input(app, &text) {
        CommandResult::Continue => {
            app.composer.clear();
            KeyOutcome::Continue
        }
        CommandResult::ProcessAsMessage(_) => match app.submit() {
            Some(request) => KeyOutcome::Dispatch(request),
            None => KeyOutcome::Continue,
        },
        CommandResult::Quit => KeyOutcome::Quit,
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::PageUp => {
            app.scroll_up(PAGE_SCROLL_ROWS);
            return KeyOutcome::Continue;
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE_SCROLL_ROWS);
            return KeyOutcome::Continue;
        }
        KeyCode::Up if app.composer.is_empty() => {
            app.scroll_up(1);
            return KeyOutcome::Continue;
        }
        KeyCode::Down if app.composer.is_empty() => {
            app.scroll_down(1);
            return KeyOutcome::Continue;
        }
        _ => {}
    }

    // One request at a time: the composer ignores edits while a reply is pending
    if !app.input_enabled() {
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Esc => {
            app.composer.clear();
            KeyOutcome::Continue
        }
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.composer.textarea_mut().insert_newline();
            KeyOutcome::Continue
        }
        KeyCode::Enter => submit_composer(app),
        _ => {
            app.composer
                .textarea_mut()
                .input(tui_textarea::Input::from(key));
            KeyOutcome::Continue
        }
    }
}

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    match app.mode() {
        AppMode::KeyEntry => handle_key_entry(app, key),
        AppMode::Chat => handle_chat_key(app, key),
    }
}

pub(crate) fn handle_paste(app: &mut App, text: &str) {
    let sanitized = sanitize_text_input(text);
    match app.mode() {
        AppMode::KeyEntry => {
            app.key_input.insert_str(sanitized.trim());
        }
        AppMode::Chat if app.input_enabled() => {
            app.composer.textarea_mut().insert_str(&sanitized);
        }
        AppMode::Chat => {}
    }
}

/// Hands a request to the worker, settling it at once if the worker is gone
/// so the conversation never stays busy.
fn dispatch(app: &mut App, service: &TurnService, request: TurnRequest) {
    let turn_id = request.turn_id.clone();
    if !service.submit(request) {
        warn!("turn worker has stopped");
        app.settle(TurnOutcome {
            turn_id,
            result: Err(DispatchError::Provider(ProviderError::Other(
                "turn worker stopped".to_string(),
            ))),
        });
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // Use a short timeout to prevent blocking
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    service: &TurnService,
    outcomes: &mut mpsc::UnboundedReceiver<TurnOutcome>,
    keyring: &KeyringCredentials,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let reader = spawn_event_reader(event_tx);

    let result = loop {
        if let Err(err) = terminal.draw(|f| ui(f, app)) {
            break Err(err.into());
        }

        tokio::select! {
            Some(ev) = event_rx.recv() => match ev {
                UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    match handle_key(app, key) {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Dispatch(request) => dispatch(app, service, request),
                        KeyOutcome::KeySelected(credential) => {
                            info!("API key selected");
                            save_key(app, keyring, &credential);
                        }
                        KeyOutcome::Quit => app.exit_requested = true,
                    }
                }
                UiEvent::Crossterm(Event::Paste(text)) => handle_paste(app, &text),
                UiEvent::Crossterm(_) => {}
            },
            Some(outcome) = outcomes.recv() => app.settle(outcome),
            else => break Ok(()),
        }

        if app.exit_requested {
            break Ok(());
        }
    };

    reader.abort();
    result
}

/// Runs the interactive tutor until the user quits.
pub async fn run_chat(mut app: App, tutor: Tutor) -> Result<(), Box<dyn Error>> {
    let (service, mut outcomes) = TurnService::spawn(tutor);
    let keyring = KeyringCredentials::new();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &service, &mut outcomes, &keyring).await;
    restore_terminal(&mut terminal)?;

    if app.is_busy() {
        info!("exiting with a reply still pending");
    }
    result
}
