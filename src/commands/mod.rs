mod registry;

pub use registry::{all_commands, CommandInvocation};

use std::path::PathBuf;

use directories::BaseDirs;

use crate::core::app::App;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

/// Runs a leading `/command`, or hands the input back to be sent as a
/// message. Unknown commands are sent as-is.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

/// `/help` lists every usage; `/help <command>` describes one command.
pub(super) fn handle_help(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let topic = invocation.args.trim_start_matches('/');
    if topic.is_empty() {
        let usages: Vec<&str> = all_commands().iter().map(|command| command.usage).collect();
        app.set_status(format!(
            "Commands: {} (/help <command> for details)",
            usages.join(", ")
        ));
    } else {
        match registry::find_command(topic) {
            Some(command) => app.set_status(format!("{}: {}", command.usage, command.help)),
            None => app.set_status(format!("Unknown command: /{topic}")),
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_image(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.set_status("Usage: /image <path>");
    } else {
        let path = expand_home(invocation.args.trim_matches(['"', '\'']));
        app.attach_image(&path);
    }
    CommandResult::Continue
}

pub(super) fn handle_detach(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.detach_image();
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();

    let result = match parts.len() {
        1 => app.logging.toggle_logging(),
        2 => app.logging.set_log_file(parts[1].to_string()),
        _ => Ok("Usage: /log [filename]".to_string()),
    };
    match result {
        Ok(message) => app.set_status(message),
        Err(e) => app.set_status(format!("Log error: {}", e)),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
