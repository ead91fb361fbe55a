use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "List the available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "image",
        usage: "/image <path>",
        help: "Attach a photo of a problem to the next message.",
        handler: super::handle_image,
    },
    Command {
        name: "detach",
        usage: "/detach",
        help: "Remove the attached image.",
        handler: super::handle_detach,
    },
    Command {
        name: "log",
        usage: "/log [file]",
        help: "Toggle transcript logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the tutor.",
        handler: super::handle_quit,
    },
];
