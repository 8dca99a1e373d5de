//! Parsing of the lines typed at the prompt.

use std::str::FromStr;

use serde_json::Value;

use crate::{error::ClientError, formatter::StateFormatter, mirror::StateMirror};

/// A command entered by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the mirrored state
    Show,
    /// Flip one light and publish the whole state
    Toggle { room: String, light: String },
    /// Switch one light on or off and publish the whole state
    Set {
        room: String,
        light: String,
        on: bool,
    },
    /// Publish arbitrary JSON as the new state
    Raw(Value),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  show                          print the current state
  toggle <room> <light>         flip a light and publish
  set <room> <light> on|off     switch a light and publish
  raw <json>                    publish any JSON as the full state
  help                          show this help
  quit                          exit
";

fn parse_switch(word: &str) -> Result<bool, ClientError> {
    match word {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(ClientError::InvalidCommand(format!(
            "expected on/off, got '{}'",
            other
        ))),
    }
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match (verb, args.as_slice()) {
            ("show", []) => Ok(Command::Show),
            ("help", []) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            ("toggle", [room, light]) => Ok(Command::Toggle {
                room: room.to_string(),
                light: light.to_string(),
            }),
            ("set", [room, light, switch]) => Ok(Command::Set {
                room: room.to_string(),
                light: light.to_string(),
                on: parse_switch(switch)?,
            }),
            ("raw", _) if !rest.is_empty() => serde_json::from_str(rest)
                .map(Command::Raw)
                .map_err(|e| ClientError::InvalidCommand(format!("invalid JSON: {}", e))),
            ("", _) => Err(ClientError::InvalidCommand("empty input".to_string())),
            _ => Err(ClientError::InvalidCommand(format!(
                "'{}' (type 'help' for usage)",
                line
            ))),
        }
    }
}

/// What the session does with a resolved command
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send this value as the full replacement state
    Publish(Value),
    /// Print locally, nothing is sent
    Print(String),
    Quit,
}

/// Resolve a command against the mirrored state.
///
/// Edits are applied to a copy of the mirror, so the published value is
/// always the whole state.
pub fn resolve_command(command: Command, mirror: &StateMirror) -> Result<Action, ClientError> {
    match command {
        Command::Show => Ok(Action::Print(match mirror.current() {
            Some(state) => StateFormatter::format_state("Current state", state),
            None => "No state received from the server yet\n".to_string(),
        })),
        Command::Help => Ok(Action::Print(HELP.to_string())),
        Command::Toggle { room, light } => mirror.toggled(&room, &light).map(Action::Publish),
        Command::Set { room, light, on } => mirror.switched(&room, &light, on).map(Action::Publish),
        Command::Raw(state) => Ok(Action::Publish(state)),
        Command::Quit => Ok(Action::Quit),
    }
}
