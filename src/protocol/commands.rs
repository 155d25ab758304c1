//! Module `commands`
//!
//! Splits a raw control line into a verb and its argument, and maps the
//! verb onto the commands this server understands.

/// A control line split into `{verb, argument}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Upper-cased verb
    pub verb: String,
    /// Everything after the first space, trimmed
    pub argument: String,
}

/// Represents an FTP command parsed from the client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    User(String),
    Pass(String),
    /// The whole line, verb included, with the line ending removed
    Port(String),
    Type(String),
    List(Option<String>),
    Syst,
    Noop,
    Quit,
    Unknown(String),
}

/// Outcome of dispatching one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Continue,
    CloseConnection,
}

/// Splits a raw line on its first space. Returns `None` for a blank line.
pub fn tokenize(raw: &str) -> Option<CommandLine> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let (verb, argument) = match line.split_once(' ') {
        Some((verb, argument)) => (verb, argument),
        None => (line, ""),
    };

    let verb = verb.trim();
    if verb.is_empty() {
        return None;
    }

    Some(CommandLine {
        verb: verb.to_ascii_uppercase(),
        argument: argument.trim().to_string(),
    })
}

/// Parses a raw command string received from a client into the `Command` enum.
pub fn parse_command(raw: &str) -> Command {
    let Some(CommandLine { verb, argument }) = tokenize(raw) else {
        return Command::Unknown(String::new());
    };

    match verb.as_str() {
        "USER" => Command::User(argument),
        "PASS" => Command::Pass(argument),
        "PORT" => Command::Port(raw.trim_end_matches(['\r', '\n']).to_string()),
        "TYPE" => Command::Type(argument),
        "LIST" if argument.is_empty() => Command::List(None),
        "LIST" => Command::List(Some(argument)),
        "SYST" => Command::Syst,
        "NOOP" => Command::Noop,
        "QUIT" => Command::Quit,
        _ => Command::Unknown(verb),
    }
}
