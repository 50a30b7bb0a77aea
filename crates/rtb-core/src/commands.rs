/// Bot commands understood after the configured prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `stats [user]`: the named user's score, or the invoker's.
    Stats { target: Option<String> },
    Ping,
    /// Missing or unrecognized command token.
    Unknown,
}

/// Parse `content` as a command. `None` when it does not start with `prefix`.
///
/// The first whitespace-separated token carries the prefix; the second is the
/// command name. `<prefix>` alone parses as `Unknown`.
pub fn parse_command(content: &str, prefix: &str) -> Option<Command> {
    if !content.starts_with(prefix) {
        return None;
    }

    let mut tokens = content.split_whitespace();
    let _prefix_token = tokens.next();
    let Some(name) = tokens.next() else {
        return Some(Command::Unknown);
    };

    let cmd = match name {
        "stats" => Command::Stats {
            target: tokens.next().map(str::to_string),
        },
        "ping" => Command::Ping,
        _ => Command::Unknown,
    };
    Some(cmd)
}
