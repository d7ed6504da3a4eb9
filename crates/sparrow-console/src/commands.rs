//! Slash-command parsing for the REPL.

use sparrow_core::agent::AgentType;
use std::path::PathBuf;
use std::str::FromStr;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List sessions.
    Sessions,
    /// Create a session with an optional title.
    New(Option<String>),
    /// Switch to the session at a 1-based list position.
    Switch(usize),
    /// Delete the session at a 1-based list position.
    Delete(usize),
    /// Rename the active session.
    Rename(String),
    /// Change the agent used for new sessions.
    Agent(AgentType),
    /// FeedMe subcommands.
    FeedMe(FeedMeCommand),
    /// Provider API key subcommands.
    Keys(KeysCommand),
    /// Show the rate-limit window.
    Limits,
    /// Fetch a link preview.
    Preview(String),
    /// Open the settings view on a tab.
    Settings(Option<String>),
    /// Resolve a web-style deep link.
    Open(String),
    /// Rate the last assistant message up or down.
    Feedback(bool),
    /// Log in.
    Login,
    /// Log out.
    Logout,
    /// Probe backend health (also the banner's manual retry).
    Health,
    /// Show command help.
    Help,
    /// Exit the console.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedMeCommand {
    List,
    Upload(PathBuf),
    Delete(String),
    Approve(String),
    Reject(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeysCommand {
    List,
    Save { provider: String, key: String },
    Delete(String),
}

/// Commands offered to rustyline completion.
pub const COMMAND_NAMES: &[&str] = &[
    "/sessions", "/new", "/switch", "/delete", "/rename", "/agent", "/feedme", "/keys", "/limits",
    "/preview", "/settings", "/open", "/feedback", "/login", "/logout", "/health", "/help",
];

/// Parses one input line into a command.
///
/// Returns `Ok(None)` when the line is plain chat input, `Err` with a usage
/// string when a slash command is malformed.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed == "quit" || trimmed == "exit" {
        return Ok(Some(Command::Quit));
    }
    if !trimmed.starts_with('/') {
        return Ok(None);
    }

    let mut parts = trimmed.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let command = match head {
        "/sessions" => Command::Sessions,
        "/new" => Command::New(join_opt(&rest)),
        "/switch" => Command::Switch(parse_index(&rest, "/switch <n>")?),
        "/delete" => Command::Delete(parse_index(&rest, "/delete <n>")?),
        "/rename" => {
            let title = join_opt(&rest).ok_or("usage: /rename <title>")?;
            Command::Rename(title)
        }
        "/agent" => {
            let name = rest.first().ok_or("usage: /agent <primary|log_analysis|research>")?;
            let agent = AgentType::from_str(name)
                .map_err(|_| format!("unknown agent type '{name}'"))?;
            Command::Agent(agent)
        }
        "/feedme" => Command::FeedMe(parse_feedme(&rest)?),
        "/keys" => Command::Keys(parse_keys(&rest)?),
        "/limits" => Command::Limits,
        "/preview" => {
            let url = rest.first().ok_or("usage: /preview <url>")?;
            Command::Preview(url.to_string())
        }
        "/settings" => Command::Settings(rest.first().map(|tab| tab.to_string())),
        "/open" => {
            let path = rest.first().ok_or("usage: /open <path>")?;
            Command::Open(path.to_string())
        }
        "/feedback" => match rest.first() {
            Some(&"up") => Command::Feedback(true),
            Some(&"down") => Command::Feedback(false),
            _ => return Err("usage: /feedback <up|down>".to_string()),
        },
        "/login" => Command::Login,
        "/logout" => Command::Logout,
        "/health" => Command::Health,
        "/help" => Command::Help,
        other => return Err(format!("unknown command '{other}', try /help")),
    };
    Ok(Some(command))
}

fn parse_feedme(rest: &[&str]) -> Result<FeedMeCommand, String> {
    const USAGE: &str = "usage: /feedme <list|upload <file>|delete <id>|approve <id>|reject <id>>";
    match rest {
        [] | ["list"] => Ok(FeedMeCommand::List),
        ["upload", path] => Ok(FeedMeCommand::Upload(PathBuf::from(path))),
        ["delete", id] => Ok(FeedMeCommand::Delete(id.to_string())),
        ["approve", id] => Ok(FeedMeCommand::Approve(id.to_string())),
        ["reject", id] => Ok(FeedMeCommand::Reject(id.to_string())),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_keys(rest: &[&str]) -> Result<KeysCommand, String> {
    const USAGE: &str = "usage: /keys <list|save <provider> <key>|delete <provider>>";
    match rest {
        [] | ["list"] => Ok(KeysCommand::List),
        ["save", provider, key] => Ok(KeysCommand::Save {
            provider: provider.to_string(),
            key: key.to_string(),
        }),
        ["delete", provider] => Ok(KeysCommand::Delete(provider.to_string())),
        _ => Err(USAGE.to_string()),
    }
}

fn join_opt(rest: &[&str]) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

fn parse_index(rest: &[&str], usage: &str) -> Result<usize, String> {
    rest.first()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|index| *index >= 1)
        .ok_or_else(|| format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat_input() {
        assert_eq!(parse("why is sync failing?").unwrap(), None);
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!(parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_new_with_title() {
        assert_eq!(
            parse("/new Stuck outbox ticket").unwrap(),
            Some(Command::New(Some("Stuck outbox ticket".to_string())))
        );
        assert_eq!(parse("/new").unwrap(), Some(Command::New(None)));
    }

    #[test]
    fn test_switch_requires_valid_index() {
        assert_eq!(parse("/switch 2").unwrap(), Some(Command::Switch(2)));
        assert!(parse("/switch").is_err());
        assert!(parse("/switch zero").is_err());
        assert!(parse("/switch 0").is_err());
    }

    #[test]
    fn test_agent_parsing() {
        assert_eq!(
            parse("/agent research").unwrap(),
            Some(Command::Agent(AgentType::Research))
        );
        assert!(parse("/agent psychic").is_err());
    }

    #[test]
    fn test_feedme_subcommands() {
        assert_eq!(
            parse("/feedme").unwrap(),
            Some(Command::FeedMe(FeedMeCommand::List))
        );
        assert_eq!(
            parse("/feedme upload /tmp/ticket.txt").unwrap(),
            Some(Command::FeedMe(FeedMeCommand::Upload(PathBuf::from(
                "/tmp/ticket.txt"
            ))))
        );
        assert!(parse("/feedme teleport x").is_err());
    }

    #[test]
    fn test_keys_subcommands() {
        assert_eq!(
            parse("/keys save gemini sk-123").unwrap(),
            Some(Command::Keys(KeysCommand::Save {
                provider: "gemini".to_string(),
                key: "sk-123".to_string(),
            }))
        );
        assert!(parse("/keys save gemini").is_err());
    }

    #[test]
    fn test_unknown_command_errors() {
        assert!(parse("/frobnicate").is_err());
    }
}
