use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tracing_subscriber::EnvFilter;

use sparrow_application::{
    AuthService, ChatService, FeedMeService, HealthService, RouteDecision, SessionService,
    decide_route,
};
use sparrow_client::{
    AgentApi, AgentsApi, ApiClient, ApiKeysApi, AuthApi, FeedMeApi, HealthApi, MetadataApi,
    RateLimitsApi, RequestManager, SessionsApi,
};
use sparrow_core::agent::AgentType;
use sparrow_core::auth::LoginCredentials;
use sparrow_core::backend::SaveApiKey;
use sparrow_core::chat::{FeedbackRating, MessageRole, StreamEvent};
use sparrow_core::error::SparrowError;
use sparrow_infrastructure::{ConfigStorage, SecretStorage};

mod badge;
mod commands;
mod markdown;
mod render;

use commands::{COMMAND_NAMES, Command, FeedMeCommand, KeysCommand};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Everything the command handlers need.
struct Console {
    sessions: SessionService,
    chat: ChatService,
    auth: AuthService,
    feedme: FeedMeService,
    health: HealthService,
    agents: AgentsApi,
    api_keys: ApiKeysApi,
    rate_limits: RateLimitsApi,
    metadata: MetadataApi,
    /// Agent used for newly created sessions.
    default_agent: tokio::sync::RwLock<AgentType>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sparrow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let config_storage = ConfigStorage::new()?;
    config_storage.ensure_exists()?;
    let config = config_storage.load()?.apply_env_overrides();

    let client = ApiClient::new(&config)?;
    let requests = RequestManager::new();
    let sweeper = requests.spawn_sweeper();

    let secrets = Arc::new(SecretStorage::new()?);
    let auth = AuthService::new(
        Arc::new(AuthApi::new(client.clone())),
        secrets,
        client.clone(),
        config.auth_bypass,
    );

    let console = Console {
        sessions: SessionService::new(Arc::new(SessionsApi::new(client.clone()))),
        chat: ChatService::new(Arc::new(AgentApi::new(client.clone())), requests.clone()),
        auth,
        feedme: FeedMeService::new(Arc::new(FeedMeApi::new(client.clone()))),
        health: HealthService::new(Arc::new(HealthApi::new(client.clone()))),
        agents: AgentsApi::new(client.clone()),
        api_keys: ApiKeysApi::new(client.clone()),
        rate_limits: RateLimitsApi::new(client.clone()),
        metadata: MetadataApi::new(client.clone()),
        default_agent: tokio::sync::RwLock::new(AgentType::Primary),
    };

    println!("{}", "=== MB-Sparrow Console ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, /help for commands, or 'quit' to exit.".bright_black()
    );

    // Health banner and stored-token restore
    println!("{}", render::health(&console.health.check().await));
    match console.auth.bootstrap().await {
        Ok(true) => {
            if let Ok(session) = console.auth.current().await {
                println!("{}", format!("Logged in as {}", session.email).green());
                let _ = console.sessions.refresh().await;
            } else {
                println!("{}", "Stored token rejected, use /login".yellow());
            }
        }
        Ok(false) => println!("{}", "Not logged in, use /login".yellow()),
        Err(err) => println!("{}", format!("Failed to read secrets: {err}").red()),
    }
    println!();

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match commands::parse(trimmed) {
                    Ok(Some(Command::Quit)) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(Some(command)) => handle_command(&console, command).await,
                    Ok(None) => handle_chat(&console, trimmed).await,
                    Err(usage) => println!("{}", usage.yellow()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    sweeper.abort();
    Ok(())
}

/// Sends plain input as a chat message on the active session.
async fn handle_chat(console: &Console, text: &str) {
    if !console.auth.is_authenticated().await {
        println!("{}", "Not logged in, use /login first".yellow());
        return;
    }

    let session = match console.sessions.active().await {
        Some(session) => session,
        None => {
            // No active session: create one named after the first words.
            let title: String = text.split_whitespace().take(5).collect::<Vec<_>>().join(" ");
            match console
                .sessions
                .create(title, *console.default_agent.read().await)
                .await
            {
                Ok(session) => {
                    println!(
                        "{}",
                        format!("Started session '{}'", session.title).bright_black()
                    );
                    session
                }
                Err(err) => {
                    report_error(&err);
                    return;
                }
            }
        }
    };

    println!("{}", format!("> {text}").green());

    let result = console
        .chat
        .send(&session.id, text, session.agent_type, |event| match event {
            StreamEvent::Step(step) => println!("{}", render::step(step)),
            StreamEvent::Message(_) => {}
        })
        .await;

    match result {
        Ok(outcome) => {
            for message in &outcome.new_messages {
                print!("{}", render::message(message));
            }
            if outcome.new_messages.is_empty() {
                println!("{}", "(no response)".bright_black());
            }
        }
        Err(err) if err.is_cancelled() => {
            println!("{}", "Request superseded".bright_black());
        }
        Err(err) => report_error(&err),
    }
}

async fn handle_command(console: &Console, command: Command) {
    match command {
        Command::Sessions => match console.sessions.refresh().await {
            Ok(_) => {
                let list = console.sessions.sessions().await;
                let active = console.sessions.active_id().await;
                print!("{}", render::sessions(&list, active.as_deref()));
            }
            Err(err) => report_error(&err),
        },
        Command::New(title) => {
            let title = title.unwrap_or_else(|| "New conversation".to_string());
            match console
                .sessions
                .create(title, *console.default_agent.read().await)
                .await
            {
                Ok(session) => println!(
                    "{}",
                    format!("Created and switched to '{}'", session.title).green()
                ),
                Err(err) => report_error(&err),
            }
        }
        Command::Switch(index) => {
            let list = console.sessions.sessions().await;
            match list.get(index - 1) {
                Some(session) => match console.sessions.select(&session.id).await {
                    Ok(session) => {
                        println!("{}", format!("Switched to '{}'", session.title).green());
                        let transcript = console.chat.transcript(&session.id).await;
                        for message in &transcript.messages {
                            print!("{}", render::message(message));
                        }
                    }
                    Err(err) => report_error(&err),
                },
                None => println!("{}", "No session at that position".yellow()),
            }
        }
        Command::Delete(index) => {
            let list = console.sessions.sessions().await;
            match list.get(index - 1) {
                Some(session) => {
                    let id = session.id.clone();
                    match console.sessions.delete(&id).await {
                        Ok(()) => {
                            console.chat.forget(&id).await;
                            println!("{}", "Session deleted".green());
                        }
                        Err(err) => report_error(&err),
                    }
                }
                None => println!("{}", "No session at that position".yellow()),
            }
        }
        Command::Rename(title) => match console.sessions.active_id().await {
            Some(id) => match console.sessions.rename(&id, &title).await {
                Ok(session) => println!("{}", format!("Renamed to '{}'", session.title).green()),
                Err(err) => report_error(&err),
            },
            None => println!("{}", "No active session".yellow()),
        },
        Command::Agent(agent_type) => {
            *console.default_agent.write().await = agent_type;
            match console.agents.list().await {
                Ok(agents) => {
                    let known = agents
                        .iter()
                        .any(|info| info.agent_type == agent_type && info.available);
                    if !known {
                        println!(
                            "{}",
                            "Warning: backend does not list this agent as available".yellow()
                        );
                    }
                }
                Err(err) => tracing::debug!(error = %err, "agent listing failed"),
            }
            println!(
                "{}",
                format!("New sessions will use the {agent_type} agent").green()
            );
        }
        Command::FeedMe(subcommand) => handle_feedme(console, subcommand).await,
        Command::Keys(subcommand) => handle_keys(console, subcommand).await,
        Command::Limits => match console.rate_limits.status().await {
            Ok(status) => println!("{}", render::rate_limits(&status)),
            Err(err) => report_error(&err),
        },
        Command::Preview(url) => match console.metadata.link_preview(&url).await {
            Ok(preview) => print!("{}", render::preview(&preview)),
            Err(err) => report_error(&err),
        },
        Command::Settings(tab) => {
            let tab = tab.unwrap_or_else(|| "general".to_string());
            show_settings(console, &tab).await;
        }
        Command::Open(path) => {
            let (path, query) = match path.split_once('?') {
                Some((path, query)) => (path.to_string(), query.to_string()),
                None => (path, String::new()),
            };
            let authenticated = console.auth.is_authenticated().await;
            match decide_route(&path, &query, authenticated) {
                RouteDecision::Allow => println!("{}", format!("Opening {path}").green()),
                RouteDecision::Redirect { to } => {
                    if let Some(tab) = to.strip_prefix("/?settings=") {
                        show_settings(console, tab).await;
                    } else {
                        println!("{}", format!("Redirecting to {to}").yellow());
                    }
                }
                RouteDecision::Gone { message } => {
                    println!("{}", format!("410 Gone: {message}").red())
                }
            }
        }
        Command::Feedback(positive) => {
            let rating = if positive {
                FeedbackRating::Positive
            } else {
                FeedbackRating::Negative
            };
            let Some(session_id) = console.sessions.active_id().await else {
                println!("{}", "No active session".yellow());
                return;
            };
            let transcript = console.chat.transcript(&session_id).await;
            let Some(last) = transcript
                .messages
                .iter()
                .rev()
                .find(|message| message.role == MessageRole::Assistant)
            else {
                println!("{}", "No assistant message to rate".yellow());
                return;
            };
            match console
                .chat
                .attach_feedback(&session_id, &last.id, rating)
                .await
            {
                Ok(()) => println!("{}", "Feedback recorded".green()),
                Err(err) => report_error(&err),
            }
        }
        Command::Login => handle_login(console).await,
        Command::Logout => match console.auth.logout().await {
            Ok(()) => println!("{}", "Logged out".green()),
            Err(err) => report_error(&err),
        },
        Command::Health => println!("{}", render::health(&console.health.check().await)),
        Command::Help => print_help(),
        // Quit is intercepted by the REPL loop before dispatch.
        Command::Quit => {}
    }
}

async fn handle_feedme(console: &Console, subcommand: FeedMeCommand) {
    match subcommand {
        FeedMeCommand::List => match console.feedme.list().await {
            Ok(list) => print!("{}", render::conversations(&list)),
            Err(err) => report_error(&err),
        },
        FeedMeCommand::Upload(path) => match console.feedme.upload_file(&path).await {
            Ok(conversation) => println!(
                "{}",
                format!(
                    "Uploaded '{}' ({})",
                    conversation.title, conversation.processing_status
                )
                .green()
            ),
            Err(err) => report_error(&err),
        },
        FeedMeCommand::Delete(id) => match console.feedme.delete(&id).await {
            Ok(()) => println!("{}", "Conversation deleted".green()),
            Err(err) => report_error(&err),
        },
        FeedMeCommand::Approve(id) => match console.feedme.approve(&id).await {
            Ok(conversation) => println!(
                "{}",
                format!("Approved, now {}", conversation.processing_status).green()
            ),
            Err(err) => report_error(&err),
        },
        FeedMeCommand::Reject(id) => match console.feedme.reject(&id).await {
            Ok(conversation) => println!(
                "{}",
                format!("Rejected, now {}", conversation.processing_status).green()
            ),
            Err(err) => report_error(&err),
        },
    }
}

async fn handle_keys(console: &Console, subcommand: KeysCommand) {
    match subcommand {
        KeysCommand::List => match console.api_keys.list().await {
            Ok(keys) => println!("{}", render::api_keys(&keys)),
            Err(err) => report_error(&err),
        },
        KeysCommand::Save { provider, key } => {
            match console
                .api_keys
                .save(SaveApiKey {
                    provider,
                    api_key: key,
                })
                .await
            {
                Ok(info) => println!(
                    "{}",
                    format!("Stored key for {}: {}", info.provider, info.masked_key).green()
                ),
                Err(err) => report_error(&err),
            }
        }
        KeysCommand::Delete(provider) => match console.api_keys.delete(&provider).await {
            Ok(()) => println!("{}", "Key deleted".green()),
            Err(err) => report_error(&err),
        },
    }
}

async fn handle_login(console: &Console) {
    let email = match prompt_line("email: ") {
        Some(email) => email,
        None => return,
    };
    let password = match prompt_line("password: ") {
        Some(password) => password,
        None => return,
    };

    match console
        .auth
        .login(&LoginCredentials { email, password })
        .await
    {
        Ok(session) => {
            println!("{}", format!("Logged in as {}", session.email).green());
            let _ = console.sessions.refresh().await;
        }
        Err(err) if err.is_auth() => println!("{}", "Invalid credentials".red()),
        Err(err) => report_error(&err),
    }
}

/// Shows the settings view for a tab, fetching what it displays.
async fn show_settings(console: &Console, tab: &str) {
    println!("{}", format!("--- settings: {tab} ---").bright_magenta());
    match tab {
        "api-keys" => handle_keys(console, KeysCommand::List).await,
        "limits" => match console.rate_limits.status().await {
            Ok(status) => println!("{}", render::rate_limits(&status)),
            Err(err) => report_error(&err),
        },
        "agents" => match console.agents.list().await {
            Ok(agents) => {
                for info in agents {
                    let marker = if info.available { "+" } else { "-" };
                    println!(
                        "{marker} {} {}",
                        info.display_name,
                        format!("[{}]", info.agent_type).bright_black()
                    );
                }
            }
            Err(err) => report_error(&err),
        },
        _ => println!(
            "{}",
            "Available tabs: general, api-keys, limits, agents".bright_black()
        ),
    }
}

/// Prints an error inline; auth failures also point at the login flow.
fn report_error(err: &SparrowError) {
    if err.is_auth() {
        println!("{}", format!("{err}").red());
        println!("{}", "Session expired or missing, use /login".yellow());
        return;
    }
    if let SparrowError::RateLimited { retry_after, .. } = err {
        let hint = retry_after
            .map(|secs| format!(" (retry in {secs}s)"))
            .unwrap_or_default();
        println!("{}", format!("{err}{hint}").red());
        return;
    }
    println!("{}", format!("{err}").red());
}

fn prompt_line(prompt: &str) -> Option<String> {
    use std::io::Write;
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let trimmed = line.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn print_help() {
    let entries = [
        ("<text>", "send a chat message on the active session"),
        ("/sessions", "list sessions"),
        ("/new [title]", "create a session and switch to it"),
        ("/switch <n>", "switch to the n-th listed session"),
        ("/delete <n>", "delete the n-th listed session"),
        ("/rename <title>", "rename the active session"),
        ("/agent <type>", "agent for new sessions (primary|log_analysis|research)"),
        ("/feedme ...", "transcript ingestion (list|upload|delete|approve|reject)"),
        ("/keys ...", "provider API keys (list|save|delete)"),
        ("/limits", "show the rate-limit window"),
        ("/preview <url>", "fetch link preview metadata"),
        ("/settings [tab]", "open a settings tab"),
        ("/open <path>", "resolve a web-style deep link"),
        ("/feedback <up|down>", "rate the last assistant message"),
        ("/login | /logout", "operator session"),
        ("/health", "probe the backend (manual retry)"),
        ("quit", "exit"),
    ];
    for (command, description) in entries {
        println!("{:<22} {}", command.bright_cyan(), description);
    }
}
