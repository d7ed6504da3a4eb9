//! Terminal rendering for messages, cards, and lists.

use colored::Colorize;
use sparrow_application::HealthState;
use sparrow_core::analysis::{LogAnalysisReport, ResearchStep};
use sparrow_core::backend::{ApiKeyInfo, LinkPreview, RateLimitStatus};
use sparrow_core::chat::{ChatMessage, ChatSession, MessageRole};
use sparrow_core::feedme::FeedMeConversation;

use crate::badge;
use crate::markdown;

/// Renders one chat message with role coloring and markdown post-processing.
pub fn message(message: &ChatMessage) -> String {
    let mut out = String::new();
    match message.role {
        MessageRole::User => {
            for line in message.content.lines() {
                out.push_str(&format!("{}\n", format!("> {line}").green()));
            }
        }
        MessageRole::Assistant => {
            let processed = markdown::process(&message.content);
            for line in processed.lines() {
                out.push_str(&format!("{}\n", line.bright_blue()));
            }
            if let Some(meta) = &message.metadata {
                if let Some(trace) = &meta.thinking_trace {
                    out.push_str(&format!("{}\n", "thinking:".bright_black()));
                    for line in trace.lines() {
                        out.push_str(&format!("{}\n", format!("  {line}").bright_black()));
                    }
                }
                for question in &meta.follow_up_questions {
                    out.push_str(&format!("{}\n", format!("? {question}").cyan()));
                }
            }
        }
        MessageRole::System => {
            for line in message.content.lines() {
                out.push_str(&format!("{}\n", line.yellow()));
            }
        }
    }
    out
}

/// Renders a research step as a one-liner.
pub fn step(step: &ResearchStep) -> String {
    let status = step.status.as_deref().unwrap_or("…");
    format!(
        "{} {}",
        format!("[{status}]").bright_magenta(),
        step.display_title()
    )
}

/// Renders a log-analysis report as a labeled card.
pub fn report(report: &LogAnalysisReport) -> String {
    let mut out = String::new();

    if let Some(completeness) = report.completeness {
        let percent = badge::completeness_percent(completeness);
        out.push_str(&format!(
            "{}\n",
            format!("completeness: {percent}%").bright_magenta()
        ));
    }
    if let Some(summary) = &report.summary {
        out.push_str(&format!("{}\n", markdown::process(summary).bright_blue()));
    }
    for issue in &report.issues {
        let severity = issue.severity.as_deref().unwrap_or("unknown");
        out.push_str(&format!(
            "{} {} ({severity})\n",
            "🚩".red(),
            issue.title.as_deref().unwrap_or("(untitled issue)")
        ));
        if let Some(details) = &issue.details {
            out.push_str(&format!("   {}\n", details.bright_black()));
        }
    }
    for solution in &report.solutions {
        out.push_str(&format!(
            "{} {}\n",
            "💡".yellow(),
            solution.title.as_deref().unwrap_or("(untitled solution)")
        ));
        if let Some(steps) = &solution.steps {
            for line in steps.lines() {
                out.push_str(&format!("   {line}\n"));
            }
        }
    }
    out
}

/// Renders the session picker list with the active marker.
pub fn sessions(sessions: &[ChatSession], active_id: Option<&str>) -> String {
    if sessions.is_empty() {
        return "No sessions yet. Start one with /new".bright_black().to_string();
    }

    let mut out = String::new();
    for (index, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id.as_str()) == active_id {
            "*".bright_green().to_string()
        } else {
            " ".to_string()
        };
        out.push_str(&format!(
            "{marker} {:>2}. {} {}\n",
            index + 1,
            session.title,
            format!("[{}]", session.agent_type).bright_black()
        ));
    }
    out
}

/// Renders a link preview card.
pub fn preview(preview: &LinkPreview) -> String {
    let mut out = String::new();
    if let Some(title) = &preview.title {
        out.push_str(&format!("{}\n", title.bold()));
    }
    if let Some(site) = &preview.site_name {
        out.push_str(&format!("{}\n", site.bright_black()));
    }
    if let Some(description) = &preview.description {
        out.push_str(&format!("{description}\n"));
    }
    if out.is_empty() {
        out.push_str(&"no preview available".bright_black().to_string());
    }
    out
}

/// Renders the FeedMe conversation list.
pub fn conversations(conversations: &[FeedMeConversation]) -> String {
    if conversations.is_empty() {
        return "No ingested conversations".bright_black().to_string();
    }

    let mut out = String::new();
    for conversation in conversations {
        out.push_str(&format!(
            "{} {} {} ({} examples)\n",
            conversation.id.bright_black(),
            conversation.title,
            format!("[{}]", conversation.processing_status).bright_magenta(),
            conversation.example_count
        ));
        if let Some(error) = &conversation.error_message {
            out.push_str(&format!("   {}\n", error.red()));
        }
    }
    out
}

/// Renders stored provider keys.
pub fn api_keys(keys: &[ApiKeyInfo]) -> String {
    if keys.is_empty() {
        return "No provider keys stored".bright_black().to_string();
    }
    keys.iter()
        .map(|key| format!("{}: {}", key.provider.bold(), key.masked_key))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the rate-limit window.
pub fn rate_limits(status: &RateLimitStatus) -> String {
    let mut out = format!(
        "{} of {} requests remaining",
        status.requests_remaining, status.requests_limit
    );
    if let Some(reset_at) = &status.reset_at {
        out.push_str(&format!(" (resets {reset_at})"));
    }
    out
}

/// Renders the health banner line.
pub fn health(state: &HealthState) -> String {
    match state {
        HealthState::Unknown => "backend: unknown".bright_black().to_string(),
        HealthState::Healthy { version } => match version {
            Some(version) => format!("backend: healthy ({version})").green().to_string(),
            None => "backend: healthy".green().to_string(),
        },
        HealthState::Unreachable { message } => format!(
            "{} {}",
            "backend unreachable:".red(),
            message
        ),
    }
}
