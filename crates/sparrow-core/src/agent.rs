//! Backend agent descriptors.
//!
//! Agents are reasoning components that live entirely in the backend service.
//! The console only selects which agent handles a session and renders the
//! results it streams back.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The backend agent responsible for a session or message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentType {
    /// General support chat agent.
    Primary,
    /// Log-file analysis agent.
    LogAnalysis,
    /// Multi-step research agent.
    Research,
}

impl Default for AgentType {
    fn default() -> Self {
        AgentType::Primary
    }
}

/// Agent descriptor as returned by the `/api/v1/agents` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_type: AgentType,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the backend currently accepts requests for this agent.
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_agent_type_round_trip() {
        assert_eq!(AgentType::from_str("log_analysis").unwrap(), AgentType::LogAnalysis);
        assert_eq!(AgentType::Research.to_string(), "research");
    }

    #[test]
    fn test_agent_info_defaults_available() {
        let info: AgentInfo = serde_json::from_str(
            r#"{"agent_type": "primary", "display_name": "Primary Agent"}"#,
        )
        .unwrap();
        assert!(info.available);
        assert!(info.description.is_none());
    }
}
