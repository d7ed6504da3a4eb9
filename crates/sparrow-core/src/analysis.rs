//! Result payloads produced by the log-analysis and research agents.
//!
//! These are free-form backend payloads rendered as-is. Every field is
//! defensive-optional so a newer backend cannot break older consoles.

use serde::{Deserialize, Serialize};

/// A single step in a research agent run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResearchStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Source URLs the step consulted, when the backend reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ResearchStep {
    /// Best display label for a step whose fields may all be absent.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("(untitled step)")
    }
}

/// An issue identified by the log-analysis agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A proposed solution from the log-analysis agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogSolution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Full log-analysis result attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogAnalysisReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<LogIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<LogSolution>,
    /// Analysis completeness as reported by the backend. May be a fraction
    /// in [0,1] or a whole percentage; normalization happens at render time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_decodes_from_sparse_payload() {
        let report: LogAnalysisReport =
            serde_json::from_str(r#"{"summary": "IMAP auth loop"}"#).unwrap();
        assert_eq!(report.summary.as_deref(), Some("IMAP auth loop"));
        assert!(report.issues.is_empty());
        assert!(report.completeness.is_none());
    }

    #[test]
    fn test_step_display_title_fallbacks() {
        let step = ResearchStep::default();
        assert_eq!(step.display_title(), "(untitled step)");

        let step = ResearchStep {
            description: Some("Reading KB".into()),
            ..Default::default()
        };
        assert_eq!(step.display_title(), "Reading KB");
    }
}
