//! Markdown post-processing for assistant responses.
//!
//! The backend agents emit verbose markdown; before rendering, the console
//! strips "Implementation Timeline" sections and prefixes recognized
//! headings with a section emoji so reports scan quickly in a terminal.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<level>#{1,6})\s+(?P<title>.+?)\s*$").unwrap());

/// Runs the full post-processing pipeline.
pub fn process(content: &str) -> String {
    inject_section_emojis(&strip_implementation_timeline(content))
}

/// Removes every "Implementation Timeline" section, case-insensitively.
///
/// A section spans its heading through (but not including) the next heading
/// of the same or higher level, or the end of the document.
pub fn strip_implementation_timeline(content: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping_below_level: Option<usize> = None;

    for line in content.lines() {
        if let Some(caps) = HEADING.captures(line) {
            let level = caps["level"].len();
            let title = caps["title"].to_lowercase();

            if let Some(section_level) = skipping_below_level {
                if level <= section_level {
                    skipping_below_level = None;
                } else {
                    continue;
                }
            }

            if title.contains("implementation timeline") {
                skipping_below_level = Some(level);
                continue;
            }
        } else if skipping_below_level.is_some() {
            continue;
        }

        kept.push(line);
    }

    kept.join("\n")
}

/// Prefixes recognized headings with a section emoji.
///
/// - `Executive Summary` → 📝
/// - issue-like headings (issue, problem, root cause) → 🚩
/// - solution-like headings (solution, recommendation, fix) → 💡
///
/// Headings that already start with one of the emojis are left alone.
pub fn inject_section_emojis(content: &str) -> String {
    let lines: Vec<String> = content
        .lines()
        .map(|line| {
            let Some(caps) = HEADING.captures(line) else {
                return line.to_string();
            };
            let title = &caps["title"];
            let Some(emoji) = emoji_for(title) else {
                return line.to_string();
            };
            if title.starts_with(emoji) {
                return line.to_string();
            }
            format!("{} {} {}", &caps["level"], emoji, title)
        })
        .collect();
    lines.join("\n")
}

fn emoji_for(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    if lower.contains("executive summary") {
        Some("📝")
    } else if lower.contains("issue") || lower.contains("problem") || lower.contains("root cause") {
        Some("🚩")
    } else if lower.contains("solution") || lower.contains("recommendation") || lower.contains("fix")
    {
        Some("💡")
    } else {
        None
    }
}
