use crate::message::Message;

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Line written in place of turns when there is nothing to export.
pub const NO_HISTORY_LINE: &str = "No conversation history to export.";

const RULE_WIDTH: usize = 50;

/// Plain-text dump of a conversation, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

impl ExportArtifact {
    pub fn new(messages: &[Message], now: DateTime<Local>) -> Self {
        Self { file_name: format!("chat-export-{}.txt", now.format("%Y-%m-%d")), contents: render_report(messages, now) }
    }

    /// Write the artifact into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Render the header followed by numbered, labelled turns.
pub fn render_report(messages: &[Message], now: DateTime<Local>) -> String {
    let mut report = String::from("AI Chat Export\n");
    report.push_str(&format!("Date: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
    report.push_str(&"=".repeat(RULE_WIDTH));
    report.push_str("\n\n");

    if messages.is_empty() {
        report.push_str(NO_HISTORY_LINE);
        report.push('\n');
        return report;
    }

    for (i, message) in messages.iter().enumerate() {
        report.push_str(&format!("[{}] {}:\n{}\n\n", i + 1, message.role.display_label(), message.content));
    }

    report
}
