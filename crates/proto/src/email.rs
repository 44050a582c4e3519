//! Inbound email document and reviewer-facing rendering.

use serde::{Deserialize, Serialize};

/// The raw email the assistant is triaging/answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailInput {
    /// Sender address or display name.
    pub author: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Full thread body.
    pub email_thread: String,
}

impl EmailInput {
    /// Renders the email as a markdown block for review surfaces and
    /// model prompts.
    pub fn format_markdown(&self) -> String {
        format!(
            "\n**Subject**: {}\n**From**: {}\n**To**: {}\n\n{}\n\n---\n",
            self.subject, self.author, self.to, self.email_thread
        )
    }

    /// Renders the contextual prefix payload builders prepend to their
    /// descriptions.
    pub fn context_block(&self) -> String {
        format!("Original email:\n{}", self.format_markdown())
    }
}
