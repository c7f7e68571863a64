use crate::controller::FeedbackSource;
use crate::ui::style as ui;
use anyhow::{Context, Result};
use dialoguer::Input;

/// Ask for the story request on the terminal. Blank input is allowed.
pub fn prompt_request() -> Result<String> {
    Input::<String>::new()
        .with_prompt("What bedtime story would you like?")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read story request from terminal")
}

/// Reads post-story feedback from the terminal.
pub struct TerminalFeedback;

impl FeedbackSource for TerminalFeedback {
    fn collect(&self, _final_story: &str) -> Result<Option<String>> {
        eprintln!(
            "{}",
            ui::dim("Optional: leave feedback to refine the story (press Enter to skip).")
        );
        eprintln!(
            "{}",
            ui::dim(
                "Examples: 'shorter', 'calmer', 'more funny', 'use a recurring character named Luna'"
            )
        );
        let feedback: String = Input::new()
            .with_prompt("Your feedback")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read feedback from terminal")?;
        Ok(Some(feedback))
    }
}
