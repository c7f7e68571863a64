/// Source of the optional post-output feedback text.
///
/// Called once, after the user has seen a complete story. `Ok(None)` or a
/// blank string both mean "no feedback".
pub trait FeedbackSource: Send + Sync {
    fn collect(&self, final_story: &str) -> anyhow::Result<Option<String>>;
}

/// Never gives feedback.
pub struct NoFeedback;

impl FeedbackSource for NoFeedback {
    fn collect(&self, _final_story: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Fixed feedback text, for scripted runs and tests.
pub struct StaticFeedback(pub String);

impl StaticFeedback {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl FeedbackSource for StaticFeedback {
    fn collect(&self, _final_story: &str) -> anyhow::Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// Trimmed feedback, or `None` when there is nothing to act on.
pub(crate) fn normalize(feedback: Option<String>) -> Option<String> {
    feedback
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
