use serde::{Deserialize, Serialize};

/// Style preferences the user stated explicitly through feedback.
///
/// Nothing here is ever inferred from generated stories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceMemory {
    #[serde(default)]
    pub preferred_length: Option<String>,
    #[serde(default)]
    pub preferred_tone: Option<String>,
    #[serde(default)]
    pub recurring_character: Option<String>,
}

impl PreferenceMemory {
    pub fn is_empty(&self) -> bool {
        self.preferred_length.is_none()
            && self.preferred_tone.is_none()
            && self.recurring_character.is_none()
    }

    /// `key=value` pairs for the interpreter prompt, or `(none)`.
    pub fn to_prompt_text(&self) -> String {
        let parts: Vec<String> = [
            ("preferred_length", &self.preferred_length),
            ("preferred_tone", &self.preferred_tone),
            ("recurring_character", &self.recurring_character),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| format!("{key}={v}")))
        .collect();

        if parts.is_empty() {
            "(none)".to_string()
        } else {
            parts.join(", ")
        }
    }
}
