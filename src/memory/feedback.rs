use super::preferences::PreferenceMemory;

const NAMED: &str = "named";
const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 20;

/// Map explicit feedback onto preferences.
///
/// Matching is plain keyword lookup on the lower-cased text, plus a
/// `named <Name>` pattern for the recurring character. Fields the feedback
/// does not mention keep their prior value; nothing is cleared.
pub fn apply_feedback(memory: &PreferenceMemory, feedback: &str) -> PreferenceMemory {
    let mut updated = memory.clone();
    let lowered = feedback.to_lowercase();

    if lowered.contains("short") {
        updated.preferred_length = Some("short".into());
    } else if lowered.contains("long") {
        updated.preferred_length = Some("long".into());
    } else if lowered.contains("medium") {
        updated.preferred_length = Some("medium".into());
    }

    if lowered.contains("calm") || lowered.contains("cozy") {
        updated.preferred_tone = Some("calmer".into());
    } else if lowered.contains("funny") || lowered.contains("humor") {
        updated.preferred_tone = Some("funnier".into());
    }

    if let Some(name) = named_character(feedback) {
        updated.recurring_character = Some(name);
    }

    updated
}

/// First `named` followed by whitespace and 2-20 ASCII letters. The name is
/// taken from the original text so its casing survives.
fn named_character(text: &str) -> Option<String> {
    text.match_indices(NAMED).find_map(|(idx, _)| {
        let rest = &text[idx + NAMED.len()..];
        let after_space = rest.trim_start();
        if after_space.len() == rest.len() {
            return None;
        }
        let name: String = after_space
            .chars()
            .take_while(char::is_ascii_alphabetic)
            .take(NAME_MAX_LEN)
            .collect();
        (name.len() >= NAME_MIN_LEN).then_some(name)
    })
}
