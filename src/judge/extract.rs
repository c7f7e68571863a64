use super::report::JudgeReport;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Judge output that contained no usable JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedReport {
    pub raw: String,
    pub reason: &'static str,
}

impl fmt::Display for MalformedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed judge output ({} chars): {}", self.raw.len(), self.reason)
    }
}

impl std::error::Error for MalformedReport {}

/// Locate a JSON object in `raw` and project it onto a [`JudgeReport`].
///
/// Candidates, in order: the whole text, the first balanced top-level
/// `{...}` region, the span from the first `{` to the last `}`. Only failing
/// to find an object is an error; field-level problems inside a found object
/// degrade silently (see the `coerce_*` helpers).
pub fn parse_report(raw: &str) -> Result<JudgeReport, MalformedReport> {
    let malformed = |reason| MalformedReport {
        raw: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty output"));
    }

    let mut candidates = vec![trimmed];
    if let Some(region) = first_balanced_object(trimmed) {
        candidates.push(region);
    }
    if let Some(region) = greedy_object_span(trimmed) {
        candidates.push(region);
    }

    let mut saw_non_object = false;
    for candidate in candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(obj)) => return Ok(report_from_object(&obj)),
            Ok(_) => saw_non_object = true,
            Err(_) => {}
        }
    }

    if saw_non_object {
        Err(malformed("json value is not an object"))
    } else if trimmed.contains('{') {
        Err(malformed("no parsable json object"))
    } else {
        Err(malformed("no json object in output"))
    }
}

/// Controller-facing extraction: malformed output becomes the default
/// (failed, targeted-revision) report.
pub fn extract_report(raw: &str) -> JudgeReport {
    parse_report(raw).unwrap_or_else(|malformed| {
        warn!(reason = malformed.reason, chars = malformed.raw.len(), "judge.malformed");
        JudgeReport::default()
    })
}

fn report_from_object(obj: &Map<String, Value>) -> JudgeReport {
    let mut hard_flags = coerce_string_list(obj.get("hard_flags"));
    let mut seen = std::collections::HashSet::new();
    hard_flags.retain(|flag| seen.insert(flag.clone()));

    JudgeReport {
        hard_flags,
        pass: coerce_bool(obj.get("pass")),
        rewrite_required: coerce_bool(obj.get("rewrite_required")),
        scores: coerce_scores(obj.get("scores")),
        issues: coerce_string_list(obj.get("issues")),
        revision_instructions: coerce_string_list(obj.get("revision_instructions")),
        one_sentence_verdict: coerce_text(obj.get("one_sentence_verdict")),
    }
}

fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_scores(value: Option<&Value>) -> BTreeMap<String, f64> {
    let Some(Value::Object(entries)) = value else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(name, raw)| {
            let score = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            score.is_finite().then(|| (name.clone(), score))
        })
        .collect()
}

fn coerce_text(value: Option<&Value>) -> String {
    value.and_then(scalar_to_string).unwrap_or_default()
}

/// First `{...}` region whose braces balance, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn greedy_object_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}
