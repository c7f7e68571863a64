use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One judge verdict, projected from untrusted model output.
///
/// `Default` is the degraded verdict: not passed, no rewrite demanded, nothing
/// to act on. The controller routes that to a targeted revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgeReport {
    #[serde(default)]
    pub hard_flags: Vec<String>,
    #[serde(default)]
    pub pass: bool,
    #[serde(default)]
    pub rewrite_required: bool,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub revision_instructions: Vec<String>,
    #[serde(default)]
    pub one_sentence_verdict: String,
}

impl JudgeReport {
    pub fn score(&self, dimension: &str) -> Option<f64> {
        self.scores.get(dimension).copied()
    }

    /// Which branch the revise step takes for this verdict.
    pub fn revision_mode(&self) -> RevisionMode {
        if self.rewrite_required {
            RevisionMode::Rewrite
        } else {
            RevisionMode::Revise
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RevisionMode {
    /// Fresh draft from spec and plan; the rejected draft is not shown.
    Rewrite,
    /// Targeted edit of the previous draft keyed to the judge's instructions.
    Revise,
    /// Post-output edit driven by explicit user feedback.
    HitlRevise,
}
