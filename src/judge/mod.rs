//! Judge verdicts and best-effort recovery of them from free-form model text.

pub mod extract;
pub mod report;

pub use extract::{MalformedReport, extract_report, parse_report};
pub use report::{JudgeReport, RevisionMode};
