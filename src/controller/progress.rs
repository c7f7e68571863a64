use crate::judge::JudgeReport;
use std::path::Path;
use std::time::Duration;

/// What the controller reports while a session runs. Bodies of prompts and
/// stories only appear in `Detail` (debug previews) and `Story`.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    Started {
        session_id: &'a str,
        trace_id: &'a str,
        request: &'a str,
    },
    Stage {
        step: u8,
        label: String,
    },
    StageDone {
        verb: &'static str,
        elapsed: Duration,
    },
    Detail {
        label: &'static str,
        text: &'a str,
    },
    Verdict {
        report: &'a JudgeReport,
    },
    Story {
        text: &'a str,
        updated: bool,
    },
    Saved {
        path: &'a Path,
    },
}

/// Receives progress events. Rendering is entirely up to the implementor.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent<'_>);
}

/// Swallows everything.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn emit(&self, _event: &ProgressEvent<'_>) {}
}
