use super::span::Span;
use serde::Serialize;

/// Records the sink can persist. Serialized with a `type` discriminator so a
/// JSONL event log stays greppable per kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    SessionStarted {
        session_id: String,
        trace_id: String,
        ts_ms: i64,
    },
    Span {
        #[serde(flatten)]
        span: Span,
        duration_ms: u64,
    },
    Transition {
        session_id: String,
        trace_id: String,
        from: Option<String>,
        to: String,
        reason: String,
        ts_ms: i64,
    },
    SessionSaved {
        session_id: String,
        trace_id: String,
        path: String,
        ts_ms: i64,
    },
}

impl TraceEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::Span { .. } => "span",
            Self::Transition { .. } => "transition",
            Self::SessionSaved { .. } => "session_saved",
        }
    }
}

/// Destination for trace events. Implement for any backend.
pub trait EventSink: Send + Sync {
    fn append(&self, event: &TraceEvent) -> anyhow::Result<()>;

    fn name(&self) -> &str;
}
