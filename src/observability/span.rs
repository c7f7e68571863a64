use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Hex SHA-256 of `text`. Spans store these instead of prompt/output bodies.
pub fn content_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Timed, hashed record of one model invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start_ms: i64,
    pub end_ms: Option<i64>,
    pub prompt_hash: Option<String>,
    pub output_hash: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

impl Span {
    /// Stamp the end time and output digest. Safe to call more than once:
    /// `start_ms` never moves, the latest close wins.
    pub fn close(&mut self, output: &str) {
        self.end_ms = Some(now_ms());
        self.output_hash = Some(content_digest(output));
    }

    pub fn annotate(&mut self, key: &str, value: impl Into<Value>) {
        self.meta.insert(key.to_string(), value.into());
    }

    pub fn is_closed(&self) -> bool {
        self.end_ms.is_some()
    }

    /// Elapsed wall-clock time, zero while open (or if the clock went backwards).
    pub fn duration_ms(&self) -> u64 {
        self.end_ms
            .map_or(0, |end| u64::try_from(end - self.start_ms).unwrap_or(0))
    }
}

/// Hands out spans that share one trace id.
#[derive(Debug, Clone)]
pub struct TraceContext {
    trace_id: String,
}

impl TraceContext {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Open a span directly under the trace root.
    pub fn child_span(&self, name: &str) -> Span {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut span_id = content_digest(&format!("{}:{name}:{nanos}", self.trace_id));
        span_id.truncate(16);

        Span {
            trace_id: self.trace_id.clone(),
            span_id,
            parent_span_id: None,
            name: name.to_string(),
            start_ms: now_ms(),
            end_ms: None,
            prompt_hash: None,
            output_hash: None,
            meta: BTreeMap::new(),
        }
    }
}
