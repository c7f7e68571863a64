use super::traits::{EventSink, TraceEvent};
use std::sync::{Mutex, PoisonError};

/// Keeps events in memory. Used by tests and by callers that inspect a run
/// without touching disk.
#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of recorded spans, in append order.
    pub fn span_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TraceEvent::Span { span, .. } => Some(span.name),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemoryEventSink {
    fn append(&self, event: &TraceEvent) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Drops everything. Selected when the event log is disabled.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn append(&self, _event: &TraceEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
