pub mod buffer;
pub mod jsonl;
pub mod metrics;
pub mod recorder;
pub mod span;
pub mod traits;

pub use buffer::{MemoryEventSink, NoopEventSink};
pub use jsonl::JsonlEventSink;
pub use metrics::{Metrics, MetricsSnapshot, TimerSummary};
pub use recorder::record;
pub use span::{Span, TraceContext, content_digest};
pub use traits::{EventSink, TraceEvent};

use crate::config::Config;
use std::sync::Arc;

/// Factory: event log on disk when enabled, otherwise discard.
pub fn create_event_sink(config: &Config) -> anyhow::Result<Arc<dyn EventSink>> {
    if config.observability.event_log {
        Ok(Arc::new(JsonlEventSink::new(config.event_log_path())?))
    } else {
        Ok(Arc::new(NoopEventSink))
    }
}
