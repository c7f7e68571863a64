use super::metrics::Metrics;
use super::span::{Span, content_digest};
use super::traits::{EventSink, TraceEvent};
use tracing::info;

/// Finalize `span` for one model call and emit it.
///
/// Stores the prompt digest, closes the span if the caller has not, feeds
/// `span.<name>.latency` and appends a span event. Returns the duration.
pub fn record(
    sink: &dyn EventSink,
    metrics: &mut Metrics,
    span: &mut Span,
    prompt: &str,
    output: &str,
) -> anyhow::Result<u64> {
    span.prompt_hash = Some(content_digest(prompt));
    if !span.is_closed() {
        span.close(output);
    }

    let duration_ms = span.duration_ms();
    metrics.observe_ms(&format!("span.{}.latency", span.name), duration_ms);
    info!(
        trace_id = %span.trace_id,
        span_id = %span.span_id,
        span = %span.name,
        duration_ms,
        "model.call"
    );

    sink.append(&TraceEvent::Span {
        span: span.clone(),
        duration_ms,
    })?;
    Ok(duration_ms)
}
