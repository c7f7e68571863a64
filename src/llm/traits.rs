use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`ModelClient::invoke`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

/// The model invocation boundary: a text prompt plus sampling parameters in,
/// a text completion out.
///
/// This is the only operation in a session that is expected to fail. The
/// controller awaits calls strictly one at a time and never retries; a failed
/// call aborts the session.
pub trait ModelClient: Send + Sync {
    /// Client identifier (e.g. "openai").
    fn name(&self) -> &str;

    fn invoke<'a>(
        &'a self,
        prompt: &'a str,
        max_output_tokens: u32,
        temperature: f64,
    ) -> CompletionFuture<'a>;
}
