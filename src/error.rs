use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Story Studio.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these (or `downcast_ref` them out of an `anyhow::Error`) to decide what to
/// tell the user; orchestration code continues to use `anyhow::Result` for
/// ad-hoc context chains.
#[derive(Debug, Error)]
pub enum StudioError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Model invocation ────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Session state / artifact ────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Preference memory ───────────────────────────────────────────────
    #[error("memory: {0}")]
    Memory(#[from] MemoryError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Model invocation errors ────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key not set (set STORY_STUDIO_API_KEY or OPENAI_API_KEY, or edit config.toml)")]
    MissingApiKey { provider: String },

    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned no completion text")]
    EmptyResponse { provider: String },
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("illegal state transition {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("judge report {index} has no matching draft")]
    OrphanReport { index: usize },

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("store: {0}")]
    Store(String),
}

// ─── Preference memory errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("preference store unreadable: {0}")]
    Read(String),

    #[error("preference store corrupt: {0}")]
    Parse(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, StudioError>;
