pub mod schema;

pub use schema::{Config, ObservabilityConfig, SessionConfig, StageBudget, StageBudgets};
