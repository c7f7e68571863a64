pub mod feedback;
pub mod preferences;
pub mod store;

pub use feedback::apply_feedback;
pub use preferences::PreferenceMemory;
pub use store::PreferenceStore;
