pub mod state;
pub mod store;
pub mod types;

pub use state::StoryState;
pub use store::SessionStore;
pub use types::{SessionState, Transition};
