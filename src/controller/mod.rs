pub mod feedback;
pub mod progress;
pub mod runner;
pub mod settings;

pub use feedback::{FeedbackSource, NoFeedback, StaticFeedback};
pub use progress::{ProgressEvent, ProgressSink, SilentProgress};
pub use runner::{SessionController, SessionOutcome, run_session};
pub use settings::SessionSettings;
