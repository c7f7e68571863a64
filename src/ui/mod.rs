pub mod progress;
pub mod style;

pub use progress::ConsoleProgress;
