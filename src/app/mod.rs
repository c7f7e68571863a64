pub mod dispatch;
pub mod report;

pub use dispatch::{DEFAULT_REQUEST, dispatch};
