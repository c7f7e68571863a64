mod builder;
mod engine;
pub mod rubric;

pub use builder::StoryPrompts;
pub use engine::TeraEngine;
