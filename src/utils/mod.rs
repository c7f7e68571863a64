pub mod fs;
pub mod text;
