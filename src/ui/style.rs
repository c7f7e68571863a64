use console::style;
use std::fmt::Display;

/// Green bold, for checkmarks and confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold, for section headers and story banners
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim, for secondary text and debug previews
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow, for warnings and failed verdicts
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green, for ids, paths and stored values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold, for step counters
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Cyan, for field labels
pub fn cyan<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}
