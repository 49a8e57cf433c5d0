// Utility functions
// Serde helpers, terminal progress

pub mod progress;
pub mod serde_helpers;
