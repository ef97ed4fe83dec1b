//! Schema module - Configuration and result types for the word search.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
