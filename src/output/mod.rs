//! Output writers for trees, events and index summaries.

pub mod json;

// Re-export main functions
pub use json::{read_tree, write_json, write_tree};
