//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod read;
pub mod tapsets;
pub mod utils;

// Re-export main command functions
pub use models::{FunctionsArgs, IndexArgs, ProbeArgs, ReadArgs, StartPosition};
pub use read::{execute_index, execute_read, validate_read_args};
pub use tapsets::{execute_functions, execute_functions_with, execute_probe};
pub use utils::{display_version, validate_tree_file};
