//! tracetap library
//!
//! Seekable access to binary event traces and parsing of SystemTap
//! tapset output. This exposes the internal modules for the `tracetap`
//! CLI and for testing.

pub mod commands;
pub mod output;
pub mod parser;
pub mod tapset;
pub mod trace;
pub mod utils;
