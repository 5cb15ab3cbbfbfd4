//! Smart Notes CLI library
//!
//! Split from the binary so commands and file handling can be tested.

pub mod cli;
pub mod commands;
pub mod config;
pub mod notes_file;

pub use config::CliConfig;
pub use notes_file::NotesFile;
