//! Library side of the `cvs-survey` command.

pub mod commands;
pub mod logging;
pub mod prompt;
pub mod settings;
pub mod summary;
