//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// `check`: reports which external tools are available.
pub mod check;

/// `mp4` and `mp3`: convert one source and write the result to disk.
pub mod convert;

/// `serve`: runs the browser UI.
pub mod serve;
