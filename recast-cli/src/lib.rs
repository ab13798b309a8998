// recast-cli/src/lib.rs
//
// Library portion of the Recast CLI application.
// Contains argument definitions, command logic and the browser UI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;
pub mod web;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, GlobalArgs, Mp3Args, Mp4Args, ServeArgs, SourceArgs};
pub use commands::check::run_check;
pub use commands::convert::{run_conversion, run_mp3, run_mp4};
pub use commands::serve::run_serve;
pub use error::{CliErrorContext, CliResult};
