//! Crate implementing the CLI commands.

mod cli;
mod config;
mod error;
mod replay;
mod sink;

pub use self::cli::{CliAction, CliOpts};
pub use self::config::{OnSinkError, ReplayScript, ScriptEvent};
pub use self::error::{ReplayError, Result};
pub use self::replay::{evaluate_replay, parse_replay_script, replay};
pub use self::sink::LogSink;
