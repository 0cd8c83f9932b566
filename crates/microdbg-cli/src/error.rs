use std::io;

use microdbg_events::DispatcherClosed;
use microdbg_events::sink::UnwindKind;

/// Error type of the replay command.
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    /// The script references an undeclared entity.
    #[error("Unknown {kind} {id}")]
    UnknownEntity {
        /// Kind of the entity.
        kind: &'static str,

        /// ID of the entity.
        id: u64,
    },

    /// A thread declaration is neither real nor virtual.
    #[error("Thread {0} must either run in an app-domain or proxy a real thread")]
    InvalidThread(u64),

    /// The script contains an exception unwind which can't be reported.
    #[error("Unsupported exception unwind: {0:?}")]
    UnsupportedUnwind(UnwindKind),

    /// The dispatcher stopped before every event was submitted.
    #[error(transparent)]
    DispatcherClosed(#[from] DispatcherClosed),

    /// An error occurred while delivering events.
    #[error(transparent)]
    Dispatch(#[from] microdbg_events::Error<io::Error>),

    /// An error occurred while writing the log.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type of the replay command.
pub type Result<T> = core::result::Result<T, ReplayError>;
