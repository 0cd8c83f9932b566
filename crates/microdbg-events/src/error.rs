/// Event sink error.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct SinkError<E>(pub E);

/// Error returned when submitting a notification to a dispatcher which has
/// stopped running.
#[derive(thiserror::Error, Debug)]
#[error("event dispatcher is closed")]
pub struct DispatcherClosed;

/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error<E> {
    /// An event sink error occurred while delivering a notification.
    #[error(transparent)]
    Sink(#[from] SinkError<E>),
}

/// Result type of this crate.
pub type Result<T, E> = core::result::Result<T, Error<E>>;
