use tokio::sync::mpsc;

use super::{Dispatcher, EventQueue, SinkErrorPolicy};
use crate::sink::EventSink;

/// Builder for [Dispatcher].
///
/// It is usually created by calling [Dispatcher::builder].
pub struct Builder<S> {
    sink: S,
    policy: SinkErrorPolicy,
}

impl<S> Builder<S> {
    pub(super) const fn new(sink: S) -> Self {
        Self {
            sink,
            policy: SinkErrorPolicy::Stop,
        }
    }

    /// Specifies what to do when the event sink fails.
    pub fn on_sink_error(mut self, policy: SinkErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Specifies to keep dispatching when the event sink fails.
    ///
    /// This is a shorthand for [on_sink_error](Self::on_sink_error) with
    /// [SinkErrorPolicy::Continue].
    pub fn continue_on_sink_error(self) -> Self {
        self.on_sink_error(SinkErrorPolicy::Continue)
    }
}

impl<S: EventSink> Builder<S> {
    /// Builds the dispatcher, along with the queue feeding it.
    pub fn build(self) -> (EventQueue<S::Runtime>, Dispatcher<S>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let dispatcher = Dispatcher {
            sink: self.sink,
            policy: self.policy,
            receiver,
        };

        (EventQueue { sender }, dispatcher)
    }
}
