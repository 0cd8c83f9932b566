mod builder;

use tokio::sync::mpsc;
use tracing::Instrument;

pub use self::builder::Builder;
use crate::error::DispatcherClosed;
use crate::notification::Notification;
use crate::runtime::DebugRuntime;
use crate::sink::EventSink;

/// Dispatcher delivering notifications to an event sink, one at a time and
/// in the order they were submitted.
///
/// Notifications are submitted through an [EventQueue], and delivered
/// once [run](Self::run) is called.
pub struct Dispatcher<S: EventSink> {
    /// Sink consuming the notifications.
    sink: S,

    /// What to do when the sink fails.
    policy: SinkErrorPolicy,

    /// Pending notifications.
    receiver: mpsc::UnboundedReceiver<Notification<S::Runtime>>,
}

impl<S: EventSink> Dispatcher<S> {
    /// Creates a dispatcher builder delivering notifications to the given
    /// sink.
    pub const fn builder(sink: S) -> Builder<S> {
        Builder::new(sink)
    }

    /// Runs the dispatcher until every [EventQueue] is dropped and all
    /// submitted notifications are delivered.
    ///
    /// On success, the event sink is returned along with delivery statistics.
    ///
    /// # Note
    ///
    /// With [SinkErrorPolicy::Stop], the first sink error is returned and
    /// the notifications still pending are dropped, along with the event
    /// sink itself. State the sink accumulates and that must outlive such a
    /// failure should be kept behind a shared handle (e.g., an [Arc]).
    ///
    /// [Arc]: std::sync::Arc
    #[tracing::instrument(name = "Dispatch", skip_all, fields(policy = ?self.policy))]
    pub async fn run(mut self) -> crate::Result<(S, DispatchStats), S::Error> {
        let mut stats = DispatchStats::default();

        while let Some(notification) = self.receiver.recv().await {
            let kind = notification.kind();

            let res = notification
                .deliver(&mut self.sink)
                .instrument(tracing::debug_span!("Deliver", %kind))
                .await;

            match (res, self.policy) {
                (Ok(()), _) => stats.delivered += 1,
                (Err(e), SinkErrorPolicy::Stop) => {
                    tracing::error!(%kind, error = %e, "event sink failed, stopping");
                    return Err(e.into());
                }
                (Err(e), SinkErrorPolicy::Continue) => {
                    tracing::warn!(%kind, error = %e, "event sink failed");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "event queue drained"
        );

        Ok((self.sink, stats))
    }
}

/// Handle for submitting notifications to a [Dispatcher].
///
/// It can be cloned and sent to other threads, including the ones of the
/// engine transport. Notifications submitted while another one is being
/// delivered (even from within the event sink) are queued behind it.
pub struct EventQueue<R: DebugRuntime> {
    sender: mpsc::UnboundedSender<Notification<R>>,
}

impl<R: DebugRuntime> EventQueue<R> {
    /// Submits a notification for delivery.
    pub fn submit(&self, notification: Notification<R>) -> Result<(), DispatcherClosed> {
        tracing::trace!(kind = %notification.kind(), "notification submitted");

        self.sender.send(notification).map_err(|_| DispatcherClosed)
    }

    /// Returns whether the dispatcher has stopped running.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<R: DebugRuntime> Clone for EventQueue<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// What a [Dispatcher] does when its event sink fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SinkErrorPolicy {
    /// Stop dispatching and return the error.
    #[default]
    Stop,

    /// Log the error and keep dispatching.
    Continue,
}

/// Statistics of a [Dispatcher] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Number of notifications successfully delivered.
    pub delivered: usize,

    /// Number of notifications whose delivery failed.
    pub failed: usize,
}
