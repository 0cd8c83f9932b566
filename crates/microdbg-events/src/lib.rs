//! This crate turns the debug events of an embedded runtime into an ordered
//! sequence of calls to a single event sink.
//!
//! Three main components are provided:
//! - A few traits describing the entities of the debugged runtime (threads,
//!   application domains, assemblies, ...), implemented by the debugger
//!   engine.
//! - A trait to implement a custom event sink, consuming the debugger
//!   notifications.
//! - A dispatcher, delivering notifications to the event sink strictly one
//!   at a time, in the order they were submitted.
//!
//! # Consuming notifications
//!
//! The [EventSink](self::sink::EventSink) trait allows to define custom logic
//! for handling debugger notifications.
//!
//! ```no_run
//! use microdbg_events::dispatcher::Dispatcher;
//! use microdbg_events::notification::{Notification, ThreadEvent};
//! use microdbg_events::runtime::{Capabilities, DebugRuntime};
//! use microdbg_events::sink::EventSink;
//!
//! use microdbg_runtime::{AppDomain, Engine, Process};
//!
//! #[tokio::main]
//! async fn main() {
//!     // initialize the dispatcher
//!     let (queue, dispatcher) = Dispatcher::builder(CustomSink).build();
//!
//!     // the engine transport submits notifications as it decodes events
//!     let engine = Engine::new(Capabilities::default());
//!     let process = Process::new(1);
//!     let app_domain = AppDomain::new(1, &process);
//!     let thread = engine.thread(1, &app_domain);
//!
//!     queue.submit(Notification::thread(thread, ThreadEvent::Created)).unwrap();
//!     drop(queue);
//!
//!     // deliver notifications until the queue is dropped
//!     let (_sink, stats) = dispatcher.run().await.unwrap();
//! }
//!
//! struct CustomSink;
//!
//! impl EventSink for CustomSink {
//!     type Runtime = Engine;
//!     type Error = std::io::Error;
//!
//!     async fn create_thread(
//!         &mut self,
//!         _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
//!         _thread: &<Self::Runtime as DebugRuntime>::Thread,
//!     ) -> Result<(), Self::Error> {
//!         //
//!         // do some action with the new thread
//!         //
//!
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Implementing a debugger engine
//!
//! The [DebugRuntime](self::runtime::DebugRuntime) trait (and the traits of
//! its associated types) abstracts over the entities of the debugged runtime.
//! Notifications only keep handles over these entities, and look up their
//! owners (e.g., the application domain of a thread) when being delivered.
//!
//! An in-memory implementation is provided by `microdbg-runtime`.

mod error;

/// Module implementing the notification dispatcher.
pub mod dispatcher;

/// Module implementing the debugger notifications.
pub mod notification;

/// Module containing traits for the entities of a debugged runtime.
pub mod runtime;

/// Module containing the trait for consuming debugger notifications.
pub mod sink;

pub use self::error::{DispatcherClosed, Error, Result, SinkError};
