//! This crate provides an in-memory implementation of the runtime entities
//! (to be used with `microdbg-events`).
//!
//! Entities are reference-counted handles, so that cloning one yields
//! another handle over the same entity. Ownership links between entities
//! (e.g., the application domain a thread runs in) can be changed at any
//! time, which makes this crate suitable for replaying recorded debug
//! sessions and for testing event sinks.
//!
//! <div class="warning">
//!
//! *This crate doesn't talk to any device! It merely implements the
//! interface (traits) provided by `microdbg-events`.*
//!
//! </div>

mod code;
mod engine;
mod entity;
mod handle;
mod thread;

pub use self::code::{Frame, Function};
pub use self::engine::Engine;
pub use self::entity::{AppDomain, Assembly, Class, Process};
pub use self::handle::{Breakpoint, Eval, Stepper};
pub use self::thread::Thread;
