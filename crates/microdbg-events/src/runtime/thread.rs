use super::{Capabilities, Handle};

/// Trait providing functions for working with debuggee threads.
pub trait Thread: Handle {
    /// Type of the application domain the thread runs in.
    type AppDomain: Handle;

    /// Returns the thread's ID.
    fn id(&self) -> u64;

    /// Returns the real thread behind this handle.
    ///
    /// Events can be observed on virtual threads (e.g., function
    /// evaluations). In that case the thread they proxy is returned,
    /// otherwise the thread itself.
    fn real_thread(&self) -> Self;

    /// Returns the application domain the thread currently runs in.
    fn app_domain(&self) -> Self::AppDomain;

    /// Returns the capabilities of the engine debugging this thread.
    fn capabilities(&self) -> Capabilities;

    /// Returns whether events of this thread are currently suspended.
    fn suspend_thread_events(&self) -> bool;

    /// Suspends or resumes events of this thread.
    fn set_suspend_thread_events(&self, suspend: bool);
}
