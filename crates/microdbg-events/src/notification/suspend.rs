use crate::runtime::Thread;

/// Guard overriding the suspension of a thread's events.
///
/// The previous suspension state is restored when the guard is dropped.
pub struct SuspendGuard<'a, T: Thread> {
    thread: &'a T,
    saved: bool,
}

impl<'a, T: Thread> SuspendGuard<'a, T> {
    pub fn new(thread: &'a T, suspend: bool) -> Self {
        let saved = thread.suspend_thread_events();
        thread.set_suspend_thread_events(suspend);

        Self { thread, saved }
    }
}

impl<T: Thread> Drop for SuspendGuard<'_, T> {
    fn drop(&mut self) {
        self.thread.set_suspend_thread_events(self.saved);
    }
}
