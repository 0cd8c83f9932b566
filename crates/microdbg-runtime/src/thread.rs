use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use microdbg_events::runtime::Capabilities;

use crate::entity::AppDomain;

/// Thread of the debuggee.
///
/// A thread is either real, or virtual (proxying a real thread).
#[derive(Clone)]
pub struct Thread(Arc<ThreadInner>);

struct ThreadInner {
    /// ID of the thread.
    id: u64,

    /// Real thread or application domain, depending on the thread's kind.
    kind: ThreadKind,

    /// Capabilities of the engine which spawned the thread.
    capabilities: Capabilities,
}

enum ThreadKind {
    Real {
        /// Application domain the thread runs in.
        app_domain: RwLock<AppDomain>,

        /// Whether events of the thread are suspended.
        suspend_thread_events: AtomicBool,
    },
    Virtual {
        /// Real thread behind the virtual thread.
        real: Thread,
    },
}

impl Thread {
    pub(crate) fn new_real(id: u64, app_domain: AppDomain, capabilities: Capabilities) -> Self {
        Self(Arc::new(ThreadInner {
            id,
            kind: ThreadKind::Real {
                app_domain: RwLock::new(app_domain),
                suspend_thread_events: AtomicBool::new(false),
            },
            capabilities,
        }))
    }

    pub(crate) fn new_virtual(id: u64, real: Thread, capabilities: Capabilities) -> Self {
        Self(Arc::new(ThreadInner {
            id,
            kind: ThreadKind::Virtual { real },
            capabilities,
        }))
    }

    /// Returns the thread's ID.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Returns whether the thread is virtual.
    pub fn is_virtual(&self) -> bool {
        matches!(self.0.kind, ThreadKind::Virtual { .. })
    }

    /// Returns the real thread behind this one.
    pub fn real_thread(&self) -> Thread {
        match &self.0.kind {
            ThreadKind::Real { .. } => self.clone(),
            ThreadKind::Virtual { real } => real.real_thread(),
        }
    }

    /// Returns the application domain the thread currently runs in.
    pub fn app_domain(&self) -> AppDomain {
        match &self.0.kind {
            ThreadKind::Real { app_domain, .. } => app_domain
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            ThreadKind::Virtual { real } => real.app_domain(),
        }
    }

    /// Moves the thread into another application domain.
    pub fn move_to(&self, new_app_domain: &AppDomain) {
        match &self.0.kind {
            ThreadKind::Real { app_domain, .. } => {
                tracing::debug!(
                    tid = self.id(),
                    app_domain = new_app_domain.id(),
                    "thread moved"
                );

                *app_domain.write().unwrap_or_else(PoisonError::into_inner) =
                    new_app_domain.clone();
            }
            ThreadKind::Virtual { real } => real.move_to(new_app_domain),
        }
    }

    /// Returns whether events of the thread are suspended.
    pub fn suspend_thread_events(&self) -> bool {
        match &self.0.kind {
            ThreadKind::Real {
                suspend_thread_events,
                ..
            } => suspend_thread_events.load(Ordering::Acquire),
            ThreadKind::Virtual { real } => real.suspend_thread_events(),
        }
    }

    /// Suspends or resumes events of the thread.
    pub fn set_suspend_thread_events(&self, suspend: bool) {
        match &self.0.kind {
            ThreadKind::Real {
                suspend_thread_events,
                ..
            } => suspend_thread_events.store(suspend, Ordering::Release),
            ThreadKind::Virtual { real } => real.set_suspend_thread_events(suspend),
        }
    }
}

impl microdbg_events::runtime::Thread for Thread {
    type AppDomain = AppDomain;

    fn id(&self) -> u64 {
        self.id()
    }

    fn real_thread(&self) -> Self {
        self.real_thread()
    }

    fn app_domain(&self) -> Self::AppDomain {
        self.app_domain()
    }

    fn capabilities(&self) -> Capabilities {
        self.0.capabilities
    }

    fn suspend_thread_events(&self) -> bool {
        self.suspend_thread_events()
    }

    fn set_suspend_thread_events(&self, suspend: bool) {
        self.set_suspend_thread_events(suspend);
    }
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Thread {}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id())
            .field("virtual", &self.is_virtual())
            .finish()
    }
}
