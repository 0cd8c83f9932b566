use microdbg_events::runtime::{Capabilities, DebugRuntime};

use crate::entity::AppDomain;
use crate::thread::Thread;

/// In-memory debugger engine.
///
/// It spawns the threads of the debuggee, which report the engine's
/// capabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    capabilities: Capabilities,
}

impl Engine {
    /// Creates an engine with the given capabilities.
    pub const fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Returns the capabilities of the engine.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Creates a thread running in the given application domain.
    pub fn thread(&self, id: u64, app_domain: &AppDomain) -> Thread {
        tracing::debug!(tid = id, app_domain = app_domain.id(), "thread spawned");
        Thread::new_real(id, app_domain.clone(), self.capabilities)
    }

    /// Creates a virtual thread proxying the given thread.
    pub fn virtual_thread(&self, id: u64, real: &Thread) -> Thread {
        tracing::debug!(tid = id, real_tid = real.id(), "virtual thread spawned");
        Thread::new_virtual(id, real.real_thread(), self.capabilities)
    }
}

impl DebugRuntime for Engine {
    type Process = crate::entity::Process;
    type AppDomain = crate::entity::AppDomain;
    type Assembly = crate::entity::Assembly;
    type Class = crate::entity::Class;
    type Thread = crate::thread::Thread;
    type Function = crate::code::Function;
    type Frame = crate::code::Frame;
    type Breakpoint = crate::handle::Breakpoint;
    type Stepper = crate::handle::Stepper;
    type Eval = crate::handle::Eval;
}
