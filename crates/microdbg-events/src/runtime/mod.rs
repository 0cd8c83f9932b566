mod code;
mod entity;
mod thread;

pub use self::code::{Frame, Function};
pub use self::entity::{AppDomain, Assembly, Class};
pub use self::thread::Thread;

/// Trait tying together the entity handles of a debugged embedded runtime.
///
/// Every handle is a cheap reference to an entity owned by the debugger
/// engine. Notifications hold clones of these handles but never own the
/// underlying entities.
pub trait DebugRuntime: 'static {
    /// Type of a debuggee process.
    type Process: Handle;

    /// Type of an application domain of the debuggee.
    type AppDomain: AppDomain<Process = Self::Process>;

    /// Type of an assembly (or module) loaded into an application domain.
    type Assembly: Assembly<AppDomain = Self::AppDomain>;

    /// Type of a class defined by an assembly.
    type Class: Class<Assembly = Self::Assembly>;

    /// Type of a debuggee thread.
    type Thread: Thread<AppDomain = Self::AppDomain>;

    /// Type of a function with (optional) symbol information.
    type Function: Function;

    /// Type of a stack frame.
    type Frame: Frame<Function = Self::Function>;

    /// Type of a breakpoint.
    type Breakpoint: Handle;

    /// Type of a stepper.
    type Stepper: Handle;

    /// Type of a function evaluation.
    type Eval: Handle;
}

/// Marker trait for entity handles.
///
/// Handles are shared between the engine transport (producing
/// notifications) and the dispatcher (delivering them).
pub trait Handle: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Handle for T {}

/// Capability set of the debugger engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the engine is able to filter exception notifications by
    /// itself.
    ///
    /// When it can't, first-chance exceptions suspend further thread events
    /// for the duration of their delivery.
    pub exception_filters: bool,
}
