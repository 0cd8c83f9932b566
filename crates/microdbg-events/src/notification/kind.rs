use std::fmt;

/// Lifecycle event of a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadEvent {
    /// The thread was created.
    Created,

    /// The thread has exited.
    Exited,

    /// The thread's name has changed.
    NameChanged,
}

/// Outcome of a function evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalEvent {
    /// The evaluation has completed.
    Complete,

    /// The evaluation has thrown an exception.
    Exception,
}

/// Lifecycle event of a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessEvent {
    /// The process was created.
    Created,

    /// The process has exited.
    Exited,

    /// A control-break was trapped in the process.
    ControlBreakTrapped,
}

/// Lifecycle event of an application domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppDomainEvent {
    /// The application domain was created.
    Created,

    /// The application domain has exited.
    Exited,
}

/// Load or unload of an assembly (or module).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyEvent {
    /// The assembly was loaded.
    AssemblyLoaded,

    /// The module was loaded.
    ModuleLoaded,

    /// The assembly was unloaded.
    AssemblyUnloaded,

    /// The module was unloaded.
    ModuleUnloaded,
}

/// Load or unload of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassEvent {
    /// The class was loaded.
    Loaded,

    /// The class was unloaded.
    Unloaded,
}

/// The [EventSink](crate::sink::EventSink) function a notification is
/// delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EventKind {
    CreateThread,
    ExitThread,
    NameChange,
    Breakpoint,
    BreakpointSetError,
    LogMessage,
    StepComplete,
    UserBreak,
    Exception,
    ExceptionUnwind,
    EvalComplete,
    EvalException,
    CreateProcess,
    ExitProcess,
    ControlBreakTrapped,
    DebuggerError,
    CreateAppDomain,
    ExitAppDomain,
    LoadAssembly,
    LoadModule,
    UnloadAssembly,
    UnloadModule,
    LoadClass,
    UnloadClass,
}

impl EventKind {
    /// Returns the name of the event sink function.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateThread => "create_thread",
            Self::ExitThread => "exit_thread",
            Self::NameChange => "name_change",
            Self::Breakpoint => "breakpoint",
            Self::BreakpointSetError => "breakpoint_set_error",
            Self::LogMessage => "log_message",
            Self::StepComplete => "step_complete",
            Self::UserBreak => "user_break",
            Self::Exception => "exception",
            Self::ExceptionUnwind => "exception_unwind",
            Self::EvalComplete => "eval_complete",
            Self::EvalException => "eval_exception",
            Self::CreateProcess => "create_process",
            Self::ExitProcess => "exit_process",
            Self::ControlBreakTrapped => "control_break_trapped",
            Self::DebuggerError => "debugger_error",
            Self::CreateAppDomain => "create_app_domain",
            Self::ExitAppDomain => "exit_app_domain",
            Self::LoadAssembly => "load_assembly",
            Self::LoadModule => "load_module",
            Self::UnloadAssembly => "unload_assembly",
            Self::UnloadModule => "unload_module",
            Self::LoadClass => "load_class",
            Self::UnloadClass => "unload_class",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
