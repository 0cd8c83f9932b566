use microdbg_events::dispatcher::SinkErrorPolicy;
use microdbg_events::sink::{ExceptionPhase, LoggingLevel, StepReason, UnwindKind};

/// Script of debugger events to replay.
///
/// Entities of the debuggee are declared first, then referenced by ID from
/// the `events` block.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ReplayScript {
    /// Capabilities of the debugger engine.
    #[knus(child, default)]
    pub capabilities: CapabilitiesConfig,

    /// What to do when the event sink fails.
    #[knus(child, default, unwrap(argument))]
    pub on_sink_error: OnSinkError,

    /// Processes of the debuggee.
    #[knus(children(name = "process"))]
    pub processes: Vec<ProcessDecl>,

    /// Application domains of the debuggee.
    #[knus(children(name = "app-domain"))]
    pub app_domains: Vec<AppDomainDecl>,

    /// Assemblies of the debuggee.
    #[knus(children(name = "assembly"))]
    pub assemblies: Vec<AssemblyDecl>,

    /// Classes of the debuggee.
    #[knus(children(name = "class"))]
    pub classes: Vec<ClassDecl>,

    /// Threads of the debuggee.
    #[knus(children(name = "thread"))]
    pub threads: Vec<ThreadDecl>,

    /// Functions of the debuggee.
    #[knus(children(name = "function"))]
    pub functions: Vec<FunctionDecl>,

    /// Stack frames of the debuggee.
    #[knus(children(name = "frame"))]
    pub frames: Vec<FrameDecl>,

    /// Events to replay, in order.
    #[knus(child, default)]
    pub events: EventList,
}

/// Capabilities of the debugger engine.
#[derive(Debug, Default, PartialEq, knus::Decode)]
pub struct CapabilitiesConfig {
    /// Whether the engine filters exceptions by itself.
    #[knus(property, default)]
    pub exception_filters: bool,
}

/// What to do when the event sink fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, knus::DecodeScalar)]
pub enum OnSinkError {
    /// Stop replaying.
    #[default]
    Stop,

    /// Keep replaying.
    Continue,
}

impl From<OnSinkError> for SinkErrorPolicy {
    fn from(value: OnSinkError) -> Self {
        match value {
            OnSinkError::Stop => Self::Stop,
            OnSinkError::Continue => Self::Continue,
        }
    }
}

/// Process declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ProcessDecl {
    /// ID of the process.
    #[knus(argument)]
    pub id: u64,
}

/// Application domain declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct AppDomainDecl {
    /// ID of the application domain.
    #[knus(argument)]
    pub id: u64,

    /// ID of the owning process.
    #[knus(property)]
    pub process: u64,
}

/// Assembly declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct AssemblyDecl {
    /// ID of the assembly.
    #[knus(argument)]
    pub id: u64,

    /// ID of the application domain the assembly is loaded in.
    #[knus(property)]
    pub app_domain: u64,

    /// Name of the assembly.
    #[knus(property)]
    pub name: String,
}

/// Class declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ClassDecl {
    /// Metadata token of the class.
    #[knus(argument)]
    pub token: u32,

    /// ID of the assembly defining the class.
    #[knus(property)]
    pub assembly: u64,
}

/// Thread declaration.
///
/// A real thread runs in an application domain, while a virtual thread
/// proxies a real one.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ThreadDecl {
    /// ID of the thread.
    #[knus(argument)]
    pub id: u64,

    /// ID of the application domain the (real) thread runs in.
    #[knus(property)]
    pub app_domain: Option<u64>,

    /// ID of the real thread proxied by this (virtual) thread.
    #[knus(property)]
    pub real: Option<u64>,
}

/// Function declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct FunctionDecl {
    /// Metadata token of the function.
    #[knus(argument)]
    pub token: u32,

    /// Symbol information of the function, if any.
    #[knus(children(name = "il"))]
    pub il_map: Vec<IlMapping>,
}

/// Compact IL offset mapped to a standard IL offset.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct IlMapping {
    /// Offset within the compact IL code.
    #[knus(argument)]
    pub compact: u32,

    /// Offset within the standard IL code.
    #[knus(argument)]
    pub standard: u32,
}

/// Stack frame declaration.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct FrameDecl {
    /// ID of the frame.
    #[knus(argument)]
    pub id: u64,

    /// Depth of the frame in its thread's call stack.
    #[knus(property, default)]
    pub depth: u32,

    /// Metadata token of the function executed by the frame, if known.
    #[knus(property)]
    pub function: Option<u32>,
}

/// Events to replay.
#[derive(Debug, Default, PartialEq, knus::Decode)]
pub struct EventList {
    /// Events, in order.
    #[knus(children)]
    pub events: Vec<ScriptEvent>,
}

/// Debugger event to replay.
///
/// Each event is named after the event sink function it is delivered to.
#[derive(Debug, PartialEq, knus::Decode)]
#[allow(missing_docs)]
pub enum ScriptEvent {
    Breakpoint(BreakpointEvent),
    BreakpointSetError(BreakpointSetErrorEvent),
    LogMessage(LogMessageEvent),
    StepComplete(StepCompleteEvent),
    UserBreak(Target),
    Exception(ExceptionEvent),
    ExceptionUnwind(ExceptionUnwindEvent),
    EvalComplete(EvalEvent),
    EvalException(EvalEvent),
    CreateThread(Target),
    ExitThread(Target),
    NameChange(Target),
    CreateProcess(Target),
    ExitProcess(Target),
    ControlBreakTrapped(Target),
    DebuggerError(DebuggerErrorEvent),
    CreateAppDomain(Target),
    ExitAppDomain(Target),
    LoadAssembly(Target),
    LoadModule(Target),
    UnloadAssembly(Target),
    UnloadModule(Target),
    LoadClass(ClassTarget),
    UnloadClass(ClassTarget),
}

/// Event about a single entity, referenced by ID.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct Target {
    /// ID of the entity.
    #[knus(argument)]
    pub id: u64,
}

/// Event about a class, referenced by metadata token.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ClassTarget {
    /// Metadata token of the class.
    #[knus(argument)]
    pub token: u32,
}

/// Breakpoint hit.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct BreakpointEvent {
    /// ID of the thread hitting the breakpoint.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the breakpoint.
    #[knus(property)]
    pub breakpoint: u64,
}

/// Breakpoint that couldn't be bound.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct BreakpointSetErrorEvent {
    /// ID of the thread.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the breakpoint.
    #[knus(property)]
    pub breakpoint: u64,

    /// Engine error code.
    #[knus(property, default)]
    pub error: u32,
}

/// Debug message.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct LogMessageEvent {
    /// ID of the thread emitting the message.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the application domain the message was emitted from.
    #[knus(property)]
    pub app_domain: u64,

    /// Logging level of the message.
    #[knus(property, default)]
    pub level: Level,

    /// Logging switch name.
    #[knus(property, default)]
    pub switch_name: String,

    /// Message content.
    #[knus(property)]
    pub message: String,
}

/// Completed step operation.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct StepCompleteEvent {
    /// ID of the stepping thread.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the stepper.
    #[knus(property)]
    pub stepper: u64,

    /// Reason why the step completed.
    #[knus(property, default)]
    pub reason: Reason,
}

/// Exception.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ExceptionEvent {
    /// ID of the throwing thread.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the frame the exception is reported in.
    #[knus(property)]
    pub frame: u64,

    /// Compact IL offset reported by the engine.
    #[knus(property, default)]
    pub offset: u32,

    /// Phase of the exception.
    #[knus(property)]
    pub phase: Phase,
}

/// Exception unwind.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct ExceptionUnwindEvent {
    /// ID of the unwinding thread.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the frame the unwind is reported in.
    #[knus(property)]
    pub frame: u64,

    /// Kind of unwind.
    #[knus(property, default)]
    pub kind: Unwind,
}

/// Finished function evaluation.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct EvalEvent {
    /// ID of the evaluating thread.
    #[knus(argument)]
    pub thread: u64,

    /// ID of the evaluation.
    #[knus(property)]
    pub eval: u64,
}

/// Debugger engine error.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct DebuggerErrorEvent {
    /// ID of the process.
    #[knus(argument)]
    pub process: u64,

    /// Error result.
    #[knus(property)]
    pub hr: i32,

    /// Error code.
    #[knus(property, default)]
    pub code: u32,
}

/// Logging level of a debug message.
#[derive(Clone, Copy, Debug, Default, PartialEq, knus::DecodeScalar)]
#[allow(missing_docs)]
pub enum Level {
    Trace,
    Status,
    #[default]
    Warning,
    Error,
    Panic,
}

impl From<Level> for LoggingLevel {
    fn from(value: Level) -> Self {
        match value {
            Level::Trace => Self::TRACE_LEVEL0,
            Level::Status => Self::STATUS_LEVEL0,
            Level::Warning => Self::WARNING,
            Level::Error => Self::ERROR,
            Level::Panic => Self::PANIC,
        }
    }
}

/// Reason why a step operation completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, knus::DecodeScalar)]
#[allow(missing_docs)]
pub enum Reason {
    #[default]
    Normal,
    Return,
    Call,
    ExceptionFilter,
    ExceptionHandler,
    Intercept,
    Exit,
}

impl From<Reason> for StepReason {
    fn from(value: Reason) -> Self {
        match value {
            Reason::Normal => Self::NORMAL,
            Reason::Return => Self::RETURN,
            Reason::Call => Self::CALL,
            Reason::ExceptionFilter => Self::EXCEPTION_FILTER,
            Reason::ExceptionHandler => Self::EXCEPTION_HANDLER,
            Reason::Intercept => Self::INTERCEPT,
            Reason::Exit => Self::EXIT,
        }
    }
}

/// Phase of an exception.
#[derive(Clone, Copy, Debug, PartialEq, knus::DecodeScalar)]
#[allow(missing_docs)]
pub enum Phase {
    FirstChance,
    UserFirstChance,
    CatchHandlerFound,
    Unhandled,
}

impl From<Phase> for ExceptionPhase {
    fn from(value: Phase) -> Self {
        match value {
            Phase::FirstChance => Self::FIRST_CHANCE,
            Phase::UserFirstChance => Self::USER_FIRST_CHANCE,
            Phase::CatchHandlerFound => Self::CATCH_HANDLER_FOUND,
            Phase::Unhandled => Self::UNHANDLED,
        }
    }
}

/// Kind of exception unwind.
#[derive(Clone, Copy, Debug, Default, PartialEq, knus::DecodeScalar)]
#[allow(missing_docs)]
pub enum Unwind {
    Begin,
    #[default]
    Intercepted,
}

impl From<Unwind> for UnwindKind {
    fn from(value: Unwind) -> Self {
        match value {
            Unwind::Begin => Self::BEGIN,
            Unwind::Intercepted => Self::INTERCEPTED,
        }
    }
}
