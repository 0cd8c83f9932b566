mod kind;
mod suspend;

use std::fmt;

pub use self::kind::{
    AppDomainEvent, AssemblyEvent, ClassEvent, EvalEvent, EventKind, ProcessEvent, ThreadEvent,
};
use self::suspend::SuspendGuard;
use crate::error::SinkError;
use crate::runtime::{AppDomain, Assembly, Class, DebugRuntime, Frame, Function, Thread};
use crate::sink::{EventSink, ExceptionFlags, ExceptionPhase, LoggingLevel, StepReason, UnwindKind};

/// Debugger notification, ready to be delivered to an [EventSink].
///
/// A notification is built by the engine transport as soon as a debug event
/// is decoded. All its arguments are resolved at construction, except for
/// the owners of its entities (e.g., the application domain of a thread),
/// which are looked up at delivery.
pub struct Notification<R: DebugRuntime> {
    inner: Inner<R>,
}

enum Inner<R: DebugRuntime> {
    Thread {
        thread: R::Thread,
        suspend: bool,
        event: ThreadNotification<R>,
    },
    Process {
        process: R::Process,
        event: ProcessEvent,
    },
    ProcessError {
        process: R::Process,
        error_hr: i32,
        error_code: u32,
    },
    AppDomain {
        app_domain: R::AppDomain,
        event: AppDomainEvent,
    },
    Assembly {
        assembly: R::Assembly,
        event: AssemblyEvent,
    },
    Class {
        class: R::Class,
        event: ClassEvent,
    },
}

enum ThreadNotification<R: DebugRuntime> {
    Lifecycle(ThreadEvent),
    Breakpoint {
        breakpoint: R::Breakpoint,
        marshal_type: Option<&'static str>,
    },
    BreakpointSetError {
        breakpoint: R::Breakpoint,
        error: u32,
    },
    DebugMessage {
        // log messages are tied to the domain they were emitted from
        app_domain: R::AppDomain,
        switch_name: String,
        message: String,
        level: LoggingLevel,
    },
    StepComplete {
        stepper: R::Stepper,
        reason: StepReason,
    },
    Break,
    Exception {
        frame: R::Frame,
        offset: u32,
        phase: ExceptionPhase,
    },
    ExceptionUnwind {
        frame: R::Frame,
        kind: UnwindKind,
    },
    Eval {
        eval: R::Eval,
        event: EvalEvent,
    },
}

impl<R: DebugRuntime> Notification<R> {
    const fn new(inner: Inner<R>) -> Self {
        Self { inner }
    }

    fn on_thread(thread: R::Thread, event: ThreadNotification<R>) -> Self {
        Self::on_thread_suspended(thread, false, event)
    }

    fn on_thread_suspended(thread: R::Thread, suspend: bool, event: ThreadNotification<R>) -> Self {
        // breakpoints can happen on virtual threads
        let thread = thread.real_thread();

        Self::new(Inner::Thread {
            thread,
            suspend,
            event,
        })
    }

    /// Creates a thread lifecycle notification.
    ///
    /// Events of a newly created thread are suspended while the notification
    /// is being delivered.
    pub fn thread(thread: R::Thread, event: ThreadEvent) -> Self {
        let suspend = matches!(event, ThreadEvent::Created);
        Self::on_thread_suspended(thread, suspend, ThreadNotification::Lifecycle(event))
    }

    /// Creates a notification of a breakpoint hit.
    pub fn breakpoint(thread: R::Thread, breakpoint: R::Breakpoint) -> Self {
        Self::on_thread(
            thread,
            ThreadNotification::Breakpoint {
                breakpoint,
                marshal_type: None,
            },
        )
    }

    /// Creates a notification of a breakpoint hit, declaring the type the
    /// breakpoint is to be presented as.
    pub fn breakpoint_as<T: ?Sized>(thread: R::Thread, breakpoint: R::Breakpoint) -> Self {
        Self::on_thread(
            thread,
            ThreadNotification::Breakpoint {
                breakpoint,
                marshal_type: Some(std::any::type_name::<T>()),
            },
        )
    }

    /// Creates a notification of a breakpoint that couldn't be bound.
    pub fn breakpoint_set_error(thread: R::Thread, breakpoint: R::Breakpoint, error: u32) -> Self {
        Self::on_thread(
            thread,
            ThreadNotification::BreakpointSetError { breakpoint, error },
        )
    }

    /// Creates a notification of a debug message emitted by a thread.
    ///
    /// Unlike other thread notifications, the message is delivered along
    /// with the given application domain, rather than the one the thread
    /// runs in at delivery.
    pub fn debug_message(
        thread: R::Thread,
        app_domain: R::AppDomain,
        switch_name: impl Into<String>,
        message: impl Into<String>,
        level: LoggingLevel,
    ) -> Self {
        Self::on_thread(
            thread,
            ThreadNotification::DebugMessage {
                app_domain,
                switch_name: switch_name.into(),
                message: message.into(),
                level,
            },
        )
    }

    /// Creates a notification of a completed step operation.
    pub fn step_complete(thread: R::Thread, stepper: R::Stepper, reason: StepReason) -> Self {
        Self::on_thread(thread, ThreadNotification::StepComplete { stepper, reason })
    }

    /// Creates a notification of a user break.
    pub fn user_break(thread: R::Thread) -> Self {
        Self::on_thread(thread, ThreadNotification::Break)
    }

    /// Creates a notification of an exception.
    ///
    /// `offset` is the instruction offset reported by the embedded runtime.
    /// If symbol information is available for the frame's function, it is
    /// converted into an offset of the standard IL code.
    ///
    /// If the engine can't filter exceptions by itself, events of the thread
    /// are suspended while a first-chance exception is being delivered.
    pub fn exception(
        thread: R::Thread,
        frame: R::Frame,
        offset: u32,
        phase: ExceptionPhase,
    ) -> Self {
        let suspend = !thread.capabilities().exception_filters && phase.is_first_chance();

        // two-pass exception handling: the frame's instruction pointer isn't
        // the handler's, so the reported offset is used instead
        let offset = match frame.function() {
            Some(function) if function.has_symbols() => function.standard_offset(offset),
            _ => offset,
        };

        Self::on_thread_suspended(
            thread,
            suspend,
            ThreadNotification::Exception {
                frame,
                offset,
                phase,
            },
        )
    }

    /// Creates a notification of an exception unwind.
    ///
    /// # Panics
    ///
    /// Only [UnwindKind::INTERCEPTED] is supported.
    pub fn exception_unwind(thread: R::Thread, frame: R::Frame, kind: UnwindKind) -> Self {
        assert_eq!(
            kind,
            UnwindKind::INTERCEPTED,
            "exception unwind begin is not supported"
        );

        Self::on_thread(thread, ThreadNotification::ExceptionUnwind { frame, kind })
    }

    /// Creates a notification of a finished function evaluation.
    pub fn eval(thread: R::Thread, eval: R::Eval, event: EvalEvent) -> Self {
        Self::on_thread(thread, ThreadNotification::Eval { eval, event })
    }

    /// Creates a process lifecycle notification.
    pub const fn process(process: R::Process, event: ProcessEvent) -> Self {
        Self::new(Inner::Process { process, event })
    }

    /// Creates a notification of a debugger engine error.
    pub const fn process_error(process: R::Process, error_hr: i32, error_code: u32) -> Self {
        Self::new(Inner::ProcessError {
            process,
            error_hr,
            error_code,
        })
    }

    /// Creates an application domain lifecycle notification.
    pub const fn app_domain(app_domain: R::AppDomain, event: AppDomainEvent) -> Self {
        Self::new(Inner::AppDomain { app_domain, event })
    }

    /// Creates a notification of an assembly (or module) load or unload.
    pub const fn assembly(assembly: R::Assembly, event: AssemblyEvent) -> Self {
        Self::new(Inner::Assembly { assembly, event })
    }

    /// Creates a notification of a class load or unload.
    pub const fn class(class: R::Class, event: ClassEvent) -> Self {
        Self::new(Inner::Class { class, event })
    }

    /// Returns the event sink function this notification is delivered to.
    pub const fn kind(&self) -> EventKind {
        match &self.inner {
            Inner::Thread { event, .. } => event.kind(),
            Inner::Process { event, .. } => match event {
                ProcessEvent::Created => EventKind::CreateProcess,
                ProcessEvent::Exited => EventKind::ExitProcess,
                ProcessEvent::ControlBreakTrapped => EventKind::ControlBreakTrapped,
            },
            Inner::ProcessError { .. } => EventKind::DebuggerError,
            Inner::AppDomain { event, .. } => match event {
                AppDomainEvent::Created => EventKind::CreateAppDomain,
                AppDomainEvent::Exited => EventKind::ExitAppDomain,
            },
            Inner::Assembly { event, .. } => match event {
                AssemblyEvent::AssemblyLoaded => EventKind::LoadAssembly,
                AssemblyEvent::ModuleLoaded => EventKind::LoadModule,
                AssemblyEvent::AssemblyUnloaded => EventKind::UnloadAssembly,
                AssemblyEvent::ModuleUnloaded => EventKind::UnloadModule,
            },
            Inner::Class { event, .. } => match event {
                ClassEvent::Loaded => EventKind::LoadClass,
                ClassEvent::Unloaded => EventKind::UnloadClass,
            },
        }
    }

    /// Returns the (real) thread this notification is about, if any.
    pub const fn real_thread(&self) -> Option<&R::Thread> {
        match &self.inner {
            Inner::Thread { thread, .. } => Some(thread),
            _ => None,
        }
    }

    /// Returns whether events of the notification's thread are suspended
    /// during its delivery.
    ///
    /// `None` is returned if the notification isn't about a thread.
    pub const fn suspends_thread_events(&self) -> Option<bool> {
        match &self.inner {
            Inner::Thread { suspend, .. } => Some(*suspend),
            _ => None,
        }
    }

    /// Returns the frame of an exception (or exception unwind) notification.
    pub const fn frame(&self) -> Option<&R::Frame> {
        match &self.inner {
            Inner::Thread {
                event:
                    ThreadNotification::Exception { frame, .. }
                    | ThreadNotification::ExceptionUnwind { frame, .. },
                ..
            } => Some(frame),
            _ => None,
        }
    }

    /// Returns the type name a breakpoint notification declared its
    /// breakpoint to be presented as.
    pub const fn marshal_type(&self) -> Option<&'static str> {
        match &self.inner {
            Inner::Thread {
                event: ThreadNotification::Breakpoint { marshal_type, .. },
                ..
            } => *marshal_type,
            _ => None,
        }
    }

    /// Delivers the notification to the given event sink.
    ///
    /// Exactly one function of the sink is called. For notifications about a
    /// thread, the thread's events suspension is overridden for the duration
    /// of the call, and restored afterwards (whatever the call's outcome).
    pub async fn deliver<S>(self, sink: &mut S) -> Result<(), SinkError<S::Error>>
    where
        S: EventSink<Runtime = R>,
    {
        match self.inner {
            Inner::Thread {
                thread,
                suspend,
                event,
            } => {
                let _guard = SuspendGuard::new(&thread, suspend);

                tracing::trace!(tid = thread.id(), suspend, "thread events suspension set");

                event.deliver(&thread, sink).await
            }
            Inner::Process { process, event } => match event {
                ProcessEvent::Created => sink.create_process(&process).await,
                ProcessEvent::Exited => sink.exit_process(&process).await,
                ProcessEvent::ControlBreakTrapped => sink.control_break_trapped(&process).await,
            }
            .map_err(SinkError),
            Inner::ProcessError {
                process,
                error_hr,
                error_code,
            } => sink
                .debugger_error(&process, error_hr, error_code)
                .await
                .map_err(SinkError),
            Inner::AppDomain { app_domain, event } => {
                let process = app_domain.process();

                match event {
                    AppDomainEvent::Created => sink.create_app_domain(&process, &app_domain).await,
                    AppDomainEvent::Exited => sink.exit_app_domain(&process, &app_domain).await,
                }
                .map_err(SinkError)
            }
            Inner::Assembly { assembly, event } => {
                let app_domain = assembly.app_domain();

                match event {
                    AssemblyEvent::AssemblyLoaded => {
                        sink.load_assembly(&app_domain, &assembly).await
                    }
                    AssemblyEvent::ModuleLoaded => sink.load_module(&app_domain, &assembly).await,
                    AssemblyEvent::AssemblyUnloaded => {
                        sink.unload_assembly(&app_domain, &assembly).await
                    }
                    AssemblyEvent::ModuleUnloaded => {
                        sink.unload_module(&app_domain, &assembly).await
                    }
                }
                .map_err(SinkError)
            }
            Inner::Class { class, event } => {
                let app_domain = class.assembly().app_domain();

                match event {
                    ClassEvent::Loaded => sink.load_class(&app_domain, &class).await,
                    ClassEvent::Unloaded => sink.unload_class(&app_domain, &class).await,
                }
                .map_err(SinkError)
            }
        }
    }
}

impl<R: DebugRuntime> ThreadNotification<R> {
    const fn kind(&self) -> EventKind {
        match self {
            Self::Lifecycle(ThreadEvent::Created) => EventKind::CreateThread,
            Self::Lifecycle(ThreadEvent::Exited) => EventKind::ExitThread,
            Self::Lifecycle(ThreadEvent::NameChanged) => EventKind::NameChange,
            Self::Breakpoint { .. } => EventKind::Breakpoint,
            Self::BreakpointSetError { .. } => EventKind::BreakpointSetError,
            Self::DebugMessage { .. } => EventKind::LogMessage,
            Self::StepComplete { .. } => EventKind::StepComplete,
            Self::Break => EventKind::UserBreak,
            Self::Exception { .. } => EventKind::Exception,
            Self::ExceptionUnwind { .. } => EventKind::ExceptionUnwind,
            Self::Eval {
                event: EvalEvent::Complete,
                ..
            } => EventKind::EvalComplete,
            Self::Eval {
                event: EvalEvent::Exception,
                ..
            } => EventKind::EvalException,
        }
    }

    async fn deliver<S>(self, thread: &R::Thread, sink: &mut S) -> Result<(), SinkError<S::Error>>
    where
        S: EventSink<Runtime = R>,
    {
        match self {
            Self::Lifecycle(ThreadEvent::Created) => {
                sink.create_thread(&thread.app_domain(), thread).await
            }
            Self::Lifecycle(ThreadEvent::Exited) => {
                sink.exit_thread(&thread.app_domain(), thread).await
            }
            Self::Lifecycle(ThreadEvent::NameChanged) => {
                sink.name_change(&thread.app_domain(), thread).await
            }
            Self::Breakpoint { breakpoint, .. } => {
                sink.breakpoint(&thread.app_domain(), thread, &breakpoint).await
            }
            Self::BreakpointSetError { breakpoint, error } => {
                sink.breakpoint_set_error(&thread.app_domain(), thread, &breakpoint, error).await
            }
            Self::DebugMessage {
                app_domain,
                switch_name,
                message,
                level,
            } => {
                sink.log_message(&app_domain, thread, level, &switch_name, &message).await
            }
            Self::StepComplete { stepper, reason } => {
                sink.step_complete(&thread.app_domain(), thread, &stepper, reason).await
            }
            Self::Break => sink.user_break(&thread.app_domain(), thread).await,
            Self::Exception {
                frame,
                offset,
                phase,
            } => {
                sink.exception(
                    &thread.app_domain(),
                    thread,
                    &frame,
                    offset,
                    phase,
                    ExceptionFlags::CAN_BE_INTERCEPTED,
                )
                .await
            }
            Self::ExceptionUnwind { kind, .. } => {
                sink.exception_unwind(&thread.app_domain(), thread, kind, 0).await
            }
            Self::Eval {
                eval,
                event: EvalEvent::Complete,
            } => {
                sink.eval_complete(&thread.app_domain(), thread, &eval).await
            }
            Self::Eval {
                eval,
                event: EvalEvent::Exception,
            } => {
                sink.eval_exception(&thread.app_domain(), thread, &eval).await
            }
        }
        .map_err(SinkError)
    }
}

impl<R: DebugRuntime> fmt::Debug for Notification<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("kind", &self.kind())
            .field("suspend", &self.suspends_thread_events())
            .finish_non_exhaustive()
    }
}
