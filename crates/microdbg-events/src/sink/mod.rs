mod codes;

use std::future::{self, Future};

pub use self::codes::{ExceptionFlags, ExceptionPhase, LoggingLevel, StepReason, UnwindKind};
use crate::runtime::DebugRuntime;

/// Trait for implementing the consumer of debugger notifications.
///
/// Exactly one function of this trait is called per delivered
/// [Notification](crate::notification::Notification), and never while
/// another call is in progress.
pub trait EventSink {
    /// Runtime whose entities are referenced by the notifications.
    type Runtime: DebugRuntime;

    /// Error returned by this event sink.
    type Error: std::error::Error;

    /// Function called when a thread hits a breakpoint.
    fn breakpoint(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _breakpoint: &<Self::Runtime as DebugRuntime>::Breakpoint,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a breakpoint couldn't be bound.
    fn breakpoint_set_error(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _breakpoint: &<Self::Runtime as DebugRuntime>::Breakpoint,
        _error: u32,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a thread has emitted a debug message.
    fn log_message(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _level: LoggingLevel,
        _switch_name: &str,
        _message: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a step operation has completed.
    fn step_complete(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _stepper: &<Self::Runtime as DebugRuntime>::Stepper,
        _reason: StepReason,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a thread has executed a user break instruction.
    fn user_break(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an exception is reported on a thread.
    ///
    /// `offset` is an offset in the standard IL code of the frame's function,
    /// whenever symbol information is available for it.
    fn exception(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _frame: &<Self::Runtime as DebugRuntime>::Frame,
        _offset: u32,
        _phase: ExceptionPhase,
        _flags: ExceptionFlags,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an exception unwind is reported on a thread.
    fn exception_unwind(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _kind: UnwindKind,
        _flags: u32,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a function evaluation has completed.
    fn eval_complete(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _eval: &<Self::Runtime as DebugRuntime>::Eval,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a function evaluation has thrown an exception.
    fn eval_exception(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
        _eval: &<Self::Runtime as DebugRuntime>::Eval,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a new thread is created by the debuggee.
    ///
    /// # Note
    ///
    /// Events of the new thread are suspended for the duration of this call.
    fn create_thread(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a thread has exited.
    fn exit_thread(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when the name of a thread has changed.
    fn name_change(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _thread: &<Self::Runtime as DebugRuntime>::Thread,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when the debuggee process is created.
    fn create_process(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when the debuggee process has exited.
    fn exit_process(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a control-break was trapped in the debuggee.
    fn control_break_trapped(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when the debugger engine reports an error.
    fn debugger_error(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
        _error_hr: i32,
        _error_code: u32,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an application domain is created.
    fn create_app_domain(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an application domain has exited.
    fn exit_app_domain(
        &mut self,
        _process: &<Self::Runtime as DebugRuntime>::Process,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an assembly is loaded.
    fn load_assembly(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _assembly: &<Self::Runtime as DebugRuntime>::Assembly,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a module is loaded.
    fn load_module(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _module: &<Self::Runtime as DebugRuntime>::Assembly,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when an assembly is unloaded.
    fn unload_assembly(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _assembly: &<Self::Runtime as DebugRuntime>::Assembly,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a module is unloaded.
    fn unload_module(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _module: &<Self::Runtime as DebugRuntime>::Assembly,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a class is loaded.
    fn load_class(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _class: &<Self::Runtime as DebugRuntime>::Class,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }

    /// Function called when a class is unloaded.
    fn unload_class(
        &mut self,
        _app_domain: &<Self::Runtime as DebugRuntime>::AppDomain,
        _class: &<Self::Runtime as DebugRuntime>::Class,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        future::ready(Ok(()))
    }
}
