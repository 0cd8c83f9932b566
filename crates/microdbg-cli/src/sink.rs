use std::fmt;
use std::io::{self, Write};

use microdbg_events::notification::EventKind;
use microdbg_events::sink::{
    EventSink, ExceptionFlags, ExceptionPhase, LoggingLevel, StepReason, UnwindKind,
};
use microdbg_runtime::{
    AppDomain, Assembly, Breakpoint, Class, Engine, Eval, Frame, Process, Stepper, Thread,
};

/// Event sink writing one line per delivered call.
pub struct LogSink<W> {
    output: W,
}

impl<W: Write> LogSink<W> {
    /// Initializes the event sink with a writer.
    pub const fn new(output: W) -> Self {
        Self { output }
    }

    /// Flushes the log and returns the inner writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.output.flush()?;
        Ok(self.output)
    }

    fn write_line(&mut self, kind: EventKind, args: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(self.output, "{kind} {args}")
    }

    fn write_thread_line(
        &mut self,
        kind: EventKind,
        app_domain: &AppDomain,
        thread: &Thread,
        args: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        writeln!(
            self.output,
            "{kind} appdomain={} thread={} suspended={}{args}",
            app_domain.id(),
            thread.id(),
            thread.suspend_thread_events(),
        )
    }
}

impl<W: Write> EventSink for LogSink<W> {
    type Runtime = Engine;
    type Error = io::Error;

    async fn breakpoint(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        breakpoint: &Breakpoint,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::Breakpoint,
            app_domain,
            thread,
            format_args!(" breakpoint={}", breakpoint.id()),
        )
    }

    async fn breakpoint_set_error(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        breakpoint: &Breakpoint,
        error: u32,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::BreakpointSetError,
            app_domain,
            thread,
            format_args!(" breakpoint={} error={error:#x}", breakpoint.id()),
        )
    }

    async fn log_message(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        level: LoggingLevel,
        switch_name: &str,
        message: &str,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::LogMessage,
            app_domain,
            thread,
            format_args!(" level={level:?} switch={switch_name:?} message={message:?}"),
        )
    }

    async fn step_complete(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        stepper: &Stepper,
        reason: StepReason,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::StepComplete,
            app_domain,
            thread,
            format_args!(" stepper={} reason={reason:?}", stepper.id()),
        )
    }

    async fn user_break(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(EventKind::UserBreak, app_domain, thread, format_args!(""))
    }

    async fn exception(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        frame: &Frame,
        offset: u32,
        phase: ExceptionPhase,
        flags: ExceptionFlags,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::Exception,
            app_domain,
            thread,
            format_args!(
                " frame={} offset={offset:#x} phase={phase:?} flags={:#x}",
                frame.depth(),
                flags.bits()
            ),
        )
    }

    async fn exception_unwind(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        kind: UnwindKind,
        flags: u32,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::ExceptionUnwind,
            app_domain,
            thread,
            format_args!(" kind={kind:?} flags={flags:#x}"),
        )
    }

    async fn eval_complete(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        eval: &Eval,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::EvalComplete,
            app_domain,
            thread,
            format_args!(" eval={}", eval.id()),
        )
    }

    async fn eval_exception(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        eval: &Eval,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(
            EventKind::EvalException,
            app_domain,
            thread,
            format_args!(" eval={}", eval.id()),
        )
    }

    async fn create_thread(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(EventKind::CreateThread, app_domain, thread, format_args!(""))
    }

    async fn exit_thread(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(EventKind::ExitThread, app_domain, thread, format_args!(""))
    }

    async fn name_change(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.write_thread_line(EventKind::NameChange, app_domain, thread, format_args!(""))
    }

    async fn create_process(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.write_line(EventKind::CreateProcess, format_args!("process={}", process.id()))
    }

    async fn exit_process(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.write_line(EventKind::ExitProcess, format_args!("process={}", process.id()))
    }

    async fn control_break_trapped(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::ControlBreakTrapped,
            format_args!("process={}", process.id()),
        )
    }

    async fn debugger_error(
        &mut self,
        process: &Process,
        error_hr: i32,
        error_code: u32,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::DebuggerError,
            format_args!(
                "process={} hr={error_hr:#010x} code={error_code:#x}",
                process.id()
            ),
        )
    }

    async fn create_app_domain(
        &mut self,
        process: &Process,
        app_domain: &AppDomain,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::CreateAppDomain,
            format_args!("process={} appdomain={}", process.id(), app_domain.id()),
        )
    }

    async fn exit_app_domain(
        &mut self,
        process: &Process,
        app_domain: &AppDomain,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::ExitAppDomain,
            format_args!("process={} appdomain={}", process.id(), app_domain.id()),
        )
    }

    async fn load_assembly(
        &mut self,
        app_domain: &AppDomain,
        assembly: &Assembly,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::LoadAssembly,
            format_args!("appdomain={} assembly={:?}", app_domain.id(), assembly.name()),
        )
    }

    async fn load_module(
        &mut self,
        app_domain: &AppDomain,
        module: &Assembly,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::LoadModule,
            format_args!("appdomain={} module={:?}", app_domain.id(), module.name()),
        )
    }

    async fn unload_assembly(
        &mut self,
        app_domain: &AppDomain,
        assembly: &Assembly,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::UnloadAssembly,
            format_args!("appdomain={} assembly={:?}", app_domain.id(), assembly.name()),
        )
    }

    async fn unload_module(
        &mut self,
        app_domain: &AppDomain,
        module: &Assembly,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::UnloadModule,
            format_args!("appdomain={} module={:?}", app_domain.id(), module.name()),
        )
    }

    async fn load_class(
        &mut self,
        app_domain: &AppDomain,
        class: &Class,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::LoadClass,
            format_args!("appdomain={} class={:#010x}", app_domain.id(), class.token()),
        )
    }

    async fn unload_class(
        &mut self,
        app_domain: &AppDomain,
        class: &Class,
    ) -> Result<(), Self::Error> {
        self.write_line(
            EventKind::UnloadClass,
            format_args!("appdomain={} class={:#010x}", app_domain.id(), class.token()),
        )
    }
}
