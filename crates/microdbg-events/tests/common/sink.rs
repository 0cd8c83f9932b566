use std::sync::{Arc, Mutex};

use microdbg_events::dispatcher::EventQueue;
use microdbg_events::notification::{EventKind, Notification};
use microdbg_events::sink::{EventSink, ExceptionFlags, ExceptionPhase, LoggingLevel};
use microdbg_events::sink::{StepReason, UnwindKind};
use microdbg_runtime::{AppDomain, Assembly, Breakpoint, Class, Engine, Eval, Frame, Process};
use microdbg_runtime::{Stepper, Thread};
use tokio::sync::Notify;

#[derive(Debug, thiserror::Error)]
#[error("sink refused {0}")]
pub struct SinkFailure(pub EventKind);

/// Call received by the [RecordingSink].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivered {
    pub kind: EventKind,
    pub process: Option<u64>,
    pub app_domain: Option<u64>,
    pub thread: Option<u64>,

    /// Thread events suspension observed during the call.
    pub suspended: Option<bool>,

    pub detail: Detail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Detail {
    None,
    Breakpoint(u64),
    BreakpointSetError(u64, u32),
    Log {
        level: LoggingLevel,
        switch_name: String,
        message: String,
    },
    Step(u64, StepReason),
    Exception {
        frame_depth: u32,
        offset: u32,
        phase: ExceptionPhase,
        flags: ExceptionFlags,
    },
    Unwind(UnwindKind, u32),
    Eval(u64),
    DebuggerError(i32, u32),
    Assembly(u64),
    Class(u32),
}

impl Delivered {
    fn on_thread(kind: EventKind, app_domain: &AppDomain, thread: &Thread, detail: Detail) -> Self {
        Self {
            kind,
            process: Some(app_domain.process().id()),
            app_domain: Some(app_domain.id()),
            thread: Some(thread.id()),
            suspended: Some(thread.suspend_thread_events()),
            detail,
        }
    }

    fn on_app_domain(kind: EventKind, app_domain: &AppDomain, detail: Detail) -> Self {
        Self {
            kind,
            process: Some(app_domain.process().id()),
            app_domain: Some(app_domain.id()),
            thread: None,
            suspended: None,
            detail,
        }
    }

    fn on_process(kind: EventKind, process: &Process, detail: Detail) -> Self {
        Self {
            kind,
            process: Some(process.id()),
            app_domain: None,
            thread: None,
            suspended: None,
            detail,
        }
    }
}

/// Gate holding back the delivery of the n-th notification.
pub struct Gate {
    pub index: usize,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Event sink recording every call it receives.
#[derive(Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<Delivered>>>,
    fail_on: Vec<EventKind>,
    gate: Option<Gate>,
    pending: PendingSubmission,
}

/// Notification submitted by the [RecordingSink] from within the next call
/// it receives.
pub type PendingSubmission = Arc<Mutex<Option<(EventQueue<Engine>, Notification<Engine>)>>>;

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every call of the given kind.
    pub fn failing_on(mut self, kind: EventKind) -> Self {
        self.fail_on.push(kind);
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Shared slot for a notification to submit from within the next call.
    pub fn pending(&self) -> PendingSubmission {
        self.pending.clone()
    }

    /// Shared view over the recorded calls.
    pub fn log(&self) -> Arc<Mutex<Vec<Delivered>>> {
        self.log.clone()
    }

    pub fn delivered(&self) -> Vec<Delivered> {
        self.log.lock().unwrap().clone()
    }

    async fn record(&mut self, delivered: Delivered) -> Result<(), SinkFailure> {
        let index = self.log.lock().unwrap().len();

        if let Some(gate) = self.gate.as_ref().filter(|gate| gate.index == index) {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let pending = self.pending.lock().unwrap().take();
        if let Some((queue, notification)) = pending {
            queue.submit(notification).unwrap();
        }

        let kind = delivered.kind;
        self.log.lock().unwrap().push(delivered);

        if self.fail_on.contains(&kind) {
            Err(SinkFailure(kind))
        } else {
            Ok(())
        }
    }
}

impl EventSink for RecordingSink {
    type Runtime = Engine;
    type Error = SinkFailure;

    async fn breakpoint(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        breakpoint: &Breakpoint,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Breakpoint(breakpoint.id());
        self.record(Delivered::on_thread(EventKind::Breakpoint, app_domain, thread, detail))
            .await
    }

    async fn breakpoint_set_error(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        breakpoint: &Breakpoint,
        error: u32,
    ) -> Result<(), Self::Error> {
        let detail = Detail::BreakpointSetError(breakpoint.id(), error);
        self.record(Delivered::on_thread(
            EventKind::BreakpointSetError,
            app_domain,
            thread,
            detail,
        ))
        .await
    }

    async fn log_message(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        level: LoggingLevel,
        switch_name: &str,
        message: &str,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Log {
            level,
            switch_name: switch_name.to_owned(),
            message: message.to_owned(),
        };
        self.record(Delivered::on_thread(EventKind::LogMessage, app_domain, thread, detail))
            .await
    }

    async fn step_complete(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        stepper: &Stepper,
        reason: StepReason,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Step(stepper.id(), reason);
        self.record(Delivered::on_thread(EventKind::StepComplete, app_domain, thread, detail))
            .await
    }

    async fn user_break(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.record(Delivered::on_thread(EventKind::UserBreak, app_domain, thread, Detail::None))
            .await
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
        let detail = Detail::Exception {
            frame_depth: frame.depth(),
            offset,
            phase,
            flags,
        };
        self.record(Delivered::on_thread(EventKind::Exception, app_domain, thread, detail))
            .await
    }

    async fn exception_unwind(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        kind: UnwindKind,
        flags: u32,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Unwind(kind, flags);
        self.record(Delivered::on_thread(EventKind::ExceptionUnwind, app_domain, thread, detail))
            .await
    }

    async fn eval_complete(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        eval: &Eval,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Eval(eval.id());
        self.record(Delivered::on_thread(EventKind::EvalComplete, app_domain, thread, detail))
            .await
    }

    async fn eval_exception(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
        eval: &Eval,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Eval(eval.id());
        self.record(Delivered::on_thread(EventKind::EvalException, app_domain, thread, detail))
            .await
    }

    async fn create_thread(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.record(Delivered::on_thread(EventKind::CreateThread, app_domain, thread, Detail::None))
            .await
    }

    async fn exit_thread(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.record(Delivered::on_thread(EventKind::ExitThread, app_domain, thread, Detail::None))
            .await
    }

    async fn name_change(
        &mut self,
        app_domain: &AppDomain,
        thread: &Thread,
    ) -> Result<(), Self::Error> {
        self.record(Delivered::on_thread(EventKind::NameChange, app_domain, thread, Detail::None))
            .await
    }

    async fn create_process(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.record(Delivered::on_process(EventKind::CreateProcess, process, Detail::None))
            .await
    }

    async fn exit_process(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.record(Delivered::on_process(EventKind::ExitProcess, process, Detail::None))
            .await
    }

    async fn control_break_trapped(&mut self, process: &Process) -> Result<(), Self::Error> {
        self.record(Delivered::on_process(
            EventKind::ControlBreakTrapped,
            process,
            Detail::None,
        ))
        .await
    }

    async fn debugger_error(
        &mut self,
        process: &Process,
        error_hr: i32,
        error_code: u32,
    ) -> Result<(), Self::Error> {
        let detail = Detail::DebuggerError(error_hr, error_code);
        self.record(Delivered::on_process(EventKind::DebuggerError, process, detail))
            .await
    }

    async fn create_app_domain(
        &mut self,
        process: &Process,
        app_domain: &AppDomain,
    ) -> Result<(), Self::Error> {
        assert_eq!(*process, app_domain.process());
        self.record(Delivered::on_app_domain(
            EventKind::CreateAppDomain,
            app_domain,
            Detail::None,
        ))
        .await
    }

    async fn exit_app_domain(
        &mut self,
        process: &Process,
        app_domain: &AppDomain,
    ) -> Result<(), Self::Error> {
        assert_eq!(*process, app_domain.process());
        self.record(Delivered::on_app_domain(
            EventKind::ExitAppDomain,
            app_domain,
            Detail::None,
        ))
        .await
    }

    async fn load_assembly(
        &mut self,
        app_domain: &AppDomain,
        assembly: &Assembly,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Assembly(assembly.id());
        self.record(Delivered::on_app_domain(EventKind::LoadAssembly, app_domain, detail))
            .await
    }

    async fn load_module(
        &mut self,
        app_domain: &AppDomain,
        module: &Assembly,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Assembly(module.id());
        self.record(Delivered::on_app_domain(EventKind::LoadModule, app_domain, detail))
            .await
    }

    async fn unload_assembly(
        &mut self,
        app_domain: &AppDomain,
        assembly: &Assembly,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Assembly(assembly.id());
        self.record(Delivered::on_app_domain(EventKind::UnloadAssembly, app_domain, detail))
            .await
    }

    async fn unload_module(
        &mut self,
        app_domain: &AppDomain,
        module: &Assembly,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Assembly(module.id());
        self.record(Delivered::on_app_domain(EventKind::UnloadModule, app_domain, detail))
            .await
    }

    async fn load_class(
        &mut self,
        app_domain: &AppDomain,
        class: &Class,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Class(class.token());
        self.record(Delivered::on_app_domain(EventKind::LoadClass, app_domain, detail))
            .await
    }

    async fn unload_class(
        &mut self,
        app_domain: &AppDomain,
        class: &Class,
    ) -> Result<(), Self::Error> {
        let detail = Detail::Class(class.token());
        self.record(Delivered::on_app_domain(EventKind::UnloadClass, app_domain, detail))
            .await
    }
}
