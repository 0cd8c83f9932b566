
use std::sync::Arc;

use microdbg_events::notification::{
    AppDomainEvent, AssemblyEvent, ClassEvent, EvalEvent, EventKind, Notification, ProcessEvent,
    ThreadEvent,
};
use microdbg_events::sink::{ExceptionFlags, ExceptionPhase, LoggingLevel, StepReason, UnwindKind};
use microdbg_runtime::{Breakpoint, Engine, Eval, Frame, Function, Stepper};
use test_log::test;
use tokio::sync::Notify;

use crate::common::{Debuggee, Delivered, Detail, Gate, RecordingSink};

async fn deliver_one(notification: Notification<Engine>) -> Delivered {
    let mut sink = RecordingSink::new();
    notification.deliver(&mut sink).await.expect("deliver");

    let mut delivered = sink.delivered();
    assert_eq!(delivered.len(), 1, "exactly one sink call per delivery");
    delivered.remove(0)
}

fn thread_notifications(debuggee: &Debuggee) -> Vec<Notification<Engine>> {
    let thread = &debuggee.thread;
    let frame = Frame::unknown(0);

    vec![
        Notification::thread(thread.clone(), ThreadEvent::Created),
        Notification::thread(thread.clone(), ThreadEvent::Exited),
        Notification::thread(thread.clone(), ThreadEvent::NameChanged),
        Notification::breakpoint(thread.clone(), Breakpoint::new(1)),
        Notification::breakpoint_set_error(thread.clone(), Breakpoint::new(1), 5),
        Notification::debug_message(
            thread.clone(),
            debuggee.app_domain.clone(),
            "switch",
            "hello",
            LoggingLevel::WARNING,
        ),
        Notification::step_complete(thread.clone(), Stepper::new(1), StepReason::NORMAL),
        Notification::user_break(thread.clone()),
        Notification::exception(
            thread.clone(),
            frame.clone(),
            0,
            ExceptionPhase::FIRST_CHANCE,
        ),
        Notification::exception_unwind(thread.clone(), frame, UnwindKind::INTERCEPTED),
        Notification::eval(thread.clone(), Eval::new(1), EvalEvent::Complete),
        Notification::eval(thread.clone(), Eval::new(1), EvalEvent::Exception),
    ]
}

#[test(tokio::test)]
async fn suspension_restored_after_delivery() {
    for initial in [false, true] {
        let debuggee = Debuggee::new(false);

        for notification in thread_notifications(&debuggee) {
            debuggee.thread.set_suspend_thread_events(initial);

            let kind = notification.kind();
            let mut sink = RecordingSink::new();
            notification.deliver(&mut sink).await.expect("deliver");

            assert_eq!(
                debuggee.thread.suspend_thread_events(),
                initial,
                "suspension not restored after {kind}"
            );
        }
    }
}

#[test(tokio::test)]
async fn suspension_restored_on_sink_failure() {
    for initial in [false, true] {
        let debuggee = Debuggee::new(false);

        for notification in thread_notifications(&debuggee) {
            debuggee.thread.set_suspend_thread_events(initial);

            let kind = notification.kind();
            let mut sink = RecordingSink::new().failing_on(kind);
            let err = notification.deliver(&mut sink).await.unwrap_err();

            assert_eq!(err.0.0, kind);
            assert_eq!(
                debuggee.thread.suspend_thread_events(),
                initial,
                "suspension not restored after failed {kind}"
            );
        }
    }
}

#[test(tokio::test)]
async fn suspension_restored_when_delivery_is_dropped() {
    let debuggee = Debuggee::default();
    let entered = Arc::new(Notify::new());

    let mut sink = RecordingSink::new().gated(Gate {
        index: 0,
        entered: entered.clone(),
        release: Arc::new(Notify::new()),
    });

    let notification = Notification::thread(debuggee.thread.clone(), ThreadEvent::Created);

    let mut delivery = Box::pin(notification.deliver(&mut sink));

    tokio::select! {
        _ = &mut delivery => panic!("gated delivery completed"),
        _ = entered.notified() => {}
    }

    assert!(debuggee.thread.suspend_thread_events());

    drop(delivery);

    assert!(!debuggee.thread.suspend_thread_events());
}

#[test(tokio::test)]
async fn created_thread_suspended_during_delivery() {
    let debuggee = Debuggee::default();

    let notification = Notification::thread(debuggee.thread.clone(), ThreadEvent::Created);
    assert_eq!(notification.suspends_thread_events(), Some(true));

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.kind, EventKind::CreateThread);
    assert_eq!(delivered.thread, Some(7));
    assert_eq!(delivered.app_domain, Some(1));
    assert_eq!(delivered.suspended, Some(true));
    assert!(!debuggee.thread.suspend_thread_events());
}

#[test(tokio::test)]
async fn name_change_not_suspended_during_delivery() {
    let debuggee = Debuggee::default();
    debuggee.thread.set_suspend_thread_events(true);

    let notification = Notification::thread(debuggee.thread.clone(), ThreadEvent::NameChanged);
    assert_eq!(notification.suspends_thread_events(), Some(false));

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.kind, EventKind::NameChange);
    assert_eq!(delivered.suspended, Some(false));
    assert!(debuggee.thread.suspend_thread_events());
}

#[test(tokio::test)]
async fn exception_suspension_without_exception_filters() {
    let debuggee = Debuggee::new(false);

    let cases = [
        (ExceptionPhase::FIRST_CHANCE, true),
        (ExceptionPhase::USER_FIRST_CHANCE, true),
        (ExceptionPhase::CATCH_HANDLER_FOUND, false),
        (ExceptionPhase::UNHANDLED, false),
    ];

    for (phase, suspended) in cases {
        let notification =
            Notification::exception(debuggee.thread.clone(), Frame::unknown(0), 0, phase);
        assert_eq!(notification.suspends_thread_events(), Some(suspended));

        let delivered = deliver_one(notification).await;
        assert_eq!(delivered.suspended, Some(suspended), "{phase:?}");
    }
}

#[test(tokio::test)]
async fn exception_not_suspended_with_exception_filters() {
    let debuggee = Debuggee::new(true);

    for phase in [ExceptionPhase::FIRST_CHANCE, ExceptionPhase::USER_FIRST_CHANCE] {
        let notification =
            Notification::exception(debuggee.thread.clone(), Frame::unknown(0), 0, phase);

        let delivered = deliver_one(notification).await;
        assert_eq!(delivered.suspended, Some(false), "{phase:?}");
    }
}

#[test(tokio::test)]
async fn exception_offset_translated_with_symbols() {
    let debuggee = Debuggee::default();

    let function = Function::with_symbols(0x0600_0001, [(0x0, 0x0), (0x10, 0x20)]);
    let frame = Frame::new(3, &function);

    let delivered = deliver_one(Notification::exception(
        debuggee.thread.clone(),
        frame,
        0x10,
        ExceptionPhase::UNHANDLED,
    ))
    .await;

    assert_eq!(
        delivered.detail,
        Detail::Exception {
            frame_depth: 3,
            offset: 0x20,
            phase: ExceptionPhase::UNHANDLED,
            flags: ExceptionFlags::CAN_BE_INTERCEPTED,
        }
    );
}

#[test(tokio::test)]
async fn exception_offset_unchanged_without_symbols() {
    let debuggee = Debuggee::default();

    for frame in [Frame::new(1, &Function::new(0x0600_0002)), Frame::unknown(1)] {
        let delivered = deliver_one(Notification::exception(
            debuggee.thread.clone(),
            frame,
            0x10,
            ExceptionPhase::FIRST_CHANCE,
        ))
        .await;

        assert_eq!(
            delivered.detail,
            Detail::Exception {
                frame_depth: 1,
                offset: 0x10,
                phase: ExceptionPhase::FIRST_CHANCE,
                flags: ExceptionFlags::CAN_BE_INTERCEPTED,
            }
        );
    }
}

#[test(tokio::test)]
async fn exception_unwind_intercepted() {
    let debuggee = Debuggee::default();
    let frame = Frame::unknown(2);

    let notification = Notification::exception_unwind(
        debuggee.thread.clone(),
        frame.clone(),
        UnwindKind::INTERCEPTED,
    );
    assert_eq!(notification.frame(), Some(&frame));

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.kind, EventKind::ExceptionUnwind);
    assert_eq!(delivered.detail, Detail::Unwind(UnwindKind::INTERCEPTED, 0));
    assert_eq!(delivered.suspended, Some(false));
}

#[test(tokio::test)]
async fn virtual_thread_canonicalized() {
    let debuggee = Debuggee::default();
    let proxy = debuggee.engine.virtual_thread(42, &debuggee.thread);

    let notification = Notification::breakpoint(proxy, Breakpoint::new(3));
    assert_eq!(notification.real_thread(), Some(&debuggee.thread));

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.thread, Some(7));
    assert_eq!(delivered.detail, Detail::Breakpoint(3));
}

#[test(tokio::test)]
async fn thread_app_domain_resolved_at_delivery() {
    let debuggee = Debuggee::default();
    let other = debuggee.other_app_domain();

    let notification = Notification::step_complete(
        debuggee.thread.clone(),
        Stepper::new(9),
        StepReason::RETURN,
    );

    debuggee.thread.move_to(&other);

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.app_domain, Some(2));
    assert_eq!(delivered.detail, Detail::Step(9, StepReason::RETURN));
}

#[test(tokio::test)]
async fn debug_message_keeps_captured_app_domain() {
    let debuggee = Debuggee::default();
    let other = debuggee.other_app_domain();

    let notification = Notification::debug_message(
        debuggee.thread.clone(),
        debuggee.app_domain.clone(),
        "Trace",
        "booting",
        LoggingLevel::STATUS_LEVEL1,
    );

    debuggee.thread.move_to(&other);

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.app_domain, Some(1));
    assert_eq!(
        delivered.detail,
        Detail::Log {
            level: LoggingLevel::STATUS_LEVEL1,
            switch_name: "Trace".to_owned(),
            message: "booting".to_owned(),
        }
    );
}

#[test(tokio::test)]
async fn unlisted_engine_codes_passed_through() {
    let debuggee = Debuggee::new(false);

    let delivered = deliver_one(Notification::debug_message(
        debuggee.thread.clone(),
        debuggee.app_domain.clone(),
        "Trace",
        "custom level",
        LoggingLevel(0x5),
    ))
    .await;

    assert_eq!(
        delivered.detail,
        Detail::Log {
            level: LoggingLevel(0x5),
            switch_name: "Trace".to_owned(),
            message: "custom level".to_owned(),
        }
    );

    let notification = Notification::exception(
        debuggee.thread.clone(),
        Frame::unknown(0),
        0,
        ExceptionPhase(5),
    );
    assert_eq!(notification.suspends_thread_events(), Some(false));

    let delivered = deliver_one(notification).await;

    assert_eq!(delivered.suspended, Some(false));
    assert_eq!(
        delivered.detail,
        Detail::Exception {
            frame_depth: 0,
            offset: 0,
            phase: ExceptionPhase(5),
            flags: ExceptionFlags::CAN_BE_INTERCEPTED,
        }
    );
}

#[test(tokio::test)]
async fn class_app_domain_resolved_at_delivery() {
    let debuggee = Debuggee::default();
    let other = debuggee.other_app_domain();

    let loaded = Notification::class(debuggee.class.clone(), ClassEvent::Loaded);
    let unloaded = Notification::class(debuggee.class.clone(), ClassEvent::Unloaded);

    let delivered = deliver_one(loaded).await;
    assert_eq!(delivered.kind, EventKind::LoadClass);
    assert_eq!(delivered.app_domain, Some(1));

    debuggee.assembly.move_to(&other);

    let delivered = deliver_one(unloaded).await;
    assert_eq!(delivered.kind, EventKind::UnloadClass);
    assert_eq!(delivered.app_domain, Some(2));
    assert_eq!(delivered.detail, Detail::Class(0x0200_0001));
}

#[test(tokio::test)]
async fn assembly_events() {
    let debuggee = Debuggee::default();

    let cases = [
        (AssemblyEvent::AssemblyLoaded, EventKind::LoadAssembly),
        (AssemblyEvent::ModuleLoaded, EventKind::LoadModule),
        (AssemblyEvent::AssemblyUnloaded, EventKind::UnloadAssembly),
        (AssemblyEvent::ModuleUnloaded, EventKind::UnloadModule),
    ];

    for (event, kind) in cases {
        let notification = Notification::assembly(debuggee.assembly.clone(), event);
        assert_eq!(notification.kind(), kind);
        assert_eq!(notification.suspends_thread_events(), None);

        let delivered = deliver_one(notification).await;
        assert_eq!(delivered.kind, kind);
        assert_eq!(delivered.app_domain, Some(1));
        assert_eq!(delivered.detail, Detail::Assembly(10));
    }
}

#[test(tokio::test)]
async fn app_domain_events() {
    let debuggee = Debuggee::default();

    for (event, kind) in [
        (AppDomainEvent::Created, EventKind::CreateAppDomain),
        (AppDomainEvent::Exited, EventKind::ExitAppDomain),
    ] {
        let delivered =
            deliver_one(Notification::app_domain(debuggee.app_domain.clone(), event)).await;

        assert_eq!(delivered.kind, kind);
        assert_eq!(delivered.process, Some(100));
        assert_eq!(delivered.app_domain, Some(1));
    }
}

#[test(tokio::test)]
async fn process_events() {
    let debuggee = Debuggee::default();

    for (event, kind) in [
        (ProcessEvent::Created, EventKind::CreateProcess),
        (ProcessEvent::Exited, EventKind::ExitProcess),
        (ProcessEvent::ControlBreakTrapped, EventKind::ControlBreakTrapped),
    ] {
        let delivered = deliver_one(Notification::process(debuggee.process.clone(), event)).await;

        assert_eq!(delivered.kind, kind);
        assert_eq!(delivered.process, Some(100));
        assert_eq!(delivered.thread, None);
    }
}

#[test(tokio::test)]
async fn process_error_codes_passed_through() {
    let debuggee = Debuggee::default();
    let error_hr = 0x8013_1c30_u32 as i32;

    let delivered = deliver_one(Notification::process_error(
        debuggee.process.clone(),
        error_hr,
        0xdead,
    ))
    .await;

    assert_eq!(delivered.kind, EventKind::DebuggerError);
    assert_eq!(delivered.detail, Detail::DebuggerError(error_hr, 0xdead));
}

#[test(tokio::test)]
async fn eval_events() {
    let debuggee = Debuggee::default();

    for (event, kind) in [
        (EvalEvent::Complete, EventKind::EvalComplete),
        (EvalEvent::Exception, EventKind::EvalException),
    ] {
        let delivered =
            deliver_one(Notification::eval(debuggee.thread.clone(), Eval::new(4), event)).await;

        assert_eq!(delivered.kind, kind);
        assert_eq!(delivered.detail, Detail::Eval(4));
    }
}

#[test(tokio::test)]
async fn breakpoint_set_error_code_passed_through() {
    let debuggee = Debuggee::default();

    let delivered = deliver_one(Notification::breakpoint_set_error(
        debuggee.thread.clone(),
        Breakpoint::new(2),
        0x8013_1302,
    ))
    .await;

    assert_eq!(delivered.detail, Detail::BreakpointSetError(2, 0x8013_1302));
}

#[test(tokio::test)]
async fn breakpoint_marshal_type() {
    struct FunctionBreakpoint;

    let debuggee = Debuggee::default();

    let plain = Notification::<Engine>::breakpoint(debuggee.thread.clone(), Breakpoint::new(1));
    assert_eq!(plain.marshal_type(), None);

    let typed = Notification::breakpoint_as::<FunctionBreakpoint>(
        debuggee.thread.clone(),
        Breakpoint::new(1),
    );
    assert!(typed.marshal_type().unwrap().ends_with("FunctionBreakpoint"));

    let delivered = deliver_one(typed).await;
    assert_eq!(delivered.kind, EventKind::Breakpoint);
    assert_eq!(delivered.detail, Detail::Breakpoint(1));
}
