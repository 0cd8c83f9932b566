use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use microdbg_events::dispatcher::{DispatchStats, Dispatcher, SinkErrorPolicy};
use microdbg_events::notification::{
    AppDomainEvent, AssemblyEvent, ClassEvent, EvalEvent, Notification, ProcessEvent, ThreadEvent,
};
use microdbg_events::runtime::Capabilities;
use microdbg_events::sink::UnwindKind;
use microdbg_runtime::{
    AppDomain, Assembly, Breakpoint, Class, Engine, Eval, Frame, Function, Process, Stepper,
    Thread,
};
use miette::IntoDiagnostic;

use crate::config::{ReplayScript, ScriptEvent};
use crate::error::{ReplayError, Result};
use crate::sink::LogSink;

/// Runs the subcommand for replaying an event script.
pub fn evaluate_replay(script: String, output: impl Write, keep_going: bool) -> miette::Result<()> {
    let script = parse_replay_script(script)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async move {
        let (_, stats) = replay(script, output, keep_going).await.into_diagnostic()?;

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "replay done"
        );

        Ok(())
    })
}

/// Replays the events of a script into a [LogSink].
///
/// Every event is turned into a notification before the first one is
/// delivered, so that an invalid script doesn't get partially replayed.
pub async fn replay<W: Write>(
    script: ReplayScript,
    output: W,
    keep_going: bool,
) -> Result<(W, DispatchStats)> {
    let policy = if keep_going {
        SinkErrorPolicy::Continue
    } else {
        script.on_sink_error.into()
    };

    let debuggee = Debuggee::from_script(&script)?;

    let notifications = script
        .events
        .events
        .into_iter()
        .map(|event| debuggee.notification(event))
        .collect::<Result<Vec<_>>>()?;

    let (queue, dispatcher) = Dispatcher::builder(LogSink::new(output))
        .on_sink_error(policy)
        .build();

    for notification in notifications {
        queue.submit(notification)?;
    }

    drop(queue);

    let (sink, stats) = dispatcher.run().await?;
    let output = sink.into_inner()?;

    Ok((output, stats))
}

/// Entities of the debuggee declared by a script.
#[derive(Default)]
struct Debuggee {
    engine: Engine,
    processes: HashMap<u64, Process>,
    app_domains: HashMap<u64, AppDomain>,
    assemblies: HashMap<u64, Assembly>,
    classes: HashMap<u32, Class>,
    threads: HashMap<u64, Thread>,
    frames: HashMap<u64, Frame>,
}

impl Debuggee {
    fn from_script(script: &ReplayScript) -> Result<Self> {
        let mut debuggee = Self {
            engine: Engine::new(Capabilities {
                exception_filters: script.capabilities.exception_filters,
            }),
            ..Default::default()
        };

        for decl in &script.processes {
            debuggee.processes.insert(decl.id, Process::new(decl.id));
        }

        for decl in &script.app_domains {
            let process = lookup(&debuggee.processes, "process", decl.process)?;
            let app_domain = AppDomain::new(decl.id, process);
            debuggee.app_domains.insert(decl.id, app_domain);
        }

        for decl in &script.assemblies {
            let app_domain = lookup(&debuggee.app_domains, "app-domain", decl.app_domain)?;
            let assembly = Assembly::new(decl.id, decl.name.as_str(), app_domain);
            debuggee.assemblies.insert(decl.id, assembly);
        }

        for decl in &script.classes {
            let assembly = lookup(&debuggee.assemblies, "assembly", decl.assembly)?;
            debuggee
                .classes
                .insert(decl.token, Class::new(decl.token, assembly));
        }

        // real threads first, so that virtual ones can be declared anywhere
        for decl in &script.threads {
            match (decl.app_domain, decl.real) {
                (Some(app_domain), None) => {
                    let app_domain = lookup(&debuggee.app_domains, "app-domain", app_domain)?;
                    let thread = debuggee.engine.thread(decl.id, app_domain);
                    debuggee.threads.insert(decl.id, thread);
                }
                (None, Some(_)) => (),
                _ => return Err(ReplayError::InvalidThread(decl.id)),
            }
        }

        for decl in &script.threads {
            if let Some(real) = decl.real {
                let real = lookup(&debuggee.threads, "thread", real)?;
                let thread = debuggee.engine.virtual_thread(decl.id, real);
                debuggee.threads.insert(decl.id, thread);
            }
        }

        let functions = script
            .functions
            .iter()
            .map(|decl| {
                let function = if decl.il_map.is_empty() {
                    Function::new(decl.token)
                } else {
                    Function::with_symbols(
                        decl.token,
                        decl.il_map.iter().map(|m| (m.compact, m.standard)),
                    )
                };

                (decl.token, function)
            })
            .collect::<HashMap<_, _>>();

        for decl in &script.frames {
            let frame = match decl.function {
                Some(token) => Frame::new(decl.depth, lookup(&functions, "function", token)?),
                None => Frame::unknown(decl.depth),
            };

            debuggee.frames.insert(decl.id, frame);
        }

        tracing::debug!(
            processes = debuggee.processes.len(),
            app_domains = debuggee.app_domains.len(),
            threads = debuggee.threads.len(),
            "debuggee declared"
        );

        Ok(debuggee)
    }

    fn thread(&self, id: u64) -> Result<Thread> {
        lookup(&self.threads, "thread", id).cloned()
    }

    fn process(&self, id: u64) -> Result<Process> {
        lookup(&self.processes, "process", id).cloned()
    }

    fn app_domain(&self, id: u64) -> Result<AppDomain> {
        lookup(&self.app_domains, "app-domain", id).cloned()
    }

    fn assembly(&self, id: u64) -> Result<Assembly> {
        lookup(&self.assemblies, "assembly", id).cloned()
    }

    fn class(&self, token: u32) -> Result<Class> {
        lookup(&self.classes, "class", token).cloned()
    }

    fn frame(&self, id: u64) -> Result<Frame> {
        lookup(&self.frames, "frame", id).cloned()
    }

    fn notification(&self, event: ScriptEvent) -> Result<Notification<Engine>> {
        let notification = match event {
            ScriptEvent::Breakpoint(e) => {
                Notification::breakpoint(self.thread(e.thread)?, Breakpoint::new(e.breakpoint))
            }
            ScriptEvent::BreakpointSetError(e) => Notification::breakpoint_set_error(
                self.thread(e.thread)?,
                Breakpoint::new(e.breakpoint),
                e.error,
            ),
            ScriptEvent::LogMessage(e) => Notification::debug_message(
                self.thread(e.thread)?,
                self.app_domain(e.app_domain)?,
                e.switch_name,
                e.message,
                e.level.into(),
            ),
            ScriptEvent::StepComplete(e) => Notification::step_complete(
                self.thread(e.thread)?,
                Stepper::new(e.stepper),
                e.reason.into(),
            ),
            ScriptEvent::UserBreak(e) => Notification::user_break(self.thread(e.id)?),
            ScriptEvent::Exception(e) => Notification::exception(
                self.thread(e.thread)?,
                self.frame(e.frame)?,
                e.offset,
                e.phase.into(),
            ),
            ScriptEvent::ExceptionUnwind(e) => match UnwindKind::from(e.kind) {
                UnwindKind::INTERCEPTED => Notification::exception_unwind(
                    self.thread(e.thread)?,
                    self.frame(e.frame)?,
                    UnwindKind::INTERCEPTED,
                ),
                kind => return Err(ReplayError::UnsupportedUnwind(kind)),
            },
            ScriptEvent::EvalComplete(e) => {
                Notification::eval(self.thread(e.thread)?, Eval::new(e.eval), EvalEvent::Complete)
            }
            ScriptEvent::EvalException(e) => Notification::eval(
                self.thread(e.thread)?,
                Eval::new(e.eval),
                EvalEvent::Exception,
            ),
            ScriptEvent::CreateThread(e) => {
                Notification::thread(self.thread(e.id)?, ThreadEvent::Created)
            }
            ScriptEvent::ExitThread(e) => {
                Notification::thread(self.thread(e.id)?, ThreadEvent::Exited)
            }
            ScriptEvent::NameChange(e) => {
                Notification::thread(self.thread(e.id)?, ThreadEvent::NameChanged)
            }
            ScriptEvent::CreateProcess(e) => {
                Notification::process(self.process(e.id)?, ProcessEvent::Created)
            }
            ScriptEvent::ExitProcess(e) => {
                Notification::process(self.process(e.id)?, ProcessEvent::Exited)
            }
            ScriptEvent::ControlBreakTrapped(e) => {
                Notification::process(self.process(e.id)?, ProcessEvent::ControlBreakTrapped)
            }
            ScriptEvent::DebuggerError(e) => {
                Notification::process_error(self.process(e.process)?, e.hr, e.code)
            }
            ScriptEvent::CreateAppDomain(e) => {
                Notification::app_domain(self.app_domain(e.id)?, AppDomainEvent::Created)
            }
            ScriptEvent::ExitAppDomain(e) => {
                Notification::app_domain(self.app_domain(e.id)?, AppDomainEvent::Exited)
            }
            ScriptEvent::LoadAssembly(e) => {
                Notification::assembly(self.assembly(e.id)?, AssemblyEvent::AssemblyLoaded)
            }
            ScriptEvent::LoadModule(e) => {
                Notification::assembly(self.assembly(e.id)?, AssemblyEvent::ModuleLoaded)
            }
            ScriptEvent::UnloadAssembly(e) => {
                Notification::assembly(self.assembly(e.id)?, AssemblyEvent::AssemblyUnloaded)
            }
            ScriptEvent::UnloadModule(e) => {
                Notification::assembly(self.assembly(e.id)?, AssemblyEvent::ModuleUnloaded)
            }
            ScriptEvent::LoadClass(e) => {
                Notification::class(self.class(e.token)?, ClassEvent::Loaded)
            }
            ScriptEvent::UnloadClass(e) => {
                Notification::class(self.class(e.token)?, ClassEvent::Unloaded)
            }
        };

        Ok(notification)
    }
}

fn lookup<'a, K, V>(entities: &'a HashMap<K, V>, kind: &'static str, id: K) -> Result<&'a V>
where
    K: Copy + Eq + std::hash::Hash + Into<u64>,
{
    entities
        .get(&id)
        .ok_or(ReplayError::UnknownEntity { kind, id: id.into() })
}

/// Parses an event script, given either inline or as a path to a `.kdl` file.
pub fn parse_replay_script(script: String) -> miette::Result<ReplayScript> {
    let path = Path::new(&script);

    let script = if let Some((filename, "kdl")) = path
        .file_name()
        .and_then(OsStr::to_str)
        .zip(path.extension().and_then(OsStr::to_str))
    {
        let content = std::fs::read_to_string(path).into_diagnostic()?;
        knus::parse(filename, &content)?
    } else {
        knus::parse("<content>", &script)?
    };

    Ok(script)
}
