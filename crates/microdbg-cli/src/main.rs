#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use std::fs::File;

use miette::IntoDiagnostic;

use microdbg_cli::{CliAction, CliOpts};

use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("MICRODBG_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let res = match cli.action {
        CliAction::Replay {
            script,
            output,
            keep_going,
        } => match output {
            Some(output) => File::create(output)
                .into_diagnostic()
                .and_then(|file| microdbg_cli::evaluate_replay(script, file, keep_going)),
            None => microdbg_cli::evaluate_replay(script, std::io::stdout(), keep_going),
        },
    };

    if let Err(e) = res {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
