use std::path::PathBuf;

/// The microdbg event replayer.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to replay a script of debugger events through the dispatcher.
    Replay {
        /// Event script (KDL format).
        ///
        /// If it ends with `.kdl`, it is treated as a path to a script file.
        /// Otherwise it is directly parsed as an inline KDL-formatted script.
        #[clap(short, long, value_name = "CONTENT/PATH")]
        script: String,

        /// Path to the optional destination of the delivered calls log.
        #[clap(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Keep dispatching when the event sink fails, whatever the script
        /// specifies.
        #[clap(long)]
        keep_going: bool,
    },
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}
