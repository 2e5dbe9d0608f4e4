// SPDX-License-Identifier: Apache-2.0
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "actl",
    about = "Control plane for Agent, ModelConfig, and tool-server resources",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the control plane config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one reconcile pass over the declarative resources in the config
    /// file and print the resulting status conditions.
    ///
    /// With --watch, keeps reconciling on `reconciler.tick_interval_secs`
    /// until interrupted (Ctrl-C).
    Reconcile {
        /// Keep reconciling on the configured tick interval.
        #[arg(long)]
        watch: bool,
    },

    /// Parse and validate a declarative resource file.
    ///
    /// Checks schema invariants (exactly one of inline/remote per Agent,
    /// provider sub-config consistency) and dry-run translates every
    /// inline/workflow Agent against the rest of the file's resources.
    /// Exits 0 if valid, non-zero with a description otherwise.
    Validate {
        /// Path to the resource YAML file to validate
        #[arg(long, short = 'f', required = true)]
        file: PathBuf,
    },

    /// Print the effective configuration and exit
    ShowConfig,

    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "actl", &mut std::io::stdout());
}
