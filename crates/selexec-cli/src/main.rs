// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! selexec - launch a resolved set of selections

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_run;
mod cmd_show;

use cmd_run::CmdRun;
use cmd_show::CmdShow;
use cmd_test::CmdTest;

#[derive(Parser)]
#[clap(
    name = "selexec",
    about = "Launch a resolved set of selections",
    version,
    long_about = "Bind the environment for a solver's selections and run the chosen command"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Parser, Clone, Debug, Default)]
pub struct StoreFlags {
    /// Search this implementation store (repeatable; default: $SELEXEC_STORES
    /// or the user and system caches)
    #[clap(long = "store")]
    pub stores: Vec<PathBuf>,
}

impl StoreFlags {
    pub fn stores(&self) -> selexec::Stores {
        if self.stores.is_empty() {
            selexec::Stores::from_env()
        } else {
            selexec::Stores::new(self.stores.iter().cloned())
        }
    }

    /// The flags again, as arguments for a child `selexec`.
    pub fn to_args(&self) -> Vec<String> {
        self.stores
            .iter()
            .map(|store| format!("--store={}", store.display()))
            .collect()
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the selected command
    Run(CmdRun),

    /// Run the selected command in a child process and print its output
    Test(CmdTest),

    /// Display the selections and where they are stored
    Show(CmdShow),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        // stdout belongs to the launched program
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Run(mut cmd) => cmd.run(),
            Command::Test(mut cmd) => cmd.run(),
            Command::Show(mut cmd) => cmd.run(),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
