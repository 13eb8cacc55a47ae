// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `selexec run` command.

use clap::Args;
use miette::Result;
use std::path::PathBuf;

/// Run the selected command
#[derive(Debug, Args)]
pub struct CmdRun {
    /// Selections document to run
    pub selections: PathBuf,

    /// Program to run instead of the command's default (relative to the
    /// command's directory, or to the implementation root if it starts with '/')
    #[clap(long)]
    pub main: Option<String>,

    /// Command to run the program through, e.g. "gdb --args"
    #[clap(long)]
    pub wrapper: Option<String>,

    /// Show what would be run without running it
    #[clap(long)]
    pub dry_run: bool,

    /// Implementation store flags
    #[clap(flatten)]
    pub stores: crate::StoreFlags,

    /// Arguments for the program
    #[clap(last = true)]
    pub args: Vec<String>,
}

impl CmdRun {
    pub fn run(&mut self) -> Result<i32> {
        let selections = selexec::Selections::load(&self.selections)?;
        tracing::debug!(
            interface = %selections.interface,
            count = selections.selections.len(),
            "loaded selections"
        );

        let options = selexec::ExecuteOptions {
            dry_run: self.dry_run,
            main: self.main.clone(),
            wrapper: self.wrapper.clone(),
        };

        // Only returns for a dry run
        selexec::execute_selections(&selections, &self.stores.stores(), &self.args, &options)?;
        Ok(0)
    }
}
