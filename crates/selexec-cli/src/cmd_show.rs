// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `selexec show` command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use miette::Result;
use selexec::{Environ, Provenance, Selections, Stores};

/// Display the selections and where they are stored
#[derive(Debug, Args)]
pub struct CmdShow {
    /// Selections document to show
    selections: PathBuf,

    /// Also show the environment variables the bindings would set
    #[clap(long)]
    env: bool,

    /// Output format: table, yaml
    #[clap(long, default_value = "table")]
    format: String,

    /// Implementation store flags
    #[clap(flatten)]
    stores: crate::StoreFlags,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let selections = Selections::load(&self.selections)?;
        let stores = self.stores.stores();

        if self.format == "yaml" {
            print!("{}", selections.to_yaml()?);
            return Ok(0);
        }

        self.show_selections_table(&selections, &stores);

        if self.env {
            println!();
            self.show_env_table(&selections, &stores)?;
        }

        Ok(0)
    }

    fn show_selections_table(&self, selections: &Selections, stores: &Stores) {
        println!("{}", "Selections:".bold());
        println!();

        for (i, (interface, selection)) in selections.selections.iter().enumerate() {
            let root_marker = if *interface == selections.interface {
                " [root]"
            } else {
                ""
            };
            println!(
                "  {}. {}{}",
                i + 1,
                interface.cyan(),
                root_marker.yellow()
            );
            println!("     id: {}", selection.id);

            let location = match &selection.provenance {
                Provenance::HostPackage => "(host package)".blue().to_string(),
                Provenance::Local(path) => format!("{} {}", path.display(), "(local)".dimmed()),
                Provenance::Store(_) => match selection.implementation_path(stores) {
                    Ok(path) => path.display().to_string().green().to_string(),
                    Err(_) => "(not stored)".red().to_string(),
                },
            };
            println!("     at: {location}");

            for dep in &selection.dependencies {
                println!("     {} {}", "requires".dimmed(), dep.interface);
            }
        }

        println!();
        match &selections.command.path {
            Some(path) => println!("Command: {}", path.green()),
            None => println!("Command: {}", "(none)".dimmed()),
        }
        println!("Total: {} selection(s)", selections.selections.len());
    }

    fn show_env_table(&self, selections: &Selections, stores: &Stores) -> Result<()> {
        println!("{}", "Environment:".bold());
        println!();

        let base = Environ::from_process();
        let mut env = base.clone();
        selexec::apply_all_bindings(selections, stores, &mut env)?;

        let changes = env.changes_from(&base);
        if changes.is_empty() {
            println!("  {}", "(no changes)".dimmed());
        }
        for (name, value) in changes {
            println!("  {}={}", name.cyan(), value);
        }

        Ok(())
    }
}
