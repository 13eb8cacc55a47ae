// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Starting the planned program.

use std::io::Write;

use crate::compose::apply_all_bindings;
use crate::environment::Environ;
use crate::plan::{plan, LaunchPlan};
use crate::selections::Selections;
use crate::store::ImplementationStore;
use crate::Error;

#[cfg(test)]
#[path = "./launch_test.rs"]
mod launch_test;

/// Options for executing a set of selections.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Only print what would be run.
    pub dry_run: bool,
    /// Run this program instead of the command's default.
    pub main: Option<String>,
    /// Shell command to run the program through.
    pub wrapper: Option<String>,
}

/// Bind, plan and launch `selections` with the given program arguments.
///
/// On success this does not return, except for a dry run. All
/// implementations must already be present in `store`.
pub fn execute_selections(
    selections: &Selections,
    store: &dyn ImplementationStore,
    args: &[String],
    options: &ExecuteOptions,
) -> crate::Result<()> {
    let mut env = Environ::from_process();
    apply_all_bindings(selections, store, &mut env)?;

    let plan = plan(
        selections,
        store,
        &env,
        options.main.as_deref(),
        options.wrapper.as_deref(),
        args,
    )?;
    launch(&plan, &env, options.dry_run)
}

/// Replace the current process with the planned program.
///
/// The program inherits this process's environment with every variable in
/// `env` set over it. Inherited variables that `env` cannot hold (such as
/// non-unicode values) reach the program untouched.
///
/// For a dry run the command line is printed instead and this returns.
pub fn launch(plan: &LaunchPlan, env: &Environ, dry_run: bool) -> crate::Result<()> {
    if dry_run {
        println!("Would execute: {}", plan.describe());
        return Ok(());
    }

    tracing::info!("Executing: {}", plan.describe());
    std::io::stdout().flush()?;
    std::io::stderr().flush()?;

    let mut cmd = std::process::Command::new(&plan.program);
    cmd.args(&plan.args).envs(env.iter());
    Err(replace_process(cmd, plan))
}

#[cfg(unix)]
fn replace_process(mut cmd: std::process::Command, plan: &LaunchPlan) -> Error {
    use std::os::unix::process::CommandExt;

    // exec only returns if the program could not be started
    let error = cmd.exec();
    Error::Launch {
        program: plan.program.clone(),
        error,
    }
}

#[cfg(not(unix))]
fn replace_process(mut cmd: std::process::Command, plan: &LaunchPlan) -> Error {
    match cmd.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(error) => Error::Launch {
            program: plan.program.clone(),
            error,
        },
    }
}
