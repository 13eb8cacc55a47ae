// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Working out which program to run, and with what arguments.

use std::path::{Path, PathBuf};

use crate::environment::Environ;
use crate::selections::{Selection, Selections};
use crate::store::ImplementationStore;
use crate::Error;

#[cfg(test)]
#[path = "./plan_test.rs"]
mod plan_test;

/// Shell used to run wrapper commands.
pub const WRAPPER_SHELL: &str = "/bin/sh";

/// Leading character marking a `main` override as relative to the
/// implementation root rather than to the command's directory.
const ROOT_MARKER: char = '/';

/// A fully resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchPlan {
    pub fn new<P: Into<PathBuf>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Run this plan through `wrapper` instead of directly.
    ///
    /// The wrapper text becomes a shell command that receives the program
    /// and its arguments as positional parameters.
    pub fn wrap(self, wrapper: &str) -> Self {
        let mut args = vec![
            "-c".to_string(),
            format!("{wrapper} \"$@\""),
            "-".to_string(),
            self.program.to_string_lossy().into_owned(),
        ];
        args.extend(self.args);
        Self::new(WRAPPER_SHELL, args)
    }

    /// The command line as it could be typed into a shell.
    pub fn describe(&self) -> String {
        std::iter::once(shell_quote(&self.program.to_string_lossy()))
            .chain(self.args.iter().map(|arg| shell_quote(arg)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Plan the launch of the root selection's command.
///
/// `main` overrides the command's executable. `env` is the environment the
/// program will receive, used to find host-package programs on its `PATH`.
pub fn plan(
    selections: &Selections,
    store: &dyn ImplementationStore,
    env: &Environ,
    main: Option<&str>,
    wrapper: Option<&str>,
    args: &[String],
) -> crate::Result<LaunchPlan> {
    let root = selections.root()?;
    let command_path = selections.command.path.as_deref();

    let program = if root.is_host_package() {
        host_program(root, env, main.or(command_path))?
    } else {
        if let Some(path) = command_path {
            if path.starts_with(ROOT_MARKER) {
                return Err(Error::InvalidCommandPath(path.to_string()));
            }
        }
        let main = effective_main(command_path, main).ok_or_else(|| Error::NotExecutable {
            id: root.id.clone(),
        })?;
        let program = root.implementation_path(store)?.join(&main);
        if !program.exists() {
            return Err(Error::MissingProgram {
                path: program,
                id: root.id.clone(),
                main: main.display().to_string(),
            });
        }
        program
    };

    let plan = LaunchPlan::new(program, args.to_vec());
    Ok(match wrapper {
        Some(wrapper) if !wrapper.is_empty() => plan.wrap(wrapper),
        _ => plan,
    })
}

/// The executable to run, relative to the implementation root.
fn effective_main(command_path: Option<&str>, main: Option<&str>) -> Option<PathBuf> {
    let Some(main) = main else {
        return command_path.map(PathBuf::from);
    };
    if let Some(from_root) = main.strip_prefix(ROOT_MARKER) {
        return Some(PathBuf::from(from_root));
    }
    match command_path {
        Some(command) => {
            let dir = Path::new(command).parent().unwrap_or(Path::new(""));
            Some(dir.join(main))
        }
        None => Some(PathBuf::from(main)),
    }
}

/// Locate a program supplied by the host's package manager.
///
/// Bare names are looked up on the `PATH` the program will see; anything
/// with a directory part is taken as given.
fn host_program(root: &Selection, env: &Environ, main: Option<&str>) -> crate::Result<PathBuf> {
    let main = main.ok_or_else(|| Error::NotExecutable {
        id: root.id.clone(),
    })?;
    let missing = || Error::MissingProgram {
        path: PathBuf::from(main),
        id: root.id.clone(),
        main: main.to_string(),
    };

    let candidate = Path::new(main);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return if candidate.exists() {
            Ok(candidate.to_path_buf())
        } else {
            Err(missing())
        };
    }

    let cwd = std::env::current_dir()?;
    which::which_in(main, env.get("PATH"), cwd).map_err(|_| missing())
}

/// Quote `word` for a POSIX shell if it contains anything special.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
