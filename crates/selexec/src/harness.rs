// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Running a launch in a child process and capturing what it prints.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::selections::Selections;
use crate::Error;

#[cfg(test)]
#[path = "./harness_test.rs"]
mod harness_test;

/// Runs launches in a child process for non-interactive verification.
///
/// The child is `program` invoked as
///
/// ```text
/// <program> <leading args...> <selections.yaml> [--dry-run] [--main=MAIN] -- <args...>
/// ```
///
/// and is expected to perform the whole bind/plan/launch pipeline, printing
/// any failure and exiting non-zero. Its stdout and stderr share one
/// temporary file which is read back once it has exited.
#[derive(Debug, Clone)]
pub struct TestHarness {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl TestHarness {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// A harness that re-runs the current executable.
    pub fn current_exe() -> crate::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    /// Add an argument passed to the child before the selections file.
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    /// Launch `selections` in a child and return its combined output.
    ///
    /// A failing child is not an error: its output is returned with a line
    /// describing the exit status appended. Errors are only returned when
    /// the child could not be set up or started. Blocks until the child
    /// exits.
    pub fn run_captured(
        &self,
        selections: &Selections,
        args: &[String],
        dry_run: bool,
        main: Option<&str>,
    ) -> crate::Result<String> {
        let mut document = tempfile::Builder::new()
            .prefix("selexec-test")
            .suffix(".yaml")
            .tempfile()?;
        // The child reads the document from a temp dir, so relative local
        // paths must be pinned to our working directory first.
        let mut selections = selections.clone();
        selections.resolve_local_paths(&std::env::current_dir()?);
        document.write_all(selections.to_yaml()?.as_bytes())?;
        document.flush()?;

        let mut output = tempfile::tempfile()?;

        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.leading_args).arg(document.path());
        if dry_run {
            cmd.arg("--dry-run");
        }
        if let Some(main) = main {
            cmd.arg(format!("--main={main}"));
        }
        cmd.arg("--")
            .args(args)
            .stdout(output.try_clone()?)
            .stderr(output.try_clone()?);

        tracing::info!("Waiting for test process to finish...");
        let status = cmd.status().map_err(|error| Error::Launch {
            program: self.program.clone(),
            error,
        })?;

        output.seek(SeekFrom::Start(0))?;
        let mut captured = Vec::new();
        output.read_to_end(&mut captured)?;
        let mut results = String::from_utf8_lossy(&captured).into_owned();

        if !status.success() {
            if !results.is_empty() && !results.ends_with('\n') {
                results.push('\n');
            }
            results.push_str(&describe_failure(status));
            results.push('\n');
        }
        Ok(results)
    }
}

fn describe_failure(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Error from child process: exit code = {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Error from child process: killed by signal {signal}");
        }
    }
    format!("Error from child process: {status}")
}
