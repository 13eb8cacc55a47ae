// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::selections::{Provenance, Selection};
use crate::store::Stores;

fn stored_selections(command_path: &str) -> Selections {
    let mut sels = Selections::new("prog");
    sels.command.path = Some(command_path.to_string());
    sels.insert(
        "prog",
        Selection {
            id: "sha1=abc".to_string(),
            provenance: Provenance::Store(vec!["sha1=abc".parse().unwrap()]),
            bindings: Vec::new(),
            dependencies: Vec::new(),
        },
    );
    sels
}

#[rstest]
fn test_dry_run_returns() {
    let plan = LaunchPlan::new("/definitely/not/here", vec!["arg".to_string()]);
    launch(&plan, &Environ::new(), true).expect("dry run should not touch the program");
}

#[cfg(unix)]
#[rstest]
fn test_non_executable_program_fails_to_launch() {
    let tmp = TempDir::new().unwrap();
    let placeholder = tmp.path().join("placeholder");
    std::fs::write(&placeholder, "not a program").unwrap();

    let plan = LaunchPlan::new(&placeholder, Vec::new());
    match launch(&plan, &Environ::new(), false) {
        Err(Error::Launch { program, error }) => {
            assert_eq!(program, placeholder);
            assert_eq!(error.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Launch error, got {other:?}"),
    }
}

#[rstest]
fn test_execute_dry_run() {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("sha1=abc/bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("run"), "").unwrap();

    let options = ExecuteOptions {
        dry_run: true,
        wrapper: Some("valgrind".to_string()),
        ..Default::default()
    };
    execute_selections(
        &stored_selections("bin/run"),
        &Stores::new([tmp.path()]),
        &["x".to_string()],
        &options,
    )
    .expect("dry run should succeed");
}

#[rstest]
fn test_execute_reports_plan_errors() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("sha1=abc")).unwrap();

    let options = ExecuteOptions {
        dry_run: true,
        ..Default::default()
    };
    let result = execute_selections(
        &stored_selections("bin/run"),
        &Stores::new([tmp.path()]),
        &[],
        &options,
    );
    assert!(matches!(result, Err(Error::MissingProgram { .. })));
}
