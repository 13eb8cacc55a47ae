// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use rstest::rstest;

use crate::bind::{EnvironmentBinding, InsertMode};
use crate::environment::Environ;

#[rstest]
fn test_replace_ignores_prior_value() {
    let mut env: Environ = [("LIBDIR", "/somewhere/else")].into_iter().collect();
    let b = EnvironmentBinding::prepend("LIBDIR", "lib").with_mode(InsertMode::Replace);

    env.apply(&b, Path::new("/store/abc"));
    assert_eq!(env.get("LIBDIR"), Some("/store/abc/lib"));

    // applying again yields the same value
    env.apply(&b, Path::new("/store/abc"));
    assert_eq!(env.get("LIBDIR"), Some("/store/abc/lib"));
}

#[rstest]
fn test_prepend_composes_in_application_order() {
    let mut env: Environ = [("SEARCH", "/existing")].into_iter().collect();
    let b = EnvironmentBinding::prepend("SEARCH", "bin");

    env.apply(&b, Path::new("/one"));
    env.apply(&b, Path::new("/two"));
    assert_eq!(env.get("SEARCH"), Some("/two/bin:/one/bin:/existing"));
}

#[rstest]
fn test_append_composes_in_application_order() {
    let mut env = Environ::new();
    let b = EnvironmentBinding::prepend("SEARCH", "lib").with_mode(InsertMode::Append);

    env.apply(&b, Path::new("/one"));
    env.apply(&b, Path::new("/two"));
    assert_eq!(env.get("SEARCH"), Some("/one/lib:/two/lib"));
}

#[rstest]
fn test_changes_from_base() {
    let base: Environ = [("A", "1"), ("B", "2")].into_iter().collect();
    let mut env = base.clone();
    env.set("B", "3");
    env.set("C", "4");

    assert_eq!(env.changes_from(&base), vec![("B", "3"), ("C", "4")]);
    assert!(base.changes_from(&base).is_empty());
}

#[rstest]
fn test_from_process_snapshot() {
    let env = Environ::from_process();
    if let Ok(path) = std::env::var("PATH") {
        assert_eq!(env.get("PATH"), Some(path.as_str()));
    }
    assert_eq!(env.is_empty(), env.len() == 0);
}
