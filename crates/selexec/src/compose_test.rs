// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::bind::{EnvironmentBinding, InsertMode, OverlayBinding};
use crate::selections::Provenance;
use crate::store::Stores;
use crate::Error;

/// A store root holding implementations `sha1=a`, `sha1=b` and `sha1=c`.
#[fixture]
fn store() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in ["sha1=a", "sha1=b", "sha1=c"] {
        std::fs::create_dir(tmp.path().join(name)).unwrap();
    }
    tmp
}

fn stored(digest: &str, bindings: Vec<Binding>, dependencies: Vec<Dependency>) -> Selection {
    Selection {
        id: digest.to_string(),
        provenance: Provenance::Store(vec![digest.parse().unwrap()]),
        bindings,
        dependencies,
    }
}

fn host_package(id: &str) -> Selection {
    Selection {
        id: id.to_string(),
        provenance: Provenance::HostPackage,
        bindings: Vec::new(),
        dependencies: Vec::new(),
    }
}

fn env_binding(name: &str, insert: &str) -> Binding {
    Binding::Environment(EnvironmentBinding::prepend(name, insert))
}

fn depends(interface: &str, bindings: Vec<Binding>) -> Dependency {
    Dependency {
        interface: interface.to_string(),
        bindings,
    }
}

#[rstest]
fn test_prepend_follows_resolution_order(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert("a", stored("sha1=a", vec![env_binding("SEARCH", "bin")], Vec::new()));
    sels.insert("b", stored("sha1=b", vec![env_binding("SEARCH", "bin")], Vec::new()));

    let mut env: Environ = [("SEARCH", "/orig")].into_iter().collect();
    apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env).unwrap();

    let expected = format!(
        "{}:{}:/orig",
        store.path().join("sha1=b/bin").display(),
        store.path().join("sha1=a/bin").display()
    );
    assert_eq!(env.get("SEARCH"), Some(expected.as_str()));
}

#[rstest]
fn test_dependency_bindings_use_dependency_path(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored(
            "sha1=a",
            Vec::new(),
            vec![depends("b", vec![env_binding("B_LIB", "lib")])],
        ),
    );
    sels.insert("b", stored("sha1=b", Vec::new(), Vec::new()));

    let mut env = Environ::new();
    apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env).unwrap();

    let expected = store.path().join("sha1=b/lib").display().to_string();
    assert_eq!(env.get("B_LIB"), Some(expected.as_str()));
}

#[rstest]
fn test_host_package_dependency_bindings_skipped(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored(
            "sha1=a",
            Vec::new(),
            vec![depends("python", vec![env_binding("PYTHONHOME", "")])],
        ),
    );
    sels.insert("python", host_package("package:deb:python3"));
    sels.command.requires = vec![depends("python", vec![env_binding("PYTHONPATH", "")])];

    let mut env = Environ::new();
    apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env).unwrap();
    assert!(env.is_empty(), "no bindings should be applied: {env:?}");
}

#[rstest]
fn test_host_package_own_bindings_skipped(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert("a", stored("sha1=a", Vec::new(), Vec::new()));
    let mut python = host_package("package:deb:python3");
    python.bindings = vec![env_binding("PYTHONHOME", "")];
    sels.insert("python", python);

    let mut env = Environ::new();
    apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env).unwrap();
    assert_eq!(env.get("PYTHONHOME"), None);
}

#[rstest]
fn test_command_requirements_applied_last(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored("sha1=a", Vec::new(), vec![depends("c", vec![env_binding("TOOLS", "bin")])]),
    );
    sels.insert("c", stored("sha1=c", Vec::new(), Vec::new()));
    sels.command.requires = vec![depends(
        "c",
        vec![Binding::Environment(
            EnvironmentBinding::prepend("TOOLS", "extra").with_mode(InsertMode::Append),
        )],
    )];

    let mut env = Environ::new();
    apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env).unwrap();

    let c = store.path().join("sha1=c");
    let expected = format!("{}:{}", c.join("bin").display(), c.join("extra").display());
    assert_eq!(env.get("TOOLS"), Some(expected.as_str()));
}

#[rstest]
fn test_overlay_does_not_need_a_path() {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored(
            "sha1=unstored",
            vec![Binding::Overlay(OverlayBinding {
                src: None,
                mount_point: Some("/opt/a".to_string()),
            })],
            Vec::new(),
        ),
    );

    let empty = TempDir::new().unwrap();
    let mut env = Environ::new();
    apply_all_bindings(&sels, &Stores::new([empty.path()]), &mut env).unwrap();
    assert!(env.is_empty());
}

#[rstest]
fn test_unstored_implementation_fails(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored("sha1=unstored", vec![env_binding("X", "bin")], Vec::new()),
    );

    let mut env = Environ::new();
    let result = apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env);
    assert!(matches!(result, Err(Error::StoreLookup { .. })));
}

#[rstest]
fn test_missing_dependency_interface(store: TempDir) {
    let mut sels = Selections::new("a");
    sels.insert(
        "a",
        stored("sha1=a", Vec::new(), vec![depends("ghost", Vec::new())]),
    );

    let mut env = Environ::new();
    let result = apply_all_bindings(&sels, &Stores::new([store.path()]), &mut env);
    assert!(matches!(result, Err(Error::UnknownInterface(i)) if i == "ghost"));
}
