// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Composition of the launch environment from a full set of selections.

use std::path::PathBuf;

use crate::bind::Binding;
use crate::environment::Environ;
use crate::selections::{Dependency, Selection, Selections};
use crate::store::ImplementationStore;

#[cfg(test)]
#[path = "./compose_test.rs"]
mod compose_test;

/// Apply every binding in the resolution to `env`.
///
/// Selections are processed in resolution order: each one's own bindings,
/// then the bindings its dependencies declare on the selected dependency.
/// The root command's requirements are applied last. Bindings on host
/// packages are skipped since those manage their own environment.
pub fn apply_all_bindings(
    selections: &Selections,
    store: &dyn ImplementationStore,
    env: &mut Environ,
) -> crate::Result<()> {
    for (interface, selection) in &selections.selections {
        if selection.is_host_package() {
            tracing::debug!(%interface, id = %selection.id, "skipping bindings of host package");
        } else {
            apply_bindings(selection, &selection.bindings, store, env)?;
        }
        apply_dependency_bindings(selections, &selection.dependencies, store, env)?;
    }

    apply_dependency_bindings(selections, &selections.command.requires, store, env)
}

fn apply_dependency_bindings(
    selections: &Selections,
    dependencies: &[Dependency],
    store: &dyn ImplementationStore,
    env: &mut Environ,
) -> crate::Result<()> {
    for dep in dependencies {
        let dep_impl = selections.get(&dep.interface)?;
        if dep_impl.is_host_package() {
            tracing::debug!(interface = %dep.interface, id = %dep_impl.id, "skipping bindings on host package");
            continue;
        }
        apply_bindings(dep_impl, &dep.bindings, store, env)?;
    }
    Ok(())
}

/// Apply `bindings` against the location of `implementation`.
///
/// The implementation is only located if an environment binding needs it.
fn apply_bindings(
    implementation: &Selection,
    bindings: &[Binding],
    store: &dyn ImplementationStore,
    env: &mut Environ,
) -> crate::Result<()> {
    let mut path: Option<PathBuf> = None;
    for binding in bindings {
        match binding {
            Binding::Environment(binding) => {
                let path = match &mut path {
                    Some(path) => path,
                    slot => slot.insert(implementation.implementation_path(store)?),
                };
                env.apply(binding, path);
            }
            Binding::Overlay(_) => {
                tracing::debug!(id = %implementation.id, "overlay bindings are not applied");
            }
        }
    }
    Ok(())
}
