// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The environment handed to a launched program, and binding application.

use std::collections::BTreeMap;
use std::path::Path;

use crate::bind::EnvironmentBinding;

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// An owned set of environment variables.
///
/// Bindings are applied here rather than to the current process; the
/// launcher hands the final contents to the program it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    vars: BTreeMap<String, String>,
}

impl Environ {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables that are not valid unicode are left out; the launcher still
    /// passes them on to the program by inheritance.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply one environment binding for the implementation at `path`.
    pub fn apply(&mut self, binding: &EnvironmentBinding, path: &Path) {
        let value = binding.get_value(path, self.get(&binding.name));
        tracing::info!("{}={}", binding.name, value);
        self.set(binding.name.clone(), value);
    }

    /// Variables whose value differs from (or is missing in) `base`.
    pub fn changes_from<'a>(&'a self, base: &'a Environ) -> Vec<(&'a str, &'a str)> {
        self.iter()
            .filter(|(name, value)| base.get(name) != Some(*value))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environ {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
