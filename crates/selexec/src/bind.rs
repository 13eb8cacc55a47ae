// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Binding declarations carried by selections and dependencies.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(test)]
#[path = "./bind_test.rs"]
mod bind_test;

/// Separator used between list entries when a binding does not name one.
#[cfg(unix)]
pub const DEFAULT_SEPARATOR: &str = ":";
#[cfg(not(unix))]
pub const DEFAULT_SEPARATOR: &str = ";";

/// Values assumed for well-known variables that are unset in the environment.
const SYSTEM_DEFAULTS: &[(&str, &str)] = &[
    ("PATH", "/bin:/usr/bin"),
    ("XDG_CONFIG_DIRS", "/etc/xdg"),
    ("XDG_DATA_DIRS", "/usr/local/share:/usr/share"),
];

/// A way of exposing an implementation to the program being launched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    Environment(EnvironmentBinding),
    Overlay(OverlayBinding),
}

/// How a binding's value is combined with the variable's existing value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    #[default]
    Prepend,
    Append,
    Replace,
}

/// Sets an environment variable from an implementation's location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnvironmentBinding {
    /// Variable to set.
    pub name: String,

    /// Path inside the implementation to insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<String>,

    /// Literal value to insert instead of a path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default)]
    pub mode: InsertMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Assumed previous value when the variable is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl EnvironmentBinding {
    /// Create a prepend binding that inserts `insert` under the implementation.
    pub fn prepend<N: Into<String>, I: Into<String>>(name: N, insert: I) -> Self {
        Self {
            name: name.into(),
            insert: Some(insert.into()),
            value: None,
            mode: InsertMode::Prepend,
            separator: None,
            default: None,
        }
    }

    pub fn with_mode(mut self, mode: InsertMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Compute the new value of the variable, given the implementation's
    /// location and the variable's current value (if any).
    pub fn get_value(&self, implementation: &Path, current: Option<&str>) -> String {
        let extra = match (&self.insert, &self.value) {
            (Some(insert), _) => implementation.join(insert).display().to_string(),
            (None, Some(value)) => value.clone(),
            (None, None) => implementation.display().to_string(),
        };

        let old = current
            .or(self.default.as_deref())
            .or_else(|| system_default(&self.name));

        let sep = self.separator();
        match (self.mode, old) {
            (InsertMode::Replace, _) | (_, None) => extra,
            (InsertMode::Prepend, Some(old)) => format!("{extra}{sep}{old}"),
            (InsertMode::Append, Some(old)) => format!("{old}{sep}{extra}"),
        }
    }
}

fn system_default(name: &str) -> Option<&'static str> {
    SYSTEM_DEFAULTS
        .iter()
        .find(|(var, _)| *var == name)
        .map(|(_, value)| *value)
}

/// Mounts part of an implementation at a fixed location.
///
/// Recognized so that documents carrying it still load; launching does not
/// apply it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverlayBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<String>,
}
