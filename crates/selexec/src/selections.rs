// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Selections documents: the solver's chosen implementation per interface.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bind::Binding;
use crate::store::{Digest, ImplementationStore};
use crate::{Error, HOST_PACKAGE_PREFIX};

#[cfg(test)]
#[path = "./selections_test.rs"]
mod selections_test;

/// API version for selections documents.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "selexec/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// Where an implementation's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Provided by the host's package manager; has no directory of its own.
    HostPackage,
    /// A developer checkout used in place of any stored copy.
    Local(PathBuf),
    /// Looked up in the implementation stores by digest.
    Store(Vec<Digest>),
}

/// A runtime requirement on another interface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dependency {
    pub interface: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
}

/// The entry point chosen for the root selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Command {
    /// Executable, relative to the implementation root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Dependencies needed only when running this command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Dependency>,
}

/// One chosen implementation of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "SelectionDoc", into = "SelectionDoc")]
pub struct Selection {
    pub id: String,
    pub provenance: Provenance,
    pub bindings: Vec<Binding>,
    pub dependencies: Vec<Dependency>,
}

/// Document form of a [`Selection`].
#[derive(Deserialize, Serialize)]
struct SelectionDoc {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    digests: Vec<Digest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bindings: Vec<Binding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<Dependency>,
}

impl From<SelectionDoc> for Selection {
    fn from(doc: SelectionDoc) -> Self {
        let provenance = if doc.id.starts_with(HOST_PACKAGE_PREFIX) {
            Provenance::HostPackage
        } else if let Some(path) = doc.local_path {
            Provenance::Local(path)
        } else {
            Provenance::Store(doc.digests)
        };
        Self {
            id: doc.id,
            provenance,
            bindings: doc.bindings,
            dependencies: doc.dependencies,
        }
    }
}

impl From<Selection> for SelectionDoc {
    fn from(selection: Selection) -> Self {
        let (local_path, digests) = match selection.provenance {
            Provenance::HostPackage => (None, Vec::new()),
            Provenance::Local(path) => (Some(path), Vec::new()),
            Provenance::Store(digests) => (None, digests),
        };
        Self {
            id: selection.id,
            local_path,
            digests,
            bindings: selection.bindings,
            dependencies: selection.dependencies,
        }
    }
}

impl Selection {
    pub fn is_host_package(&self) -> bool {
        self.provenance == Provenance::HostPackage
    }

    /// Absolute location of this implementation on disk.
    ///
    /// A local path always wins over the stores; a relative one is taken
    /// from the current directory. Host packages have no location and fail
    /// the same way an unstored implementation does.
    pub fn implementation_path(&self, store: &dyn ImplementationStore) -> crate::Result<PathBuf> {
        let digests = match &self.provenance {
            Provenance::Local(path) => return Ok(std::path::absolute(path)?),
            Provenance::Store(digests) => digests.as_slice(),
            Provenance::HostPackage => &[][..],
        };
        store
            .lookup_any(digests)
            .ok_or_else(|| Error::StoreLookup {
                id: self.id.clone(),
                digests: digests.iter().map(ToString::to_string).collect(),
            })
    }
}

/// A complete resolution, as produced by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Selections {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    /// The interface being run.
    pub interface: String,

    /// Command chosen for the root interface.
    #[serde(default)]
    pub command: Command,

    /// Chosen implementations keyed by interface, in resolution order.
    #[serde(default)]
    pub selections: IndexMap<String, Selection>,
}

impl Selections {
    pub fn new<S: Into<String>>(interface: S) -> Self {
        Self {
            api: ApiVersion::default(),
            interface: interface.into(),
            command: Command::default(),
            selections: IndexMap::new(),
        }
    }

    /// Parse selections from a YAML string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(&yaml).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => serde_yaml::from_value(value).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml,
            }),
        }
    }

    /// Load selections from a file, resolving relative local paths against
    /// the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let read_failed = |e: std::io::Error| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        };
        let yaml = std::fs::read_to_string(path).map_err(read_failed)?;
        let mut selections = Self::from_yaml(yaml)?;

        let canonical = dunce::canonicalize(path).map_err(read_failed)?;
        if let Some(base_dir) = canonical.parent() {
            selections.resolve_local_paths(base_dir);
        }
        Ok(selections)
    }

    /// Make every relative local path absolute by joining it onto `base_dir`.
    pub fn resolve_local_paths(&mut self, base_dir: &Path) {
        for selection in self.selections.values_mut() {
            if let Provenance::Local(local) = &mut selection.provenance {
                if local.is_relative() {
                    *local = base_dir.join(&*local);
                }
            }
        }
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(Error::SerializeFailed)
    }

    /// Add (or replace) the selection for an interface.
    pub fn insert<S: Into<String>>(&mut self, interface: S, selection: Selection) {
        self.selections.insert(interface.into(), selection);
    }

    /// The selection made for `interface`.
    pub fn get(&self, interface: &str) -> crate::Result<&Selection> {
        self.selections
            .get(interface)
            .ok_or_else(|| Error::UnknownInterface(interface.to_string()))
    }

    /// The selection for the interface being run.
    pub fn root(&self) -> crate::Result<&Selection> {
        self.get(&self.interface)
    }
}
