// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Content-addressed implementation stores.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, STORES_ENV_VAR};

#[cfg(test)]
#[path = "./store_test.rs"]
mod store_test;

/// Location of the shared, system-wide store.
const SYSTEM_STORE: &str = "/var/cache/selexec/implementations";

/// Algorithms whose digests are written as `alg=value`.
const EQUALS_ALGORITHMS: &[&str] = &["sha1", "sha1new", "sha256"];

/// A manifest digest identifying the contents of one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest {
    pub algorithm: String,
    pub value: String,
}

impl Digest {
    /// Separator used between algorithm and value in the canonical form.
    fn separator(&self) -> char {
        if EQUALS_ALGORITHMS.contains(&self.algorithm.as_str()) {
            '='
        } else {
            '_'
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.algorithm, self.separator(), self.value)
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (algorithm, value) = s
            .split_once('=')
            .or_else(|| s.split_once('_'))
            .ok_or_else(|| Error::InvalidDigest(s.to_string()))?;
        if algorithm.is_empty() || value.is_empty() {
            return Err(Error::InvalidDigest(s.to_string()));
        }
        Ok(Self {
            algorithm: algorithm.to_string(),
            value: value.to_string(),
        })
    }
}

impl TryFrom<String> for Digest {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_string()
    }
}

/// Lookup capability over already-populated implementation caches.
pub trait ImplementationStore {
    /// Return the path of the first stored implementation matching any of
    /// the given digests.
    fn lookup_any(&self, digests: &[Digest]) -> Option<PathBuf>;
}

/// A list of store directories, each holding one subdirectory per digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stores {
    roots: Vec<PathBuf>,
}

impl Stores {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The per-user cache followed by the system-wide store.
    pub fn default_roots() -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(cache) = dirs::cache_dir() {
            roots.push(cache.join("selexec").join("implementations"));
        }
        roots.push(PathBuf::from(SYSTEM_STORE));
        roots
    }

    /// Stores named by `SELEXEC_STORES`, or the defaults if it is unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(STORES_ENV_VAR) {
            Ok(value) if !value.is_empty() => Self::new(
                value
                    .split(':')
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from),
            ),
            _ => Self::default(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn lookup(&self, digest: &Digest) -> Option<PathBuf> {
        let name = digest.to_string();
        self.roots
            .iter()
            .map(|root| root.join(&name))
            .find(|candidate| candidate.is_dir())
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::new(Self::default_roots())
    }
}

impl ImplementationStore for Stores {
    fn lookup_any(&self, digests: &[Digest]) -> Option<PathBuf> {
        let found = digests.iter().find_map(|digest| self.lookup(digest));
        if found.is_none() {
            tracing::debug!(?digests, roots = ?self.roots, "no stored implementation");
        }
        found
    }
}
