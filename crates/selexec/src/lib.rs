// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! selexec - Launch a resolved set of selections as a running program
//!
//! A selections document records, for every interface a program needs, the
//! implementation a solver chose for it. This crate turns that record into a
//! running process: it applies each implementation's environment bindings,
//! works out where the chosen executable lives, and then execs it (or prints
//! what it would run).
//!
//! # Example
//!
//! ```yaml
//! api: selexec/v0
//! interface: https://example.com/prog.xml
//! command:
//!   path: bin/prog
//! selections:
//!   https://example.com/prog.xml:
//!     id: sha1=0123abcd
//!     digests: [sha1=0123abcd]
//!     dependencies:
//!       - interface: https://example.com/lib.xml
//!         bindings:
//!           - environment: { name: LD_LIBRARY_PATH, insert: lib }
//!   https://example.com/lib.xml:
//!     id: sha1=4567ef01
//!     digests: [sha1=4567ef01]
//! ```
//!
//! Nothing here solves or downloads: every implementation that is not a
//! host package or local checkout must already be in an [`ImplementationStore`].

pub mod bind;
pub mod compose;
pub mod environment;
pub mod error;
pub mod harness;
pub mod launch;
pub mod plan;
pub mod selections;
pub mod store;

pub use bind::{Binding, EnvironmentBinding, InsertMode, OverlayBinding};
pub use compose::apply_all_bindings;
pub use environment::Environ;
pub use error::{Error, Result};
pub use harness::TestHarness;
pub use launch::{execute_selections, launch, ExecuteOptions};
pub use plan::{plan, LaunchPlan};
pub use selections::{ApiVersion, Command, Dependency, Provenance, Selection, Selections};
pub use store::{Digest, ImplementationStore, Stores};

/// Id prefix marking implementations provided by the host's package manager.
pub const HOST_PACKAGE_PREFIX: &str = "package:";

/// Environment variable listing implementation store directories.
pub const STORES_ENV_VAR: &str = "SELEXEC_STORES";
