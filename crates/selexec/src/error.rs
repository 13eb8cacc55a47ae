// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for selexec operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with selexec Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while binding and launching selections.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// None of the implementation's digests are present in any store
    #[error("Implementation '{id}' is not stored (digests: {})", .digests.join(", "))]
    #[diagnostic(
        code(selexec::store_lookup),
        help("All implementations must be downloaded before launching; check --store / SELEXEC_STORES")
    )]
    StoreLookup { id: String, digests: Vec<String> },

    /// Command path in the selections is absolute
    #[error("Command path must be relative, but '{0}' starts with '/'!")]
    #[diagnostic(code(selexec::invalid_command_path))]
    InvalidCommandPath(String),

    /// Root selection has no entry point
    #[error(
        "Implementation '{id}' cannot be executed directly; it is just a library to be used by other programs (or missing 'main' attribute)"
    )]
    #[diagnostic(code(selexec::not_executable))]
    NotExecutable { id: String },

    /// The planned executable is not on disk
    #[error("File '{}' does not exist.\n(implementation '{id}' + program '{main}')", .path.display())]
    #[diagnostic(code(selexec::missing_program))]
    MissingProgram {
        path: PathBuf,
        id: String,
        main: String,
    },

    /// The OS refused to start the program
    #[error("Failed to run '{}': {error}", .program.display())]
    #[diagnostic(code(selexec::launch_failed))]
    Launch {
        program: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// A dependency or the root names an interface with no selection
    #[error("No selection for interface '{0}'")]
    #[diagnostic(
        code(selexec::unknown_interface),
        help("The selections document is incomplete; re-run the solver")
    )]
    UnknownInterface(String),

    /// Malformed digest string
    #[error("Invalid digest '{0}': expected ALG=VALUE or ALG_VALUE")]
    #[diagnostic(code(selexec::invalid_digest))]
    InvalidDigest(String),

    /// Invalid YAML in a selections document
    #[error("Invalid selections document: {error}")]
    #[diagnostic(
        code(selexec::invalid_yaml),
        help("Check YAML syntax and ensure 'api: selexec/v0' is present")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Selections could not be written out as YAML
    #[error("Failed to serialize selections")]
    #[diagnostic(code(selexec::serialize_failed))]
    SerializeFailed(#[source] serde_yaml::Error),

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(selexec::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(selexec::io_error))]
    Io(#[from] std::io::Error),
}
