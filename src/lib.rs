//! sspm - Simple scientific project manager.
//!
//! This library provides the core functionality for the `sspm` CLI tool:
//! dated project folders laid out as `root/<year>/<month>/P_<id>`, per-project
//! metadata in small INI files, and listings built by scanning that tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod project;
pub mod registry;
pub mod storage;

use std::path::PathBuf;


/// Library-level error type for sspm operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown key '{key}'. Valid keys are: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Corrupt file {}: {reason}", .path.display())]
    CorruptFormat { path: PathBuf, reason: String },

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("The key '{0}' can not be set to an empty value")]
    EmptyNotAllowed(String),

    #[error("Invalid value '{value}'. Expected one of: {expected}")]
    InvalidEnum { value: String, expected: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("sspm is not configured yet: run `sspm init --location <dir>` first")]
    NotConfigured,

    #[error("git error: {0}")]
    Vcs(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sspm operations.
pub type Result<T> = std::result::Result<T, Error>;
