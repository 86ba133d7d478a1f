// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Errors
//!
//! Error types for the secret_box crate.
//!
//! This module defines the error conditions that can surface from the public
//! boundary of the crate: key lookups, typed value conversion, loader runs
//! and environment mirroring. Parsing the env-file format never produces an
//! error; malformed lines are dropped by design.

use thiserror::Error;

/// Errors that can occur while loading or reading secrets.
///
/// Each variant corresponds to a specific failure scenario and carries the
/// context needed to diagnose it. Anomalies that configuration explicitly
/// suppresses (swallowed loader failures, mirror-write failures during a
/// load pass) are logged instead of being returned as one of these.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SecretBoxError {
    /// A key was requested with [`SecretBox::get`](crate::SecretBox::get)
    /// and no default, and the key is not present in the loaded values.
    #[error("key `{0}` was not found in the loaded values")]
    KeyNotFound(String),

    /// A stored string value could not be parsed into the requested type.
    ///
    /// Values are always stored as strings; typed access is a convenience
    /// layered on top and fails with this variant when the string does not
    /// parse.
    #[error("value `{value}` for key `{key}` could not be converted to the requested type")]
    ConversionError {
        /// Key whose value failed to convert.
        key: String,
        /// The stored string value that failed to parse.
        value: String,
    },

    /// A loader failed to produce its values.
    ///
    /// Covers unreadable env-files (a missing file is not an error), remote
    /// client failures and missing remote identifiers. The payload describes
    /// the underlying cause.
    #[error("error to load secrets from source - `{0}`")]
    LoadError(String),

    /// A merged value could not be mirrored into the process environment.
    ///
    /// Non-fatal during a load pass: the internal state remains the source
    /// of truth for lookups. Surfaced only by the environment abstraction
    /// itself.
    #[error("failed to mirror key `{0}` into the process environment")]
    MirrorError(String),
}
