// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment
//!
//! Abstraction over the process-wide environment variable table.
//!
//! The environment is a shared, process-global channel; keeping access
//! behind a trait lets the orchestrator treat it as an injected dependency
//! so tests and embedders can substitute an in-memory table instead of
//! mutating real process state.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::SecretBoxError;

/// Read/write access to an environment variable table.
pub trait Environment: Send + Sync {
    /// Returns the value of a single variable, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns a snapshot of every variable defined at call time.
    fn vars(&self) -> Vec<(String, String)>;

    /// Writes a variable, overwriting any existing value.
    ///
    /// Failure is reported but treated as non-fatal by callers that mirror
    /// loaded values: the loaded state remains authoritative.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretBoxError>;
}

/// The real process environment, backed by `std::env`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretBoxError> {
        // SAFETY: the crate assumes single-threaded, single-owner use of the
        // process environment while a load pass runs; no other thread is
        // reading or writing the table concurrently.
        unsafe { std::env::set_var(key, value) };
        Ok(())
    }
}

/// In-memory environment table.
///
/// Used as the test substitute for [`ProcessEnvironment`] and by embedders
/// that must not touch real process state. A read-only instance rejects
/// writes, which is how mirror-write failure handling is exercised.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    values: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryEnvironment {
    /// Creates an empty, writable table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writable table seeded with the given variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            read_only: false,
        }
    }

    /// Marks the table read-only; every write fails with a mirror error.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Environment for MemoryEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretBoxError> {
        if self.read_only {
            return Err(SecretBoxError::MirrorError(key.to_string()));
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
