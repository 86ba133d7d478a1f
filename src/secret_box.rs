// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Secret Box
//!
//! This module provides the main `SecretBox` implementation, which is
//! responsible for collecting key/value secrets from ordered sources and
//! exposing them through a single lookup surface.
//!
//! The box works in three main phases:
//!
//! 1. **Construction**: a builder configures the env-file name, the
//!    environment table to mirror into, verbosity and whether to auto-load.
//!
//! 2. **Loading**: one or more load passes run ordered loaders and merge
//!    their results into the box state. Later loaders override earlier ones
//!    on key collision; within one env-file the last line for a key wins.
//!
//! 3. **Access**: values are read back by key, with optional defaults and
//!    typed conversion, or taken wholesale as a snapshot.
//!
//! Every merged value is also mirrored into the process environment so that
//! libraries reading environment variables directly observe the same
//! configuration. The box state stays authoritative if a mirror write
//! fails.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::environment::{Environment, ProcessEnvironment};
use crate::errors::SecretBoxError;
use crate::loaders::{EnvFileOptions, Loader, masked_tail};
use crate::parser::Entry;

/// Builder for [`SecretBox`].
///
/// All switches default off: the real process environment is used, the
/// env-file name is `.env`, nothing is loaded until asked and per-key debug
/// output stays quiet.
///
/// # Example
///
/// ```rust,no_run
/// use secret_box::SecretBox;
///
/// let secrets = SecretBox::builder()
///     .file_name(".env.local")
///     .auto_load()
///     .build();
/// ```
#[derive(Default)]
pub struct SecretBoxBuilder {
    filename: Option<PathBuf>,
    environment: Option<Arc<dyn Environment>>,
    auto_load: bool,
    debug: bool,
}

impl SecretBoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default `.env` file name used by the env-file loader.
    pub fn file_name(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Substitutes the environment table the box reads from and mirrors
    /// into. Defaults to the real process environment.
    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Runs the default loaders (environ, then env-file) during `build`.
    ///
    /// Auto-load is a convenience path: loader failures are logged and
    /// suppressed so construction never fails.
    pub fn auto_load(mut self) -> Self {
        self.auto_load = true;
        self
    }

    /// Enables per-key debug output of merged values, masked to their
    /// trailing quarter.
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Builds the box, running the default loaders first when auto-load is
    /// enabled.
    pub fn build(self) -> SecretBox {
        let mut secret_box = SecretBox {
            values: HashMap::new(),
            environment: self
                .environment
                .unwrap_or_else(|| Arc::new(ProcessEnvironment::new())),
            filename: self.filename,
            debug: self.debug,
        };

        if self.debug {
            debug!("debug flag passed");
        }

        if self.auto_load {
            for loader in secret_box.default_loaders() {
                match loader.run(secret_box.environment.as_ref()) {
                    Ok(entries) => secret_box.merge(entries),
                    Err(err) => {
                        error!(error = err.to_string(), "auto-load loader failed, suppressed");
                    }
                }
            }
        }

        secret_box
    }
}

/// Ordered multi-source secret store.
///
/// Holds the merged key/value state, runs load passes and mirrors every
/// merged value into its environment table. One box is meant to be owned
/// and driven by a single thread; loaders run synchronously in the order
/// given.
pub struct SecretBox {
    values: HashMap<String, String>,
    environment: Arc<dyn Environment>,
    filename: Option<PathBuf>,
    debug: bool,
}

impl SecretBox {
    /// Creates an empty box over the real process environment.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder.
    pub fn builder() -> SecretBoxBuilder {
        SecretBoxBuilder::new()
    }

    /// The loaders auto-load runs: environ first, then the env-file, so
    /// file values override inherited environment values.
    fn default_loaders(&self) -> Vec<Loader> {
        vec![Loader::Environ, self.env_file_loader()]
    }

    /// Env-file loader honoring the configured file name.
    fn env_file_loader(&self) -> Loader {
        let mut file_opts = EnvFileOptions::new();
        if let Some(filename) = &self.filename {
            file_opts = file_opts.filename(filename);
        }
        Loader::EnvFile(file_opts)
    }

    /// Runs the given loaders in order, merging each successful result.
    ///
    /// The first failure a loader actually returns aborts the pass and is
    /// surfaced to the caller; results already merged from earlier loaders
    /// are retained, not rolled back. Loaders configured to swallow their
    /// own errors never abort the pass.
    pub fn run_loaders(&mut self, loaders: &[Loader]) -> Result<(), SecretBoxError> {
        for loader in loaders {
            let entries = loader.run(self.environment.as_ref())?;
            self.merge(entries);
        }
        Ok(())
    }

    /// Runs loaders selected by name, for callers that carry source
    /// selection as configuration strings.
    ///
    /// Recognized names are `environ` and `envfile`; unknown names are
    /// logged and skipped. Remote sources need a client and cannot be
    /// selected by name.
    pub fn load_from(&mut self, names: &[&str]) -> Result<(), SecretBoxError> {
        for name in names {
            match *name {
                "environ" => self.run_loaders(&[Loader::Environ])?,
                "envfile" | "env_file" => {
                    let file_loader = self.env_file_loader();
                    self.run_loaders(&[file_loader])?;
                }
                unknown => {
                    warn!(loader = unknown, "unknown loader name, skipping");
                }
            }
        }
        Ok(())
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Result<String, SecretBoxError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| SecretBoxError::KeyNotFound(key.to_string()))
    }

    /// Returns the value for a key, or the given default when absent.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Returns the value for a key parsed into `T`.
    ///
    /// Values are stored as strings; this is a read-side convenience and
    /// fails with a conversion error when the string does not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<T, SecretBoxError> {
        let value = self.get(key)?;
        value.parse().map_err(|_| SecretBoxError::ConversionError {
            key: key.to_string(),
            value,
        })
    }

    /// Whether a key is currently loaded.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Writes one key/value directly, mirroring it like a loaded value.
    ///
    /// Always succeeds and overrides anything already merged; a loader run
    /// after this call overrides it in turn.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), value.into());
    }

    /// Snapshot copy of the loaded values.
    ///
    /// Mutating the returned map never affects the box.
    pub fn values(&self) -> HashMap<String, String> {
        self.values.clone()
    }

    fn merge(&mut self, entries: Vec<Entry>) {
        for entry in entries {
            self.insert(entry.key, entry.value);
        }
    }

    fn insert(&mut self, key: String, value: String) {
        if self.debug {
            debug!(key = key.as_str(), "push, ***{}", masked_tail(&value));
        }

        if let Err(err) = self.environment.set(&key, &value) {
            // Non-fatal: the box state stays authoritative for lookups.
            warn!(
                error = err.to_string(),
                key = key.as_str(),
                "failed to mirror value into the environment"
            );
        }

        self.values.insert(key, value);
    }
}

impl Default for SecretBox {
    fn default() -> Self {
        Self::new()
    }
}
