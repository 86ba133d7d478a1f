// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Loaders
//!
//! The source loaders and their option sets.
//!
//! A [`Loader`] is one variant per supported source: the process
//! environment, a local env-file, and the two remote store shapes. Sources
//! are selected by constructing the variant wanted, never by name lookup;
//! each variant carries its own typed options. Every loader produces an
//! ordered sequence of entries or a [`SecretBoxError::LoadError`], and each
//! one is usable standalone or composed in an ordered pass by
//! [`SecretBox::run_loaders`](crate::SecretBox::run_loaders).

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::env_keys::{
    AWS_REGION_ENV_KEY, AWS_REGION_NAME_ENV_KEY, AWS_SSTORE_NAME_ENV_KEY, DEFAULT_ENV_FILE_NAME,
};
use crate::environment::Environment;
use crate::errors::SecretBoxError;
use crate::parser::{Entry, parse_env_file};
use crate::remote::{ParameterStoreClient, SecretPayload, SecretStoreClient};

/// Options for the env-file loader.
#[derive(Debug, Clone, Default)]
pub struct EnvFileOptions {
    /// File to read instead of `.env` in the working directory.
    pub filename: Option<PathBuf>,
}

impl EnvFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default `.env` file name.
    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Options shared by the remote store loaders.
///
/// Store and region identifiers left unset here are resolved from the
/// well-known environment variables at run time.
#[derive(Debug, Clone, Default)]
pub struct RemoteOptions {
    /// Name of the store (or parameter path prefix) to fetch.
    pub sstore: Option<String>,
    /// Region the store lives in.
    pub region: Option<String>,
    /// Suppresses per-value debug output during the fetch so secrets never
    /// reach the log stream.
    pub hide_values: bool,
    /// Logs this loader's own failures and reports an empty result instead
    /// of propagating them.
    pub swallow_errors: bool,
}

impl RemoteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store name, overriding the environment fallback.
    pub fn sstore(mut self, sstore: impl Into<String>) -> Self {
        self.sstore = Some(sstore.into());
        self
    }

    /// Sets the region name, overriding the environment fallback.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Enables quiet mode for the fetch.
    pub fn hide_values(mut self) -> Self {
        self.hide_values = true;
        self
    }

    /// Makes this loader swallow its own failures.
    pub fn swallow_errors(mut self) -> Self {
        self.swallow_errors = true;
        self
    }
}

/// One source of key/value entries.
pub enum Loader {
    /// Snapshot of every process environment variable at run time.
    Environ,
    /// A local env-file; a missing file yields an empty result.
    EnvFile(EnvFileOptions),
    /// A remote secret store whose payload is one JSON object of strings.
    AwsSecrets(Arc<dyn SecretStoreClient>, RemoteOptions),
    /// A remote parameter store fetched by path prefix.
    AwsParameterStore(Arc<dyn ParameterStoreClient>, RemoteOptions),
}

impl Loader {
    /// Runs the loader against the given environment and returns its
    /// entries in source order.
    ///
    /// Remote variants configured with `swallow_errors` turn their own
    /// failures into an empty `Ok` result after logging them.
    pub fn run(&self, env: &dyn Environment) -> Result<Vec<Entry>, SecretBoxError> {
        match self {
            Loader::Environ => Ok(run_environ(env)),
            Loader::EnvFile(opts) => run_env_file(opts),
            Loader::AwsSecrets(client, opts) => {
                guard_swallow(opts, run_aws_secrets(client.as_ref(), opts, env))
            }
            Loader::AwsParameterStore(client, opts) => {
                guard_swallow(opts, run_parameter_store(client.as_ref(), opts, env))
            }
        }
    }
}

fn guard_swallow(
    opts: &RemoteOptions,
    result: Result<Vec<Entry>, SecretBoxError>,
) -> Result<Vec<Entry>, SecretBoxError> {
    match result {
        Err(err) if opts.swallow_errors => {
            error!(
                error = err.to_string(),
                "remote loader failed, continuing with no values"
            );
            Ok(Vec::new())
        }
        other => other,
    }
}

fn run_environ(env: &dyn Environment) -> Vec<Entry> {
    let vars = env.vars();
    debug!(count = vars.len(), "reading environ variables");

    vars.into_iter()
        .map(|(key, value)| Entry::new(key, value))
        .collect()
}

fn run_env_file(opts: &EnvFileOptions) -> Result<Vec<Entry>, SecretBoxError> {
    let filename = opts
        .filename
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE_NAME));
    debug!(file = %filename.display(), "reading vars from env file");

    let content = match std::fs::read_to_string(&filename) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(file = %filename.display(), "env file not found, nothing to load");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(SecretBoxError::LoadError(format!(
                "failed to read `{}` - {err}",
                filename.display(),
            )));
        }
    };

    Ok(parse_env_file(&content))
}

fn run_aws_secrets(
    client: &dyn SecretStoreClient,
    opts: &RemoteOptions,
    env: &dyn Environment,
) -> Result<Vec<Entry>, SecretBoxError> {
    let store = resolve_store(opts, env)?;
    let region = resolve_region(opts, env)?;

    let payload = client.get_secret_value(&store, &region)?;
    let entries = resolve_payload(&payload);

    debug!(count = entries.len(), store = store, "found values from secret store");
    log_found_entries(&entries, opts.hide_values);

    Ok(entries)
}

fn run_parameter_store(
    client: &dyn ParameterStoreClient,
    opts: &RemoteOptions,
    env: &dyn Environment,
) -> Result<Vec<Entry>, SecretBoxError> {
    let path = resolve_store(opts, env)?;
    let region = resolve_region(opts, env)?;

    let parameters = client.get_parameters_by_path(&path, &region)?;

    // A /path/to/DB_PASSWORD parameter should populate DB_PASSWORD, so when
    // the prefix is path-shaped the last token becomes the key.
    let do_split = path.contains('/');
    let entries: Vec<Entry> = parameters
        .into_iter()
        .map(|(name, value)| {
            let key = if do_split {
                name.rsplit('/').next().unwrap_or(&name).to_string()
            } else {
                name
            };
            Entry::new(key, value)
        })
        .collect();

    info!(count = entries.len(), path = path, "loaded parameters matching path");
    log_found_entries(&entries, opts.hide_values);

    Ok(entries)
}

fn resolve_store(opts: &RemoteOptions, env: &dyn Environment) -> Result<String, SecretBoxError> {
    opts.sstore
        .clone()
        .or_else(|| env.var(AWS_SSTORE_NAME_ENV_KEY))
        .ok_or_else(|| SecretBoxError::LoadError("missing secret store name".to_string()))
}

fn resolve_region(opts: &RemoteOptions, env: &dyn Environment) -> Result<String, SecretBoxError> {
    opts.region
        .clone()
        .or_else(|| env.var(AWS_REGION_NAME_ENV_KEY))
        .or_else(|| env.var(AWS_REGION_ENV_KEY))
        .ok_or_else(|| SecretBoxError::LoadError("missing region name".to_string()))
}

/// Resolves a secret payload into entries.
///
/// The payload is conventionally a JSON object of strings; anything else
/// falls back to a single entry keyed by the store name so the value is
/// still reachable.
fn resolve_payload(payload: &SecretPayload) -> Vec<Entry> {
    match serde_json::from_str::<Value>(&payload.secret_string) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Entry::new(key, s),
                other => Entry::new(key, other.to_string()),
            })
            .collect(),
        _ => vec![Entry::new(payload.name.clone(), payload.secret_string.clone())],
    }
}

/// Logs found values at debug level with all but the trailing quarter of
/// each value masked, or only a count when quiet mode is on.
pub(crate) fn log_found_entries(entries: &[Entry], hide_values: bool) {
    if hide_values {
        debug!(count = entries.len(), "found values, output hidden");
        return;
    }

    for entry in entries {
        debug!(key = entry.key.as_str(), "found, ***{}", masked_tail(&entry.value));
    }
}

/// Trailing quarter of a value, by character count.
pub(crate) fn masked_tail(value: &str) -> String {
    let total = value.chars().count();
    value.chars().skip(total - total / 4).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryEnvironment;
    use crate::remote::{FakeSecretClient, UnavailableClient};
    use std::io::Write;

    fn write_env_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn environ_loader_snapshots_every_variable() {
        let env = MemoryEnvironment::with_vars([
            ("SUPER_SECRET", "12345"),
            ("PASSWORD", "correct horse battery staple"),
        ]);

        let mut entries = Loader::Environ.run(&env).unwrap();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(
            entries,
            vec![
                Entry::new("PASSWORD", "correct horse battery staple"),
                Entry::new("SUPER_SECRET", "12345"),
            ],
        );
    }

    #[test]
    fn env_file_loader_parses_file() {
        let file = write_env_file("# comment\nexport USER_NAME=\"not_admin\"\nKEY=a\nKEY=b\n");
        let loader = Loader::EnvFile(EnvFileOptions::new().filename(file.path()));

        let entries = loader.run(&MemoryEnvironment::new()).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::new("USER_NAME", "not_admin"),
                Entry::new("KEY", "a"),
                Entry::new("KEY", "b"),
            ],
        );
    }

    #[test]
    fn env_file_loader_missing_file_is_empty_not_error() {
        let loader = Loader::EnvFile(
            EnvFileOptions::new().filename("BYWHATCHANCEWOULDTHISEXIST"),
        );
        assert_eq!(loader.run(&MemoryEnvironment::new()).unwrap(), Vec::new());
    }

    #[test]
    fn aws_secrets_loader_resolves_json_payload() {
        let client = Arc::new(FakeSecretClient::new());
        client.put_secret_string("my_store", r#"{"TEST_KEY":"abcdefg"}"#);

        let loader = Loader::AwsSecrets(
            client,
            RemoteOptions::new().sstore("my_store").region("us-east-1"),
        );

        let entries = loader.run(&MemoryEnvironment::new()).unwrap();
        assert_eq!(entries, vec![Entry::new("TEST_KEY", "abcdefg")]);
    }

    #[test]
    fn aws_secrets_loader_falls_back_to_name_for_plain_payload() {
        let client = Arc::new(FakeSecretClient::new());
        client.put_secret_string("my_store", "just a plain string");

        let loader = Loader::AwsSecrets(
            client,
            RemoteOptions::new().sstore("my_store").region("us-east-1"),
        );

        let entries = loader.run(&MemoryEnvironment::new()).unwrap();
        assert_eq!(entries, vec![Entry::new("my_store", "just a plain string")]);
    }

    #[test]
    fn aws_secrets_loader_reads_identifiers_from_environment() {
        let client = Arc::new(FakeSecretClient::new());
        client.put_secret_string("my_store", r#"{"TEST_KEY":"abcdefg"}"#);

        let env = MemoryEnvironment::with_vars([
            ("AWS_SSTORE_NAME", "my_store"),
            ("AWS_REGION", "us-east-1"),
        ]);

        let loader = Loader::AwsSecrets(client, RemoteOptions::new());
        let entries = loader.run(&env).unwrap();
        assert_eq!(entries, vec![Entry::new("TEST_KEY", "abcdefg")]);
    }

    #[test]
    fn aws_secrets_loader_errors_on_missing_store_name() {
        let loader = Loader::AwsSecrets(Arc::new(FakeSecretClient::new()), RemoteOptions::new());
        assert_eq!(
            loader.run(&MemoryEnvironment::new()),
            Err(SecretBoxError::LoadError("missing secret store name".to_string())),
        );
    }

    #[test]
    fn aws_secrets_loader_errors_on_missing_region() {
        let loader = Loader::AwsSecrets(
            Arc::new(FakeSecretClient::new()),
            RemoteOptions::new().sstore("my_store"),
        );
        assert_eq!(
            loader.run(&MemoryEnvironment::new()),
            Err(SecretBoxError::LoadError("missing region name".to_string())),
        );
    }

    #[test]
    fn swallow_errors_turns_failure_into_empty_result() {
        let loader = Loader::AwsSecrets(
            Arc::new(UnavailableClient::new()),
            RemoteOptions::new()
                .sstore("my_store")
                .region("us-east-1")
                .swallow_errors(),
        );
        assert_eq!(loader.run(&MemoryEnvironment::new()).unwrap(), Vec::new());
    }

    #[test]
    fn unavailable_client_error_propagates_without_swallow() {
        let loader = Loader::AwsSecrets(
            Arc::new(UnavailableClient::new()),
            RemoteOptions::new().sstore("my_store").region("us-east-1"),
        );
        assert!(loader.run(&MemoryEnvironment::new()).is_err());
    }

    #[test]
    fn parameter_store_loader_splits_path_shaped_names() {
        let client = Arc::new(FakeSecretClient::new());
        client.put_parameter("/app/DB_PASSWORD", "hunter2");
        client.put_parameter("/app/nested/DB_USER", "svc");

        let loader = Loader::AwsParameterStore(
            client,
            RemoteOptions::new().sstore("/app").region("us-east-1"),
        );

        let entries = loader.run(&MemoryEnvironment::new()).unwrap();
        assert_eq!(
            entries,
            vec![Entry::new("DB_PASSWORD", "hunter2"), Entry::new("DB_USER", "svc")],
        );
    }

    #[test]
    fn parameter_store_loader_keeps_flat_names_whole() {
        let client = Arc::new(FakeSecretClient::new());
        client.put_parameter("FLAT_KEY", "value");

        let loader = Loader::AwsParameterStore(
            client,
            RemoteOptions::new().sstore("FLAT").region("us-east-1"),
        );

        let entries = loader.run(&MemoryEnvironment::new()).unwrap();
        assert_eq!(entries, vec![Entry::new("FLAT_KEY", "value")]);
    }

    #[test]
    fn masked_tail_keeps_trailing_quarter() {
        assert_eq!(masked_tail("abcdefgh"), "gh");
        assert_eq!(masked_tail("abc"), "");
        assert_eq!(masked_tail(""), "");
    }
}
