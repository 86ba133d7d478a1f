// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Remote Clients
//!
//! Boundary traits for remote key/value stores.
//!
//! The loaders consume remote services through these traits only; network
//! transport, authentication, retries and pagination all live behind them.
//! Two in-crate implementations exist: [`FakeSecretClient`], an in-memory
//! stand-in for development and tests, and [`UnavailableClient`], the
//! explicit "no client support compiled in" variant that fails every call.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::SecretBoxError;

/// Raw response from a secret-store lookup.
///
/// The payload is the store's opaque string body; resolving it into
/// key/value entries is the loader's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPayload {
    /// Name of the store the payload came from.
    pub name: String,
    /// The raw secret body, conventionally a JSON object of strings.
    pub secret_string: String,
}

/// A remote store holding one named secret payload per store name.
pub trait SecretStoreClient: Send + Sync {
    /// Fetches the payload stored under `store` in `region`.
    fn get_secret_value(&self, store: &str, region: &str)
    -> Result<SecretPayload, SecretBoxError>;
}

/// A remote store holding individual named parameters under path prefixes.
pub trait ParameterStoreClient: Send + Sync {
    /// Fetches every parameter whose name matches `path`, fully paged.
    fn get_parameters_by_path(
        &self,
        path: &str,
        region: &str,
    ) -> Result<Vec<(String, String)>, SecretBoxError>;
}

/// In-memory remote store.
///
/// Serves whatever payloads and parameters were put into it, ignoring the
/// region. Useful for local development and as the test double for both
/// client traits.
#[derive(Debug, Default)]
pub struct FakeSecretClient {
    secret_strings: Mutex<HashMap<String, String>>,
    parameters: Mutex<Vec<(String, String)>>,
}

impl FakeSecretClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw payload under a store name.
    pub fn put_secret_string(&self, store: impl Into<String>, payload: impl Into<String>) {
        self.secret_strings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(store.into(), payload.into());
    }

    /// Stores one named parameter.
    pub fn put_parameter(&self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.into(), value.into()));
    }
}

impl SecretStoreClient for FakeSecretClient {
    fn get_secret_value(
        &self,
        store: &str,
        _region: &str,
    ) -> Result<SecretPayload, SecretBoxError> {
        self.secret_strings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(store)
            .map(|payload| SecretPayload {
                name: store.to_string(),
                secret_string: payload.clone(),
            })
            .ok_or_else(|| SecretBoxError::LoadError(format!("secret store `{store}` not found")))
    }
}

impl ParameterStoreClient for FakeSecretClient {
    fn get_parameters_by_path(
        &self,
        path: &str,
        _region: &str,
    ) -> Result<Vec<(String, String)>, SecretBoxError> {
        Ok(self
            .parameters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(name, _)| name.starts_with(path))
            .cloned()
            .collect())
    }
}

/// Remote client variant for builds without real client support.
///
/// Constructible anywhere a client is expected but fails every call, making
/// the missing capability visible at the load boundary instead of silently
/// doing nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClient;

impl UnavailableClient {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> SecretBoxError {
        SecretBoxError::LoadError("remote client support is not available".to_string())
    }
}

impl SecretStoreClient for UnavailableClient {
    fn get_secret_value(
        &self,
        _store: &str,
        _region: &str,
    ) -> Result<SecretPayload, SecretBoxError> {
        Err(Self::unavailable())
    }
}

impl ParameterStoreClient for UnavailableClient {
    fn get_parameters_by_path(
        &self,
        _path: &str,
        _region: &str,
    ) -> Result<Vec<(String, String)>, SecretBoxError> {
        Err(Self::unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_client_serves_secret_payloads() {
        let client = FakeSecretClient::new();
        client.put_secret_string("my_store", r#"{"TEST_KEY":"abcdefg"}"#);

        let payload = client.get_secret_value("my_store", "us-east-1").unwrap();
        assert_eq!(payload.name, "my_store");
        assert_eq!(payload.secret_string, r#"{"TEST_KEY":"abcdefg"}"#);
    }

    #[test]
    fn fake_client_errors_on_unknown_store() {
        let client = FakeSecretClient::new();
        assert!(client.get_secret_value("store_not_found", "us-east-1").is_err());
    }

    #[test]
    fn fake_client_filters_parameters_by_path() {
        let client = FakeSecretClient::new();
        client.put_parameter("/app/DB_PASSWORD", "hunter2");
        client.put_parameter("/app/DB_USER", "svc");
        client.put_parameter("/other/KEY", "nope");

        let params = client.get_parameters_by_path("/app", "us-east-1").unwrap();
        assert_eq!(
            params,
            vec![
                ("/app/DB_PASSWORD".to_string(), "hunter2".to_string()),
                ("/app/DB_USER".to_string(), "svc".to_string()),
            ],
        );
    }

    #[test]
    fn unavailable_client_fails_every_call() {
        let client = UnavailableClient::new();
        assert!(client.get_secret_value("any", "any").is_err());
        assert!(client.get_parameters_by_path("any", "any").is_err());
    }
}
