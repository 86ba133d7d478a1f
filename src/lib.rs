// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Secret Box
//!
//! `secret_box` is a library that collects string key/value secrets from a
//! small set of sources - the process environment, local `.env` files and
//! remote secret stores - merges them under a defined precedence order and
//! exposes them through one lookup surface.
//!
//! ## Features
//!
//! - Line-oriented `.env` file parsing (comments, `export` prefixes,
//!   matched outer quote stripping)
//! - Ordered multi-source loading where the last loader to produce a key
//!   wins
//! - Mirroring of every merged value into the process environment for
//!   libraries that read variables directly
//! - Remote secret-store and parameter-store sources behind injectable
//!   client traits
//! - Typed value access on top of the stored strings
//!
//! ## Example
//!
//! ```rust,no_run
//! use secret_box::SecretBox;
//!
//! fn setup_secrets() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = SecretBox::builder().auto_load().build();
//!
//!     let database_url = secrets.get("DATABASE_URL")?;
//!     let timeout: u64 = secrets.get_parsed("REQUEST_TIMEOUT")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! One `SecretBox` instance is meant to be owned and driven by a single
//! thread; loaders run synchronously, in order, to completion.

pub mod env_keys;
pub mod environment;
pub mod errors;
pub mod loaders;
pub mod parser;
pub mod remote;
mod secret_box;

pub use environment::{Environment, MemoryEnvironment, ProcessEnvironment};
pub use errors::SecretBoxError;
pub use loaders::{EnvFileOptions, Loader, RemoteOptions};
pub use parser::{Entry, parse_env_file};
pub use remote::{
    FakeSecretClient, ParameterStoreClient, SecretPayload, SecretStoreClient, UnavailableClient,
};
pub use secret_box::{SecretBox, SecretBoxBuilder};
