// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment Keys
//!
//! Constant definitions for the well-known environment variable names and
//! file names consumed by the loaders.
//!
//! Remote loaders fall back to these variables when no explicit option is
//! provided, allowing store and region selection to travel with the
//! deployment environment rather than the code.

/// Default env-file name, resolved against the current working directory.
pub const DEFAULT_ENV_FILE_NAME: &str = ".env";

/// Fallback variable for the remote secret store name.
pub const AWS_SSTORE_NAME_ENV_KEY: &str = "AWS_SSTORE_NAME";

/// Fallback variable for the remote region name.
pub const AWS_REGION_NAME_ENV_KEY: &str = "AWS_REGION_NAME";

/// Historical alias for the region variable, checked after
/// [`AWS_REGION_NAME_ENV_KEY`].
pub const AWS_REGION_ENV_KEY: &str = "AWS_REGION";
