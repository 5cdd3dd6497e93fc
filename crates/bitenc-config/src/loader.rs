// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bitenc.toml` > `~/.config/bitenc/bitenc.toml` > `/etc/bitenc/bitenc.toml`
//! with environment variable overrides via `BITENC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BitencConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bitenc/bitenc.toml` (system-wide)
/// 3. `~/.config/bitenc/bitenc.toml` (user XDG config)
/// 4. `./bitenc.toml` (local directory)
/// 5. `BITENC_*` environment variables
pub fn load_config() -> Result<BitencConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BitencConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BitencConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BitencConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BitencConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BitencConfig::default()))
        .merge(Toml::file("/etc/bitenc/bitenc.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bitenc/bitenc.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bitenc.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `BITENC_ENCODER_MODEL_PATH` must map to `encoder.model_path`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("BITENC_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    key.replacen("encoder_", "encoder.", 1)
        .replacen("runtime_", "runtime.", 1)
}
