// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the bitenc image encoder.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use bitenc_core::BitVariant;
use serde::{Deserialize, Serialize};

/// Top-level bitenc configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BitencConfig {
    /// Model location and tensor layout.
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// ONNX Runtime session settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Encoder model and input layout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderConfig {
    /// Path to the saved-model directory. `None` leaves the encoder unusable
    /// until a model is configured.
    #[serde(default)]
    pub model_path: Option<String>,

    /// Axis holding color channels; `-1` means the last axis. Other values
    /// cause the channel axis to be moved last before inference.
    #[serde(default = "default_channel_axis")]
    pub channel_axis: i64,

    /// Model input to feed. Defaults to the first declared input.
    #[serde(default)]
    pub input_name: Option<String>,

    /// Model output holding the feature vectors.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Expected BiT variant; when set, the embedding width is checked against it.
    #[serde(default)]
    pub variant: Option<BitVariant>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            channel_axis: default_channel_axis(),
            input_name: None,
            output_name: default_output_name(),
            variant: None,
        }
    }
}

fn default_channel_axis() -> i64 {
    -1
}

fn default_output_name() -> String {
    "output_1".to_string()
}

/// ONNX Runtime session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Threads used within a single operator.
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,

    /// Graph optimization level, 0 (disabled) through 3 (all).
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            intra_threads: default_intra_threads(),
            optimization_level: default_optimization_level(),
        }
    }
}

fn default_intra_threads() -> usize {
    1
}

fn default_optimization_level() -> u8 {
    3
}
