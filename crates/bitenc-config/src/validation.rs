// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as thread counts, optimization levels, and axis indices.

use crate::diagnostic::ConfigError;
use crate::model::BitencConfig;

/// Highest graph optimization level understood by ONNX Runtime.
const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BitencConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Some(path) = &config.encoder.model_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "encoder.model_path must not be empty when set".to_string(),
        });
    }

    // Axis 0 is the batch axis and can never hold channels.
    if config.encoder.channel_axis == 0 {
        errors.push(ConfigError::Validation {
            message: "encoder.channel_axis must not be 0 (the batch axis)".to_string(),
        });
    }

    if config.encoder.output_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "encoder.output_name must not be empty".to_string(),
        });
    }

    if let Some(input) = &config.encoder.input_name
        && input.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "encoder.input_name must not be empty when set".to_string(),
        });
    }

    if config.runtime.intra_threads == 0 {
        errors.push(ConfigError::Validation {
            message: "runtime.intra_threads must be at least 1".to_string(),
        });
    }

    if config.runtime.optimization_level > MAX_OPTIMIZATION_LEVEL {
        errors.push(ConfigError::Validation {
            message: format!(
                "runtime.optimization_level must be between 0 and {MAX_OPTIMIZATION_LEVEL}, got {}",
                config.runtime.optimization_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
