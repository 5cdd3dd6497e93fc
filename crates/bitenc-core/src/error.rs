// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the bitenc image encoder.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across all bitenc adapter traits and core operations.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The saved-model directory could not be opened or deserialized.
    #[error("model initialization failed for {}: {message}", display_path(.path))]
    ModelLoad {
        path: Option<PathBuf>,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `encode` was called before `initialize`.
    #[error("encoder is not initialized; call initialize() before encode()")]
    NotInitialized,

    /// `initialize` already ran; the encoder never transitions back.
    #[error("encoder is already initialized")]
    AlreadyInitialized,

    /// Initialization ran but the model could not be loaded.
    #[error("model is unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// The input batch is malformed (rank, channel axis, layout).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The inference signature failed or produced unusable output.
    #[error("inference error: {message}")]
    Inference {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EncoderError {
    /// Shorthand for an [`EncoderError::InvalidInput`] with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for an [`EncoderError::Inference`] without an underlying source.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
            source: None,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "<unset>".to_string(),
    }
}
