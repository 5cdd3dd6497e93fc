// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the bitenc image encoder.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the configuration, encoder, and test-utility crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EncoderError;
pub use types::{AdapterType, BitVariant, EmbeddingOutput, HealthStatus, SignatureOutputs};

pub use traits::{ImageEncoderAdapter, InferenceSignature, PluginAdapter};
