// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for bitenc integration tests.
//!
//! Provides deterministic stand-ins for model signatures and on-disk model
//! directories, so encoder tests run without real BiT weights.
//!
//! # Components
//!
//! - [`MockSignature`] - deterministic feature extractor over channel-last batches
//! - [`FailingSignature`] - signature whose every call fails
//! - [`model_dir`] - temporary saved-model directories (valid layout, broken contents)

pub mod mock_signature;
pub mod model_dir;

pub use mock_signature::{FailingSignature, MockSignature};
pub use model_dir::{corrupted_model_dir, empty_model_dir};
