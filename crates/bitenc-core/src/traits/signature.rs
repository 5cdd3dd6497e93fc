// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference signature trait: a named entry point into a loaded model.

use ndarray::ArrayViewD;

use crate::error::EncoderError;
use crate::types::SignatureOutputs;

/// A callable entry point into a loaded model that maps one input tensor to
/// a set of named output tensors.
///
/// Implementations must be safe to invoke from several threads; runtimes
/// that need exclusive access serialize calls internally.
pub trait InferenceSignature: Send + Sync {
    /// Signature key, e.g. `serving_default`.
    fn key(&self) -> &str;

    /// Names of the outputs this signature produces.
    fn output_names(&self) -> Vec<String>;

    /// Runs the signature on a channel-last `f32` batch.
    fn call(&self, input: ArrayViewD<'_, f32>) -> Result<SignatureOutputs, EncoderError>;
}
