// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image encoder adapter trait.

use async_trait::async_trait;
use ndarray::ArrayD;

use crate::error::EncoderError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EmbeddingOutput;

/// Adapter for turning a batch of images into embedding vectors.
#[async_trait]
pub trait ImageEncoderAdapter: PluginAdapter {
    /// Encodes a `(batch, ...)` tensor into a `(batch, dim)` embedding matrix.
    async fn embed(&self, batch: ArrayD<f32>) -> Result<EmbeddingOutput, EncoderError>;
}
