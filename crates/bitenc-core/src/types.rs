// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits.

use std::collections::HashMap;

use ndarray::{Array2, ArrayD};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but not ready to serve requests yet.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    ImageEncoder,
}

/// Pretrained Big Transfer feature-vector variants (ImageNet-21k).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum BitVariant {
    R50x1,
    R101x1,
    R50x3,
    R101x3,
    R152x4,
}

impl BitVariant {
    /// Width of the feature vector produced by this variant.
    pub fn embedding_dim(self) -> usize {
        match self {
            BitVariant::R50x1 | BitVariant::R101x1 => 2048,
            BitVariant::R50x3 | BitVariant::R101x3 => 6144,
            BitVariant::R152x4 => 8192,
        }
    }
}

/// Named output tensors returned by an inference signature.
pub type SignatureOutputs = HashMap<String, ArrayD<f32>>;

/// Output from an image encoder adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One embedding row per input image, in input order.
    pub embeddings: Array2<f32>,
    /// Embedding width.
    pub dimensions: usize,
}
