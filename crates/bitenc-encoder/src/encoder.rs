// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Big Transfer image encoder adapter.
//!
//! Encodes a `B x ...` image batch (channels on any non-batch axis) into a
//! `B x D` embedding matrix using a BiT feature-vector model.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ndarray::{Array2, ArrayD};
use tracing::{error, info};

use bitenc_config::{BitencConfig, RuntimeConfig};
use bitenc_core::{
    AdapterType, BitVariant, EmbeddingOutput, EncoderError, HealthStatus, ImageEncoderAdapter,
    InferenceSignature, PluginAdapter, SignatureOutputs,
};

use crate::saved_model::SavedModelDir;
use crate::signature::OrtSignature;
use crate::tensor::{prepare_batch, ChannelAxis, ImageBatch};

/// Default name of the output holding the feature vectors.
pub const DEFAULT_OUTPUT_NAME: &str = "output_1";

/// Lifecycle of the model handle. Never returns to `Uninitialized`.
pub enum EncoderState {
    Uninitialized,
    Ready(Box<dyn InferenceSignature>),
    /// Initialization ran and failed; `reason` describes the load failure.
    Unavailable { reason: String },
}

impl fmt::Debug for EncoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderState::Uninitialized => f.write_str("Uninitialized"),
            EncoderState::Ready(signature) => f
                .debug_tuple("Ready")
                .field(&signature.key())
                .finish(),
            EncoderState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Image encoder wrapping a pretrained BiT model behind [`BitImageEncoder::encode`].
///
/// Construction only stores configuration; the model is loaded by
/// [`BitImageEncoder::initialize`].
#[derive(Debug)]
pub struct BitImageEncoder {
    model_path: Option<PathBuf>,
    channel_axis: ChannelAxis,
    input_name: Option<String>,
    output_name: String,
    variant: Option<BitVariant>,
    runtime: RuntimeConfig,
    state: EncoderState,
}

impl BitImageEncoder {
    /// Creates an encoder for the saved-model directory at `model_path`.
    ///
    /// `channel_axis` names the axis holding color channels; anything other
    /// than the last axis is moved last before inference.
    pub fn new(model_path: Option<PathBuf>, channel_axis: impl Into<ChannelAxis>) -> Self {
        Self {
            model_path,
            channel_axis: channel_axis.into(),
            input_name: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            variant: None,
            runtime: RuntimeConfig::default(),
            state: EncoderState::Uninitialized,
        }
    }

    pub fn from_config(config: &BitencConfig) -> Self {
        let encoder = &config.encoder;
        Self {
            model_path: encoder.model_path.as_ref().map(PathBuf::from),
            channel_axis: ChannelAxis::new(encoder.channel_axis as isize),
            input_name: encoder.input_name.clone(),
            output_name: encoder.output_name.clone(),
            variant: encoder.variant,
            runtime: config.runtime.clone(),
            state: EncoderState::Uninitialized,
        }
    }

    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Checks every embedding against the width of `variant`.
    pub fn with_variant(mut self, variant: BitVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn channel_axis(&self) -> ChannelAxis {
        self.channel_axis
    }

    pub fn state(&self) -> &EncoderState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EncoderState::Ready(_))
    }

    /// Loads the model from `model_path`.
    ///
    /// A load failure is logged, leaves the encoder `Unavailable`, and is
    /// returned to the caller; it never panics. Runs at most once.
    pub fn initialize(&mut self) -> Result<(), EncoderError> {
        self.ensure_uninitialized()?;

        match self.load_signature() {
            Ok(signature) => {
                info!(
                    model_path = %display_path(self.model_path.as_deref()),
                    input = %signature.input_name(),
                    "BiT model loaded"
                );
                self.state = EncoderState::Ready(Box::new(signature));
                Ok(())
            }
            Err(e) => {
                error!(
                    error = %e,
                    "model initialization failed: {}",
                    display_path(self.model_path.as_deref())
                );
                self.state = EncoderState::Unavailable {
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Initializes with an already-loaded signature instead of reading `model_path`.
    pub fn initialize_with(
        &mut self,
        signature: impl InferenceSignature + 'static,
    ) -> Result<(), EncoderError> {
        self.ensure_uninitialized()?;
        self.state = EncoderState::Ready(Box::new(signature));
        Ok(())
    }

    fn ensure_uninitialized(&self) -> Result<(), EncoderError> {
        match self.state {
            EncoderState::Uninitialized => Ok(()),
            _ => Err(EncoderError::AlreadyInitialized),
        }
    }

    fn load_signature(&self) -> Result<OrtSignature, EncoderError> {
        let path = self.model_path.as_deref().ok_or_else(|| EncoderError::ModelLoad {
            path: None,
            message: "no model path configured".to_string(),
            source: None,
        })?;
        let dir = SavedModelDir::open(path)?;
        OrtSignature::load(&dir, self.input_name.as_deref(), &self.runtime)
    }

    fn signature(&self) -> Result<&dyn InferenceSignature, EncoderError> {
        match &self.state {
            EncoderState::Ready(signature) => Ok(signature.as_ref()),
            EncoderState::Uninitialized => Err(EncoderError::NotInitialized),
            EncoderState::Unavailable { reason } => Err(EncoderError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    /// Encodes a batch of images into one embedding row per image, in input order.
    pub fn encode(&self, data: impl Into<ImageBatch>) -> Result<Array2<f32>, EncoderError> {
        let signature = self.signature()?;
        let batch = data.into();
        let batch_size = batch.batch_size();
        let input = prepare_batch(batch, self.channel_axis)?;

        // An empty batch has a known shape only when the width is fixed.
        if batch_size == 0
            && let Some(variant) = self.variant
        {
            return Ok(Array2::zeros((0, variant.embedding_dim())));
        }

        let mut outputs = signature.call(input.view())?;
        let output = outputs
            .remove(&self.output_name)
            .ok_or_else(|| missing_output(signature, &outputs, &self.output_name))?;

        let embeddings = to_embedding_matrix(output, batch_size, &self.output_name)?;

        if let Some(variant) = self.variant
            && embeddings.ncols() != variant.embedding_dim()
        {
            return Err(EncoderError::inference(format!(
                "{variant} embeddings are {} wide, model produced {}",
                variant.embedding_dim(),
                embeddings.ncols()
            )));
        }

        Ok(embeddings)
    }
}

fn missing_output(
    signature: &dyn InferenceSignature,
    outputs: &SignatureOutputs,
    name: &str,
) -> EncoderError {
    if signature.output_names().iter().any(|n| n == name) {
        return EncoderError::inference(format!(
            "signature `{}` declares output `{name}` but it has an unsupported element type",
            signature.key()
        ));
    }
    let mut available: Vec<&String> = outputs.keys().collect();
    available.sort();
    EncoderError::inference(format!(
        "signature `{}` produced no output named `{name}` (outputs: {available:?})",
        signature.key()
    ))
}

/// Reshapes a `(B, ...)` output into `(B, D)`, flattening trailing axes.
fn to_embedding_matrix(
    output: ArrayD<f32>,
    batch_size: usize,
    name: &str,
) -> Result<Array2<f32>, EncoderError> {
    let shape = output.shape().to_vec();
    if shape.first() != Some(&batch_size) {
        return Err(EncoderError::inference(format!(
            "output `{name}` has shape {shape:?}, expected {batch_size} rows"
        )));
    }
    let width: usize = shape[1..].iter().product();

    output
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((batch_size, width))
        .map_err(|e| EncoderError::Inference {
            message: format!("output `{name}` of shape {shape:?} cannot be flattened"),
            source: Some(Box::new(e)),
        })
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string())
}

#[async_trait]
impl PluginAdapter for BitImageEncoder {
    fn name(&self) -> &str {
        "bit-image-encoder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ImageEncoder
    }

    async fn health_check(&self) -> Result<HealthStatus, EncoderError> {
        Ok(match &self.state {
            EncoderState::Ready(_) => HealthStatus::Healthy,
            EncoderState::Uninitialized => HealthStatus::Degraded("model not loaded yet".into()),
            EncoderState::Unavailable { reason } => HealthStatus::Unhealthy(reason.clone()),
        })
    }

    async fn shutdown(&self) -> Result<(), EncoderError> {
        Ok(())
    }
}

#[async_trait]
impl ImageEncoderAdapter for BitImageEncoder {
    async fn embed(&self, batch: ArrayD<f32>) -> Result<EmbeddingOutput, EncoderError> {
        let embeddings = self.encode(batch)?;
        Ok(EmbeddingOutput {
            dimensions: embeddings.ncols(),
            embeddings,
        })
    }
}
