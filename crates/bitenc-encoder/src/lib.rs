// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Big Transfer (BiT) image encoder.
//!
//! Loads a pretrained BiT feature-vector model from a saved-model directory
//! and encodes image batches into fixed-length embeddings with ONNX Runtime.
//!
//! ## Architecture
//!
//! - **BitImageEncoder**: construct, `initialize`, then `encode` batches
//! - **SavedModelDir**: on-disk layout check for the model directory
//! - **OrtSignature**: `serving_default` signature backed by an ONNX session
//! - **tensor**: channel-axis handling and `f32` casting of input batches
//!
//! ```no_run
//! use bitenc_encoder::BitImageEncoder;
//! use ndarray::Array4;
//!
//! let mut encoder = BitImageEncoder::new(Some("/models/R50x1".into()), 1);
//! encoder.initialize()?;
//! let embeddings = encoder.encode(Array4::<u8>::zeros((4, 3, 224, 224)))?;
//! assert_eq!(embeddings.dim(), (4, 2048));
//! # Ok::<(), bitenc_core::EncoderError>(())
//! ```

pub mod encoder;
pub mod saved_model;
pub mod signature;
pub mod tensor;

pub use encoder::{BitImageEncoder, EncoderState, DEFAULT_OUTPUT_NAME};
pub use saved_model::SavedModelDir;
pub use signature::{OrtSignature, SERVING_DEFAULT};
pub use tensor::{prepare_batch, ChannelAxis, ImageBatch};
