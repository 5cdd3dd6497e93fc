// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference signatures for deterministic testing.
//!
//! `MockSignature` computes a fixed projection of position-weighted channel
//! means, so its output depends on which axis holds channels and on the
//! spatial order of pixels, like a real convolutional feature extractor.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{Array2, ArrayViewD};

use bitenc_core::{EncoderError, InferenceSignature, SignatureOutputs};

/// A deterministic signature producing `(B, dim)` features under `output_1`.
pub struct MockSignature {
    dim: usize,
    output_name: String,
    calls: AtomicUsize,
}

impl MockSignature {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            output_name: "output_1".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Publish features under a different output name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Number of times the signature has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn weight(d: usize, c: usize) -> f32 {
        ((d * 31 + c * 17) % 13) as f32 - 6.0
    }
}

impl InferenceSignature for MockSignature {
    fn key(&self) -> &str {
        "serving_default"
    }

    fn output_names(&self) -> Vec<String> {
        vec![self.output_name.clone()]
    }

    fn call(&self, input: ArrayViewD<'_, f32>) -> Result<SignatureOutputs, EncoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let shape = input.shape();
        if shape.len() < 2 {
            return Err(EncoderError::inference(format!(
                "mock signature needs a channel-last batch, got shape {shape:?}"
            )));
        }
        let batch = shape[0];
        let channels = shape[shape.len() - 1];
        let pixels: usize = shape[1..shape.len() - 1].iter().product();

        let input = input.as_standard_layout();
        let data = input
            .as_slice()
            .ok_or_else(|| EncoderError::inference("input is not contiguous"))?;

        let mut features = Array2::<f32>::zeros((batch, self.dim));
        for b in 0..batch {
            let image = &data[b * pixels * channels..(b + 1) * pixels * channels];
            let mut pooled = vec![0.0f32; channels];
            for (p, pixel) in image.chunks_exact(channels).enumerate() {
                let position_weight = 1.0 + (p % 5) as f32;
                for (c, value) in pixel.iter().enumerate() {
                    pooled[c] += value * position_weight;
                }
            }
            for value in &mut pooled {
                *value /= pixels.max(1) as f32;
            }

            for d in 0..self.dim {
                features[[b, d]] = pooled
                    .iter()
                    .enumerate()
                    .map(|(c, v)| v * Self::weight(d, c))
                    .sum();
            }
        }

        Ok(SignatureOutputs::from([(
            self.output_name.clone(),
            features.into_dyn(),
        )]))
    }
}

/// A signature that fails every call, simulating a runtime fault.
pub struct FailingSignature;

impl InferenceSignature for FailingSignature {
    fn key(&self) -> &str {
        "serving_default"
    }

    fn output_names(&self) -> Vec<String> {
        vec!["output_1".to_string()]
    }

    fn call(&self, _input: ArrayViewD<'_, f32>) -> Result<SignatureOutputs, EncoderError> {
        Err(EncoderError::inference("mock inference failure"))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    #[test]
    fn produces_one_row_per_image() {
        let sig = MockSignature::new(8);
        let input = ArrayD::<f32>::ones(IxDyn(&[3, 4, 4, 3]));
        let out = sig.call(input.view()).unwrap();
        assert_eq!(out["output_1"].shape(), &[3, 8]);
        assert_eq!(sig.calls(), 1);
    }

    #[test]
    fn channel_order_changes_features() {
        let sig = MockSignature::new(4);
        let a = ArrayD::from_shape_fn(IxDyn(&[1, 2, 2, 3]), |ix| ix[3] as f32);
        let b = ArrayD::from_shape_fn(IxDyn(&[1, 2, 2, 3]), |ix| (2 - ix[3]) as f32);
        let fa = sig.call(a.view()).unwrap().remove("output_1").unwrap();
        let fb = sig.call(b.view()).unwrap().remove("output_1").unwrap();
        assert_ne!(fa, fb);
    }

    #[test]
    fn failing_signature_errors() {
        let input = ArrayD::<f32>::zeros(IxDyn(&[1, 2]));
        assert!(FailingSignature.call(input.view()).is_err());
    }
}
