// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX Runtime backed inference signature.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use tracing::debug;

use bitenc_config::RuntimeConfig;
use bitenc_core::{EncoderError, InferenceSignature, SignatureOutputs};

use crate::saved_model::SavedModelDir;

/// Key of the default serving signature.
pub const SERVING_DEFAULT: &str = "serving_default";

/// The `serving_default` signature of a model loaded into ONNX Runtime.
///
/// The session needs exclusive access to run, so calls are serialized
/// through a mutex.
pub struct OrtSignature {
    session: Mutex<Session>,
    input_name: String,
    output_names: Vec<String>,
    model_file: PathBuf,
}

impl OrtSignature {
    /// Builds a session from the model in `dir`.
    ///
    /// `input_name` selects the model input to feed; `None` picks the first
    /// declared input.
    pub fn load(
        dir: &SavedModelDir,
        input_name: Option<&str>,
        runtime: &RuntimeConfig,
    ) -> Result<Self, EncoderError> {
        let model_file = dir.model_file();
        let load_err = |message: String, source: ort::Error| EncoderError::ModelLoad {
            path: Some(dir.root().to_path_buf()),
            message,
            source: Some(Box::new(source)),
        };

        let session = Session::builder()
            .map_err(|e| load_err("failed to create ONNX session builder".to_string(), e))?
            .with_optimization_level(optimization_level(runtime.optimization_level))
            .map_err(|e| load_err("failed to set optimization level".to_string(), e))?
            .with_intra_threads(runtime.intra_threads)
            .map_err(|e| load_err("failed to set thread count".to_string(), e))?
            .commit_from_file(&model_file)
            .map_err(|e| {
                load_err(
                    format!("failed to load ONNX model from {}: {e}", model_file.display()),
                    e,
                )
            })?;

        let declared_inputs: Vec<String> = session
            .inputs()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        let input_name = resolve_input_name(&declared_inputs, input_name).map_err(|message| {
            EncoderError::ModelLoad {
                path: Some(dir.root().to_path_buf()),
                message,
                source: None,
            }
        })?;

        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|o| o.name().to_string())
            .collect();

        debug!(
            model = %model_file.display(),
            input = %input_name,
            outputs = ?output_names,
            "ONNX session ready"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_names,
            model_file,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn model_file(&self) -> &Path {
        &self.model_file
    }
}

/// Picks the model input to feed: the requested name if the model declares
/// it, otherwise the first declared input.
fn resolve_input_name(declared: &[String], requested: Option<&str>) -> Result<String, String> {
    match requested {
        Some(name) if declared.iter().any(|n| n == name) => Ok(name.to_string()),
        Some(name) => Err(format!(
            "model has no input named `{name}` (inputs: {})",
            declared.join(", ")
        )),
        None => declared
            .first()
            .cloned()
            .ok_or_else(|| "model declares no inputs".to_string()),
    }
}

/// Copies a flat output buffer into an array of the reported shape.
fn output_to_array<T: Copy>(
    name: &str,
    shape: &[i64],
    data: &[T],
) -> Result<ArrayD<T>, EncoderError> {
    let dims = shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|_| {
            EncoderError::inference(format!("output `{name}` has unresolved shape {shape:?}"))
        })?;
    ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec()).map_err(|e| EncoderError::Inference {
        message: format!("output `{name}` has inconsistent shape {dims:?}"),
        source: Some(Box::new(e)),
    })
}

fn optimization_level(level: u8) -> GraphOptimizationLevel {
    match level {
        0 => GraphOptimizationLevel::Disable,
        1 => GraphOptimizationLevel::Level1,
        2 => GraphOptimizationLevel::Level2,
        _ => GraphOptimizationLevel::Level3,
    }
}

impl InferenceSignature for OrtSignature {
    fn key(&self) -> &str {
        SERVING_DEFAULT
    }

    fn output_names(&self) -> Vec<String> {
        self.output_names.clone()
    }

    fn call(&self, input: ArrayViewD<'_, f32>) -> Result<SignatureOutputs, EncoderError> {
        let input = input.as_standard_layout();
        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let data = input
            .as_slice()
            .ok_or_else(|| EncoderError::inference("batch is not contiguous in memory"))?;
        let tensor = TensorRef::from_array_view((dims, data)).map_err(|e| EncoderError::Inference {
            message: format!("failed to convert batch of shape {:?} to a tensor", input.shape()),
            source: Some(Box::new(e)),
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EncoderError::Internal(format!("failed to lock ONNX session: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| EncoderError::Inference {
                message: format!("ONNX inference failed for input `{}`", self.input_name),
                source: Some(Box::new(e)),
            })?;

        let mut results = SignatureOutputs::new();
        for name in &self.output_names {
            let value = &outputs[name.as_str()];
            let array = if let Ok((shape, data)) = value.try_extract_tensor::<f32>() {
                output_to_array(name, shape, data)?
            } else if let Ok((shape, data)) = value.try_extract_tensor::<f64>() {
                output_to_array(name, shape, data)?.mapv(|v| v as f32)
            } else {
                debug!(output = %name, "skipping output with unsupported element type");
                continue;
            };
            results.insert(name.clone(), array);
        }

        Ok(results)
    }
}
