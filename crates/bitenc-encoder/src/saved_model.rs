// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved-model directory layout.
//!
//! ```text
//! .
//! ├── model.onnx
//! └── variables              (optional, external weights)
//!     └── variables.data-00000-of-00001
//! ```
//!
//! External weight files are referenced from the graph relative to
//! `model.onnx`, so ONNX Runtime resolves them without extra wiring.

use std::path::{Path, PathBuf};

use bitenc_core::EncoderError;

/// File name of the model definition inside a saved-model directory.
pub const MODEL_FILE: &str = "model.onnx";

/// Subdirectory holding external weight files.
pub const VARIABLES_DIR: &str = "variables";

/// A saved-model directory whose layout has been checked.
#[derive(Debug, Clone)]
pub struct SavedModelDir {
    root: PathBuf,
}

impl SavedModelDir {
    /// Opens a saved-model directory, checking that the model definition exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EncoderError> {
        let root = path.as_ref();

        if !root.is_dir() {
            return Err(load_error(root, "not a directory"));
        }
        if !root.join(MODEL_FILE).is_file() {
            return Err(load_error(root, &format!("missing {MODEL_FILE}")));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the model definition file.
    pub fn model_file(&self) -> PathBuf {
        self.root.join(MODEL_FILE)
    }

    /// Path to the `variables` subdirectory, if present.
    pub fn variables_dir(&self) -> Option<PathBuf> {
        let dir = self.root.join(VARIABLES_DIR);
        dir.is_dir().then_some(dir)
    }

    /// Files under `variables/`, sorted by name. Empty when there is no such directory.
    pub fn variable_files(&self) -> Result<Vec<PathBuf>, EncoderError> {
        let Some(dir) = self.variables_dir() else {
            return Ok(Vec::new());
        };

        let entries = std::fs::read_dir(&dir).map_err(|e| EncoderError::ModelLoad {
            path: Some(self.root.clone()),
            message: format!("failed to list {}", dir.display()),
            source: Some(Box::new(e)),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EncoderError::ModelLoad {
                path: Some(self.root.clone()),
                message: format!("failed to list {}", dir.display()),
                source: Some(Box::new(e)),
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn load_error(path: &Path, message: &str) -> EncoderError {
    EncoderError::ModelLoad {
        path: Some(path.to_path_buf()),
        message: message.to_string(),
        source: None,
    }
}
