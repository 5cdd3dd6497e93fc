// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary saved-model directories for load-failure tests.

use tempfile::TempDir;

/// A directory with the expected layout but a model file that is not a valid graph.
pub fn corrupted_model_dir() -> std::io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("model.onnx"), b"definitely not protobuf")?;
    std::fs::create_dir(dir.path().join("variables"))?;
    std::fs::write(dir.path().join("variables/variables.index"), b"")?;
    std::fs::write(
        dir.path().join("variables/variables.data-00000-of-00001"),
        b"",
    )?;
    Ok(dir)
}

/// A directory without a model definition file.
pub fn empty_model_dir() -> std::io::Result<TempDir> {
    tempfile::tempdir()
}
