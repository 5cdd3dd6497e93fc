// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Lifecycle adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility. The model-facing
//! [`InferenceSignature`] is synchronous.

pub mod adapter;
pub mod encoder;
pub mod signature;

pub use adapter::PluginAdapter;
pub use encoder::ImageEncoderAdapter;
pub use signature::InferenceSignature;
