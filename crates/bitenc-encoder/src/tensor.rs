// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch tensor preparation: channel-axis handling and `f32` casting.

use ndarray::{Array, ArrayD, Dimension};

use bitenc_core::EncoderError;

/// Index of the axis holding color channels, numpy-style.
///
/// Negative values count from the end, so [`ChannelAxis::LAST`] (`-1`)
/// always names the last axis regardless of rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelAxis(isize);

impl ChannelAxis {
    /// Channels are already stored last (`B x H x W x C`).
    pub const LAST: ChannelAxis = ChannelAxis(-1);

    pub const fn new(axis: isize) -> Self {
        Self(axis)
    }

    /// The raw, unresolved axis index.
    pub fn get(self) -> isize {
        self.0
    }

    /// Resolves the axis against a batch of the given rank.
    ///
    /// Fails when the axis is out of bounds or names the batch axis.
    pub fn resolve(self, rank: usize) -> Result<usize, EncoderError> {
        let signed_rank = rank as isize;
        let index = if self.0 < 0 { self.0 + signed_rank } else { self.0 };

        if index < 0 || index >= signed_rank {
            return Err(EncoderError::invalid_input(format!(
                "channel axis {} is out of bounds for a rank-{rank} batch",
                self.0
            )));
        }
        if index == 0 {
            return Err(EncoderError::invalid_input(format!(
                "channel axis {} resolves to the batch axis",
                self.0
            )));
        }
        Ok(index as usize)
    }
}

impl Default for ChannelAxis {
    fn default() -> Self {
        Self::LAST
    }
}

impl From<isize> for ChannelAxis {
    fn from(axis: isize) -> Self {
        Self(axis)
    }
}

impl From<i32> for ChannelAxis {
    fn from(axis: i32) -> Self {
        Self(axis as isize)
    }
}

/// A batch of images with its leading axis as the batch dimension.
///
/// Accepts the element types images are commonly decoded into; everything
/// is cast to `f32` before inference.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageBatch {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

macro_rules! for_each_variant {
    ($batch:expr, $array:ident => $body:expr) => {
        match $batch {
            ImageBatch::U8($array) => $body,
            ImageBatch::U16($array) => $body,
            ImageBatch::I32($array) => $body,
            ImageBatch::I64($array) => $body,
            ImageBatch::F32($array) => $body,
            ImageBatch::F64($array) => $body,
        }
    };
}

macro_rules! impl_from_array {
    ($($elem:ty => $variant:ident),* $(,)?) => {
        $(
            impl<D: Dimension> From<Array<$elem, D>> for ImageBatch {
                fn from(array: Array<$elem, D>) -> Self {
                    ImageBatch::$variant(array.into_dyn())
                }
            }
        )*
    };
}

impl_from_array!(
    u8 => U8,
    u16 => U16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

impl ImageBatch {
    pub fn shape(&self) -> &[usize] {
        for_each_variant!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Number of images, or 0 for a rank-0 tensor.
    pub fn batch_size(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// Casts every element to `f32`, keeping the shape.
    pub fn into_f32(self) -> ArrayD<f32> {
        match self {
            ImageBatch::F32(a) => a,
            ImageBatch::U8(a) => a.mapv(f32::from),
            ImageBatch::U16(a) => a.mapv(f32::from),
            ImageBatch::I32(a) => a.mapv(|v| v as f32),
            ImageBatch::I64(a) => a.mapv(|v| v as f32),
            ImageBatch::F64(a) => a.mapv(|v| v as f32),
        }
    }
}

/// Validates a batch and turns it into a contiguous channel-last `f32` tensor.
pub fn prepare_batch(batch: ImageBatch, channel_axis: ChannelAxis) -> Result<ArrayD<f32>, EncoderError> {
    let rank = batch.ndim();
    if rank < 2 {
        return Err(EncoderError::invalid_input(format!(
            "expected a batch of rank >= 2, got shape {:?}",
            batch.shape()
        )));
    }

    let axis = channel_axis.resolve(rank)?;
    let data = batch.into_f32();
    let data = if axis == rank - 1 {
        data
    } else {
        move_axis_last(data, axis)
    };

    Ok(data.as_standard_layout().into_owned())
}

/// Equivalent of `np.moveaxis(data, axis, -1)`: the relative order of the
/// remaining axes is kept.
pub fn move_axis_last<T>(data: ArrayD<T>, axis: usize) -> ArrayD<T> {
    let mut order: Vec<usize> = (0..data.ndim()).filter(|&a| a != axis).collect();
    order.push(axis);
    data.permuted_axes(order)
}
