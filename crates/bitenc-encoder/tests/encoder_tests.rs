// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the BiT image encoder lifecycle and encode contract.

use ndarray::{Array4, ArrayD, Axis, Dimension, IxDyn};
use proptest::prelude::*;

use bitenc_core::{BitVariant, EncoderError};
use bitenc_encoder::tensor::move_axis_last;
use bitenc_encoder::{BitImageEncoder, ChannelAxis, EncoderState};
use bitenc_test_utils::{corrupted_model_dir, empty_model_dir, FailingSignature, MockSignature};

fn ready_encoder(channel_axis: impl Into<ChannelAxis>, dim: usize) -> BitImageEncoder {
    let mut encoder = BitImageEncoder::new(None, channel_axis);
    encoder
        .initialize_with(MockSignature::new(dim))
        .expect("fresh encoder accepts a signature");
    encoder
}

fn pattern(shape: &[usize]) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(shape), |ix| {
        ix.as_array_view()
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1) * (v + 3)) as f32)
            .sum::<f32>()
            .sin()
    })
}

/// Channels-first input of shape (4, 3, 224, 224) yields (4, 2048).
#[test]
fn channels_first_batch_produces_r50x1_embeddings() {
    let mut encoder = BitImageEncoder::new(Some("/models/R50x1".into()), 1)
        .with_variant(BitVariant::R50x1);
    encoder
        .initialize_with(MockSignature::new(2048))
        .expect("should accept signature");

    let batch = Array4::<u8>::from_elem((4, 3, 224, 224), 127);
    let embeddings = encoder.encode(batch).expect("encode should succeed");
    assert_eq!(embeddings.dim(), (4, 2048));
}

#[test]
fn rows_follow_input_order() {
    let encoder = ready_encoder(ChannelAxis::LAST, 16);
    let batch = pattern(&[5, 6, 6, 3]);

    let all = encoder.encode(batch.clone()).unwrap();
    assert_eq!(all.nrows(), 5);

    for i in 0..5 {
        let single = batch
            .index_axis(Axis(0), i)
            .insert_axis(Axis(0))
            .to_owned();
        let row = encoder.encode(single).unwrap();
        assert_eq!(row.row(0), all.row(i), "row {i} out of order");
    }
}

#[test]
fn zero_size_batch_yields_zero_rows() {
    let encoder = ready_encoder(1, 24);
    let embeddings = encoder.encode(Array4::<u8>::zeros((0, 3, 16, 16))).unwrap();
    assert_eq!(embeddings.dim(), (0, 24));

    let mut encoder = BitImageEncoder::new(None, ChannelAxis::LAST).with_variant(BitVariant::R50x3);
    encoder.initialize_with(FailingSignature).unwrap();
    let embeddings = encoder.encode(Array4::<f32>::zeros((0, 8, 8, 3))).unwrap();
    assert_eq!(embeddings.dim(), (0, 6144));
}

#[test]
fn encode_is_deterministic() {
    let encoder = ready_encoder(1, 32);
    let batch = pattern(&[3, 3, 8, 8]);

    let first = encoder.encode(batch.clone()).unwrap();
    let second = encoder.encode(batch).unwrap();
    assert_eq!(first, second);
}

#[test]
fn encode_leaves_state_untouched() {
    let encoder = ready_encoder(ChannelAxis::LAST, 4);
    encoder.encode(pattern(&[2, 2, 2, 3])).unwrap();
    assert!(encoder.is_ready());
    assert!(matches!(encoder.state(), EncoderState::Ready(_)));
}

#[test]
fn integer_and_float_inputs_agree() {
    let encoder = ready_encoder(ChannelAxis::LAST, 8);
    let ints = Array4::<u8>::from_shape_fn((2, 4, 4, 3), |(b, h, w, c)| {
        (b * 50 + h * 10 + w * 3 + c) as u8
    });
    let floats = ints.mapv(f64::from);

    assert_eq!(encoder.encode(ints).unwrap(), encoder.encode(floats).unwrap());
}

#[test]
fn corrupted_model_fails_soft() {
    let dir = corrupted_model_dir().unwrap();
    let mut encoder = BitImageEncoder::new(Some(dir.path().to_path_buf()), ChannelAxis::LAST);

    let err = encoder.initialize().expect_err("corrupted model must not load");
    assert!(matches!(err, EncoderError::ModelLoad { .. }));
    assert!(err.to_string().contains(&dir.path().display().to_string()));
    assert!(
        std::error::Error::source(&err).is_some(),
        "runtime error should be kept as the source"
    );

    let err = encoder.encode(pattern(&[1, 2, 2, 3])).unwrap_err();
    assert!(matches!(err, EncoderError::ModelUnavailable { .. }));
}

#[test]
fn directory_without_model_file_fails_soft() {
    let dir = empty_model_dir().unwrap();
    let mut encoder = BitImageEncoder::new(Some(dir.path().to_path_buf()), ChannelAxis::LAST);

    let err = encoder.initialize().unwrap_err();
    assert!(err.to_string().contains("missing model.onnx"));
    assert!(!encoder.is_ready());
}

#[test]
fn unset_model_path_gives_clear_encode_error() {
    let mut encoder = BitImageEncoder::new(None, ChannelAxis::LAST);
    assert!(encoder.initialize().is_err());

    let err = encoder.encode(pattern(&[1, 2, 2, 3])).unwrap_err();
    assert!(
        err.to_string().contains("model is unavailable"),
        "unexpected error: {err}"
    );
}

#[test]
fn inference_failure_propagates() {
    let mut encoder = BitImageEncoder::new(None, ChannelAxis::LAST);
    encoder.initialize_with(FailingSignature).unwrap();

    let err = encoder.encode(pattern(&[2, 2, 2, 3])).unwrap_err();
    assert!(matches!(err, EncoderError::Inference { .. }));
}

#[test]
fn custom_output_name_is_used() {
    let mut encoder = BitImageEncoder::new(None, ChannelAxis::LAST).with_output_name("pre_logits");
    encoder
        .initialize_with(MockSignature::new(6).with_output_name("pre_logits"))
        .unwrap();

    assert_eq!(encoder.encode(pattern(&[2, 2, 2, 3])).unwrap().dim(), (2, 6));
}

#[test]
fn rank_and_axis_are_validated() {
    let encoder = ready_encoder(1, 4);
    let vector = ndarray::Array1::<f32>::zeros(4);
    assert!(matches!(
        encoder.encode(vector),
        Err(EncoderError::InvalidInput { .. })
    ));

    let encoder = ready_encoder(-5, 4);
    assert!(matches!(
        encoder.encode(pattern(&[1, 3, 2, 2])),
        Err(EncoderError::InvalidInput { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Encoding with channels on axis `k` equals encoding the same data with
    /// channels already moved last.
    #[test]
    fn channel_axis_move_is_equivalent(
        batch in 1usize..4,
        d1 in 1usize..5,
        d2 in 1usize..5,
        d3 in 1usize..5,
        axis in 1usize..4,
        negative in any::<bool>(),
    ) {
        let data = pattern(&[batch, d1, d2, d3]);
        let signed_axis = if negative { axis as isize - 4 } else { axis as isize };

        let moved = ready_encoder(ChannelAxis::new(signed_axis), 12)
            .encode(data.clone())
            .unwrap();

        let pre_moved = move_axis_last(data, axis).as_standard_layout().into_owned();
        let expected = ready_encoder(ChannelAxis::LAST, 12).encode(pre_moved).unwrap();

        prop_assert_eq!(moved.nrows(), batch);
        prop_assert_eq!(moved, expected);
    }
}
