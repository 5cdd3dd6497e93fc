// SPDX-FileCopyrightText: 2026 Bitenc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the bitenc configuration system.

use bitenc_config::diagnostic::ConfigError;
use bitenc_config::{load_and_validate_str, load_config_from_str};
use bitenc_core::BitVariant;

#[test]
fn valid_toml_deserializes() {
    let toml = r#"
[encoder]
model_path = "/models/R50x1"
channel_axis = 1
input_name = "input_1"
output_name = "output_1"
variant = "R50x1"

[runtime]
intra_threads = 4
optimization_level = 2
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.encoder.model_path.as_deref(), Some("/models/R50x1"));
    assert_eq!(config.encoder.channel_axis, 1);
    assert_eq!(config.encoder.input_name.as_deref(), Some("input_1"));
    assert_eq!(config.encoder.output_name, "output_1");
    assert_eq!(config.encoder.variant, Some(BitVariant::R50x1));
    assert_eq!(config.runtime.intra_threads, 4);
    assert_eq!(config.runtime.optimization_level, 2);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert!(config.encoder.model_path.is_none());
    assert_eq!(config.encoder.channel_axis, -1);
    assert!(config.encoder.input_name.is_none());
    assert_eq!(config.encoder.output_name, "output_1");
    assert!(config.encoder.variant.is_none());
    assert_eq!(config.runtime.intra_threads, 1);
    assert_eq!(config.runtime.optimization_level, 3);
}

#[test]
fn unknown_field_in_encoder_is_rejected() {
    let toml = r#"
[encoder]
chanel_axis = 1
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("chanel_axis"),
        "error should mention the bad key, got: {err_str}"
    );
}

#[test]
fn unknown_field_produces_suggestion_and_span() {
    let toml = "[encoder]\nchanel_axis = 1\n";

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                span,
                ..
            } => Some((key.clone(), suggestion.clone(), *span)),
            _ => None,
        })
        .expect("should produce an UnknownKey diagnostic");

    assert_eq!(unknown.0, "chanel_axis");
    assert_eq!(unknown.1.as_deref(), Some("channel_axis"));
    let span = unknown.2.expect("span should be located in the inline source");
    assert_eq!(span.offset(), toml.find("chanel_axis").unwrap());
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[runtime]
intra_threads = "many"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "expected a type error, got: {errors:?}"
    );
}

#[test]
fn unknown_variant_is_rejected() {
    let toml = r#"
[encoder]
variant = "R18x1"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[encoder]
channel_axis = 0

[runtime]
optimization_level = 7
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Env overrides arrive as dotted keys after `BITENC_` prefix mapping.
#[test]
fn env_style_override_beats_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    use bitenc_config::BitencConfig;

    let config: BitencConfig = Figment::new()
        .merge(Serialized::defaults(BitencConfig::default()))
        .merge(Toml::string("[encoder]\nmodel_path = \"/models/from-toml\"\n"))
        .merge(("encoder.model_path", "/models/from-env"))
        .merge(("runtime.intra_threads", 2))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.encoder.model_path.as_deref(), Some("/models/from-env"));
    assert_eq!(config.runtime.intra_threads, 2);
}

/// Missing config files are skipped by Figment's `Toml::file()`.
#[test]
fn missing_config_file_uses_defaults() {
    let config = bitenc_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/bitenc.toml",
    ))
    .expect("missing file should fall back to defaults");
    assert_eq!(config.encoder.output_name, "output_1");
}
