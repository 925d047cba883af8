//! Tests for configuration parsing
//!
//! This file tests the config module including:
//! - Loading the JSON presets shipped in config/
//! - Mode resolution (plain, L2, dropout)
//! - Rejecting invalid combinations and ranges
//! - Handling invalid JSON and missing files

use rust_regularized_networks::config::{load_config, TrainingConfig, TrainingMode};
use rust_regularized_networks::training::MaskSampling;
use rust_regularized_networks::NetworkError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

// ============================================================================
// Presets
// ============================================================================

mod preset_tests {
    use super::*;

    #[test]
    fn test_load_dropout_preset() {
        let config = load_config("config/dropout.json").expect("Failed to load dropout config");

        assert_eq!(config.keep_prob, 0.86);
        assert_eq!(config.lambd, 0.0);
        assert_eq!(config.num_iterations, 30_000);
        assert!(matches!(config.mode().unwrap(), TrainingMode::Dropout { .. }));
        assert_eq!(config.mask_sampling(), MaskSampling::Reseeded(1));
    }

    #[test]
    fn test_load_l2_preset() {
        let config = load_config("config/l2.json").expect("Failed to load L2 config");

        assert_eq!(config.mode().unwrap(), TrainingMode::L2 { lambd: 0.7 });
    }

    #[test]
    fn test_load_plain_preset() {
        let config = load_config("config/plain.json").expect("Failed to load plain config");

        assert_eq!(config.mode().unwrap(), TrainingMode::Plain);
        assert_eq!(config.cost_interval, 10_000);
    }
}

// ============================================================================
// Invalid configurations
// ============================================================================

mod invalid_config_tests {
    use super::*;

    #[test]
    fn test_both_regularizers_rejected() {
        let file = write_config(r#"{"lambd": 0.7, "keep_prob": 0.86}"#);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, NetworkError::Configuration { .. }));
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_keep_prob_out_of_range_rejected() {
        for keep_prob in ["0.0", "-0.2", "1.01"] {
            let file = write_config(&format!(r#"{{"keep_prob": {}}}"#, keep_prob));
            assert!(
                matches!(load_config(file.path()), Err(NetworkError::Configuration { .. })),
                "keep_prob {} accepted",
                keep_prob
            );
        }
    }

    #[test]
    fn test_non_positive_learning_rate_rejected() {
        let file = write_config(r#"{"learning_rate": 0.0}"#);
        assert!(matches!(
            load_config(file.path()),
            Err(NetworkError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ not json");
        assert!(matches!(load_config(file.path()), Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_wrong_field_type() {
        let file = write_config(r#"{"num_iterations": "many"}"#);
        assert!(matches!(load_config(file.path()), Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("config/does_not_exist.json"),
            Err(NetworkError::Io(_))
        ));
    }
}

// ============================================================================
// Defaults
// ============================================================================

mod default_tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_config("{}");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config, TrainingConfig::default());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = TrainingConfig {
            lambd: 0.1,
            num_iterations: 500,
            ..TrainingConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let file = write_config(&json);
        assert_eq!(load_config(file.path()).unwrap(), config);
    }
}
