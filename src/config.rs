//! Evolution parameters.
//!
//! [`NeatConfig`] deserializes from TOML with every field optional: missing
//! fields take their [`Default`] value, so a file only needs to list what it
//! changes.
//!
//! ```toml
//! population_size = 150
//! max_compatibility_distance = 2.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NeatError;

/// Configuration for genome mutation, speciation and reproduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    /// Number of organisms bred each generation.
    pub population_size: usize,
    /// Range for new and replaced weights: `[-connection_strength, connection_strength]`.
    pub connection_strength: f64,
    /// Probability that a weight mutation perturbs rather than replaces a weight.
    pub connection_perturbation_probability: f64,
    /// Attempts made by add-connection before giving up.
    pub max_add_connection_tries: usize,
    /// Probability that an offspring comes from mutating a single parent.
    pub mutate_only_probability: f64,
    /// Probability of the add-node branch of `mutate`.
    pub mutate_add_node_probability: f64,
    /// Probability of the add-connection branch of `mutate`.
    pub mutate_add_connection_probability: f64,
    /// Probability of mutating all enabled weights.
    pub mutate_connection_weights_probability: f64,
    /// Probability of toggling one connection.
    pub mutate_toggle_enable_probability: f64,
    /// Probability of re-enabling one disabled connection.
    pub mutate_set_enable_probability: f64,
    /// Probability of changing one hidden node's activation.
    pub mutate_activation_probability: f64,
    /// Weight of excess genes in the compatibility distance.
    pub excess_coefficient: f64,
    /// Weight of disjoint genes in the compatibility distance.
    pub disjoint_coefficient: f64,
    /// Weight of matching-gene weight differences in the compatibility distance.
    pub weight_difference_coefficient: f64,
    /// Genomes closer than this share a species.
    pub max_compatibility_distance: f64,
    /// Step applied to the threshold when adapting it.
    pub compatibility_modifier: f64,
    /// Species count the adaptive threshold steers toward.
    pub compatibility_modifier_target: usize,
    /// Adapt `max_compatibility_distance` every epoch.
    pub adaptive_compatibility: bool,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            connection_strength: 2.5,
            connection_perturbation_probability: 0.85,
            max_add_connection_tries: 10,
            mutate_only_probability: 0.2,
            mutate_add_node_probability: 0.03,
            mutate_add_connection_probability: 0.04,
            mutate_connection_weights_probability: 0.9,
            mutate_toggle_enable_probability: 0.01,
            mutate_set_enable_probability: 0.001,
            mutate_activation_probability: 0.02,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            weight_difference_coefficient: 1.0,
            max_compatibility_distance: 3.0,
            compatibility_modifier: 0.3,
            compatibility_modifier_target: 10,
            adaptive_compatibility: false,
        }
    }
}

impl NeatConfig {
    /// Parse a TOML document; absent fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, NeatError> {
        let config: NeatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, NeatError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded NEAT configuration from '{}'", path.display());
        Ok(config)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), NeatError> {
        if self.population_size == 0 {
            return Err(invalid("population_size", "must be at least 1"));
        }
        if self.max_add_connection_tries == 0 {
            return Err(invalid("max_add_connection_tries", "must be at least 1"));
        }
        if self.compatibility_modifier_target == 0 {
            return Err(invalid("compatibility_modifier_target", "must be at least 1"));
        }

        let probabilities = [
            (
                "connection_perturbation_probability",
                self.connection_perturbation_probability,
            ),
            ("mutate_only_probability", self.mutate_only_probability),
            ("mutate_add_node_probability", self.mutate_add_node_probability),
            (
                "mutate_add_connection_probability",
                self.mutate_add_connection_probability,
            ),
            (
                "mutate_connection_weights_probability",
                self.mutate_connection_weights_probability,
            ),
            (
                "mutate_toggle_enable_probability",
                self.mutate_toggle_enable_probability,
            ),
            ("mutate_set_enable_probability", self.mutate_set_enable_probability),
            ("mutate_activation_probability", self.mutate_activation_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }

        let magnitudes = [
            ("connection_strength", self.connection_strength),
            ("excess_coefficient", self.excess_coefficient),
            ("disjoint_coefficient", self.disjoint_coefficient),
            ("weight_difference_coefficient", self.weight_difference_coefficient),
            ("max_compatibility_distance", self.max_compatibility_distance),
            ("compatibility_modifier", self.compatibility_modifier),
        ];
        for (field, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(
                    field,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> NeatError {
    NeatError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NeatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 1000);
        assert!((config.connection_strength - 2.5).abs() < 1e-12);
        assert!(!config.adaptive_compatibility);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = NeatConfig::from_toml_str(
            "population_size = 150\nmax_compatibility_distance = 2.0\n",
        )
        .unwrap();
        assert_eq!(config.population_size, 150);
        assert!((config.max_compatibility_distance - 2.0).abs() < 1e-12);
        assert_eq!(config.max_add_connection_tries, 10);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = NeatConfig {
            population_size: 42,
            adaptive_compatibility: true,
            ..NeatConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(NeatConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let config = NeatConfig {
            mutate_add_node_probability: 1.5,
            ..NeatConfig::default()
        };
        match config.validate() {
            Err(NeatError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "mutate_add_node_probability");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_population_and_bad_strength() {
        let empty = NeatConfig {
            population_size: 0,
            ..NeatConfig::default()
        };
        assert!(empty.validate().is_err());

        let negative = NeatConfig {
            connection_strength: -1.0,
            ..NeatConfig::default()
        };
        assert!(negative.validate().is_err());

        let nan = NeatConfig {
            excess_coefficient: f64::NAN,
            ..NeatConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = NeatConfig::from_toml_str("population_size = \"many\"").unwrap_err();
        assert!(matches!(err, NeatError::ConfigParse(_)));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = NeatConfig::load(Path::new("/nonexistent/neat.toml")).unwrap_err();
        assert!(matches!(err, NeatError::ConfigRead(_)));
    }
}
