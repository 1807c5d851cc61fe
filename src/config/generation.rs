use super::traits::ConfigSection;
use crate::error::TreeLangError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tree height for generation and crossover
    pub max_depth: usize,
    /// Probability that a terminal draw picks a variable over a constant
    pub ratio_variables: f64,
    /// Probability of cutting growth short with a terminal while height
    /// budget remains
    pub terminal_ratio: f64,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            ratio_variables: 0.5,
            terminal_ratio: 0.3,
            seed: None,
        }
    }
}

impl ConfigSection for GenerationConfig {
    fn section_name() -> &'static str {
        "generation"
    }

    fn validate(&self) -> Result<(), TreeLangError> {
        if self.max_depth < 1 {
            return Err(TreeLangError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ratio_variables) {
            return Err(TreeLangError::Configuration(
                "Variable ratio must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.terminal_ratio) {
            return Err(TreeLangError::Configuration(
                "Terminal ratio must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_ratio_rejected() {
        let config = GenerationConfig {
            ratio_variables: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
