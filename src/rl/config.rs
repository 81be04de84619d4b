//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Constants for the tabular Q-learning policy
///
/// # Example
///
/// ```rust
/// use multi_snake::rl::QLearningConfig;
///
/// let config = QLearningConfig {
///     exploration_rate: 0.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size α of the update
    ///
    /// Default: 0.1
    pub learning_rate: f32,

    /// Discount factor γ applied to the next state's best value
    ///
    /// Default: 0.9
    pub discount: f32,

    /// Probability ε of picking a uniformly random action
    ///
    /// Default: 0.1
    pub exploration_rate: f32,
}

impl QLearningConfig {
    pub fn new(learning_rate: f32, discount: f32, exploration_rate: f32) -> Self {
        Self {
            learning_rate,
            discount,
            exploration_rate,
        }
    }

    /// Validate that every constant lies in [0, 1]
    ///
    /// ```rust
    /// use multi_snake::rl::QLearningConfig;
    ///
    /// let mut config = QLearningConfig::default();
    /// config.discount = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("discount", self.discount),
            ("exploration_rate", self.exploration_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            exploration_rate: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QLearningConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.exploration_rate, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(QLearningConfig::new(0.0, 0.0, 0.0).validate().is_ok());
        assert!(QLearningConfig::new(1.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_validation_out_of_range() {
        let err = QLearningConfig::new(-0.1, 0.5, 0.5).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RateOutOfRange {
                name: "learning_rate",
                ..
            }
        ));

        assert!(QLearningConfig::new(0.5, 1.2, 0.5).validate().is_err());
        assert!(QLearningConfig::new(0.5, 0.5, 2.0).validate().is_err());
        assert!(QLearningConfig::new(0.5, 0.5, f32::NAN).validate().is_err());
    }

    #[test]
    fn test_custom_config() {
        let config = QLearningConfig {
            learning_rate: 0.3,
            discount: 0.3,
            ..Default::default()
        };
        assert_eq!(config.exploration_rate, 0.1);
        assert!(config.validate().is_ok());
    }
}
