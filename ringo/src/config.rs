//! Pipeline configuration.
//!
//! The option layer of a host validates ring sizes here, before any mask or
//! shift is derived from them.

use serde::{ Deserialize, Serialize };

use crate::constants::{ DEFAULT_RING_SIZE, DEFAULT_SPIN_LIMIT, MAX_RING_SIZE, MAX_SPIN_LIMIT };
use crate::error::{ Result, RingoError };

/// Configuration for pipeline construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of slots in the ring (must be power of 2)
    pub ring_size: usize,
    /// Doublings of the barrier spin before yielding
    pub spin_limit: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ring_size: DEFAULT_RING_SIZE,
            spin_limit: DEFAULT_SPIN_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with the specified ring size
    pub fn new(ring_size: usize) -> Result<Self> {
        let config = Self {
            ring_size,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the backoff spin limit
    pub fn with_spin_limit(mut self, spin_limit: u32) -> Result<Self> {
        if spin_limit > MAX_SPIN_LIMIT {
            return Err(
                RingoError::config(format!("Spin limit cannot exceed {}", MAX_SPIN_LIMIT))
            );
        }

        self.spin_limit = spin_limit;
        Ok(self)
    }

    /// Check a configuration that was built field by field or deserialized.
    pub fn validate(&self) -> Result<()> {
        if self.ring_size == 0 {
            return Err(RingoError::config("Ring size must be greater than 0"));
        }
        if !self.ring_size.is_power_of_two() {
            return Err(RingoError::config("Ring size must be power of 2"));
        }
        if self.ring_size > MAX_RING_SIZE {
            return Err(RingoError::config(format!("Ring size cannot exceed {}", MAX_RING_SIZE)));
        }
        if self.spin_limit > MAX_SPIN_LIMIT {
            return Err(
                RingoError::config(format!("Spin limit cannot exceed {}", MAX_SPIN_LIMIT))
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_creation() {
        let config = PipelineConfig::new(1024).unwrap();
        assert_eq!(config.ring_size, 1024);
        assert_eq!(config.spin_limit, DEFAULT_SPIN_LIMIT);
    }

    #[test]
    fn test_pipeline_config_invalid_size() {
        assert!(PipelineConfig::new(0).is_err());
        assert!(PipelineConfig::new(1023).is_err()); // Not power of 2
        assert!(PipelineConfig::new(MAX_RING_SIZE << 1).is_err());
    }

    #[test]
    fn test_pipeline_config_builder() {
        let config = PipelineConfig::new(16).unwrap().with_spin_limit(2).unwrap();
        assert_eq!(config.ring_size, 16);
        assert_eq!(config.spin_limit, 2);

        assert!(PipelineConfig::new(16).unwrap().with_spin_limit(MAX_SPIN_LIMIT + 1).is_err());
    }

    #[test]
    fn test_pipeline_config_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_catches_hand_built_config() {
        let config = PipelineConfig { ring_size: 100, spin_limit: 0 };
        assert!(config.validate().is_err());
    }
}
