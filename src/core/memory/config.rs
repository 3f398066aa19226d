//! Configuration for a synchronous memory instance
//!
//! Widths are fixed at construction. Words are carried in `u64` and addresses
//! in `u32`, which bounds both parameters.

use super::errors::MemoryError;
use serde::{Deserialize, Serialize};

/// Widest word a `u64` can carry
pub const MAX_DATA_WIDTH: u32 = 64;
/// Widest address whose depth (`2^addr_width`) still fits in `u32`
pub const MAX_ADDR_WIDTH: u32 = 31;

/// How out-of-range addresses and write values are treated on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Reject the whole edge with `AddressOutOfRange`/`ValueOutOfRange`
    Reject,
    /// Keep only the low-order `addr_width`/`data_width` bits
    Mask,
}

impl Default for RangePolicy {
    fn default() -> Self {
        RangePolicy::Reject
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Bit width of each stored word
    pub data_width: u32,
    /// Bit width of the address bus; depth is `2^addr_width`
    pub addr_width: u32,
    /// Applied uniformly to every edge of the instance
    pub range_policy: RangePolicy,
}

impl MemoryConfig {
    /// 8-bit words, 4-bit address (16 entries), rejecting out-of-range inputs
    pub fn new() -> Self {
        Self {
            data_width: 8,
            addr_width: 4,
            range_policy: RangePolicy::default(),
        }
    }

    /// Set the bit width of each stored word
    ///
    /// # Arguments
    /// * `data_width` - 1..=64
    ///
    /// # Returns
    /// A new configuration with the width set; checked by `validate`
    pub fn with_data_width(mut self, data_width: u32) -> Self {
        self.data_width = data_width;
        self
    }

    /// Set the address width; depth becomes `2^addr_width`
    ///
    /// # Arguments
    /// * `addr_width` - 1..=31
    ///
    /// # Returns
    /// A new configuration with the width set; checked by `validate`
    pub fn with_addr_width(mut self, addr_width: u32) -> Self {
        self.addr_width = addr_width;
        self
    }

    /// Set how out-of-range addresses and write data are treated
    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    /// Check the widths against the word and address representations
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.data_width == 0 {
            return Err(MemoryError::Configuration(
                "data_width must be positive".to_string(),
            ));
        }
        if self.addr_width == 0 {
            return Err(MemoryError::Configuration(
                "addr_width must be positive".to_string(),
            ));
        }
        if self.data_width > MAX_DATA_WIDTH {
            return Err(MemoryError::Configuration(format!(
                "data_width {} exceeds the maximum of {} bits",
                self.data_width, MAX_DATA_WIDTH
            )));
        }
        if self.addr_width > MAX_ADDR_WIDTH {
            return Err(MemoryError::Configuration(format!(
                "addr_width {} gives a depth that does not fit in a 32-bit address (max {} bits)",
                self.addr_width, MAX_ADDR_WIDTH
            )));
        }
        Ok(())
    }

    /// Number of addressable words. Only meaningful on a validated config.
    pub fn depth(&self) -> u32 {
        1u32 << self.addr_width
    }

    /// All-ones mask of `data_width` bits. Only meaningful on a validated config.
    pub fn word_mask(&self) -> u64 {
        if self.data_width >= MAX_DATA_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.data_width) - 1
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MemoryConfig::default();
        assert_eq!(config.data_width, 8);
        assert_eq!(config.addr_width, 4);
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert_eq!(config.depth(), 16);
        assert_eq!(config.word_mask(), 0xFF);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MemoryConfig::new()
            .with_data_width(16)
            .with_addr_width(10)
            .with_range_policy(RangePolicy::Mask);

        assert_eq!(config.depth(), 1024);
        assert_eq!(config.word_mask(), 0xFFFF);
        assert_eq!(config.range_policy, RangePolicy::Mask);
    }

    #[test]
    fn test_zero_widths_rejected() {
        assert!(matches!(
            MemoryConfig::new().with_data_width(0).validate(),
            Err(MemoryError::Configuration(_))
        ));
        assert!(matches!(
            MemoryConfig::new().with_addr_width(0).validate(),
            Err(MemoryError::Configuration(_))
        ));
    }

    #[test]
    fn test_width_limits() {
        let full = MemoryConfig::new().with_data_width(64);
        assert!(full.validate().is_ok());
        assert_eq!(full.word_mask(), u64::MAX);

        assert!(MemoryConfig::new().with_data_width(65).validate().is_err());
        assert!(MemoryConfig::new().with_addr_width(31).validate().is_ok());
        assert!(MemoryConfig::new().with_addr_width(32).validate().is_err());
    }
}
