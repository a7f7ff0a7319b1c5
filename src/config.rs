//! Tracking parameters for the axis-lock controller.

use crate::error::RotationError;

/// Tuning for flat rejection and debouncing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    /// Below this inclination (degrees) the device is treated as lying flat.
    pub flat_threshold_deg: f32,
    /// Consecutive same-bucket readings required before acting.
    pub debounce_samples: u32,
}

impl TrackingConfig {
    /// Default flat-rejection threshold in degrees.
    pub const DEFAULT_FLAT_THRESHOLD_DEG: f32 = 20.0;
    /// Default debounce length.
    pub const DEFAULT_DEBOUNCE_SAMPLES: u32 = 3;

    /// Create a validated config.
    ///
    /// # Errors
    /// Returns [`RotationError::InvalidConfig`] if the threshold is not within
    /// 0..=90 degrees or `debounce_samples` is zero.
    pub fn new(flat_threshold_deg: f32, debounce_samples: u32) -> Result<Self, RotationError> {
        if !(0.0..=90.0).contains(&flat_threshold_deg) {
            return Err(RotationError::InvalidConfig(
                "flat threshold must be within 0..=90 degrees",
            ));
        }
        if debounce_samples == 0 {
            return Err(RotationError::InvalidConfig(
                "debounce needs at least one sample",
            ));
        }
        Ok(Self {
            flat_threshold_deg,
            debounce_samples,
        })
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            flat_threshold_deg: Self::DEFAULT_FLAT_THRESHOLD_DEG,
            debounce_samples: Self::DEFAULT_DEBOUNCE_SAMPLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackingConfig::default();
        assert_eq!(config.flat_threshold_deg, 20.0);
        assert_eq!(config.debounce_samples, 3);
    }

    #[test]
    fn test_config_validation() {
        assert!(TrackingConfig::new(45.0, 5).is_ok());
        assert!(TrackingConfig::new(0.0, 1).is_ok());
        assert!(TrackingConfig::new(-1.0, 3).is_err());
        assert!(TrackingConfig::new(91.0, 3).is_err());
        assert!(TrackingConfig::new(f32::NAN, 3).is_err());
        assert!(matches!(
            TrackingConfig::new(20.0, 0),
            Err(RotationError::InvalidConfig(_))
        ));
    }
}
