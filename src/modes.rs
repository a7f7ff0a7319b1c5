//! Rotation mode definitions and angle mapping.

use std::fmt;
use std::str::FromStr;

use crate::error::RotationError;

// =============================================================================
// Rotation Mode
// =============================================================================

/// The rotation behaviour a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RotationMode {
    /// The OS rotates freely with the device.
    #[default]
    Autorotate,
    /// Display locked to the portrait axis (0° or 180°).
    Portrait,
    /// Display locked to the landscape axis (90° or 270°).
    Landscape,
}

impl RotationMode {
    /// The name used across the scripting boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Autorotate => "AUTOROTATE",
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
        }
    }

    /// The axis to hold, or `None` for auto-rotate.
    pub fn lock_axis(self) -> Option<LockAxis> {
        match self {
            Self::Autorotate => None,
            Self::Portrait => Some(LockAxis::Portrait),
            Self::Landscape => Some(LockAxis::Landscape),
        }
    }

    /// Derive the effective mode from the raw settings values.
    ///
    /// Any non-zero `accelerometer_rotation` means auto-rotate. Otherwise
    /// `user_rotation` 1 or 3 is landscape and everything else portrait.
    pub fn from_settings(accelerometer_rotation: i32, user_rotation: i32) -> Self {
        if accelerometer_rotation != 0 {
            return Self::Autorotate;
        }
        match user_rotation {
            1 | 3 => Self::Landscape,
            _ => Self::Portrait,
        }
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationMode {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTOROTATE" => Ok(Self::Autorotate),
            "PORTRAIT" => Ok(Self::Portrait),
            "LANDSCAPE" => Ok(Self::Landscape),
            other => Err(RotationError::InvalidState(other.to_string())),
        }
    }
}

impl From<LockAxis> for RotationMode {
    fn from(axis: LockAxis) -> Self {
        match axis {
            LockAxis::Portrait => Self::Portrait,
            LockAxis::Landscape => Self::Landscape,
        }
    }
}

// =============================================================================
// Lock Axis
// =============================================================================

/// The axis the controller keeps the display on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockAxis {
    /// Upright or upside-down portrait.
    Portrait,
    /// Either landscape orientation.
    Landscape,
}

impl LockAxis {
    /// Project a stable sensor bucket onto this axis.
    ///
    /// The landscape mapping is swapped (90° → 270° and 270° → 90°) because the
    /// sensor's natural axis is rotated relative to the display on the devices
    /// this targets. Upside-down landscape resolves to 90° and upright to 270°.
    pub fn target_rotation(self, bucket: RotationBucket) -> UserRotation {
        match (self, bucket) {
            (Self::Portrait, RotationBucket::Deg180) => UserRotation::Rot180,
            (Self::Portrait, _) => UserRotation::Rot0,
            (Self::Landscape, RotationBucket::Deg90) => UserRotation::Rot270,
            (Self::Landscape, RotationBucket::Deg270) => UserRotation::Rot90,
            (Self::Landscape, RotationBucket::Deg180) => UserRotation::Rot90,
            (Self::Landscape, RotationBucket::Deg0) => UserRotation::Rot270,
        }
    }
}

impl fmt::Display for LockAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(RotationMode::from(*self).as_str())
    }
}

// =============================================================================
// Rotation Bucket
// =============================================================================

/// One of the four 90°-wide quadrants a coarse orientation reading falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationBucket {
    /// 315°..=359° and 0°..=44°.
    Deg0,
    /// 45°..=134°.
    Deg90,
    /// 135°..=224°.
    Deg180,
    /// 225°..=314°.
    Deg270,
}

impl RotationBucket {
    /// Map a heading in degrees to its quadrant.
    ///
    /// Values of 360 or more wrap around.
    pub fn from_degrees(degrees: u16) -> Self {
        match degrees % 360 {
            45..=134 => Self::Deg90,
            135..=224 => Self::Deg180,
            225..=314 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    /// Quadrant index 0..=3.
    pub fn index(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }
}

// =============================================================================
// User Rotation
// =============================================================================

/// A value of the `user_rotation` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRotation {
    /// Natural orientation.
    Rot0,
    /// Rotated 90°.
    Rot90,
    /// Rotated 180°.
    Rot180,
    /// Rotated 270°.
    Rot270,
}

impl UserRotation {
    /// The stored integer value.
    pub fn value(self) -> i32 {
        match self {
            Self::Rot0 => 0,
            Self::Rot90 => 1,
            Self::Rot180 => 2,
            Self::Rot270 => 3,
        }
    }

    /// Parse a stored value, `None` if outside 0..=3.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Rot0),
            1 => Some(Self::Rot90),
            2 => Some(Self::Rot180),
            3 => Some(Self::Rot270),
            _ => None,
        }
    }
}
