//! Controller state snapshot.

use crate::modes::{LockAxis, RotationBucket, UserRotation};

/// A snapshot of a running controller's tracking state.
///
/// Use [`AxisLockController::snapshot`](crate::AxisLockController::snapshot)
/// to obtain one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// The axis being held.
    pub axis: LockAxis,
    /// Latest inclination from the tilt sensor (0 = flat, 90 = upright).
    pub inclination_deg: f32,
    /// Bucket of the most recent qualifying orientation reading.
    pub last_candidate: Option<RotationBucket>,
    /// Consecutive readings seen in `last_candidate`.
    pub stable_count: u32,
    /// Last value successfully written to `user_rotation` this session.
    pub last_written: Option<UserRotation>,
}
