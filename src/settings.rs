//! System settings store abstraction.

use std::fmt;

use crate::error::StoreError;

/// The two system settings this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// `accelerometer_rotation`: 1 when the OS auto-rotates, 0 when locked.
    AccelerometerRotation,
    /// `user_rotation`: the locked rotation index (0..=3).
    UserRotation,
}

impl SettingKey {
    /// The platform name of the setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccelerometerRotation => "accelerometer_rotation",
            Self::UserRotation => "user_rotation",
        }
    }

    /// Value assumed when the store has no entry for this key.
    pub fn default_value(self) -> i32 {
        match self {
            Self::AccelerometerRotation => 1,
            Self::UserRotation => 0,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistent integer key-value store holding the OS rotation settings.
///
/// Reads and writes are atomic per key but not transactional across keys.
/// Implementations may be called from sensor callback threads.
pub trait SettingsStore: Send + Sync {
    /// Read a setting, or `None` if it has never been set.
    fn get_int(&self, key: SettingKey) -> Result<Option<i32>, StoreError>;

    /// Write a setting.
    fn put_int(&self, key: SettingKey, value: i32) -> Result<(), StoreError>;

    /// Read a setting, falling back to [`SettingKey::default_value`].
    fn get_int_or_default(&self, key: SettingKey) -> Result<i32, StoreError> {
        Ok(self.get_int(key)?.unwrap_or_else(|| key.default_value()))
    }
}
