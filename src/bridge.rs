//! Script-facing rotation API.
//!
//! [`RotationModule`] exposes the five operations a scripting layer calls and
//! converts every failure into a [`CodedError`]. The work is done by a
//! [`RotationControl`] backend: a [`ModeManager`] on devices with native
//! rotation control, or [`UnsupportedPlatform`] everywhere else.

use crate::error::{CodedError, ErrorCode, RotationError};
use crate::manager::ModeManager;
use crate::modes::RotationMode;

use log::{debug, error};

// =============================================================================
// Rotation Control Trait
// =============================================================================

/// Backend operations behind [`RotationModule`].
pub trait RotationControl: Send + Sync {
    /// Whether system settings may be written.
    fn can_write(&self) -> Result<bool, RotationError>;

    /// Start the OS permission flow. Never fails from the caller's view.
    fn request_write_permission(&self);

    /// The host package name, empty if unknown.
    fn package_name(&self) -> String;

    /// The effective rotation mode.
    fn rotation_state(&self) -> Result<RotationMode, RotationError>;

    /// Apply a rotation mode.
    fn set_rotation_state(&self, mode: RotationMode) -> Result<(), RotationError>;
}

impl RotationControl for ModeManager {
    fn can_write(&self) -> Result<bool, RotationError> {
        self.get_permission_status()
    }

    fn request_write_permission(&self) {
        self.request_permission();
    }

    fn package_name(&self) -> String {
        ModeManager::package_name(self)
    }

    fn rotation_state(&self) -> Result<RotationMode, RotationError> {
        self.get_mode()
    }

    fn set_rotation_state(&self, mode: RotationMode) -> Result<(), RotationError> {
        self.set_mode(mode)
    }
}

/// Backend for targets without native rotation control.
///
/// Writing is always allowed, the permission request does nothing, the mode
/// is always auto-rotate, and setting a mode has no effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl RotationControl for UnsupportedPlatform {
    fn can_write(&self) -> Result<bool, RotationError> {
        Ok(true)
    }

    fn request_write_permission(&self) {}

    fn package_name(&self) -> String {
        String::new()
    }

    fn rotation_state(&self) -> Result<RotationMode, RotationError> {
        Ok(RotationMode::Autorotate)
    }

    fn set_rotation_state(&self, mode: RotationMode) -> Result<(), RotationError> {
        debug!("ignoring rotation state {} on unsupported platform", mode);
        Ok(())
    }
}

// =============================================================================
// Rotation Module
// =============================================================================

/// The script-facing module.
///
/// # Example
///
/// ```
/// use rotalock_core::{ErrorCode, RotationMode, RotationModule};
///
/// let module = RotationModule::unsupported();
/// assert_eq!(module.get_rotation_state().unwrap(), RotationMode::Autorotate);
///
/// let err = module.set_rotation_state("SIDEWAYS").unwrap_err();
/// assert_eq!(err.code, ErrorCode::InvalidState);
/// ```
pub struct RotationModule {
    control: Box<dyn RotationControl>,
}

impl RotationModule {
    /// Wrap any backend.
    pub fn new(control: impl RotationControl + 'static) -> Self {
        Self {
            control: Box::new(control),
        }
    }

    /// A module backed by a [`ModeManager`].
    pub fn native(manager: ModeManager) -> Self {
        Self::new(manager)
    }

    /// A module with the stub behaviour of [`UnsupportedPlatform`].
    pub fn unsupported() -> Self {
        Self::new(UnsupportedPlatform)
    }

    /// `canWrite`
    pub fn can_write(&self) -> Result<bool, CodedError> {
        self.control
            .can_write()
            .map_err(|e| reject("canWrite", ErrorCode::GetRotation, e))
    }

    /// `requestWritePermission`
    pub fn request_write_permission(&self) {
        self.control.request_write_permission();
    }

    /// `getPackageName`
    pub fn get_package_name(&self) -> String {
        self.control.package_name()
    }

    /// `getRotationState`
    pub fn get_rotation_state(&self) -> Result<RotationMode, CodedError> {
        self.control
            .rotation_state()
            .map_err(|e| reject("getRotationState", ErrorCode::GetRotation, e))
    }

    /// `setRotationState`
    ///
    /// Unknown names fail with `E_INVALID_STATE`, a missing grant with
    /// `E_PERMISSION`, and anything else with `E_SET_ROTATION`.
    pub fn set_rotation_state(&self, state: &str) -> Result<(), CodedError> {
        state
            .parse::<RotationMode>()
            .and_then(|mode| self.control.set_rotation_state(mode))
            .map_err(|e| {
                let code = match e {
                    RotationError::PermissionDenied => ErrorCode::Permission,
                    RotationError::InvalidState(_) => ErrorCode::InvalidState,
                    _ => ErrorCode::SetRotation,
                };
                reject("setRotationState", code, e)
            })
    }
}

fn reject(operation: &str, code: ErrorCode, err: RotationError) -> CodedError {
    error!("{} error: {}", operation, err);
    CodedError::new(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ManualSensor, MemorySettingsStore, MockPlatform};
    use crate::sensors::{OrientationSample, TiltSample};
    use crate::settings::SettingKey;
    use std::sync::Arc;

    fn native(store: Arc<MemorySettingsStore>, platform: Arc<MockPlatform>) -> RotationModule {
        RotationModule::native(ModeManager::new(
            store,
            platform,
            Arc::new(ManualSensor::<TiltSample>::new("tilt")),
            Arc::new(ManualSensor::<OrientationSample>::new("orientation")),
        ))
    }

    #[test]
    fn test_unsupported_stubs() {
        let module = RotationModule::unsupported();
        assert_eq!(module.can_write(), Ok(true));
        module.request_write_permission();
        assert_eq!(module.get_package_name(), "");
        assert_eq!(module.set_rotation_state("LANDSCAPE"), Ok(()));
        assert_eq!(module.get_rotation_state(), Ok(RotationMode::Autorotate));
    }

    #[test]
    fn test_native_round_trip() {
        let store = Arc::new(MemorySettingsStore::with_values(&[(SettingKey::UserRotation, 2)]));
        let module = native(store.clone(), Arc::new(MockPlatform::new()));

        module.set_rotation_state("PORTRAIT").unwrap();
        assert_eq!(module.get_rotation_state(), Ok(RotationMode::Portrait));

        module.set_rotation_state("AUTOROTATE").unwrap();
        assert_eq!(module.get_rotation_state(), Ok(RotationMode::Autorotate));
        assert_eq!(module.get_package_name(), "com.example.rotalock");
    }

    #[test]
    fn test_permission_code() {
        let module = native(
            Arc::new(MemorySettingsStore::new()),
            Arc::new(MockPlatform::denied()),
        );
        assert_eq!(module.can_write(), Ok(false));

        let err = module.set_rotation_state("PORTRAIT").unwrap_err();
        assert_eq!(err.code, ErrorCode::Permission);
        assert_eq!(err.message, "WRITE_SETTINGS not granted");
        assert_eq!(err.to_string(), "E_PERMISSION: WRITE_SETTINGS not granted");
    }

    #[test]
    fn test_invalid_state_code() {
        let store = Arc::new(MemorySettingsStore::new());
        let module = native(store.clone(), Arc::new(MockPlatform::new()));

        let err = module.set_rotation_state("SIDEWAYS").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(err.message, "Invalid rotation state: SIDEWAYS");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_store_failures_are_coded() {
        let store = Arc::new(MemorySettingsStore::new());
        let platform = Arc::new(MockPlatform::new());
        let module = native(store.clone(), platform.clone());

        store.fail_writes(true);
        let err = module.set_rotation_state("LANDSCAPE").unwrap_err();
        assert_eq!(err.code, ErrorCode::SetRotation);

        store.fail_reads(true);
        let err = module.get_rotation_state().unwrap_err();
        assert_eq!(err.code, ErrorCode::GetRotation);
        assert!(err.message.starts_with("Failed to read accelerometer_rotation"));

        platform.set_failing(true);
        let err = module.can_write().unwrap_err();
        assert_eq!(err.code, ErrorCode::GetRotation);
    }
}
