//! Rotation mode management.

use crate::controller::AxisLockController;
use crate::error::RotationError;
use crate::modes::RotationMode;
use crate::platform::Platform;
use crate::sensors::{OrientationSensor, TiltSensor};
use crate::settings::{SettingKey, SettingsStore};

use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};

/// Applies requested rotation modes to the system settings.
///
/// Auto-rotate hands control back to the OS. Portrait and landscape switch
/// the OS rotation off and run an [`AxisLockController`] that keeps the
/// display on the requested axis.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rotalock_core::{ManualSensor, MemorySettingsStore, MockPlatform, ModeManager};
/// use rotalock_core::{OrientationSample, RotationMode, TiltSample};
///
/// let manager = ModeManager::new(
///     Arc::new(MemorySettingsStore::new()),
///     Arc::new(MockPlatform::new()),
///     Arc::new(ManualSensor::<TiltSample>::new("tilt")),
///     Arc::new(ManualSensor::<OrientationSample>::new("orientation")),
/// );
///
/// manager.set_mode(RotationMode::Landscape)?;
/// assert_eq!(manager.get_mode()?, RotationMode::Portrait); // user_rotation still 0
/// manager.set_mode(RotationMode::Autorotate)?;
/// assert_eq!(manager.get_mode()?, RotationMode::Autorotate);
/// # Ok::<(), rotalock_core::RotationError>(())
/// ```
pub struct ModeManager {
    store: Arc<dyn SettingsStore>,
    platform: Arc<dyn Platform>,
    controller: AxisLockController,
    requested: Mutex<RotationMode>,
}

impl ModeManager {
    /// Create a manager with a default-configured controller over `tilt` and `orientation`.
    pub fn new(
        store: Arc<dyn SettingsStore>,
        platform: Arc<dyn Platform>,
        tilt: Arc<TiltSensor>,
        orientation: Arc<OrientationSensor>,
    ) -> Self {
        let controller = AxisLockController::new(Arc::clone(&store), tilt, orientation);
        Self::with_controller(store, platform, controller)
    }

    /// Create a manager around an existing controller.
    ///
    /// The controller should write to the same `store`.
    pub fn with_controller(
        store: Arc<dyn SettingsStore>,
        platform: Arc<dyn Platform>,
        controller: AxisLockController,
    ) -> Self {
        Self {
            store,
            platform,
            controller,
            requested: Mutex::new(RotationMode::Autorotate),
        }
    }

    /// The controller driven by this manager.
    pub fn controller(&self) -> &AxisLockController {
        &self.controller
    }

    /// The mode most recently applied through [`set_mode`](Self::set_mode).
    pub fn requested_mode(&self) -> RotationMode {
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_requested(&self, mode: RotationMode) {
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Whether system settings may be written.
    ///
    /// # Errors
    /// [`RotationError::Platform`] if the platform check itself fails.
    pub fn get_permission_status(&self) -> Result<bool, RotationError> {
        Ok(self.platform.can_write_settings()?)
    }

    /// Ask the OS to grant write access. Failures are logged, not returned.
    pub fn request_permission(&self) {
        match self.platform.request_write_settings() {
            Ok(()) => info!("requested WRITE_SETTINGS permission"),
            Err(e) => warn!("requestWritePermission error: {}", e),
        }
    }

    /// The host package name, or an empty string if it cannot be determined.
    pub fn package_name(&self) -> String {
        self.platform.package_name().unwrap_or_else(|e| {
            error!("getPackageName error: {}", e);
            String::new()
        })
    }

    /// Read the effective rotation mode from the settings store.
    ///
    /// # Errors
    /// [`RotationError::Store`] if a setting cannot be read.
    pub fn get_mode(&self) -> Result<RotationMode, RotationError> {
        let auto = self.store.get_int_or_default(SettingKey::AccelerometerRotation)?;
        if auto != 0 {
            return Ok(RotationMode::Autorotate);
        }
        let rotation = self.store.get_int_or_default(SettingKey::UserRotation)?;
        Ok(RotationMode::from_settings(auto, rotation))
    }

    /// Apply `mode`.
    ///
    /// Steps are not rolled back: if the store write succeeds but the
    /// controller fails to start, the OS stays locked without tracking.
    ///
    /// # Errors
    /// - [`RotationError::PermissionDenied`] if write access is not granted
    /// - [`RotationError::Store`] if the auto-rotate flag cannot be written
    /// - [`RotationError::Sensor`] if the controller cannot subscribe
    pub fn set_mode(&self, mode: RotationMode) -> Result<(), RotationError> {
        if !self.platform.can_write_settings()? {
            return Err(RotationError::PermissionDenied);
        }

        match mode.lock_axis() {
            None => {
                self.store.put_int(SettingKey::AccelerometerRotation, 1)?;
                self.controller.stop();
            }
            Some(axis) => {
                self.store.put_int(SettingKey::AccelerometerRotation, 0)?;
                self.controller.start(axis)?;
            }
        }

        self.set_requested(mode);
        info!("rotation mode set to {}", mode);
        Ok(())
    }

    /// Parse `name` and apply it.
    ///
    /// # Errors
    /// [`RotationError::InvalidState`] for anything other than `AUTOROTATE`,
    /// `PORTRAIT` or `LANDSCAPE`, before any permission check or store write.
    /// Otherwise as [`set_mode`](Self::set_mode).
    pub fn set_mode_named(&self, name: &str) -> Result<(), RotationError> {
        let mode = name.parse::<RotationMode>()?;
        self.set_mode(mode)
    }

    /// Stop the controller and reset the requested mode. Settings are left as they are.
    pub fn stop(&self) {
        self.controller.stop();
        self.set_requested(RotationMode::Autorotate);
        debug!("mode manager stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ManualSensor, MemorySettingsStore, MockPlatform};
    use crate::sensors::{OrientationSample, TiltSample};

    struct Rig {
        store: Arc<MemorySettingsStore>,
        platform: Arc<MockPlatform>,
        tilt: Arc<ManualSensor<TiltSample>>,
        orientation: Arc<ManualSensor<OrientationSample>>,
        manager: ModeManager,
    }

    fn rig_with(store: MemorySettingsStore, platform: MockPlatform) -> Rig {
        let store = Arc::new(store);
        let platform = Arc::new(platform);
        let tilt = Arc::new(ManualSensor::<TiltSample>::new("tilt"));
        let orientation = Arc::new(ManualSensor::<OrientationSample>::new("orientation"));
        let manager = ModeManager::new(
            store.clone(),
            platform.clone(),
            tilt.clone(),
            orientation.clone(),
        );
        Rig {
            store,
            platform,
            tilt,
            orientation,
            manager,
        }
    }

    fn rig() -> Rig {
        rig_with(MemorySettingsStore::new(), MockPlatform::new())
    }

    #[test]
    fn test_get_mode_defaults_to_autorotate() {
        let rig = rig();
        assert_eq!(rig.manager.get_mode().unwrap(), RotationMode::Autorotate);
    }

    #[test]
    fn test_get_mode_from_store() {
        for (rotation, expected) in [
            (0, RotationMode::Portrait),
            (1, RotationMode::Landscape),
            (2, RotationMode::Portrait),
            (3, RotationMode::Landscape),
        ] {
            let rig = rig_with(
                MemorySettingsStore::with_values(&[
                    (SettingKey::AccelerometerRotation, 0),
                    (SettingKey::UserRotation, rotation),
                ]),
                MockPlatform::new(),
            );
            assert_eq!(rig.manager.get_mode().unwrap(), expected, "user_rotation={rotation}");
        }
    }

    #[test]
    fn test_get_mode_read_failure() {
        let rig = rig();
        rig.store.fail_reads(true);
        assert!(matches!(rig.manager.get_mode(), Err(RotationError::Store(_))));
    }

    #[test]
    fn test_set_portrait_starts_controller() {
        let rig = rig();
        rig.manager.set_mode(RotationMode::Portrait).unwrap();

        assert_eq!(rig.store.get(SettingKey::AccelerometerRotation), Some(0));
        assert!(rig.manager.controller().is_running());
        assert_eq!(rig.orientation.subscriber_count(), 1);
        assert_eq!(rig.manager.requested_mode(), RotationMode::Portrait);
    }

    #[test]
    fn test_landscape_round_trip_through_sensors() {
        let rig = rig();
        rig.manager.set_mode(RotationMode::Landscape).unwrap();
        rig.tilt.emit(TiltSample::new(9.81, 0.0, 0.0));
        for _ in 0..3 {
            rig.orientation.emit(OrientationSample::Degrees(270));
        }

        assert_eq!(rig.store.get(SettingKey::UserRotation), Some(1));
        assert_eq!(rig.manager.get_mode().unwrap(), RotationMode::Landscape);
    }

    #[test]
    fn test_autorotate_stops_controller() {
        let rig = rig_with(
            MemorySettingsStore::with_values(&[(SettingKey::UserRotation, 3)]),
            MockPlatform::new(),
        );
        rig.manager.set_mode(RotationMode::Portrait).unwrap();
        rig.manager.set_mode(RotationMode::Autorotate).unwrap();

        assert_eq!(rig.store.get(SettingKey::AccelerometerRotation), Some(1));
        assert!(!rig.manager.controller().is_running());
        assert_eq!(rig.tilt.subscriber_count(), 0);
        assert_eq!(rig.manager.get_mode().unwrap(), RotationMode::Autorotate);
    }

    #[test]
    fn test_permission_denied() {
        let rig = rig_with(MemorySettingsStore::new(), MockPlatform::denied());
        assert!(!rig.manager.get_permission_status().unwrap());

        let err = rig.manager.set_mode(RotationMode::Portrait).unwrap_err();
        assert_eq!(err, RotationError::PermissionDenied);
        assert!(rig.store.writes().is_empty());
        assert!(!rig.manager.controller().is_running());
    }

    #[test]
    fn test_invalid_name_writes_nothing() {
        let rig = rig_with(MemorySettingsStore::new(), MockPlatform::denied());
        let err = rig.manager.set_mode_named("SIDEWAYS").unwrap_err();
        assert_eq!(err, RotationError::InvalidState("SIDEWAYS".into()));
        assert!(rig.store.writes().is_empty());
        assert_eq!(rig.store.attempted_writes(), 0);
    }

    #[test]
    fn test_partial_application_is_kept() {
        let rig = rig();
        rig.orientation.set_failure(Some(crate::SensorError::Registration {
            sensor: "orientation",
            reason: "busy".into(),
        }));

        let err = rig.manager.set_mode(RotationMode::Portrait).unwrap_err();
        assert!(matches!(err, RotationError::Sensor(_)));
        assert_eq!(rig.store.get(SettingKey::AccelerometerRotation), Some(0));
        assert_eq!(rig.manager.requested_mode(), RotationMode::Autorotate);
    }

    #[test]
    fn test_store_write_failure() {
        let rig = rig();
        rig.store.fail_writes(true);
        let err = rig.manager.set_mode(RotationMode::Landscape).unwrap_err();
        assert!(matches!(err, RotationError::Store(_)));
        assert!(!rig.manager.controller().is_running());
    }

    #[test]
    fn test_request_permission_swallows_errors() {
        let rig = rig();
        rig.manager.request_permission();
        assert_eq!(rig.platform.permission_requests(), 1);

        rig.platform.set_failing(true);
        rig.manager.request_permission();
        assert_eq!(rig.platform.permission_requests(), 1);
    }

    #[test]
    fn test_package_name() {
        let rig = rig();
        assert_eq!(rig.manager.package_name(), "com.example.rotalock");
        rig.platform.set_failing(true);
        assert_eq!(rig.manager.package_name(), "");
    }

    #[test]
    fn test_stop_resets_requested_mode() {
        let rig = rig();
        rig.manager.set_mode(RotationMode::Landscape).unwrap();
        let writes = rig.store.writes().len();

        rig.manager.stop();
        assert_eq!(rig.manager.requested_mode(), RotationMode::Autorotate);
        assert!(!rig.manager.controller().is_running());
        assert_eq!(rig.store.writes().len(), writes);
    }
}
