//! Screen-rotation axis lock for mobile devices.
//!
//! The OS exposes an auto-rotate switch and a raw `user_rotation` index. This
//! crate adds portrait and landscape locks on top of them: once auto-rotate is
//! off, an [`AxisLockController`] follows the device through the tilt and
//! coarse orientation sensors and keeps `user_rotation` on the requested axis,
//! flipping between the two opposite orientations of that axis.
//!
//! Platform services are injected as traits: [`SettingsStore`] for the system
//! settings, [`Sensor`] for both sensor streams, and [`Platform`] for the
//! write-settings permission.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rotalock_core::{ManualSensor, MemorySettingsStore, MockPlatform, ModeManager};
//! use rotalock_core::{OrientationSample, RotationMode, SettingKey, TiltSample};
//!
//! let store = Arc::new(MemorySettingsStore::new());
//! let tilt = Arc::new(ManualSensor::<TiltSample>::new("tilt"));
//! let orientation = Arc::new(ManualSensor::<OrientationSample>::new("orientation"));
//! let manager = ModeManager::new(
//!     store.clone(),
//!     Arc::new(MockPlatform::new()),
//!     tilt.clone(),
//!     orientation.clone(),
//! );
//!
//! // Lock to landscape, then hold the device upright and turn it to 90°.
//! manager.set_mode(RotationMode::Landscape)?;
//! tilt.emit(TiltSample::new(9.81, 0.0, 0.0));
//! for _ in 0..3 {
//!     orientation.emit(OrientationSample::Degrees(90));
//! }
//!
//! assert_eq!(store.get(SettingKey::UserRotation), Some(3));
//! assert_eq!(manager.get_mode()?, RotationMode::Landscape);
//! # Ok::<(), rotalock_core::RotationError>(())
//! ```
//!
//! # Script bindings
//!
//! [`RotationModule`] wraps a [`ModeManager`] (or the [`UnsupportedPlatform`]
//! stub) and reports failures as [`CodedError`]s carrying an `E_<CODE>` field.
//!
//! # Testing
//!
//! The [`MemorySettingsStore`], [`ManualSensor`] and [`MockPlatform`] fakes
//! stand in for the device.

#![warn(missing_docs)]

mod bridge;
mod config;
mod controller;
mod error;
mod manager;
mod mock;
mod modes;
mod platform;
mod sensors;
mod settings;
mod state;

// Re-export public API
pub use bridge::{RotationControl, RotationModule, UnsupportedPlatform};
pub use config::TrackingConfig;
pub use controller::AxisLockController;
pub use error::{CodedError, ErrorCode, PlatformError, RotationError, SensorError, StoreError};
pub use manager::ModeManager;
pub use mock::{ManualSensor, MemorySettingsStore, MockPlatform};
pub use modes::{LockAxis, RotationBucket, RotationMode, UserRotation};
pub use platform::Platform;
pub use sensors::{
    Listener, OrientationSample, OrientationSensor, Sensor, Subscription, TiltSample, TiltSensor,
};
pub use settings::{SettingKey, SettingsStore};
pub use state::ControllerState;
