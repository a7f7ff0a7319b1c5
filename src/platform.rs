//! Host platform hooks used by [`ModeManager`](crate::ModeManager).

use crate::error::PlatformError;

/// Platform services around the settings store.
///
/// On API levels without a write-settings restriction, `can_write_settings`
/// should return `Ok(true)` unconditionally.
pub trait Platform: Send + Sync {
    /// Whether the app may currently write system settings.
    fn can_write_settings(&self) -> Result<bool, PlatformError>;

    /// Ask the OS to show the grant flow for writing system settings.
    ///
    /// Returns once the request has been dispatched; the grant itself is
    /// observed later through [`can_write_settings`](Self::can_write_settings).
    fn request_write_settings(&self) -> Result<(), PlatformError>;

    /// The host application's package name.
    fn package_name(&self) -> Result<String, PlatformError>;
}
