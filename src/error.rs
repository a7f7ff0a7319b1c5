//! Error types for rotation control.

use std::fmt;
use std::str::FromStr;

use crate::settings::SettingKey;

/// Errors raised by a [`SettingsStore`](crate::SettingsStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store refused to read a key.
    #[error("Failed to read {key}: {reason}")]
    Read {
        /// The setting being read.
        key: SettingKey,
        /// Platform-supplied reason.
        reason: String,
    },

    /// The store refused to write a key.
    #[error("Failed to write {key}={value}: {reason}")]
    Write {
        /// The setting being written.
        key: SettingKey,
        /// The value that was rejected.
        value: i32,
        /// Platform-supplied reason.
        reason: String,
    },
}

/// Errors raised when subscribing to a sensor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The device has no such sensor.
    #[error("{0} sensor not available")]
    Unavailable(&'static str),

    /// The sensor exists but registration failed.
    #[error("Failed to register {sensor} sensor: {reason}")]
    Registration {
        /// Sensor name.
        sensor: &'static str,
        /// Platform-supplied reason.
        reason: String,
    },
}

/// Errors raised by [`Platform`](crate::Platform) queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {reason}")]
pub struct PlatformError {
    /// The platform call that failed.
    pub operation: &'static str,
    /// Platform-supplied reason.
    pub reason: String,
}

impl PlatformError {
    /// Create a platform error for `operation`.
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while querying or changing the rotation mode.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RotationError {
    /// Write access to system settings has not been granted.
    #[error("WRITE_SETTINGS not granted")]
    PermissionDenied,

    /// The requested rotation state is not one of the known modes.
    #[error("Invalid rotation state: {0}")]
    InvalidState(String),

    /// A tracking parameter was outside its valid range.
    #[error("Invalid tracking config: {0}")]
    InvalidConfig(&'static str),

    /// The settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A sensor could not be registered.
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// A platform query failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

// =============================================================================
// Wire error codes
// =============================================================================

/// Error code carried across the scripting boundary as an `E_<CODE>:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `E_GET_ROTATION`
    GetRotation,
    /// `E_SET_ROTATION`
    SetRotation,
    /// `E_PERMISSION`
    Permission,
    /// `E_INVALID_STATE`
    InvalidState,
    /// A well-formed code this crate does not define.
    Other(String),
    /// The raw message carried no code token.
    Unspecified,
}

impl ErrorCode {
    /// The wire token, e.g. `E_PERMISSION`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::GetRotation => "E_GET_ROTATION",
            Self::SetRotation => "E_SET_ROTATION",
            Self::Permission => "E_PERMISSION",
            Self::InvalidState => "E_INVALID_STATE",
            Self::Other(code) => code,
            Self::Unspecified => "",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    /// Parses a full token such as `E_SET_ROTATION`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let body = token.strip_prefix("E_").ok_or(())?;
        let well_formed = !body.is_empty()
            && body
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
        if !well_formed {
            return Err(());
        }

        Ok(match token {
            "E_GET_ROTATION" => Self::GetRotation,
            "E_SET_ROTATION" => Self::SetRotation,
            "E_PERMISSION" => Self::Permission,
            "E_INVALID_STATE" => Self::InvalidState,
            other => Self::Other(other.to_string()),
        })
    }
}

/// A structured error as seen by script callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedError {
    /// Parsed error code.
    pub code: ErrorCode,
    /// Message with the code token stripped.
    pub message: String,
}

impl CodedError {
    /// Create a coded error from its parts.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Split a raw `E_<CODE>: message` string into code and message.
    ///
    /// Only the leading token is consumed; a nested prefix such as
    /// `E_SET_ROTATION: E_PERMISSION: ...` keeps `E_PERMISSION: ...` in the
    /// message. Strings without a valid token yield [`ErrorCode::Unspecified`]
    /// and the whole input as the message.
    pub fn parse(raw: &str) -> Self {
        if let Some((token, rest)) = raw.split_once(':') {
            if let Ok(code) = token.trim().parse::<ErrorCode>() {
                return Self::new(code, rest.trim());
            }
        }
        Self::new(ErrorCode::Unspecified, raw.trim())
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            ErrorCode::Unspecified => f.write_str(&self.message),
            ref code => write!(f, "{}: {}", code, self.message),
        }
    }
}

impl std::error::Error for CodedError {}
