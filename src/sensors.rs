//! Sensor samples and the subscription interface.
//!
//! Both sensors deliver an unbounded stream of samples to registered
//! listeners, possibly on different platform threads. A [`Subscription`]
//! unregisters its listener when cancelled or dropped, but a platform may
//! still deliver a sample or two after that.

use std::fmt;
use std::sync::Arc;

use crate::error::SensorError;

/// Callback receiving sensor samples.
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Accelerometer-style tilt sensor.
pub type TiltSensor = dyn Sensor<TiltSample>;

/// Coarse device-rotation sensor.
pub type OrientationSensor = dyn Sensor<OrientationSample>;

/// A source of samples that listeners can subscribe to.
pub trait Sensor<T>: Send + Sync {
    /// Short sensor name for logs and errors.
    fn name(&self) -> &'static str;

    /// Register `listener` for every future sample.
    ///
    /// # Errors
    /// [`SensorError::Unavailable`] if the device lacks this sensor,
    /// [`SensorError::Registration`] if registration failed.
    fn subscribe(&self, listener: Listener<T>) -> Result<Subscription, SensorError>;
}

/// Handle for a registered listener. Unregisters on [`cancel`](Self::cancel)
/// or drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the action that unregisters a listener.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregister the listener now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// =============================================================================
// Samples
// =============================================================================

/// A 3-axis acceleration sample in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltSample {
    /// Acceleration along the device x axis.
    pub x: f32,
    /// Acceleration along the device y axis.
    pub y: f32,
    /// Acceleration along the device z axis (out of the screen).
    pub z: f32,
}

impl TiltSample {
    /// Create a sample from its components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Angle between the screen plane and gravity in degrees (0 = flat,
    /// 90 = upright).
    ///
    /// Returns `None` for a zero-magnitude or non-finite reading.
    pub fn inclination_deg(&self) -> Option<f32> {
        let planar = (self.x * self.x + self.y * self.y).sqrt();
        let magnitude = (planar * planar + self.z * self.z).sqrt();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return None;
        }
        // Elevation of gravity above the screen plane is |atan2(z, planar)|;
        // the inclination is its complement so that flat reads as 0.
        let elevation = self.z.atan2(planar).abs().to_degrees().min(90.0);
        Some(90.0 - elevation)
    }
}

/// A coarse orientation reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSample {
    /// Heading in degrees, 0..=359.
    Degrees(u16),
    /// The platform could not determine an orientation.
    Unknown,
}

impl OrientationSample {
    /// Platform sentinel for an unknown orientation.
    pub const UNKNOWN_RAW: i32 = -1;

    /// Convert a raw platform value. Anything outside 0..=359 is unknown.
    pub fn from_raw(raw: i32) -> Self {
        match u16::try_from(raw) {
            Ok(degrees) if degrees < 360 => Self::Degrees(degrees),
            _ => Self::Unknown,
        }
    }
}
