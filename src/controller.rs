//! Axis-lock controller.
//!
//! Fuses the tilt and coarse orientation streams into writes of the
//! `user_rotation` setting while a portrait or landscape lock is active.

use crate::config::TrackingConfig;
use crate::error::{RotationError, SensorError};
use crate::modes::{LockAxis, RotationBucket, UserRotation};
use crate::sensors::{
    OrientationSample, OrientationSensor, Sensor, Subscription, TiltSample, TiltSensor,
};
use crate::settings::{SettingKey, SettingsStore};
use crate::state::ControllerState;

use log::{debug, error, info, trace, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// =============================================================================
// Tracking State
// =============================================================================

/// Consecutive-reading filter over rotation buckets.
#[derive(Debug, Default)]
struct Debounce {
    candidate: Option<RotationBucket>,
    count: u32,
}

impl Debounce {
    /// Record a reading and return how many times in a row it has been seen.
    fn observe(&mut self, bucket: RotationBucket) -> u32 {
        if self.candidate == Some(bucket) {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = Some(bucket);
            self.count = 1;
        }
        self.count
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
struct Tracking {
    active: bool,
    axis: LockAxis,
    inclination_deg: f32,
    debounce: Debounce,
    last_written: Option<UserRotation>,
}

/// State shared by both sensor callbacks of one session.
///
/// Every callback takes the same lock for its whole read-modify-write, and
/// checks `active` first so deliveries that race with `stop` are dropped.
struct Tracker {
    store: Arc<dyn SettingsStore>,
    config: TrackingConfig,
    state: Mutex<Tracking>,
}

impl Tracker {
    fn new(axis: LockAxis, store: Arc<dyn SettingsStore>, config: TrackingConfig) -> Self {
        Self {
            store,
            config,
            state: Mutex::new(Tracking {
                active: true,
                axis,
                inclination_deg: 0.0,
                debounce: Debounce::default(),
                last_written: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracking> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_tilt(&self, sample: TiltSample) {
        let Some(inclination) = sample.inclination_deg() else {
            trace!("ignoring degenerate tilt sample {:?}", sample);
            return;
        };

        let mut state = self.lock();
        if !state.active {
            return;
        }
        state.inclination_deg = inclination;
    }

    fn on_orientation(&self, sample: OrientationSample) {
        let OrientationSample::Degrees(degrees) = sample else {
            return;
        };
        let bucket = RotationBucket::from_degrees(degrees);

        let mut state = self.lock();
        if !state.active {
            trace!("dropping orientation {}° delivered after stop", degrees);
            return;
        }

        if state.inclination_deg < self.config.flat_threshold_deg {
            trace!(
                "device flat ({:.1}°), ignoring orientation {}°",
                state.inclination_deg, degrees
            );
            state.debounce.reset();
            return;
        }

        let seen = state.debounce.observe(bucket);
        trace!("orientation {}° -> {:?} (seen {})", degrees, bucket, seen);
        if seen < self.config.debounce_samples {
            return;
        }

        let target = state.axis.target_rotation(bucket);
        if state.last_written == Some(target) {
            return;
        }

        match self.store.put_int(SettingKey::UserRotation, target.value()) {
            Ok(()) => {
                debug!(
                    "{} lock: {:?} stable, wrote user_rotation={}",
                    state.axis,
                    bucket,
                    target.value()
                );
                state.last_written = Some(target);
            }
            Err(e) => error!("orientation listener write error: {}", e),
        }
    }

    /// Switch the held axis. Returns `false` if it was already `axis`.
    fn retarget(&self, axis: LockAxis) -> bool {
        let mut state = self.lock();
        if state.axis == axis {
            return false;
        }
        state.axis = axis;
        state.last_written = None;
        true
    }

    fn deactivate(&self) {
        self.lock().active = false;
    }

    fn snapshot(&self) -> ControllerState {
        let state = self.lock();
        ControllerState {
            axis: state.axis,
            inclination_deg: state.inclination_deg,
            last_candidate: state.debounce.candidate,
            stable_count: state.debounce.count,
            last_written: state.last_written,
        }
    }
}

/// A running controller: its tracker plus the live sensor registrations.
struct Session {
    tracker: Arc<Tracker>,
    _tilt: Subscription,
    _orientation: Subscription,
}

fn subscribe<T: 'static>(
    sensor: &dyn Sensor<T>,
    tracker: &Arc<Tracker>,
    handler: fn(&Tracker, T),
) -> Result<Subscription, SensorError> {
    let tracker = Arc::clone(tracker);
    sensor.subscribe(Arc::new(move |sample| handler(&tracker, sample)))
}

// =============================================================================
// AxisLockController
// =============================================================================

/// Keeps the display on a portrait or landscape axis by writing
/// `user_rotation` as the device turns.
///
/// While running, each coarse orientation reading is bucketed into a quadrant.
/// Readings taken while the device lies flat are discarded, and a quadrant
/// must be seen [`TrackingConfig::debounce_samples`] times in a row before it
/// is projected onto the lock axis. The setting is only written when the
/// projected value changes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rotalock_core::{AxisLockController, LockAxis, ManualSensor, MemorySettingsStore};
/// use rotalock_core::{OrientationSample, SettingKey, TiltSample};
///
/// let store = Arc::new(MemorySettingsStore::new());
/// let tilt = Arc::new(ManualSensor::<TiltSample>::new("tilt"));
/// let orientation = Arc::new(ManualSensor::<OrientationSample>::new("orientation"));
/// let controller = AxisLockController::new(store.clone(), tilt.clone(), orientation.clone());
///
/// controller.start(LockAxis::Portrait)?;
/// tilt.emit(TiltSample::new(0.0, 9.81, 0.0));
/// for _ in 0..3 {
///     orientation.emit(OrientationSample::Degrees(180));
/// }
/// assert_eq!(store.get(SettingKey::UserRotation), Some(2));
/// # Ok::<(), rotalock_core::RotationError>(())
/// ```
pub struct AxisLockController {
    store: Arc<dyn SettingsStore>,
    tilt: Arc<TiltSensor>,
    orientation: Arc<OrientationSensor>,
    config: TrackingConfig,
    session: Mutex<Option<Session>>,
}

impl AxisLockController {
    /// Create an idle controller with the default [`TrackingConfig`].
    pub fn new(
        store: Arc<dyn SettingsStore>,
        tilt: Arc<TiltSensor>,
        orientation: Arc<OrientationSensor>,
    ) -> Self {
        Self {
            store,
            tilt,
            orientation,
            config: TrackingConfig::default(),
            session: Mutex::new(None),
        }
    }

    /// Use `config` for sessions started after this call.
    pub fn with_config(mut self, config: TrackingConfig) -> Self {
        self.config = config;
        self
    }

    /// The tracking parameters in use.
    pub fn config(&self) -> TrackingConfig {
        self.config
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether sensor subscriptions are live.
    pub fn is_running(&self) -> bool {
        self.session().is_some()
    }

    /// Snapshot of the tracking state, or `None` when not running.
    pub fn snapshot(&self) -> Option<ControllerState> {
        self.session().as_ref().map(|s| s.tracker.snapshot())
    }

    /// Start holding `axis`.
    ///
    /// Starting on the axis already held is a no-op. Starting on the other
    /// axis while running switches axis in place and forgets the last written
    /// value so the new axis is applied on the next stable reading.
    ///
    /// If either sensor is missing on this device the controller stays idle
    /// and `Ok` is returned; the OS keeps whatever rotation it has.
    ///
    /// # Errors
    /// [`RotationError::Sensor`] if a sensor exists but cannot be registered.
    /// Any subscription made before the failure is released.
    pub fn start(&self, axis: LockAxis) -> Result<(), RotationError> {
        let mut session = self.session();
        if let Some(running) = session.as_ref() {
            if running.tracker.retarget(axis) {
                info!("axis lock switched to {}", axis);
            } else {
                debug!("axis lock already holding {}", axis);
            }
            return Ok(());
        }

        let tracker = Arc::new(Tracker::new(axis, Arc::clone(&self.store), self.config));
        let subscriptions = subscribe(&*self.tilt, &tracker, Tracker::on_tilt).and_then(|tilt| {
            let orientation = subscribe(&*self.orientation, &tracker, Tracker::on_orientation)?;
            Ok((tilt, orientation))
        });

        match subscriptions {
            Ok((tilt, orientation)) => {
                *session = Some(Session {
                    tracker,
                    _tilt: tilt,
                    _orientation: orientation,
                });
                info!(
                    "axis lock started on {} ({} + {})",
                    axis,
                    self.tilt.name(),
                    self.orientation.name()
                );
                Ok(())
            }
            Err(SensorError::Unavailable(sensor)) => {
                tracker.deactivate();
                warn!(
                    "{} sensor unavailable, {} lock will not follow the device",
                    sensor, axis
                );
                Ok(())
            }
            Err(e) => {
                tracker.deactivate();
                Err(e.into())
            }
        }
    }

    /// Stop tracking and drop all session state. Safe to call when idle.
    pub fn stop(&self) {
        let Some(session) = self.session().take() else {
            return;
        };
        session.tracker.deactivate();
        drop(session);
        info!("axis lock stopped");
    }
}

impl Drop for AxisLockController {
    fn drop(&mut self) {
        self.stop();
    }
}
