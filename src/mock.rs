//! In-memory fakes for testing.

use crate::error::{PlatformError, SensorError, StoreError};
use crate::platform::Platform;
use crate::sensors::{Listener, Sensor, Subscription};
use crate::settings::{SettingKey, SettingsStore};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// Settings Store
// =============================================================================

#[derive(Debug, Default)]
struct StoreInner {
    values: HashMap<SettingKey, i32>,
    writes: Vec<(SettingKey, i32)>,
    attempted_writes: usize,
}

/// A settings store backed by a map that records every successful write.
///
/// # Example
///
/// ```
/// use rotalock_core::{MemorySettingsStore, SettingKey, SettingsStore};
///
/// let store = MemorySettingsStore::new();
/// store.put_int(SettingKey::UserRotation, 2).unwrap();
/// assert_eq!(store.get(SettingKey::UserRotation), Some(2));
/// assert_eq!(store.writes(), vec![(SettingKey::UserRotation, 2)]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<StoreInner>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`. Seeding is not recorded as writes.
    pub fn with_values(values: &[(SettingKey, i32)]) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().values.extend(values.iter().copied());
        store
    }

    /// Current value of `key`, bypassing failure injection.
    pub fn get(&self, key: SettingKey) -> Option<i32> {
        self.inner.lock().unwrap().values.get(&key).copied()
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<(SettingKey, i32)> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Successful writes to `key`, in order.
    pub fn writes_to(&self, key: SettingKey) -> Vec<i32> {
        self.writes()
            .into_iter()
            .filter_map(|(k, v)| (k == key).then_some(v))
            .collect()
    }

    /// Number of `put_int` calls, including failed ones.
    pub fn attempted_writes(&self) -> usize {
        self.inner.lock().unwrap().attempted_writes
    }

    /// Forget the recorded write history.
    pub fn clear_writes(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.writes.clear();
        inner.attempted_writes = 0;
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_int(&self, key: SettingKey) -> Result<Option<i32>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read {
                key,
                reason: "injected read failure".into(),
            });
        }
        Ok(self.get(key))
    }

    fn put_int(&self, key: SettingKey, value: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempted_writes += 1;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                key,
                value,
                reason: "injected write failure".into(),
            });
        }
        inner.values.insert(key, value);
        inner.writes.push((key, value));
        Ok(())
    }
}

// =============================================================================
// Sensors
// =============================================================================

struct SensorInner<T> {
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
    failure: Option<SensorError>,
}

/// A sensor whose samples are pushed by hand.
///
/// [`emit`](Self::emit) calls every subscribed listener synchronously on the
/// calling thread.
pub struct ManualSensor<T> {
    name: &'static str,
    inner: Arc<Mutex<SensorInner<T>>>,
}

impl<T: Clone + 'static> ManualSensor<T> {
    /// Create a sensor that accepts subscriptions.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(SensorInner {
                listeners: Vec::new(),
                next_id: 0,
                failure: None,
            })),
        }
    }

    /// Make subsequent `subscribe` calls fail with `failure`, or succeed again with `None`.
    pub fn set_failure(&self, failure: Option<SensorError>) {
        self.inner.lock().unwrap().failure = failure;
    }

    /// Deliver `sample` to every current subscriber.
    pub fn emit(&self, sample: T) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .lock()
            .unwrap()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(sample.clone());
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }
}

impl<T: 'static> Sensor<T> for ManualSensor<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn subscribe(&self, listener: Listener<T>) -> Result<Subscription, SensorError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(failure) = &inner.failure {
            return Err(failure.clone());
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));

        let registry = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            registry.lock().unwrap().listeners.retain(|(i, _)| *i != id);
        }))
    }
}

// =============================================================================
// Platform
// =============================================================================

/// A platform with a switchable write-settings grant.
#[derive(Debug)]
pub struct MockPlatform {
    granted: AtomicBool,
    failing: AtomicBool,
    requests: AtomicUsize,
    package: String,
}

impl MockPlatform {
    /// A platform where write access is already granted.
    pub fn new() -> Self {
        Self {
            granted: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            package: "com.example.rotalock".to_string(),
        }
    }

    /// A platform where write access has not been granted.
    pub fn denied() -> Self {
        let platform = Self::new();
        platform.set_granted(false);
        platform
    }

    /// Grant or revoke write access.
    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Make every platform call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many permission requests were dispatched successfully.
    pub fn permission_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &'static str) -> Result<(), PlatformError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlatformError::new(operation, "injected platform failure"));
        }
        Ok(())
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn can_write_settings(&self) -> Result<bool, PlatformError> {
        self.check("canWrite")?;
        Ok(self.granted.load(Ordering::SeqCst))
    }

    fn request_write_settings(&self) -> Result<(), PlatformError> {
        self.check("requestWritePermission")?;
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn package_name(&self) -> Result<String, PlatformError> {
        self.check("getPackageName")?;
        Ok(self.package.clone())
    }
}
