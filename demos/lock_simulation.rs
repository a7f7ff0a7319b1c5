//! Example: lock to landscape and turn a simulated device around.
//!
//! Run with: `RUST_LOG=debug cargo run --example lock_simulation`

use std::sync::Arc;

use rotalock_core::{
    ManualSensor, MemorySettingsStore, MockPlatform, ModeManager, OrientationSample,
    RotationError, RotationMode, SettingKey, TiltSample,
};

fn main() -> Result<(), RotationError> {
    // Initialize logging (optional)
    env_logger::init();

    let store = Arc::new(MemorySettingsStore::new());
    let tilt = Arc::new(ManualSensor::<TiltSample>::new("tilt"));
    let orientation = Arc::new(ManualSensor::<OrientationSample>::new("orientation"));
    let manager = ModeManager::new(
        store.clone(),
        Arc::new(MockPlatform::new()),
        tilt.clone(),
        orientation.clone(),
    );

    println!("Initial mode: {}", manager.get_mode()?);
    manager.set_mode(RotationMode::Landscape)?;

    // (label, accelerometer x/y/z, heading in degrees)
    let poses = [
        ("upright, turned right", (9.81, 0.0, 0.3), 90),
        ("upright, turned left", (-9.81, 0.0, 0.3), 270),
        ("lying on the table", (0.1, 0.2, 9.8), 180),
        ("upside down", (0.0, -9.81, 0.3), 180),
    ];

    for (label, (x, y, z), degrees) in poses {
        tilt.emit(TiltSample::new(x, y, z));
        for _ in 0..3 {
            orientation.emit(OrientationSample::Degrees(degrees));
        }
        println!(
            "{:<24} user_rotation={:?}",
            label,
            store.get(SettingKey::UserRotation)
        );
    }

    manager.set_mode(RotationMode::Autorotate)?;
    println!("Final mode: {}", manager.get_mode()?);
    println!("Settings writes: {:?}", store.writes());

    Ok(())
}
