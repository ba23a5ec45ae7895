#![warn(clippy::all, clippy::nursery, clippy::pedantic)]

//! Enumerates the displays attached to the local desktop: their resolution,
//! position and identifier, for use as screen capture sources.
//!
//! Windows is queried through GDI, Linux through X11 RandR. Anywhere a
//! desktop is missing or headless the list of screens is simply empty.

pub mod config;
mod device;
pub mod environment;
pub mod error;
pub mod geometry;
mod sys;

pub use device::available_screen_devices_in;
pub use device::best_screen_device;
pub use device::default_screen_device_in;
pub use device::screen_devices;
pub use device::ScreenDevice;
pub use device::ScreenSnapshot;
pub use sys::LocalEnvironment;
pub use sys::LocalScreen;

use config::Config;

/// Opens the local graphics environment, or `None` if the windowing
/// subsystem is not available.
pub fn local_environment(config: &Config) -> Option<LocalEnvironment> {
    LocalEnvironment::open(config)
}

/// All screens of the local desktop, configured from the environment.
pub fn available_screen_devices() -> Vec<ScreenDevice<LocalScreen>> {
    available_screen_devices_in(local_environment(&Config::from_env()).as_ref())
}

/// Same as [`available_screen_devices`], but a failing device query is
/// returned instead of being logged.
pub fn try_available_screen_devices() -> Result<Vec<ScreenDevice<LocalScreen>>, error::Error> {
    Ok(screen_devices(local_environment(&Config::from_env()).as_ref())?.collect())
}

/// The largest screen of the local desktop, see [`best_screen_device`].
pub fn default_screen_device() -> Option<ScreenDevice<LocalScreen>> {
    best_screen_device(available_screen_devices())
}
