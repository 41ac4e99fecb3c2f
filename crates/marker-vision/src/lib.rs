//! marker-vision: position sensing through visual waypoint markers
//!
//! The engine never touches a camera directly; it consumes the
//! [`PositionSensor`] trait, which reports decoded marker candidates per
//! poll. The default build enables a scripted `mock` backend so sessions
//! and tests run on any host without capture hardware.

mod types;
pub use types::{Detection, SensorConfig};

mod error;
pub use error::{Result, SensorError};

mod traits;
pub use traits::PositionSensor;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockSensor;

pub mod ranging;
