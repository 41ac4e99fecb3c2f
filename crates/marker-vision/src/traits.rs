use crate::{Detection, Result};

/// A marker-decoding position sensor.
///
/// `poll` captures one frame and returns every marker decoded from it,
/// possibly none. Each call is non-blocking from the engine's perspective;
/// callers drive it in their own polling loop. Dropping the sensor releases
/// the underlying capture device.
pub trait PositionSensor {
    /// Open a capture source by device index or path string.
    fn open(spec: &str) -> Result<Self>
    where
        Self: Sized;

    /// Capture one frame and decode marker candidates from it.
    fn poll(&mut self) -> Result<Vec<Detection>>;
}
