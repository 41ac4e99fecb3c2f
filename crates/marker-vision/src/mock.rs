use crate::{Detection, PositionSensor, Result};
use std::collections::VecDeque;
use time::OffsetDateTime;

/// Scripted in-process sensor. Each poll pops the next frame's worth of
/// detections; once the script runs out, polls report nothing.
pub struct MockSensor {
    spec: String,
    frames: VecDeque<Vec<Detection>>,
}

impl MockSensor {
    /// Queue a frame of detections to be returned by a future poll.
    pub fn push_frame<I>(&mut self, detections: I)
    where
        I: IntoIterator<Item = Detection>,
    {
        self.frames.push_back(detections.into_iter().collect());
    }

    /// Convenience: queue a frame holding a single marker.
    pub fn push_marker(&mut self, node_id: &str) {
        self.push_frame([Detection::new(node_id, 120)]);
    }

    /// Queue an empty frame (camera saw no marker).
    pub fn push_blank(&mut self) {
        self.push_frame([]);
    }

    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }
}

impl PositionSensor for MockSensor {
    fn open(spec: &str) -> Result<Self> {
        Ok(Self {
            spec: spec.to_string(),
            frames: VecDeque::new(),
        })
    }

    fn poll(&mut self) -> Result<Vec<Detection>> {
        let mut detections = self.frames.pop_front().unwrap_or_default();
        for d in &mut detections {
            d.ts = Some(OffsetDateTime::now_utc());
        }
        tracing::trace!(
            device = %self.spec,
            candidates = detections.len(),
            "mock poll"
        );
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polls_drain_the_script_in_order() {
        let mut sensor = MockSensor::open("mock0").unwrap();
        sensor.push_blank();
        sensor.push_marker("b");

        assert!(sensor.poll().unwrap().is_empty());
        let frame = sensor.poll().unwrap();
        assert_eq!(frame.len(), 1);
        // Marker payloads normalize to upper case.
        assert_eq!(frame[0].node_id, "B");
        assert!(frame[0].ts.is_some());
        // Exhausted script keeps reporting nothing.
        assert!(sensor.poll().unwrap().is_empty());
    }
}
