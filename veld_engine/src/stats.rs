use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Frames kept before the oldest records are dropped.
const MAX_TRACKED_FRAMES: usize = 600;

/// Profiling sink: named timing attributes keyed by frame number, mirroring
/// what an on-screen stats overlay would read. Purely diagnostic; nothing in
/// the frame driver branches on it.
#[derive(Debug, Default, Serialize)]
pub struct FrameStats {
    frames: BTreeMap<u64, BTreeMap<String, f64>>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, frame: u64, name: &str, seconds: f64) {
        self.frames
            .entry(frame)
            .or_default()
            .insert(name.to_string(), seconds);
        while self.frames.len() > MAX_TRACKED_FRAMES {
            let oldest = *self.frames.keys().next().expect("non-empty map");
            self.frames.remove(&oldest);
        }
    }

    pub fn attribute(&self, frame: u64, name: &str) -> Option<f64> {
        self.frames.get(&frame).and_then(|attrs| attrs.get(name)).copied()
    }

    /// Record one phase span, measured from the start of the tick. Produces
    /// the `<phase>_time_begin` / `_taken` / `_end` attribute triple.
    pub fn record_span(&mut self, frame: u64, phase: &str, begin: Duration, end: Duration) {
        self.set_attribute(frame, &format!("{phase}_time_begin"), begin.as_secs_f64());
        self.set_attribute(
            frame,
            &format!("{phase}_time_taken"),
            end.saturating_sub(begin).as_secs_f64(),
        );
        self.set_attribute(frame, &format!("{phase}_time_end"), end.as_secs_f64());
    }

    pub fn tracked_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn latest_frame(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_produces_attribute_triple() {
        let mut stats = FrameStats::new();
        stats.record_span(
            7,
            "script",
            Duration::from_millis(2),
            Duration::from_millis(5),
        );

        assert_eq!(stats.attribute(7, "script_time_begin"), Some(0.002));
        assert_eq!(stats.attribute(7, "script_time_taken"), Some(0.003));
        assert_eq!(stats.attribute(7, "script_time_end"), Some(0.005));
        assert_eq!(stats.attribute(7, "physics_time_begin"), None);
    }

    #[test]
    fn retention_drops_oldest_frames() {
        let mut stats = FrameStats::new();
        for frame in 0..(MAX_TRACKED_FRAMES as u64 + 50) {
            stats.set_attribute(frame, "script_time_taken", 0.001);
        }
        assert_eq!(stats.tracked_frames(), MAX_TRACKED_FRAMES);
        assert_eq!(stats.attribute(0, "script_time_taken"), None);
        assert_eq!(
            stats.latest_frame(),
            Some(MAX_TRACKED_FRAMES as u64 + 49)
        );
    }
}
