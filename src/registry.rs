//! Explicit per-stream meter registry.
//!
//! Maps a stable stream identifier to its meter state. Each entry owns an
//! isolated `LevelMeter`; nothing is shared between streams. Entries are
//! created lazily on first tick and removed deliberately when the caller
//! signals that a stream has ended; teardown is an explicit operation, not
//! a side effect of dropping references.

use crate::config::MeterConfig;
use crate::driver::TickFrame;
use crate::meter::{Level, LevelMeter, MeterError};
use std::collections::HashMap;

pub struct MeterRegistry {
    cfg: MeterConfig,
    meters: HashMap<String, LevelMeter>,
}

impl MeterRegistry {
    pub fn new(cfg: MeterConfig) -> Self {
        Self {
            cfg,
            meters: HashMap::new(),
        }
    }

    /// Process one tick for `stream_id`, creating its meter on first use.
    ///
    /// A frame carrying `stream_changed` resets the meter before the
    /// accompanying window is processed, so smoothing state from a previous
    /// source cannot leak into the new one.
    pub fn tick(
        &mut self,
        stream_id: &str,
        frame: &TickFrame,
    ) -> Result<Option<Level>, MeterError> {
        let meter = self
            .meters
            .entry(stream_id.to_string())
            .or_insert_with(|| LevelMeter::new(self.cfg.clone()));
        if frame.stream_changed {
            meter.reset();
        }
        meter.process_tick(&frame.samples)
    }

    /// Last emitted level for a stream, if it is being observed.
    pub fn level(&self, stream_id: &str) -> Option<Level> {
        self.meters.get(stream_id).map(LevelMeter::level)
    }

    /// Tear down the meter for a stream that has ended. Returns whether an
    /// entry existed.
    pub fn remove(&mut self, stream_id: &str) -> bool {
        self.meters.remove(stream_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: usize = 8;
    const LOUD: [f32; WINDOW] = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];

    fn registry() -> MeterRegistry {
        MeterRegistry::new(MeterConfig {
            window_len: WINDOW,
            update_every_n_ticks: 1,
            ..MeterConfig::default()
        })
    }

    fn loud_frame() -> TickFrame {
        TickFrame::new(LOUD.to_vec())
    }

    #[test]
    fn creates_meters_lazily() {
        let mut registry = registry();
        assert!(registry.is_empty());
        assert_eq!(registry.level("mic"), None);
        registry.tick("mic", &loud_frame()).expect("valid frame");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.level("mic"), Some(Level::Peak));
    }

    #[test]
    fn streams_are_isolated() {
        let mut registry = registry();
        registry.tick("playback", &loud_frame()).expect("valid");
        registry
            .tick("mic", &TickFrame::new(vec![0.0; WINDOW]))
            .expect("valid");
        assert_eq!(registry.level("playback"), Some(Level::Peak));
        assert_eq!(registry.level("mic"), Some(Level::Silent));
    }

    #[test]
    fn stream_changed_erases_smoothing_memory() {
        let mut registry = registry();
        for _ in 0..5 {
            registry.tick("mic", &loud_frame()).expect("valid");
        }
        assert_eq!(registry.level("mic"), Some(Level::Peak));

        // Hot swap: same id, new underlying source. The silent window after
        // a reset must behave like a fresh meter, not a decaying loud one.
        let swap = TickFrame {
            samples: vec![0.0; WINDOW],
            stream_changed: true,
        };
        let emitted = registry.tick("mic", &swap).expect("valid");
        assert_eq!(emitted, None);
        assert_eq!(registry.level("mic"), Some(Level::Silent));
    }

    #[test]
    fn remove_is_explicit_teardown() {
        let mut registry = registry();
        registry.tick("mic", &loud_frame()).expect("valid");
        assert!(registry.remove("mic"));
        assert!(!registry.remove("mic"));
        assert_eq!(registry.level("mic"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_window_surfaces_error() {
        let mut registry = registry();
        let bad = TickFrame::new(vec![0.0; 3]);
        assert!(matches!(
            registry.tick("mic", &bad),
            Err(MeterError::InvalidBuffer { .. })
        ));
    }
}
