use super::level::Level;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Latest emitted level, shareable across threads so a UI can poll it
/// without talking to the meter worker directly.
#[derive(Clone, Debug)]
pub struct LiveLevel {
    bits: Arc<AtomicU8>,
}

impl LiveLevel {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU8::new(Level::Silent.as_u8())),
        }
    }

    pub fn set(&self, level: Level) {
        self.bits.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn get(&self) -> Level {
        Level::from_u8(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for LiveLevel {
    fn default() -> Self {
        Self::new()
    }
}
