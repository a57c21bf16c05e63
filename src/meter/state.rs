use super::level::Level;

/// Smoothing memory carried across ticks for one observed stream.
///
/// `last_level` is the only externally observable field; the rest exists so
/// the next tick can be computed incrementally. All fields belong to exactly
/// one stream and are reset together when the stream identity changes.
#[derive(Debug, Clone, Default)]
pub struct MeterState {
    pub(super) smoothed_activity: f32,
    pub(super) noise_floor: f32,
    pub(super) last_level: Level,
    pub(super) active_frame_count: u32,
    pub(super) tick_counter: u64,
}

impl MeterState {
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }
}
