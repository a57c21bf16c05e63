//! Default tunables for the level meter.
//!
//! The thresholds and smoothing factors were tuned against real speech over
//! a ~60 Hz driving clock with 512-sample windows; they assume samples
//! normalized to [-1, 1].

pub const DEFAULT_WINDOW_LEN: usize = 512;
pub const DEFAULT_UPDATE_EVERY_N_TICKS: u64 = 2;
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.0012;
pub const DEFAULT_LEVEL1_THRESHOLD: f32 = 0.0035;
pub const DEFAULT_LEVEL2_THRESHOLD: f32 = 0.008;
pub const DEFAULT_LEVEL3_THRESHOLD: f32 = 0.018;
pub const DEFAULT_SIGNAL_SMOOTHING_ALPHA: f32 = 0.45;
pub const DEFAULT_NOISE_FLOOR_ALPHA: f32 = 0.04;
pub const DEFAULT_NOISE_GATE_MULTIPLIER: f32 = 1.35;
pub const DEFAULT_MIN_NOISE_GATE: f32 = 0.0006;
pub const DEFAULT_ACTIVE_FRAMES_TO_RAISE: u32 = 1;

/// Capacity of the window channel between the capture callback and the
/// meter worker.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub const DEFAULT_METER_SECONDS: u64 = 30;
pub const MAX_METER_SECONDS: u64 = 3_600;
pub const MAX_WINDOW_LEN: usize = 65_536;
