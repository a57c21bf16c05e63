//! Meter configuration and CLI parsing.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

pub use defaults::{
    DEFAULT_ACTIVE_FRAMES_TO_RAISE, DEFAULT_CHANNEL_CAPACITY, DEFAULT_LEVEL1_THRESHOLD,
    DEFAULT_LEVEL2_THRESHOLD, DEFAULT_LEVEL3_THRESHOLD, DEFAULT_METER_SECONDS,
    DEFAULT_MIN_NOISE_GATE, DEFAULT_NOISE_FLOOR_ALPHA, DEFAULT_NOISE_GATE_MULTIPLIER,
    DEFAULT_SIGNAL_SMOOTHING_ALPHA, DEFAULT_SILENCE_THRESHOLD, DEFAULT_UPDATE_EVERY_N_TICKS,
    DEFAULT_WINDOW_LEN, MAX_METER_SECONDS, MAX_WINDOW_LEN,
};

/// Tunables for the level meter. Supplied at construction and immutable for
/// the lifetime of a meter instance.
#[derive(Debug, Clone)]
pub struct MeterConfig {
    /// Samples analyzed per tick.
    pub window_len: usize,
    /// Decimation factor: process every Nth tick of the driving clock.
    pub update_every_n_ticks: u64,
    /// Ascending cut points mapping gated activity to levels 0-4.
    pub silence_threshold: f32,
    pub level1_threshold: f32,
    pub level2_threshold: f32,
    pub level3_threshold: f32,
    /// Smoothing factor for the activity estimate; larger reacts faster.
    pub signal_smoothing_alpha: f32,
    /// Smoothing factor for the ambient noise floor.
    pub noise_floor_alpha: f32,
    /// Multiplier applied to the noise floor to form the gate.
    pub noise_gate_multiplier: f32,
    /// Floor below which the gate never drops.
    pub min_noise_gate: f32,
    /// Consecutive active ticks required before raising the level from 0.
    pub active_frames_to_raise: u32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            update_every_n_ticks: DEFAULT_UPDATE_EVERY_N_TICKS,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            level1_threshold: DEFAULT_LEVEL1_THRESHOLD,
            level2_threshold: DEFAULT_LEVEL2_THRESHOLD,
            level3_threshold: DEFAULT_LEVEL3_THRESHOLD,
            signal_smoothing_alpha: DEFAULT_SIGNAL_SMOOTHING_ALPHA,
            noise_floor_alpha: DEFAULT_NOISE_FLOOR_ALPHA,
            noise_gate_multiplier: DEFAULT_NOISE_GATE_MULTIPLIER,
            min_noise_gate: DEFAULT_MIN_NOISE_GATE,
            active_frames_to_raise: DEFAULT_ACTIVE_FRAMES_TO_RAISE,
        }
    }
}

/// CLI options for the VoiceLevel live meter binary.
#[derive(Debug, Parser, Clone)]
#[command(about = "VoiceLevel speaking-intensity meter", author, version)]
pub struct AppConfig {
    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Metering duration in seconds
    #[arg(long, default_value_t = DEFAULT_METER_SECONDS)]
    pub seconds: u64,

    /// Emit level changes as JSON lines instead of text bars
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable trace logging to a temp file
    #[arg(long = "logs", env = "VOICELEVEL_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOICELEVEL_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Samples analyzed per tick
    #[arg(long = "window-len", default_value_t = DEFAULT_WINDOW_LEN)]
    pub window_len: usize,

    /// Process every Nth tick of the driving clock
    #[arg(long = "update-every-n-ticks", default_value_t = DEFAULT_UPDATE_EVERY_N_TICKS)]
    pub update_every_n_ticks: u64,

    /// Gated activity below this maps to level 0
    #[arg(long = "silence-threshold", default_value_t = DEFAULT_SILENCE_THRESHOLD)]
    pub silence_threshold: f32,

    /// Gated activity below this maps to level 1
    #[arg(long = "level1-threshold", default_value_t = DEFAULT_LEVEL1_THRESHOLD)]
    pub level1_threshold: f32,

    /// Gated activity below this maps to level 2
    #[arg(long = "level2-threshold", default_value_t = DEFAULT_LEVEL2_THRESHOLD)]
    pub level2_threshold: f32,

    /// Gated activity below this maps to level 3
    #[arg(long = "level3-threshold", default_value_t = DEFAULT_LEVEL3_THRESHOLD)]
    pub level3_threshold: f32,

    /// Smoothing factor for the activity estimate, in (0, 1]
    #[arg(long = "signal-smoothing-alpha", default_value_t = DEFAULT_SIGNAL_SMOOTHING_ALPHA)]
    pub signal_smoothing_alpha: f32,

    /// Smoothing factor for the adaptive noise floor, in (0, 1]
    #[arg(long = "noise-floor-alpha", default_value_t = DEFAULT_NOISE_FLOOR_ALPHA)]
    pub noise_floor_alpha: f32,

    /// Multiplier applied to the noise floor to form the gate
    #[arg(long = "noise-gate-multiplier", default_value_t = DEFAULT_NOISE_GATE_MULTIPLIER)]
    pub noise_gate_multiplier: f32,

    /// Floor below which the noise gate never drops
    #[arg(long = "min-noise-gate", default_value_t = DEFAULT_MIN_NOISE_GATE)]
    pub min_noise_gate: f32,

    /// Consecutive active ticks required before raising the level from 0
    #[arg(long = "active-frames-to-raise", default_value_t = DEFAULT_ACTIVE_FRAMES_TO_RAISE)]
    pub active_frames_to_raise: u32,

    /// Window channel capacity between the capture callback and the meter worker
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,
}
