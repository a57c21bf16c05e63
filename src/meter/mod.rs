//! Adaptive speaking-level detection.
//!
//! Converts fixed-size windows of time-domain audio samples into a discrete
//! activity level 0-4 that drives a visual indicator. The pipeline combines
//! windowed amplitude estimation (RMS plus peak), exponential smoothing, an
//! adaptive noise floor, and onset hysteresis so the indicator neither
//! flickers on ambient noise nor lags behind speech onset.

mod engine;
mod level;
mod live;
mod state;

pub use engine::{LevelMeter, MeterError};
pub use level::Level;
pub use live::LiveLevel;
pub use state::MeterState;
