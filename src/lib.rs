//! Adaptive speaking-intensity metering.
//!
//! Turns raw audio sample windows into a small discrete level (0 through 4)
//! suitable for driving avatars, VU widgets, or talk indicators. The core
//! meter is push-driven and clock-free; `capture` provides a live
//! microphone source, `driver` the offline replay and background worker
//! plumbing, and `registry` per-stream meter management.

pub mod capture;
pub mod config;
pub mod driver;
pub mod meter;
pub mod registry;
mod telemetry;

pub use capture::{mic_permission_hint, Monitor};
pub use config::{AppConfig, MeterConfig};
pub use driver::{offline_levels_from_pcm, start_meter_job, LevelEvent, MeterJob, TickFrame};
pub use meter::{Level, LevelMeter, LiveLevel, MeterError};
pub use registry::MeterRegistry;
pub use telemetry::{init_tracing, trace_log_path};
