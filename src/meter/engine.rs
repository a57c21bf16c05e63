//! The per-tick level reduction.
//!
//! `process_tick` is a pure numeric reduction over one sample window plus a
//! small amount of mutable smoothing state. It never blocks, never allocates,
//! and its cost is linear in the window length.

use super::level::Level;
use super::state::MeterState;
use crate::config::MeterConfig;
use thiserror::Error;

/// Weight applied to the window peak when combined with RMS. Keeps short
/// sharp transients from being underweighted by RMS averaging.
const PEAK_WEIGHT: f32 = 0.8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeterError {
    /// Caller contract violation: the window length must match the
    /// configured size. Silently truncating or padding would corrupt the
    /// amplitude statistics, so the tick is rejected outright.
    #[error("sample window of {actual} samples does not match configured length {expected}")]
    InvalidBuffer { expected: usize, actual: usize },
}

/// Stateful reducer turning sample windows into discrete speaking levels.
///
/// One instance per observed stream. Configuration is fixed at construction;
/// re-tuning means constructing a new meter.
#[derive(Debug, Clone)]
pub struct LevelMeter {
    cfg: MeterConfig,
    state: MeterState,
}

impl LevelMeter {
    pub fn new(cfg: MeterConfig) -> Self {
        Self {
            cfg,
            state: MeterState::default(),
        }
    }

    pub fn config(&self) -> &MeterConfig {
        &self.cfg
    }

    /// Most recently emitted level.
    pub fn level(&self) -> Level {
        self.state.last_level
    }

    /// Erase all smoothing memory. Call when the observed stream identity
    /// changes so state from the previous stream cannot leak into the next.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Consume one tick's sample window and return the new level, if it
    /// changed. `Ok(None)` covers both decimated ticks and unchanged levels;
    /// neither is an error.
    ///
    /// Samples are expected to be centered at zero with magnitude in [-1, 1].
    pub fn process_tick(&mut self, samples: &[f32]) -> Result<Option<Level>, MeterError> {
        if samples.len() != self.cfg.window_len {
            return Err(MeterError::InvalidBuffer {
                expected: self.cfg.window_len,
                actual: samples.len(),
            });
        }

        let state = &mut self.state;
        state.tick_counter = state.tick_counter.wrapping_add(1);
        if state.tick_counter % self.cfg.update_every_n_ticks != 0 {
            return Ok(None);
        }

        let mut sum_squares = 0.0f32;
        let mut peak = 0.0f32;
        for &sample in samples {
            sum_squares += sample * sample;
            let magnitude = sample.abs();
            if magnitude > peak {
                peak = magnitude;
            }
        }
        let rms = (sum_squares / samples.len() as f32).sqrt();
        let activity = rms.max(peak * PEAK_WEIGHT);

        state.smoothed_activity +=
            (activity - state.smoothed_activity) * self.cfg.signal_smoothing_alpha;

        // Learn the floor only during apparent quiet; otherwise sustained
        // speech would raise it until it gated out the speaker's own voice.
        if state.last_level == Level::Silent
            || state.smoothed_activity < self.cfg.level1_threshold
        {
            state.noise_floor +=
                (state.smoothed_activity - state.noise_floor) * self.cfg.noise_floor_alpha;
        }

        let gate = (state.noise_floor * self.cfg.noise_gate_multiplier).max(self.cfg.min_noise_gate);
        let gated_activity = (state.smoothed_activity - gate).max(0.0);
        let mapped = map_gated_activity(&self.cfg, gated_activity);

        // Hysteresis exists only on the rising edge: an onset must survive
        // `active_frames_to_raise` consecutive ticks, but falling back to
        // silent is immediate.
        let next = if mapped > Level::Silent {
            state.active_frame_count += 1;
            if state.last_level > Level::Silent
                || state.active_frame_count >= self.cfg.active_frames_to_raise
            {
                mapped
            } else {
                Level::Silent
            }
        } else {
            state.active_frame_count = 0;
            Level::Silent
        };

        if next != state.last_level {
            state.last_level = next;
            Ok(Some(next))
        } else {
            Ok(None)
        }
    }

    #[cfg(test)]
    pub(super) fn noise_floor(&self) -> f32 {
        self.state.noise_floor
    }
}

fn map_gated_activity(cfg: &MeterConfig, gated_activity: f32) -> Level {
    if gated_activity < cfg.silence_threshold {
        Level::Silent
    } else if gated_activity < cfg.level1_threshold {
        Level::Low
    } else if gated_activity < cfg.level2_threshold {
        Level::Medium
    } else if gated_activity < cfg.level3_threshold {
        Level::High
    } else {
        Level::Peak
    }
}
