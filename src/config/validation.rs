use super::defaults::{MAX_METER_SECONDS, MAX_WINDOW_LEN};
use super::{AppConfig, MeterConfig};
use anyhow::{bail, Result};
use clap::Parser;

impl MeterConfig {
    /// Check the tunables before a meter is constructed. Thresholds must be
    /// strictly ascending so the level mapping stays monotonic.
    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 || self.window_len > MAX_WINDOW_LEN {
            bail!(
                "window length must be between 1 and {MAX_WINDOW_LEN}, got {}",
                self.window_len
            );
        }
        if self.update_every_n_ticks == 0 {
            bail!("update-every-n-ticks must be at least 1");
        }
        if self.silence_threshold <= 0.0 {
            bail!(
                "silence threshold must be positive, got {}",
                self.silence_threshold
            );
        }
        if self.level1_threshold <= self.silence_threshold
            || self.level2_threshold <= self.level1_threshold
            || self.level3_threshold <= self.level2_threshold
        {
            bail!(
                "level thresholds must be strictly ascending, got {} < {} < {} < {}",
                self.silence_threshold,
                self.level1_threshold,
                self.level2_threshold,
                self.level3_threshold
            );
        }
        if !(self.signal_smoothing_alpha > 0.0 && self.signal_smoothing_alpha <= 1.0) {
            bail!(
                "signal smoothing alpha must be in (0, 1], got {}",
                self.signal_smoothing_alpha
            );
        }
        if !(self.noise_floor_alpha > 0.0 && self.noise_floor_alpha <= 1.0) {
            bail!(
                "noise floor alpha must be in (0, 1], got {}",
                self.noise_floor_alpha
            );
        }
        if self.noise_gate_multiplier < 1.0 {
            bail!(
                "noise gate multiplier must be at least 1.0, got {}",
                self.noise_gate_multiplier
            );
        }
        if self.min_noise_gate < 0.0 {
            bail!(
                "minimum noise gate cannot be negative, got {}",
                self.min_noise_gate
            );
        }
        if self.active_frames_to_raise == 0 {
            bail!("active-frames-to-raise must be at least 1");
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values, including the meter tunables they feed.
    pub fn validate(&self) -> Result<()> {
        if self.seconds == 0 || self.seconds > MAX_METER_SECONDS {
            bail!(
                "--seconds must be between 1 and {MAX_METER_SECONDS}, got {}",
                self.seconds
            );
        }
        if !(1..=1024).contains(&self.channel_capacity) {
            bail!(
                "--channel-capacity must be between 1 and 1024, got {}",
                self.channel_capacity
            );
        }
        self.meter_config().validate()
    }

    /// Snapshot the CLI-controlled meter tunables for downstream consumers.
    pub fn meter_config(&self) -> MeterConfig {
        MeterConfig {
            window_len: self.window_len,
            update_every_n_ticks: self.update_every_n_ticks,
            silence_threshold: self.silence_threshold,
            level1_threshold: self.level1_threshold,
            level2_threshold: self.level2_threshold,
            level3_threshold: self.level3_threshold,
            signal_smoothing_alpha: self.signal_smoothing_alpha,
            noise_floor_alpha: self.noise_floor_alpha,
            noise_gate_multiplier: self.noise_gate_multiplier,
            min_noise_gate: self.min_noise_gate,
            active_frames_to_raise: self.active_frames_to_raise,
        }
    }
}
