use super::{AppConfig, MeterConfig};
use clap::Parser;

#[test]
fn default_meter_config_validates() {
    MeterConfig::default().validate().expect("defaults valid");
}

#[test]
fn rejects_zero_window() {
    let cfg = MeterConfig {
        window_len: 0,
        ..MeterConfig::default()
    };
    let err = cfg.validate().expect_err("zero window must fail");
    assert!(err.to_string().contains("window length"));
}

#[test]
fn rejects_zero_decimation() {
    let cfg = MeterConfig {
        update_every_n_ticks: 0,
        ..MeterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_non_ascending_thresholds() {
    let cfg = MeterConfig {
        level2_threshold: 0.001,
        ..MeterConfig::default()
    };
    let err = cfg.validate().expect_err("out-of-order thresholds must fail");
    assert!(err.to_string().contains("strictly ascending"));
}

#[test]
fn rejects_out_of_range_alphas() {
    let cfg = MeterConfig {
        signal_smoothing_alpha: 0.0,
        ..MeterConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = MeterConfig {
        noise_floor_alpha: 1.5,
        ..MeterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_alpha_of_one() {
    let cfg = MeterConfig {
        signal_smoothing_alpha: 1.0,
        ..MeterConfig::default()
    };
    cfg.validate().expect("alpha of exactly 1.0 is allowed");
}

#[test]
fn rejects_gate_multiplier_below_one() {
    let cfg = MeterConfig {
        noise_gate_multiplier: 0.9,
        ..MeterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_zero_debounce() {
    let cfg = MeterConfig {
        active_frames_to_raise: 0,
        ..MeterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn app_config_defaults_parse_and_validate() {
    let config = AppConfig::parse_from(["voicelevel"]);
    config.validate().expect("default CLI config valid");
    let meter = config.meter_config();
    assert_eq!(meter.window_len, 512);
    assert_eq!(meter.update_every_n_ticks, 2);
    assert_eq!(meter.active_frames_to_raise, 1);
}

#[test]
fn app_config_rejects_zero_seconds() {
    let config = AppConfig::parse_from(["voicelevel", "--seconds", "0"]);
    let err = config.validate().expect_err("zero seconds must fail");
    assert!(err.to_string().contains("--seconds"));
}

#[test]
fn meter_config_snapshot_maps_cli_flags() {
    let config = AppConfig::parse_from([
        "voicelevel",
        "--window-len",
        "256",
        "--silence-threshold",
        "0.002",
        "--level1-threshold",
        "0.004",
        "--active-frames-to-raise",
        "3",
    ]);
    let meter = config.meter_config();
    assert_eq!(meter.window_len, 256);
    assert!((meter.silence_threshold - 0.002).abs() < 1e-9);
    assert!((meter.level1_threshold - 0.004).abs() < 1e-9);
    assert_eq!(meter.active_frames_to_raise, 3);
}
