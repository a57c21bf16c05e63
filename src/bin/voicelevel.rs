//! VoiceLevel CLI entrypoint.
//!
//! Opens the selected microphone, runs the background meter worker, and
//! prints a level event per change as either a text bar or a JSON line.

use anyhow::{Context, Result};
use cpal::traits::StreamTrait;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use voicelevel::{
    init_tracing, mic_permission_hint, start_meter_job, AppConfig, LevelEvent, Monitor, TickFrame,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_tracing(&config);

    if config.list_input_devices {
        return list_input_devices();
    }

    let monitor = Monitor::new(config.input_device.as_deref())
        .with_context(|| format!("failed to open microphone. {}", mic_permission_hint()))?;
    eprintln!("Listening on '{}' for {}s...", monitor.device_name(), config.seconds);

    let dropped = Arc::new(AtomicUsize::new(0));
    let (frame_tx, frame_rx) = bounded::<TickFrame>(config.channel_capacity);
    let stream = monitor
        .open_window_stream(config.window_len, frame_tx, dropped.clone())
        .with_context(|| format!("failed to start audio capture. {}", mic_permission_hint()))?;

    let mut job = start_meter_job(frame_rx, config.meter_config(), None);
    stream.play().context("failed to start input stream")?;

    let deadline = Instant::now() + Duration::from_secs(config.seconds);
    while Instant::now() < deadline {
        match job.events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => print_event(&event, config.json)?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(stream);
    job.request_stop();
    job.join();

    let dropped = dropped.load(Ordering::Relaxed);
    if dropped > 0 {
        tracing::warn!(dropped, "windows dropped because the meter lagged");
        eprintln!("Warning: {dropped} windows dropped (meter could not keep up).");
    }
    Ok(())
}

fn list_input_devices() -> Result<()> {
    match Monitor::list_devices() {
        Ok(devices) if devices.is_empty() => {
            println!("No audio input devices detected.");
        }
        Ok(devices) => {
            println!("Detected audio input devices:");
            for name in devices {
                println!("  - {name}");
            }
        }
        Err(err) => {
            println!("Failed to list audio input devices: {err:#}");
        }
    }
    Ok(())
}

fn print_event(event: &LevelEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!(
            "[{:>6}] {} {} ({})",
            event.tick,
            render_bar(event.level.as_u8()),
            event.level.as_u8(),
            event.level.label()
        );
    }
    Ok(())
}

fn render_bar(level: u8) -> String {
    let filled = usize::from(level.min(4));
    let mut bar = String::new();
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..4 {
        bar.push('·');
    }
    bar
}
