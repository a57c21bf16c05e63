//! Scheduler-agnostic tick plumbing around the level meter.
//!
//! The meter core never owns a clock. Callers can tick a `LevelMeter`
//! directly, replay a PCM buffer offline, or feed a background worker
//! through a bounded channel and consume level-change events. Whatever
//! drives the ticks, the meter only sees `TickFrame`s.

use crate::config::MeterConfig;
use crate::meter::{Level, LevelMeter, LiveLevel};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Capacity of the worker's outbound event channel. Level changes are rare
/// (human speech cadence), so a small buffer is plenty.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// How long the worker waits for a frame before re-checking its stop flag.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// One tick's input from a sample source.
#[derive(Debug, Clone)]
pub struct TickFrame {
    pub samples: Vec<f32>,
    /// Set when the underlying stream identity changed since the previous
    /// tick; forces a reset before this window is processed.
    pub stream_changed: bool,
}

impl TickFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            stream_changed: false,
        }
    }
}

/// A level change. Emitted only when the level differs from the previous
/// emission; consumers never see duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelEvent {
    pub level: Level,
    /// Driving-clock tick (1-based) that produced the change.
    pub tick: u64,
}

/// Replay a PCM buffer through a fresh meter and collect the emitted level
/// changes. Chunks the buffer into windows of the configured length; the
/// trailing partial window is zero-padded. Useful for tests and benchmarks
/// that have no live audio source.
pub fn offline_levels_from_pcm(samples: &[f32], cfg: &MeterConfig) -> Vec<LevelEvent> {
    let mut meter = LevelMeter::new(cfg.clone());
    let mut events = Vec::new();
    let mut tick = 0u64;
    for chunk in samples.chunks(cfg.window_len) {
        tick += 1;
        let mut window = chunk.to_vec();
        window.resize(cfg.window_len, 0.0);
        // Window length is guaranteed here, so the tick cannot fail.
        if let Ok(Some(level)) = meter.process_tick(&window) {
            events.push(LevelEvent { level, tick });
        }
    }
    events
}

/// Handle the consumer uses to poll the background meter worker.
pub struct MeterJob {
    pub events: Receiver<LevelEvent>,
    pub handle: Option<thread::JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

impl MeterJob {
    /// Ask the worker to exit after its current frame.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Wait for the worker thread to finish.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawn a worker that owns one meter, consumes tick frames, and forwards
/// level changes. The worker exits when the frame channel disconnects, the
/// event consumer goes away, or a stop is requested.
pub fn start_meter_job(
    frames: Receiver<TickFrame>,
    cfg: MeterConfig,
    live: Option<LiveLevel>,
) -> MeterJob {
    let (event_tx, event_rx) = bounded(EVENT_CHANNEL_CAPACITY);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop = stop_flag.clone();

    let handle = thread::spawn(move || {
        let mut meter = LevelMeter::new(cfg);
        let mut tick = 0u64;
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            match frames.recv_timeout(IDLE_POLL) {
                Ok(frame) => {
                    tick += 1;
                    if frame.stream_changed {
                        meter.reset();
                    }
                    match meter.process_tick(&frame.samples) {
                        Ok(Some(level)) => {
                            tracing::debug!(tick, level = level.as_u8(), "level change");
                            if let Some(ref live) = live {
                                live.set(level);
                            }
                            if event_tx.send(LevelEvent { level, tick }).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!(tick, error = %err, "dropping malformed tick frame");
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        // Leave observers in the quiet state rather than frozen mid-speech.
        if let Some(ref live) = live {
            live.set(Level::Silent);
        }
    });

    MeterJob {
        events: event_rx,
        handle: Some(handle),
        stop_flag,
    }
}
