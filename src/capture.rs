//! Live microphone sample source via CPAL.
//!
//! The meter core only understands fixed-size mono windows; real devices
//! deliver arbitrary callback sizes, interleaved channels, and assorted
//! sample formats. This module converts whatever the device produces into
//! `TickFrame`s of the configured window length, so window cadence follows
//! the device callback clock.

use crate::driver::TickFrame;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Downmix interleaved multi-channel input to mono while applying the
/// provided format converter, so the meter sees one channel regardless of
/// the microphone layout.
pub(crate) fn downmix_into<T, F>(buf: &mut Vec<f32>, data: &[T], channels: usize, mut convert: F)
where
    T: Copy,
    F: FnMut(T) -> f32,
{
    if channels <= 1 {
        buf.extend(data.iter().copied().map(&mut convert));
        return;
    }

    let mut acc = 0.0f32;
    let mut count = 0usize;
    for sample in data.iter().copied() {
        acc += convert(sample);
        count += 1;
        if count == channels {
            buf.push(acc / channels as f32);
            acc = 0.0;
            count = 0;
        }
    }
    // A trailing partial frame still contributes its average.
    if count > 0 {
        buf.push(acc / count as f32);
    }
}

/// Assembles downmixed samples into fixed-size windows and pushes them to
/// the meter worker. Runs inside the audio callback, so it never blocks:
/// when the consumer lags, windows are counted as dropped instead.
pub(crate) struct WindowDispatcher {
    window_len: usize,
    pending: Vec<f32>,
    scratch: Vec<f32>,
    sender: Sender<TickFrame>,
    dropped: Arc<AtomicUsize>,
}

impl WindowDispatcher {
    pub(crate) fn new(
        window_len: usize,
        sender: Sender<TickFrame>,
        dropped: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            window_len: window_len.max(1),
            pending: Vec::with_capacity(window_len),
            scratch: Vec::new(),
            sender,
            dropped,
        }
    }

    pub(crate) fn push<T, F>(&mut self, data: &[T], channels: usize, convert: F)
    where
        T: Copy,
        F: FnMut(T) -> f32,
    {
        self.scratch.clear();
        downmix_into(&mut self.scratch, data, channels, convert);
        self.pending.extend_from_slice(&self.scratch);

        while self.pending.len() >= self.window_len {
            let window: Vec<f32> = self.pending.drain(..self.window_len).collect();
            if let Err(err) = self.sender.try_send(TickFrame::new(window)) {
                match err {
                    TrySendError::Full(_) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    TrySendError::Disconnected(_) => break,
                }
            }
        }
    }
}

/// Audio input device wrapper for the live meter.
pub struct Monitor {
    device: cpal::Device,
}

impl Monitor {
    /// List microphone names so the CLI can expose a human-friendly selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Open a monitor, optionally forcing a specific device so users can
    /// pick the right microphone when several inputs are exposed.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Build an input stream that feeds windows of `window_len` samples into
    /// `sender`. The stream starts on `play()` and stops when dropped; keep
    /// it alive for as long as the meter should tick.
    pub fn open_window_stream(
        &self,
        window_len: usize,
        sender: Sender<TickFrame>,
        dropped: Arc<AtomicUsize>,
    ) -> Result<cpal::Stream> {
        let default_config = self
            .device
            .default_input_config()
            .context("failed to query input device config")?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let channels = usize::from(device_config.channels.max(1));

        tracing::debug!(
            ?format,
            sample_rate = device_config.sample_rate.0,
            channels,
            window_len,
            "opening input stream"
        );

        let dispatcher = Arc::new(Mutex::new(WindowDispatcher::new(
            window_len,
            sender,
            dropped.clone(),
        )));
        let err_fn = |err| tracing::warn!(error = %err, "audio stream error");

        // Convert every supported sample type to f32 up front so the meter
        // stays format-agnostic.
        let stream = match format {
            SampleFormat::F32 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[f32], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[i16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample as f32 / 32_768.0);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[u16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| {
                                (sample as f32 - 32_768.0) / 32_768.0
                            });
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        Ok(stream)
    }
}

pub fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn downmix_preserves_mono() {
        let mut buf = Vec::new();
        let samples = [0.1f32, 0.2, 0.3];
        downmix_into(&mut buf, &samples, 1, |sample| sample);
        assert_eq!(buf, samples);
    }

    #[test]
    fn downmix_averages_stereo_frames() {
        let mut buf = Vec::new();
        let samples = [1.0f32, -1.0, 0.5, 0.5];
        downmix_into(&mut buf, &samples, 2, |sample| sample);
        assert_eq!(buf, vec![0.0, 0.5]);
    }

    #[test]
    fn downmix_averages_partial_trailing_frame() {
        let mut buf = Vec::new();
        let samples = [2.0f32, 4.0, 6.0, 8.0, 10.0];
        downmix_into(&mut buf, &samples, 3, |sample| sample);
        assert_eq!(buf, vec![4.0, 9.0]);
    }

    #[test]
    fn downmix_applies_format_conversion() {
        let mut buf = Vec::new();
        let samples = [16_384i16, -16_384];
        downmix_into(&mut buf, &samples, 1, |sample| sample as f32 / 32_768.0);
        assert_eq!(buf, vec![0.5, -0.5]);
    }

    #[test]
    fn dispatcher_emits_complete_windows() {
        let (tx, rx) = bounded(4);
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = WindowDispatcher::new(3, tx, dropped.clone());

        dispatcher.push(&[1.0f32, 2.0], 1, |sample| sample);
        assert!(rx.try_recv().is_err());

        dispatcher.push(&[3.0f32, 4.0], 1, |sample| sample);
        let frame = rx.try_recv().expect("assembled window");
        assert_eq!(frame.samples, vec![1.0, 2.0, 3.0]);
        assert!(!frame.stream_changed);
        assert_eq!(dropped.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn dispatcher_counts_dropped_windows_when_consumer_lags() {
        let (tx, rx) = bounded(1);
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = WindowDispatcher::new(2, tx, dropped.clone());

        dispatcher.push(&[1.0f32, 2.0, 3.0, 4.0], 1, |sample| sample);

        let frame = rx.try_recv().expect("first window delivered");
        assert_eq!(frame.samples, vec![1.0, 2.0]);
        assert_eq!(dropped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn dispatcher_downmixes_before_windowing() {
        let (tx, rx) = bounded(4);
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = WindowDispatcher::new(2, tx, dropped);

        dispatcher.push(&[1.0f32, 3.0, 5.0, 7.0], 2, |sample| sample);
        let frame = rx.try_recv().expect("assembled window");
        assert_eq!(frame.samples, vec![2.0, 6.0]);
    }
}
