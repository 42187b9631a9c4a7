//! cpal-backed audio synthesis.
//!
//! Tones are synthesized straight into the output stream: a sawtooth
//! alarm burst that wobbles between four pitches, and a two-note sine
//! chime for the early warning. Streams run on short-lived threads
//! because a cpal stream is not `Send` on every platform; the continuous
//! alarm loops bursts until its flag is cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use tracing::debug;

use winddown_core::alert::AudioSink;
use winddown_core::AlertError;

const ALARM_BURST_MS: u64 = 900;
const ALARM_BURST_SHORT_MS: u64 = 650;
const ALARM_CADENCE_MS: u64 = 1100;
const CHIME_MS: u64 = 350;

pub struct CpalAudio {
    alarm_active: Arc<AtomicBool>,
}

impl CpalAudio {
    pub fn new() -> Self {
        Self {
            alarm_active: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for CpalAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for CpalAudio {
    fn play_chime_burst(&mut self, repeats: usize, spacing: Duration) -> Result<(), AlertError> {
        probe_output()?;
        std::thread::spawn(move || {
            for i in 0..repeats {
                if let Err(err) = play_samples(render_chime) {
                    debug!(%err, "chime playback failed");
                    return;
                }
                if i + 1 < repeats {
                    std::thread::sleep(spacing);
                }
            }
        });
        Ok(())
    }

    fn start_alarm(&mut self) -> Result<(), AlertError> {
        if self.alarm_active.swap(true, Ordering::SeqCst) {
            return Ok(()); // already sounding
        }
        if let Err(err) = probe_output() {
            self.alarm_active.store(false, Ordering::SeqCst);
            return Err(err);
        }
        let active = Arc::clone(&self.alarm_active);
        std::thread::spawn(move || {
            let mut bursts = 0u64;
            while active.load(Ordering::SeqCst) {
                bursts += 1;
                // Every few bursts, vary the length slightly.
                let duration_ms = if bursts % 4 == 0 {
                    ALARM_BURST_SHORT_MS
                } else {
                    ALARM_BURST_MS
                };
                let started = Instant::now();
                if let Err(err) = play_samples(|rate| render_alarm_burst(rate, duration_ms)) {
                    debug!(%err, "alarm burst failed");
                    break;
                }
                let cadence = Duration::from_millis(ALARM_CADENCE_MS);
                if let Some(rest) = cadence.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
            active.store(false, Ordering::SeqCst);
        });
        Ok(())
    }

    fn stop_alarm(&mut self) {
        self.alarm_active.store(false, Ordering::SeqCst);
    }
}

fn output_device() -> Result<(cpal::Device, cpal::SupportedStreamConfig), AlertError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| AlertError::AudioUnavailable("no default output device".into()))?;
    let config = device
        .default_output_config()
        .map_err(|e| AlertError::AudioUnavailable(e.to_string()))?;
    Ok((device, config))
}

fn probe_output() -> Result<(), AlertError> {
    output_device().map(|_| ())
}

/// Render `samples` through the default output device and block until
/// they have been consumed.
fn play_samples(render: impl Fn(u32) -> Vec<f32>) -> Result<(), AlertError> {
    let (device, config) = output_device()?;
    let samples = render(config.sample_rate().0);
    match config.sample_format() {
        SampleFormat::F32 => run_stream::<f32>(&device, &config.into(), samples),
        SampleFormat::I16 => run_stream::<i16>(&device, &config.into(), samples),
        SampleFormat::U16 => run_stream::<u16>(&device, &config.into(), samples),
        other => Err(AlertError::AudioUnavailable(format!(
            "unsupported sample format {other:?}"
        ))),
    }
}

fn run_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Vec<f32>,
) -> Result<(), AlertError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    // Upper bound on the wait in case the device stops invoking the
    // callback mid-burst.
    let deadline = Instant::now()
        + Duration::from_secs_f64(samples.len() as f64 / config.sample_rate.0 as f64)
        + Duration::from_millis(500);
    let done = Arc::new(AtomicBool::new(false));
    let done_cb = Arc::clone(&done);
    let mut cursor = 0usize;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = if cursor < samples.len() {
                        let v = samples[cursor];
                        cursor += 1;
                        v
                    } else {
                        done_cb.store(true, Ordering::Relaxed);
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = T::from_sample(value);
                    }
                }
            },
            |err| debug!(%err, "output stream error"),
            None,
        )
        .map_err(|e| AlertError::AudioUnavailable(e.to_string()))?;
    stream
        .play()
        .map_err(|e| AlertError::AudioUnavailable(e.to_string()))?;

    while !done.load(Ordering::Relaxed) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    Ok(())
}

/// Exponential ramp from `(t0, v0)` to `(t1, v1)`, clamped outside.
fn ramp(t: f32, t0: f32, v0: f32, t1: f32, v1: f32) -> f32 {
    if t <= t0 {
        return v0;
    }
    if t >= t1 {
        return v1;
    }
    v0 * (v1 / v0).powf((t - t0) / (t1 - t0))
}

/// Sawtooth alarm burst: pitch wobbles 880 -> 660 -> 990 -> 770 Hz with a
/// click-free gain envelope.
fn render_alarm_burst(sample_rate: u32, duration_ms: u64) -> Vec<f32> {
    let duration = duration_ms as f32 / 1000.0;
    let rate = sample_rate as f32;
    let n = (rate * duration) as usize;
    let mut samples = Vec::with_capacity(n);
    let mut phase = 0.0f32;
    for i in 0..n {
        let t = i as f32 / rate;
        let freq = if t < 0.18 {
            ramp(t, 0.0, 880.0, 0.18, 660.0)
        } else if t < 0.36 {
            ramp(t, 0.18, 660.0, 0.36, 990.0)
        } else if t < 0.54 {
            ramp(t, 0.36, 990.0, 0.54, 770.0)
        } else {
            770.0
        };
        let gain = if t < 0.02 {
            ramp(t, 0.0, 0.0001, 0.02, 0.25)
        } else {
            ramp(t, 0.02, 0.25, duration, 0.0001)
        };
        phase = (phase + freq / rate).fract();
        samples.push((2.0 * phase - 1.0) * gain);
    }
    samples
}

/// Two-note sine chime: C6 falling to G5.
fn render_chime(sample_rate: u32) -> Vec<f32> {
    let duration = CHIME_MS as f32 / 1000.0;
    let rate = sample_rate as f32;
    let n = (rate * duration) as usize;
    let mut samples = Vec::with_capacity(n);
    let mut phase = 0.0f32;
    for i in 0..n {
        let t = i as f32 / rate;
        let freq = ramp(t, 0.0, 1046.5, 0.12, 784.0);
        let gain = if t < 0.01 {
            ramp(t, 0.0, 0.0001, 0.01, 0.18)
        } else {
            ramp(t, 0.01, 0.18, duration, 0.0001)
        };
        phase = (phase + freq / rate).fract();
        samples.push((2.0 * std::f32::consts::PI * phase).sin() * gain);
    }
    samples
}
