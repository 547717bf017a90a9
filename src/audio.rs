//! WAV decoding into the 16 kHz mono f32 layout the engine expects.

use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Inference sample rate. Whisper models only accept 16 kHz input.
pub const SAMPLE_RATE: u32 = 16_000;

/// Load a WAV file as 16 kHz mono f32 samples.
/// Accepts 16-bit PCM and 32-bit float; multi-channel audio is averaged down
/// to mono and other sample rates are resampled.
pub fn load_wav_16k_mono(path: &Path) -> Result<Vec<f32>, String> {
    let mut reader =
        WavReader::open(path).map_err(|e| format!("Failed to read audio file: {}", e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?,
        (format, bits) => {
            return Err(format!(
                "Unsupported WAV format: {:?} {}-bit (expected 16-bit PCM or 32-bit float)",
                format, bits
            ))
        }
    };

    let mono = downmix(samples, spec.channels);
    Ok(resample_linear(mono, spec.sample_rate, SAMPLE_RATE))
}

/// Average interleaved channels into mono.
fn downmix(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resampler. Adequate for speech input.
fn resample_linear(samples: Vec<f32>, from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() {
        return samples;
    }
    let ratio = from as f64 / to as f64;
    let out_len = (samples.len() as f64 / ratio) as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples[idx];
        let b = if idx + 1 < samples.len() {
            samples[idx + 1]
        } else {
            a
        };
        out.push(a + (b - a) * frac);
    }
    out
}
