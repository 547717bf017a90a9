//! Energy-based voice-activity gate.
//!
//! Silent stretches are cut from the audio before inference so the engine
//! skips them instead of hallucinating text for them. Short pauses between
//! words are kept so speech is not clipped mid-sentence.

/// Analysis frame length in milliseconds.
const FRAME_MS: usize = 30;

/// At 16 kHz: 30 ms = 480 samples.
const FRAME_SAMPLES: usize = 480;

/// RMS level treated as fully confident speech, for f32 samples in [-1, 1].
const REFERENCE_RMS: f32 = 0.02;

/// Frames whose activity score reaches this are speech.
const ACTIVITY_THRESHOLD: f32 = 0.5;

/// Silence runs shorter than this sit inside an utterance and are kept.
const MIN_SILENCE_MS: usize = 500;

/// Activity score for one frame: RMS normalized against the reference
/// speech level, clamped to [0, 1].
fn frame_score(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let energy: f32 = frame.iter().map(|s| s * s).sum();
    let rms = (energy / frame.len() as f32).sqrt();
    (rms / REFERENCE_RMS).min(1.0)
}

/// Mark silence runs between speech frames as speech when they are shorter
/// than the minimum silence duration. Leading and trailing silence is never
/// bridged.
fn bridge_short_silence(speech: &mut [bool]) {
    let mut prev_speech: Option<usize> = None;
    for i in 0..speech.len() {
        if !speech[i] {
            continue;
        }
        if let Some(prev) = prev_speech {
            let gap = i - prev - 1;
            if gap > 0 && gap * FRAME_MS < MIN_SILENCE_MS {
                for frame in &mut speech[prev + 1..i] {
                    *frame = true;
                }
            }
        }
        prev_speech = Some(i);
    }
}

/// Drop silent stretches longer than the minimum silence duration.
/// Returns an empty vector when no frame contains speech at all, in which
/// case the engine should not be invoked.
pub fn filter_silence(samples: &[f32]) -> Vec<f32> {
    let mut speech: Vec<bool> = samples
        .chunks(FRAME_SAMPLES)
        .map(|frame| frame_score(frame) >= ACTIVITY_THRESHOLD)
        .collect();

    if !speech.iter().any(|&s| s) {
        return Vec::new();
    }
    bridge_short_silence(&mut speech);

    let mut kept = Vec::with_capacity(samples.len());
    for (frame, &keep) in samples.chunks(FRAME_SAMPLES).zip(speech.iter()) {
        if keep {
            kept.extend_from_slice(frame);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 440 Hz tone at amplitude 0.1, well above the activity threshold.
    fn tone(duration_ms: usize) -> Vec<f32> {
        let len = duration_ms * 16;
        (0..len)
            .map(|i| 0.1 * (i as f32 * 2.0 * std::f32::consts::PI * 440.0 / 16_000.0).sin())
            .collect()
    }

    fn silence(duration_ms: usize) -> Vec<f32> {
        vec![0.0; duration_ms * 16]
    }

    #[test]
    fn silence_only_yields_empty() {
        assert!(filter_silence(&silence(2_000)).is_empty());
        assert!(filter_silence(&[]).is_empty());
    }

    #[test]
    fn speech_only_is_kept_whole() {
        let input = tone(1_000);
        let output = filter_silence(&input);
        assert_eq!(output.len(), input.len());
    }

    #[test]
    fn short_pause_is_bridged() {
        let mut input = tone(500);
        input.extend(silence(300));
        input.extend(tone(500));
        let output = filter_silence(&input);
        assert_eq!(output.len(), input.len());
    }

    #[test]
    fn long_silence_is_cut() {
        let mut input = tone(500);
        input.extend(silence(2_000));
        input.extend(tone(500));
        let output = filter_silence(&input);
        assert!(output.len() < input.len());
        // Both speech stretches survive.
        assert!(output.len() >= 2 * 500 * 16);
        // The bulk of the two-second silence is gone.
        assert!(output.len() < input.len() - 16_000);
    }

    #[test]
    fn leading_silence_is_not_bridged() {
        let mut input = silence(1_000);
        input.extend(tone(500));
        let output = filter_silence(&input);
        assert!(output.len() < input.len());
        assert!(output.len() >= 500 * 16);
    }
}
