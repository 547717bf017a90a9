//! Transcription output types and segment joining.

/// A single transcribed segment with timing.
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Language detection metadata reported by the engine. The probability is
/// only known when the caller pinned the language; whisper.cpp does not
/// expose a per-language score for auto-detection.
#[derive(Debug, Clone)]
pub struct DetectionInfo {
    pub language: Option<String>,
    pub probability: Option<f32>,
}

/// Result of one engine invocation.
#[derive(Debug)]
pub struct TranscriptionOutput {
    pub segments: Vec<TranscriptSegment>,
    pub detection: DetectionInfo,
}

/// Build the final transcript: trim each segment, join with single spaces,
/// trim the result. An empty string is a valid outcome (silent input).
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|seg| seg.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
