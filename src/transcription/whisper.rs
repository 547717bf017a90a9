//! In-process whisper.cpp engine.

use std::path::Path;

use log::debug;
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use super::backend::{DetectionInfo, TranscriptSegment, TranscriptionOutput};

/// Decoding beam width. Balances latency and accuracy.
const BEAM_SIZE: i32 = 5;

/// Inference threads. Modest parallelism; the worker runs one file at a time.
const N_THREADS: i32 = 4;

/// Segments whose no-speech probability exceeds this are suppressed.
const NO_SPEECH_THRESHOLD: f32 = 0.6;

/// Entropy bound for the decoder's repetition sanity check.
const ENTROPY_THRESHOLD: f32 = 2.4;

/// Segments with mean log-probability below this are dropped.
const LOGPROB_THRESHOLD: f32 = -1.0;

/// Whisper.cpp backend. Holds a loaded model for the lifetime of the
/// invocation; everything is released when the worker exits.
pub struct WhisperBackend {
    context: WhisperContext,
}

impl WhisperBackend {
    /// Load a ggml model file. Expensive, done once per invocation.
    pub fn load(model_path: &Path, use_gpu: bool) -> Result<Self, String> {
        let path = model_path
            .to_str()
            .ok_or("Model path is not valid UTF-8")?;
        let mut context_params = WhisperContextParameters::default();
        context_params.use_gpu = use_gpu;
        let context = WhisperContext::new_with_params(path, context_params)
            .map_err(|e| format!("Failed to load model: {}", e))?;
        Ok(Self { context })
    }

    /// Run one transcription over 16 kHz mono samples with the fixed
    /// decoding policy: deterministic (temperature 0), beam search, and the
    /// engine's low-confidence suppression thresholds.
    pub fn transcribe(
        &self,
        samples: &[f32],
        language: Option<&str>,
    ) -> Result<TranscriptionOutput, String> {
        let mut state = self
            .context
            .create_state()
            .map_err(|e| format!("Failed to create decoder state: {}", e))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: BEAM_SIZE,
            patience: -1.0,
        });
        params.set_language(language);
        params.set_n_threads(N_THREADS);
        params.set_temperature(0.0);
        params.set_no_speech_thold(NO_SPEECH_THRESHOLD);
        params.set_entropy_thold(ENTROPY_THRESHOLD);
        params.set_logprob_thold(LOGPROB_THRESHOLD);
        params.set_suppress_blank(true);
        params.set_suppress_non_speech_tokens(true);
        // Stdout belongs to the transcript; the engine prints nothing.
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| format!("Transcription failed: {}", e))?;

        let num_segments = state.full_n_segments().map_err(|e| e.to_string())?;
        debug!("engine produced {} segments", num_segments);

        let mut segments = Vec::with_capacity(num_segments as usize);
        for i in 0..num_segments {
            let text = state.full_get_segment_text(i).map_err(|e| e.to_string())?;
            // Segment timestamps are in centiseconds.
            let start = state.full_get_segment_t0(i).map_err(|e| e.to_string())?;
            let end = state.full_get_segment_t1(i).map_err(|e| e.to_string())?;
            segments.push(TranscriptSegment {
                start_ms: start.max(0) as u64 * 10,
                end_ms: end.max(0) as u64 * 10,
                text,
            });
        }

        let detection = detection_info(&state, language);
        Ok(TranscriptionOutput {
            segments,
            detection,
        })
    }
}

/// Detection metadata for the run. A pinned language is reported back with
/// probability 1.0; for auto-detection the winning language id is read from
/// the decoder state.
fn detection_info(state: &WhisperState, requested: Option<&str>) -> DetectionInfo {
    if let Some(code) = requested {
        return DetectionInfo {
            language: Some(code.to_string()),
            probability: Some(1.0),
        };
    }
    let language = state
        .full_lang_id()
        .ok()
        .and_then(whisper_rs::get_lang_str)
        .map(|s| s.to_string());
    DetectionInfo {
        language,
        probability: None,
    }
}
