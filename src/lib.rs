//! whisper-worker: single-shot audio transcription.
//!
//! Loads a whisper.cpp model, transcribes one file, and prints the
//! transcript to standard output so a calling process can capture it
//! verbatim. All diagnostics go to standard error.

pub mod audio;
pub mod cli;
pub mod device;
pub mod logging;
pub mod paths;
pub mod transcription;
pub mod vad;

use log::{debug, info, warn};

use cli::Args;
use device::Device;
use transcription::{join_segments, DetectionInfo, WhisperBackend};

/// Run one transcription. Returns the final transcript; an empty string is
/// a valid, successful result for silent input.
pub async fn run(args: Args) -> Result<String, String> {
    if !args.audio_path.is_file() {
        return Err(format!(
            "Audio file not found: {}",
            args.audio_path.display()
        ));
    }

    let selection = device::resolve(args.device, args.compute_type);
    if selection.downgraded {
        warn!("CUDA not available, falling back to CPU (compute type forced to int8)");
    }
    info!(
        "Loading model '{}' on {} with {}",
        args.model, selection.device, selection.compute
    );

    let samples = audio::load_wav_16k_mono(&args.audio_path)?;
    debug!(
        "decoded {} samples ({:.1}s)",
        samples.len(),
        samples.len() as f64 / audio::SAMPLE_RATE as f64
    );

    let voiced = vad::filter_silence(&samples);
    if voiced.is_empty() {
        // Nothing to feed the engine; still a successful invocation.
        report_detection(&DetectionInfo {
            language: args.language.clone(),
            probability: args.language.is_some().then_some(1.0),
        });
        warn!("No speech detected in audio");
        return Ok(String::new());
    }
    if voiced.len() < samples.len() {
        debug!(
            "voice activity gate kept {} of {} samples",
            voiced.len(),
            samples.len()
        );
    }

    let models_dir = paths::models_dir()?;
    let model_path =
        transcription::ensure_model(&models_dir, args.model, selection.compute).await?;

    let use_gpu = selection.device == Device::Cuda;
    let language = args.language.clone();
    let output = tokio::task::spawn_blocking(move || {
        let backend = WhisperBackend::load(&model_path, use_gpu)?;
        backend.transcribe(&voiced, language.as_deref())
    })
    .await
    .map_err(|e| format!("Transcription task failed: {}", e))??;

    report_detection(&output.detection);

    let transcript = join_segments(&output.segments);
    if transcript.is_empty() {
        warn!("No speech detected in audio");
    }
    Ok(transcript)
}

/// Emit the detected-language line. Always printed, even when the caller
/// pinned the language, since callers read it from the diagnostic stream.
fn report_detection(detection: &DetectionInfo) {
    let language = detection.language.as_deref().unwrap_or("unknown");
    match detection.probability {
        Some(p) => info!("Detected language: {} (probability: {:.2})", language, p),
        None => info!("Detected language: {}", language),
    }
}
