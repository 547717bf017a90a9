//! Command-line surface of the worker.

use std::path::PathBuf;

use clap::Parser;

use crate::device::{ComputeType, Device};
use crate::transcription::ModelSize;

/// Transcribe an audio file and print the text to standard output.
///
/// Diagnostics go to standard error so a calling process can capture stdout
/// verbatim as the transcript.
#[derive(Debug, Parser)]
#[command(name = "whisper-worker", about = "Transcribe audio using whisper.cpp")]
pub struct Args {
    /// Path to the audio file (WAV).
    pub audio_path: PathBuf,

    /// Whisper model size.
    #[arg(long, value_enum, default_value_t = ModelSize::Small)]
    pub model: ModelSize,

    /// Language code (e.g. en, es, fr). Auto-detect if not specified.
    #[arg(long)]
    pub language: Option<String>,

    /// Device to run inference on.
    #[arg(long, value_enum, default_value_t = Device::Cuda)]
    pub device: Device,

    /// Numeric precision for inference.
    #[arg(long, value_enum, default_value_t = ComputeType::Int8)]
    pub compute_type: ComputeType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_worker_contract() {
        let args = Args::try_parse_from(["whisper-worker", "audio.wav"]).unwrap();
        assert_eq!(args.audio_path, PathBuf::from("audio.wav"));
        assert_eq!(args.model, ModelSize::Small);
        assert_eq!(args.language, None);
        assert_eq!(args.device, Device::Cuda);
        assert_eq!(args.compute_type, ComputeType::Int8);
    }

    #[test]
    fn accepts_full_flag_set() {
        let args = Args::try_parse_from([
            "whisper-worker",
            "talk.wav",
            "--model",
            "distil-large-v3",
            "--language",
            "en",
            "--device",
            "cpu",
            "--compute-type",
            "float16",
        ])
        .unwrap();
        assert_eq!(args.model, ModelSize::DistilLargeV3);
        assert_eq!(args.language.as_deref(), Some("en"));
        assert_eq!(args.device, Device::Cpu);
        assert_eq!(args.compute_type, ComputeType::Float16);
    }

    #[test]
    fn rejects_unknown_model_and_device() {
        assert!(Args::try_parse_from(["whisper-worker", "a.wav", "--model", "huge"]).is_err());
        assert!(Args::try_parse_from(["whisper-worker", "a.wav", "--device", "tpu"]).is_err());
    }

    #[test]
    fn audio_path_is_required() {
        assert!(Args::try_parse_from(["whisper-worker"]).is_err());
    }
}
