//! Transcription engine and model management.

mod backend;
mod model_download;
mod whisper;

pub use backend::{join_segments, DetectionInfo, TranscriptSegment, TranscriptionOutput};
pub use model_download::{
    catalog_entry, download_model_with_progress, ensure_model, resolve_model_path, ModelSize,
    MODEL_SOURCES,
};
pub use whisper::WhisperBackend;
