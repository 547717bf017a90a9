//! Whisper model catalog and Hugging Face download.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;

use crate::device::ComputeType;

/// Model source: (artifact_id, hf_repo, hf_filename, local_filename)
pub const MODEL_SOURCES: &[(&str, &str, &str, &str)] = &[
    // ggerganov, full precision (f16)
    (
        "tiny",
        "ggerganov/whisper.cpp",
        "ggml-tiny.bin",
        "ggml-tiny.bin",
    ),
    (
        "base",
        "ggerganov/whisper.cpp",
        "ggml-base.bin",
        "ggml-base.bin",
    ),
    (
        "small",
        "ggerganov/whisper.cpp",
        "ggml-small.bin",
        "ggml-small.bin",
    ),
    (
        "medium",
        "ggerganov/whisper.cpp",
        "ggml-medium.bin",
        "ggml-medium.bin",
    ),
    (
        "large-v2",
        "ggerganov/whisper.cpp",
        "ggml-large-v2.bin",
        "ggml-large-v2.bin",
    ),
    (
        "large-v3",
        "ggerganov/whisper.cpp",
        "ggml-large-v3.bin",
        "ggml-large-v3.bin",
    ),
    // ggerganov, q8_0 quantized
    (
        "tiny-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-tiny-q8_0.bin",
        "ggml-tiny-q8_0.bin",
    ),
    (
        "base-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-base-q8_0.bin",
        "ggml-base-q8_0.bin",
    ),
    (
        "small-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-small-q8_0.bin",
        "ggml-small-q8_0.bin",
    ),
    (
        "medium-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-medium-q8_0.bin",
        "ggml-medium-q8_0.bin",
    ),
    (
        "large-v2-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-large-v2-q8_0.bin",
        "ggml-large-v2-q8_0.bin",
    ),
    (
        "large-v3-q8_0",
        "ggerganov/whisper.cpp",
        "ggml-large-v3-q8_0.bin",
        "ggml-large-v3-q8_0.bin",
    ),
    // distil-whisper (no quantized distribution; int8 falls back to this file)
    (
        "distil-large-v3",
        "distil-whisper/distil-large-v3-ggml",
        "ggml-distil-large-v3.bin",
        "ggml-distil-large-v3.bin",
    ),
];

/// Whisper model size, as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    LargeV2,
    LargeV3,
    DistilLargeV3,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::LargeV2 => "large-v2",
            ModelSize::LargeV3 => "large-v3",
            ModelSize::DistilLargeV3 => "distil-large-v3",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the catalog entry for a size and precision. int8 prefers the q8_0
/// quantized artifact; sizes without one use the full-precision file.
pub fn catalog_entry(
    model: ModelSize,
    compute: ComputeType,
) -> Result<&'static (&'static str, &'static str, &'static str, &'static str), String> {
    if compute == ComputeType::Int8 {
        let quantized = format!("{}-q8_0", model.as_str());
        if let Some(entry) = MODEL_SOURCES.iter().find(|(id, _, _, _)| *id == quantized) {
            return Ok(entry);
        }
    }
    MODEL_SOURCES
        .iter()
        .find(|(id, _, _, _)| *id == model.as_str())
        .ok_or_else(|| format!("Unknown model: {}", model))
}

/// Resolve a catalog entry to a local path if the model file exists.
pub fn resolve_model_path(models_dir: &Path, local_filename: &str) -> Option<PathBuf> {
    let path = models_dir.join(local_filename);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Download with progress callback. Callback receives (bytes_downloaded, total_bytes).
/// total_bytes is None if Content-Length header is missing.
pub async fn download_model_with_progress<F>(
    models_dir: &Path,
    model: ModelSize,
    compute: ComputeType,
    mut on_progress: F,
) -> Result<PathBuf, String>
where
    F: FnMut(u64, Option<u64>) + Send,
{
    use futures_util::StreamExt;

    let (_, hf_repo, hf_filename, local_filename) = catalog_entry(model, compute)?;

    let url = format!(
        "https://huggingface.co/{}/resolve/main/{}",
        hf_repo, hf_filename
    );
    let output_path = models_dir.join(local_filename);

    if output_path.exists() {
        return Ok(output_path);
    }

    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("Download failed: {}", response.status()));
    }

    let total_bytes = response.content_length();
    let mut stream = response.bytes_stream();
    // Write to a partial file first so an aborted download is never mistaken
    // for a complete model.
    let partial_path = output_path.with_extension("partial");
    let mut file = std::fs::File::create(&partial_path).map_err(|e| e.to_string())?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|e| e.to_string())?;
        file.write_all(&bytes).map_err(|e| e.to_string())?;
        downloaded += bytes.len() as u64;
        on_progress(downloaded, total_bytes);
    }

    std::fs::rename(&partial_path, &output_path).map_err(|e| e.to_string())?;
    Ok(output_path)
}

/// Resolve the model file for a size/precision, downloading it from
/// Hugging Face on first use. Progress is logged to the diagnostic stream.
pub async fn ensure_model(
    models_dir: &Path,
    model: ModelSize,
    compute: ComputeType,
) -> Result<PathBuf, String> {
    let (_, _, _, local_filename) = catalog_entry(model, compute)?;
    if let Some(path) = resolve_model_path(models_dir, local_filename) {
        return Ok(path);
    }

    info!("Model '{}' not found locally, downloading", model);
    let mut last_logged: u64 = 0;
    let path = download_model_with_progress(models_dir, model, compute, |done, total| {
        match total {
            Some(total) if total > 0 => {
                let pct = done * 100 / total;
                if pct >= last_logged + 10 {
                    last_logged = pct - pct % 10;
                    info!("Downloading model: {}%", last_logged);
                }
            }
            _ => {
                // No Content-Length; log every 100 MiB instead.
                if done >= last_logged + 100 * 1024 * 1024 {
                    last_logged = done;
                    info!("Downloading model: {} MiB", done / (1024 * 1024));
                }
            }
        }
    })
    .await?;
    info!("Model saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_size_resolves_for_every_precision() {
        let sizes = [
            ModelSize::Tiny,
            ModelSize::Base,
            ModelSize::Small,
            ModelSize::Medium,
            ModelSize::LargeV2,
            ModelSize::LargeV3,
            ModelSize::DistilLargeV3,
        ];
        let precisions = [ComputeType::Int8, ComputeType::Float16, ComputeType::Float32];
        for size in sizes {
            for compute in precisions {
                assert!(catalog_entry(size, compute).is_ok(), "{} {}", size, compute);
            }
        }
    }

    #[test]
    fn int8_selects_quantized_artifact() {
        let (id, _, _, local) = catalog_entry(ModelSize::Small, ComputeType::Int8).unwrap();
        assert_eq!(*id, "small-q8_0");
        assert_eq!(*local, "ggml-small-q8_0.bin");
    }

    #[test]
    fn float_precisions_select_full_file() {
        for compute in [ComputeType::Float16, ComputeType::Float32] {
            let (id, _, _, local) = catalog_entry(ModelSize::Small, compute).unwrap();
            assert_eq!(*id, "small");
            assert_eq!(*local, "ggml-small.bin");
        }
    }

    #[test]
    fn distil_int8_falls_back_to_full_precision_file() {
        let (id, repo, _, _) = catalog_entry(ModelSize::DistilLargeV3, ComputeType::Int8).unwrap();
        assert_eq!(*id, "distil-large-v3");
        assert_eq!(*repo, "distil-whisper/distil-large-v3-ggml");
    }

    #[test]
    fn resolve_finds_only_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(resolve_model_path(tmp.path(), "ggml-small.bin").is_none());
        std::fs::write(tmp.path().join("ggml-small.bin"), b"stub").unwrap();
        let path = resolve_model_path(tmp.path(), "ggml-small.bin").unwrap();
        assert!(path.ends_with("ggml-small.bin"));
    }
}
