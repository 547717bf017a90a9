//! Path utilities for the models directory.

use std::path::PathBuf;

/// Get the models directory, creating it if necessary.
/// Defaults to the platform data dir (e.g. ~/.local/share/whisper-worker/models);
/// WHISPER_WORKER_MODELS_DIR overrides it.
pub fn models_dir() -> Result<PathBuf, String> {
    let dir = match std::env::var("WHISPER_WORKER_MODELS_DIR") {
        Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
        _ => dirs::data_dir()
            .ok_or("Could not determine the user data directory")?
            .join("whisper-worker")
            .join("models"),
    };
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_and_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let custom = tmp.path().join("models-here");
        std::env::set_var("WHISPER_WORKER_MODELS_DIR", &custom);
        let dir = models_dir().unwrap();
        std::env::remove_var("WHISPER_WORKER_MODELS_DIR");
        assert_eq!(dir, custom);
        assert!(custom.is_dir());
    }
}
