//! Writing generated audio to the local filesystem
//!
//! The target directory and file name come straight from request headers
//! and are used as given: no sandboxing or traversal checks are applied.

use std::path::{Path, PathBuf};

use crate::error::TtsError;

/// Append `.wav` unless the name already ends with it (any case)
pub fn ensure_wav_extension(file_name: &str) -> String {
    let has_extension = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if has_extension {
        file_name.to_string()
    } else {
        format!("{file_name}.wav")
    }
}

/// Create `dir` if needed and write `bytes` to `dir/file_name(.wav)`
///
/// # Errors
///
/// `FileWrite` with the underlying io error if the directory cannot be
/// created or the file cannot be written
pub async fn persist_audio(dir: &Path, file_name: &str, bytes: &[u8]) -> crate::Result<PathBuf> {
    let path = dir.join(ensure_wav_extension(file_name));

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|source| TtsError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    tokio::fs::write(&path, bytes).await.map_err(|source| TtsError::FileWrite {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "audio saved to disk");

    Ok(path)
}
