//! Decoding of JSON documents with the failing JSON path in error messages.
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| DecodeError::Json {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn read_file_with_path<T: DeserializeOwned>(file: &Path) -> Result<T, DecodeError> {
    let src = std::fs::read_to_string(file)
        .map_err(|source| DecodeError::Io { file: file.to_path_buf(), source })?;
    from_str_with_path(&src)
}
