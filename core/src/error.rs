use std::path::PathBuf;

/// Errors raised while loading vault configuration or source manifests.
///
/// Frame-time operations never return this; it only covers start-up I/O.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String, VaultError> {
    std::fs::read_to_string(path).map_err(|source| VaultError::Io {
        path: path.to_path_buf(),
        source,
    })
}
