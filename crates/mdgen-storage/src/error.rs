//! Error types for mdgen-storage.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact is unknown, expired, or already purged
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persistence layer rejected a write
    #[error("Failed to store artifact: {0}")]
    StorageWrite(String),

    /// A single purge failed during a sweep
    #[error("Failed to purge artifact {id}: {source}")]
    SweepEntry {
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn storage_write(context: &str, err: std::io::Error) -> Self {
        Self::StorageWrite(format!("{}: {}", context, err))
    }
}
