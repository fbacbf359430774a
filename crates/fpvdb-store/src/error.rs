use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog {path} is not a valid catalog document: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write catalog {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
