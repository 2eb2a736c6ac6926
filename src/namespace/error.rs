use thiserror::Error;

/// Failures of a single namespace operation.
///
/// Every variant carries the caller-supplied relative path so the rendered
/// message is actionable on its own.
#[derive(Error, Debug)]
pub enum NamespaceError {
    /// The path normalizes to a location outside the root.
    #[error("Access outside base directory is not allowed: {path}")]
    OutOfBounds { path: String },

    #[error("No file {path} found")]
    NotFound { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NamespaceError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    /// The relative path the failing operation was called with.
    pub fn path(&self) -> &str {
        match self {
            Self::OutOfBounds { path } | Self::NotFound { path } | Self::Io { path, .. } => path,
        }
    }
}
