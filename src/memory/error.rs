use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("chat memory I/O failed for key '{key}' ({}): {source}", .path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document exists but is not a valid message list.
    #[error("corrupt chat memory for key '{key}' ({}): {source}", .path.display())]
    Corrupt {
        key: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize chat memory for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
