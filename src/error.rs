use std::io;
use std::path::{Path, PathBuf};

/// Every failure the converter can run into. None of them is recoverable:
/// they unwind to `main`, which reports them and exits with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Missing or invalid configuration, including missing required properties.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A property exists (or is required) but its value cannot be converted.
    #[error("property `{key}` = `{value}`: {reason}")]
    Property {
        key: String,
        value: String,
        reason: String,
    },

    /// A vertex or edge line failed tokenization.
    #[error("{}:{line}: cannot parse `{content}`: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        content: String,
        reason: String,
    },

    #[error("{}:{line}: negative weight {weight}", .path.display())]
    NegativeWeight { path: PathBuf, line: u64, weight: f64 },

    /// Both endpoints of an edge resolve to the same vertex.
    #[error("edge with the same source and destination is not allowed: vertex {vertex}")]
    SelfLoop { vertex: u64 },

    /// An algorithm parameter references a vertex absent from the graph.
    #[error("{algorithm}: the vertex {vertex} does not exist in the graph")]
    MissingVertex { algorithm: &'static str, vertex: u64 },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

impl ConvertError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach the offending path to an `io::Result`.
pub(crate) trait IoContext<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| ConvertError::io(path, e))
    }
}
