use std::io;
use std::path::PathBuf;

/// Failures surfaced while producing a digest for one input.
///
/// Any byte sequence is valid input, so every variant describes a problem with the byte
/// source rather than with the data.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("read failed: {source}")]
    InputRead {
        #[source]
        source: io::Error,
    },
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is a directory", path.display())]
    IsDirectory { path: PathBuf },
    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm {0:?} (expected md5 or sha1)")]
pub struct ParseAlgorithmError(pub(crate) String);
