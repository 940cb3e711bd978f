use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = JnlpError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum JnlpError {
    #[error("feature archive not found or unreadable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt archive {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("archive {} has no {entry} entry", path.display())]
    MissingEntry { path: PathBuf, entry: &'static str },

    #[error("bundle {} has no usable Bundle-Version: {reason}", path.display())]
    BundleVersion { path: PathBuf, reason: String },

    #[error(
        "renaming {} to {} was not successful (there are no other bundles with bsn {bsn})",
        from.display(),
        to.display()
    )]
    NoAlternates {
        bsn: String,
        from: PathBuf,
        to: PathBuf,
    },

    #[error(
        "{count} bundles with bsn {bsn} in {} share the highest version {version}; cannot pick one",
        dir.display()
    )]
    AmbiguousVersion {
        bsn: String,
        dir: PathBuf,
        version: String,
        count: usize,
    },

    #[error("feature include cycle detected at {}", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render descriptor {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("error creating file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JnlpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
