//! Error types for drand-keystore.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

use std::path::PathBuf;

/// Store error types covering every save/load operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not create, open, read, write, encode or parse a file.
    #[error("store file issues at {}: {source}", .path.display())]
    StoreFile {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// The requested object has never been saved.
    #[error("store can't find requested object at {}", .0.display())]
    Absent(PathBuf),

    /// The decoded representation does not describe a valid entity.
    #[error("invalid {entity} representation: {reason}")]
    Decode {
        entity: &'static str,
        reason: String,
    },

    /// A store folder could not be created or secured.
    #[error("store folder {} can't be secured: {source}", .path.display())]
    Folder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Underlying cause of a [`StoreError::StoreFile`].
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Parse failure. Only the message and offset are kept: the codec's
    /// own rendering quotes the input, which may be private.
    #[error("invalid syntax: {0}")]
    Syntax(String),
}

impl From<toml::de::Error> for FileError {
    fn from(e: toml::de::Error) -> Self {
        match e.span() {
            Some(span) => Self::Syntax(format!("{} (at byte {})", e.message(), span.start)),
            None => Self::Syntax(e.message().to_string()),
        }
    }
}

impl StoreError {
    /// Wrap a low-level failure for the file at `path`.
    pub(crate) fn file(path: impl Into<PathBuf>, source: impl Into<FileError>) -> Self {
        Self::StoreFile {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Build a decode error for `entity`.
    pub(crate) fn decode(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            entity,
            reason: reason.into(),
        }
    }

    /// True when the object was never saved, as opposed to a broken store.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent(_))
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, StoreError>;
