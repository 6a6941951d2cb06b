use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

/// Where a tree came from.
///
/// Only root nodes carry a source; every other node inherits its root's.
/// Structural node ids are grounded in the id of this source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A file on disk
    File(PathBuf),
    /// A caller-chosen identifier (a URI, a repository key, ...)
    Named(String),
    /// An in-memory tree with no natural name
    Synthetic(Uuid),
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// A fresh source with a random v4 identifier.
    pub fn synthetic() -> Self {
        Self::Synthetic(Uuid::new_v4())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Named(name) => f.write_str(name),
            Source::Synthetic(uuid) => write!(f, "synthetic:{uuid}"),
        }
    }
}
