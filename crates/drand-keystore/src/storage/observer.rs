//! Store observers — where the store reports what it persisted.

use std::fmt;
use std::path::Path;

/// Logical category of stored material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    KeyPair,
    Share,
    Group,
    DistPublic,
}

impl Category {
    /// All categories, in store layout order.
    pub const ALL: [Category; 4] = [
        Category::KeyPair,
        Category::Share,
        Category::Group,
        Category::DistPublic,
    ];

    /// True for categories holding private material.
    pub fn is_private(self) -> bool {
        matches!(self, Category::KeyPair | Category::Share)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::KeyPair => "key pair",
            Category::Share => "private share",
            Category::Group => "group",
            Category::DistPublic => "distributed public key",
        };
        f.pad(name)
    }
}

/// Receives notifications from a store after successful operations.
pub trait StoreObserver: Send + Sync {
    /// `category` was written; `path` is its public-facing file.
    fn saved(&self, category: Category, path: &Path);

    /// `category` was read back from `path`.
    fn loaded(&self, _category: Category, _path: &Path) {}
}

/// Forwards store events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StoreObserver for LogObserver {
    fn saved(&self, category: Category, path: &Path) {
        log::info!("crypto store: saved {category} in {}", path.display());
    }

    fn loaded(&self, category: Category, path: &Path) {
        log::debug!("crypto store: loaded {category} from {}", path.display());
    }
}
