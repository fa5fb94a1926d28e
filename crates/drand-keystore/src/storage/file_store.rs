//! Filesystem-backed key store.
//!
//! [`FileStore`] pins one file per category of material under a secured
//! base folder and delegates every operation to the generic
//! [`save`](super::save) / [`load`](super::load) routines. Private
//! categories go through the owner-only path, public ones do not.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::key::{DistPublic, Group, Pair, Share};
use crate::storage::fs;
use crate::storage::observer::{Category, LogObserver, StoreObserver};
use crate::storage::tomler::{load, save};

/// Name of the CLI flag selecting the base folder. Mimics gpg's option.
pub const CONFIG_FOLDER_FLAG: &str = "homedir";

/// Folder created under `$HOME` when no base folder is given.
pub const DEFAULT_FOLDER_NAME: &str = ".drand";

/// Sub-folder for the identity key pair.
pub const KEY_FOLDER_NAME: &str = "key";

/// Sub-folder for group, share and distributed key files.
pub const GROUP_FOLDER_NAME: &str = "groups";

const KEY_FILE_NAME: &str = "drand_id";
const PRIVATE_EXTENSION: &str = "private";
const PUBLIC_EXTENSION: &str = "public";
const GROUP_FILE_NAME: &str = "drand_group.toml";
const SHARE_FILE_NAME: &str = "dist_key.private";
const DIST_KEY_FILE_NAME: &str = "dist_key.public";

/// Loading and saving of the private/public material a drand node uses.
pub trait Store {
    /// Save the private key, then the public identity associated with it.
    fn save_key_pair(&self, pair: &Pair) -> Result<()>;

    /// Load the private key, then its public identity. Fails as a whole
    /// if either half cannot be loaded.
    fn load_key_pair(&self) -> Result<Pair>;

    fn save_share(&self, share: &Share) -> Result<()>;

    fn load_share(&self) -> Result<Share>;

    fn save_group(&self, group: &Group) -> Result<()>;

    fn load_group(&self) -> Result<Group>;

    fn save_dist_public(&self, dist: &DistPublic) -> Result<()>;

    fn load_dist_public(&self) -> Result<DistPublic>;
}

/// A [`Store`] keeping each category in its own file under a base folder.
///
/// Operations are synchronous and unsynchronized: the store assumes a
/// single owning process and does not coordinate concurrent writers.
pub struct FileStore {
    base_folder: PathBuf,
    key_folder: PathBuf,
    group_folder: PathBuf,
    private_key_file: PathBuf,
    public_key_file: PathBuf,
    group_file: PathBuf,
    share_file: PathBuf,
    dist_key_file: PathBuf,
    observer: Box<dyn StoreObserver>,
}

impl FileStore {
    /// Create the base folder and its sub-folders, logging saves through
    /// the `log` facade.
    ///
    /// Folders that already exist are kept; their permissions are checked
    /// and tightened.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Folder` if any folder cannot be created or
    /// secured. Callers should treat this as fatal: running without a
    /// hardened key folder risks exposing private material.
    pub fn new(base_folder: impl Into<PathBuf>) -> Result<Self> {
        Self::with_observer(base_folder, Box::new(LogObserver))
    }

    /// Like [`FileStore::new`], reporting to `observer` instead.
    pub fn with_observer(
        base_folder: impl Into<PathBuf>,
        observer: Box<dyn StoreObserver>,
    ) -> Result<Self> {
        let base_folder = secure_folder(&base_folder.into())?;
        let key_folder = secure_folder(&base_folder.join(KEY_FOLDER_NAME))?;
        let group_folder = secure_folder(&base_folder.join(GROUP_FOLDER_NAME))?;

        let key_file = key_folder.join(KEY_FILE_NAME);
        Ok(Self {
            private_key_file: key_file.with_extension(PRIVATE_EXTENSION),
            public_key_file: key_file.with_extension(PUBLIC_EXTENSION),
            group_file: group_folder.join(GROUP_FILE_NAME),
            share_file: group_folder.join(SHARE_FILE_NAME),
            dist_key_file: group_folder.join(DIST_KEY_FILE_NAME),
            base_folder,
            key_folder,
            group_folder,
            observer,
        })
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    pub fn key_folder(&self) -> &Path {
        &self.key_folder
    }

    pub fn group_folder(&self) -> &Path {
        &self.group_folder
    }

    pub fn private_key_file(&self) -> &Path {
        &self.private_key_file
    }

    pub fn public_key_file(&self) -> &Path {
        &self.public_key_file
    }

    pub fn group_file(&self) -> &Path {
        &self.group_file
    }

    pub fn share_file(&self) -> &Path {
        &self.share_file
    }

    pub fn dist_key_file(&self) -> &Path {
        &self.dist_key_file
    }

    /// File reported for `category`; for the key pair, its public half.
    pub fn path_of(&self, category: Category) -> &Path {
        match category {
            Category::KeyPair => &self.public_key_file,
            Category::Share => &self.share_file,
            Category::Group => &self.group_file,
            Category::DistPublic => &self.dist_key_file,
        }
    }

    fn saved(&self, category: Category) {
        self.observer.saved(category, self.path_of(category));
    }

    fn loaded(&self, category: Category) {
        self.observer.loaded(category, self.path_of(category));
    }
}

fn secure_folder(path: &Path) -> Result<PathBuf> {
    fs::create_secure_folder(path).map_err(|source| StoreError::Folder {
        path: path.to_path_buf(),
        source,
    })
}

impl Store for FileStore {
    fn save_key_pair(&self, pair: &Pair) -> Result<()> {
        save(&self.private_key_file, pair, true)?;
        save(&self.public_key_file, &pair.public, false)?;
        self.saved(Category::KeyPair);
        Ok(())
    }

    fn load_key_pair(&self) -> Result<Pair> {
        let mut pair = Pair::default();
        load(&self.private_key_file, &mut pair)?;
        load(&self.public_key_file, &mut pair.public)?;
        self.loaded(Category::KeyPair);
        Ok(pair)
    }

    fn save_share(&self, share: &Share) -> Result<()> {
        save(&self.share_file, share, true)?;
        self.saved(Category::Share);
        Ok(())
    }

    fn load_share(&self) -> Result<Share> {
        let mut share = Share::default();
        load(&self.share_file, &mut share)?;
        self.loaded(Category::Share);
        Ok(share)
    }

    fn save_group(&self, group: &Group) -> Result<()> {
        save(&self.group_file, group, false)?;
        self.saved(Category::Group);
        Ok(())
    }

    fn load_group(&self) -> Result<Group> {
        let mut group = Group::default();
        load(&self.group_file, &mut group)?;
        self.loaded(Category::Group);
        Ok(group)
    }

    fn save_dist_public(&self, dist: &DistPublic) -> Result<()> {
        save(&self.dist_key_file, dist, false)?;
        self.saved(Category::DistPublic);
        Ok(())
    }

    fn load_dist_public(&self) -> Result<DistPublic> {
        let mut dist = DistPublic::default();
        load(&self.dist_key_file, &mut dist)?;
        self.loaded(Category::DistPublic);
        Ok(dist)
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("base_folder", &self.base_folder)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
