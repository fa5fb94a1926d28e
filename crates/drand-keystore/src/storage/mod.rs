//! Storage layer for identity keys, shares and group files.
//!
//! # Directory layout
//!
//! By convention the default root is `~/.drand/`:
//!
//! ```text
//! ~/.drand/                     0700
//! ├── key/                      0700
//! │   ├── drand_id.private      0600
//! │   └── drand_id.public
//! └── groups/                   0700
//!     ├── drand_group.toml
//!     ├── dist_key.private      0600
//!     └── dist_key.public
//! ```
//!
//! # Modules
//!
//! - [`tomler`] — the `Tomler` capability and generic `save`/`load`.
//! - [`fs`] — owner-only folder and file creation.
//! - [`file_store`] — the `Store` trait and its filesystem implementation.
//! - [`observer`] — hooks the store reports saves and loads to.

pub mod file_store;
pub mod fs;
pub mod observer;
pub mod tomler;

// Re-export the primary types so callers can write `storage::FileStore`
// without reaching into sub-modules.
pub use file_store::{
    FileStore, Store, CONFIG_FOLDER_FLAG, DEFAULT_FOLDER_NAME, GROUP_FOLDER_NAME, KEY_FOLDER_NAME,
};
pub use observer::{Category, LogObserver, StoreObserver};
pub use tomler::{load, save, Tomler};
