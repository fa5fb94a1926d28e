//! drand-keystore — persistence for a drand participant's key material.
//!
//! Stores the long-term identity key pair, the secret share produced by
//! distributed key generation, the group configuration and the group's
//! distributed public key as TOML files, with owner-only permissions on
//! everything private.

pub mod crypto;
pub mod error;
pub mod key;
pub mod storage;

// Re-export primary types
pub use error::{FileError, Result, StoreError};
pub use key::{DistPublic, Group, Identity, Pair, Share};
pub use storage::{Category, FileStore, LogObserver, Store, StoreObserver, Tomler};
