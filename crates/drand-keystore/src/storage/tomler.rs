//! Generic TOML persistence for any storable entity.
//!
//! An entity implements [`Tomler`] to describe its on-disk view; [`save`]
//! and [`load`] move that view between memory and a single file without
//! knowing the entity's concrete shape.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};
use crate::storage::fs;

/// An entity that can be (un)marshalled into/from a TOML document.
///
/// The associated `Toml` type is the decode target: the codec builds a
/// fresh value of that shape, which is then handed to [`Tomler::from_toml`].
pub trait Tomler {
    /// Serializable view of the entity.
    type Toml: Serialize + DeserializeOwned;

    /// Human-readable entity name, used in logs and decode errors.
    const NAME: &'static str;

    /// Produce the view written to disk.
    fn to_toml(&self) -> Self::Toml;

    /// Populate `self` from a decoded view.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the view is structurally invalid for
    /// this entity.
    fn from_toml(&mut self, value: Self::Toml) -> Result<()>;

    /// Reject values [`Tomler::from_toml`] would refuse to load back.
    ///
    /// Called by [`save`] before anything is encoded or created.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Encode `entity` into the file at `path`, replacing any previous content.
///
/// With `secure` set, the file is created owner-only before any byte is
/// written (see [`fs::create_secure_file`]).
///
/// # Errors
///
/// Returns `StoreError::Decode` if the entity could not be loaded back,
/// `StoreError::StoreFile` if encoding, creating or writing fails.
pub fn save<T: Tomler>(path: &Path, entity: &T, secure: bool) -> Result<()> {
    entity.validate()?;

    // The encoded text may carry private material.
    let text = Zeroizing::new(
        toml::to_string(&entity.to_toml()).map_err(|e| StoreError::file(path, e))?,
    );

    let created = if secure {
        fs::create_secure_file(path)
    } else {
        fs::create_file(path)
    };
    let mut file = match created {
        Ok(file) => file,
        Err(e) => {
            log::info!("store: can't save {} to {}: {e}", T::NAME, path.display());
            return Err(StoreError::file(path, e));
        }
    };

    file.write_all(text.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| StoreError::file(path, e))
}

/// Decode the file at `path` into `entity`.
///
/// On error `entity` is left in an unspecified state and must be discarded.
///
/// # Errors
///
/// Returns `StoreError::Absent` if the file does not exist,
/// `StoreError::StoreFile` if it cannot be read or is not valid TOML, or
/// the `StoreError::Decode` raised by the entity.
pub fn load<T: Tomler>(path: &Path, entity: &mut T) -> Result<()> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => Zeroizing::new(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::Absent(path.to_path_buf()));
        }
        Err(e) => return Err(StoreError::file(path, e)),
    };

    let value: T::Toml = toml::from_str(&text).map_err(|e| StoreError::file(path, e))?;
    entity.from_toml(value)
}
