//! Secure filesystem primitives.
//!
//! Folders holding key material are owner-only (`0o700`) and private files
//! are owner read/write (`0o600`). On Unix the mode is passed to the
//! creating syscall itself, so a file is never visible with wider bits.
//! Other platforms fall back to ordinary creation.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};

/// Mode for folders holding key material.
pub const SECURE_FOLDER_MODE: u32 = 0o700;

/// Mode for files holding private material.
pub const SECURE_FILE_MODE: u32 = 0o600;

/// Create `path` (and missing parents) as owner-only folders.
///
/// If the folder already exists its permissions are checked and tightened
/// when they grant anything to group or others.
pub fn create_secure_folder(path: &Path) -> io::Result<PathBuf> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(SECURE_FOLDER_MODE);
    builder.create(path)?;

    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        ));
    }

    #[cfg(unix)]
    {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            log::warn!(
                "fs: tightening permissions of {} from {:o} to {:o}",
                path.display(),
                mode & 0o777,
                SECURE_FOLDER_MODE
            );
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(SECURE_FOLDER_MODE))?;
        }
    }

    Ok(path.to_path_buf())
}

/// Create or truncate `path` as an owner-only file open for writing.
///
/// A pre-existing file is truncated and tightened before the handle is
/// returned, so nothing written through it is exposed by old bits.
pub fn create_secure_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(SECURE_FILE_MODE);
    let file = options.open(path)?;

    #[cfg(unix)]
    {
        let mode = file.metadata()?.permissions().mode();
        if mode & 0o077 != 0 {
            log::warn!(
                "fs: tightening permissions of {} from {:o} to {:o}",
                path.display(),
                mode & 0o777,
                SECURE_FILE_MODE
            );
            file.set_permissions(std::fs::Permissions::from_mode(SECURE_FILE_MODE))?;
        }
    }

    Ok(file)
}

/// Create or truncate `path` with default permissions.
pub fn create_file(path: &Path) -> io::Result<File> {
    File::create(path)
}
