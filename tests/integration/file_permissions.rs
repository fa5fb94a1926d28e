//! Integration test: permission hardening of the on-disk layout.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use drand_keystore::storage::fs::{SECURE_FILE_MODE, SECURE_FOLDER_MODE};
use drand_keystore::{DistPublic, FileStore, Group, Pair, Share, Store};

fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

fn populated_store(base: &Path) -> FileStore {
    let store = FileStore::new(base).unwrap();
    let pair = Pair::generate("127.0.0.1:8080", false).unwrap();
    store.save_key_pair(&pair).unwrap();
    store.save_share(&Share::random(0)).unwrap();
    store
        .save_group(&Group::new(vec![pair.public.clone()], 1, Default::default()).unwrap())
        .unwrap();
    store
        .save_dist_public(&DistPublic::new(vec![[5u8; 32]]).unwrap())
        .unwrap();
    store
}

#[test]
fn private_material_is_owner_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(&dir.path().join("drand"));

    assert_eq!(mode(store.private_key_file()), SECURE_FILE_MODE);
    assert_eq!(mode(store.share_file()), SECURE_FILE_MODE);
}

#[test]
fn folders_are_owner_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(&dir.path().join("drand"));

    assert_eq!(mode(store.base_folder()), SECURE_FOLDER_MODE);
    assert_eq!(mode(store.key_folder()), SECURE_FOLDER_MODE);
    assert_eq!(mode(store.group_folder()), SECURE_FOLDER_MODE);
}

#[test]
fn loose_existing_folders_are_tightened_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("drand");
    std::fs::create_dir_all(base.join("key")).unwrap();
    std::fs::set_permissions(&base, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::set_permissions(base.join("key"), std::fs::Permissions::from_mode(0o777)).unwrap();

    let store = FileStore::new(&base).unwrap();
    assert_eq!(mode(store.base_folder()), SECURE_FOLDER_MODE);
    assert_eq!(mode(store.key_folder()), SECURE_FOLDER_MODE);
}

#[test]
fn resaving_over_a_loose_private_file_tightens_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(&dir.path().join("drand"));
    std::fs::set_permissions(store.share_file(), std::fs::Permissions::from_mode(0o644)).unwrap();

    let share = Share::random(1);
    store.save_share(&share).unwrap();

    assert_eq!(mode(store.share_file()), SECURE_FILE_MODE);
    assert_eq!(store.load_share().unwrap(), share);
}

#[test]
fn unreadable_private_file_is_store_file_error_not_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(&dir.path().join("drand"));
    std::fs::set_permissions(store.share_file(), std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe then.
    if std::fs::read(store.share_file()).is_ok() {
        return;
    }

    let err = store.load_share().unwrap_err();
    assert!(!err.is_absent(), "permission failure must not look absent");
}
