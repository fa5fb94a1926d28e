//! Integration test: a node's key store across its lifecycle.
//!
//! 1. Enrollment: generate and save the identity key pair
//! 2. Restart: reopen the store and load the identity
//! 3. DKG: save the group, the private share and the distributed key
//! 4. Membership change: replace the group wholesale

use std::time::Duration;

use drand_keystore::storage::{load, save, Category, StoreObserver};
use drand_keystore::{DistPublic, FileStore, Group, Pair, Share, Store, StoreError};

fn roster(pairs: &[Pair]) -> Vec<drand_keystore::Identity> {
    pairs.iter().map(|p| p.public.clone()).collect()
}

#[test]
fn node_lifecycle_enrollment_to_group_change() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("drand");

    // ── Step 1: Enrollment ─────────────────────────────────────────────
    let store = FileStore::new(&base).expect("store should initialize");
    assert!(
        store.load_key_pair().unwrap_err().is_absent(),
        "a fresh store has no identity"
    );

    let me = Pair::generate("127.0.0.1:8080", false).unwrap();
    store.save_key_pair(&me).unwrap();

    // ── Step 2: Restart ────────────────────────────────────────────────
    drop(store);
    let store = FileStore::new(&base).expect("store should reopen");
    let loaded = store.load_key_pair().unwrap();
    assert_eq!(loaded.public.address, "127.0.0.1:8080");
    assert_eq!(loaded, me);

    // The loaded private half still signs for the stored public half.
    let sig = loaded.sign(b"round 42");
    assert!(me.public.verify(b"round 42", &sig));

    // ── Step 3: DKG output ─────────────────────────────────────────────
    let peers: Vec<Pair> = (1..4)
        .map(|i| Pair::generate(format!("127.0.0.1:{}", 8080 + i), true).unwrap())
        .collect();
    let mut nodes = vec![me.public.clone()];
    nodes.extend(roster(&peers));
    let group =
        Group::new(nodes, Group::minimum_threshold(4), Duration::from_secs(30)).unwrap();
    store.save_group(&group).unwrap();

    let index = group.index_of(&me.public).unwrap() as u32;
    let share = Share::random(index);
    store.save_share(&share).unwrap();

    let dist = DistPublic::new(vec![[0x11; 32], [0x22; 32], [0x33; 32]]).unwrap();
    store.save_dist_public(&dist).unwrap();

    assert_eq!(store.load_group().unwrap(), group);
    assert_eq!(store.load_share().unwrap(), share);
    assert_eq!(store.load_dist_public().unwrap().key(), Some(&[0x11; 32]));

    // ── Step 4: Membership change ──────────────────────────────────────
    let smaller = Group::new(
        vec![me.public.clone(), peers[0].public.clone()],
        2,
        Duration::from_secs(30),
    )
    .unwrap();
    store.save_group(&smaller).unwrap();
    let reloaded = store.load_group().unwrap();
    assert_eq!(reloaded, smaller);
    assert_ne!(reloaded.hash(), group.hash());

    // The other categories are untouched.
    assert_eq!(store.load_key_pair().unwrap(), me);
    assert_eq!(store.load_share().unwrap(), share);
    assert_eq!(store.load_dist_public().unwrap(), dist);
}

#[test]
fn corrupted_public_identity_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store
        .save_key_pair(&Pair::generate("127.0.0.1:8080", false).unwrap())
        .unwrap();

    std::fs::write(store.public_key_file(), "this is = not [ toml").unwrap();

    let err = store.load_key_pair().unwrap_err();
    assert!(
        matches!(err, StoreError::StoreFile { .. }),
        "expected a store file error, got {err:?}"
    );
}

#[test]
fn missing_private_identity_is_absent_even_with_public_half() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store
        .save_key_pair(&Pair::generate("127.0.0.1:8080", false).unwrap())
        .unwrap();

    std::fs::remove_file(store.private_key_file()).unwrap();
    assert!(store.load_key_pair().unwrap_err().is_absent());
}

#[test]
fn group_file_is_readable_toml() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let pairs: Vec<Pair> = (0..3)
        .map(|i| Pair::generate(format!("10.0.0.{i}:4444"), false).unwrap())
        .collect();
    let group = Group::new(roster(&pairs), 2, Duration::from_secs(60)).unwrap();
    store.save_group(&group).unwrap();

    let text = std::fs::read_to_string(store.group_file()).unwrap();
    assert!(text.contains("Threshold = 2"));
    assert!(text.contains("Period = \"1m\""));
    assert!(text.contains("[[Nodes]]"));
    assert!(text.contains("Address = \"10.0.0.1:4444\""));
    assert!(text.contains(&pairs[2].public.key_hex()));
}

#[test]
fn group_exported_with_generic_save_imports_into_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("node")).unwrap();

    let pairs: Vec<Pair> = (0..4)
        .map(|i| Pair::generate(format!("10.0.0.{i}:4444"), false).unwrap())
        .collect();
    let group = Group::new(roster(&pairs), 3, Duration::from_secs(10)).unwrap();

    // A coordinator hands out the group as a plain file.
    let exported = dir.path().join("group.toml");
    save(&exported, &group, false).unwrap();

    let mut imported = Group::default();
    load(&exported, &mut imported).unwrap();
    store.save_group(&imported).unwrap();

    assert_eq!(store.load_group().unwrap(), group);
}

struct Silent;

impl StoreObserver for Silent {
    fn saved(&self, _category: Category, _path: &std::path::Path) {}
}

#[test]
fn store_works_behind_trait_object_with_custom_observer() {
    let dir = tempfile::tempdir().unwrap();
    let store: Box<dyn Store> =
        Box::new(FileStore::with_observer(dir.path(), Box::new(Silent)).unwrap());

    let share = Share::new(7, [0x42; 32]);
    store.save_share(&share).unwrap();
    let loaded = store.load_share().unwrap();
    assert_eq!(loaded.index(), 7);
    assert_eq!(loaded.secret(), &[0x42; 32]);
}
