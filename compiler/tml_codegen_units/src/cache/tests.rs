#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn store_and_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = CguObjectCache::open(dir.path()).unwrap();
    assert!(cache.is_empty());

    let fp = Fingerprint::new(0xabc);
    assert_eq!(cache.lookup(fp), None);

    let path = cache.store("app.cgu0", fp, b"object").unwrap();
    assert_eq!(path, dir.path().join("0000000000000abc.o"));
    assert_eq!(cache.lookup(fp), Some(path.clone()));
    assert_eq!(std::fs::read(path).unwrap(), b"object");
    assert_eq!(cache.fingerprint_of("app.cgu0"), Some(fp));
    assert_eq!(cache.len(), 1);
}

#[test]
fn manifest_persists() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cache = CguObjectCache::open(dir.path()).unwrap();
        cache.store("app.cgu1", Fingerprint::new(7), b"o").unwrap();
        cache.save().unwrap();
    }

    let cache = CguObjectCache::open(dir.path()).unwrap();
    assert_eq!(cache.fingerprint_of("app.cgu1"), Some(Fingerprint::new(7)));
    assert!(cache.lookup(Fingerprint::new(7)).is_some());
}

#[test]
fn corrupt_manifest_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(MANIFEST_FILE), b"\x01").unwrap();

    let cache = CguObjectCache::open(dir.path()).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn replaced_object_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = CguObjectCache::open(dir.path()).unwrap();
    let (old, new) = (Fingerprint::new(1), Fingerprint::new(2));

    let old_path = cache.store("app.cgu0", old, b"v1").unwrap();
    cache.store("app.cgu0", new, b"v2").unwrap();
    assert!(old_path.exists());

    assert_eq!(cache.prune(), 1);
    assert!(!old_path.exists());
    assert_eq!(cache.lookup(old), None);
    assert_eq!(cache.fingerprint_of("app.cgu0"), Some(new));
}

#[test]
fn shared_object_survives_replacement() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = CguObjectCache::open(dir.path()).unwrap();
    let shared = Fingerprint::new(5);

    cache.store("a.cgu0", shared, b"same").unwrap();
    cache.remember("b.cgu0", shared);
    cache.store("a.cgu0", Fingerprint::new(6), b"other").unwrap();

    assert_eq!(cache.prune(), 0);
    assert!(cache.lookup(shared).is_some());
    assert_eq!(cache.len(), 2);
}

#[test]
fn object_left_by_one_unit_stays_available_until_prune() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = CguObjectCache::open(dir.path()).unwrap();
    let (first, second, third) = (Fingerprint::new(1), Fingerprint::new(2), Fingerprint::new(3));
    cache.store("app.cgu0", first, b"one").unwrap();
    cache.store("app.cgu1", third, b"three").unwrap();

    // cgu0 moves on; cgu1 then picks up what cgu0 left behind.
    cache.store("app.cgu0", second, b"two").unwrap();
    assert!(cache.lookup(first).is_some());
    cache.remember("app.cgu1", first);

    assert_eq!(cache.prune(), 1);
    assert!(cache.lookup(first).is_some());
    assert!(cache.lookup(second).is_some());
    assert_eq!(cache.lookup(third), None);
}

#[test]
fn clear_removes_every_object() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = CguObjectCache::open(dir.path()).unwrap();
    let path = cache.store("app.cgu0", Fingerprint::new(3), b"o").unwrap();

    cache.clear().unwrap();
    assert!(cache.is_empty());
    assert!(!path.exists());
    assert!(CguObjectCache::open(dir.path()).unwrap().is_empty());
}
