use super::*;

struct BrokenStorage;

impl TokenStorage for BrokenStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io { path: PathBuf::from("/broken"), source: std::io::Error::other("unreadable") })
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io { path: PathBuf::from("/broken"), source: std::io::Error::other("read-only") })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io { path: PathBuf::from("/broken"), source: std::io::Error::other("read-only") })
    }
}

#[test]
fn set_then_get_returns_token() {
    let store = TokenStore::in_memory();
    for token in ["tok1", "tok2", "a.b.c"] {
        store.set(Some(token));
        assert_eq!(store.get().as_deref(), Some(token));
        assert!(store.is_present());
    }
}

#[test]
fn set_none_clears_memory_and_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let store = TokenStore::new(storage.clone(), "accessToken");
    store.set(Some("tok1"));
    assert_eq!(storage.get("accessToken").as_deref(), Some("tok1"));

    store.set(None);
    assert!(!store.is_present());
    assert!(store.get().is_none());
    assert!(storage.get("accessToken").is_none());
}

#[test]
fn empty_token_is_treated_as_absent() {
    let storage = Arc::new(MemoryStorage::new());
    let store = TokenStore::new(storage.clone(), "accessToken");
    store.set(Some(""));
    assert!(!store.is_present());
    assert!(storage.get("accessToken").is_none());
}

#[test]
fn seeded_once_from_persisted_storage() {
    let storage = Arc::new(MemoryStorage::with_entry("accessToken", "persisted"));
    let store = TokenStore::new(storage.clone(), "accessToken");
    assert_eq!(store.get().as_deref(), Some("persisted"));

    // Later storage changes are not picked up; memory is the source of truth.
    storage.save("accessToken", "changed-behind-our-back").unwrap();
    assert_eq!(store.get().as_deref(), Some("persisted"));
}

#[test]
fn empty_persisted_value_is_ignored() {
    let storage = Arc::new(MemoryStorage::with_entry("accessToken", ""));
    let store = TokenStore::new(storage, "accessToken");
    assert!(!store.is_present());
}

#[test]
fn clones_share_the_same_token() {
    let store = TokenStore::in_memory();
    let other = store.clone();
    store.set(Some("shared"));
    assert_eq!(other.get().as_deref(), Some("shared"));
    other.clear();
    assert!(!store.is_present());
}

#[test]
fn storage_failure_keeps_memory_authoritative() {
    let store = TokenStore::new(Arc::new(BrokenStorage), "accessToken");
    assert!(!store.is_present());
    store.set(Some("tok1"));
    assert_eq!(store.get().as_deref(), Some("tok1"));
    store.set(None);
    assert!(!store.is_present());
}

#[test]
fn file_storage_round_trip_and_remove() {
    let tmp = tempfile::TempDir::new().unwrap();
    let storage = FileStorage::new(tmp.path().join("state"));
    assert_eq!(storage.load("accessToken").unwrap(), None);

    storage.save("accessToken", "tok1").unwrap();
    assert_eq!(storage.load("accessToken").unwrap().as_deref(), Some("tok1"));

    storage.remove("accessToken").unwrap();
    assert_eq!(storage.load("accessToken").unwrap(), None);
    storage.remove("accessToken").unwrap();
}

#[test]
fn file_storage_survives_a_new_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    let first = TokenStore::new(Arc::new(FileStorage::new(tmp.path())), "accessToken");
    first.set(Some("tok1"));

    let restarted = TokenStore::new(Arc::new(FileStorage::new(tmp.path())), "accessToken");
    assert_eq!(restarted.get().as_deref(), Some("tok1"));
}

#[test]
fn entry_path_stays_inside_directory() {
    let storage = FileStorage::new("/state");
    assert_eq!(storage.entry_path("accessToken"), PathBuf::from("/state/accessToken"));
    assert_eq!(storage.entry_path("../../etc/passwd"), PathBuf::from("/state/_.._etc_passwd"));
    assert_eq!(storage.entry_path(""), PathBuf::from("/state/token"));
}

#[cfg(unix)]
#[test]
fn file_storage_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::TempDir::new().unwrap();
    let storage = FileStorage::new(tmp.path());
    storage.save("accessToken", "tok1").unwrap();
    let mode = std::fs::metadata(storage.entry_path("accessToken")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
