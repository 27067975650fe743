//! JSON-file record store
//!
//! A single readable/writable container of structured records, persisted as
//! one JSON array. The store is the sole durable owner of its records; no
//! other component caches them across calls.
//!
//! Every operation takes the store's lock for its whole read-modify-write
//! cycle, so callers never observe an interleaved partial update. Writes go
//! to a temporary file first and are renamed into place, so an I/O failure
//! leaves the previous durable state untouched.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

use crate::core::StorageError;

pub struct JsonStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the store, creating the backing file as an empty set if it does
    /// not exist yet. Safe to call from several tasks racing on first use:
    /// losing the create race is not an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await?;
            }
        }
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                use tokio::io::AsyncWriteExt;
                file.write_all(b"[]").await?;
                debug!("created empty record store at {}", path.display());
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
        Ok(JsonStore {
            path,
            lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    /// Append one record to the set.
    pub async fn append(&self, record: T) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await?;
        records.push(record);
        self.write_unlocked(&records).await
    }

    /// Read the full record set in insertion order.
    pub async fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    /// Apply `mutate` to every record matching `predicate`, returning how
    /// many matched. The file is rewritten only when something changed.
    pub async fn update_where<P, M>(&self, predicate: P, mutate: M) -> Result<usize, StorageError>
    where
        P: Fn(&T) -> bool,
        M: Fn(&mut T),
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await?;
        let mut updated = 0;
        for record in records.iter_mut() {
            if predicate(record) {
                mutate(record);
                updated += 1;
            }
        }
        if updated > 0 {
            self.write_unlocked(&records).await?;
        }
        Ok(updated)
    }

    /// Remove every record matching `predicate`, returning how many were
    /// removed.
    pub async fn remove_where<P>(&self, predicate: P) -> Result<usize, StorageError>
    where
        P: Fn(&T) -> bool,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await?;
        let before = records.len();
        records.retain(|record| !predicate(record));
        let removed = before - records.len();
        if removed > 0 {
            self.write_unlocked(&records).await?;
        }
        Ok(removed)
    }

    async fn read_unlocked(&self) -> Result<Vec<T>, StorageError> {
        let raw = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write_unlocked(&self, records: &[T]) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
        done: bool,
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
            done: false,
        }
    }

    #[tokio::test]
    async fn test_open_creates_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.json");

        let store: JsonStore<Note> = JsonStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.read_all().await.unwrap().is_empty());

        // Opening again must not truncate existing data.
        store.append(note("a", "first")).await.unwrap();
        let reopened: JsonStore<Note> = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let store: JsonStore<Note> = JsonStore::open(&path).await.unwrap();
        let notes: Vec<Note> = (0..5).map(|i| note(&i.to_string(), "body")).collect();
        for n in &notes {
            store.append(n.clone()).await.unwrap();
        }

        let reopened: JsonStore<Note> = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.read_all().await.unwrap(), notes);
    }

    #[tokio::test]
    async fn test_update_where_counts_matches() {
        let dir = tempdir().unwrap();
        let store: JsonStore<Note> = JsonStore::open(dir.path().join("notes.json"))
            .await
            .unwrap();
        store.append(note("a", "x")).await.unwrap();
        store.append(note("b", "x")).await.unwrap();

        let updated = store
            .update_where(|n| n.id == "a", |n| n.done = true)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let missed = store
            .update_where(|n| n.id == "zzz", |n| n.done = true)
            .await
            .unwrap();
        assert_eq!(missed, 0);

        let all = store.read_all().await.unwrap();
        assert!(all.iter().find(|n| n.id == "a").unwrap().done);
        assert!(!all.iter().find(|n| n.id == "b").unwrap().done);
    }

    #[tokio::test]
    async fn test_remove_where() {
        let dir = tempdir().unwrap();
        let store: JsonStore<Note> = JsonStore::open(dir.path().join("notes.json"))
            .await
            .unwrap();
        store.append(note("a", "x")).await.unwrap();
        store.append(note("b", "x")).await.unwrap();

        assert_eq!(store.remove_where(|n| n.id == "a").await.unwrap(), 1);
        assert_eq!(store.remove_where(|n| n.id == "a").await.unwrap(), 0);
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error_not_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let store: JsonStore<Note> = JsonStore::open(&path).await.unwrap();

        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            store.read_all().await,
            Err(StorageError::Serde(_))
        ));
    }
}
