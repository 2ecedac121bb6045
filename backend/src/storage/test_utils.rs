//! Test doubles shared by the storage and domain tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use shared::{Activity, Board, BoardType, DateIdentifier, FromLibrary, LibraryActivity};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::board_repository::{BoardRepository, DEFAULT_STORAGE_KEY};
use super::error::BoardStoreError;
use super::memory::MemoryKeyValueStore;
use super::traits::{BoardStorage, KeyValueStore};

pub fn date(text: &str) -> DateIdentifier {
    text.parse().expect("test date should be valid")
}

/// Board for `(base, offset)` whose date fields are consistent
pub fn sample_board(id: &str, base: &str, day_offset: u32) -> Board {
    let base_date = date(base);
    let target = base_date
        .date()
        .checked_add_days(chrono::Days::new(day_offset as u64))
        .expect("test offset in range");
    Board {
        id: id.to_string(),
        board_type: BoardType::for_offset(day_offset),
        date_iso: DateIdentifier::new(target),
        base_date_iso: base_date,
        day_offset,
        title: format!("Board {}", id),
        cards: vec![library_activity("1", "home")],
    }
}

pub fn library_activity(key: &str, name: &str) -> Activity {
    Activity::Library(LibraryActivity {
        id: Some(key.to_string()),
        from_library: FromLibrary,
        image_key: Some(key.to_string()),
        name: name.to_string(),
        category: None,
    })
}

/// In-memory key-value store whose reads and writes can be made to fail
#[derive(Clone, Default)]
pub struct FailingKeyValueStore {
    inner: MemoryKeyValueStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl FailingKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated read failure");
        }
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated write failure");
        }
        self.inner.write(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated write failure");
        }
        self.inner.remove(key).await
    }
}

/// Board store that counts mutating calls before delegating to a real
/// repository over a [`FailingKeyValueStore`].
#[derive(Clone)]
pub struct CountingBoardStore {
    pub kv: FailingKeyValueStore,
    repository: BoardRepository,
    appends: Arc<AtomicUsize>,
    replaces: Arc<AtomicUsize>,
}

impl CountingBoardStore {
    pub fn new() -> Self {
        let kv = FailingKeyValueStore::new();
        let repository = BoardRepository::new(Arc::new(kv.clone()), DEFAULT_STORAGE_KEY);
        Self {
            kv,
            repository,
            appends: Arc::new(AtomicUsize::new(0)),
            replaces: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn with_boards(boards: &[Board]) -> Self {
        let store = Self::new();
        for board in boards {
            store.repository.append(board).await.expect("seed board");
        }
        store
    }

    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoardStorage for CountingBoardStore {
    async fn list_all(&self) -> Vec<Board> {
        self.repository.list_all().await
    }

    async fn append(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.repository.append(board).await
    }

    async fn replace(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        self.repository.replace(board).await
    }

    async fn remove(&self, id: &str) -> Result<Vec<Board>, BoardStoreError> {
        self.repository.remove(id).await
    }

    async fn clear(&self) -> Result<(), BoardStoreError> {
        self.repository.clear().await
    }
}
