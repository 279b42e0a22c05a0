//! InMemoryCollection - BTreeMap-backed document store for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, Cursor, Document, StoreError, ID_FIELD};
use crate::ObjectId;

/// A fault to inject into the next collection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The next operation of any kind fails with `StoreError::Io`.
    Io(String),
    /// The next cursor opened by `find_all` yields every document, then
    /// fails with `StoreError::Cursor` instead of reporting exhaustion.
    Cursor(String),
}

/// A named set of in-memory collections. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryDatabase {
    name: Arc<str>,
    collections: Arc<RwLock<HashMap<String, InMemoryCollection>>>,
}

impl InMemoryDatabase {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a handle to the named collection, creating it on first use.
    pub fn collection(&self, name: &str) -> InMemoryCollection {
        if let Ok(collections) = self.collections.read() {
            if let Some(existing) = collections.get(name) {
                return existing.clone();
            }
        }

        match self.collections.write() {
            Ok(mut collections) => collections
                .entry(name.to_string())
                .or_insert_with(|| InMemoryCollection::new(name))
                .clone(),
            // A poisoned registry still hands out a working, detached collection.
            Err(_) => InMemoryCollection::new(name),
        }
    }

    /// Names of every collection created so far, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// In-memory collection. Documents are kept ordered by `_id`, so scans return
/// them in creation order.
///
/// Clone-friendly via Arc: clones share the same documents.
#[derive(Clone)]
pub struct InMemoryCollection {
    name: Arc<str>,
    documents: Arc<RwLock<BTreeMap<ObjectId, Document>>>,
    failure: Arc<Mutex<Option<Failure>>>,
    operations: Arc<AtomicUsize>,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryCollection {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            documents: Arc::new(RwLock::new(BTreeMap::new())),
            failure: Arc::new(Mutex::new(None)),
            operations: Arc::new(AtomicUsize::new(0)),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many `Collection` operations have been issued against this collection.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Cursors handed out by `find_all` that have not been closed or dropped.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Arrange for the next operation to fail.
    pub fn fail_next(&self, failure: Failure) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = Some(failure);
        }
    }

    /// Store a document verbatim under `id`, bypassing any shape checks.
    ///
    /// Does not count as an operation.
    pub fn insert_raw(&self, id: ObjectId, mut document: Document) -> Result<(), StoreError> {
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        let mut documents = self.write("insert_raw")?;
        documents.insert(id, document);
        Ok(())
    }

    /// Count the operation and consume any injected failure that applies to it.
    fn begin(&self, opens_cursor: bool) -> Result<Option<Failure>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        let mut slot = self
            .failure
            .lock()
            .map_err(|_| StoreError::Io("failure slot lock poisoned".into()))?;
        match slot.take() {
            Some(Failure::Io(msg)) => Err(StoreError::Io(msg)),
            Some(Failure::Cursor(msg)) if !opens_cursor => {
                *slot = Some(Failure::Cursor(msg));
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<ObjectId, Document>>, StoreError> {
        self.documents
            .read()
            .map_err(|_| StoreError::Io(format!("lock poisoned during {}", operation)))
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<ObjectId, Document>>, StoreError> {
        self.documents
            .write()
            .map_err(|_| StoreError::Io(format!("lock poisoned during {}", operation)))
    }
}

#[async_trait]
impl Collection for InMemoryCollection {
    type Cursor = InMemoryCursor;

    async fn insert_one(&self, mut document: Document) -> Result<ObjectId, StoreError> {
        self.begin(false)?;
        if document.contains_key(ID_FIELD) {
            return Err(StoreError::Rejected(format!(
                "{} is assigned by the store",
                ID_FIELD
            )));
        }

        let id = ObjectId::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        self.write("insert_one")?.insert(id, document);
        Ok(id)
    }

    async fn find_one(&self, id: &ObjectId) -> Result<Option<Document>, StoreError> {
        self.begin(false)?;
        Ok(self.read("find_one")?.get(id).cloned())
    }

    async fn find_one_and_replace(
        &self,
        id: &ObjectId,
        mut replacement: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.begin(false)?;
        if let Some(supplied) = replacement.get(ID_FIELD) {
            if supplied.as_str() != Some(id.to_hex().as_str()) {
                return Err(StoreError::Rejected(format!(
                    "replacement may not change {}",
                    ID_FIELD
                )));
            }
        }

        let mut documents = self.write("find_one_and_replace")?;
        match documents.get_mut(id) {
            Some(existing) => {
                replacement.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
                *existing = replacement;
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_one(&self, id: &ObjectId) -> Result<u64, StoreError> {
        self.begin(false)?;
        let removed = self.write("delete_one")?.remove(id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn find_all(&self) -> Result<InMemoryCursor, StoreError> {
        let failure = self.begin(true)?;
        let snapshot: Vec<Document> = self.read("find_all")?.values().cloned().collect();
        let trailing_error = match failure {
            Some(Failure::Cursor(msg)) => Some(StoreError::Cursor(msg)),
            _ => None,
        };

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryCursor {
            documents: snapshot.into_iter(),
            trailing_error,
            _guard: CursorGuard(self.open_cursors.clone()),
        })
    }
}

/// Decrements the owning collection's open-cursor count when dropped.
struct CursorGuard(Arc<AtomicUsize>);

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cursor over a snapshot of the collection taken when the scan started.
pub struct InMemoryCursor {
    documents: std::vec::IntoIter<Document>,
    trailing_error: Option<StoreError>,
    _guard: CursorGuard,
}

#[async_trait]
impl Cursor for InMemoryCursor {
    async fn next(&mut self) -> Result<Option<Document>, StoreError> {
        match self.documents.next() {
            Some(document) => Ok(Some(document)),
            None => match self.trailing_error.take() {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }
}
