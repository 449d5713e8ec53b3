//! In-process document store.
//!
//! Applies the same by-id semantics as the MongoDB backend, including the
//! `$inc`, `$push` and `$pull` update rules for top-level fields. Documents
//! must carry a textual `_id`; dotted field paths are treated as plain keys.

use std::sync::Arc;

use bson::{Bson, Document};
use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::{self, BoxFuture};
use tracing::debug;

use super::{DocumentCollection, DocumentDatabase, FieldUpdate, ID_FIELD};
use crate::dao::storage::{StorageError, StorageResult};

const DEFAULT_DATABASE_NAME: &str = "memory";

/// [`DocumentDatabase`] kept entirely in memory.
#[derive(Clone)]
pub struct MemoryDocumentDatabase {
    inner: Arc<MemoryDatabaseInner>,
}

struct MemoryDatabaseInner {
    name: String,
    collections: DashMap<String, Arc<MemoryCollection>>,
}

impl MemoryDocumentDatabase {
    /// Create an empty database called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MemoryDatabaseInner {
                name: name.into(),
                collections: DashMap::new(),
            }),
        }
    }

    /// Typed handle to a collection, created if needed.
    pub fn memory_collection(&self, name: &str) -> Arc<MemoryCollection> {
        let entry = self
            .inner
            .collections
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)));
        Arc::clone(entry.value())
    }

    /// Names of the collections currently holding documents.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner
            .collections
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect()
    }
}

impl Default for MemoryDocumentDatabase {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_NAME)
    }
}

impl DocumentDatabase for MemoryDocumentDatabase {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        self.memory_collection(name)
    }

    fn drop_database(&self) -> BoxFuture<'static, StorageResult<()>> {
        // Collections stay registered so handles taken before the drop keep
        // sharing storage with handles taken after it.
        for entry in self.inner.collections.iter() {
            entry.value().documents.clear();
        }
        debug!(database = %self.inner.name, "dropped in-memory database");
        Box::pin(future::ready(Ok(())))
    }
}

/// Single in-memory collection keyed by textual `_id`.
pub struct MemoryCollection {
    name: String,
    documents: DashMap<String, Document>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            documents: DashMap::new(),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection holds no document.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn insert(&self, document: Document) -> StorageResult<()> {
        let id = match document.get(ID_FIELD) {
            Some(Bson::String(id)) => id.clone(),
            _ => {
                return Err(StorageError::MissingId {
                    collection: self.name.clone(),
                });
            }
        };

        match self.documents.entry(id) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateKey {
                collection: self.name.clone(),
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(document);
                Ok(())
            }
        }
    }

    fn replace(&self, id: &str, replacement: Document) -> StorageResult<u64> {
        let Some(mut stored) = self.documents.get_mut(id) else {
            return Ok(0);
        };

        let current_id = replacement.get(ID_FIELD).cloned();
        let replacement = match current_id {
            None => {
                let mut with_id = Document::new();
                with_id.insert(ID_FIELD, id);
                for (key, value) in replacement {
                    with_id.insert(key, value);
                }
                with_id
            }
            Some(Bson::String(existing)) if existing == id => replacement,
            Some(_) => {
                return Err(StorageError::invalid_update(
                    ID_FIELD,
                    "the identifier of a stored document is immutable",
                ));
            }
        };

        *stored = replacement;
        Ok(1)
    }

    fn update(&self, id: &str, update: FieldUpdate) -> StorageResult<u64> {
        let Some(mut stored) = self.documents.get_mut(id) else {
            return Ok(0);
        };
        apply_update(&mut stored, update)?;
        Ok(1)
    }
}

impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, document: Document) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(self.insert(document)))
    }

    fn replace_by_id(
        &self,
        id: String,
        replacement: Document,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        Box::pin(future::ready(self.replace(&id, replacement)))
    }

    fn delete_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<u64>> {
        let deleted = u64::from(self.documents.remove(&id).is_some());
        Box::pin(future::ready(Ok(deleted)))
    }

    fn find_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let found = self.documents.get(&id).map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(found)))
    }

    fn update_by_id(
        &self,
        id: String,
        update: FieldUpdate,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        Box::pin(future::ready(self.update(&id, update)))
    }
}

fn apply_update(document: &mut Document, update: FieldUpdate) -> StorageResult<()> {
    match update {
        FieldUpdate::Increment { field, amount } => {
            let next = match document.get(&field).cloned() {
                None => Bson::Int64(amount),
                // Mixing an int with a long widens to long.
                Some(Bson::Int32(value)) => {
                    checked_long(&field, i64::from(value).checked_add(amount))?
                }
                Some(Bson::Int64(value)) => checked_long(&field, value.checked_add(amount))?,
                Some(Bson::Double(value)) => Bson::Double(value + amount as f64),
                Some(_) => {
                    return Err(StorageError::invalid_update(
                        field,
                        "cannot apply $inc to a non-numeric value",
                    ));
                }
            };
            document.insert(field, next);
        }
        FieldUpdate::Push { field, item } => match document.get_mut(&field) {
            None => {
                document.insert(field, Bson::Array(vec![item]));
            }
            Some(Bson::Array(items)) => items.push(item),
            Some(_) => {
                return Err(StorageError::invalid_update(
                    field,
                    "cannot apply $push to a non-array value",
                ));
            }
        },
        FieldUpdate::Pull { field, item } => match document.get_mut(&field) {
            None => {}
            Some(Bson::Array(items)) => items.retain(|existing| *existing != item),
            Some(_) => {
                return Err(StorageError::invalid_update(
                    field,
                    "cannot apply $pull to a non-array value",
                ));
            }
        },
    }
    Ok(())
}

fn checked_long(field: &str, value: Option<i64>) -> StorageResult<Bson> {
    value
        .map(Bson::Int64)
        .ok_or_else(|| StorageError::invalid_update(field, "$inc overflowed a 64-bit integer"))
}
