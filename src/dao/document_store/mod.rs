/// In-process backend.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::sync::Arc;

use bson::{Bson, Document};
use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

/// Name of the persisted identifier field.
pub const ID_FIELD: &str = "_id";

/// Database-level handle able to hand out named collections.
pub trait DocumentDatabase: Send + Sync {
    /// Name of the database.
    fn name(&self) -> &str;
    /// Handle to the collection called `name`. Collections are created lazily by the backend.
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;
    /// Drop the whole database.
    fn drop_database(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Operations on a single collection, keyed by the textual `_id` of each document.
///
/// By-id operations that match nothing succeed and report a count of zero.
pub trait DocumentCollection: Send + Sync {
    /// Name of the collection.
    fn name(&self) -> &str;
    /// Insert `document` as a new document.
    fn insert_one(&self, document: Document) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace the document whose `_id` is `id`, returning the matched count.
    fn replace_by_id(
        &self,
        id: String,
        replacement: Document,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    /// Delete the document whose `_id` is `id`, returning the deleted count.
    fn delete_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<u64>>;
    /// Find the document whose `_id` is `id`.
    fn find_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>>;
    /// Atomically apply `update` to the document whose `_id` is `id`, returning the matched count.
    fn update_by_id(
        &self,
        id: String,
        update: FieldUpdate,
    ) -> BoxFuture<'static, StorageResult<u64>>;
}

/// Atomic mutation of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Add `amount` to a numeric field (`$inc`).
    Increment {
        /// Targeted field.
        field: String,
        /// Signed amount to add.
        amount: i64,
    },
    /// Append `item` to an array field (`$push`).
    Push {
        /// Targeted array field.
        field: String,
        /// Element to append.
        item: Bson,
    },
    /// Remove every element equal to `item` from an array field (`$pull`).
    Pull {
        /// Targeted array field.
        field: String,
        /// Element to remove.
        item: Bson,
    },
}

impl FieldUpdate {
    /// Field targeted by the update.
    pub fn field(&self) -> &str {
        match self {
            FieldUpdate::Increment { field, .. }
            | FieldUpdate::Push { field, .. }
            | FieldUpdate::Pull { field, .. } => field,
        }
    }

    /// Update operator name.
    pub fn operator(&self) -> &'static str {
        match self {
            FieldUpdate::Increment { .. } => "$inc",
            FieldUpdate::Push { .. } => "$push",
            FieldUpdate::Pull { .. } => "$pull",
        }
    }

    /// Render as an update document, e.g. `{"$inc": {"kills": 1}}`.
    pub fn to_document(&self) -> Document {
        let value = match self {
            FieldUpdate::Increment { amount, .. } => Bson::Int64(*amount),
            FieldUpdate::Push { item, .. } | FieldUpdate::Pull { item, .. } => item.clone(),
        };

        let mut target = Document::new();
        target.insert(self.field(), value);

        let mut update = Document::new();
        update.insert(self.operator(), target);
        update
    }
}

/// Filter matching the document whose `_id` is `id`.
pub fn id_filter(id: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(ID_FIELD, id);
    filter
}
