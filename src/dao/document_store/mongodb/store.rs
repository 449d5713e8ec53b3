use std::sync::Arc;

use bson::{Bson, Document};
use futures::future::BoxFuture;
use mongodb::{
    Collection, Database,
    error::{Error as MongoError, ErrorKind, WriteFailure},
};
use tracing::info;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
};
use crate::dao::{
    document_store::{DocumentCollection, DocumentDatabase, FieldUpdate, ID_FIELD, id_filter},
    storage::{StorageError, StorageResult},
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed [`DocumentDatabase`].
#[derive(Clone, Debug)]
pub struct MongoDocumentDatabase {
    database: Database,
}

impl MongoDocumentDatabase {
    /// Wrap an already configured database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Build a client from `config` and verify the server is reachable.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;
        info!(database = %config.database_name, "connected to MongoDB");
        Ok(Self::new(database))
    }

    /// Underlying driver handle.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl DocumentDatabase for MongoDocumentDatabase {
    fn name(&self) -> &str {
        self.database.name()
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoDocumentCollection {
            collection: self.database.collection::<Document>(name),
        })
    }

    fn drop_database(&self) -> BoxFuture<'static, StorageResult<()>> {
        let database = self.database.clone();
        Box::pin(async move {
            database
                .drop()
                .await
                .map_err(|source| MongoDaoError::DropDatabase {
                    database: database.name().to_owned(),
                    source,
                })?;
            Ok(())
        })
    }
}

/// MongoDB-backed [`DocumentCollection`] over raw documents.
#[derive(Clone, Debug)]
pub struct MongoDocumentCollection {
    collection: Collection<Document>,
}

impl MongoDocumentCollection {
    fn collection_name(&self) -> String {
        self.collection.name().to_owned()
    }
}

impl DocumentCollection for MongoDocumentCollection {
    fn name(&self) -> &str {
        self.collection.name()
    }

    fn insert_one(&self, document: Document) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = match document.get(ID_FIELD) {
                Some(Bson::String(id)) => id.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };

            store
                .collection
                .insert_one(document)
                .await
                .map_err(|source| {
                    if is_duplicate_key(&source) {
                        StorageError::DuplicateKey {
                            collection: store.collection_name(),
                            id,
                        }
                    } else {
                        MongoDaoError::Insert {
                            collection: store.collection_name(),
                            source,
                        }
                        .into()
                    }
                })?;
            Ok(())
        })
    }

    fn replace_by_id(
        &self,
        id: String,
        replacement: Document,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let result = store
                .collection
                .replace_one(id_filter(&id), replacement)
                .await
                .map_err(|source| MongoDaoError::Replace {
                    collection: store.collection_name(),
                    id,
                    source,
                })?;
            Ok(result.matched_count)
        })
    }

    fn delete_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let result = store
                .collection
                .delete_one(id_filter(&id))
                .await
                .map_err(|source| MongoDaoError::Delete {
                    collection: store.collection_name(),
                    id,
                    source,
                })?;
            Ok(result.deleted_count)
        })
    }

    fn find_by_id(&self, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .collection
                .find_one(id_filter(&id))
                .await
                .map_err(|source| MongoDaoError::Find {
                    collection: store.collection_name(),
                    id,
                    source,
                })?;
            Ok(document)
        })
    }

    fn update_by_id(
        &self,
        id: String,
        update: FieldUpdate,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let result = store
                .collection
                .update_one(id_filter(&id), update.to_document())
                .await
                .map_err(|source| MongoDaoError::Update {
                    collection: store.collection_name(),
                    id,
                    operator: update.operator(),
                    field: update.field().to_owned(),
                    source,
                })?;
            Ok(result.matched_count)
        })
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}
