use std::{any::type_name, marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::{
        codec,
        collections::CollectionRegistry,
        document_store::{DocumentCollection, DocumentDatabase, FieldUpdate},
        models::GameModel,
    },
    error::{ConfigurationError, GameDataError, Result},
};

use super::deferred::Deferred;

/// CRUD operations for one [`GameModel`] type.
///
/// Every operation first resolves the collection bound to `T` and fails with
/// [`GameDataError::Configuration`] before touching the database when the
/// binding is missing or not allowed by the registry.
///
/// Each operation comes in two forms: the `async fn` runs on the caller's
/// task, the `spawn_*` variant runs it on its own tokio task and returns a
/// [`Deferred`] handle. Concurrent operations on the same identifier are not
/// ordered; await a handle before issuing a dependent call.
pub struct GameDataService<T> {
    database: Arc<dyn DocumentDatabase>,
    registry: Arc<CollectionRegistry>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for GameDataService<T> {
    fn clone(&self) -> Self {
        Self {
            database: Arc::clone(&self.database),
            registry: Arc::clone(&self.registry),
            _model: PhantomData,
        }
    }
}

impl<T: GameModel> GameDataService<T> {
    /// Build a service validating against the process-wide [`CollectionRegistry`].
    pub fn new(database: Arc<dyn DocumentDatabase>) -> Self {
        Self::with_registry(database, CollectionRegistry::global())
    }

    /// Build a service validating against `registry`.
    pub fn with_registry(
        database: Arc<dyn DocumentDatabase>,
        registry: Arc<CollectionRegistry>,
    ) -> Self {
        Self {
            database,
            registry,
            _model: PhantomData,
        }
    }

    /// Database the service writes to.
    pub fn database(&self) -> &Arc<dyn DocumentDatabase> {
        &self.database
    }

    /// Registry the model binding is checked against.
    pub fn registry(&self) -> &Arc<CollectionRegistry> {
        &self.registry
    }

    /// Resolve the collection name bound to `T`.
    pub fn collection_name(&self) -> std::result::Result<&'static str, ConfigurationError> {
        let model = type_name::<T>();
        let binding = T::COLLECTION.ok_or(ConfigurationError::MissingCollection { model })?;
        let name = binding.name();

        if name.is_empty() || !self.registry.is_supported(name) {
            return Err(ConfigurationError::UnsupportedCollection { model, name });
        }

        Ok(name)
    }

    fn collection(&self) -> Result<Arc<dyn DocumentCollection>> {
        let name = self.collection_name().inspect_err(|err| {
            warn!(error = %err, "rejecting operation on misconfigured game model");
        })?;
        Ok(self.database.collection(name))
    }

    /// Insert `data` as a new document.
    pub async fn insert(&self, data: &T) -> Result<()> {
        let collection = self.collection()?;
        let document = codec::to_document(data).map_err(|source| GameDataError::Serialize {
            model: type_name::<T>(),
            source,
        })?;

        debug!(collection = collection.name(), id = %data.uuid(), "inserting game model");
        collection.insert_one(document).await?;
        Ok(())
    }

    /// Replace the document identified by `id` with `data`. Does nothing when `id` is absent.
    pub async fn update(&self, id: Uuid, data: &T) -> Result<()> {
        let collection = self.collection()?;
        let document = codec::to_document(data).map_err(|source| GameDataError::Serialize {
            model: type_name::<T>(),
            source,
        })?;

        let matched = collection.replace_by_id(id.to_string(), document).await?;
        debug!(collection = collection.name(), %id, matched, "replaced game model");
        Ok(())
    }

    /// Delete the document identified by `id`. Does nothing when `id` is absent.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let collection = self.collection()?;
        let deleted = collection.delete_by_id(id.to_string()).await?;
        debug!(collection = collection.name(), %id, deleted, "removed game model");
        Ok(())
    }

    /// Load the document identified by `id` as `T`, `None` when absent.
    pub async fn get(&self, id: Uuid) -> Result<Option<T>> {
        self.get_as::<T>(id).await
    }

    /// Load the document identified by `id` as `U`, `None` when absent.
    pub async fn get_as<U: DeserializeOwned>(&self, id: Uuid) -> Result<Option<U>> {
        let collection = self.collection()?;
        let Some(document) = collection.find_by_id(id.to_string()).await? else {
            debug!(collection = collection.name(), %id, "game model not found");
            return Ok(None);
        };

        codec::from_document(&document)
            .map(Some)
            .map_err(|source| GameDataError::Deserialize {
                model: type_name::<U>(),
                source,
            })
    }

    /// Atomically add `amount` to the numeric field `field`.
    pub async fn increment_field(&self, id: Uuid, field: &str, amount: i64) -> Result<()> {
        self.apply(
            id,
            FieldUpdate::Increment {
                field: field.to_owned(),
                amount,
            },
        )
        .await
    }

    /// Append `item` to the array field `field`.
    pub async fn add_to_collection<I>(&self, id: Uuid, field: &str, item: &I) -> Result<()>
    where
        I: Serialize + ?Sized,
    {
        let collection = self.collection()?;
        let item = item_to_bson(item)?;
        self.apply_on(
            collection,
            id,
            FieldUpdate::Push {
                field: field.to_owned(),
                item,
            },
        )
        .await
    }

    /// Remove every element equal to `item` from the array field `field`.
    pub async fn remove_from_collection<I>(&self, id: Uuid, field: &str, item: &I) -> Result<()>
    where
        I: Serialize + ?Sized,
    {
        let collection = self.collection()?;
        let item = item_to_bson(item)?;
        self.apply_on(
            collection,
            id,
            FieldUpdate::Pull {
                field: field.to_owned(),
                item,
            },
        )
        .await
    }

    async fn apply(&self, id: Uuid, update: FieldUpdate) -> Result<()> {
        let collection = self.collection()?;
        self.apply_on(collection, id, update).await
    }

    async fn apply_on(
        &self,
        collection: Arc<dyn DocumentCollection>,
        id: Uuid,
        update: FieldUpdate,
    ) -> Result<()> {
        let operator = update.operator();
        let field = update.field().to_owned();
        let matched = collection.update_by_id(id.to_string(), update).await?;
        debug!(
            collection = collection.name(),
            %id,
            operator,
            field = %field,
            matched,
            "updated game model field"
        );
        Ok(())
    }

    /// [`insert`](Self::insert) on its own task.
    pub fn spawn_insert(&self, data: T) -> Deferred<()> {
        let service = self.clone();
        Deferred::spawn(async move { service.insert(&data).await })
    }

    /// [`update`](Self::update) on its own task.
    pub fn spawn_update(&self, id: Uuid, data: T) -> Deferred<()> {
        let service = self.clone();
        Deferred::spawn(async move { service.update(id, &data).await })
    }

    /// [`remove`](Self::remove) on its own task.
    pub fn spawn_remove(&self, id: Uuid) -> Deferred<()> {
        let service = self.clone();
        Deferred::spawn(async move { service.remove(id).await })
    }

    /// [`get`](Self::get) on its own task.
    pub fn spawn_get(&self, id: Uuid) -> Deferred<Option<T>> {
        self.spawn_get_as::<T>(id)
    }

    /// [`get_as`](Self::get_as) on its own task.
    pub fn spawn_get_as<U>(&self, id: Uuid) -> Deferred<Option<U>>
    where
        U: DeserializeOwned + Send + 'static,
    {
        let service = self.clone();
        Deferred::spawn(async move { service.get_as::<U>(id).await })
    }

    /// [`increment_field`](Self::increment_field) on its own task.
    pub fn spawn_increment_field(
        &self,
        id: Uuid,
        field: impl Into<String>,
        amount: i64,
    ) -> Deferred<()> {
        let service = self.clone();
        let field = field.into();
        Deferred::spawn(async move { service.increment_field(id, &field, amount).await })
    }

    /// [`add_to_collection`](Self::add_to_collection) on its own task.
    pub fn spawn_add_to_collection<I>(
        &self,
        id: Uuid,
        field: impl Into<String>,
        item: I,
    ) -> Deferred<()>
    where
        I: Serialize + Send + Sync + 'static,
    {
        let service = self.clone();
        let field = field.into();
        Deferred::spawn(async move { service.add_to_collection(id, &field, &item).await })
    }

    /// [`remove_from_collection`](Self::remove_from_collection) on its own task.
    pub fn spawn_remove_from_collection<I>(
        &self,
        id: Uuid,
        field: impl Into<String>,
        item: I,
    ) -> Deferred<()>
    where
        I: Serialize + Send + Sync + 'static,
    {
        let service = self.clone();
        let field = field.into();
        Deferred::spawn(async move { service.remove_from_collection(id, &field, &item).await })
    }
}

fn item_to_bson<I: Serialize + ?Sized>(item: &I) -> Result<bson::Bson> {
    codec::to_bson(item).map_err(|source| GameDataError::Serialize {
        model: type_name::<I>(),
        source,
    })
}
