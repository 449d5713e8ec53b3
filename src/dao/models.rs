use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Collection a [`GameModel`] record is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameCollection {
    name: &'static str,
}

impl GameCollection {
    /// Bind a model to the collection called `name`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Declared collection name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Record type that can be persisted through a
/// [`GameDataService`](crate::services::GameDataService).
///
/// Implementors map their identifier to the persisted `_id` field with
/// `#[serde(rename = "_id")]` and declare the collection they live in:
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Duel {
///     #[serde(rename = "_id")]
///     uuid: Uuid,
///     name: String,
/// }
///
/// impl GameModel for Duel {
///     const COLLECTION: Option<GameCollection> = Some(GameCollection::new(GAME));
///
///     fn uuid(&self) -> Uuid {
///         self.uuid
///     }
/// }
/// ```
///
/// A model that leaves [`GameModel::COLLECTION`] unset is rejected by every
/// service operation.
pub trait GameModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection binding of the model, `None` when undeclared.
    const COLLECTION: Option<GameCollection> = None;

    /// Unique identifier of the record.
    fn uuid(&self) -> Uuid;
}
