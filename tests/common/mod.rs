#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use game_data::{
    GameCollection, GameDataService, GameModel,
    dao::{
        collections::{GAME, GAME_STATS},
        document_store::DocumentDatabase,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record bound to the `game` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DummyGameModel {
    #[serde(rename = "_id")]
    pub uuid: Uuid,
    pub name: String,
    pub kills: i32,
    pub owned_tanks: Vec<String>,
}

impl GameModel for DummyGameModel {
    const COLLECTION: Option<GameCollection> = Some(GameCollection::new(GAME));

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Record bound to the `game-stats` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummyGameStats {
    #[serde(rename = "_id")]
    pub uuid: Uuid,
    pub wins: i64,
}

impl GameModel for DummyGameStats {
    const COLLECTION: Option<GameCollection> = Some(GameCollection::new(GAME_STATS));

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Record bound to a collection that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidNameDummyGameModel {
    #[serde(rename = "_id")]
    pub uuid: Uuid,
    pub name: String,
}

impl GameModel for InvalidNameDummyGameModel {
    const COLLECTION: Option<GameCollection> = Some(GameCollection::new("Invalid"));

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Record bound to an empty collection name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyNameDummyGameModel {
    #[serde(rename = "_id")]
    pub uuid: Uuid,
    pub name: String,
}

impl GameModel for EmptyNameDummyGameModel {
    const COLLECTION: Option<GameCollection> = Some(GameCollection::new(""));

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Record without a collection binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingAnnotationDummyGameModel {
    #[serde(rename = "_id")]
    pub uuid: Uuid,
    pub name: String,
}

impl GameModel for MissingAnnotationDummyGameModel {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,game_data=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn duels() -> DummyGameModel {
    DummyGameModel {
        uuid: Uuid::new_v4(),
        name: "duels".into(),
        kills: 0,
        owned_tanks: vec!["Merkava 4".into(), "Merkava 3".into()],
    }
}

async fn assert_rejected<T: GameModel + Clone>(
    database: Arc<dyn DocumentDatabase>,
    record: T,
) {
    let service = GameDataService::<T>::new(database);
    let id = record.uuid();

    let outcomes = vec![
        service.insert(&record).await,
        service.update(id, &record).await,
        service.remove(id).await,
        service.get(id).await.map(|_| ()),
        service.increment_field(id, "kills", 1).await,
        service.add_to_collection(id, "ownedTanks", "Merkava 2").await,
        service.remove_from_collection(id, "ownedTanks", "Merkava 2").await,
        service.spawn_insert(record.clone()).await,
        service.spawn_update(id, record.clone()).await,
        service.spawn_remove(id).await,
        service.spawn_get(id).await.map(|_| ()),
        service.spawn_increment_field(id, "kills", 1).await,
        service.spawn_add_to_collection(id, "ownedTanks", "Merkava 2").await,
        service.spawn_remove_from_collection(id, "ownedTanks", "Merkava 2").await,
    ];

    for outcome in outcomes {
        let err = outcome.expect_err("misconfigured model must be rejected");
        assert!(err.is_configuration(), "unexpected error: {err}");
    }
}

pub async fn invalid_models_are_rejected(database: Arc<dyn DocumentDatabase>) {
    assert_rejected(
        Arc::clone(&database),
        InvalidNameDummyGameModel {
            uuid: Uuid::new_v4(),
            name: String::new(),
        },
    )
    .await;
    assert_rejected(
        Arc::clone(&database),
        EmptyNameDummyGameModel {
            uuid: Uuid::new_v4(),
            name: String::new(),
        },
    )
    .await;
    assert_rejected(
        database,
        MissingAnnotationDummyGameModel {
            uuid: Uuid::new_v4(),
            name: String::new(),
        },
    )
    .await;
}

pub async fn insert_then_get(database: Arc<dyn DocumentDatabase>) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let direct = duels();
    let deferred = duels();

    service.insert(&direct).await?;
    service.spawn_insert(deferred.clone()).await?;

    let loaded = service.get(direct.uuid).await?.context("inserted record")?;
    assert_eq!(loaded, direct);

    let loaded = service
        .spawn_get(deferred.uuid)
        .await?
        .context("record inserted on its own task")?;
    assert_eq!(loaded, deferred);
    Ok(())
}

pub async fn missing_records_are_absent(database: Arc<dyn DocumentDatabase>) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let id = Uuid::new_v4();

    assert!(service.get(id).await?.is_none());
    assert!(service.spawn_get(id).await?.is_none());

    service.update(id, &duels()).await?;
    service.remove(id).await?;
    service.increment_field(id, "kills", 1).await?;
    service.add_to_collection(id, "ownedTanks", "Merkava 2").await?;
    service
        .remove_from_collection(id, "ownedTanks", "Merkava 2")
        .await?;
    assert!(service.get(id).await?.is_none());
    Ok(())
}

pub async fn update_replaces_document(database: Arc<dyn DocumentDatabase>) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let original = duels();
    service.insert(&original).await?;

    let updated = DummyGameModel {
        name: "sheepwars".into(),
        kills: 4,
        owned_tanks: vec!["Merkava 2".into()],
        ..original.clone()
    };
    service.spawn_update(original.uuid, updated.clone()).await?;

    let loaded = service.get(original.uuid).await?.context("updated record")?;
    assert_eq!(loaded, updated);
    assert_ne!(loaded.name, original.name);
    Ok(())
}

pub async fn increment_is_additive(database: Arc<dyn DocumentDatabase>) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let record = duels();
    service.insert(&record).await?;
    assert_eq!(service.get(record.uuid).await?.context("record")?.kills, 0);

    service.increment_field(record.uuid, "kills", 1).await?;
    assert_eq!(service.get(record.uuid).await?.context("record")?.kills, 1);

    service.spawn_increment_field(record.uuid, "kills", 1).await?;
    assert_eq!(service.get(record.uuid).await?.context("record")?.kills, 2);

    service.increment_field(record.uuid, "kills", -2).await?;
    assert_eq!(service.get(record.uuid).await?.context("record")?.kills, 0);
    Ok(())
}

pub async fn concurrent_increments_are_atomic(
    database: Arc<dyn DocumentDatabase>,
) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let record = duels();
    service.insert(&record).await?;

    let pending: Vec<_> = (0..16)
        .map(|_| service.spawn_increment_field(record.uuid, "kills", 1))
        .collect();
    for outcome in join_all(pending).await {
        outcome?;
    }

    assert_eq!(service.get(record.uuid).await?.context("record")?.kills, 16);
    Ok(())
}

pub async fn remove_makes_record_absent(database: Arc<dyn DocumentDatabase>) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let kept = duels();
    let removed = duels();
    service.insert(&kept).await?;
    service.insert(&removed).await?;

    service.spawn_remove(removed.uuid).await?;
    assert!(service.get(removed.uuid).await?.is_none());
    assert_eq!(service.get(kept.uuid).await?, Some(kept));

    service.remove(removed.uuid).await?;
    Ok(())
}

pub async fn collection_fields_are_mutated(
    database: Arc<dyn DocumentDatabase>,
) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let record = duels();
    service.insert(&record).await?;

    let merkava2 = "Merkava 2";
    service
        .spawn_add_to_collection(record.uuid, "ownedTanks", merkava2)
        .await?;
    let tanks = service.get(record.uuid).await?.context("record")?.owned_tanks;
    assert_eq!(tanks.len(), 3);
    assert!(tanks.iter().any(|tank| tank == merkava2));

    service
        .remove_from_collection(record.uuid, "ownedTanks", merkava2)
        .await?;
    let tanks = service.get(record.uuid).await?.context("record")?.owned_tanks;
    assert_eq!(tanks, vec!["Merkava 4".to_owned(), "Merkava 3".to_owned()]);
    Ok(())
}

pub async fn pull_removes_every_occurrence(
    database: Arc<dyn DocumentDatabase>,
) -> anyhow::Result<()> {
    let service = GameDataService::<DummyGameModel>::new(database);
    let record = DummyGameModel {
        owned_tanks: vec![
            "Merkava 4".into(),
            "Merkava 2".into(),
            "Merkava 3".into(),
            "Merkava 2".into(),
        ],
        ..duels()
    };
    service.insert(&record).await?;

    service
        .spawn_remove_from_collection(record.uuid, "ownedTanks", "Merkava 2")
        .await?;
    let tanks = service.get(record.uuid).await?.context("record")?.owned_tanks;
    assert_eq!(tanks, vec!["Merkava 4".to_owned(), "Merkava 3".to_owned()]);
    Ok(())
}

pub async fn models_use_their_own_collection(
    database: Arc<dyn DocumentDatabase>,
) -> anyhow::Result<()> {
    let games = GameDataService::<DummyGameModel>::new(Arc::clone(&database));
    let stats = GameDataService::<DummyGameStats>::new(database);

    let game = duels();
    let game_stats = DummyGameStats {
        uuid: game.uuid,
        wins: 3,
    };
    games.insert(&game).await?;
    stats.insert(&game_stats).await?;

    stats.increment_field(game.uuid, "wins", 2).await?;
    assert_eq!(stats.get(game.uuid).await?.context("stats")?.wins, 5);
    assert_eq!(games.get(game.uuid).await?, Some(game));
    Ok(())
}
