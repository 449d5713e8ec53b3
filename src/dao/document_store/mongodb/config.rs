use mongodb::options::ClientOptions;

use crate::config::AppConfig;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DB: &str = "game_data";

/// Connection settings for the MongoDB backend.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Parsed driver options.
    pub options: ClientOptions,
    /// Database the services read and write.
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri`, targeting `db_name` or the default `game_data` database.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or(DEFAULT_DB).to_owned();
        let options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Parse `uri`, targeting the database named in `config` or the default `game_data`.
    pub async fn from_app_config(uri: &str, config: &AppConfig) -> MongoResult<Self> {
        Self::from_uri(uri, config.database()).await
    }

    /// Read `MONGO_URI` (required) and `MONGO_DB` (optional) from the environment.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI")
            .map_err(|_| MongoDaoError::MissingEnvVar { var: "MONGO_URI" })?;
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}
