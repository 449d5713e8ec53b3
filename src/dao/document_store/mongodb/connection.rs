use bson::doc;
use mongodb::{Client, Database, options::ClientOptions};

use super::error::{MongoDaoError, MongoResult};

/// Build a client for `options` and check the server answers a single ping.
///
/// Retries and server selection timeouts are left to the driver.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|source| MongoDaoError::InitialPing {
            database: database_name.to_owned(),
            source,
        })?;

    Ok((client, database))
}
