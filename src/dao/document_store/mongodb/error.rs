use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures that can occur while talking to MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// A required environment variable is not set.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// The connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Rejected connection string.
        uri: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// The driver refused the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// The server did not answer the connection ping.
    #[error("MongoDB ping against `{database}` failed during initial connection")]
    InitialPing {
        /// Database the ping targeted.
        database: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// An insert failed.
    #[error("failed to insert document into `{collection}`")]
    Insert {
        /// Target collection.
        collection: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// A replacement failed.
    #[error("failed to replace document `{id}` in `{collection}`")]
    Replace {
        /// Target collection.
        collection: String,
        /// Identifier of the replaced document.
        id: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// A delete failed.
    #[error("failed to delete document `{id}` from `{collection}`")]
    Delete {
        /// Target collection.
        collection: String,
        /// Identifier of the deleted document.
        id: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// A lookup failed.
    #[error("failed to load document `{id}` from `{collection}`")]
    Find {
        /// Target collection.
        collection: String,
        /// Identifier looked up.
        id: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// An atomic field update failed.
    #[error("failed to apply `{operator}` on field `{field}` of document `{id}` in `{collection}`")]
    Update {
        /// Target collection.
        collection: String,
        /// Identifier of the updated document.
        id: String,
        /// Update operator, such as `$inc`.
        operator: &'static str,
        /// Field the operator applied to.
        field: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// Dropping the database failed.
    #[error("failed to drop database `{database}`")]
    DropDatabase {
        /// Database being dropped.
        database: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
}
