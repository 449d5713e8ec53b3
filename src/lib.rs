//! Typed document storage for game model records, exposing modules for services and integration tests.

pub mod config;
pub mod dao;
pub mod error;
pub mod services;

pub use dao::{
    collections::CollectionRegistry,
    models::{GameCollection, GameModel},
};
pub use error::{ConfigurationError, GameDataError, Result};
pub use services::{Deferred, GameDataService};
