//! Typed operations over game model records.

/// Handle to an operation running on its own task.
pub mod deferred;
/// Generic CRUD service for game models.
pub mod game_data_service;

pub use deferred::Deferred;
pub use game_data_service::GameDataService;
