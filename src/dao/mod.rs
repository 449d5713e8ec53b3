/// Allow-list of collection names game models may target.
pub mod collections;
/// Record to document conversion.
pub mod codec;
/// Document database abstraction and its backends.
pub mod document_store;
/// Game model capability trait and collection binding.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
