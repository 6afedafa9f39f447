/// Database model definitions.
pub mod models;
/// Session table storage and photo link resolution.
pub mod session_store;
/// Storage abstraction layer for backend operations.
pub mod storage;
