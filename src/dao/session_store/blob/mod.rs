mod config;
mod error;
mod models;
mod store;

pub use config::BlobConfig;
pub use error::{BlobDaoError, BlobResult};
pub use store::BlobSessionStore;
