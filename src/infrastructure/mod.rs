pub mod cache;
pub mod indexer_client;
pub mod logging;

pub use cache::{CacheProvider, InMemoryCacheProvider};
pub use indexer_client::RemoteBitIndexer;
