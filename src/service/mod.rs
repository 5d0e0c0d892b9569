pub mod dotbit;
pub mod indexer;
pub mod instance;
pub mod plugin;
pub mod signer;
pub mod tx_builder;

pub use dotbit::DotBit;
pub use indexer::BitIndexer;
pub use instance::create_instance;
pub use plugin::{BitPlugin, PluginRegistry};
pub use signer::BitSigner;
pub use tx_builder::TxBuilder;
