pub mod account;
pub mod common;

// Re-export commonly used functions
pub use account::{account_cache_key, is_sub_account, parent_account};
pub use common::is_empty_address;
