pub mod account;
pub mod key_info;
pub mod records;

pub use account::{AccountKind, BitAccount, NormalAccount, SubAccount};
pub use key_info::{chain_to_coin_type, coin_type, AccountRole, KeyInfo};
pub use records::{AccountRecord, AvatarInfo, DWebProtocol};
