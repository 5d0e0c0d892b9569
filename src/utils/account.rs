//! 账户语法工具
//!
//! `parent.bit` 为普通账户，`sub.parent.bit` 这类嵌套在父账户下的为子账户。

/// 账户缓存键前缀
pub const ACCOUNT_CACHE_PREFIX: &str = "account:";

/// 生成账户缓存键：`account:<identifier>`
pub fn account_cache_key(account: &str) -> String {
    format!("{}{}", ACCOUNT_CACHE_PREFIX, account)
}

/// 判断是否为子账户（至少三段，例如 `sub.parent.bit`）
pub fn is_sub_account(account: &str) -> bool {
    account.split('.').count() >= 3
}

/// 子账户的父账户，普通账户返回 None
pub fn parent_account(account: &str) -> Option<&str> {
    if !is_sub_account(account) {
        return None;
    }
    account.split_once('.').map(|(_, parent)| parent)
}
