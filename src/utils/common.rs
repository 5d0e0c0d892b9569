//! 通用校验工具

/// 空地址/零值哨兵：空串、`0x`、或 `0x` 后全为 0
pub fn is_empty_address(address: &str) -> bool {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return true;
    }
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => hex.chars().all(|c| c == '0'),
        None => false,
    }
}
