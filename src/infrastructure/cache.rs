//! 账户对象缓存
//! 门面只依赖 get/set 能力；淘汰、持久化与线程安全由具体实现负责

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::domain::BitAccount;

/// 缓存提供者
pub trait CacheProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<BitAccount>>;

    fn set(&self, key: &str, value: Arc<BitAccount>);
}

/// 进程内缓存：从不主动淘汰，条目由调用方显式删除
#[derive(Default)]
pub struct InMemoryCacheProvider {
    entries: RwLock<HashMap<String, Arc<BitAccount>>>,
}

impl InMemoryCacheProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 删除指定key，返回被删除的账户对象
    pub fn remove(&self, key: &str) -> Option<Arc<BitAccount>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CacheProvider for InMemoryCacheProvider {
    fn get(&self, key: &str) -> Option<Arc<BitAccount>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Arc<BitAccount>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}
