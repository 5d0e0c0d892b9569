//! 插件与插件注册表
//!
//! 注册表按安装顺序保存插件，钩子分发顺序即安装顺序；
//! 卸载按引用身份匹配，同名插件不会被混淆。

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    domain::BitAccount,
    error::{DotbitError, Result},
    service::dotbit::DotBit,
};

/// 插件接口，所有钩子均为可选
pub trait BitPlugin: Send + Sync {
    /// 诊断用名称
    fn name(&self) -> &str;

    /// 安装钩子；返回 None 表示插件未提供该能力，此时插件不会被注册
    fn on_install(&self, _dotbit: &DotBit) -> Option<anyhow::Result<()>> {
        None
    }

    fn on_uninstall(&self, _dotbit: &DotBit) -> anyhow::Result<()> {
        Ok(())
    }

    /// 账户对象首次构造后、写入缓存前调用；返回错误会中止本次解析。
    /// 钩子内不要再次解析同一个账户。
    /// 同一账户的并发解析者会阻塞等待钩子返回，钩子应当短小且不做阻塞 I/O。
    fn on_init_account(&self, _account: &BitAccount) -> anyhow::Result<()> {
        Ok(())
    }
}

/// 按引用身份比较（忽略 vtable）
fn same_plugin(a: &Arc<dyn BitPlugin>, b: &Arc<dyn BitPlugin>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// 有序插件注册表
#[derive(Default)]
pub struct PluginRegistry {
    plugins: RwLock<Vec<Arc<dyn BitPlugin>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, plugin: Arc<dyn BitPlugin>) {
        self.plugins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(plugin);
    }

    /// 按引用身份移除，未找到时返回 false 且不做任何修改
    pub fn remove(&self, plugin: &Arc<dyn BitPlugin>) -> bool {
        let mut plugins = self.plugins.write().unwrap_or_else(PoisonError::into_inner);
        match plugins.iter().position(|p| same_plugin(p, plugin)) {
            Some(index) => {
                plugins.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, plugin: &Arc<dyn BitPlugin>) -> bool {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|p| same_plugin(p, plugin))
    }

    /// 当前顺序的快照；分发期间不持有锁
    pub fn snapshot(&self) -> Vec<Arc<dyn BitPlugin>> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// 按注册顺序同步分发 on_init_account，第一个失败即返回
    pub fn dispatch_init_account(&self, account: &BitAccount) -> Result<()> {
        for plugin in self.snapshot() {
            plugin
                .on_init_account(account)
                .map_err(|e| DotbitError::plugin(plugin.name(), e))?;
        }
        Ok(())
    }
}
