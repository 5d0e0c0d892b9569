//! 按配置创建门面实例

use std::sync::Arc;

use crate::{
    config::Config,
    error::{DotbitError, Result},
    infrastructure::{cache::InMemoryCacheProvider, indexer_client::RemoteBitIndexer},
    service::dotbit::DotBit,
};

/// 使用远程 indexer 创建实例；缓存开启时使用进程内缓存
pub fn create_instance(config: &Config) -> Result<DotBit> {
    config
        .validate()
        .map_err(|e| DotbitError::Config(e.to_string()))?;

    let indexer = RemoteBitIndexer::from_config(&config.indexer)?;
    tracing::info!(
        network = %config.indexer.network,
        indexer = %indexer.url(),
        cache_enabled = config.cache.enabled,
        "Creating .bit resolver instance"
    );

    let mut dotbit = DotBit::new(Arc::new(indexer)).with_network(config.indexer.network);
    if config.cache.enabled {
        dotbit = dotbit.with_cache_provider(Arc::new(InMemoryCacheProvider::new()));
    }
    Ok(dotbit)
}
