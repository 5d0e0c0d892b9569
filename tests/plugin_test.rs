//! 插件生命周期与钩子分发测试

mod common;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
    time::Duration,
};

use common::{entries, new_log, MockIndexer, RecordingPlugin};
use dotbit::{
    domain::BitAccount,
    infrastructure::{CacheProvider, InMemoryCacheProvider},
    service::BitPlugin,
    DotBit, DotbitError,
};

fn dotbit_with_cache() -> (DotBit, Arc<InMemoryCacheProvider>) {
    let cache = Arc::new(InMemoryCacheProvider::new());
    let dotbit = DotBit::new(Arc::new(MockIndexer::new())).with_cache_provider(cache.clone());
    (dotbit, cache)
}

#[test]
fn test_install_invokes_on_install_once_before_returning() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();

    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("audit", &log)))
        .unwrap();

    assert_eq!(entries(&log), vec!["audit:install"]);
    assert_eq!(dotbit.plugin_names(), vec!["audit"]);
}

#[test]
fn test_plugin_without_on_install_is_skipped() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();

    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("silent", &log).without_install()))
        .unwrap();
    assert_eq!(dotbit.plugin_count(), 0);

    dotbit.account("phone.bit").unwrap();
    assert!(entries(&log).is_empty());
}

#[test]
fn test_failed_install_is_not_registered() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();

    let err = dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("broken", &log).failing_install()))
        .unwrap_err();
    assert!(matches!(err, DotbitError::Plugin { ref plugin, .. } if plugin == "broken"));
    assert_eq!(dotbit.plugin_count(), 0);
}

#[test]
fn test_init_hooks_run_in_registration_order_once_per_account() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("first", &log)))
        .unwrap();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("second", &log)))
        .unwrap();

    dotbit.account("phone.bit").unwrap();
    dotbit.account("phone.bit").unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "first:install",
            "second:install",
            "first:init:phone.bit",
            "second:init:phone.bit",
        ]
    );
}

#[test]
fn test_plugins_do_not_apply_retroactively() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();

    dotbit.account("early.bit").unwrap();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("late", &log)))
        .unwrap();
    dotbit.account("early.bit").unwrap();
    dotbit.account("later.bit").unwrap();

    assert_eq!(entries(&log), vec!["late:install", "late:init:later.bit"]);
}

#[test]
fn test_failing_hook_aborts_resolution() {
    let log = new_log();
    let (dotbit, cache) = dotbit_with_cache();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("guard", &log).failing_on("blocked.bit")))
        .unwrap();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("after", &log)))
        .unwrap();

    let err = dotbit.account("blocked.bit").unwrap_err();
    assert!(matches!(err, DotbitError::Plugin { ref plugin, .. } if plugin == "guard"));

    // 后续插件未被调用，结果也未写入缓存
    assert!(!entries(&log).contains(&"after:init:blocked.bit".to_string()));
    assert!(cache.get("account:blocked.bit").is_none());
}

#[tokio::test]
async fn test_failing_hook_propagates_from_exist() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();
    dotbit
        .install_plugin(Arc::new(RecordingPlugin::new("guard", &log).failing_on("blocked.bit")))
        .unwrap();

    let err = dotbit.exist("blocked.bit").await.unwrap_err();
    assert!(matches!(err, DotbitError::Plugin { .. }));
}

#[test]
fn test_uninstall_by_identity() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();
    let a: Arc<dyn BitPlugin> = Arc::new(RecordingPlugin::new("twin", &log));
    let b: Arc<dyn BitPlugin> = Arc::new(RecordingPlugin::new("twin", &log));
    dotbit.install_plugin(a.clone()).unwrap();
    dotbit.install_plugin(b.clone()).unwrap();

    assert!(dotbit.uninstall_plugin(&b).unwrap());
    assert_eq!(dotbit.plugin_count(), 1);

    dotbit.account("phone.bit").unwrap();
    let log_entries = entries(&log);
    assert_eq!(
        log_entries,
        vec!["twin:install", "twin:install", "twin:uninstall", "twin:init:phone.bit"]
    );
}

#[test]
fn test_uninstall_unknown_plugin_is_noop() {
    let log = new_log();
    let (dotbit, _) = dotbit_with_cache();
    let installed: Arc<dyn BitPlugin> = Arc::new(RecordingPlugin::new("installed", &log));
    let stranger: Arc<dyn BitPlugin> = Arc::new(RecordingPlugin::new("stranger", &log));
    dotbit.install_plugin(installed).unwrap();

    assert!(!dotbit.uninstall_plugin(&stranger).unwrap());
    assert_eq!(dotbit.plugin_names(), vec!["installed"]);
    assert!(!entries(&log).contains(&"stranger:uninstall".to_string()));
}

/// 首次初始化时停顿一下，放大并发竞争窗口
struct SlowCountingPlugin {
    inits: AtomicUsize,
}

impl BitPlugin for SlowCountingPlugin {
    fn name(&self) -> &str {
        "slow-counter"
    }

    fn on_install(&self, _dotbit: &DotBit) -> Option<anyhow::Result<()>> {
        Some(Ok(()))
    }

    fn on_init_account(&self, _account: &BitAccount) -> anyhow::Result<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok(())
    }
}

#[test]
fn test_concurrent_first_access_constructs_once() {
    let (dotbit, _) = dotbit_with_cache();
    let dotbit = Arc::new(dotbit);
    let plugin = Arc::new(SlowCountingPlugin {
        inits: AtomicUsize::new(0),
    });
    dotbit.install_plugin(plugin.clone()).unwrap();

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let dotbit = dotbit.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                dotbit.account("race.bit").unwrap()
            })
        })
        .collect();

    let resolved: Vec<Arc<BitAccount>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(plugin.inits.load(Ordering::SeqCst), 1);
    assert!(resolved.iter().all(|a| Arc::ptr_eq(a, &resolved[0])));
}

/// 第一次初始化失败，之后成功；每次调用都停顿
struct FlakyPlugin {
    inits: AtomicUsize,
}

impl BitPlugin for FlakyPlugin {
    fn name(&self) -> &str {
        "flaky"
    }

    fn on_install(&self, _dotbit: &DotBit) -> Option<anyhow::Result<()>> {
        Some(Ok(()))
    }

    fn on_init_account(&self, _account: &BitAccount) -> anyhow::Result<()> {
        let attempt = self.inits.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(150));
        if attempt == 0 {
            anyhow::bail!("first attempt rejected");
        }
        Ok(())
    }
}

#[test]
fn test_failed_first_attempt_is_retried_once_for_waiters_and_latecomers() {
    let (dotbit, _) = dotbit_with_cache();
    let dotbit = Arc::new(dotbit);
    let plugin = Arc::new(FlakyPlugin {
        inits: AtomicUsize::new(0),
    });
    dotbit.install_plugin(plugin.clone()).unwrap();

    let spawn_after = |delay_ms: u64| {
        let dotbit = dotbit.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            dotbit.account("retry.bit")
        })
    };

    // 首个解析者失败时，等待者接手重试；失败之后到达的调用者加入同一次重试
    let first = spawn_after(0);
    let waiter = spawn_after(30);
    let latecomer = spawn_after(200);

    let first = first.join().unwrap();
    let waiter = waiter.join().unwrap().unwrap();
    let latecomer = latecomer.join().unwrap().unwrap();

    assert!(matches!(first, Err(DotbitError::Plugin { ref plugin, .. }) if plugin == "flaky"));
    assert!(Arc::ptr_eq(&waiter, &latecomer));
    assert_eq!(plugin.inits.load(Ordering::SeqCst), 2);

    let again = dotbit.account("retry.bit").unwrap();
    assert!(Arc::ptr_eq(&again, &waiter));
    assert_eq!(plugin.inits.load(Ordering::SeqCst), 2);
}
