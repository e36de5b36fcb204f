use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use redstone_bridge::events::lifecycle_events::{RegistryReady, Tick};
use redstone_bridge::events::ObjectKind;
use redstone_bridge::BridgeState;
use redstone_host::{HostConfig, HostLoop, InMemoryRegistrar, demo};

fn write_config(dir: &tempfile::TempDir, contents: &str) -> HostConfig {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    HostConfig::load_from(&path).unwrap()
}

#[tokio::test]
async fn test_full_lifecycle_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
tick_interval_ms = 1

[bridges.server]
registration_timeout_ms = 100

[bridges.client]
merged_task_runner = true
registration_timeout_ms = 100
"#,
    );

    let mut host = HostLoop::from_config(&config);
    for hosted in host.bridges() {
        demo::install(&hosted.bridge);
    }
    host.start().unwrap();

    let ready_seen = Arc::new(AtomicU64::new(0));
    for hosted in host.bridges() {
        let ready_seen = Arc::clone(&ready_seen);
        hosted.bridge.set_handler::<RegistryReady, _>(move |_| {
            ready_seen.fetch_add(1, Ordering::SeqCst);
        });
    }

    let mut registrar = InMemoryRegistrar::new();
    let summary = host.open_registries(&mut registrar).unwrap();
    assert_eq!(summary.blocks, 2);
    assert_eq!(summary.items, 2);
    assert_eq!(summary.block_entities, 2);
    assert_eq!(registrar.count(ObjectKind::Block), 2);
    assert_eq!(ready_seen.load(Ordering::SeqCst), 2);

    for hosted in host.bridges() {
        assert!(hosted.bridge.registrations().registrations_flushed());
    }

    host.announce_started();

    // Engine work posted from the client runtime's tick handler runs on the host thread
    let client = Arc::clone(host.bridge("client").unwrap());
    let tasks_run = Arc::new(AtomicU64::new(0));
    {
        let weak = Arc::downgrade(&client);
        let tasks_run = Arc::clone(&tasks_run);
        client.set_handler::<Tick, _>(move |_| {
            if let Some(bridge) = weak.upgrade() {
                let tasks_run = Arc::clone(&tasks_run);
                bridge.task_runner().unwrap().post_task(
                    Box::new(move || {
                        tasks_run.fetch_add(1, Ordering::SeqCst);
                    }),
                    Instant::now(),
                );
            }
        });
    }

    host.run(std::future::pending(), Some(10)).await;

    assert_eq!(host.current_tick(), 10);
    assert_eq!(tasks_run.load(Ordering::SeqCst), 10);
    for hosted in host.bridges() {
        assert_eq!(hosted.bridge.state(), BridgeState::ShutDown);
        assert!(hosted.bridge.handlers().is_empty());
    }
}

#[tokio::test]
async fn test_run_stops_on_shutdown_signal() {
    let mut host = HostLoop::new(Duration::from_millis(1));
    let bridge = Arc::new(redstone_bridge::RuntimeBridge::new("server"));
    host.add_bridge(Arc::clone(&bridge), Duration::from_millis(10));
    host.start().unwrap();

    host.run(tokio::time::sleep(Duration::from_millis(20)), None).await;

    assert!(host.current_tick() > 0);
    assert_eq!(bridge.state(), BridgeState::ShutDown);
}

#[test]
fn test_registry_phase_waits_for_late_runtime() {
    let mut host = HostLoop::new(Duration::from_millis(50));
    let bridge = Arc::new(redstone_bridge::RuntimeBridge::new("server"));
    host.add_bridge(Arc::clone(&bridge), Duration::from_secs(5));

    // The runtime finishes its mod init on its own thread after the host is waiting
    let runtime = {
        let bridge = Arc::clone(&bridge);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            demo::install(&bridge);
        })
    };

    let mut registrar = InMemoryRegistrar::new();
    let summary = host.open_registries(&mut registrar).unwrap();
    runtime.join().unwrap();

    assert_eq!(summary.total(), 3);
    let lamp = registrar.find("greeter:lamp").unwrap();
    assert_eq!(lamp.bridge, "server");
    assert_eq!(lamp.id, 1);
}

#[test]
fn test_disabled_bridges_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
[bridges.server]
enabled = false

[bridges.client]
merged_task_runner = true
"#,
    );

    let host = HostLoop::from_config(&config);
    assert_eq!(host.bridges().len(), 1);
    assert!(host.bridge("server").is_none());
    assert!(host.bridge("client").is_some());
}
