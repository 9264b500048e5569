use super::*;
use anyhow::anyhow;
use crossbeam::channel;
use donkey_engine::MemoryEngine;
use donkey_runtime::ServerSettings;

fn loopback(threads: usize) -> DaemonConfig {
    DaemonConfig {
        server: ServerSettings {
            bind: "127.0.0.1".into(),
            port: 0,
            threads,
        },
        log_level: None,
    }
}

fn terminations(reasons: &[Termination]) -> channel::Receiver<Termination> {
    let (tx, rx) = channel::unbounded();
    for reason in reasons {
        tx.send(*reason).expect("send");
    }
    rx
}

#[test]
fn restart_builds_a_new_generation_with_reloaded_config() {
    let lifecycle = Arc::new(Lifecycle::new());
    let mut rx = terminations(&[Termination::Restart, Termination::Shutdown]);
    let mut reloads = 0;

    let last = drive(
        Arc::new(MemoryEngine::new()),
        Arc::clone(&lifecycle),
        loopback(1),
        &mut rx,
        || {
            reloads += 1;
            Ok(loopback(3))
        },
    )
    .expect("drive");

    assert_eq!(reloads, 1);
    assert_eq!(lifecycle.snapshot().restart_count, 2);
    assert_eq!(last.server.threads, 3);
}

#[test]
fn failed_reload_keeps_serving_with_previous_config() {
    let lifecycle = Arc::new(Lifecycle::new());
    let mut rx = terminations(&[
        Termination::Restart,
        Termination::Restart,
        Termination::Shutdown,
    ]);

    let last = drive(
        Arc::new(MemoryEngine::new()),
        Arc::clone(&lifecycle),
        loopback(2),
        &mut rx,
        || Err(anyhow!("Failed to parse settings")),
    )
    .expect("a bad settings file must not stop the daemon");

    assert_eq!(lifecycle.snapshot().restart_count, 3);
    assert_eq!(last.server.threads, 2);
}

#[test]
fn shutdown_stops_without_reloading() {
    let lifecycle = Arc::new(Lifecycle::new());
    let mut rx = terminations(&[Termination::Shutdown]);

    drive(
        Arc::new(MemoryEngine::new()),
        Arc::clone(&lifecycle),
        loopback(1),
        &mut rx,
        || panic!("no reload on shutdown"),
    )
    .expect("drive");

    assert_eq!(lifecycle.snapshot().restart_count, 1);
}
