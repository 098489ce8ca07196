//! Graceful shutdown order verification.
//!
//! Validates that modules are stopped in the correct order
//! (registration order) and that pending events can be drained
//! during shutdown.

use std::time::{Duration, Instant};

use crate::helpers::mock_pipeline::{MockPipeline, StopOrderTracker};

use vigil_daemon::modules::{ModuleHandle, ModuleRegistry};

/// Modules stop in registration order: detector, container-stats, http-api, chat-bot.
#[tokio::test]
async fn test_e2e_shutdown_order_registration_first() {
    let tracker = StopOrderTracker::new();
    let names = ["detector", "container-stats", "http-api", "chat-bot"];

    let mut registry = ModuleRegistry::new();
    for name in names {
        let pipeline = MockPipeline::healthy(name).with_stop_order(tracker.clone());
        registry.register(ModuleHandle::new(name, true, Box::new(pipeline)));
    }

    registry.start_all().await.expect("start_all should succeed");
    registry.stop_all().await.expect("stop_all should succeed");

    let log = tracker.get_log().await;
    let order: Vec<&str> = log.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, names);
}

/// Pending events in channels are drained during shutdown.
#[tokio::test]
async fn test_e2e_shutdown_drains_pending_events() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<u32>(8);
    for i in 0..3 {
        tx.send(i).await.expect("send should succeed");
    }
    drop(tx);

    let mut drained = Vec::new();
    while let Some(value) = rx.recv().await {
        drained.push(value);
    }

    assert_eq!(drained, vec![0, 1, 2]);
}

/// Module stop timeout: a slow module's stop still completes and does not
/// block the registry from reporting overall success.
#[tokio::test]
async fn test_e2e_shutdown_timeout_handling() {
    let mut registry = ModuleRegistry::new();

    let slow = MockPipeline::healthy("slow").with_stop_delay(Duration::from_millis(100));
    let slow_stopped = slow.stopped.clone();
    registry.register(ModuleHandle::new("slow", true, Box::new(slow)));

    let fast = MockPipeline::healthy("fast");
    let fast_stopped = fast.stopped.clone();
    registry.register(ModuleHandle::new("fast", true, Box::new(fast)));

    registry.start_all().await.expect("start_all should succeed");

    let started = Instant::now();
    registry.stop_all().await.expect("stop_all should succeed");
    let elapsed = started.elapsed();

    assert!(
        elapsed >= Duration::from_millis(90),
        "stop_all should wait for the slow module's delay, took {:?}",
        elapsed
    );
    assert!(slow_stopped.load(std::sync::atomic::Ordering::SeqCst));
    assert!(fast_stopped.load(std::sync::atomic::Ordering::SeqCst));
}

/// One module fails to stop -> remaining modules still stop.
#[tokio::test]
async fn test_e2e_shutdown_partial_failure_continues() {
    let mut registry = ModuleRegistry::new();

    let first = MockPipeline::healthy("first");
    let first_stopped = first.stopped.clone();
    registry.register(ModuleHandle::new("first", true, Box::new(first)));

    registry.register(ModuleHandle::new(
        "failing",
        true,
        Box::new(MockPipeline::failing_stop("failing", "disk full")),
    ));

    let third = MockPipeline::healthy("third");
    let third_stopped = third.stopped.clone();
    registry.register(ModuleHandle::new("third", true, Box::new(third)));

    registry.start_all().await.expect("start_all should succeed");
    let result = registry.stop_all().await;

    assert!(result.is_err());
    assert!(first_stopped.load(std::sync::atomic::Ordering::SeqCst));
    assert!(third_stopped.load(std::sync::atomic::Ordering::SeqCst));
}

/// PID file is removed after shutdown.
#[tokio::test]
async fn test_e2e_pid_file_cleanup_after_shutdown() {
    let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
    let pid_path = temp_dir.path().join("vigil.pid");

    std::fs::write(&pid_path, std::process::id().to_string()).expect("should write PID file");
    assert!(pid_path.exists());

    std::fs::remove_file(&pid_path).expect("should remove PID file on shutdown");

    assert!(!pid_path.exists(), "PID file should be gone after shutdown");
}

/// start_all() then stop_all() twice is safe.
#[tokio::test]
async fn test_e2e_shutdown_stop_twice_safe() {
    let mut registry = ModuleRegistry::new();
    registry.register(ModuleHandle::new(
        "only",
        true,
        Box::new(MockPipeline::healthy("only")),
    ));

    registry.start_all().await.expect("start_all should succeed");
    registry.stop_all().await.expect("first stop_all should succeed");
    registry.stop_all().await.expect("second stop_all should remain safe");
}
