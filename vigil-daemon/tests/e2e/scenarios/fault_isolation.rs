//! Module fault isolation E2E tests.
//!
//! Validates that individual module failures do not cascade to
//! other modules, and that health reporting correctly reflects
//! degraded states.

use std::time::Duration;

use crate::helpers::mock_pipeline::{MockPipeline, StopOrderTracker};

use vigil_core::pipeline::HealthStatus;
use vigil_daemon::health::{ModuleHealth, aggregate_status};
use vigil_daemon::modules::{ModuleHandle, ModuleRegistry};

/// One module fails to start -> start_all() returns error.
/// Already-started modules should be cleaned up by caller.
#[tokio::test]
async fn test_e2e_one_module_start_failure_others_stop() {
    let mut registry = ModuleRegistry::new();

    let first = MockPipeline::healthy("first");
    let first_started = first.started.clone();
    registry.register(ModuleHandle::new("first", true, Box::new(first)));

    registry.register(ModuleHandle::new(
        "second",
        true,
        Box::new(MockPipeline::failing_start("second", "boom")),
    ));

    let third = MockPipeline::healthy("third");
    let third_started = third.started.clone();
    registry.register(ModuleHandle::new("third", true, Box::new(third)));

    let result = registry.start_all().await;

    assert!(result.is_err(), "start_all should fail when a module fails to start");
    assert!(
        first_started.load(std::sync::atomic::Ordering::SeqCst),
        "first module should have started before the failure"
    );
    assert!(
        !third_started.load(std::sync::atomic::Ordering::SeqCst),
        "third module should not start after an earlier module fails"
    );
}

/// One module Degraded -> other modules remain Healthy.
/// DaemonHealth aggregates to Degraded.
#[tokio::test]
async fn test_e2e_runtime_module_degraded_others_healthy() {
    let mut registry = ModuleRegistry::new();
    registry.register(ModuleHandle::new(
        "a",
        true,
        Box::new(MockPipeline::with_health("a", HealthStatus::Healthy)),
    ));
    registry.register(ModuleHandle::new(
        "b",
        true,
        Box::new(MockPipeline::with_health(
            "b",
            HealthStatus::Degraded("slow".to_owned()),
        )),
    ));
    registry.register(ModuleHandle::new(
        "c",
        true,
        Box::new(MockPipeline::with_health("c", HealthStatus::Healthy)),
    ));

    let statuses = registry.health_statuses().await;

    assert!(statuses[0].2.is_healthy());
    assert!(matches!(statuses[1].2, HealthStatus::Degraded(_)));
    assert!(statuses[2].2.is_healthy());

    let modules: Vec<ModuleHealth> = statuses
        .into_iter()
        .map(|(name, enabled, status)| ModuleHealth { name, enabled, status })
        .collect();
    assert!(matches!(aggregate_status(&modules), HealthStatus::Degraded(_)));
}

/// Producer channel closes (sender dropped) -> consumer handles gracefully.
#[tokio::test]
async fn test_e2e_channel_sender_dropped_receiver_handles() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<u8>(4);
    drop(tx);

    assert_eq!(rx.recv().await, None, "receiver should see a clean close, not a panic");
}

/// One module fails to stop -> stop_all() logs error and continues.
#[tokio::test]
async fn test_e2e_stop_failure_continues_others() {
    let mut registry = ModuleRegistry::new();

    registry.register(ModuleHandle::new(
        "healthy-a",
        true,
        Box::new(MockPipeline::healthy("healthy-a")),
    ));
    registry.register(ModuleHandle::new(
        "failing",
        true,
        Box::new(MockPipeline::failing_stop("failing", "stop boom")),
    ));

    let third = MockPipeline::healthy("healthy-c");
    let third_stopped = third.stopped.clone();
    registry.register(ModuleHandle::new("healthy-c", true, Box::new(third)));

    registry.start_all().await.expect("all modules should start");
    let result = registry.stop_all().await;

    assert!(result.is_err(), "stop_all should report the failing module's error");
    assert!(
        third_stopped.load(std::sync::atomic::Ordering::SeqCst),
        "later modules should still be stopped despite an earlier stop failure"
    );
}

/// Modules stop in registration order even when interleaved with delays.
#[tokio::test]
async fn test_e2e_stop_order_is_registration_order() {
    let tracker = StopOrderTracker::new();

    let mut registry = ModuleRegistry::new();
    registry.register(ModuleHandle::new(
        "slow",
        true,
        Box::new(
            MockPipeline::healthy("slow")
                .with_stop_delay(Duration::from_millis(20))
                .with_stop_order(tracker.clone()),
        ),
    ));
    registry.register(ModuleHandle::new(
        "fast",
        true,
        Box::new(MockPipeline::healthy("fast").with_stop_order(tracker.clone())),
    ));

    registry.start_all().await.expect("start should succeed");
    registry.stop_all().await.expect("stop should succeed");

    let log = tracker.get_log().await;
    assert_eq!(log[0].0, "slow", "stop_all awaits each module before moving to the next");
    assert_eq!(log[1].0, "fast");
}

/// Health aggregation: Unhealthy + Degraded + Healthy -> Unhealthy.
#[tokio::test]
async fn test_e2e_health_aggregation_worst_case() {
    let modules = vec![
        ModuleHealth {
            name: "healthy".to_owned(),
            enabled: true,
            status: HealthStatus::Healthy,
        },
        ModuleHealth {
            name: "degraded".to_owned(),
            enabled: true,
            status: HealthStatus::Degraded("slow".to_owned()),
        },
        ModuleHealth {
            name: "unhealthy".to_owned(),
            enabled: true,
            status: HealthStatus::Unhealthy("crashed".to_owned()),
        },
    ];

    let status = aggregate_status(&modules);
    assert!(status.is_unhealthy());
    if let HealthStatus::Unhealthy(reason) = status {
        assert!(reason.contains("unhealthy"));
    }
}

/// Health aggregation: all Healthy -> Healthy.
#[tokio::test]
async fn test_e2e_health_aggregation_all_healthy() {
    let modules = vec![
        ModuleHealth {
            name: "a".to_owned(),
            enabled: true,
            status: HealthStatus::Healthy,
        },
        ModuleHealth {
            name: "b".to_owned(),
            enabled: true,
            status: HealthStatus::Healthy,
        },
        ModuleHealth {
            name: "c".to_owned(),
            enabled: true,
            status: HealthStatus::Healthy,
        },
    ];

    assert!(aggregate_status(&modules).is_healthy());
}

/// Disabled modules do not affect health aggregation.
#[tokio::test]
async fn test_e2e_disabled_modules_excluded_from_health() {
    let modules = vec![ModuleHealth {
        name: "disabled".to_owned(),
        enabled: false,
        status: HealthStatus::Unhealthy("should be ignored".to_owned()),
    }];

    assert!(aggregate_status(&modules).is_healthy());
}
