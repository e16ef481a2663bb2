use std::sync::Arc;
use std::time::{Duration, Instant};

use wallet_selector_core::{probe, ProbeOptions, ProviderSlot};

#[tokio::test]
async fn predicate_turning_true_within_window_is_detected() {
    let start = Instant::now();
    let found = probe(
        || start.elapsed() >= Duration::from_millis(50),
        ProbeOptions::with_timeout(Duration::from_secs(3)),
    )
    .await;
    assert!(found);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn predicate_never_true_returns_false() {
    let start = Instant::now();
    let found = probe(|| false, ProbeOptions::with_timeout(Duration::from_millis(100))).await;
    assert!(!found);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn immediate_predicate_does_not_wait_for_interval() {
    let start = Instant::now();
    let found = probe(
        || true,
        ProbeOptions {
            timeout: Duration::from_secs(5),
            interval: Duration::from_secs(1),
        },
    )
    .await;
    assert!(found);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn concurrent_probes_are_independent() {
    let start = Instant::now();
    let (fast, never) = tokio::join!(
        probe(
            || start.elapsed() >= Duration::from_millis(20),
            ProbeOptions::with_timeout(Duration::from_secs(2)),
        ),
        probe(|| false, ProbeOptions::with_timeout(Duration::from_millis(80))),
    );
    assert!(fast);
    assert!(!never);
}

#[tokio::test]
async fn slot_probe_sees_late_injection() {
    let slot: ProviderSlot<String> = ProviderSlot::empty();
    assert!(!slot.is_present());

    let injector = slot.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        injector.inject(Arc::new("near".to_owned()));
    });

    let provider = slot
        .wait_for(|p| p == "near", ProbeOptions::with_timeout(Duration::from_secs(2)))
        .await
        .expect("provider injected");
    assert_eq!(provider.as_str(), "near");

    slot.clear();
    let missing = slot
        .wait_for(|_| true, ProbeOptions::with_timeout(Duration::from_millis(60)))
        .await;
    assert!(missing.is_none());
}
