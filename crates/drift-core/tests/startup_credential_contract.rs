//! Contract: a rejected credential is fatal before any record I/O
//!
//! Constraints verified:
//! - An inactive credential stops the process before the loop starts
//! - Zero record reads or writes happen under a rejected credential
//! - Exactly one failure notification is sent
//! - An active credential enters the loop normally
//!
//! If this test fails, the reconciler can run against a known-bad credential.

mod common;

use common::*;
use drift_core::Reconciler;

#[tokio::test]
async fn inactive_credential_never_reaches_the_record() {
    let resolver = StaticIpResolver::new("203.0.113.9");
    let provider = MockDnsProvider::new("203.0.113.9").with_inactive_token();
    let notifier = MockNotifier::new();

    let provider_probe = provider.clone();
    let notifier_probe = notifier.clone();

    let reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(notifier),
        &minimal_config(),
    )
    .expect("reconciler construction succeeds");

    // Dropped sender doubles as an immediate shutdown if the guard were
    // ever (incorrectly) passed.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    drop(shutdown_tx);

    let result = reconciler.run_with_shutdown(Some(shutdown_rx)).await;
    assert!(result.is_err(), "inactive credential is fatal");

    assert_eq!(provider_probe.verify_call_count(), 1);
    assert_eq!(provider_probe.read_call_count(), 0, "no read before the check passes");
    assert_eq!(provider_probe.write_call_count(), 0, "no write before the check passes");

    let messages = notifier_probe.messages();
    assert_eq!(messages.len(), 1, "exactly one failure notification");
    assert!(
        messages[0].contains("not active"),
        "unexpected message: {}",
        messages[0]
    );
}

#[tokio::test]
async fn unverifiable_credential_is_fatal() {
    let resolver = StaticIpResolver::new("203.0.113.9");
    let provider = MockDnsProvider::new("203.0.113.9").with_failing_verify();
    let notifier = MockNotifier::new();

    let provider_probe = provider.clone();
    let notifier_probe = notifier.clone();

    let reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(notifier),
        &minimal_config(),
    )
    .expect("reconciler construction succeeds");

    let result = reconciler.verify_startup().await;
    assert!(result.is_err(), "a failed verification call is fatal");

    assert_eq!(provider_probe.read_call_count(), 0);
    assert_eq!(provider_probe.write_call_count(), 0);
    assert_eq!(notifier_probe.messages().len(), 1);
}

#[tokio::test]
async fn active_credential_enters_the_loop() {
    let resolver = StaticIpResolver::new("203.0.113.9");
    let provider = MockDnsProvider::new("203.0.113.9");
    let notifier = MockNotifier::new();

    let provider_probe = provider.clone();

    let reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(notifier),
        &minimal_config(),
    )
    .expect("reconciler construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle =
        tokio::spawn(async move { reconciler.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    shutdown_tx.send(()).expect("send succeeds");

    let result = handle.await.expect("reconciler task completes");
    assert!(result.is_ok(), "loop shuts down cleanly");

    assert_eq!(provider_probe.verify_call_count(), 1);
    assert!(provider_probe.read_call_count() >= 1, "loop performed at least one tick");
}
