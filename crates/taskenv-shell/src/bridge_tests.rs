use std::sync::Arc;
use std::time::Duration;

use taskenv_runtime::{ContainerRuntime, LocalProcessRuntime};

use crate::ShellBridge;

async fn bridge() -> ShellBridge<LocalProcessRuntime> {
    let runtime = Arc::new(LocalProcessRuntime::new());
    let handle = runtime.start("irrelevant").await.unwrap();
    ShellBridge::init(runtime, handle).await.unwrap()
}

#[tokio::test]
async fn echo_round_trip_reports_zero_exit_code() {
    let bridge = bridge().await;
    let (output, code) = bridge
        .communicate("echo hello", Duration::from_secs(5))
        .await
        .unwrap();
    assert!(output.contains("hello"), "output was: {output:?}");
    assert_eq!(code, 0);
}

#[tokio::test]
async fn nonzero_exit_is_reported_not_an_error() {
    let bridge = bridge().await;
    let (_output, code) = bridge
        .communicate("exit 3", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn malformed_input_is_rejected_before_execution() {
    let bridge = bridge().await;
    let (output, code) = bridge
        .communicate("if true; then", Duration::from_secs(5))
        .await
        .unwrap();
    assert_ne!(code, 0);
    assert!(!output.is_empty());
}

#[tokio::test]
async fn timeout_surfaces_marker_and_shell_survives() {
    let bridge = bridge().await;
    let (output, code) = bridge
        .communicate("sleep 5", Duration::from_millis(500))
        .await
        .unwrap();
    assert!(output.contains("EXECUTION TIMED OUT"));
    assert_eq!(code, 124);

    // Scenario 5: a subsequent call succeeds without a container reset.
    let (cwd_output, cwd_code) = bridge
        .communicate("pwd", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(cwd_code, 0);
    assert!(!cwd_output.trim().is_empty());
}

#[tokio::test]
async fn sequential_calls_observe_shared_shell_state() {
    let bridge = bridge().await;
    bridge
        .communicate("export TASKENV_TEST=abc", Duration::from_secs(5))
        .await
        .unwrap();
    let (output, code) = bridge
        .communicate("echo $TASKENV_TEST", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(code, 0);
    assert!(output.contains("abc"));
}
