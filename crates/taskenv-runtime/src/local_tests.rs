use crate::{ContainerRuntime, LocalProcessRuntime};

#[tokio::test]
async fn start_creates_an_isolated_root() {
    let runtime = LocalProcessRuntime::new();
    let a = runtime.start("irrelevant-image").await.unwrap();
    let b = runtime.start("irrelevant-image").await.unwrap();
    assert_ne!(a.id, b.id);
    assert_ne!(a.root, b.root);
}

#[tokio::test]
async fn exec_runs_inside_the_container_root() {
    let runtime = LocalProcessRuntime::new();
    let handle = runtime.start("irrelevant-image").await.unwrap();
    std::fs::write(handle.root.join("marker.txt"), "hi").unwrap();
    let out = runtime
        .exec(&handle, &["ls".to_string()])
        .await
        .unwrap();
    assert!(out.stdout.contains("marker.txt"));
    assert_eq!(out.exit_code, 0);
}

#[tokio::test]
async fn get_archive_round_trips_a_file() {
    let runtime = LocalProcessRuntime::new();
    let handle = runtime.start("irrelevant-image").await.unwrap();
    std::fs::write(handle.root.join("a.py"), "def f():\n    return 1\n").unwrap();
    let bytes = runtime.get_archive(&handle, "/").await.unwrap();

    let mut archive = tar::Archive::new(std::io::Cursor::new(bytes));
    let mut found = false;
    for entry in archive.entries().unwrap() {
        let entry = entry.unwrap();
        if entry.path().unwrap().ends_with("a.py") {
            found = true;
        }
    }
    assert!(found);
}

#[tokio::test]
async fn list_pids_reflects_a_spawned_child() {
    let runtime = LocalProcessRuntime::new();
    let handle = runtime.start("irrelevant-image").await.unwrap();
    let mut shell = runtime.spawn_interactive_shell(&handle).await.unwrap();
    use tokio::io::AsyncWriteExt;
    shell.stdin.write_all(b"sleep 5 &\n").await.unwrap();
    shell.stdin.flush().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let pids = runtime.list_pids(&handle).await.unwrap();
    assert!(pids.iter().any(|p| p.comm.contains("sleep")));
}
