use std::sync::Arc;

use taskenv_core::Config;
use taskenv_fs::FsAdapter;
use taskenv_runtime::{ContainerRuntime, LocalProcessRuntime};
use taskenv_shell::ShellBridge;

use crate::Editor;

async fn editor_with_root() -> (Editor<LocalProcessRuntime>, std::path::PathBuf) {
    let runtime = Arc::new(LocalProcessRuntime::new());
    let handle = runtime.start("irrelevant").await.unwrap();
    let root = handle.root.clone();
    let bridge = Arc::new(ShellBridge::init(runtime, handle).await.unwrap());
    let fs = FsAdapter::new(bridge, root.clone(), Config::default());
    (Editor::new(fs, Config::default()), root)
}

fn p(root: &std::path::Path, name: &str) -> String {
    root.join(name).to_string_lossy().into_owned()
}

#[tokio::test]
async fn open_close_tracks_invariant_over_interleaving() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "a.py");
    let b = p(&root, "b.py");
    editor.create_file(&a, "1\n").await.unwrap();
    editor.create_file(&b, "2\n").await.unwrap();
    assert!(editor.is_open(&a).await.unwrap());
    assert!(editor.is_open(&b).await.unwrap());

    editor.close_file(&a).await.unwrap();
    assert!(!editor.is_open(&a).await.unwrap());
    assert!(editor.is_open(&b).await.unwrap());

    // close on a non-open file silently succeeds.
    editor.close_file(&a).await.unwrap();
}

#[tokio::test]
async fn open_file_fails_when_already_open_or_missing() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "a.py");
    editor.create_file(&a, "x\n").await.unwrap();
    editor.close_file(&a).await.unwrap();
    editor.open_file(&a).await.unwrap();
    assert!(editor.open_file(&a).await.is_err());

    let missing = p(&root, "missing.py");
    assert!(editor.open_file(&missing).await.is_err());
}

#[tokio::test]
async fn create_file_fails_if_it_already_exists() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "a.py");
    editor.create_file(&a, "x\n").await.unwrap();
    assert!(editor.create_file(&a, "y\n").await.is_err());
}

#[tokio::test]
async fn scroll_to_line_maps_to_expected_page() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "big.py");
    let content: String = (0..1000).map(|i| format!("line {i}\n")).collect();
    editor.create_file(&a, &content).await.unwrap();

    // 1000 lines, PAGE_SIZE=200 -> last page index 5.
    let page = editor.scroll_to_line(&a, 1).await.unwrap();
    assert_eq!(page, 0);
    let page = editor.scroll_to_line(&a, 201).await.unwrap();
    assert_eq!(page, 1);
    let page = editor.scroll_to_line(&a, 1000).await.unwrap();
    assert_eq!(page, 4);
}

#[tokio::test]
async fn scroll_up_and_down_clamp_at_bounds() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "small.py");
    editor.create_file(&a, "one\ntwo\n").await.unwrap();
    assert_eq!(editor.scroll_up(&a).await.unwrap(), 0);
    assert_eq!(editor.scroll_down(&a).await.unwrap(), 0);
}

#[tokio::test]
async fn write_file_shrinking_line_count_clamps_page() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "big.py");
    let content: String = (0..1000).map(|i| format!("line {i}\n")).collect();
    editor.create_file(&a, &content).await.unwrap();
    editor.scroll_to_line(&a, 999).await.unwrap();

    editor.write_file(&a, "only one line\n").await.unwrap();
    let (page, _lines) = editor.current_page(&a).await.unwrap();
    assert_eq!(page, 0);
}

#[tokio::test]
async fn write_file_requires_existing_file() {
    let (editor, root) = editor_with_root().await;
    let missing = p(&root, "missing.py");
    assert!(editor.write_file(&missing, "x").await.is_err());
}

#[tokio::test]
async fn refresh_picks_up_external_mutation() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "a.py");
    editor.create_file(&a, "old\n").await.unwrap();
    // External mutation (e.g. from the diff engine) bypassing the editor.
    std::fs::write(root.join("a.py"), "new\n").unwrap();
    editor.refresh().await.unwrap();
    let (_, lines) = editor.current_page(&a).await.unwrap();
    assert_eq!(lines, vec!["new".to_string()]);
}

#[tokio::test]
async fn search_file_returns_windows_with_context() {
    let (editor, root) = editor_with_root().await;
    let a = p(&root, "a.py");
    editor.create_file(&a, "one\ntwo\nneedle\nfour\nfive\n").await.unwrap();
    let matches = editor.search_file("needle", &a).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].line, 3);
}
