use taskenv_runtime::{ContainerRuntime, LocalProcessRuntime};

use crate::SymbolIndex;

#[tokio::test]
async fn build_scans_python_files_under_repo_root() {
    let runtime = LocalProcessRuntime::new();
    let handle = runtime.start("irrelevant").await.unwrap();

    // `exec` runs with the container root as its cwd but does not chroot,
    // so container-rooted paths must stay relative here; `get_archive`
    // itself does the root-relative resolution (see `local.rs`).
    let mkdir = runtime
        .exec(&handle, &["mkdir".to_string(), "-p".to_string(), "repo".to_string()])
        .await
        .unwrap();
    assert_eq!(mkdir.exit_code, 0);

    let pwd = runtime
        .exec(
            &handle,
            &["sh".to_string(), "-c".to_string(), "cd repo && pwd -P".to_string()],
        )
        .await
        .unwrap();
    let host_repo_path = std::path::PathBuf::from(pwd.stdout.trim());
    std::fs::write(
        host_repo_path.join("models.py"),
        "class Widget:\n    def spin(self):\n        pass\n\n\ndef make_widget():\n    return Widget()\n",
    )
    .unwrap();

    let index = SymbolIndex::build(&runtime, &handle, "/repo").await.unwrap();
    assert_eq!(index.function_count(), 2);
    assert_eq!(index.class_count(), 1);

    let methods = index.find_function("spin", 4096);
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].qualified_name, "Widget.spin");

    let classes = index.find_class("Widget", 4096);
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].members, vec!["spin".to_string()]);
}
