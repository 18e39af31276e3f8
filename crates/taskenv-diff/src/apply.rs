use taskenv_core::LintDelta;
use taskenv_editor::Editor;
use taskenv_runtime::ContainerRuntime;

use crate::anchor::{find_anchor, indent_of, reindent_added};
use crate::error::DiffError;
use crate::lint;
use crate::parser::parse_diff_blob;
use crate::syntax::check_syntax;
use crate::types::{AppliedFile, DiffResult, FailedFile, FileDiff};

/// Parse and apply a planner-supplied diff blob (spec §4.5). `src_file` is
/// treated as the file identity for both read and write — diffs that name
/// a different `tgt_file` are accepted (the path is recorded) but this
/// engine edits in place rather than performing a rename, the same
/// restriction the prototype's patch function carried.
pub async fn apply_diff_blob<R: ContainerRuntime>(editor: &Editor<R>, blob: &str) -> Result<DiffResult, DiffError> {
    let files = parse_diff_blob(blob)?;
    let mut result = DiffResult::default();
    for file in &files {
        match apply_one_file(editor, file).await {
            Ok(applied) => result.success.push(applied),
            Err(failed) => result.fail.push(failed),
        }
    }
    Ok(result)
}

async fn apply_one_file<R: ContainerRuntime>(editor: &Editor<R>, file: &FileDiff) -> Result<AppliedFile, FailedFile> {
    let path = file.src_file.clone();

    let abs = editor.fs().normalize(&path).await.map_err(|e| FailedFile {
        path: path.clone(),
        reason: format!("Error applying diff: {e}"),
        old_contents: String::new(),
    })?;
    if abs.components().any(|c| c.as_os_str() == "tests") {
        return Err(FailedFile {
            path: path.clone(),
            reason: "Error applying diff: refusing to edit a path under tests/".to_string(),
            old_contents: String::new(),
        });
    }

    let old_contents = editor.fs().read(&path).await.map_err(|e| FailedFile {
        path: path.clone(),
        reason: format!("Error applying diff: {e}"),
        old_contents: String::new(),
    })?;

    let new_contents = match apply_hunks(&old_contents, file, &path) {
        Ok(c) => c,
        Err(reason) => {
            return Err(FailedFile {
                path,
                reason,
                old_contents,
            });
        }
    };

    if let Err(msg) = check_syntax(&path, &new_contents) {
        return Err(FailedFile {
            path,
            reason: format!("Error applying diff: {msg}"),
            old_contents,
        });
    }

    let before_findings = lint::run_all(&path, &old_contents);
    let after_findings = lint::run_all(&path, &new_contents);
    let lint_delta = LintDelta::diff(&before_findings, &after_findings);

    editor.write_file(&path, &new_contents).await.map_err(|e| FailedFile {
        path: path.clone(),
        reason: format!("Error applying diff: {e}"),
        old_contents: old_contents.clone(),
    })?;

    Ok(AppliedFile {
        path,
        new_contents,
        old_contents,
        lint_delta,
    })
}

/// Apply every hunk in source order, re-anchoring against the
/// progressively-updated line vector so earlier hunks' insertions and
/// deletions shift later anchors correctly.
fn apply_hunks(old_contents: &str, file: &FileDiff, path: &str) -> Result<String, String> {
    let mut lines: Vec<String> = old_contents.lines().map(str::to_string).collect();
    let had_trailing_newline = old_contents.ends_with('\n') || old_contents.is_empty();

    for (i, hunk) in file.hunks.iter().enumerate() {
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let anchor = find_anchor(&borrowed, hunk, i, path).map_err(|e| e.to_string())?;

        let anchor_indent = indent_of(&lines[anchor]).to_string();
        let reindented = reindent_added(&hunk.added, &anchor_indent);
        let replace_start = anchor + hunk.context_before.len();
        let replace_end = replace_start + hunk.removed.len();
        lines.splice(replace_start..replace_end, reindented);
    }

    let mut new_contents = lines.join("\n");
    if had_trailing_newline && !new_contents.is_empty() {
        new_contents.push('\n');
    }
    Ok(new_contents)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskenv_core::Config;
    use taskenv_fs::FsAdapter;
    use taskenv_runtime::LocalProcessRuntime;
    use taskenv_shell::ShellBridge;

    use super::*;

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
    async fn happy_edit_applies_and_reports_success() {
        let (editor, root) = editor_with_root().await;
        let a = p(&root, "a.py");
        editor.create_file(&a, "def f():\n    return 1\n").await.unwrap();

        let blob = format!(
            "--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n def f():\n-    return 1\n+    return 2\n"
        );
        let result = apply_diff_blob(&editor, &blob).await.unwrap();
        assert_eq!(result.fail.len(), 0);
        assert_eq!(result.success.len(), 1);
        assert_eq!(result.success[0].new_contents, "def f():\n    return 2\n");

        let matches = editor.search_file("return 2", &a).await.unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn ambiguous_anchor_fails_without_mutation() {
        let (editor, root) = editor_with_root().await;
        let a = p(&root, "a.py");
        let original = "def f():\n    return 1\n\n\ndef f():\n    return 1\n";
        editor.create_file(&a, original).await.unwrap();

        let blob = format!("--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n-    return 1\n+    return 2\n");
        let result = apply_diff_blob(&editor, &blob).await.unwrap();
        assert_eq!(result.success.len(), 0);
        assert_eq!(result.fail.len(), 1);
        assert!(result.fail[0].reason.contains("anchor"));

        let (_, lines) = editor.current_page(&a).await.unwrap();
        assert_eq!(lines.join("\n") + "\n", original);
    }

    #[tokio::test]
    async fn syntax_regression_is_rejected() {
        let (editor, root) = editor_with_root().await;
        let a = p(&root, "a.py");
        editor.create_file(&a, "def f():\n    return (1)\n").await.unwrap();

        let blob = format!(
            "--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n def f():\n-    return (1)\n+    return (1\n"
        );
        let result = apply_diff_blob(&editor, &blob).await.unwrap();
        assert_eq!(result.success.len(), 0);
        assert!(result.fail[0].reason.starts_with("Error applying diff:"));

        let (_, lines) = editor.current_page(&a).await.unwrap();
        assert_eq!(lines, vec!["def f():".to_string(), "    return (1)".to_string()]);
    }

    #[tokio::test]
    async fn tests_path_guard_refuses_to_write() {
        let (editor, root) = editor_with_root().await;
        std::fs::create_dir_all(root.join("tests")).unwrap();
        let a = p(&root, "tests/test_x.py");
        editor.create_file(&a, "def test_x():\n    assert True\n").await.unwrap();

        let blob = format!(
            "--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n def test_x():\n-    assert True\n+    assert False\n"
        );
        let result = apply_diff_blob(&editor, &blob).await.unwrap();
        assert_eq!(result.success.len(), 0);
        assert!(result.fail[0].reason.contains("tests/"));

        let (_, lines) = editor.current_page(&a).await.unwrap();
        assert_eq!(lines, vec!["def test_x():".to_string(), "    assert True".to_string()]);
    }

    #[tokio::test]
    async fn lint_delta_reports_new_undefined_name() {
        let (editor, root) = editor_with_root().await;
        let a = p(&root, "a.py");
        editor.create_file(&a, "def f():\n    return 1\n").await.unwrap();

        let blob = format!(
            "--- {a}\n+++ {a}\n@@ -1,2 +1,2 @@\n def f():\n-    return 1\n+    return some_undefined_name\n"
        );
        let result = apply_diff_blob(&editor, &blob).await.unwrap();
        assert_eq!(result.success.len(), 1);
        assert!(result.success[0]
            .lint_delta
            .added
            .iter()
            .any(|f| f.message.contains("some_undefined_name")));
    }
}
