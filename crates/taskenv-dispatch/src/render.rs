use taskenv_core::LintDelta;
use taskenv_diff::DiffResult;
use taskenv_fs::{DirTree, GrepMatch};
use taskenv_symbols::{ClassEntry, FunctionEntry};

pub fn render_tree(tree: &DirTree) -> String {
    let mut out = String::new();
    render_tree_at(tree, 0, &mut out);
    out
}

fn render_tree_at(tree: &DirTree, depth: usize, out: &mut String) {
    for (name, child) in &tree.entries {
        out.push_str(&"  ".repeat(depth));
        out.push_str(name);
        out.push('\n');
        if let Some(child) = child {
            render_tree_at(child, depth + 1, out);
        }
    }
}

pub fn render_grep_matches(matches: &[GrepMatch]) -> String {
    if matches.is_empty() {
        return "No matches found".to_string();
    }
    matches
        .iter()
        .map(|m| format!("{}: {}", m.path, m.count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_functions(name: &str, entries: &[FunctionEntry]) -> String {
    if entries.is_empty() {
        return format!("No function named '{name}' found");
    }
    entries
        .iter()
        .map(|f| format!("{}:{}\n{}", f.file, f.line, f.source))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn render_classes(name: &str, entries: &[ClassEntry]) -> String {
    if entries.is_empty() {
        return format!("No class named '{name}' found");
    }
    entries
        .iter()
        .map(|c| format!("{}:{}\n{}", c.file, c.line, c.source))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn render_diff_result(result: &DiffResult) -> String {
    let mut lines = Vec::new();
    for applied in &result.success {
        lines.push(format!("Edited {}", applied.path));
        if !applied.lint_delta.is_empty() {
            lines.push(render_lint_delta(&applied.lint_delta));
        }
    }
    for failed in &result.fail {
        lines.push(format!("{}: {}", failed.path, failed.reason));
    }
    if lines.is_empty() {
        lines.push("No changes applied".to_string());
    }
    lines.join("\n")
}

fn render_lint_delta(delta: &LintDelta) -> String {
    let mut out = Vec::new();
    for finding in &delta.added {
        out.push(format!(
            "  + {}:{} {} {}",
            finding.line, finding.column, finding.code, finding.message
        ));
    }
    for finding in &delta.removed {
        out.push(format!(
            "  - {}:{} {} {}",
            finding.line, finding.column, finding.code, finding.message
        ));
    }
    out.join("\n")
}
