use std::path::{Component, Path, PathBuf};

/// Lexically normalize `p` against repo root `root` and the shell's current
/// working directory `cwd`, per spec §4.3:
///
/// 1. if `p` already begins with `root`, return it as-is (leading slash
///    normalized);
/// 2. otherwise resolve it against `cwd`;
/// 3. if the result still does not lie under `root`, re-root it under
///    `root`.
///
/// The result never contains `..` segments and always lies under `root`.
pub fn normalize_under_root(p: &str, root: &Path, cwd: &Path) -> PathBuf {
    let candidate = PathBuf::from(p);

    let resolved = if starts_with_root(&candidate, root) {
        candidate
    } else if candidate.is_absolute() {
        candidate
    } else {
        cwd.join(candidate)
    };

    let lexical = lexically_normalize(&resolved);

    if starts_with_root(&lexical, root) {
        lexical
    } else {
        reroot(&lexical, root)
    }
}

fn starts_with_root(p: &Path, root: &Path) -> bool {
    lexically_normalize(p).starts_with(lexically_normalize(root))
}

/// Collapse `.`/`..` components without touching the filesystem. `..` at the
/// top of an absolute path has nowhere to go and is dropped.
fn lexically_normalize(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in p.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().last(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Strip any leading root/prefix components from `p` and re-attach it under
/// `root`, so a path that escaped (or never entered) the repo root is
/// confined back inside it.
fn reroot(p: &Path, root: &Path) -> PathBuf {
    let relative: PathBuf = p
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    root.join(relative)
}
