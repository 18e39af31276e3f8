use std::collections::HashMap;

use taskenv_runtime::{ContainerHandle, ContainerRuntime};

use crate::error::SymbolsError;
use crate::python_parser::parse_python_source;
use crate::types::{ClassEntry, FunctionEntry};

/// Snapshot of every `def`/`class` in the repository's Python sources, built
/// once per `reset` (spec §4.4). Stale after a diff apply until the next
/// `reset` rebuilds it — the session owns that lifecycle, not this crate.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    functions: HashMap<String, Vec<FunctionEntry>>,
    classes: HashMap<String, Vec<ClassEntry>>,
}

impl SymbolIndex {
    /// Pull the repository out of the container as a tar archive and scan
    /// every `.py` file in it. `repo_root` is the in-container path to hand
    /// to `get_archive` (spec §6); `.gitignore`d paths (build artifacts,
    /// vendored dependencies) are skipped the same way the filesystem
    /// adapter's own directory walks skip them.
    pub async fn build<R: ContainerRuntime>(
        runtime: &R,
        handle: &ContainerHandle,
        repo_root: &str,
    ) -> Result<Self, SymbolsError> {
        let archive = runtime.get_archive(handle, repo_root).await?;
        let dir = tempfile::tempdir().map_err(SymbolsError::Archive)?;
        let mut unpacker = tar::Archive::new(std::io::Cursor::new(archive));
        unpacker.unpack(dir.path()).map_err(SymbolsError::Archive)?;

        let mut functions: HashMap<String, Vec<FunctionEntry>> = HashMap::new();
        let mut classes: HashMap<String, Vec<ClassEntry>> = HashMap::new();
        let root = repo_root.trim_end_matches('/');

        for entry in ignore::WalkBuilder::new(dir.path()).build() {
            let Ok(entry) = entry else { continue };
            if entry.file_type().is_none_or(|t| t.is_dir()) {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("py") {
                continue;
            }
            let Ok(text) = std::fs::read_to_string(path) else {
                continue;
            };
            let rel = path.strip_prefix(dir.path()).unwrap_or(path);
            let container_path = format!("{root}/{}", rel.to_string_lossy());

            let (fns, cls) = parse_python_source(&container_path, &text);
            for f in fns {
                functions.entry(f.qualified_name.clone()).or_default().push(f);
            }
            for c in cls {
                classes.entry(c.name.clone()).or_default().push(c);
            }
        }

        Ok(Self { functions, classes })
    }

    /// Look up by qualified name (`Class.method`) or bare method/function
    /// name. Entries beyond `byte_budget` total source bytes have their
    /// `source` truncated rather than being dropped, so the caller always
    /// learns the location even when the body doesn't fit.
    pub fn find_function(&self, name: &str, byte_budget: usize) -> Vec<FunctionEntry> {
        let matches: Vec<FunctionEntry> = self
            .functions
            .iter()
            .filter(|(q, _)| q.as_str() == name || q.rsplit('.').next() == Some(name))
            .flat_map(|(_, v)| v.iter().cloned())
            .collect();
        apply_byte_budget(matches, byte_budget, |e| &mut e.source)
    }

    pub fn find_class(&self, name: &str, byte_budget: usize) -> Vec<ClassEntry> {
        let matches: Vec<ClassEntry> = self.classes.get(name).cloned().unwrap_or_default();
        apply_byte_budget(matches, byte_budget, |e| &mut e.source)
    }

    pub fn function_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn class_count(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }
}

fn apply_byte_budget<T>(mut entries: Vec<T>, budget: usize, source: impl Fn(&mut T) -> &mut String) -> Vec<T> {
    let mut used = 0usize;
    for entry in &mut entries {
        let field = source(entry);
        if used >= budget {
            field.clear();
            continue;
        }
        let remaining = budget - used;
        if field.len() > remaining {
            field.truncate(remaining);
        }
        used += field.len();
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(qualified_name: &str, source: &str) -> FunctionEntry {
        FunctionEntry {
            qualified_name: qualified_name.to_string(),
            file: "a.py".to_string(),
            line: 1,
            source: source.to_string(),
        }
    }

    #[test]
    fn byte_budget_truncates_later_entries_first() {
        let entries = vec![function("a", "0123456789"), function("b", "0123456789")];
        let truncated = apply_byte_budget(entries, 15, |e| &mut e.source);
        assert_eq!(truncated[0].source.len(), 10);
        assert_eq!(truncated[1].source.len(), 5);
    }

    #[test]
    fn byte_budget_of_zero_clears_every_source() {
        let entries = vec![function("a", "x"), function("b", "y")];
        let truncated = apply_byte_budget(entries, 0, |e| &mut e.source);
        assert!(truncated.iter().all(|e| e.source.is_empty()));
    }
}
