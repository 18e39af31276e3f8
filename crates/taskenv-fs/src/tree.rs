use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A nested directory tree, as returned by `list_tree`. Leaves map to
/// `None`; directories map to their own nested `DirTree`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirTree {
    pub entries: BTreeMap<String, Option<DirTree>>,
}

impl DirTree {
    /// Build a tree from a flat list of paths relative to the root that was
    /// listed (as produced by `find <root> -print`, stripped of the root
    /// prefix).
    pub fn from_relative_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = DirTree::default();
        for path in paths {
            let path = path.as_ref().trim_start_matches("./");
            if path.is_empty() {
                continue;
            }
            insert_path(&mut root, path.split('/').filter(|s| !s.is_empty()));
        }
        root
    }
}

fn insert_path<'a>(node: &mut DirTree, mut components: impl Iterator<Item = &'a str>) {
    let Some(first) = components.next() else {
        return;
    };
    let rest: Vec<&str> = components.collect();
    if rest.is_empty() {
        node.entries.entry(first.to_string()).or_insert(None);
    } else {
        let child = node
            .entries
            .entry(first.to_string())
            .or_insert_with(|| Some(DirTree::default()));
        if child.is_none() {
            *child = Some(DirTree::default());
        }
        insert_path(child.as_mut().unwrap(), rest.into_iter());
    }
}
