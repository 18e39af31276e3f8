use crate::error::AnchorError;
use crate::types::Hunk;

/// Find the single location in `file_lines` where `context_before + removed`
/// anchors, whitespace-insensitively (spec §4.5 resolution). Leading/
/// trailing whitespace on each anchor line is ignored; internal whitespace
/// must still match so that e.g. `a  =  1` does not match `a = 1`.
pub fn find_anchor(
    file_lines: &[&str],
    hunk: &Hunk,
    hunk_index: usize,
    path: &str,
) -> Result<usize, AnchorError> {
    let key: Vec<&str> = hunk
        .context_before
        .iter()
        .chain(hunk.removed.iter())
        .map(String::as_str)
        .collect();

    if key.is_empty() {
        return if file_lines.is_empty() {
            Err(AnchorError::Missing {
                hunk_index,
                path: path.to_string(),
            })
        } else {
            Err(AnchorError::Ambiguous {
                hunk_index,
                path: path.to_string(),
                count: file_lines.len() + 1,
            })
        };
    }

    let mut matches = Vec::new();
    if key.len() <= file_lines.len() {
        for start in 0..=(file_lines.len() - key.len()) {
            let window = &file_lines[start..start + key.len()];
            if window.iter().zip(key.iter()).all(|(a, b)| a.trim() == b.trim()) {
                matches.push(start);
            }
        }
    }

    match matches.len() {
        0 => Err(AnchorError::Missing {
            hunk_index,
            path: path.to_string(),
        }),
        1 => Ok(matches[0]),
        count => Err(AnchorError::Ambiguous {
            hunk_index,
            path: path.to_string(),
            count,
        }),
    }
}

/// Leading whitespace of a line, as a literal prefix to reuse verbatim.
pub(crate) fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Re-indent `added` lines to match `anchor_indent` — the real, on-disk
/// indentation of the hunk's first anchored line — while preserving the
/// relative indentation the planner wrote between the added lines
/// themselves (spec §4.5 application).
pub fn reindent_added(added: &[String], anchor_indent: &str) -> Vec<String> {
    let min_indent = added
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l).len())
        .min()
        .unwrap_or(0);

    added
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                l.clone()
            } else {
                format!("{anchor_indent}{}", &l[min_indent..])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(before: &[&str], removed: &[&str]) -> Hunk {
        Hunk {
            context_before: before.iter().map(|s| s.to_string()).collect(),
            removed: removed.iter().map(|s| s.to_string()).collect(),
            added: Vec::new(),
            context_after: Vec::new(),
        }
    }

    #[test]
    fn finds_unique_anchor() {
        let file = vec!["def f():", "    return 1", "def g():"];
        let h = hunk(&["def f():"], &["    return 1"]);
        assert_eq!(find_anchor(&file, &h, 0, "a.py"), Ok(0));
    }

    #[test]
    fn whitespace_insensitive_on_ends_not_internals() {
        let file = vec!["  def f():  ", "    x = 1"];
        let h = hunk(&["def f():"], &["    x = 1"]);
        assert_eq!(find_anchor(&file, &h, 0, "a.py"), Ok(0));
    }

    #[test]
    fn ambiguous_when_anchor_repeats() {
        let file = vec!["def f():", "    return 1", "def f():", "    return 1"];
        let h = hunk(&["def f():"], &["    return 1"]);
        assert_eq!(
            find_anchor(&file, &h, 2, "a.py"),
            Err(AnchorError::Ambiguous {
                hunk_index: 2,
                path: "a.py".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn missing_when_anchor_absent() {
        let file = vec!["def f():", "    return 1"];
        let h = hunk(&["def g():"], &["    return 2"]);
        assert_eq!(
            find_anchor(&file, &h, 0, "a.py"),
            Err(AnchorError::Missing {
                hunk_index: 0,
                path: "a.py".to_string()
            })
        );
    }

    #[test]
    fn reindent_preserves_relative_indentation() {
        let added = vec!["    if x:".to_string(), "        y()".to_string()];
        let reindented = reindent_added(&added, "        ");
        assert_eq!(reindented[0], "        if x:");
        assert_eq!(reindented[1], "            y()");
    }
}
