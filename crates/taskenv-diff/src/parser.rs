use crate::error::DiffError;
use crate::types::{FileDiff, Hunk};

/// Parse a free-form blob from the planner into one or more file diffs
/// (spec §4.5 parsing). Strict `@@ -n,m +n,m @@` line numbers are accepted
/// but never trusted — fuzzy anchoring (see `anchor.rs`) does the real
/// work, so a malformed or absent range is not itself an error.
pub fn parse_diff_blob(blob: &str) -> Result<Vec<FileDiff>, DiffError> {
    let mut files = Vec::new();
    let mut lines = blob.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(src) = line.strip_prefix("--- ") else {
            continue;
        };
        let Some(next) = lines.next() else {
            return Err(DiffError::Hallucination);
        };
        let Some(tgt) = next.strip_prefix("+++ ") else {
            return Err(DiffError::Hallucination);
        };
        let src_file = src.trim().to_string();
        let tgt_file = tgt.trim().to_string();
        if src_file.is_empty() || tgt_file.is_empty() {
            return Err(DiffError::Hallucination);
        }

        let mut hunks = Vec::new();
        while let Some(&peeked) = lines.peek() {
            if !peeked.starts_with("@@") {
                break;
            }
            lines.next();
            hunks.push(parse_hunk_body(&mut lines)?);
        }
        files.push(FileDiff {
            src_file,
            tgt_file,
            hunks,
        });
    }

    if files.is_empty() {
        return Err(DiffError::Hallucination);
    }
    Ok(files)
}

fn parse_hunk_body<'a>(lines: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>) -> Result<Hunk, DiffError> {
    let mut hunk = Hunk::default();
    // Hunk body lines run until the next `@@`/`---` marker or end of blob.
    // Context lines before the first removed/added line are `context_before`;
    // any further context after removed/added lines starts `context_after`.
    let mut seen_change = false;
    while let Some(&line) = lines.peek() {
        if line.starts_with("@@") || line.starts_with("--- ") {
            break;
        }
        lines.next();
        if let Some(rest) = line.strip_prefix('-') {
            hunk.removed.push(rest.to_string());
            seen_change = true;
        } else if let Some(rest) = line.strip_prefix('+') {
            hunk.added.push(rest.to_string());
            seen_change = true;
        } else if let Some(rest) = line.strip_prefix(' ') {
            if seen_change {
                hunk.context_after.push(rest.to_string());
            } else {
                hunk.context_before.push(rest.to_string());
            }
        } else if line.is_empty() {
            // A blank context line with its leading space elided.
            if seen_change {
                hunk.context_after.push(String::new());
            } else {
                hunk.context_before.push(String::new());
            }
        } else {
            return Err(DiffError::MalformedHunk);
        }
    }
    Ok(hunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_file_one_hunk() {
        let blob = "--- a.py\n+++ a.py\n@@ -1,2 +1,2 @@\n def f():\n-    return 1\n+    return 2\n";
        let files = parse_diff_blob(blob).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].src_file, "a.py");
        assert_eq!(files[0].tgt_file, "a.py");
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].context_before, vec!["def f():".to_string()]);
        assert_eq!(files[0].hunks[0].removed, vec!["    return 1".to_string()]);
        assert_eq!(files[0].hunks[0].added, vec!["    return 2".to_string()]);
    }

    #[test]
    fn parses_multiple_files_in_one_blob() {
        let blob = "--- a.py\n+++ a.py\n@@ -1 +1 @@\n-x\n+y\n--- b.py\n+++ b.py\n@@ -1 +1 @@\n-p\n+q\n";
        let files = parse_diff_blob(blob).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].src_file, "b.py");
    }

    #[test]
    fn missing_target_path_is_hallucination() {
        let blob = "--- a.py\n@@ -1 +1 @@\n-x\n+y\n";
        assert_eq!(parse_diff_blob(blob), Err(DiffError::Hallucination));
    }

    #[test]
    fn blob_with_no_file_headers_is_hallucination() {
        assert_eq!(parse_diff_blob("just some text\n"), Err(DiffError::Hallucination));
    }

    #[test]
    fn trailing_context_after_change_is_captured() {
        let blob = "--- a.py\n+++ a.py\n@@ -1,3 +1,3 @@\n def f():\n-    return 1\n+    return 2\n     pass\n";
        let files = parse_diff_blob(blob).unwrap();
        assert_eq!(files[0].hunks[0].context_after, vec!["    pass".to_string()]);
    }
}
