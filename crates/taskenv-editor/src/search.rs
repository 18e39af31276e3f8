use serde::{Deserialize, Serialize};

/// One match window: the line the term was found on (1-indexed) plus
/// `context_lines` of surrounding text on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub line: usize,
    pub window: String,
}

#[derive(Debug, thiserror::Error)]
#[error("more than {cap} lines matched for this term, narrow the search")]
pub struct TooManyMatches {
    pub cap: usize,
}

/// Every occurrence of `term` in `text`, each with `context_lines` lines of
/// context on each side (spec §4.3 `search_file`). Refuses once the raw
/// match count exceeds `max_matches` rather than returning a truncated
/// window list — a caller that silently got the first 10 of 200 matches
/// would have no way to tell it was looking at a partial result.
pub fn search_text(
    text: &str,
    term: &str,
    context_lines: usize,
    max_matches: usize,
) -> Result<Vec<SearchMatch>, TooManyMatches> {
    let lines: Vec<&str> = text.lines().collect();
    let mut matches = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if line.contains(term) {
            if matches.len() >= max_matches {
                return Err(TooManyMatches { cap: max_matches });
            }
            let start = idx.saturating_sub(context_lines);
            let end = (idx + context_lines + 1).min(lines.len());
            let window = lines[start..end].join("\n");
            matches.push(SearchMatch {
                line: idx + 1,
                window,
            });
        }
    }
    Ok(matches)
}
