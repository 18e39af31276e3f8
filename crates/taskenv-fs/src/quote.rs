/// Single-quote `s` for safe interpolation into a shell command line,
/// escaping any embedded single quotes the POSIX way: close the quote,
/// emit an escaped quote, reopen.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Pick a heredoc delimiter that does not occur anywhere in `content`,
/// widening a base token with a numeric suffix until it is safe.
pub fn heredoc_delimiter(content: &str) -> String {
    let base = "TASKENV_HEREDOC";
    if !content.contains(base) {
        return base.to_string();
    }
    for n in 0.. {
        let candidate = format!("{base}_{n}");
        if !content.contains(&candidate) {
            return candidate;
        }
    }
    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_strings() {
        assert_eq!(shell_quote("hello"), "'hello'");
    }

    #[test]
    fn escapes_embedded_quotes() {
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn delimiter_avoids_collision() {
        let content = format!("TASKENV_HEREDOC\nTASKENV_HEREDOC_0\n");
        let delim = heredoc_delimiter(&content);
        assert!(!content.contains(&delim));
    }
}
