use crate::error::DispatchError;

/// Shell-like word-splitting (spec §4.6): whitespace separates tokens,
/// `"..."` holds a double-quoted literal, `[...]` holds a bracketed literal
/// (nesting respected so a list-of-lists stays one token), and `<<<...>>>`
/// delimits a multi-line literal that may itself contain newlines, quotes,
/// or brackets verbatim — used for diff blobs and file contents.
pub fn tokenize(input: &str) -> Result<Vec<String>, DispatchError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        if starts_with_triple_angle(&chars, i) {
            i += 3;
            let start = i;
            match find_triple_angle_close(&chars, i) {
                Some(end) => {
                    tokens.push(chars[start..end].iter().collect());
                    i = end + 3;
                }
                None => return Err(DispatchError::UnterminatedLiteral),
            }
        } else if chars[i] == '"' {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != '"' {
                i += 1;
            }
            if i >= chars.len() {
                return Err(DispatchError::UnterminatedString);
            }
            tokens.push(chars[start..i].iter().collect());
            i += 1;
        } else if chars[i] == '[' {
            let start = i;
            let mut depth = 0i32;
            while i < chars.len() {
                match chars[i] {
                    '[' => depth += 1,
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            i += 1;
                            break;
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            if depth != 0 {
                return Err(DispatchError::UnterminatedBracket);
            }
            tokens.push(chars[start..i].iter().collect());
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        }
    }

    Ok(tokens)
}

fn starts_with_triple_angle(chars: &[char], i: usize) -> bool {
    i + 2 < chars.len() && chars[i] == '<' && chars[i + 1] == '<' && chars[i + 2] == '<'
}

fn find_triple_angle_close(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 2 < chars.len() {
        if chars[i] == '>' && chars[i + 1] == '>' && chars[i + 2] == '>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("open_file a.py").unwrap(), vec!["open_file", "a.py"]);
    }

    #[test]
    fn respects_double_quoted_strings() {
        assert_eq!(
            tokenize(r#"search_file "hello world" a.py"#).unwrap(),
            vec!["search_file", "hello world", "a.py"]
        );
    }

    #[test]
    fn respects_nested_bracket_literals() {
        assert_eq!(
            tokenize("some_verb [1, [2, 3], 4]").unwrap(),
            vec!["some_verb", "[1, [2, 3], 4]"]
        );
    }

    #[test]
    fn triple_angle_literal_spans_newlines() {
        let input = "create_file a.py <<<def f():\n    return 1\n>>>";
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens[0], "create_file");
        assert_eq!(tokens[1], "a.py");
        assert_eq!(tokens[2], "def f():\n    return 1\n");
    }

    #[test]
    fn unterminated_literal_is_an_error() {
        assert!(tokenize("create_file a.py <<<unterminated").is_err());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(tokenize(r#"search_file "unterminated"#).is_err());
    }
}
