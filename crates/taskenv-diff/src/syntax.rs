/// Syntactic compile check run on a file's proposed new contents before a
/// diff is committed (spec §4.5 post-conditions). Python files are parsed
/// with tree-sitter-python, the same tree-sitter pattern the dispatcher's
/// shell-highlighting path uses for bash; anything else falls back to a
/// balanced-delimiter scan, since the fleet of languages an agent edits is
/// not known ahead of time.
pub fn check_syntax(path: &str, contents: &str) -> Result<(), String> {
    if path.ends_with(".py") {
        check_python(contents)
    } else {
        check_balanced_delimiters(contents)
    }
}

fn check_python(contents: &str) -> Result<(), String> {
    let language = tree_sitter_python::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| format!("failed to load python grammar: {e}"))?;
    let tree = parser
        .parse(contents, None)
        .ok_or_else(|| "tree-sitter produced no parse tree".to_string())?;
    if tree.root_node().has_error() {
        Err("syntax error in Python source".to_string())
    } else {
        Ok(())
    }
}

fn check_balanced_delimiters(contents: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    for c in contents.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return Err("unbalanced ')'".to_string());
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return Err("unbalanced ']'".to_string());
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return Err("unbalanced '}'".to_string());
                }
            }
            _ => {}
        }
    }
    if stack.is_empty() {
        Ok(())
    } else {
        Err(format!("unbalanced '{}'", stack[stack.len() - 1]))
    }
}
