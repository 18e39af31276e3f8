use crate::error::DispatchError;
use crate::tokenizer::tokenize;

/// The registered toolbox (spec §6 action surface table), plus raw shell
/// passthrough for anything unrecognized — a closed set precisely because
/// the dispatcher must exhaustively route every variant (spec §9 design
/// note: "sealed tag union").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    OpenFile { path: String },
    CloseFile { path: String },
    CreateFile { path: String, content: String },
    DeleteFile { path: String },
    ScrollUp { path: String },
    ScrollDown { path: String },
    ScrollToLine { path: String, line: usize },
    SearchDir { term: String, dir: Option<String> },
    SearchFile { term: String, path: String },
    FindFile { name: String },
    FindFunction { qname: String },
    FindClass { name: String },
    ListDirsRecursive { path: String },
    GetCwd,
    EditFile { diff_blob: String },
    Submit,
    NoOp,
    /// Anything not in the registered toolbox — passed through to the
    /// interactive shell verbatim.
    Shell { command: String },
}

const REGISTERED: &[&str] = &[
    "open_file",
    "close_file",
    "create_file",
    "delete_file",
    "scroll_up",
    "scroll_down",
    "scroll_to_line",
    "search_dir",
    "search_file",
    "find_file",
    "find_function",
    "find_class",
    "list_dirs_recursive",
    "get_cwd",
    "edit_file",
    "submit",
    "no_op",
];

/// `vim`, `nano`, and multi-line `python` would block the interactive shell
/// waiting on a TTY or a REPL prompt that never comes (spec §4.6).
fn is_rejected(head: &str, raw: &str) -> bool {
    if head == "vim" || head == "nano" {
        return true;
    }
    (head == "python" || head == "python3") && raw.contains('\n')
}

impl Verb {
    /// Every verb name the toolbox understands, for help text and for
    /// distinguishing "registered verb with a bad argument" from "not a
    /// verb at all, pass through to the shell".
    pub fn all() -> &'static [&'static str] {
        REGISTERED
    }

    pub fn usage(name: &str) -> Option<&'static str> {
        Some(match name {
            "open_file" => "open_file <path>",
            "close_file" => "close_file <path>",
            "create_file" => "create_file <path> <<<content>>>",
            "delete_file" => "delete_file <path>",
            "scroll_up" => "scroll_up <path>",
            "scroll_down" => "scroll_down <path>",
            "scroll_to_line" => "scroll_to_line <path> <line>",
            "search_dir" => "search_dir <term> [dir]",
            "search_file" => "search_file <term> <path>",
            "find_file" => "find_file <name>",
            "find_function" => "find_function <qname>",
            "find_class" => "find_class <name>",
            "list_dirs_recursive" => "list_dirs_recursive <path>",
            "get_cwd" => "get_cwd",
            "edit_file" => "edit_file <<<diff-blob>>>",
            "submit" => "submit",
            "no_op" => "no_op",
            _ => return None,
        })
    }
}

/// Parse one action line into a `Verb` (spec §4.6).
pub fn parse_action(input: &str) -> Result<Verb, DispatchError> {
    let tokens = tokenize(input)?;
    let Some(head) = tokens.first() else {
        return Err(DispatchError::EmptyAction);
    };

    if is_rejected(head, input) {
        return Err(DispatchError::Rejected(head.clone()));
    }
    if !REGISTERED.contains(&head.as_str()) {
        return Ok(Verb::Shell {
            command: input.trim().to_string(),
        });
    }

    let rest = &tokens[1..];
    let arg = |idx: usize, name: &'static str| -> Result<String, DispatchError> {
        rest.get(idx).cloned().ok_or(DispatchError::MissingArg {
            verb: head.clone(),
            arg: name,
        })
    };

    Ok(match head.as_str() {
        "open_file" => Verb::OpenFile { path: arg(0, "path")? },
        "close_file" => Verb::CloseFile { path: arg(0, "path")? },
        "create_file" => Verb::CreateFile {
            path: arg(0, "path")?,
            content: rest.get(1).cloned().unwrap_or_default(),
        },
        "delete_file" => Verb::DeleteFile { path: arg(0, "path")? },
        "scroll_up" => Verb::ScrollUp { path: arg(0, "path")? },
        "scroll_down" => Verb::ScrollDown { path: arg(0, "path")? },
        "scroll_to_line" => {
            let path = arg(0, "path")?;
            let raw = arg(1, "line")?;
            let line = raw.parse().map_err(|_| DispatchError::NotANumber(raw.clone()))?;
            Verb::ScrollToLine { path, line }
        }
        "search_dir" => Verb::SearchDir {
            term: arg(0, "term")?,
            dir: rest.get(1).cloned(),
        },
        "search_file" => Verb::SearchFile {
            term: arg(0, "term")?,
            path: arg(1, "path")?,
        },
        "find_file" => Verb::FindFile { name: arg(0, "name")? },
        "find_function" => Verb::FindFunction { qname: arg(0, "qname")? },
        "find_class" => Verb::FindClass { name: arg(0, "name")? },
        "list_dirs_recursive" => Verb::ListDirsRecursive { path: arg(0, "path")? },
        "get_cwd" => Verb::GetCwd,
        "edit_file" => Verb::EditFile { diff_blob: arg(0, "diff-blob")? },
        "submit" => Verb::Submit,
        "no_op" => Verb::NoOp,
        _ => unreachable!("checked against REGISTERED above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_file() {
        assert_eq!(
            parse_action("open_file /repo/a.py").unwrap(),
            Verb::OpenFile {
                path: "/repo/a.py".to_string()
            }
        );
    }

    #[test]
    fn parses_scroll_to_line_numeric_arg() {
        assert_eq!(
            parse_action("scroll_to_line /repo/a.py 42").unwrap(),
            Verb::ScrollToLine {
                path: "/repo/a.py".to_string(),
                line: 42
            }
        );
    }

    #[test]
    fn rejects_vim_and_nano() {
        assert_eq!(parse_action("vim a.py"), Err(DispatchError::Rejected("vim".to_string())));
        assert_eq!(parse_action("nano a.py"), Err(DispatchError::Rejected("nano".to_string())));
    }

    #[test]
    fn rejects_multiline_python() {
        assert!(parse_action("python\nprint(1)").is_err());
    }

    #[test]
    fn single_line_python_is_shell_passthrough() {
        assert_eq!(
            parse_action("python -c 'print(1)'").unwrap(),
            Verb::Shell {
                command: "python -c 'print(1)'".to_string()
            }
        );
    }

    #[test]
    fn unknown_verb_is_shell_passthrough() {
        assert_eq!(
            parse_action("ls -la").unwrap(),
            Verb::Shell {
                command: "ls -la".to_string()
            }
        );
    }

    #[test]
    fn no_op_yields_identity_verb() {
        assert_eq!(parse_action("no_op").unwrap(), Verb::NoOp);
    }
}
