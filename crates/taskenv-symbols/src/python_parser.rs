use crate::types::{ClassEntry, FunctionEntry};

struct Frame {
    indent: usize,
    start: usize,
    is_class: bool,
    qualified_name: String,
    class_idx: Option<usize>,
    members: Vec<String>,
}

/// Recursive-descent scan of a single Python source file for top-level and
/// nested `def`/`class` blocks. This is a line-oriented heuristic, not a
/// real parser: it tracks scope by indentation alone, the same shortcut the
/// original prototype's regex-based scanner took, and is good enough for
/// `find_function`/`find_class` lookups rather than correctness-critical
/// parsing (spec §4.4).
pub fn parse_python_source(file: &str, text: &str) -> (Vec<FunctionEntry>, Vec<ClassEntry>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut stack: Vec<Frame> = Vec::new();
    let mut functions = Vec::new();
    let mut classes: Vec<ClassEntry> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();

        while let Some(top) = stack.last() {
            if indent <= top.indent {
                let frame = stack.pop().expect("just checked last()");
                finalize(frame, i, file, &lines, &mut functions, &mut classes);
            } else {
                break;
            }
        }

        if let Some(name) = def_name(trimmed) {
            let qualifier = stack.last().filter(|f| f.is_class).map(|f| f.qualified_name.clone());
            if let Some(top) = stack.last_mut() {
                if top.is_class {
                    top.members.push(name.clone());
                }
            }
            let qualified_name = match qualifier {
                Some(class_name) => format!("{class_name}.{name}"),
                None => name,
            };
            stack.push(Frame {
                indent,
                start: i,
                is_class: false,
                qualified_name,
                class_idx: None,
                members: Vec::new(),
            });
        } else if let Some(name) = class_name(trimmed) {
            let class_idx = classes.len();
            classes.push(ClassEntry {
                name: name.clone(),
                file: file.to_string(),
                line: i + 1,
                source: String::new(),
                members: Vec::new(),
            });
            stack.push(Frame {
                indent,
                start: i,
                is_class: true,
                qualified_name: name,
                class_idx: Some(class_idx),
                members: Vec::new(),
            });
        }
    }

    while let Some(frame) = stack.pop() {
        finalize(frame, lines.len(), file, &lines, &mut functions, &mut classes);
    }

    (functions, classes)
}

fn finalize(
    frame: Frame,
    end: usize,
    file: &str,
    lines: &[&str],
    functions: &mut Vec<FunctionEntry>,
    classes: &mut [ClassEntry],
) {
    let source = lines[frame.start..end].join("\n");
    if frame.is_class {
        let idx = frame.class_idx.expect("class frame always has class_idx");
        classes[idx].source = source;
        classes[idx].members = frame.members;
    } else {
        functions.push(FunctionEntry {
            qualified_name: frame.qualified_name,
            file: file.to_string(),
            line: frame.start + 1,
            source,
        });
    }
}

fn def_name(trimmed: &str) -> Option<String> {
    let rest = trimmed
        .strip_prefix("async def ")
        .or_else(|| trimmed.strip_prefix("def "))?;
    name_token(rest)
}

fn class_name(trimmed: &str) -> Option<String> {
    name_token(trimmed.strip_prefix("class ")?)
}

fn name_token(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some(rest[..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_top_level_function() {
        let text = "def greet(name):\n    return name\n\n\ndef other():\n    pass\n";
        let (functions, classes) = parse_python_source("a.py", text);
        assert!(classes.is_empty());
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].qualified_name, "greet");
        assert_eq!(functions[0].line, 1);
        assert!(functions[0].source.starts_with("def greet(name):"));
        assert_eq!(functions[1].qualified_name, "other");
    }

    #[test]
    fn qualifies_methods_with_class_name() {
        let text = "class Foo:\n    def bar(self):\n        pass\n\n    def baz(self):\n        pass\n";
        let (functions, classes) = parse_python_source("a.py", text);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Foo");
        assert_eq!(classes[0].members, vec!["bar".to_string(), "baz".to_string()]);

        let names: Vec<&str> = functions.iter().map(|f| f.qualified_name.as_str()).collect();
        assert_eq!(names, vec!["Foo.bar", "Foo.baz"]);
    }

    #[test]
    fn nested_function_is_not_qualified_by_enclosing_function() {
        let text = "def outer():\n    def inner():\n        pass\n    return inner\n";
        let (functions, _) = parse_python_source("a.py", text);
        let names: Vec<&str> = functions.iter().map(|f| f.qualified_name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn class_body_ends_at_dedent() {
        let text = "class Foo:\n    def bar(self):\n        pass\n\ndef top():\n    pass\n";
        let (functions, classes) = parse_python_source("a.py", text);
        assert_eq!(classes[0].source, "class Foo:\n    def bar(self):\n        pass");
        let top = functions.iter().find(|f| f.qualified_name == "top").unwrap();
        assert_eq!(top.source, "def top():\n    pass");
    }
}
