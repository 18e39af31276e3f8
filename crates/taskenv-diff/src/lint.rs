use std::collections::HashSet;

use regex_lite::Regex;
use taskenv_core::{LintCheck, LintFinding};

/// Python builtins and keywords common enough that flagging their use as
/// "undefined" would be pure noise (spec §4.5: "enabled checks = undefined
/// name, no-member" — this is the undefined-name half).
const KNOWN_GLOBALS: &[&str] = &[
    "self", "cls", "None", "True", "False", "print", "len", "range", "str", "int", "float", "bool",
    "list", "dict", "set", "tuple", "super", "Exception", "ValueError", "TypeError", "KeyError",
    "IndexError", "StopIteration", "isinstance", "enumerate", "zip", "map", "filter", "open",
    "sorted", "sum", "min", "max", "abs", "round", "any", "all", "object", "type", "repr", "format",
];

/// Heuristic undefined-name check: collects every name a Python file binds
/// (assignment, `def`, `class`, `import`, `for`/`with`/`except ... as`,
/// function parameters) and flags identifier uses outside that set and
/// outside `KNOWN_GLOBALS`. Whole-file, not scope-aware — a real pyflakes
/// pass is out of scope; this is the same shape of check the prototype's
/// `check_lint` ran before handing findings to the session.
pub struct UndefinedNameCheck;

impl LintCheck for UndefinedNameCheck {
    fn extensions(&self) -> &[&str] {
        &["py"]
    }

    fn run(&self, contents: &str) -> Vec<LintFinding> {
        let ident = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid regex");
        let mut bound: HashSet<String> = KNOWN_GLOBALS.iter().map(|s| s.to_string()).collect();

        for line in contents.lines() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix("def ").or_else(|| trimmed.strip_prefix("async def ")) {
                if let Some(m) = ident.find(rest) {
                    bound.insert(m.as_str().to_string());
                }
                if let (Some(open), Some(close)) = (rest.find('('), rest.rfind(')')) {
                    if open < close {
                        for param in rest[open + 1..close].split(',') {
                            let name = param.trim().split(['=', ':']).next().unwrap_or("").trim();
                            if !name.is_empty() {
                                bound.insert(name.trim_start_matches('*').to_string());
                            }
                        }
                    }
                }
            } else if let Some(rest) = trimmed.strip_prefix("class ") {
                if let Some(m) = ident.find(rest) {
                    bound.insert(m.as_str().to_string());
                }
            } else if let Some(rest) = trimmed.strip_prefix("import ") {
                for m in ident.find_iter(rest) {
                    bound.insert(m.as_str().to_string());
                }
            } else if let Some(idx) = trimmed.find(" import ") {
                for m in ident.find_iter(&trimmed[idx + 8..]) {
                    bound.insert(m.as_str().to_string());
                }
            } else if let Some(rest) = trimmed.strip_prefix("for ") {
                if let Some(in_idx) = rest.find(" in ") {
                    for m in ident.find_iter(&rest[..in_idx]) {
                        bound.insert(m.as_str().to_string());
                    }
                }
            } else if let Some(as_idx) = trimmed.find(" as ") {
                if trimmed.starts_with("with ") || trimmed.starts_with("except ") {
                    if let Some(m) = ident.find(&trimmed[as_idx + 4..]) {
                        bound.insert(m.as_str().to_string());
                    }
                }
            } else if let Some(eq) = trimmed.find(" = ") {
                for m in ident.find_iter(&trimmed[..eq]) {
                    bound.insert(m.as_str().to_string());
                }
            }
        }

        let mut findings = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                continue;
            }
            for m in ident.find_iter(line) {
                let name = m.as_str();
                if bound.contains(name) || KNOWN_GLOBALS.contains(&name) {
                    continue;
                }
                // Skip attribute access (`foo.bar`) and keyword arguments
                // (`bar=`) — neither names a free variable.
                let before = &line[..m.start()];
                if before.ends_with('.') {
                    continue;
                }
                let after = &line[m.end()..];
                if after.starts_with('=') && !after.starts_with("==") {
                    continue;
                }
                if is_python_keyword(name) {
                    continue;
                }
                findings.push(LintFinding {
                    line: (line_no + 1) as u32,
                    column: (m.start() + 1) as u32,
                    code: "F821".to_string(),
                    message: format!("undefined name '{name}'"),
                });
            }
        }
        findings
    }
}

/// Heuristic no-member check: flags `self.<attr>` reads where `<attr>` is
/// never assigned (`self.<attr> = ...`) or defined as a method (`def
/// <attr>(`) anywhere in the file.
pub struct NoMemberCheck;

impl LintCheck for NoMemberCheck {
    fn extensions(&self) -> &[&str] {
        &["py"]
    }

    fn run(&self, contents: &str) -> Vec<LintFinding> {
        let assign = Regex::new(r"self\.([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("valid regex");
        let method = Regex::new(r"def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("valid regex");
        let access = Regex::new(r"self\.([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex");

        let mut members: HashSet<String> = HashSet::new();
        for m in assign.captures_iter(contents) {
            members.insert(m[1].to_string());
        }
        for m in method.captures_iter(contents) {
            members.insert(m[1].to_string());
        }

        let mut findings = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            for m in access.captures_iter(line) {
                let attr = &m[1];
                if members.contains(attr) {
                    continue;
                }
                let whole = m.get(0).expect("group 0 always present");
                findings.push(LintFinding {
                    line: (line_no + 1) as u32,
                    column: (whole.start() + 1) as u32,
                    code: "E1101".to_string(),
                    message: format!("no member '{attr}' on self"),
                });
            }
        }
        findings
    }
}

fn is_python_keyword(name: &str) -> bool {
    matches!(
        name,
        "False" | "None" | "True" | "and" | "as" | "assert" | "async" | "await" | "break" | "class"
            | "continue" | "def" | "del" | "elif" | "else" | "except" | "finally" | "for" | "from"
            | "global" | "if" | "import" | "in" | "is" | "lambda" | "nonlocal" | "not" | "or" | "pass"
            | "raise" | "return" | "try" | "while" | "with" | "yield"
    )
}

/// Run every enabled lint check against `contents` and collect the findings
/// (spec §4.5 post-conditions, step 3).
pub fn run_all(path: &str, contents: &str) -> Vec<LintFinding> {
    let checks: Vec<Box<dyn LintCheck>> = vec![Box::new(UndefinedNameCheck), Box::new(NoMemberCheck)];
    let Some(ext) = path.rsplit('.').next() else {
        return Vec::new();
    };
    checks
        .into_iter()
        .filter(|c| c.extensions().contains(&ext))
        .flat_map(|c| c.run(contents))
        .collect()
}
