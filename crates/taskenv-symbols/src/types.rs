use serde::{Deserialize, Serialize};

/// A top-level function or method. `qualified_name` is `method` for a free
/// function and `Class.method` for a method defined directly inside a
/// class body (spec §4.4 `find_function`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub qualified_name: String,
    pub file: String,
    pub line: usize,
    pub source: String,
}

/// A class definition, with the bare names of the methods defined directly
/// in its body (spec §4.4 `find_class`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub source: String,
    pub members: Vec<String>,
}
