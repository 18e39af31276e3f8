use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `{absolute_path, contents, page}` from spec §3. The only place paging
/// state for a file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFile {
    pub absolute_path: PathBuf,
    pub contents: String,
    pub page: usize,
}

impl OpenFile {
    pub fn line_count(&self) -> usize {
        self.contents.lines().count()
    }

    pub fn last_page(&self, page_size: usize) -> usize {
        self.line_count() / page_size.max(1)
    }

    /// Clamp `page` into `[0, last_page]`, as required after any mutation
    /// that changes line count (spec §3 invariant).
    pub fn clamp_page(&mut self, page_size: usize) {
        let last = self.last_page(page_size);
        if self.page > last {
            self.page = last;
        }
    }

    /// The slice of lines visible on the current page.
    pub fn current_page_lines(&self, page_size: usize) -> Vec<&str> {
        let start = self.page * page_size;
        self.contents.lines().skip(start).take(page_size).collect()
    }
}
