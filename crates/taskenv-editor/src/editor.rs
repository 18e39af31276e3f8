use std::collections::HashMap;
use std::path::{Path, PathBuf};

use taskenv_core::Config;
use taskenv_fs::FsAdapter;
use taskenv_runtime::ContainerRuntime;
use tokio::sync::Mutex;

use crate::error::EditorError;
use crate::open_file::OpenFile;
use crate::search::{search_text, SearchMatch};

/// Map from absolute path to open-file record, plus the paging/search
/// operations the agent drives it with. Depends only on the filesystem
/// adapter (never on the diff engine) to avoid the cyclic reference spec
/// §9 calls out.
pub struct Editor<R: ContainerRuntime> {
    fs: FsAdapter<R>,
    config: Config,
    open: Mutex<HashMap<PathBuf, OpenFile>>,
}

impl<R: ContainerRuntime> Editor<R> {
    pub fn new(fs: FsAdapter<R>, config: Config) -> Self {
        Self {
            fs,
            config,
            open: Mutex::new(HashMap::new()),
        }
    }

    pub fn fs(&self) -> &FsAdapter<R> {
        &self.fs
    }

    async fn abs(&self, p: &str) -> Result<PathBuf, EditorError> {
        Ok(self.fs.normalize(p).await?)
    }

    pub async fn open_file(&self, p: &str) -> Result<(), EditorError> {
        let abs = self.abs(p).await?;
        let mut open = self.open.lock().await;
        if open.contains_key(&abs) {
            return Err(EditorError::AlreadyOpen(path_str(&abs)));
        }
        if !self.fs.exists(p).await? {
            return Err(EditorError::NotFound(path_str(&abs)));
        }
        let contents = self.fs.read(p).await?;
        open.insert(
            abs.clone(),
            OpenFile {
                absolute_path: abs,
                contents,
                page: 0,
            },
        );
        Ok(())
    }

    pub async fn close_file(&self, p: &str) -> Result<(), EditorError> {
        let abs = self.abs(p).await?;
        self.open.lock().await.remove(&abs);
        Ok(())
    }

    pub async fn create_file(&self, p: &str, content: &str) -> Result<(), EditorError> {
        let abs = self.abs(p).await?;
        if self.fs.exists(p).await? {
            return Err(EditorError::AlreadyExists(path_str(&abs)));
        }
        self.fs.write(p, content).await?;
        self.open.lock().await.insert(
            abs.clone(),
            OpenFile {
                absolute_path: abs,
                contents: content.to_string(),
                page: 0,
            },
        );
        Ok(())
    }

    pub async fn delete_file(&self, p: &str) -> Result<(), EditorError> {
        let abs = self.abs(p).await?;
        if !self.fs.exists(p).await? {
            return Err(EditorError::NotFound(path_str(&abs)));
        }
        self.fs.delete(p).await?;
        self.open.lock().await.remove(&abs);
        Ok(())
    }

    /// Overwrite an existing file's contents. Use `create_file` to make a
    /// new one — this requires the file to already exist.
    pub async fn write_file(&self, p: &str, content: &str) -> Result<(), EditorError> {
        let abs = self.abs(p).await?;
        if !self.fs.exists(p).await? {
            return Err(EditorError::NotFound(path_str(&abs)));
        }
        self.fs.write(p, content).await?;
        let mut open = self.open.lock().await;
        if let Some(record) = open.get_mut(&abs) {
            record.contents = content.to_string();
            record.clamp_page(self.config.page_size);
        }
        Ok(())
    }

    pub async fn scroll_up(&self, p: &str) -> Result<usize, EditorError> {
        let abs = self.abs(p).await?;
        let mut open = self.open.lock().await;
        let record = open
            .get_mut(&abs)
            .ok_or_else(|| EditorError::NotOpen(path_str(&abs)))?;
        record.page = record.page.saturating_sub(1);
        Ok(record.page)
    }

    pub async fn scroll_down(&self, p: &str) -> Result<usize, EditorError> {
        let abs = self.abs(p).await?;
        let mut open = self.open.lock().await;
        let record = open
            .get_mut(&abs)
            .ok_or_else(|| EditorError::NotOpen(path_str(&abs)))?;
        let last = record.last_page(self.config.page_size);
        record.page = (record.page + 1).min(last);
        Ok(record.page)
    }

    /// `n` is 1-indexed; maps to page `floor((n-1)/PAGE_SIZE)`, clamped.
    pub async fn scroll_to_line(&self, p: &str, n: usize) -> Result<usize, EditorError> {
        let abs = self.abs(p).await?;
        let mut open = self.open.lock().await;
        let record = open
            .get_mut(&abs)
            .ok_or_else(|| EditorError::NotOpen(path_str(&abs)))?;
        let last = record.last_page(self.config.page_size);
        let requested = n.saturating_sub(1) / self.config.page_size.max(1);
        record.page = requested.min(last);
        Ok(record.page)
    }

    /// Re-read every open file from disk. Disk is authoritative; the editor
    /// is refreshed from it on every mutating call and on explicit refresh
    /// (spec §9).
    pub async fn refresh(&self) -> Result<(), EditorError> {
        let paths: Vec<PathBuf> = self.open.lock().await.keys().cloned().collect();
        for abs in paths {
            let contents = self.fs.read(&path_str(&abs)).await?;
            let mut open = self.open.lock().await;
            if let Some(record) = open.get_mut(&abs) {
                record.contents = contents;
                record.clamp_page(self.config.page_size);
            }
        }
        Ok(())
    }

    pub async fn view_open_files(&self) -> Vec<(PathBuf, usize, usize)> {
        self.open
            .lock()
            .await
            .values()
            .map(|f| (f.absolute_path.clone(), f.page, f.line_count()))
            .collect()
    }

    pub async fn is_open(&self, p: &str) -> Result<bool, EditorError> {
        let abs = self.abs(p).await?;
        Ok(self.open.lock().await.contains_key(&abs))
    }

    pub async fn current_page(&self, p: &str) -> Result<(usize, Vec<String>), EditorError> {
        let abs = self.abs(p).await?;
        let open = self.open.lock().await;
        let record = open
            .get(&abs)
            .ok_or_else(|| EditorError::NotOpen(path_str(&abs)))?;
        Ok((
            record.page,
            record
                .current_page_lines(self.config.page_size)
                .into_iter()
                .map(str::to_string)
                .collect(),
        ))
    }

    /// Match windows of `term` in `p`'s current on-disk contents. Refuses
    /// (rather than truncating) once the raw match count exceeds
    /// `search_match_cap`.
    pub async fn search_file(&self, term: &str, p: &str) -> Result<Vec<SearchMatch>, EditorError> {
        let contents = self.fs.read(p).await?;
        Ok(search_text(
            &contents,
            term,
            self.config.search_context_lines,
            self.config.search_match_cap,
        )?)
    }

    /// Delegates to the filesystem adapter's grep; refuses (propagating the
    /// adapter's error) when more than `grep_file_cap` files match.
    pub async fn search_dir(&self, term: &str, dir: &str) -> Result<Vec<taskenv_fs::GrepMatch>, EditorError> {
        Ok(self.fs.grep_in_dir(dir, term).await?)
    }
}

fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
