use std::sync::Arc;

use taskenv_core::Config;
use taskenv_editor::Editor;
use taskenv_runtime::ContainerRuntime;
use taskenv_shell::ShellBridge;
use taskenv_symbols::SymbolIndex;
use tokio::sync::RwLock;

use crate::render::{render_classes, render_diff_result, render_functions, render_grep_matches, render_tree};
use crate::submission::submit_script;
use crate::verb::{parse_action, Verb};

/// Routes one parsed action to its component and converts the result — or
/// any error along the way — into a single observation string (spec §4.6:
/// "every dispatched call returns a string observation... exceptions are
/// caught and converted to descriptive observation strings").
///
/// The symbol index is rebuilt wholesale on every `reset`; it sits behind a
/// lock the session can swap out without recreating the dispatcher (spec
/// §4.4: rebuilt per task, read-only in between).
pub struct Dispatcher<R: ContainerRuntime> {
    editor: Arc<Editor<R>>,
    bridge: Arc<ShellBridge<R>>,
    symbols: Arc<RwLock<SymbolIndex>>,
    config: Config,
}

impl<R: ContainerRuntime> Dispatcher<R> {
    pub fn new(
        editor: Arc<Editor<R>>,
        bridge: Arc<ShellBridge<R>>,
        symbols: Arc<RwLock<SymbolIndex>>,
        config: Config,
    ) -> Self {
        Self {
            editor,
            bridge,
            symbols,
            config,
        }
    }

    pub fn symbols(&self) -> &Arc<RwLock<SymbolIndex>> {
        &self.symbols
    }

    /// Parse and run one action line, never propagating an error out —
    /// every failure becomes the observation text itself.
    pub async fn dispatch(&self, action: &str) -> String {
        match parse_action(action) {
            Ok(verb) => self.run(verb).await,
            Err(e) => e.to_string(),
        }
    }

    async fn run(&self, verb: Verb) -> String {
        match verb {
            Verb::OpenFile { path } => match self.editor.open_file(&path).await {
                Ok(()) => format!("Opened file {path}"),
                Err(e) => e.to_string(),
            },
            Verb::CloseFile { path } => match self.editor.close_file(&path).await {
                Ok(()) => format!("Closed file {path}"),
                Err(e) => e.to_string(),
            },
            Verb::CreateFile { path, content } => match self.editor.create_file(&path, &content).await {
                Ok(()) => format!("Created file {path}"),
                Err(e) => e.to_string(),
            },
            Verb::DeleteFile { path } => match self.editor.delete_file(&path).await {
                Ok(()) => format!("Deleted file {path}"),
                Err(e) => e.to_string(),
            },
            Verb::ScrollUp { path } => match self.editor.scroll_up(&path).await {
                Ok(page) => format!("Now at page {page} of {path}"),
                Err(e) => e.to_string(),
            },
            Verb::ScrollDown { path } => match self.editor.scroll_down(&path).await {
                Ok(page) => format!("Now at page {page} of {path}"),
                Err(e) => e.to_string(),
            },
            Verb::ScrollToLine { path, line } => match self.editor.scroll_to_line(&path, line).await {
                Ok(page) => format!("Now at page {page} of {path}"),
                Err(e) => e.to_string(),
            },
            Verb::SearchDir { term, dir } => {
                let dir = dir.unwrap_or_else(|| ".".to_string());
                match self.editor.search_dir(&term, &dir).await {
                    Ok(matches) => render_grep_matches(&matches),
                    Err(e) => e.to_string(),
                }
            }
            Verb::SearchFile { term, path } => match self.editor.search_file(&term, &path).await {
                Ok(matches) if matches.is_empty() => format!("No matches for '{term}' in {path}"),
                Ok(matches) => matches
                    .into_iter()
                    .map(|m| format!("{}:\n{}", m.line, m.window))
                    .collect::<Vec<_>>()
                    .join("\n---\n"),
                Err(e) => e.to_string(),
            },
            Verb::FindFile { name } => match self.editor.fs().find_by_name(".", &name).await {
                Ok(paths) if paths.is_empty() => format!("No file named '{name}' found"),
                Ok(paths) => paths.join("\n"),
                Err(e) => e.to_string(),
            },
            Verb::FindFunction { qname } => {
                let index = self.symbols.read().await;
                let entries = index.find_function(&qname, self.config.symbol_response_byte_budget);
                render_functions(&qname, &entries)
            }
            Verb::FindClass { name } => {
                let index = self.symbols.read().await;
                let entries = index.find_class(&name, self.config.symbol_response_byte_budget);
                render_classes(&name, &entries)
            }
            Verb::ListDirsRecursive { path } => match self.editor.fs().list_tree(&path).await {
                Ok(tree) => render_tree(&tree),
                Err(e) => e.to_string(),
            },
            Verb::GetCwd => match self.editor.fs().cwd().await {
                Ok(cwd) => cwd.to_string_lossy().into_owned(),
                Err(e) => e.to_string(),
            },
            Verb::EditFile { diff_blob } => match taskenv_diff::apply_diff_blob(&self.editor, &diff_blob).await {
                Ok(result) => render_diff_result(&result),
                Err(e) => format!("Error applying diff: {e}"),
            },
            Verb::Submit => self.submit().await,
            Verb::NoOp => "No Action Taken".to_string(),
            Verb::Shell { command } => match self.bridge.communicate(&command, self.config.default_timeout()).await {
                Ok((output, _code)) => output,
                Err(e) => e.to_string(),
            },
        }
    }

    async fn submit(&self) -> String {
        match self.bridge.communicate(&submit_script(), self.config.long_timeout()).await {
            Ok((output, _code)) => output,
            Err(e) => e.to_string(),
        }
    }
}
