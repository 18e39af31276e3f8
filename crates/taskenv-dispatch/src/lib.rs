//! Action dispatcher (spec §4.6, component F): tokenizes one action line,
//! matches it against the registered toolbox, and routes it to the
//! filesystem adapter, editor, symbol index, diff engine, or the raw
//! interactive shell.

mod dispatcher;
mod error;
mod render;
mod submission;
mod tokenizer;
mod verb;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use submission::submit_script;
pub use verb::{parse_action, Verb};

#[cfg(test)]
mod dispatcher_tests;
