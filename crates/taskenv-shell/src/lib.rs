//! The interactive shell bridge (spec §4.1, component A).
//!
//! Owns one long-lived login shell inside a container and exposes a single
//! synchronous primitive, `communicate`, framed with an exit-code echo and
//! guarded by a quiescence detector that watches both stdout/stderr bytes
//! and the container's child-process table (probed out-of-band through the
//! `ContainerRuntime`, never through the bridge's own pipe).

mod bridge;
mod error;
mod quiescence;

pub use bridge::ShellBridge;
pub use error::ShellError;
pub use quiescence::{QuiescenceOutcome, ReadOutcome};

#[cfg(test)]
mod bridge_tests;
