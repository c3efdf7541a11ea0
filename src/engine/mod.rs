//! Bridge to the evaluation scope of the session.
//!
//! The scope lives in a `node` child process running a small driver script.
//! Requests and replies travel as JSON lines over the child's stdin/stdout
//! (see [`protocol`]). The Rust side never holds script values; it only
//! names them by alias.

mod node;
mod protocol;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::import::ExportKind;

pub use node::NodeEngine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Thrown by evaluated code or while loading a module.
    #[error("{0}")]
    Script(String),

    #[error("node process exited")]
    Closed,

    #[error("invalid reply from node: {0}")]
    Protocol(String),
}

impl EngineError {
    /// Whether the engine can no longer be used.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::Script(_))
    }
}

/// Whether `err` (or anything in its context chain) means the engine is gone.
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<EngineError>())
        .any(EngineError::is_fatal)
}

#[async_trait]
pub trait ScriptEngine: Send {
    /// Evaluate one line of code and return the inspected result.
    async fn eval(&mut self, code: &str) -> Result<String>;

    /// Resolve `request` from `base` and load it, keeping it pending under
    /// `alias`. Returns the names the module exports.
    async fn load(&mut self, alias: &str, base: &Path, request: &str) -> Result<Vec<String>>;

    /// Bind the module pending under `alias` into the scope.
    async fn bind(&mut self, alias: &str, kind: ExportKind) -> Result<()>;

    /// Replace the scope with a fresh one. Bindings are lost.
    async fn reset(&mut self) -> Result<()>;

    async fn shutdown(&mut self) -> Result<()>;
}
