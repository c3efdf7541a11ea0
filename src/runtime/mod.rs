//! Runtime abstraction for system operations.
//!
//! The installer reaches the file system and external processes only through
//! the [`Runtime`] trait, so it can be exercised against a mock.
//!
//! # Structure
//!
//! - `fs` - File system operations
//! - `process` - Running external commands

mod fs;
mod process;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Result of running an external command to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn is_dir(&self, path: &Path) -> bool;

    // Processes
    /// Run `program` with `args` in `cwd` and wait for it. A non-zero exit is
    /// not an error here; callers inspect [`CommandOutput::success`].
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        self.run_impl(program, args, cwd).await
    }
}
