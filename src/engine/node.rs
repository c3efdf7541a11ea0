use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::import::ExportKind;

use super::protocol::{Message, Request};
use super::{EngineError, ScriptEngine};

const DRIVER: &str = include_str!("driver.js");

/// Successful final reply to a request.
struct Reply {
    value: Option<String>,
    exports: Option<Vec<String>>,
}

/// Script engine backed by a `node` process.
///
/// Output produced by the script side is copied to `out` as it arrives.
pub struct NodeEngine<W, R, O> {
    writer: W,
    reader: R,
    out: O,
    child: Option<Child>,
}

impl NodeEngine<ChildStdin, BufReader<ChildStdout>, io::Stdout> {
    /// Start `node` with the driver script, working in `cwd`.
    pub fn spawn(node: &str, cwd: &Path) -> Result<Self> {
        let mut child = Command::new(node)
            .arg("-e")
            .arg(DRIVER)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", node))?;
        debug!("Started {} (pid {:?})", node, child.id());

        let stdin = child.stdin.take().context("node stdin is not piped")?;
        let stdout = child.stdout.take().context("node stdout is not piped")?;
        let mut engine = NodeEngine::new(stdin, BufReader::new(stdout), io::stdout());
        engine.child = Some(child);
        Ok(engine)
    }

    /// Process id of the spawned node, while it is running.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }
}

impl<W, R, O> NodeEngine<W, R, O>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncBufRead + Unpin + Send,
    O: Write + Send,
{
    pub fn new(writer: W, reader: R, out: O) -> Self {
        Self {
            writer,
            reader,
            out,
            child: None,
        }
    }

    pub fn output(&self) -> &O {
        &self.out
    }

    /// Send one request and wait for its final reply, forwarding output.
    async fn request(&mut self, request: &Request<'_>) -> Result<Reply> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|_| EngineError::Closed)?;
        self.writer.flush().await.map_err(|_| EngineError::Closed)?;

        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self
                .reader
                .read_line(&mut buf)
                .await
                .map_err(|_| EngineError::Closed)?;
            if read == 0 {
                return Err(EngineError::Closed.into());
            }
            let message: Message = serde_json::from_str(buf.trim_end())
                .map_err(|e| EngineError::Protocol(format!("{}: {}", e, buf.trim_end())))?;
            match message {
                Message::Output { text } => {
                    self.out.write_all(text.as_bytes())?;
                    self.out.flush()?;
                }
                Message::Done { ok: false, error, .. } => {
                    return Err(EngineError::Script(error.unwrap_or_default()).into());
                }
                Message::Done { value, exports, .. } => return Ok(Reply { value, exports }),
            }
        }
    }
}

#[async_trait]
impl<W, R, O> ScriptEngine for NodeEngine<W, R, O>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncBufRead + Unpin + Send,
    O: Write + Send,
{
    async fn eval(&mut self, code: &str) -> Result<String> {
        let reply = self.request(&Request::Eval { code }).await?;
        Ok(reply.value.unwrap_or_default())
    }

    async fn load(&mut self, alias: &str, base: &Path, request: &str) -> Result<Vec<String>> {
        let reply = self
            .request(&Request::Load {
                alias,
                base,
                request,
            })
            .await?;
        reply
            .exports
            .ok_or_else(|| EngineError::Protocol(format!("no exports listed for {}", alias)).into())
    }

    async fn bind(&mut self, alias: &str, kind: ExportKind) -> Result<()> {
        self.request(&Request::Bind { alias, kind }).await?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        self.request(&Request::Reset).await?;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        let _ = self.writer.shutdown().await;
        if let Some(mut child) = self.child.take() {
            if let Some(status) = child.try_wait()? {
                debug!("node already exited with {}", status);
                return Ok(());
            }
            child.kill().await.context("Failed to stop node")?;
            debug!("node stopped");
        }
        Ok(())
    }
}
