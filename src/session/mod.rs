//! The interactive session: package bookkeeping, dot-commands and lifecycle.

mod command;
mod reader;

use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::ops::ControlFlow;

use crate::engine::{EngineError, ScriptEngine, is_fatal};
use crate::import::{import_all, import_package};
use crate::install::{InstallRoot, PackageInstaller, install_all};
use crate::package::{InstalledPackage, PackageToInstall, args_to_packages};
use crate::validate::{NpmNameRule, PackageNameRule, validate};

pub use command::{HELP, Input};
pub use reader::{EditorReader, LineReader, ReadLine};

pub const PROMPT: &str = "> ";

/// Everything a session owns: the install root and the packages installed
/// in it so far, in installation order. Packages are never removed.
#[derive(Debug)]
pub struct SessionState {
    root: InstallRoot,
    packages: Vec<InstalledPackage>,
}

impl SessionState {
    pub fn new(root: InstallRoot) -> Self {
        Self {
            root,
            packages: Vec::new(),
        }
    }

    pub fn root(&self) -> &InstallRoot {
        &self.root
    }

    pub fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    pub fn into_root(self) -> InstallRoot {
        self.root
    }
}

pub struct Session<I, E> {
    installer: I,
    engine: E,
    rule: Box<dyn PackageNameRule>,
    state: SessionState,
}

impl<I: PackageInstaller, E: ScriptEngine> Session<I, E> {
    pub fn new(installer: I, engine: E, state: SessionState) -> Self {
        Self {
            installer,
            engine,
            rule: Box::new(NpmNameRule),
            state,
        }
    }

    pub fn with_name_rule(mut self, rule: impl PackageNameRule + 'static) -> Self {
        self.rule = Box::new(rule);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Install and import the packages given at startup. Any failure aborts.
    pub async fn load(&mut self, packages: &[PackageToInstall]) -> Result<()> {
        validate(packages, &self.state.packages, self.rule.as_ref())?;

        let installed = install_all(&self.installer, packages, self.state.root.path())
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        import_all(&mut self.engine, &installed).await?;
        self.state.packages.extend(installed);
        Ok(())
    }

    /// Read and handle lines until `.exit` or end of input.
    ///
    /// Only failures of the engine itself or of the terminal end the loop
    /// with an error; everything else is reported to `out`.
    pub async fn run<L: LineReader, W: Write>(&mut self, reader: &mut L, out: &mut W) -> Result<()> {
        loop {
            let line = match reader.read_line(PROMPT)? {
                ReadLine::Line(line) => line,
                ReadLine::Interrupted => {
                    writeln!(out, "(To exit, press Ctrl+D or type .exit)")?;
                    continue;
                }
                ReadLine::Eof => break,
            };

            match Input::parse(&line) {
                Input::Empty => {}
                Input::Packages => self.list_packages(out)?,
                Input::Import(args) => self.import_packages(&args, out).await?,
                Input::Debug => self.debug_dump(out)?,
                Input::Clear => {
                    writeln!(out, "Clearing context...")?;
                    self.reset(out).await?;
                }
                Input::Help => write!(out, "{}", HELP)?,
                Input::Exit => break,
                Input::Unknown(keyword) => {
                    writeln!(out, "Invalid REPL keyword: .{}", keyword)?;
                }
                Input::Eval(code) => {
                    if self.eval(&code, out).await?.is_break() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Stop the engine and delete the install root with everything in it.
    pub async fn close(self) -> Result<()> {
        let Session {
            mut engine, state, ..
        } = self;
        let shutdown = engine.shutdown().await;
        let cleanup = state.into_root().cleanup();
        shutdown.and(cleanup)
    }

    /// `.packages`
    pub fn list_packages<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.state.packages.is_empty() {
            writeln!(out, "No packages installed.")?;
        }
        for package in &self.state.packages {
            writeln!(out, "{} = {}", package.alias(), package.install())?;
        }
        Ok(())
    }

    /// `.debug`
    pub fn debug_dump<W: Write>(&self, out: &mut W) -> Result<()> {
        let dump = serde_json::to_string_pretty(&self.state.packages)
            .context("Failed to serialize installed packages")?;
        writeln!(out, "{}", dump)?;
        Ok(())
    }

    /// `.import`: like startup, but failures are reported and the packages
    /// that did install are kept.
    pub async fn import_packages<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<()> {
        let packages = args_to_packages(args);
        if packages.is_empty() {
            writeln!(out, "Usage: .import [alias=]spec ...")?;
            return Ok(());
        }
        if let Err(e) = validate(&packages, &self.state.packages, self.rule.as_ref()) {
            writeln!(out, "{}", e)?;
            return Ok(());
        }

        let results = install_all(&self.installer, &packages, self.state.root.path()).await;
        for result in results {
            let installed = match result {
                Ok(installed) => installed,
                Err(e) => {
                    debug!("{:#}", e);
                    writeln!(out, "{:#}", e)?;
                    continue;
                }
            };
            self.bind(&installed, out).await?;
            self.state.packages.push(installed);
        }
        Ok(())
    }

    /// `.clear`: fresh scope, then every installed package again.
    pub async fn reset<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.engine.reset().await?;
        for package in &self.state.packages {
            if let Err(e) = import_package(&mut self.engine, package).await {
                if is_fatal(&e) {
                    return Err(e);
                }
                writeln!(out, "{:#}", e)?;
            }
        }
        Ok(())
    }

    async fn bind<W: Write>(&mut self, installed: &InstalledPackage, out: &mut W) -> Result<()> {
        match import_package(&mut self.engine, installed).await {
            Ok(_) => {
                writeln!(out, "{} = {}", installed.alias(), installed.install())?;
                Ok(())
            }
            Err(e) if is_fatal(&e) => Err(e),
            Err(e) => {
                writeln!(out, "{:#}", e)?;
                Ok(())
            }
        }
    }

    /// Breaks when the script ended the engine itself, e.g. with `process.exit()`.
    async fn eval<W: Write>(&mut self, code: &str, out: &mut W) -> Result<ControlFlow<()>> {
        match self.engine.eval(code).await {
            Ok(value) => writeln!(out, "{}", value)?,
            Err(e) if matches!(e.downcast_ref::<EngineError>(), Some(EngineError::Closed)) => {
                debug!("Engine exited during evaluation");
                return Ok(ControlFlow::Break(()));
            }
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => writeln!(out, "Uncaught {}", e)?,
        }
        Ok(ControlFlow::Continue(()))
    }
}
