//! Startup path of the binary: wires the real installer, engine and terminal.

use anyhow::Result;
use log::warn;
use std::io;

use crate::config::Config;
use crate::engine::{NodeEngine, ScriptEngine};
use crate::install::{InstallRoot, NpmInstaller, PackageInstaller};
use crate::interrupt::InterruptGuard;
use crate::package::{PackageToInstall, args_to_packages};
use crate::runtime::RealRuntime;
use crate::session::{EditorReader, Session, SessionState};
use crate::validate::{NpmNameRule, validate};

/// Install `args`, then run the interactive session until it ends.
///
/// The install root is removed on every path out of this function.
#[tracing::instrument(skip(config))]
pub async fn start(config: Config, args: &[String]) -> Result<()> {
    let packages = args_to_packages(args);
    // Reject bad input before starting anything.
    validate(&packages, &[], &NpmNameRule)?;

    let root = InstallRoot::create()?;
    let engine = NodeEngine::spawn(&config.node, root.path())?;
    // Line editing handles its own Ctrl-C. This covers installs and evaluation.
    let _interrupt = InterruptGuard::watch(root.path().to_path_buf(), engine.pid());
    let installer = NpmInstaller::new(RealRuntime, config.npm);
    let mut session = Session::new(installer, engine, SessionState::new(root));

    if !packages.is_empty() {
        let specs: Vec<&str> = packages.iter().map(|p| p.spec.as_str()).collect();
        println!("Installing {}...", specs.join(", "));
    }

    let result = interact(&mut session, &packages).await;

    if let Err(e) = session.close().await {
        if result.is_ok() {
            return Err(e);
        }
        warn!("Cleanup after failure also failed: {:#}", e);
    }
    result
}

async fn interact<I, E>(session: &mut Session<I, E>, packages: &[PackageToInstall]) -> Result<()>
where
    I: PackageInstaller,
    E: ScriptEngine,
{
    session.load(packages).await?;

    let mut stdout = io::stdout();
    session.list_packages(&mut stdout)?;
    let mut reader = EditorReader::new()?;
    session.run(&mut reader, &mut stdout).await
}
