//! Binding installed packages into the session scope.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::engine::ScriptEngine;
use crate::package::InstalledPackage;

/// Export name newer Node versions add to CommonJS module namespaces.
const COMMONJS_EXPORTS: &str = "module.exports";

/// What gets bound to an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// The module's default export.
    Default,
    /// The module namespace object.
    Module,
}

impl ExportKind {
    /// A module whose only export is `default` is bound as that default
    /// value; anything else is bound as the whole module.
    pub fn for_exports<S: AsRef<str>>(exports: &[S]) -> Self {
        let mut names = exports
            .iter()
            .map(S::as_ref)
            .filter(|name| *name != COMMONJS_EXPORTS);
        match (names.next(), names.next()) {
            (Some("default"), None) => ExportKind::Default,
            _ => ExportKind::Module,
        }
    }
}

/// Load `package` and bind it to its alias, replacing any earlier binding.
pub async fn import_package<E: ScriptEngine + ?Sized>(
    engine: &mut E,
    package: &InstalledPackage,
) -> Result<ExportKind> {
    let alias = package.alias();
    let exports = engine
        .load(alias, &package.path, &package.module_request())
        .await
        .with_context(|| format!("Failed to import {}", alias))?;

    let kind = ExportKind::for_exports(&exports);
    engine
        .bind(alias, kind)
        .await
        .with_context(|| format!("Failed to import {}", alias))?;
    debug!("Bound {} ({}) as {:?}", alias, package.package.spec, kind);
    Ok(kind)
}

/// Import packages one after another in list order, stopping at the first
/// failure.
pub async fn import_all<E: ScriptEngine + ?Sized>(
    engine: &mut E,
    packages: &[InstalledPackage],
) -> Result<()> {
    for package in packages {
        import_package(engine, package).await?;
    }
    Ok(())
}
