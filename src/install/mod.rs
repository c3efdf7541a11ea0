//! Package installation.
//!
//! [`PackageInstaller`] is the seam to the external package manager;
//! [`NpmInstaller`] is the implementation used by the binary.

mod npm;
mod root;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::join_all;
use std::path::Path;

use crate::package::{InstalledPackage, PackageToInstall};

pub use npm::NpmInstaller;
pub use root::InstallRoot;

#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Install one package under `root`. Errors carry the failing specifier.
    async fn install(&self, package: &PackageToInstall, root: &Path) -> Result<InstalledPackage>;
}

/// Install a batch concurrently.
///
/// Returns one result per package, in the order of `packages`, once every
/// install has finished. Successful installs are kept even when others fail.
pub async fn install_all<I: PackageInstaller + ?Sized>(
    installer: &I,
    packages: &[PackageToInstall],
    root: &Path,
) -> Vec<Result<InstalledPackage>> {
    join_all(packages.iter().map(|package| installer.install(package, root))).await
}
