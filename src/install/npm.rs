use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::package::{InstalledPackage, PackageToInstall};
use crate::runtime::Runtime;

use super::PackageInstaller;

const ID_PREFIX: &str = "pkgshell-";
const PRIVATE_MANIFEST: &[u8] = b"{\n  \"private\": true\n}\n";

/// Installs packages with npm, each into its own prefix under the root.
///
/// Every package is installed through an npm alias (`<id>@npm:<spec>`), so the
/// same package can be present several times in different versions.
pub struct NpmInstaller<R: Runtime> {
    runtime: R,
    npm: String,
    next_id: AtomicUsize,
}

impl<R: Runtime> NpmInstaller<R> {
    pub fn new(runtime: R, npm: impl Into<String>) -> Self {
        Self {
            runtime,
            npm: npm.into(),
            next_id: AtomicUsize::new(0),
        }
    }

    fn next_unique_name(&self) -> String {
        format!("{}{}", ID_PREFIX, self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn install_as(
        &self,
        package: &PackageToInstall,
        unique_name: &str,
        root: &Path,
    ) -> Result<InstalledPackage> {
        let prefix = root.join(unique_name);
        self.runtime.create_dir_all(&prefix)?;
        // Keeps npm from walking up to an unrelated project.
        self.runtime
            .write(&prefix.join("package.json"), PRIVATE_MANIFEST)?;

        let args = install_args(&prefix, unique_name, &package.specifier.install);
        let output = self.runtime.run(&self.npm, &args, &prefix).await?;
        if !output.success {
            let status = output
                .code
                .map_or_else(|| "a signal".to_string(), |c| format!("status {}", c));
            bail!("{} exited with {}: {}", self.npm, status, output.stderr.trim());
        }

        let path = prefix.join("node_modules").join(unique_name);
        if !self.runtime.is_dir(&path) {
            bail!("{} finished but {:?} does not exist", self.npm, path);
        }
        debug!("Installed {} to {:?}", package.spec, path);

        Ok(InstalledPackage {
            package: package.clone(),
            unique_name: unique_name.to_string(),
            path,
        })
    }
}

#[async_trait]
impl<R: Runtime> PackageInstaller for NpmInstaller<R> {
    #[tracing::instrument(skip(self, package, root), fields(spec = %package.spec))]
    async fn install(&self, package: &PackageToInstall, root: &Path) -> Result<InstalledPackage> {
        let unique_name = self.next_unique_name();
        info!("Installing {} as {}", package.spec, unique_name);
        self.install_as(package, &unique_name, root)
            .await
            .with_context(|| format!("Failed to install {}", package.spec))
    }
}

fn install_args(prefix: &Path, unique_name: &str, install: &str) -> Vec<String> {
    vec![
        "install".to_string(),
        "--no-save".to_string(),
        "--no-audit".to_string(),
        "--no-fund".to_string(),
        "--no-package-lock".to_string(),
        "--loglevel=error".to_string(),
        "--prefix".to_string(),
        prefix.to_string_lossy().into_owned(),
        format!("{}@npm:{}", unique_name, install),
    ]
}
