//! Package records flowing through a session.
//!
//! Raw command-line tokens become [`PackageToInstall`] records via
//! [`args_to_packages`]; the installer turns those into [`InstalledPackage`]s.

mod specifier;

use serde::Serialize;
use std::path::PathBuf;

pub use specifier::PackageSpecifier;

/// A package requested by the user, not yet installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageToInstall {
    #[serde(flatten)]
    pub specifier: PackageSpecifier,
    /// The token as given, without any `alias=` prefix.
    pub spec: String,
    /// Variable name the package is bound to in the session.
    pub alias: String,
}

impl PackageToInstall {
    /// Build a record from a single `[alias=]spec` token.
    ///
    /// Everything before the first `=` is the alias. Without one, the alias
    /// defaults to the parsed package name.
    pub fn from_arg(arg: &str) -> Self {
        let (alias, spec) = match arg.split_once('=') {
            Some((alias, spec)) => (Some(alias), spec),
            None => (None, arg),
        };
        let specifier = PackageSpecifier::parse(spec);
        let alias = alias.map_or_else(|| specifier.name.clone(), str::to_string);
        PackageToInstall {
            specifier,
            spec: spec.to_string(),
            alias,
        }
    }
}

/// A package installed under the session's install root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    #[serde(flatten)]
    pub package: PackageToInstall,
    /// Identifier the package manager installed the package under.
    pub unique_name: String,
    /// Directory holding the installed package.
    pub path: PathBuf,
}

impl InstalledPackage {
    pub fn alias(&self) -> &str {
        &self.package.alias
    }

    pub fn install(&self) -> &str {
        &self.package.specifier.install
    }

    /// The module request to resolve, including any subpath.
    pub fn module_request(&self) -> String {
        format!("{}{}", self.unique_name, self.package.specifier.subpath)
    }
}

/// Map raw tokens to packages, one per token, in input order.
pub fn args_to_packages<S: AsRef<str>>(args: &[S]) -> Vec<PackageToInstall> {
    args.iter()
        .map(|arg| PackageToInstall::from_arg(arg.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_packages_default_and_explicit_alias() {
        let packages = args_to_packages(&["module", "m=module@2.0"]);
        assert_eq!(packages.len(), 2);

        assert_eq!(packages[0].alias, "module");
        assert_eq!(packages[0].spec, "module");
        assert_eq!(packages[0].specifier.version, "");

        assert_eq!(packages[1].alias, "m");
        assert_eq!(packages[1].spec, "module@2.0");
        assert_eq!(packages[1].specifier.version, "@2.0");
        assert_eq!(packages[1].specifier.install, "module@2.0");
    }

    #[test]
    fn test_args_to_packages_preserves_order_and_duplicates() {
        let packages = args_to_packages(&["b", "a", "b@2"]);
        let aliases: Vec<_> = packages.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(aliases, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_alias_split_on_first_equals_only() {
        let package = PackageToInstall::from_arg("x=pkg@a=b");
        assert_eq!(package.alias, "x");
        assert_eq!(package.spec, "pkg@a=b");
        assert_eq!(package.specifier.version, "@a=b");
    }

    #[test]
    fn test_empty_alias_is_kept_for_validation() {
        let package = PackageToInstall::from_arg("=lodash");
        assert_eq!(package.alias, "");
        assert_eq!(package.specifier.name, "lodash");
    }

    #[test]
    fn test_scoped_package_defaults_alias_to_bare_name() {
        let package = PackageToInstall::from_arg("@org/tool@1.0.0/sub");
        assert_eq!(package.alias, "tool");
        assert_eq!(package.specifier.subpath, "/sub");
    }

    #[test]
    fn test_installed_package_module_request() {
        let installed = InstalledPackage {
            package: PackageToInstall::from_arg("fp=lodash@4/fp"),
            unique_name: "pkgshell-3".to_string(),
            path: PathBuf::from("/tmp/root/pkgshell-3/node_modules/pkgshell-3"),
        };
        assert_eq!(installed.module_request(), "pkgshell-3/fp");
        assert_eq!(installed.alias(), "fp");
        assert_eq!(installed.install(), "lodash@4");
    }
}
