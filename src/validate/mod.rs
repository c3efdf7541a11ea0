//! Validation of requested packages before anything is installed.

mod identifier;
mod name;

use std::collections::HashSet;
use thiserror::Error;

use crate::package::{InstalledPackage, PackageToInstall};

pub use identifier::{is_identifier, is_reserved_word};
pub use name::{NpmNameRule, PackageNameRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid alias {alias:?} for {spec}: not a valid identifier. Use alias=spec to choose one.")]
    InvalidAlias { alias: String, spec: String },

    #[error("Invalid alias {alias:?} for {spec}: reserved word. Use alias=spec to choose another.")]
    ReservedAlias { alias: String, spec: String },

    #[error("Invalid package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Duplicate alias {alias:?}: already used by {existing}")]
    DuplicateAlias { alias: String, existing: String },
}

/// Check a batch of new packages against each other and the installed ones.
///
/// Fails on the first problem found. Nothing in the batch may be installed
/// unless this returns `Ok`.
pub fn validate(
    packages: &[PackageToInstall],
    installed: &[InstalledPackage],
    rule: &dyn PackageNameRule,
) -> Result<(), ValidationError> {
    for package in packages {
        validate_alias(package)?;
        let name = package.specifier.full_name();
        rule.check(&name)
            .map_err(|reason| ValidationError::InvalidPackageName { name, reason })?;
    }

    let mut seen: Vec<(&str, &str)> = installed
        .iter()
        .map(|p| (p.alias(), p.package.spec.as_str()))
        .collect();
    let mut aliases: HashSet<&str> = seen.iter().map(|(alias, _)| *alias).collect();
    for package in packages {
        if !aliases.insert(package.alias.as_str()) {
            let existing = seen
                .iter()
                .find(|(alias, _)| *alias == package.alias)
                .map(|(_, spec)| spec.to_string())
                .unwrap_or_default();
            return Err(ValidationError::DuplicateAlias {
                alias: package.alias.clone(),
                existing,
            });
        }
        seen.push((package.alias.as_str(), package.spec.as_str()));
    }
    Ok(())
}

fn validate_alias(package: &PackageToInstall) -> Result<(), ValidationError> {
    let alias = &package.alias;
    if !is_identifier(alias) {
        return Err(ValidationError::InvalidAlias {
            alias: alias.clone(),
            spec: package.spec.clone(),
        });
    }
    if is_reserved_word(alias) {
        return Err(ValidationError::ReservedAlias {
            alias: alias.clone(),
            spec: package.spec.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::args_to_packages;
    use std::path::PathBuf;

    fn installed(arg: &str) -> InstalledPackage {
        InstalledPackage {
            package: PackageToInstall::from_arg(arg),
            unique_name: "pkgshell-0".to_string(),
            path: PathBuf::from("/tmp/pkgshell-test/pkgshell-0/node_modules/pkgshell-0"),
        }
    }

    #[test]
    fn test_duplicate_default_alias_fails() {
        let packages = args_to_packages(&["lodash@3.0.0", "lodash@4.0.0"]);
        let err = validate(&packages, &[], &NpmNameRule).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateAlias {
                alias: "lodash".to_string(),
                existing: "lodash@3.0.0".to_string(),
            }
        );
    }

    #[test]
    fn test_distinct_aliases_for_same_package_pass() {
        let packages = args_to_packages(&["l1=lodash@3.0.0", "l2=lodash@3.0.0"]);
        assert!(validate(&packages, &[], &NpmNameRule).is_ok());
    }

    #[test]
    fn test_duplicate_against_installed_fails() {
        let packages = args_to_packages(&["chalk"]);
        let err = validate(&packages, &[installed("chalk@4")], &NpmNameRule).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateAlias { ref alias, .. } if alias == "chalk"));
        assert!(err.to_string().contains("chalk@4"));
    }

    #[test]
    fn test_reserved_alias_fails() {
        let packages = args_to_packages(&["class=classnames"]);
        let err = validate(&packages, &[], &NpmNameRule).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedAlias { .. }));
        assert!(err.to_string().contains("\"class\""));
    }

    #[test]
    fn test_alias_starting_with_digit_fails() {
        let packages = args_to_packages(&["1x=lodash"]);
        let err = validate(&packages, &[], &NpmNameRule).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAlias { .. }));
    }

    #[test]
    fn test_default_alias_with_dash_fails() {
        let packages = args_to_packages(&["left-pad"]);
        let err = validate(&packages, &[], &NpmNameRule).unwrap_err();
        assert!(err.to_string().contains("alias=spec"));
    }

    #[test]
    fn test_underscore_and_dollar_aliases_pass() {
        let packages = args_to_packages(&["_=lodash", "$foo=jquery"]);
        assert!(validate(&packages, &[], &NpmNameRule).is_ok());
    }

    #[test]
    fn test_invalid_package_name_fails() {
        let packages = args_to_packages(&["x=Lodash"]);
        let err = validate(&packages, &[], &NpmNameRule).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidPackageName { ref name, .. } if name == "Lodash")
        );
    }

    #[test]
    fn test_custom_name_rule_is_used() {
        struct DenyAll;
        impl PackageNameRule for DenyAll {
            fn check(&self, _name: &str) -> Result<(), String> {
                Err("denied".to_string())
            }
        }
        let packages = args_to_packages(&["lodash"]);
        let err = validate(&packages, &[], &DenyAll).unwrap_err();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_empty_batch_passes() {
        let none: Vec<PackageToInstall> = Vec::new();
        assert!(validate(&none, &[installed("a")], &NpmNameRule).is_ok());
    }
}
