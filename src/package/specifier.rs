//! Package specifier parsing.
//!
//! A specifier has the form `(@scope/)?name(@version)?(/subpath)?`, e.g.
//! `@org/module@4.0.0/subpath`. Parsing is purely structural: it never fails,
//! and input that does not fit the grammar yields a specifier with every
//! field empty. Legality is checked later by the validator.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A package specifier split into its parts.
///
/// Absent parts are empty strings. Separators stay attached to their part
/// (`scope` keeps its trailing `/`, `version` its leading `@`, `subpath` its
/// leading `/`), so concatenating `scope + name + version + subpath` gives back
/// the original text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PackageSpecifier {
    /// What the package manager is asked to install: `scope + name + version`.
    pub install: String,
    pub scope: String,
    pub name: String,
    pub version: String,
    pub subpath: String,
}

impl PackageSpecifier {
    /// Parse a specifier. Never fails; see the module docs.
    pub fn parse(s: &str) -> Self {
        Self::split(s).unwrap_or_default()
    }

    /// The registry name of the package, `scope + name`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.scope, self.name)
    }

    fn split(s: &str) -> Option<Self> {
        let (scope, rest) = match s.strip_prefix('@') {
            Some(after_at) => {
                let slash = after_at.find('/')?;
                if slash == 0 {
                    return None;
                }
                s.split_at(slash + 2)
            }
            None => ("", s),
        };

        let name_end = rest.find(['/', '@']).unwrap_or(rest.len());
        let (name, rest) = rest.split_at(name_end);
        if name.is_empty() {
            return None;
        }

        let (version, subpath) = if rest.starts_with('@') {
            let version_end = rest.find('/').unwrap_or(rest.len());
            rest.split_at(version_end)
        } else {
            ("", rest)
        };

        Some(PackageSpecifier {
            install: format!("{}{}{}", scope, name, version),
            scope: scope.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            subpath: subpath.to_string(),
        })
    }
}

impl FromStr for PackageSpecifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PackageSpecifier::parse(s))
    }
}

impl fmt::Display for PackageSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.install, self.subpath)
    }
}
