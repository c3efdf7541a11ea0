//! Package name rules.

/// Decides whether a full package name (`@scope/name` or `name`) is legal for
/// a registry. Returns a human-readable reason on rejection.
pub trait PackageNameRule: Send + Sync {
    fn check(&self, name: &str) -> Result<(), String>;
}

/// Naming rules of the npm registry for new packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmNameRule;

const MAX_LENGTH: usize = 214;
const BLOCKED: &[&str] = &["node_modules", "favicon.ico"];

impl PackageNameRule for NpmNameRule {
    fn check(&self, name: &str) -> Result<(), String> {
        if name.is_empty() {
            return Err("name length must be greater than zero".to_string());
        }
        if name.len() > MAX_LENGTH {
            return Err(format!(
                "name can no longer contain more than {} characters",
                MAX_LENGTH
            ));
        }
        if name.trim() != name {
            return Err("name cannot contain leading or trailing spaces".to_string());
        }
        if name.starts_with('.') {
            return Err("name cannot start with a period".to_string());
        }
        if name.starts_with('_') {
            return Err("name cannot start with an underscore".to_string());
        }
        if BLOCKED.contains(&name.to_lowercase().as_str()) {
            return Err(format!("{} is a blocked name", name));
        }
        if name.chars().any(|c| c.is_uppercase()) {
            return Err("name can no longer contain capital letters".to_string());
        }

        let (scope, bare) = match name.strip_prefix('@') {
            Some(scoped) => match scoped.split_once('/') {
                Some((scope, bare)) => (Some(scope), bare),
                None => return Err("scoped name must look like @scope/name".to_string()),
            },
            None => (None, name),
        };

        if let Some(scope) = scope {
            if !is_url_safe(scope) {
                return Err("scope can only contain URL-friendly characters".to_string());
            }
        }
        if !is_url_safe(bare) {
            return Err("name can only contain URL-friendly characters".to_string());
        }
        Ok(())
    }
}

fn is_url_safe(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npm_accepts_common_names() {
        let rule = NpmNameRule;
        for name in [
            "lodash",
            "left-pad",
            "lodash.merge",
            "@types/node",
            "@babel/core",
            "7zip-bin",
            "under_score",
        ] {
            assert!(rule.check(name).is_ok(), "{:?} should be valid", name);
        }
    }

    #[test]
    fn test_npm_rejects_illegal_names() {
        let rule = NpmNameRule;
        let cases = [
            ("", "greater than zero"),
            (".hidden", "period"),
            ("_private", "underscore"),
            (" lodash", "spaces"),
            ("Lodash", "capital"),
            ("node_modules", "blocked"),
            ("favicon.ico", "blocked"),
            ("a~b", "URL-friendly"),
            ("hello world", "URL-friendly"),
            ("@scope", "@scope/name"),
            ("@sc!ope/pkg", "scope can only"),
            ("@scope/", "URL-friendly"),
        ];
        for (name, reason) in cases {
            let err = rule.check(name).unwrap_err();
            assert!(err.contains(reason), "{:?}: {:?} lacks {:?}", name, err, reason);
        }
    }

    #[test]
    fn test_npm_length_limit() {
        let rule = NpmNameRule;
        assert!(rule.check(&"a".repeat(214)).is_ok());
        assert!(rule.check(&"a".repeat(215)).is_err());
    }
}
