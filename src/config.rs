/// External programs the shell drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Package manager used to install packages.
    pub npm: String,
    /// JavaScript runtime hosting the session scope.
    pub node: String,
}

