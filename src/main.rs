use anyhow::Result;
use clap::Parser;
use pkgshell::config::Config;

/// pkgshell - a JavaScript shell with npm packages preloaded
///
/// Installs the given packages into a temporary directory and binds each one
/// to a variable in an interactive node session. The directory is removed
/// when the session ends.
///
/// Examples:
///   pkgshell lodash                 # bind lodash as `lodash`
///   pkgshell l=lodash@3 chalk@5     # bind lodash 3 as `l`, chalk 5 as `chalk`
///   pkgshell fp=lodash/fp           # bind a subpath
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGSHELL_VERSION"), about)]
struct Cli {
    /// Packages to install: [alias=][@scope/]name[@version][/subpath]
    #[arg(value_name = "[ALIAS=]SPEC")]
    packages: Vec<String>,

    /// npm executable used to install packages
    #[arg(long, env = "PKGSHELL_NPM", default_value = "npm", value_name = "PATH")]
    npm: String,

    /// node executable hosting the session
    #[arg(long, env = "PKGSHELL_NODE", default_value = "node", value_name = "PATH")]
    node: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config {
        npm: cli.npm,
        node: cli.node,
    };
    pkgshell::shell::start(config, &cli.packages).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_packages_parsing() {
        let cli = Cli::try_parse_from(["pkgshell", "lodash", "m=@org/mod@1.0/sub"]).unwrap();
        assert_eq!(cli.packages, vec!["lodash", "m=@org/mod@1.0/sub"]);
    }

    #[test]
    fn test_cli_no_packages() {
        let cli = Cli::try_parse_from(["pkgshell"]).unwrap();
        assert!(cli.packages.is_empty());
    }

    #[test]
    fn test_cli_program_overrides() {
        let cli = Cli::try_parse_from([
            "pkgshell",
            "--npm",
            "/opt/npm",
            "--node",
            "/opt/node",
            "chalk",
        ])
        .unwrap();
        assert_eq!(cli.npm, "/opt/npm");
        assert_eq!(cli.node, "/opt/node");
        assert_eq!(cli.packages, vec!["chalk"]);
    }

    #[test]
    fn test_cli_unknown_flag_fails() {
        assert!(Cli::try_parse_from(["pkgshell", "--bogus"]).is_err());
    }
}
