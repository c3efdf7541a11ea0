/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Packages,
    Import(Vec<String>),
    Debug,
    Clear,
    Help,
    Exit,
    /// A dot-command nobody handles, e.g. `.foo`.
    Unknown(String),
    Eval(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Empty;
        }

        // ".5 + 1" is code, ".packages" is a command.
        let is_command = trimmed
            .strip_prefix('.')
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_alphabetic());
        if !is_command {
            return Input::Eval(line.to_string());
        }

        let mut words = trimmed[1..].split_whitespace();
        let keyword = words.next().unwrap_or_default();
        match keyword {
            "packages" => Input::Packages,
            "import" => Input::Import(words.map(str::to_string).collect()),
            "debug" => Input::Debug,
            "clear" => Input::Clear,
            "help" => Input::Help,
            "exit" => Input::Exit,
            _ => Input::Unknown(keyword.to_string()),
        }
    }
}

pub const HELP: &str = "\
.clear     Reset the context and re-import all packages
.debug     Show the installed package records
.exit      Exit the shell
.help      Print this help message
.import    Install and import packages: .import [alias=]spec ...
.packages  List the imported packages
";
