//! Messages exchanged with the node driver, one JSON document per line.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::import::ExportKind;

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request<'a> {
    Eval {
        code: &'a str,
    },
    Load {
        alias: &'a str,
        base: &'a Path,
        request: &'a str,
    },
    Bind {
        alias: &'a str,
        kind: ExportKind,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Text written by evaluated code or imported modules.
    Output { text: String },
    /// Final reply to the current request.
    Done {
        ok: bool,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        exports: Option<Vec<String>>,
        #[serde(default)]
        error: Option<String>,
    },
}
