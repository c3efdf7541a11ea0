//! JavaScript identifier rules for aliases.

use unicode_ident::{is_xid_continue, is_xid_start};

/// Words that cannot be used as a binding name in the session scope.
///
/// ECMAScript keywords, strict-mode reserved words and literals, plus the
/// non-writable globals `undefined`, `NaN` and `Infinity`.
const RESERVED: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    "undefined",
    "NaN",
    "Infinity",
];

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

pub fn is_reserved_word(s: &str) -> bool {
    RESERVED.contains(&s)
}

/// Whether `s` is syntactically an identifier name.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

// ID_Start / ID_Continue, taken as their XID closures.
fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || is_xid_start(c)
}

fn is_identifier_part(c: char) -> bool {
    c == '$' || c == ZWNJ || c == ZWJ || is_xid_continue(c)
}
