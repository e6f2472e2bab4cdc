//! Identifier quoting for generated SQL.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Characters that force an identifier to be quoted, in addition to whitespace.
const SPECIAL_CHARS: &[char] = &['-', '+', '(', ')', '[', ']', '{', '}', '.', ',', ';', '"'];

/// SQLite keywords that cannot appear as bare identifiers.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abort", "action", "add", "after", "all", "alter", "analyze", "and", "as", "asc",
        "attach", "autoincrement", "before", "begin", "between", "by", "cascade", "case",
        "cast", "check", "collate", "column", "commit", "conflict", "constraint", "create",
        "cross", "current", "current_date", "current_time", "current_timestamp", "database",
        "default", "deferrable", "deferred", "delete", "desc", "detach", "distinct", "drop",
        "each", "else", "end", "escape", "except", "exclusive", "exists", "explain", "fail",
        "for", "foreign", "from", "full", "glob", "group", "having", "if", "ignore",
        "immediate", "in", "index", "indexed", "initially", "inner", "insert", "instead",
        "intersect", "into", "is", "isnull", "join", "key", "left", "like", "limit", "match",
        "natural", "no", "not", "notnull", "null", "of", "offset", "on", "or", "order",
        "outer", "plan", "pragma", "primary", "query", "raise", "recursive", "references",
        "regexp", "reindex", "release", "rename", "replace", "restrict", "right", "rollback",
        "row", "savepoint", "select", "set", "table", "temp", "temporary", "then", "to",
        "transaction", "trigger", "union", "unique", "update", "using", "vacuum", "values",
        "view", "virtual", "when", "where", "with", "without",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name.to_lowercase().as_str())
}

/// Whether `name` must be quoted to be used as an identifier.
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || is_reserved_word(name)
        || name
            .chars()
            .any(|c| c.is_whitespace() || SPECIAL_CHARS.contains(&c))
}

/// Quote `name` with double quotes when required, doubling embedded quotes.
///
/// Every table, column and index name in generated SQL goes through here.
pub fn quote_identifier(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}
