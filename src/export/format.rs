//! Formatting helpers for generated Rust source.
//!
//! Identifier escaping plus an indentation-aware line writer.

/// Rust keywords that need a raw identifier when used as a field or module.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Check if a string is a Rust keyword.
#[must_use]
pub fn is_rust_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s)
}

/// Prefix keywords with `r#`; other names are returned unchanged.
#[must_use]
pub fn escape_keyword(name: String) -> String {
    if is_rust_keyword(&name) {
        format!("r#{}", name)
    } else {
        name
    }
}

const INDENT: &str = "    ";

/// Line writer that tracks the current indentation level.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buffer: String,
    current_indent: usize,
}

impl SourceWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.current_indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(1);
    }

    /// Write a complete line at the current indentation.
    pub fn write_line(&mut self, s: &str) {
        for _ in 0..self.current_indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a blank line, without indentation.
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write a `//` comment line.
    pub fn write_comment(&mut self, comment: &str) {
        self.write_line(&format!("// {}", comment));
    }

    /// Write a `///` doc comment line.
    pub fn write_doc(&mut self, doc: &str) {
        self.write_line(&format!("/// {}", doc));
    }

    /// Consume the writer and return the final string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}
