//! Identifier normalization shared by column and table names.

/// System columns every generated table carries implicitly.
pub const RESERVED_COLUMN_NAMES: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Normalize a raw header or sheet name.
///
/// Splits on whitespace, upper-cases the first character of every part and
/// joins the parts with no separator. The rest of each part is kept as-is, so
/// `"level req"` becomes `"LevelReq"` and `"userID"` stays `"UserID"`.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether `name` matches a reserved system column, ignoring case.
pub fn is_reserved_column_name(name: &str) -> bool {
    RESERVED_COLUMN_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Name of the `index`-th element column of an array field.
pub fn element_column_name(base: &str, index: usize) -> String {
    format!("{}_{}", base, index)
}
