//! Column tags: the comma-separated annotation row of a sheet.
//!
//! A tag row cell such as `unique, default:0, size:32` becomes an ordered
//! [`TagSet`]. Unknown keywords are dropped, values given to keywords that do
//! not take one are discarded.

use std::fmt;

/// A single column annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Unique,
    Index,
    NotNull,
    AutoIncrement,
    PrimaryKey,
    Default(String),
    ForeignKey(String),
    Size(String),
    /// Column exists only for spreadsheet authors; excluded from every output.
    DesignOnly,
    Ignore,
    ReadOnly,
    WriteOnly,
    Validate(String),
}

/// Tag keyword without its value, used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Unique,
    Index,
    NotNull,
    AutoIncrement,
    PrimaryKey,
    Default,
    ForeignKey,
    Size,
    DesignOnly,
    Ignore,
    ReadOnly,
    WriteOnly,
    Validate,
}

impl TagKind {
    /// Look up a keyword. The input must already be normalized
    /// (lower-case, `-` and `_` removed).
    fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "unique" => TagKind::Unique,
            "index" => TagKind::Index,
            "notnull" => TagKind::NotNull,
            "autoincrement" | "autoinc" => TagKind::AutoIncrement,
            "primarykey" | "pk" => TagKind::PrimaryKey,
            "default" => TagKind::Default,
            "foreignkey" | "fk" => TagKind::ForeignKey,
            "size" => TagKind::Size,
            "design" | "designonly" => TagKind::DesignOnly,
            "ignore" => TagKind::Ignore,
            "readonly" => TagKind::ReadOnly,
            "writeonly" => TagKind::WriteOnly,
            "validate" => TagKind::Validate,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether `keyword:value` keeps its value for this tag.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            TagKind::Default | TagKind::Size | TagKind::ForeignKey | TagKind::Validate
        )
    }

    fn with_value(self, value: String) -> Tag {
        match self {
            TagKind::Unique => Tag::Unique,
            TagKind::Index => Tag::Index,
            TagKind::NotNull => Tag::NotNull,
            TagKind::AutoIncrement => Tag::AutoIncrement,
            TagKind::PrimaryKey => Tag::PrimaryKey,
            TagKind::Default => Tag::Default(value),
            TagKind::ForeignKey => Tag::ForeignKey(value),
            TagKind::Size => Tag::Size(value),
            TagKind::DesignOnly => Tag::DesignOnly,
            TagKind::Ignore => Tag::Ignore,
            TagKind::ReadOnly => Tag::ReadOnly,
            TagKind::WriteOnly => Tag::WriteOnly,
            TagKind::Validate => Tag::Validate(value),
        }
    }
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Unique => TagKind::Unique,
            Tag::Index => TagKind::Index,
            Tag::NotNull => TagKind::NotNull,
            Tag::AutoIncrement => TagKind::AutoIncrement,
            Tag::PrimaryKey => TagKind::PrimaryKey,
            Tag::Default(_) => TagKind::Default,
            Tag::ForeignKey(_) => TagKind::ForeignKey,
            Tag::Size(_) => TagKind::Size,
            Tag::DesignOnly => TagKind::DesignOnly,
            Tag::Ignore => TagKind::Ignore,
            Tag::ReadOnly => TagKind::ReadOnly,
            Tag::WriteOnly => TagKind::WriteOnly,
            Tag::Validate(_) => TagKind::Validate,
        }
    }

    /// The attached value of a value-bearing tag.
    pub fn value(&self) -> Option<&str> {
        match self {
            Tag::Default(v) | Tag::ForeignKey(v) | Tag::Size(v) | Tag::Validate(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    /// Renders the tag the way generated model code spells it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Unique => f.write_str("unique"),
            Tag::Index => f.write_str("index"),
            Tag::NotNull => f.write_str("not null"),
            Tag::AutoIncrement => f.write_str("autoIncrement"),
            Tag::PrimaryKey => f.write_str("primaryKey"),
            Tag::Default(v) => write!(f, "default:{}", v),
            Tag::ForeignKey(v) => write!(f, "foreignKey:{}", v),
            Tag::Size(v) => write!(f, "size:{}", v),
            Tag::DesignOnly => f.write_str("design"),
            Tag::Ignore => f.write_str("ignore"),
            Tag::ReadOnly => f.write_str("readOnly"),
            Tag::WriteOnly => f.write_str("writeOnly"),
            Tag::Validate(v) => write!(f, "validate:{}", v),
        }
    }
}

/// Normalize a tag keyword: lower-case, trimmed, `-` and `_` removed.
pub fn normalize_tag_keyword(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect()
}

/// Parse a bare keyword. Unrecognized keywords yield `None`.
pub fn parse_tag(token: &str) -> Option<TagKind> {
    TagKind::from_keyword(&normalize_tag_keyword(token))
}

/// Parse `keyword` or `keyword:value`.
///
/// Splits on the first `:`; the value is kept only for value-bearing tags.
pub fn parse_tag_with_value(token: &str) -> Option<Tag> {
    let (keyword, value) = match token.split_once(':') {
        Some((k, v)) => (k, Some(v.trim())),
        None => (token, None),
    };

    let kind = parse_tag(keyword)?;
    let value = if kind.has_value() {
        value.unwrap_or_default().to_string()
    } else {
        String::new()
    };

    Some(kind.with_value(value))
}

/// Ordered set of tags attached to one column.
///
/// Duplicates are kept; lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw tag cell (comma-separated tokens).
    pub fn parse(raw: &str) -> Self {
        let tags = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter_map(parse_tag_with_value)
            .collect();
        Self { tags }
    }

    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn contains(&self, kind: TagKind) -> bool {
        self.tags.iter().any(|t| t.kind() == kind)
    }

    /// Value of the first occurrence of a value-bearing tag.
    pub fn value(&self, kind: TagKind) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.kind() == kind)
            .and_then(Tag::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Tag string handed to code generation: `;`-joined, in source order,
    /// first occurrence of each keyword only.
    pub fn to_tag_string(&self) -> String {
        let mut seen = Vec::new();
        let mut parts = Vec::new();
        for tag in &self.tags {
            if seen.contains(&tag.kind()) {
                continue;
            }
            seen.push(tag.kind());
            parts.push(tag.to_string());
        }
        parts.join(";")
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}
