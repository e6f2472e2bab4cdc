//! Table relations declared on the `#Relation` sheet.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

/// Name of the metadata sheet holding relation declarations.
pub const RELATION_SHEET: &str = "#Relation";

const SOURCE_TABLE: &str = "SourceTable";
const TARGET_TABLE: &str = "TargetTable";
const RELATION_TYPE: &str = "RelationType";
const FOREIGN_KEY: &str = "ForeignKey";
const REFERENCE_KEY: &str = "ReferenceKey";

const REQUIRED_HEADERS: [&str; 5] = [
    SOURCE_TABLE,
    TARGET_TABLE,
    RELATION_TYPE,
    FOREIGN_KEY,
    REFERENCE_KEY,
];

/// Errors raised while reading the relation sheet.
#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("required column {0} not found in relation sheet")]
    MissingHeader(&'static str),
}

pub type RelationResult<T> = Result<T, RelationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationType {
    #[serde(rename = "hasOne")]
    HasOne,
    #[serde(rename = "hasMany")]
    HasMany,
    #[serde(rename = "belongsTo")]
    BelongsTo,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
            RelationType::BelongsTo => "belongsTo",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    /// Case-insensitive; `has_one`, `has-one` and `hasone` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hasone" | "has_one" | "has-one" => Ok(RelationType::HasOne),
            "hasmany" | "has_many" | "has-many" => Ok(RelationType::HasMany),
            "belongsto" | "belongs_to" | "belongs-to" => Ok(RelationType::BelongsTo),
            other => Err(format!("invalid relation type '{}'", other)),
        }
    }
}

/// A relation from `source_table` to `target_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub source_table: String,
    pub target_table: String,
    pub relation_type: RelationType,
    pub foreign_key: String,
    pub reference_key: String,
}

impl Relation {
    /// Build a relation, filling the default keys for blank ones.
    pub fn new(
        source_table: impl Into<String>,
        target_table: impl Into<String>,
        relation_type: RelationType,
        foreign_key: impl Into<String>,
        reference_key: impl Into<String>,
    ) -> Self {
        let source_table = source_table.into();
        let mut foreign_key = foreign_key.into();
        let mut reference_key = reference_key.into();

        if foreign_key.is_empty() {
            foreign_key = format!("{}ID", source_table);
        }
        if reference_key.is_empty() {
            reference_key = "ID".to_string();
        }

        Self {
            source_table,
            target_table: target_table.into(),
            relation_type,
            foreign_key,
            reference_key,
        }
    }

    pub fn is_belongs_to(&self) -> bool {
        self.relation_type == RelationType::BelongsTo
    }
}

/// Parse the rows of a `#Relation` sheet.
///
/// The first row is the header and must name all five relation columns, in any
/// order. Rows with a blank source, target or type are skipped, as are rows with
/// an unrecognized relation type.
pub fn parse_relations(rows: &[Vec<String>]) -> RelationResult<Vec<Relation>> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let positions: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.trim(), i))
        .collect();

    let mut index = HashMap::new();
    for required in REQUIRED_HEADERS {
        let pos = positions
            .get(required)
            .copied()
            .ok_or(RelationError::MissingHeader(required))?;
        index.insert(required, pos);
    }

    let field = |row: &[String], name: &str| -> String {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let mut relations = Vec::new();
    for (offset, row) in body.iter().enumerate() {
        let source = field(row, SOURCE_TABLE);
        let target = field(row, TARGET_TABLE);
        let raw_type = field(row, RELATION_TYPE);

        if source.is_empty() || target.is_empty() || raw_type.is_empty() {
            debug!(row = offset + 2, "skipping incomplete relation row");
            continue;
        }

        let relation_type = match raw_type.parse::<RelationType>() {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    source = %source,
                    target = %target,
                    "{}; relation skipped",
                    e
                );
                continue;
            }
        };

        relations.push(Relation::new(
            source,
            target,
            relation_type,
            field(row, FOREIGN_KEY),
            field(row, REFERENCE_KEY),
        ));
    }

    Ok(relations)
}
