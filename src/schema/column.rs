//! The canonical column model produced by the column builder.

use super::tags::{TagKind, TagSet};
use super::types::ColumnType;

/// How a column relates to the source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    /// One header position, one column.
    Scalar,
    /// JSON-encoded aggregate of an array field with `len` element slots.
    ArrayAggregate { len: usize },
    /// The `index`-th element slot of the array field `parent`.
    ArrayElement { parent: String, index: usize },
}

/// A single column of a table.
///
/// Built once by [`ColumnBuilder`](super::builder::ColumnBuilder) and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub tags: TagSet,
    pub role: ColumnRole,
    /// Zero-based header positions whose cells feed this column.
    pub positions: Vec<usize>,
}

impl Column {
    /// A plain column read from one header position.
    pub fn scalar(name: impl Into<String>, ty: ColumnType, tags: TagSet, position: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            tags,
            role: ColumnRole::Scalar,
            positions: vec![position],
        }
    }

    pub fn is_unique(&self) -> bool {
        self.tags.contains(TagKind::Unique)
    }

    pub fn is_indexed(&self) -> bool {
        self.tags.contains(TagKind::Index)
    }

    pub fn is_array_aggregate(&self) -> bool {
        matches!(self.role, ColumnRole::ArrayAggregate { .. })
    }

    /// Element count of an array aggregate.
    pub fn array_len(&self) -> Option<usize> {
        match self.role {
            ColumnRole::ArrayAggregate { len } => Some(len),
            _ => None,
        }
    }

    pub fn sql_type(&self) -> &'static str {
        self.ty.sql_type_string()
    }

    /// Tag string exposed to code generation.
    ///
    /// Array aggregates are declared as text, element slots carry their
    /// lower-cased storage column name, scalars render their own tags.
    pub fn tag_string(&self) -> String {
        match &self.role {
            ColumnRole::Scalar => self.tags.to_tag_string(),
            ColumnRole::ArrayAggregate { .. } => "type:text".to_string(),
            ColumnRole::ArrayElement { parent, index } => {
                format!("column:{}_{}", parent.to_lowercase(), index)
            }
        }
    }
}
