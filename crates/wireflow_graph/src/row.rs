// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data rows: the named value slots on a node.

use serde::{Deserialize, Serialize};

/// Identifier for a data row, unique within its owning node's row list
/// (not globally) and stable across edits. Used as the join key for
/// connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(pub u32);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value stored in a data row. The variant is fixed when the row is
/// created and edits must keep it consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValue {
    /// Numeric value, participates in summation
    Number(f64),
    /// Free text, passed through as-is
    Text(String),
}

impl RowValue {
    /// Get the numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether two values share the same variant
    pub fn same_kind(&self, other: &RowValue) -> bool {
        matches!(
            (self, other),
            (Self::Number(_), Self::Number(_)) | (Self::Text(_), Self::Text(_))
        )
    }

    /// Combine a stored value with an upstream override.
    ///
    /// Numeric overrides add onto numeric values; a text override replaces
    /// a text value. A variant mismatch leaves the stored value untouched
    /// (numeric-only aggregation policy).
    pub fn combine(&self, upstream: &RowValue) -> RowValue {
        match (self, upstream) {
            (Self::Number(base), Self::Number(add)) => Self::Number(base + add),
            (Self::Text(_), Self::Text(text)) => Self::Text(text.clone()),
            _ => self.clone(),
        }
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// A named value slot on a node. A row acts as a source (editable
/// literal) or a sink (computed from upstream connections) depending on
/// its node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Row id, unique within the owning node
    pub id: RowId,
    /// User-editable label
    pub title: String,
    /// Stored literal value
    pub value: RowValue,
}

impl DataRow {
    /// Create a new row
    pub fn new(id: RowId, title: impl Into<String>, value: impl Into<RowValue>) -> Self {
        Self {
            id,
            title: title.into(),
            value: value.into(),
        }
    }
}
