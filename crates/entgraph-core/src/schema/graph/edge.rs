use super::{FieldId, TypeId};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Edge {
    /// Uniquely identifies the edge within the containing type.
    pub id: EdgeId,

    pub name: String,

    pub target: TypeId,

    /// At most one neighbor.
    pub unique: bool,

    /// A neighbor must be set when creating.
    pub required: bool,

    /// Cannot be changed by an update.
    pub immutable: bool,

    /// For inverse edges, the name of the assoc edge on the target type.
    pub inverse_of: Option<String>,

    /// Explicit join entity for M2M edges
    pub through: Option<Through>,

    /// Set on O2M edges synthesized for a through type, pointing at the
    /// M2M edge that declared it.
    pub through_of: Option<EdgeId>,

    pub rel: Relation,

    /// The other side of the relation, once resolved
    pub pair: Option<EdgeId>,

    /// Symmetric self-referential edge
    pub bidi: bool,

    /// Field holding this edge's foreign key, if declared
    pub field: Option<FieldId>,

    /// Explicit storage names
    pub storage_key: Option<StorageKey>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    pub ty: TypeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Through {
    /// Name of the O2M edge synthesized from the owner to the through type
    pub name: String,

    pub ty: TypeId,

    /// The synthesized edge, once resolved
    pub edge: Option<EdgeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelKind,

    /// Table holding the foreign key, or the join table for M2M
    pub table: String,

    /// One FK column, or `(source, target)` for M2M
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RelKind {
    #[default]
    Unknown,
    O2O,
    O2M,
    M2O,
    M2M,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKey {
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub columns: Vec<String>,
}

impl Edge {
    /// Inverse edges reference an assoc edge declared on their target.
    pub fn is_inverse(&self) -> bool {
        self.inverse_of.is_some()
    }

    pub fn is_assoc(&self) -> bool {
        !self.is_inverse()
    }

    pub fn optional(&self) -> bool {
        !self.required
    }

    /// Returns `true` if this edge's own table holds the foreign key.
    pub fn own_fk(&self) -> bool {
        match self.rel.kind {
            RelKind::M2O => true,
            RelKind::O2O => self.is_inverse() || self.bidi,
            _ => false,
        }
    }

    /// The FK column for O2O, O2M and M2O relations.
    pub fn column(&self) -> Option<&str> {
        match self.rel.kind {
            RelKind::M2M | RelKind::Unknown => None,
            _ => self.rel.columns.first().map(String::as_str),
        }
    }

    pub fn is_through_synthesized(&self) -> bool {
        self.through_of.is_some()
    }
}

impl RelKind {
    /// `(unique this side, unique other side)`
    pub fn multiplicity(self) -> (bool, bool) {
        match self {
            RelKind::O2O => (true, true),
            RelKind::O2M => (false, true),
            RelKind::M2O => (true, false),
            RelKind::M2M => (false, false),
            RelKind::Unknown => (false, false),
        }
    }

    /// The kind seen from the other side of the relation.
    pub fn flip(self) -> RelKind {
        match self {
            RelKind::O2M => RelKind::M2O,
            RelKind::M2O => RelKind::O2M,
            kind => kind,
        }
    }
}

impl fmt::Display for RelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelKind::Unknown => "Unknown",
            RelKind::O2O => "O2O",
            RelKind::O2M => "O2M",
            RelKind::M2O => "M2O",
            RelKind::M2M => "M2M",
        })
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EdgeId({}/{})", self.ty.0, self.index)
    }
}
