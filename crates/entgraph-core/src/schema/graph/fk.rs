use super::{EdgeId, TypeId};
use crate::stmt::FieldType;

/// A foreign-key column held by a type's table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,

    /// Type of the referenced identity
    pub ty: FieldType,

    /// Referenced type
    pub refs: TypeId,

    /// The assoc edge the column was derived from
    pub edge: EdgeId,

    /// The edge on the holding type, if one exists
    pub holder_edge: Option<EdgeId>,

    /// The column is a declared field rather than an auto column.
    pub user_defined: bool,

    /// At most one row may reference each target (O2O).
    pub unique: bool,
}
