use super::FieldId;

/// How entities of a type are identified. A type has either one identity
/// field or an ordered list of them, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Single(FieldId),

    /// Join entities identified by their two foreign keys
    Composite(Vec<FieldId>),
}

impl Identity {
    pub fn is_composite(&self) -> bool {
        matches!(self, Identity::Composite(_))
    }

    pub fn fields(&self) -> &[FieldId] {
        match self {
            Identity::Single(field) => std::slice::from_ref(field),
            Identity::Composite(fields) => fields,
        }
    }

    #[track_caller]
    pub fn expect_single(&self) -> FieldId {
        match self {
            Identity::Single(field) => *field,
            Identity::Composite(_) => panic!("expected single-field identity; actual={self:?}"),
        }
    }
}
