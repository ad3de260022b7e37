use entgraph_core::{
    schema::graph::{Type, TypeId},
    stmt::{CmpOp, Predicate, Value},
    Error, Result, Schema,
};

/// A predicate over an entity type, naming fields and edges by their
/// declared names. Lowered to a storage [`Predicate`] when the operation is
/// assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    Field {
        name: String,
        op: CmpOp,
        value: Value,
    },

    FieldIn {
        name: String,
        values: Vec<Value>,
        negate: bool,
    },

    FieldNull {
        name: String,
        negate: bool,
    },

    /// Compares the single identity field.
    Id { op: CmpOp, value: Value },

    IdIn(Vec<Value>),

    /// At least one neighbor over the edge, matching `with` if given.
    HasEdge {
        name: String,
        with: Option<Box<Where>>,
    },

    And(Vec<Where>),

    Or(Vec<Where>),

    Not(Box<Where>),

    /// An already lowered predicate, used as is.
    Raw(Predicate),
}

pub fn field_eq(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Eq, value)
}

pub fn field_ne(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Ne, value)
}

pub fn field_gt(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Gt, value)
}

pub fn field_ge(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Ge, value)
}

pub fn field_lt(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Lt, value)
}

pub fn field_le(name: impl Into<String>, value: impl Into<Value>) -> Where {
    Where::field(name, CmpOp::Le, value)
}

pub fn field_in<V: Into<Value>>(
    name: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Where {
    Where::FieldIn {
        name: name.into(),
        values: values.into_iter().map(Into::into).collect(),
        negate: false,
    }
}

pub fn field_not_in<V: Into<Value>>(
    name: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Where {
    Where::FieldIn {
        name: name.into(),
        values: values.into_iter().map(Into::into).collect(),
        negate: true,
    }
}

pub fn field_is_null(name: impl Into<String>) -> Where {
    Where::FieldNull {
        name: name.into(),
        negate: false,
    }
}

pub fn field_not_null(name: impl Into<String>) -> Where {
    Where::FieldNull {
        name: name.into(),
        negate: true,
    }
}

pub fn has_edge(name: impl Into<String>) -> Where {
    Where::HasEdge {
        name: name.into(),
        with: None,
    }
}

pub fn has_edge_with(name: impl Into<String>, with: Where) -> Where {
    Where::HasEdge {
        name: name.into(),
        with: Some(Box::new(with)),
    }
}

pub fn and(preds: impl IntoIterator<Item = Where>) -> Where {
    Where::And(preds.into_iter().collect())
}

pub fn or(preds: impl IntoIterator<Item = Where>) -> Where {
    Where::Or(preds.into_iter().collect())
}

pub fn not(pred: Where) -> Where {
    Where::Not(Box::new(pred))
}

impl Where {
    pub fn field(name: impl Into<String>, op: CmpOp, value: impl Into<Value>) -> Where {
        Where::Field {
            name: name.into(),
            op,
            value: value.into(),
        }
    }

    pub fn id_eq(value: impl Into<Value>) -> Where {
        Where::Id {
            op: CmpOp::Eq,
            value: value.into(),
        }
    }

    pub fn id_in<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Where {
        Where::IdIn(values.into_iter().map(Into::into).collect())
    }

    /// Lowers the predicate against the columns of `ty`.
    pub fn lower(&self, schema: &Schema, ty: TypeId) -> Result<Predicate> {
        let owner = schema.ty(ty);

        Ok(match self {
            Where::Field { name, op, value } => Predicate::Compare {
                column: column(owner, name)?,
                op: *op,
                value: value.clone(),
            },
            Where::FieldIn {
                name,
                values,
                negate,
            } => Predicate::In {
                column: column(owner, name)?,
                values: values.clone(),
                negate: *negate,
            },
            Where::FieldNull { name, negate } => Predicate::IsNull {
                column: column(owner, name)?,
                negate: *negate,
            },
            Where::Id { op, value } => Predicate::Compare {
                column: id_column(owner)?,
                op: *op,
                value: value.clone(),
            },
            Where::IdIn(values) => Predicate::in_list(id_column(owner)?, values.clone()),
            Where::HasEdge { name, with } => {
                let edge = owner.edge_by_name(name).ok_or_else(|| {
                    Error::usage(format!("unknown edge \"{name}\" on type {}", owner.name))
                })?;

                let with = match with {
                    Some(with) => Some(Box::new(with.lower(schema, edge.target)?)),
                    None => None,
                };

                Predicate::HasNeighbors {
                    step: schema.step(edge.id).clone(),
                    with,
                }
            }
            Where::And(preds) => Predicate::and_all(
                preds
                    .iter()
                    .map(|pred| pred.lower(schema, ty))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Where::Or(preds) => Predicate::Or(
                preds
                    .iter()
                    .map(|pred| pred.lower(schema, ty))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Where::Not(pred) => Predicate::Not(Box::new(pred.lower(schema, ty)?)),
            Where::Raw(pred) => pred.clone(),
        })
    }
}

/// Lowers and combines predicates with `AND`.
pub(crate) fn lower_all(preds: &[Where], schema: &Schema, ty: TypeId) -> Result<Predicate> {
    Ok(Predicate::and_all(
        preds
            .iter()
            .map(|pred| pred.lower(schema, ty))
            .collect::<Result<Vec<_>>>()?,
    ))
}

pub(crate) fn column(ty: &Type, name: &str) -> Result<String> {
    if let Some(field) = ty.field_by_name(name) {
        return Ok(field.column().to_string());
    }

    // Auto FK columns can be filtered on through their unique edge.
    if let Some(column) = ty
        .edge_by_name(name)
        .filter(|edge| edge.own_fk())
        .and_then(|edge| edge.column())
    {
        return Ok(column.to_string());
    }

    Err(Error::usage(format!(
        "unknown field \"{name}\" on type {}",
        ty.name
    )))
}

fn id_column(ty: &Type) -> Result<String> {
    if ty.has_composite_id() {
        return Err(Error::usage(format!(
            "type {} has a composite identity; filter on its identity fields instead",
            ty.name
        )));
    }

    Ok(ty.id_column().to_string())
}
