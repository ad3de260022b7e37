use super::Value;
use crate::schema::Step;

use std::sync::Arc;

/// A storage-level filter over the columns of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CmpOp,
        value: Value,
    },

    In {
        column: String,
        values: Vec<Value>,
        negate: bool,
    },

    IsNull {
        column: String,
        negate: bool,
    },

    /// Matches rows with at least one neighbor over the step, optionally
    /// restricted to neighbors matching `with`.
    HasNeighbors {
        step: Arc<Step>,
        with: Option<Box<Predicate>>,
    },

    And(Vec<Predicate>),

    Or(Vec<Predicate>),

    Not(Box<Predicate>),

    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            column: column.into(),
            op: CmpOp::Eq,
            value: value.into(),
        }
    }

    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Predicate {
        Predicate::In {
            column: column.into(),
            values,
            negate: false,
        }
    }

    /// Combines predicates with `AND`, flattening nested conjunctions.
    /// An empty list yields `true`.
    pub fn and_all(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
        let mut operands = vec![];

        for pred in preds {
            match pred {
                Predicate::And(inner) => operands.extend(inner),
                Predicate::Bool(true) => {}
                pred => operands.push(pred),
            }
        }

        match operands.len() {
            0 => Predicate::Bool(true),
            1 => operands.remove(0),
            _ => Predicate::And(operands),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::Bool(true))
    }
}

impl CmpOp {
    /// Returns `true` if `lhs op rhs` holds. Unordered pairs never match.
    pub fn eval(self, lhs: &Value, rhs: &Value) -> bool {
        use std::cmp::Ordering::*;

        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Gt => lhs.compare(rhs) == Some(Greater),
            CmpOp::Ge => matches!(lhs.compare(rhs), Some(Greater | Equal)),
            CmpOp::Lt => lhs.compare(rhs) == Some(Less),
            CmpOp::Le => matches!(lhs.compare(rhs), Some(Less | Equal)),
        }
    }
}

impl core::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        })
    }
}
