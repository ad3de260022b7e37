use crate::schema::Step;

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One term of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderTerm {
    /// Order by a column of the queried table.
    Field { column: String, dir: Direction },

    /// Order by the number of neighbors reachable over the step.
    NeighborCount { step: Arc<Step>, dir: Direction },

    /// Order by a column of the (single) neighbor reachable over a unique
    /// edge's step.
    NeighborField {
        step: Arc<Step>,
        column: String,
        dir: Direction,
    },
}

impl OrderTerm {
    pub fn dir(&self) -> Direction {
        match *self {
            OrderTerm::Field { dir, .. }
            | OrderTerm::NeighborCount { dir, .. }
            | OrderTerm::NeighborField { dir, .. } => dir,
        }
    }
}
