use super::graph::{Edge, EdgeId, Graph, RelKind};
use super::naming;

use indexmap::IndexMap;
use std::sync::Arc;

/// How to move from an entity to its neighbors over one edge.
///
/// Steps are built once per resolved edge and shared (`Arc`) by every
/// predicate, ordering and edge write that goes over the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub edge: EdgeId,

    /// Source table and its identity column
    pub from: StepEnd,

    /// Target table and its identity column
    pub to: StepEnd,

    pub rel: RelKind,

    /// The edge is the inverse side of its relation.
    pub inverse: bool,

    pub bidi: bool,

    /// Table holding the FK column, or the join table
    pub edge_table: String,

    /// FK column, or the `(c1, c2)` join columns
    pub columns: Vec<String>,

    /// Constant naming the target identity column; qualified with the
    /// target label when the target lives in another table.
    pub to_id_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEnd {
    pub table: String,
    pub column: String,
}

impl Step {
    pub(crate) fn new(graph: &Graph, edge: &Edge) -> Step {
        let owner = graph.ty(edge.id.ty);
        let target = graph.ty(edge.target);

        let id_constant = naming::field_constant(&target.field(target.identity.fields()[0]).name.app_name);
        let to_id_symbol = if target.table == owner.table {
            id_constant
        } else {
            naming::qualified(&target.label(), &id_constant)
        };

        Step {
            edge: edge.id,
            from: StepEnd {
                table: owner.table.clone(),
                column: owner.id_column().to_string(),
            },
            to: StepEnd {
                table: target.table.clone(),
                column: target.id_column().to_string(),
            },
            rel: edge.rel.kind,
            inverse: edge.is_inverse(),
            bidi: edge.bidi,
            edge_table: edge.rel.table.clone(),
            columns: edge.rel.columns.clone(),
            to_id_symbol,
        }
    }

    /// The source row holds the FK column pointing at the neighbor.
    pub fn fk_on_source(&self) -> bool {
        match self.rel {
            RelKind::M2O => true,
            RelKind::O2O => self.inverse || self.bidi,
            _ => false,
        }
    }

    /// The neighbor row holds the FK column pointing at the source.
    pub fn fk_on_target(&self) -> bool {
        match self.rel {
            RelKind::O2M => true,
            RelKind::O2O => !self.inverse && !self.bidi,
            _ => false,
        }
    }

    pub fn is_m2m(&self) -> bool {
        self.rel == RelKind::M2M
    }

    /// The FK column of non-M2M steps.
    pub fn fk_column(&self) -> &str {
        &self.columns[0]
    }

    /// Join columns as `(source side, target side)`.
    pub fn join_columns(&self) -> (&str, &str) {
        let (c1, c2) = (&self.columns[0][..], &self.columns[1][..]);

        if self.inverse {
            (c2, c1)
        } else {
            (c1, c2)
        }
    }
}

pub(super) fn build_steps(graph: &Graph) -> IndexMap<EdgeId, Arc<Step>> {
    let mut steps = IndexMap::new();

    for edge in graph.edges() {
        if edge.is_assoc() && edge.pair.is_none() && !edge.bidi && edge.through_of.is_none() {
            tracing::warn!(
                edge = %graph.edge_path(edge.id),
                "edge has no back-reference"
            );
        }

        steps.insert(edge.id, Arc::new(Step::new(graph, edge)));
    }

    steps
}
