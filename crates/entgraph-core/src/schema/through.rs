use super::graph::{Edge, EdgeId, Graph, Identity, RelKind, Relation, Type, TypeId};
use crate::{Error, Result};

impl Graph {
    /// Validates explicit join entities of M2M edges and synthesizes the O2M
    /// edge from the owner to the join entity.
    pub(super) fn resolve_through_types(&mut self) -> Result<()> {
        for eid in self.edge_ids() {
            let edge = self.edge(eid);
            let Some(through) = edge.through.clone() else {
                continue;
            };

            if edge.rel.kind != RelKind::M2M {
                return Err(Error::invalid_schema(format!(
                    "edge {} declares through type {} but is {}, not M2M",
                    self.edge_path(eid),
                    self.ty(through.ty).name,
                    edge.rel.kind
                )));
            }

            let c1 = edge.rel.columns[0].clone();
            let c2 = edge.rel.columns[1].clone();

            // The inverse side reaches the join entity through the second column.
            let (own, other) = if edge.is_inverse() {
                (&c2, &c1)
            } else {
                (&c1, &c2)
            };

            let th = self.ty(through.ty);
            let own_edge = self.through_edge(th, own, eid.ty)?;
            self.through_edge(th, other, edge.target)?;

            let identity_ok = match &th.identity {
                Identity::Single(id) => th.field(*id).name.app_name == "id",
                Identity::Composite(ids) => {
                    let names: Vec<&str> = ids
                        .iter()
                        .map(|id| th.field(*id).name.app_name.as_str())
                        .collect();
                    names == [c1.as_str(), c2.as_str()]
                }
            };

            if !identity_ok {
                return Err(Error::invalid_schema(format!(
                    "through type {} must be identified by \"id\" or by ({}, {})",
                    th.name, c1, c2
                )));
            }

            if self.ty(eid.ty).edge_by_name(&through.name).is_some() {
                return Err(Error::invalid_schema(format!(
                    "through edge \"{}\" of {} collides with an existing edge",
                    through.name,
                    self.edge_path(eid)
                )));
            }

            let table = th.table.clone();
            let mut rel = edge.rel.clone();
            rel.table = table.clone();
            self.set_relation(eid, rel);

            let owner = self.ty_mut(eid.ty);
            let synthesized = owner.id.edge(owner.edges.len());

            owner.edges.push(Edge {
                id: synthesized,
                name: through.name.clone(),
                target: through.ty,
                unique: false,
                required: false,
                immutable: false,
                inverse_of: None,
                through: None,
                through_of: Some(eid),
                rel: Relation {
                    kind: RelKind::O2M,
                    table,
                    columns: vec![own.clone()],
                },
                pair: Some(own_edge),
                bidi: false,
                field: None,
                storage_key: None,
            });

            if let Some(through) = &mut self.edge_mut(eid).through {
                through.edge = Some(synthesized);
            }

            let own_edge = self.edge_mut(own_edge);
            if own_edge.pair.is_none() {
                own_edge.pair = Some(synthesized);
            }

            tracing::debug!(
                edge = %self.edge_path(eid),
                through = %self.edge_path(synthesized),
                "synthesized through edge"
            );
        }

        Ok(())
    }

    /// Finds the unique, required edge of a through type that is bound to the
    /// field named `column` and targets `target`.
    fn through_edge(&self, th: &Type, column: &str, target: TypeId) -> Result<EdgeId> {
        th.field_by_name(column)
            .and_then(|field| field.edge)
            .map(|id| self.edge(id))
            .filter(|edge| edge.unique && edge.required && edge.target == target)
            .map(|edge| edge.id)
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "through type {} must have a unique, required edge to {} bound to field \"{}\"",
                    th.name,
                    self.ty(target).name,
                    column
                ))
            })
    }
}
