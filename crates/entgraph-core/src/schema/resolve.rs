use super::graph::{Edge, EdgeId, ForeignKey, Graph, RelKind, Relation};
use super::naming;
use crate::{Error, Result};

impl Graph {
    /// Resolves every edge into a relation: multiplicity, owning side,
    /// foreign-key column or join-table layout, and the inverse pairing.
    ///
    /// Resolution starts from the declared state each time, so running it
    /// again yields the same graph.
    pub fn resolve(&mut self) -> Result<()> {
        self.reset_resolution();
        self.link_inverse_edges()?;
        self.resolve_unpaired_edges();
        self.apply_storage_keys()?;
        self.bind_edge_fields()?;
        self.resolve_through_types()?;
        self.place_foreign_keys();
        Ok(())
    }

    fn reset_resolution(&mut self) {
        for ty in self.types.values_mut() {
            ty.edges.retain(|edge| edge.through_of.is_none());
            ty.foreign_keys.clear();

            for edge in &mut ty.edges {
                edge.rel = Relation::default();
                edge.pair = None;
                edge.bidi = false;

                if let Some(through) = &mut edge.through {
                    through.edge = None;
                }
            }

            for field in &mut ty.fields {
                field.edge = None;
            }
        }
    }

    fn link_inverse_edges(&mut self) -> Result<()> {
        for eid in self.edge_ids() {
            let inverse = self.edge(eid);
            let Some(assoc_name) = &inverse.inverse_of else {
                continue;
            };

            let assoc_owner = self.ty(inverse.target);
            let Some(assoc) = assoc_owner
                .edge_by_name(assoc_name)
                .filter(|edge| edge.is_assoc())
            else {
                return Err(Error::invalid_schema(format!(
                    "missing assoc edge \"{}\" on type {} for inverse edge {}",
                    assoc_name,
                    assoc_owner.name,
                    self.edge_path(eid)
                )));
            };

            if assoc.target != eid.ty {
                return Err(Error::invalid_schema(format!(
                    "mismatch type for back-ref of edge {}: {} points to {}, not {}",
                    self.edge_path(eid),
                    self.edge_path(assoc.id),
                    self.ty(assoc.target).name,
                    self.ty(eid.ty).name,
                )));
            }

            if assoc.required && inverse.required {
                return Err(Error::invalid_schema(format!(
                    "edges {} and {} cannot be required in both directions",
                    self.edge_path(assoc.id),
                    self.edge_path(eid),
                )));
            }

            if let Some(existing) = assoc.pair {
                return Err(Error::invalid_schema(format!(
                    "assoc edge {} has more than one inverse: {} and {}",
                    self.edge_path(assoc.id),
                    self.edge_path(existing),
                    self.edge_path(eid),
                )));
            }

            let aid = assoc.id;
            let a_label = assoc_owner.label();
            let b_label = self.ty(eid.ty).label();

            let (kind, table, columns) = match (assoc.unique, inverse.unique) {
                (true, true) => (
                    RelKind::O2O,
                    self.ty(eid.ty).table.clone(),
                    vec![naming::fk_column(&a_label, &assoc.name)],
                ),
                (false, true) => (
                    RelKind::O2M,
                    self.ty(eid.ty).table.clone(),
                    vec![naming::fk_column(&a_label, &assoc.name)],
                ),
                (true, false) => (
                    RelKind::M2O,
                    assoc_owner.table.clone(),
                    vec![naming::fk_column(&a_label, &assoc.name)],
                ),
                (false, false) => {
                    let c1 = naming::id_column(&a_label);
                    let mut c2 = naming::id_column(&b_label);

                    if c1 == c2 {
                        c2 = naming::singular_id_column(&inverse.name);
                    }

                    (
                        RelKind::M2M,
                        self.prefixed(&naming::join_table(&a_label, &assoc.name)),
                        vec![c1, c2],
                    )
                }
            };

            tracing::debug!(
                assoc = %self.edge_path(aid),
                inverse = %self.edge_path(eid),
                rel = %kind,
                table = %table,
                ?columns,
                "resolved edge pair"
            );

            let rel = Relation {
                kind,
                table,
                columns,
            };

            let assoc = self.edge_mut(aid);
            assoc.pair = Some(eid);
            assoc.rel = rel.clone();

            let inverse = self.edge_mut(eid);
            inverse.pair = Some(aid);
            inverse.rel = Relation {
                kind: kind.flip(),
                ..rel
            };
        }

        Ok(())
    }

    fn resolve_unpaired_edges(&mut self) {
        for eid in self.edge_ids() {
            let edge = self.edge(eid);

            if edge.is_inverse() || edge.pair.is_some() {
                continue;
            }

            let owner = self.ty(eid.ty);
            let label = owner.label();
            let self_ref = edge.target == eid.ty;

            let (kind, bidi, table, columns) = match (edge.unique, self_ref) {
                (false, true) => (
                    RelKind::M2M,
                    true,
                    self.prefixed(&naming::join_table(&label, &edge.name)),
                    vec![
                        naming::id_column(&label),
                        naming::singular_id_column(&edge.name),
                    ],
                ),
                (true, true) => (
                    RelKind::O2O,
                    true,
                    owner.table.clone(),
                    vec![naming::fk_column(&label, &edge.name)],
                ),
                (true, false) => (
                    RelKind::M2O,
                    false,
                    owner.table.clone(),
                    vec![naming::fk_column(&label, &edge.name)],
                ),
                (false, false) => (
                    RelKind::O2M,
                    false,
                    self.ty(edge.target).table.clone(),
                    vec![naming::fk_column(&label, &edge.name)],
                ),
            };

            tracing::debug!(
                edge = %self.edge_path(eid),
                rel = %kind,
                bidi,
                table = %table,
                ?columns,
                "resolved unpaired edge"
            );

            let edge = self.edge_mut(eid);
            edge.rel = Relation {
                kind,
                table,
                columns,
            };
            edge.bidi = bidi;
        }
    }

    fn apply_storage_keys(&mut self) -> Result<()> {
        for eid in self.edge_ids() {
            let edge = self.edge(eid);
            let Some(key) = &edge.storage_key else {
                continue;
            };

            let mut rel = edge.rel.clone();

            if let Some(table) = &key.table {
                if rel.kind != RelKind::M2M {
                    return Err(Error::invalid_schema(format!(
                        "storage-key table of edge {} is only valid for M2M edges",
                        self.edge_path(eid)
                    )));
                }

                rel.table = self.prefixed(table);
            }

            if !key.columns.is_empty() {
                let expected = if rel.kind == RelKind::M2M { 2 } else { 1 };

                if key.columns.len() != expected {
                    return Err(Error::invalid_schema(format!(
                        "storage-key of edge {} must have {} column(s); found {}",
                        self.edge_path(eid),
                        expected,
                        key.columns.len()
                    )));
                }

                rel.columns = key.columns.clone();
            }

            self.set_relation(eid, rel);
        }

        Ok(())
    }

    fn bind_edge_fields(&mut self) -> Result<()> {
        for eid in self.edge_ids() {
            let edge = self.edge(eid);
            let Some(fid) = edge.field else {
                continue;
            };

            let field = self.field(fid);

            if !edge.own_fk() {
                return Err(Error::invalid_schema(format!(
                    "edge {} cannot be bound to field \"{}\": its foreign key is held by table {}",
                    self.edge_path(eid),
                    field.name.app_name,
                    edge.rel.table,
                )));
            }

            let target = self.ty(edge.target);
            let target_id = target.field(target.identity.fields()[0]);

            if target_id.ty != field.ty {
                return Err(Error::invalid_schema(format!(
                    "mismatch field type between edge field \"{}\" and id of type {} ({} != {})",
                    field.name.app_name, target.name, field.ty, target_id.ty
                )));
            }

            if edge.required && field.nillable {
                return Err(Error::invalid_schema(format!(
                    "edge {} is required but its field \"{}\" is nillable",
                    self.edge_path(eid),
                    field.name.app_name
                )));
            }

            if let Some(other) = field.edge {
                return Err(Error::invalid_schema(format!(
                    "field {} is bound to both {} and {}",
                    self.field_path(fid),
                    self.edge_path(other),
                    self.edge_path(eid)
                )));
            }

            let mut rel = edge.rel.clone();
            rel.columns = vec![field.column().to_string()];

            self.field_mut(fid).edge = Some(eid);
            self.set_relation(eid, rel);
        }

        Ok(())
    }

    fn place_foreign_keys(&mut self) {
        let mut placed = vec![];

        for edge in self.edges() {
            if edge.is_inverse() || edge.is_through_synthesized() {
                continue;
            }

            let aid = edge.id;
            let (holder, refs, holder_edge) = match edge.rel.kind {
                RelKind::M2O => (aid.ty, edge.target, Some(aid)),
                RelKind::O2M => (edge.target, aid.ty, edge.pair),
                RelKind::O2O if edge.bidi => (aid.ty, aid.ty, Some(aid)),
                RelKind::O2O => (edge.target, aid.ty, edge.pair),
                RelKind::M2M | RelKind::Unknown => continue,
            };

            let user_defined = holder_edge
                .map(|id| self.edge(id))
                .and_then(|edge: &Edge| edge.field)
                .is_some();

            let refs_ty = self.ty(refs);

            placed.push((
                holder,
                ForeignKey {
                    column: edge.rel.columns[0].clone(),
                    ty: refs_ty.field(refs_ty.identity.fields()[0]).ty.clone(),
                    refs,
                    edge: aid,
                    holder_edge,
                    user_defined,
                    unique: edge.rel.kind == RelKind::O2O,
                },
            ));
        }

        for (holder, fk) in placed {
            tracing::debug!(
                table = %self.ty(holder).table,
                column = %fk.column,
                user_defined = fk.user_defined,
                "placed foreign key"
            );
            self.ty_mut(holder).foreign_keys.push(fk);
        }
    }

    /// Sets the relation of an edge and copies it to its pair.
    pub(super) fn set_relation(&mut self, eid: EdgeId, rel: Relation) {
        let pair = self.edge(eid).pair;
        let kind = rel.kind;

        if let Some(pair) = pair {
            let pair = self.edge_mut(pair);
            pair.rel = Relation {
                kind: kind.flip(),
                ..rel.clone()
            };
        }

        self.edge_mut(eid).rel = rel;
    }

    pub(super) fn prefixed(&self, table: &str) -> String {
        format!("{}{}", self.table_name_prefix, table)
    }
}
