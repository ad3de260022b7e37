use super::Mutation;

use entgraph_core::{
    schema::graph::{Edge, Type},
    stmt::Value,
    Error, Result,
};

impl Mutation {
    /// Sets the neighbor of a unique edge. A pending clear is kept, so the
    /// current neighbor is unlinked before the new one is linked.
    pub fn set_edge_id(&mut self, name: &str, id: impl Into<Value>) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let edge = self.writable_edge(ty, name)?;

        if !edge.unique {
            return Err(Error::usage(format!(
                "edge {}.{name} is not unique; use add_edge_ids",
                ty.name
            )));
        }

        let id = id.into();
        tracing::trace!(ty = %ty.name, edge = name, %id, "set edge id");

        self.edges.entry(edge.id.index).or_default().set(id.clone());

        if let Some(field) = edge.field {
            self.cleared_fields.shift_remove(&field.index);

            // Identity fields bound to the edge take the neighbor id.
            if let Some(pos) = super::id_position(ty, ty.field(field)) {
                if self.op.is_create() {
                    self.id[pos] = Some(id);
                }
            }
        }

        Ok(())
    }

    /// The neighbor set on a unique edge, if any.
    pub fn edge_id(&self, name: &str) -> Option<Value> {
        let edge = self.ty().edge_by_name(name)?;
        self.edges.get(&edge.id.index)?.added.first().cloned()
    }

    /// Links neighbors over a non-unique edge.
    pub fn add_edge_ids<V: Into<Value>>(
        &mut self,
        name: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let edge = self.writable_edge(ty, name)?;
        check_non_unique(ty, edge)?;

        let state = self.edges.entry(edge.id.index).or_default();
        for id in ids {
            let id = id.into();
            tracing::trace!(ty = %ty.name, edge = name, %id, "add edge id");
            state.add(id);
        }

        Ok(())
    }

    /// Unlinks neighbors over a non-unique edge.
    pub fn remove_edge_ids<V: Into<Value>>(
        &mut self,
        name: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let edge = self.writable_edge(ty, name)?;
        check_non_unique(ty, edge)?;

        let state = self.edges.entry(edge.id.index).or_default();
        for id in ids {
            let id = id.into();
            tracing::trace!(ty = %ty.name, edge = name, %id, "remove edge id");
            state.remove(id);
        }

        Ok(())
    }

    /// Names of the edges with neighbors to link.
    pub fn added_edges(&self) -> Vec<String> {
        self.edge_names(|state| !state.added.is_empty())
    }

    pub fn added_ids(&self, name: &str) -> Vec<Value> {
        self.edge_state(name)
            .map(|state| state.added.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of the edges with neighbors to unlink.
    pub fn removed_edges(&self) -> Vec<String> {
        self.edge_names(|state| !state.removed.is_empty())
    }

    pub fn removed_ids(&self, name: &str) -> Vec<Value> {
        self.edge_state(name)
            .map(|state| state.removed.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of the cleared edges.
    pub fn cleared_edges(&self) -> Vec<String> {
        self.edge_names(|state| state.cleared)
    }

    pub fn edge_cleared(&self, name: &str) -> bool {
        self.edge_state(name).is_some_and(|state| state.cleared)
    }

    /// Marks every current neighbor for removal. Neighbors added by this
    /// mutation are kept and linked after the clear.
    pub fn clear_edge(&mut self, name: &str) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let edge = self.writable_edge(ty, name)?;

        tracing::trace!(ty = %ty.name, edge = name, "clear edge");

        self.edges.entry(edge.id.index).or_default().cleared = true;

        if let Some(field) = edge.field {
            self.cleared_fields.insert(field.index);
        }

        Ok(())
    }

    /// Drops every pending change of the named edge.
    pub fn reset_edge(&mut self, name: &str) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let edge = edge_by_name(ty, name)?;

        self.edges.shift_remove(&edge.id.index);

        if let Some(field) = edge.field {
            self.cleared_fields.shift_remove(&field.index);
        }

        Ok(())
    }

    fn writable_edge<'a>(&self, ty: &'a Type, name: &str) -> Result<&'a Edge> {
        let edge = edge_by_name(ty, name)?;

        if self.op.is_delete() {
            return Err(Error::usage(format!(
                "cannot change edge {}.{name} in a {} mutation",
                ty.name, self.op
            )));
        }

        if edge.immutable && self.op.is_update() {
            return Err(Error::usage(format!(
                "edge {}.{name} is immutable",
                ty.name
            )));
        }

        // Rows of a composite-identity through type are written through the
        // M2M edge that declares it.
        if edge.is_through_synthesized() && self.client.ty(edge.target).has_composite_id() {
            return Err(Error::usage(format!(
                "edge {}.{name} is read-only; {} has a composite identity",
                ty.name,
                self.client.ty(edge.target).name
            )));
        }

        Ok(edge)
    }

    fn edge_state(&self, name: &str) -> Option<&super::EdgeState> {
        let edge = self.ty().edge_by_name(name)?;
        self.edges.get(&edge.id.index)
    }

    fn edge_names(&self, f: impl Fn(&super::EdgeState) -> bool) -> Vec<String> {
        self.ty()
            .edges
            .iter()
            .filter(|edge| self.edges.get(&edge.id.index).is_some_and(&f))
            .map(|edge| edge.name.clone())
            .collect()
    }
}

fn edge_by_name<'a>(ty: &'a Type, name: &str) -> Result<&'a Edge> {
    ty.edge_by_name(name)
        .ok_or_else(|| Error::usage(format!("unknown edge \"{name}\" on type {}", ty.name)))
}

fn check_non_unique(ty: &Type, edge: &Edge) -> Result<()> {
    if edge.unique {
        return Err(Error::usage(format!(
            "edge {}.{} is unique; use set_edge_id",
            ty.name, edge.name
        )));
    }

    Ok(())
}
