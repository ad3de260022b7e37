use crate::{predicate, Funcs, Mutation};

use entgraph_core::{
    driver::operation::{
        CreateSpec, DeleteSpec, EdgeOps, EdgeSpec, FieldOps, FieldSpec, IdSpec, NodeSpec,
        UpdateSpec,
    },
    schema::{
        graph::{Edge, Identity, Type},
        naming,
    },
    stmt::{Predicate, Value},
    Error, Result, Schema,
};

/// The node written by `m`. The id is left unset for batch operations.
fn node_spec(m: &Mutation, ty: &Type, with_id: bool) -> NodeSpec {
    let id = match &ty.identity {
        Identity::Single(_) => IdSpec::Single {
            column: ty.id_column().to_string(),
            value: if with_id { m.id[0].clone() } else { None },
        },
        Identity::Composite(fields) => IdSpec::Composite {
            columns: ty.id_columns(),
            values: if with_id {
                m.id.clone()
            } else {
                vec![None; fields.len()]
            },
        },
    };

    NodeSpec {
        table: ty.table.clone(),
        columns: ty.columns(),
        id,
    }
}

/// Fails unless every identity component of the target entity is known.
pub(super) fn require_id(m: &Mutation, action: &str) -> Result<()> {
    let ty = m.ty();

    for (slot, field) in m.id.iter().zip(ty.id_fields()) {
        if slot.is_none() {
            return Err(Error::configuration(format!(
                "missing id for {action} ({}.{})",
                ty.name, field.name.app_name
            )));
        }
    }

    Ok(())
}

/// `id = ?`, or one equality per component for composite identities.
fn id_predicate(m: &Mutation, ty: &Type) -> Predicate {
    Predicate::and_all(
        ty.id_columns()
            .into_iter()
            .zip(&m.id)
            .map(|(column, value)| Predicate::eq(column, value.clone().unwrap_or_default())),
    )
}

pub(super) fn create_spec(m: &Mutation) -> Result<CreateSpec> {
    let client = m.client();
    let schema = client.schema();
    let ty = m.ty();

    let mut fields = vec![];

    for field in &ty.fields {
        // Edge fields are written by their edge.
        if field.is_edge_field() {
            continue;
        }

        if let Some(value) = m.field(&field.name.app_name) {
            fields.push(FieldSpec::new(field.column(), field.ty.clone(), value));
        }
    }

    let mut edges = vec![];

    for edge in &ty.edges {
        let Some(state) = m.edges.get(&edge.id.index) else {
            continue;
        };

        let step = schema.step(edge.id);
        for id in &state.added {
            let mut spec = EdgeSpec::new(step, Some(id.clone()));
            spec.fields = through_defaults(client.funcs(), schema, edge)?;
            edges.push(spec);
        }
    }

    Ok(CreateSpec {
        node: node_spec(m, ty, true),
        fields,
        edges,
    })
}

/// Assembles an update. `with_id` selects update-one.
pub(super) fn update_spec(m: &Mutation, with_id: bool) -> Result<UpdateSpec> {
    let client = m.client();
    let schema = client.schema();
    let ty = m.ty();

    let mut fields = FieldOps::default();

    for field in &ty.fields {
        if field.immutable || field.primary_key || field.is_edge_field() {
            continue;
        }

        let index = field.id.index;
        let spec = |value: &Value| FieldSpec::new(field.column(), field.ty.clone(), value.clone());

        if let Some(state) = m.fields.get(&index) {
            if let Some(value) = &state.set {
                fields.set.push(spec(value));
            }

            if let Some(delta) = &state.add {
                fields.add.push(spec(delta));
            }

            if let Some(elements) = &state.append {
                fields.append.push(spec(elements));
            }
        }

        if m.cleared_fields.contains(&index) {
            fields.clear.push(spec(&Value::Null));
        }
    }

    let mut edges = EdgeOps::default();

    for edge in &ty.edges {
        let Some(state) = m.edges.get(&edge.id.index) else {
            continue;
        };

        let step = schema.step(edge.id);

        if state.cleared {
            edges.clear.push(EdgeSpec::new(step, None));
        } else {
            for id in &state.removed {
                edges.clear.push(EdgeSpec::new(step, Some(id.clone())));
            }
        }

        for id in &state.added {
            let mut spec = EdgeSpec::new(step, Some(id.clone()));
            spec.fields = through_defaults(client.funcs(), schema, edge)?;
            edges.add.push(spec);
        }
    }

    let mut predicate = predicate::lower_all(&m.predicates, schema, ty.id)?;
    if with_id {
        predicate = Predicate::and_all([id_predicate(m, ty), predicate]);
    }

    Ok(UpdateSpec {
        node: node_spec(m, ty, with_id),
        predicate,
        fields,
        edges,
    })
}

/// Assembles a delete. `with_id` selects delete-one.
pub(super) fn delete_spec(m: &Mutation, with_id: bool) -> Result<DeleteSpec> {
    let schema = m.client().schema();
    let ty = m.ty();

    let mut predicate = predicate::lower_all(&m.predicates, schema, ty.id)?;
    if with_id {
        predicate = Predicate::and_all([id_predicate(m, ty), predicate]);
    }

    Ok(DeleteSpec {
        table: ty.table.clone(),
        predicate,
    })
}

/// Default values of the through type's own fields, so that join rows
/// written over an M2M edge are complete.
fn through_defaults(funcs: &Funcs, schema: &Schema, edge: &Edge) -> Result<Vec<FieldSpec>> {
    let through = match (&edge.through, edge.pair) {
        (Some(through), _) => through.ty,
        (None, Some(pair)) => match &schema.graph.edge(pair).through {
            Some(through) => through.ty,
            None => return Ok(vec![]),
        },
        (None, None) => return Ok(vec![]),
    };

    let through = schema.ty(through);
    let label = through.label();

    through
        .fields
        .iter()
        .filter(|field| field.default && !field.primary_key && !field.is_edge_field())
        .map(|field| {
            let value = funcs.call_default(&naming::default_symbol(&label, &field.name.app_name))?;
            Ok(FieldSpec::new(field.column(), field.ty.clone(), value))
        })
        .collect()
}
