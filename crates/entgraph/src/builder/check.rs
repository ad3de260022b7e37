use crate::{func, mutation, Mutation};

use entgraph_core::{
    schema::{
        graph::{Field, Type},
        naming,
    },
    stmt::Value,
    Error, Result,
};

/// Fills fields that have a create default and were neither set nor
/// cleared.
pub(super) fn create_defaults(m: &mut Mutation) -> Result<()> {
    let client = m.client().clone();
    let ty = client.schema().ty(m.type_id());
    let label = ty.label();

    for field in &ty.fields {
        let name = &field.name.app_name;

        if !field.default || m.field(name).is_some() || m.field_cleared(name) {
            continue;
        }

        let value = client
            .funcs()
            .call_default(&naming::default_symbol(&label, name))?;
        m.set_field(name, value)?;
    }

    Ok(())
}

/// Fills fields that have an update default and were neither set nor
/// cleared.
pub(super) fn update_defaults(m: &mut Mutation) -> Result<()> {
    let client = m.client().clone();
    let ty = client.schema().ty(m.type_id());
    let label = ty.label();

    for field in &ty.fields {
        let name = &field.name.app_name;

        if !field.update_default
            || field.immutable
            || m.field(name).is_some()
            || m.field_cleared(name)
        {
            continue;
        }

        let value = client
            .funcs()
            .call_default(&naming::update_default_symbol(&label, name))?;
        m.set_field(name, value)?;
    }

    Ok(())
}

/// Pre-save checks of a create: required fields and edges, and every set
/// value.
pub(super) fn check_create(m: &Mutation) -> Result<()> {
    let ty = m.ty();

    for field in &ty.fields {
        let name = &field.name.app_name;

        match m.field(name) {
            Some(value) => check_value(m, ty, field, &value)?,
            None if field.is_required() || (field.primary_key && ty.has_composite_id()) => {
                return Err(Error::validation(
                    name.as_str(),
                    format!("missing required field \"{}.{name}\"", ty.name),
                ));
            }
            None => {}
        }
    }

    for edge in &ty.edges {
        if edge.unique && edge.required && m.edge_id(&edge.name).is_none() {
            return Err(Error::validation(
                edge.name.as_str(),
                format!("missing required edge \"{}.{}\"", ty.name, edge.name),
            ));
        }
    }

    Ok(())
}

/// Pre-save checks of an update: every set value and delta, and required
/// unique edges cleared without a replacement.
pub(super) fn check_update(m: &Mutation) -> Result<()> {
    let ty = m.ty();

    for field in &ty.fields {
        let Some(state) = m.fields.get(&field.id.index) else {
            continue;
        };

        if let Some(value) = &state.set {
            check_value(m, ty, field, value)?;
        }

        if let Some(delta) = &state.add {
            mutation::check_delta(ty, field, delta)?;
        }

        if let Some(elements) = &state.append {
            mutation::check_elements(ty, field, elements)?;
        }
    }

    for edge in &ty.edges {
        if edge.unique
            && edge.required
            && m.edge_cleared(&edge.name)
            && m.edge_id(&edge.name).is_none()
        {
            return Err(Error::validation(
                edge.name.as_str(),
                format!(
                    "clearing a required unique edge \"{}.{}\"",
                    ty.name, edge.name
                ),
            ));
        }
    }

    Ok(())
}

fn check_value(m: &Mutation, ty: &Type, field: &Field, value: &Value) -> Result<()> {
    let name = &field.name.app_name;
    let path = format!("{}.{name}", ty.name);

    if value.is_null() {
        if !field.nillable {
            return Err(Error::validation(
                name.as_str(),
                format!("field \"{path}\" is not nillable"),
            ));
        }
        return Ok(());
    }

    if !field.ty.accepts(value) {
        return Err(Error::validation(
            name.as_str(),
            format!("invalid value for field \"{path}\": expected {}, got {value}", field.ty),
        ));
    }

    if field.ty.is_enum() {
        let valid = value
            .as_str()
            .is_some_and(|v| field.enum_values.iter().any(|allowed| allowed == v));

        if !valid {
            return Err(Error::validation(
                name.as_str(),
                format!("invalid enum value for field \"{path}\": {value}"),
            ));
        }
    }

    if field.validators > 0 {
        let funcs = m.client().funcs();
        let symbol = naming::validator_symbol(&ty.label(), name);

        if !funcs.has_validator(&symbol) {
            return Err(func::uninitialized(&symbol));
        }

        funcs.validate(&symbol, value).map_err(|cause| {
            cause.context(Error::validation(
                name.as_str(),
                format!("validator failed for field \"{path}\""),
            ))
        })?;
    }

    Ok(())
}
