use super::{EdgeId, FieldId, Graph, Type, TypeId};

use indexmap::IndexMap;
use std_util::str;

/// A typed accessor of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub kind: MethodKind,
    pub member: Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    // Fields
    SetField,
    Field,
    OldField,
    ResetField,
    AddField,
    AddedField,
    AppendField,
    AppendedField,
    ClearField,
    FieldCleared,

    // Unique edges
    SetEdgeId,
    EdgeId,

    // Non-unique edges
    AddEdgeIds,
    RemoveEdgeIds,
    RemovedEdgeIds,

    // Both
    EdgeIds,
    ClearEdge,
    EdgeCleared,
    ResetEdge,
}

impl MethodKind {
    pub fn is_setter(self) -> bool {
        use MethodKind::*;

        matches!(
            self,
            SetField
                | ResetField
                | AddField
                | AppendField
                | ClearField
                | SetEdgeId
                | AddEdgeIds
                | RemoveEdgeIds
                | ClearEdge
                | ResetEdge
        )
    }
}

struct Methods {
    methods: IndexMap<String, Method>,
}

impl Methods {
    fn push(&mut self, name: String, kind: MethodKind, member: Member) {
        if self.methods.contains_key(&name) {
            tracing::trace!(method = %name, ?member, "skipping duplicate method name");
            return;
        }

        self.methods.insert(name.clone(), Method { name, kind, member });
    }
}

impl Graph {
    /// Derives the accessor set of every type. Fields come first, so a
    /// declared edge field keeps its field accessors and the edge accessors
    /// with the same name are dropped.
    pub(crate) fn build_methods(&mut self) {
        let ids: Vec<TypeId> = self.types.keys().copied().collect();

        for id in ids {
            let methods = methods_for(self.ty(id));
            self.ty_mut(id).methods = methods;
        }
    }
}

fn methods_for(ty: &Type) -> IndexMap<String, Method> {
    use MethodKind::*;

    let mut methods = Methods {
        methods: IndexMap::new(),
    };

    for field in &ty.fields {
        let n = str::snake_case(&field.name.app_name);
        let member = Member::Field(field.id);

        methods.push(format!("set_{n}"), SetField, member);
        methods.push(n.clone(), Field, member);

        // The single identity is never updated, so it has no old value.
        if field.primary_key && !ty.has_composite_id() {
            continue;
        }

        methods.push(format!("old_{n}"), OldField, member);
        methods.push(format!("reset_{n}"), ResetField, member);

        if field.ty.is_numeric() {
            methods.push(format!("add_{n}"), AddField, member);
            methods.push(format!("added_{n}"), AddedField, member);
        }

        if field.ty.is_json() {
            methods.push(format!("append_{n}"), AppendField, member);
            methods.push(format!("appended_{n}"), AppendedField, member);
        }

        if field.nillable {
            methods.push(format!("clear_{n}"), ClearField, member);
            methods.push(format!("{n}_cleared"), FieldCleared, member);
        }
    }

    for edge in &ty.edges {
        let n = str::snake_case(&edge.name);
        let member = Member::Edge(edge.id);

        if edge.unique {
            methods.push(format!("set_{n}_id"), SetEdgeId, member);
            methods.push(format!("{n}_id"), EdgeId, member);
        } else {
            let s = str::singularize(&n);
            methods.push(format!("add_{s}_ids"), AddEdgeIds, member);
            methods.push(format!("remove_{s}_ids"), RemoveEdgeIds, member);
            methods.push(format!("removed_{n}_ids"), RemovedEdgeIds, member);
        }

        methods.push(format!("{n}_ids"), EdgeIds, member);
        methods.push(format!("clear_{n}"), ClearEdge, member);
        methods.push(format!("{n}_cleared"), EdgeCleared, member);
        methods.push(format!("reset_{n}"), ResetEdge, member);
    }

    methods.methods
}
