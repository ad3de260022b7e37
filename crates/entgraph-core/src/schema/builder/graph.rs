use super::Builder;
use crate::{
    schema::{
        decl::{FieldDecl, SchemaDecl, TypeDecl},
        graph::{Edge, Field, FieldName, Graph, Identity, Relation, Through, Type, TypeId},
        naming, Name,
    },
    stmt::FieldType,
    Error, Result,
};

use indexmap::IndexMap;

impl Builder {
    pub(super) fn build_graph(&self, decl: &SchemaDecl) -> Result<Graph> {
        let mut lookup = IndexMap::new();

        for (index, ty) in decl.types.iter().enumerate() {
            if lookup.insert(ty.name.clone(), TypeId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "type {} is declared more than once",
                    ty.name
                )));
            }
        }

        let mut graph = Graph {
            types: IndexMap::new(),
            table_name_prefix: self.table_name_prefix.clone().unwrap_or_default(),
        };

        for (index, ty) in decl.types.iter().enumerate() {
            let ty = self.build_type(TypeId(index), ty, &lookup)?;
            graph.types.insert(ty.id, ty);
        }

        Ok(graph)
    }

    fn build_type(
        &self,
        id: TypeId,
        decl: &TypeDecl,
        lookup: &IndexMap<String, TypeId>,
    ) -> Result<Type> {
        let name = Name::new(&decl.name);
        let table = self.prefix_table_name(
            &decl
                .table
                .clone()
                .unwrap_or_else(|| naming::table(&decl.name)),
        );

        let mut fields: Vec<Field> = vec![];

        let identity = if decl.composite_id.is_empty() {
            let id_decl = decl
                .id
                .clone()
                .unwrap_or_else(|| FieldDecl::new("id", FieldType::Int));

            let mut field = build_field(id.field(0), &id_decl);
            field.primary_key = true;
            field.immutable = true;
            fields.push(field);

            Identity::Single(id.field(0))
        } else if decl.id.is_some() {
            return Err(Error::invalid_schema(format!(
                "type {} declares both an id field and a composite id",
                decl.name
            )));
        } else {
            Identity::Composite(vec![])
        };

        for field_decl in &decl.fields {
            if fields
                .iter()
                .any(|field| field.name.app_name == field_decl.name)
            {
                return Err(Error::invalid_schema(format!(
                    "field {}.{} is declared more than once",
                    decl.name, field_decl.name
                )));
            }

            if field_decl.ty.is_enum() && field_decl.enum_values.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "enum field {}.{} has no values",
                    decl.name, field_decl.name
                )));
            }

            fields.push(build_field(id.field(fields.len()), field_decl));
        }

        let identity = match identity {
            Identity::Composite(_) => {
                let mut ids = vec![];

                for column in &decl.composite_id {
                    let Some(field) = fields
                        .iter_mut()
                        .find(|field| &field.name.app_name == column)
                    else {
                        return Err(Error::invalid_schema(format!(
                            "composite id of {} names unknown field \"{}\"",
                            decl.name, column
                        )));
                    };

                    field.primary_key = true;
                    ids.push(field.id);
                }

                Identity::Composite(ids)
            }
            identity => identity,
        };

        let mut edges: Vec<Edge> = vec![];

        for edge_decl in &decl.edges {
            let edge_path = format!("{}.{}", decl.name, edge_decl.name);

            if edges.iter().any(|edge| edge.name == edge_decl.name) {
                return Err(Error::invalid_schema(format!(
                    "edge {edge_path} is declared more than once"
                )));
            }

            let target = resolve_type(lookup, &edge_decl.target, &edge_path)?;

            let field = match &edge_decl.field {
                Some(field_name) => match fields
                    .iter()
                    .find(|field| &field.name.app_name == field_name)
                {
                    Some(field) => Some(field.id),
                    None => {
                        return Err(Error::invalid_schema(format!(
                            "edge {edge_path} is bound to unknown field \"{field_name}\""
                        )))
                    }
                },
                None => None,
            };

            let through = match &edge_decl.through {
                Some(through) => Some(Through {
                    name: through.name.clone(),
                    ty: resolve_type(lookup, &through.type_name, &edge_path)?,
                    edge: None,
                }),
                None => None,
            };

            edges.push(Edge {
                id: id.edge(edges.len()),
                name: edge_decl.name.clone(),
                target,
                unique: edge_decl.unique,
                required: edge_decl.required,
                immutable: edge_decl.immutable,
                inverse_of: edge_decl.inverse_of.clone(),
                through,
                through_of: None,
                rel: Relation::default(),
                pair: None,
                bidi: false,
                field,
                storage_key: edge_decl.storage_key.clone(),
            });
        }

        Ok(Type {
            id,
            decl_name: decl.name.clone(),
            name,
            table,
            identity,
            fields,
            edges,
            foreign_keys: vec![],
            hooks: 0,
            interceptors: 0,
            policies: 0,
            methods: IndexMap::new(),
        })
    }
}

fn resolve_type(lookup: &IndexMap<String, TypeId>, name: &str, edge_path: &str) -> Result<TypeId> {
    lookup.get(name).copied().ok_or_else(|| {
        Error::invalid_schema(format!(
            "edge {edge_path} references type \"{name}\" which is not registered"
        ))
    })
}

fn build_field(id: crate::schema::graph::FieldId, decl: &FieldDecl) -> Field {
    Field {
        id,
        name: FieldName {
            app_name: decl.name.clone(),
            storage_name: decl.storage_key.clone(),
        },
        ty: decl.ty.clone(),
        nillable: decl.nillable,
        optional: decl.optional,
        immutable: decl.immutable,
        unique: decl.unique,
        primary_key: false,
        default: decl.default,
        update_default: decl.update_default,
        validators: decl.validators,
        enum_values: decl.enum_values.clone(),
        edge: None,
    }
}
