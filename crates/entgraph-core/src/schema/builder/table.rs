use crate::schema::{
    db::{Column, ForeignKey, OnDelete, Table, TableId},
    graph::{Graph, RelKind},
};

pub(super) fn build_tables(graph: &Graph) -> Vec<Table> {
    let mut tables = vec![];

    for ty in graph.types() {
        let mut table = Table::new(TableId(tables.len()), ty.table.clone());
        table.ty = Some(ty.id);

        for field in &ty.fields {
            table.push_column(Column {
                nullable: field.nillable,
                unique: field.unique,
                primary_key: field.primary_key,
                ..Column::new(field.column(), field.ty.clone())
            });
        }

        for fk in &ty.foreign_keys {
            // Declared edge fields are already columns.
            if !fk.user_defined {
                table.push_column(Column {
                    nullable: true,
                    unique: fk.unique,
                    ..Column::new(&fk.column, fk.ty.clone())
                });
            }

            let refs = graph.ty(fk.refs);
            let nullable = table
                .column_by_name(&fk.column)
                .map(|column| column.nullable)
                .unwrap_or(true);

            table.foreign_keys.push(ForeignKey {
                symbol: format!("{}_{}_{}", ty.table, refs.table, graph.edge(fk.edge).name),
                columns: vec![fk.column.clone()],
                ref_table: refs.table.clone(),
                ref_columns: vec![refs.id_column().to_string()],
                on_delete: if nullable {
                    OnDelete::SetNull
                } else {
                    OnDelete::NoAction
                },
            });
        }

        tables.push(table);
    }

    for edge in graph.edges() {
        if edge.rel.kind != RelKind::M2M || edge.is_inverse() || edge.is_through_synthesized() {
            continue;
        }

        let through = edge.through.is_some()
            || edge
                .pair
                .map(|pair| graph.edge(pair).through.is_some())
                .unwrap_or(false);

        if through {
            continue;
        }

        let owner = graph.ty(edge.id.ty);
        let target = graph.ty(edge.target);

        let mut table = Table::new(TableId(tables.len()), edge.rel.table.clone());
        table.join = true;

        for (column, refs) in edge.rel.columns.iter().zip([owner, target]) {
            table.push_column(Column {
                primary_key: true,
                ..Column::new(column, refs.field(refs.identity.fields()[0]).ty.clone())
            });

            table.foreign_keys.push(ForeignKey {
                symbol: format!("{}_{}", edge.rel.table, column),
                columns: vec![column.clone()],
                ref_table: refs.table.clone(),
                ref_columns: vec![refs.id_column().to_string()],
                on_delete: OnDelete::Cascade,
            });
        }

        tables.push(table);
    }

    tables
}
