use super::{util, Expand};
use entgraph_core::schema::graph::{Edge, RelKind};
use entgraph_core::schema::naming;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_constants(&self) -> syn::Result<TokenStream> {
        let type_name = self.ty.name.upper_camel_case();
        let label = &self.names.label;
        let table = &self.names.table;
        let fields = self.expand_field_constants();
        let edges = self
            .ty
            .edges
            .iter()
            .map(|edge| self.expand_edge_constants(edge))
            .collect::<syn::Result<Vec<_>>>()?;
        let funcs = self.expand_func_symbols();

        let columns = self.ty.columns();
        let columns = util::strs(columns.iter().map(String::as_str));
        let foreign_keys = util::strs(
            self.ty
                .foreign_keys
                .iter()
                .filter(|fk| !fk.user_defined)
                .map(|fk| &fk.column[..]),
        );

        Ok(quote! {
            /// The type name, as accepted by the client.
            pub const TYPE: &str = #type_name;

            pub const LABEL: &str = #label;

            pub const TABLE: &str = #table;

            #fields
            #( #edges )*

            /// Columns read when an entity is loaded.
            pub const COLUMNS: &[&str] = #columns;

            /// Foreign-key columns that are not declared fields.
            pub const FOREIGN_KEYS: &[&str] = #foreign_keys;

            #funcs
        })
    }

    fn expand_field_constants(&self) -> TokenStream {
        self.ty
            .fields
            .iter()
            .map(|field| {
                let constant = self.field_constant(field);
                let column = field.column();
                let values = (!field.enum_values.is_empty()).then(|| {
                    let ident = util::ident(&format!(
                        "{}_VALUES",
                        std_util::str::upper_snake_case(&field.name.app_name)
                    ));
                    let values = util::strs(field.enum_values.iter().map(String::as_str));

                    quote!(pub const #ident: &[&str] = #values;)
                });

                quote! {
                    pub const #constant: &str = #column;
                    #values
                }
            })
            .collect()
    }

    fn expand_edge_constants(&self, edge: &Edge) -> syn::Result<TokenStream> {
        let names = naming::edge_names(edge);
        let target = self.schema.ty(edge.target);
        let step = self.schema.step(edge.id);

        let constant = self.edge_constant(edge);
        let name = &edge.name;
        let table_constant = util::ident(&names.table_constant);
        let table = &edge.rel.table;

        let inverse_table = (target.table != self.ty.table).then(|| {
            let ident = util::ident(&names.inverse_table_constant);
            let target_table = &target.table;
            quote!(pub const #ident: &str = #target_table;)
        });

        let columns = if edge.rel.kind == RelKind::M2M {
            let ident = util::ident(&names.primary_key_constant);
            let columns = &edge.rel.columns;
            quote!(pub const #ident: [&str; 2] = [ #( #columns ),* ];)
        } else {
            let ident = util::ident(&names.column_constant);
            let column = edge.column().unwrap_or_default();
            quote!(pub const #ident: &str = #column;)
        };

        let target_id = util::ident(&format!(
            "{}_TARGET_ID",
            std_util::str::upper_snake_case(&edge.name)
        ));
        let target_id_symbol = util::symbol(&step.to_id_symbol)?;

        Ok(quote! {
            pub const #constant: &str = #name;
            pub const #table_constant: &str = #table;
            #inverse_table
            #columns
            pub const #target_id: &str = #target_id_symbol;
        })
    }

    /// Symbols under which default, update-default and validator functions
    /// are registered on the client.
    fn expand_func_symbols(&self) -> TokenStream {
        let label = &self.names.label;

        self.ty
            .fields
            .iter()
            .map(|field| {
                let upper = std_util::str::upper_snake_case(&field.name.app_name);
                let mut out = TokenStream::new();

                if field.default {
                    let ident = util::ident(&format!("DEFAULT_{upper}"));
                    let symbol = naming::default_symbol(label, &field.name.app_name);
                    out.extend(quote!(pub const #ident: &str = #symbol;));
                }

                if field.update_default {
                    let ident = util::ident(&format!("UPDATE_DEFAULT_{upper}"));
                    let symbol = naming::update_default_symbol(label, &field.name.app_name);
                    out.extend(quote!(pub const #ident: &str = #symbol;));
                }

                if field.validators > 0 {
                    let ident = util::ident(&format!("{upper}_VALIDATOR"));
                    let symbol = naming::validator_symbol(label, &field.name.app_name);
                    out.extend(quote!(pub const #ident: &str = #symbol;));
                }

                out
            })
            .collect()
    }
}
