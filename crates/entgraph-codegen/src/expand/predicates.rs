use super::{util, Expand};
use entgraph_core::stmt::FieldType;
use std_util::str;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

impl Expand<'_> {
    pub(super) fn expand_predicates(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let mut out = TokenStream::new();

        for field in &self.ty.fields {
            let constant = self.field_constant(field);
            let n = str::snake_case(&field.name.app_name);

            let eq = format_ident!("{n}_eq");
            let ne = format_ident!("{n}_ne");
            let in_ = format_ident!("{n}_in");
            let not_in = format_ident!("{n}_not_in");

            out.extend(quote! {
                pub fn #eq(value: impl Into<#entgraph::Value>) -> #entgraph::Where {
                    #entgraph::predicate::field_eq(#constant, value)
                }

                pub fn #ne(value: impl Into<#entgraph::Value>) -> #entgraph::Where {
                    #entgraph::predicate::field_ne(#constant, value)
                }

                pub fn #in_<V: Into<#entgraph::Value>>(values: impl IntoIterator<Item = V>) -> #entgraph::Where {
                    #entgraph::predicate::field_in(#constant, values)
                }

                pub fn #not_in<V: Into<#entgraph::Value>>(values: impl IntoIterator<Item = V>) -> #entgraph::Where {
                    #entgraph::predicate::field_not_in(#constant, values)
                }
            });

            if is_ordered(&field.ty) {
                let cmp = [
                    ("gt", quote!(field_gt)),
                    ("ge", quote!(field_ge)),
                    ("lt", quote!(field_lt)),
                    ("le", quote!(field_le)),
                ];

                for (suffix, f) in cmp {
                    let ident = format_ident!("{n}_{suffix}");
                    out.extend(quote! {
                        pub fn #ident(value: impl Into<#entgraph::Value>) -> #entgraph::Where {
                            #entgraph::predicate::#f(#constant, value)
                        }
                    });
                }
            }

            if field.nillable {
                let is_nil = format_ident!("{n}_is_nil");
                let not_nil = format_ident!("{n}_not_nil");

                out.extend(quote! {
                    pub fn #is_nil() -> #entgraph::Where {
                        #entgraph::predicate::field_is_null(#constant)
                    }

                    pub fn #not_nil() -> #entgraph::Where {
                        #entgraph::predicate::field_not_null(#constant)
                    }
                });
            }
        }

        for edge in &self.ty.edges {
            let constant = self.edge_constant(edge);
            let n = str::snake_case(&edge.name);
            let has = format_ident!("has_{n}");
            let has_with = format_ident!("has_{n}_with");

            out.extend(quote! {
                pub fn #has() -> #entgraph::Where {
                    #entgraph::predicate::has_edge(#constant)
                }

                pub fn #has_with(pred: #entgraph::Where) -> #entgraph::Where {
                    #entgraph::predicate::has_edge_with(#constant, pred)
                }
            });
        }

        out
    }

    pub(super) fn expand_orderings(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let mut out = TokenStream::new();

        for field in self.ty.fields.iter().filter(|field| is_ordered(&field.ty) || field.ty.is_enum()) {
            let constant = self.field_constant(field);
            let by = util::ident(&format!("by_{}", str::snake_case(&field.name.app_name)));

            out.extend(quote! {
                pub fn #by(dir: #entgraph::Direction) -> #entgraph::Order {
                    #entgraph::Order::Field {
                        name: #constant.to_string(),
                        dir,
                    }
                }
            });
        }

        for edge in &self.ty.edges {
            let constant = self.edge_constant(edge);
            let n = str::snake_case(&edge.name);

            if edge.unique {
                let by = format_ident!("by_{n}_field");
                out.extend(quote! {
                    pub fn #by(field: &str, dir: #entgraph::Direction) -> #entgraph::Order {
                        #entgraph::Order::neighbor_field(#constant, field, dir)
                    }
                });
            } else {
                let by = format_ident!("by_{n}_count");
                out.extend(quote! {
                    pub fn #by(dir: #entgraph::Direction) -> #entgraph::Order {
                        #entgraph::Order::neighbor_count(#constant, dir)
                    }
                });
            }
        }

        out
    }
}

/// Field types with a meaningful `<` ordering.
fn is_ordered(ty: &FieldType) -> bool {
    matches!(
        ty,
        FieldType::String | FieldType::Int | FieldType::Float | FieldType::Time | FieldType::Uuid
    )
}
