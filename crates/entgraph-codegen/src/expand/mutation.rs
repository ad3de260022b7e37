use super::{util, Expand};
use entgraph_core::schema::graph::{Member, Method, MethodKind};

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    /// A typed view over a `Mutation`, one accessor per derived method.
    pub(super) fn expand_mutation(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let module = &self.module;
        let ident = self.type_ident(&self.names.mutation);
        let methods = self.ty.methods.values().map(|method| self.expand_mutation_method(method));
        let doc = format!(" Typed accessors of a `{}` mutation.", self.ty.name);

        quote! {
            #[doc = #doc]
            #[derive(Debug)]
            pub struct #ident<'a> {
                inner: &'a mut #entgraph::Mutation,
            }

            impl<'a> #ident<'a> {
                /// Returns `None` if `mutation` belongs to another type.
                pub fn from_mutation(mutation: &'a mut #entgraph::Mutation) -> Option<#ident<'a>> {
                    if mutation.type_name() == #module::TYPE {
                        Some(#ident { inner: mutation })
                    } else {
                        None
                    }
                }

                #( #methods )*
            }
        }
    }

    fn expand_mutation_method(&self, method: &Method) -> TokenStream {
        use MethodKind::*;

        let entgraph = &self.entgraph;
        let name = util::ident(&method.name);
        let member = self.member_constant(method.member);

        match method.kind {
            SetField => quote! {
                pub fn #name(&mut self, value: impl Into<#entgraph::Value>) -> #entgraph::Result<()> {
                    self.inner.set_field(#member, value)
                }
            },
            Field => quote! {
                pub fn #name(&self) -> Option<#entgraph::Value> {
                    self.inner.field(#member)
                }
            },
            OldField => quote! {
                pub async fn #name(&self, cx: &#entgraph::Context) -> #entgraph::Result<#entgraph::Value> {
                    self.inner.old_field(cx, #member).await
                }
            },
            ResetField => quote! {
                pub fn #name(&mut self) -> #entgraph::Result<()> {
                    self.inner.reset_field(#member)
                }
            },
            AddField => quote! {
                pub fn #name(&mut self, delta: impl Into<#entgraph::Value>) -> #entgraph::Result<()> {
                    self.inner.add_field(#member, delta)
                }
            },
            AddedField => quote! {
                pub fn #name(&self) -> Option<#entgraph::Value> {
                    self.inner.added_field(#member)
                }
            },
            AppendField => quote! {
                pub fn #name(&mut self, elements: impl Into<#entgraph::Value>) -> #entgraph::Result<()> {
                    self.inner.append_field(#member, elements)
                }
            },
            AppendedField => quote! {
                pub fn #name(&self) -> Option<#entgraph::Value> {
                    self.inner.appended_field(#member)
                }
            },
            ClearField => quote! {
                pub fn #name(&mut self) -> #entgraph::Result<()> {
                    self.inner.clear_field(#member)
                }
            },
            FieldCleared => quote! {
                pub fn #name(&self) -> bool {
                    self.inner.field_cleared(#member)
                }
            },
            SetEdgeId => quote! {
                pub fn #name(&mut self, id: impl Into<#entgraph::Value>) -> #entgraph::Result<()> {
                    self.inner.set_edge_id(#member, id)
                }
            },
            EdgeId => quote! {
                pub fn #name(&self) -> Option<#entgraph::Value> {
                    self.inner.edge_id(#member)
                }
            },
            AddEdgeIds => quote! {
                pub fn #name<V: Into<#entgraph::Value>>(&mut self, ids: impl IntoIterator<Item = V>) -> #entgraph::Result<()> {
                    self.inner.add_edge_ids(#member, ids)
                }
            },
            RemoveEdgeIds => quote! {
                pub fn #name<V: Into<#entgraph::Value>>(&mut self, ids: impl IntoIterator<Item = V>) -> #entgraph::Result<()> {
                    self.inner.remove_edge_ids(#member, ids)
                }
            },
            RemovedEdgeIds => quote! {
                pub fn #name(&self) -> Vec<#entgraph::Value> {
                    self.inner.removed_ids(#member)
                }
            },
            EdgeIds => quote! {
                pub fn #name(&self) -> Vec<#entgraph::Value> {
                    self.inner.added_ids(#member)
                }
            },
            ClearEdge => quote! {
                pub fn #name(&mut self) -> #entgraph::Result<()> {
                    self.inner.clear_edge(#member)
                }
            },
            EdgeCleared => quote! {
                pub fn #name(&self) -> bool {
                    self.inner.edge_cleared(#member)
                }
            },
            ResetEdge => quote! {
                pub fn #name(&mut self) -> #entgraph::Result<()> {
                    self.inner.reset_edge(#member)
                }
            },
        }
    }

    /// `user::FIELD_NAME` or `user::EDGE_PETS`.
    pub(super) fn member_constant(&self, member: Member) -> TokenStream {
        let module = &self.module;

        let constant = match member {
            Member::Field(id) => self.field_constant(self.ty.field(id)),
            Member::Edge(id) => self.edge_constant(&self.ty.edges[id.index]),
        };

        quote!(#module::#constant)
    }
}
