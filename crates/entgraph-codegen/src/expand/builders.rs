use super::{util, Expand};
use entgraph_core::schema::graph::{Member, Method, MethodKind};
use entgraph_core::schema::naming;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Which runtime builder a typed builder wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Create,
    Update,
}

impl Expand<'_> {
    pub(super) fn expand_create_builder(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let ident = self.type_ident(&self.names.create);
        let setters = self.expand_setters(&ident, Target::Create);

        quote! {
            #[derive(Debug)]
            pub struct #ident {
                inner: #entgraph::Create,
            }

            impl #ident {
                #setters

                pub fn mutation(&self) -> &#entgraph::Mutation {
                    self.inner.mutation()
                }

                pub fn into_inner(self) -> #entgraph::Create {
                    self.inner
                }

                pub async fn save(self, cx: &#entgraph::Context) -> #entgraph::Result<#entgraph::Record> {
                    self.inner.save(cx).await
                }

                pub async fn save_x(self, cx: &#entgraph::Context) -> #entgraph::Record {
                    self.inner.save_x(cx).await
                }

                pub async fn exec(self, cx: &#entgraph::Context) -> #entgraph::Result<()> {
                    self.inner.exec(cx).await
                }

                pub async fn exec_x(self, cx: &#entgraph::Context) {
                    self.inner.exec_x(cx).await
                }
            }
        }
    }

    pub(super) fn expand_update_builder(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let ident = self.type_ident(&self.names.update);
        let setters = self.expand_setters(&ident, Target::Update);

        quote! {
            #[derive(Debug)]
            pub struct #ident {
                inner: #entgraph::Update,
            }

            impl #ident {
                #setters

                pub fn where_(self, pred: #entgraph::Where) -> #ident {
                    #ident { inner: self.inner.where_(pred) }
                }

                pub fn mutation(&self) -> &#entgraph::Mutation {
                    self.inner.mutation()
                }

                pub fn into_inner(self) -> #entgraph::Update {
                    self.inner
                }

                /// Returns the number of updated entities.
                pub async fn save(self, cx: &#entgraph::Context) -> #entgraph::Result<u64> {
                    self.inner.save(cx).await
                }

                pub async fn save_x(self, cx: &#entgraph::Context) -> u64 {
                    self.inner.save_x(cx).await
                }

                pub async fn exec(self, cx: &#entgraph::Context) -> #entgraph::Result<()> {
                    self.inner.exec(cx).await
                }

                pub async fn exec_x(self, cx: &#entgraph::Context) {
                    self.inner.exec_x(cx).await
                }
            }
        }
    }

    pub(super) fn expand_update_one_builder(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let ident = self.type_ident(&self.names.update_one);
        let setters = self.expand_setters(&ident, Target::Update);

        quote! {
            #[derive(Debug)]
            pub struct #ident {
                inner: #entgraph::UpdateOne,
            }

            impl #ident {
                #setters

                pub fn where_(self, pred: #entgraph::Where) -> #ident {
                    #ident { inner: self.inner.where_(pred) }
                }

                pub fn mutation(&self) -> &#entgraph::Mutation {
                    self.inner.mutation()
                }

                pub fn into_inner(self) -> #entgraph::UpdateOne {
                    self.inner
                }

                pub async fn save(self, cx: &#entgraph::Context) -> #entgraph::Result<#entgraph::Record> {
                    self.inner.save(cx).await
                }

                pub async fn save_x(self, cx: &#entgraph::Context) -> #entgraph::Record {
                    self.inner.save_x(cx).await
                }

                pub async fn exec(self, cx: &#entgraph::Context) -> #entgraph::Result<()> {
                    self.inner.exec(cx).await
                }

                pub async fn exec_x(self, cx: &#entgraph::Context) {
                    self.inner.exec_x(cx).await
                }
            }
        }
    }

    pub(super) fn expand_delete_builder(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let ident = self.type_ident(&self.names.delete);

        quote! {
            #[derive(Debug)]
            pub struct #ident {
                inner: #entgraph::Delete,
            }

            impl #ident {
                pub fn where_(self, pred: #entgraph::Where) -> #ident {
                    #ident { inner: self.inner.where_(pred) }
                }

                pub fn into_inner(self) -> #entgraph::Delete {
                    self.inner
                }

                /// Returns the number of deleted entities.
                pub async fn exec(self, cx: &#entgraph::Context) -> #entgraph::Result<u64> {
                    self.inner.exec(cx).await
                }

                pub async fn exec_x(self, cx: &#entgraph::Context) -> u64 {
                    self.inner.exec_x(cx).await
                }
            }
        }
    }

    pub(super) fn expand_query_builder(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let ident = self.type_ident(&self.names.query);

        let traversals = self.ty.edges.iter().map(|edge| {
            let target = self.schema.ty(edge.target);
            let target_query = self.type_ident(&naming::type_names(target).query);
            let method = util::ident(&format!("query_{}", std_util::str::snake_case(&edge.name)));
            let constant = self.member_constant(Member::Edge(edge.id));

            quote! {
                pub fn #method(self) -> #target_query {
                    #target_query { inner: self.inner.query_edge(#constant) }
                }
            }
        });

        let loaders = [
            ("all", quote!(Vec<#entgraph::Record>)),
            ("first", quote!(#entgraph::Record)),
            ("first_id", quote!(#entgraph::Value)),
            ("only", quote!(#entgraph::Record)),
            ("only_id", quote!(#entgraph::Value)),
            ("ids", quote!(Vec<#entgraph::Value>)),
            ("count", quote!(u64)),
            ("exist", quote!(bool)),
        ]
        .into_iter()
        .map(|(name, ret)| {
            let method = format_ident!("{name}");
            let method_x = format_ident!("{name}_x");

            quote! {
                pub async fn #method(self, cx: &#entgraph::Context) -> #entgraph::Result<#ret> {
                    self.inner.#method(cx).await
                }

                pub async fn #method_x(self, cx: &#entgraph::Context) -> #ret {
                    self.inner.#method_x(cx).await
                }
            }
        });

        quote! {
            #[derive(Debug, Clone)]
            pub struct #ident {
                inner: #entgraph::Query,
            }

            impl #ident {
                pub fn where_(self, pred: #entgraph::Where) -> #ident {
                    #ident { inner: self.inner.where_(pred) }
                }

                pub fn order(self, order: #entgraph::Order) -> #ident {
                    #ident { inner: self.inner.order(order) }
                }

                pub fn limit(self, limit: usize) -> #ident {
                    #ident { inner: self.inner.limit(limit) }
                }

                pub fn offset(self, offset: usize) -> #ident {
                    #ident { inner: self.inner.offset(offset) }
                }

                pub fn unique(self, unique: bool) -> #ident {
                    #ident { inner: self.inner.unique(unique) }
                }

                pub fn into_inner(self) -> #entgraph::Query {
                    self.inner
                }

                #( #traversals )*
                #( #loaders )*
            }
        }
    }

    /// Chaining setters of a builder, named after the mutation's methods.
    fn expand_setters(&self, builder: &syn::Ident, target: Target) -> TokenStream {
        self.ty
            .methods
            .values()
            .filter(|method| self.has_setter(method, target))
            .map(|method| self.expand_setter(builder, method))
            .collect()
    }

    fn has_setter(&self, method: &Method, target: Target) -> bool {
        use MethodKind::*;

        let writable = match method.member {
            Member::Field(id) => {
                let field = self.ty.field(id);
                target == Target::Create || (!field.immutable && !field.primary_key)
            }
            Member::Edge(id) => {
                let edge = &self.ty.edges[id.index];
                let read_only =
                    edge.is_through_synthesized() && self.schema.ty(edge.target).has_composite_id();
                !read_only && (target == Target::Create || !edge.immutable)
            }
        };

        let kind = match target {
            Target::Create => matches!(method.kind, SetField | SetEdgeId | AddEdgeIds),
            Target::Update => matches!(
                method.kind,
                SetField | AddField | AppendField | ClearField | SetEdgeId | AddEdgeIds | RemoveEdgeIds | ClearEdge
            ),
        };

        writable && kind
    }

    fn expand_setter(&self, builder: &syn::Ident, method: &Method) -> TokenStream {
        use MethodKind::*;

        let entgraph = &self.entgraph;
        let name = util::ident(&method.name);
        let member = self.member_constant(method.member);

        match method.kind {
            SetField => quote! {
                pub fn #name(self, value: impl Into<#entgraph::Value>) -> #builder {
                    #builder { inner: self.inner.set(#member, value) }
                }
            },
            AddField => quote! {
                pub fn #name(self, delta: impl Into<#entgraph::Value>) -> #builder {
                    #builder { inner: self.inner.add(#member, delta) }
                }
            },
            AppendField => quote! {
                pub fn #name(self, elements: impl Into<#entgraph::Value>) -> #builder {
                    #builder { inner: self.inner.append(#member, elements) }
                }
            },
            ClearField => quote! {
                pub fn #name(self) -> #builder {
                    #builder { inner: self.inner.clear(#member) }
                }
            },
            SetEdgeId => quote! {
                pub fn #name(self, id: impl Into<#entgraph::Value>) -> #builder {
                    #builder { inner: self.inner.set_edge_id(#member, id) }
                }
            },
            AddEdgeIds => quote! {
                pub fn #name<V: Into<#entgraph::Value>>(self, ids: impl IntoIterator<Item = V>) -> #builder {
                    #builder { inner: self.inner.add_edge_ids(#member, ids) }
                }
            },
            RemoveEdgeIds => quote! {
                pub fn #name<V: Into<#entgraph::Value>>(self, ids: impl IntoIterator<Item = V>) -> #builder {
                    #builder { inner: self.inner.remove_edge_ids(#member, ids) }
                }
            },
            ClearEdge => quote! {
                pub fn #name(self) -> #builder {
                    #builder { inner: self.inner.clear_edge(#member) }
                }
            },
            kind => unreachable!("{kind:?} has no builder setter"),
        }
    }
}
