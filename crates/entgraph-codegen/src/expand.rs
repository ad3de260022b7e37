mod builders;
mod client;
mod constants;
mod mutation;
mod predicates;
mod util;

use entgraph_core::schema::{
    graph::{Edge, Field, Type},
    naming::{self, TypeNames},
};
use entgraph_core::Schema;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    schema: &'a Schema,

    /// The type being expanded
    ty: &'a Type,

    /// Derived names of the type
    names: TypeNames,

    /// Name of the module holding the type's constants
    module: syn::Ident,

    /// Path prefix for entgraph types
    entgraph: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> syn::Result<TokenStream> {
        let module = self.expand_module()?;
        let client = self.expand_client();
        let create = self.expand_create_builder();
        let update = self.expand_update_builder();
        let update_one = self.expand_update_one_builder();
        let delete = self.expand_delete_builder();
        let query = self.expand_query_builder();
        let mutation = self.expand_mutation();

        Ok(quote! {
            #module
            #client
            #create
            #update
            #update_one
            #delete
            #query
            #mutation
        })
    }

    /// `pub mod user { .. }` with constants, predicates and orderings.
    fn expand_module(&self) -> syn::Result<TokenStream> {
        let module = &self.module;
        let constants = self.expand_constants()?;
        let predicates = self.expand_predicates();
        let orderings = self.expand_orderings();
        let doc = format!(" Constants, predicates and orderings of `{}`.", self.ty.name);

        Ok(quote! {
            #[doc = #doc]
            pub mod #module {
                #constants
                #predicates
                #orderings
            }
        })
    }

    fn type_ident(&self, name: &str) -> syn::Ident {
        util::ident(name)
    }

    fn field_constant(&self, field: &Field) -> syn::Ident {
        util::ident(&naming::field_constant(&field.name.app_name))
    }

    fn edge_constant(&self, edge: &Edge) -> syn::Ident {
        util::ident(&naming::edge_constant(&edge.name))
    }
}

pub(super) fn ty(schema: &Schema, ty: &Type) -> syn::Result<TokenStream> {
    Expand {
        schema,
        ty,
        names: naming::type_names(ty),
        module: util::ident(&ty.label()),
        entgraph: quote!(::entgraph),
    }
    .expand()
}
