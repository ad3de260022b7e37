mod expand;

use entgraph_core::Schema;
use proc_macro2::TokenStream;

/// Expands the typed surface of every type in `schema`: a module of
/// constants, predicates and orderings per type, plus typed builders, a
/// typed client and a typed mutation wrapping the reflective runtime API.
pub fn generate(schema: &Schema) -> syn::Result<TokenStream> {
    let mut out = TokenStream::new();

    for ty in schema.graph.types() {
        tracing::debug!(ty = %ty.name, "expanding type");
        out.extend(expand::ty(schema, ty)?);
    }

    Ok(out)
}

/// Expands the typed surface of one type.
pub fn generate_type(schema: &Schema, name: &str) -> syn::Result<TokenStream> {
    let Some(ty) = schema.ty_by_name(name) else {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("unknown type \"{name}\""),
        ));
    };

    expand::ty(schema, ty)
}
