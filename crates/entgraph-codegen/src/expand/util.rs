use proc_macro2::{Span, TokenStream};
use quote::quote;

/// An identifier for `name`, raw when `name` is a keyword.
pub(crate) fn ident(name: &str) -> syn::Ident {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        syn::Ident::new(name, Span::call_site())
    } else {
        syn::Ident::new_raw(name, Span::call_site())
    }
}

/// Parses a derived symbol such as `pet::FIELD_ID`. Qualified symbols name a
/// sibling module, so they are resolved from `super`.
pub(crate) fn symbol(src: &str) -> syn::Result<TokenStream> {
    let path: syn::Path = syn::parse_str(src)?;

    Ok(if path.segments.len() > 1 {
        quote!(super::#path)
    } else {
        quote!(#path)
    })
}

pub(crate) fn strs<'a>(values: impl IntoIterator<Item = &'a str>) -> TokenStream {
    let values = values.into_iter();
    quote!(&[ #( #values ),* ])
}
