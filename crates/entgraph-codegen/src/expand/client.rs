use super::Expand;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    /// Typed entry points, resolving the type by name on every call.
    pub(super) fn expand_client(&self) -> TokenStream {
        let entgraph = &self.entgraph;
        let module = &self.module;
        let ident = self.type_ident(&self.names.client);
        let create = self.type_ident(&self.names.create);
        let update = self.type_ident(&self.names.update);
        let update_one = self.type_ident(&self.names.update_one);
        let delete = self.type_ident(&self.names.delete);
        let query = self.type_ident(&self.names.query);

        quote! {
            #[derive(Debug, Clone)]
            pub struct #ident {
                client: #entgraph::Client,
            }

            impl #ident {
                pub fn new(client: #entgraph::Client) -> #ident {
                    #ident { client }
                }

                pub fn create(&self) -> #entgraph::Result<#create> {
                    Ok(#create { inner: self.client.create(#module::TYPE)? })
                }

                pub fn create_bulk(&self, builders: impl IntoIterator<Item = #create>) -> #entgraph::CreateBulk {
                    self.client.create_bulk(builders.into_iter().map(|builder| builder.inner))
                }

                pub fn update(&self) -> #entgraph::Result<#update> {
                    Ok(#update { inner: self.client.update(#module::TYPE)? })
                }

                pub fn update_one(&self, record: &#entgraph::Record) -> #entgraph::Result<#update_one> {
                    Ok(#update_one { inner: self.client.update_one(record)? })
                }

                pub fn update_one_id(&self, id: impl Into<#entgraph::Value>) -> #entgraph::Result<#update_one> {
                    Ok(#update_one { inner: self.client.update_one_id(#module::TYPE, id)? })
                }

                pub fn delete(&self) -> #entgraph::Result<#delete> {
                    Ok(#delete { inner: self.client.delete(#module::TYPE)? })
                }

                pub fn delete_one(&self, record: &#entgraph::Record) -> #entgraph::Result<#entgraph::DeleteOne> {
                    self.client.delete_one(record)
                }

                pub fn delete_one_id(&self, id: impl Into<#entgraph::Value>) -> #entgraph::Result<#entgraph::DeleteOne> {
                    self.client.delete_one_id(#module::TYPE, id)
                }

                pub fn query(&self) -> #entgraph::Result<#query> {
                    Ok(#query { inner: self.client.query(#module::TYPE)? })
                }

                pub async fn get(&self, cx: &#entgraph::Context, id: impl Into<#entgraph::Value>) -> #entgraph::Result<#entgraph::Record> {
                    self.client.get(cx, #module::TYPE, id).await
                }
            }
        }
    }
}
