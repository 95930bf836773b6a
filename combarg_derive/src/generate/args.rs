use crate::model::{DeriveArgs, DeriveValue};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

impl From<DeriveArgs> for TokenStream2 {
    fn from(value: DeriveArgs) -> Self {
        let DeriveArgs {
            struct_name,
            generics,
            prefix,
            flip_bools,
            repeated,
            fields,
        } = value;
        let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

        let mut schema = quote! {
            ::combarg::Schema::new()
        };

        if let Some(DeriveValue { tokens }) = prefix {
            schema = quote! { #schema.prefix(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = flip_bools {
            schema = quote! { #schema.flip_bools(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = repeated {
            schema = quote! { #schema.repeated(#tokens) };
        }

        let fields = fields.into_iter().map(TokenStream2::from);

        quote! {
            impl #impl_generics ::combarg::Args for #struct_name #type_generics #where_clause {
                fn schema() -> ::combarg::Schema {
                    #schema #( .field(#fields) )*
                }
            }
        }
    }
}
