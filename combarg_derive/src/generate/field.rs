use crate::model::{DeriveField, DeriveValue, FieldKind};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;

impl From<DeriveField> for TokenStream2 {
    fn from(value: DeriveField) -> Self {
        let DeriveField {
            field_name,
            kind,
            optional,
            help,
            default,
            short,
        } = value;
        let name = field_name.unraw().to_string();

        let mut field = match kind {
            FieldKind::Flag => quote! {
                ::combarg::Field::flag(#name)
            },
            FieldKind::Option {
                value_type: DeriveValue { tokens },
            } => quote! {
                ::combarg::Field::option(#name, ::combarg::Converter::parse::<#tokens>())
            },
            FieldKind::Argument {
                value_type: DeriveValue { tokens },
            } => quote! {
                ::combarg::Field::argument(#name, ::combarg::Converter::parse::<#tokens>())
            },
            FieldKind::Parser {
                parser: DeriveValue { tokens },
            } => quote! {
                ::combarg::Field::parser(#name, #tokens)
            },
        };

        if let Some(DeriveValue { tokens }) = help {
            field = quote! { #field.help(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = default {
            field = quote! { #field.default(#tokens) };
        }

        if let Some(DeriveValue { tokens }) = short {
            field = quote! { #field.short(#tokens) };
        }

        if optional {
            field = quote! { #field.optional() };
        }

        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::test::ident;

    fn derive_field(name: &str, kind: FieldKind) -> DeriveField {
        DeriveField {
            field_name: ident(name),
            kind,
            optional: false,
            help: None,
            default: None,
            short: None,
        }
    }

    #[test]
    fn render_flag() {
        // Setup
        let field = derive_field("verbose", FieldKind::Flag);

        // Execute
        let token_stream = TokenStream2::from(field);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#":: combarg :: Field :: flag ("verbose")"#
        );
    }

    #[test]
    fn render_option() {
        // Setup
        let mut field = derive_field(
            "count",
            FieldKind::Option {
                value_type: DeriveValue {
                    tokens: quote! { usize },
                },
            },
        );
        field.help = Some(DeriveValue {
            tokens: quote! { "How many." },
        });
        field.default = Some(DeriveValue {
            tokens: quote! { 3 },
        });
        field.short = Some(DeriveValue {
            tokens: quote! { false },
        });

        // Execute
        let token_stream = TokenStream2::from(field);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#":: combarg :: Field :: option ("count" , :: combarg :: Converter :: parse :: < usize > ()) . help ("How many.") . default (3) . short (false)"#
        );
    }

    #[test]
    fn render_optional_argument() {
        // Setup
        let mut field = derive_field(
            "path",
            FieldKind::Argument {
                value_type: DeriveValue {
                    tokens: quote! { String },
                },
            },
        );
        field.optional = true;

        // Execute
        let token_stream = TokenStream2::from(field);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#":: combarg :: Field :: argument ("path" , :: combarg :: Converter :: parse :: < String > ()) . optional ()"#
        );
    }

    #[test]
    fn render_parser() {
        // Setup
        let field = derive_field(
            "mode",
            FieldKind::Parser {
                parser: DeriveValue {
                    tokens: quote! { mode() },
                },
            },
        );

        // Execute
        let token_stream = TokenStream2::from(field);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#":: combarg :: Field :: parser ("mode" , mode ())"#
        );
    }

    #[test]
    fn render_raw_identifier() {
        // Setup
        let mut field = derive_field("unused", FieldKind::Flag);
        field.field_name = syn::Ident::new_raw("type", proc_macro2::Span::call_site());

        // Execute
        let token_stream = TokenStream2::from(field);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#":: combarg :: Field :: flag ("type")"#
        );
    }
}
