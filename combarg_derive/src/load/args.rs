use crate::load::{load_attributes, single_value};
use crate::model::{DeriveArgs, DeriveField};

const PAIRS: [&str; 3] = ["flip_bools", "prefix", "repeated"];

impl TryFrom<syn::DeriveInput> for DeriveArgs {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let attributes = load_attributes(&value.attrs)?;
        let span = value.ident.span();

        if let Some(name) = attributes.singletons.iter().next().or_else(|| {
            attributes
                .pairs
                .keys()
                .find(|k| !PAIRS.contains(&k.as_str()))
        }) {
            return Err(syn::Error::new(
                span,
                format!("Invalid - unknown struct attribute `{name}`."),
            ));
        }

        let prefix = single_value(&attributes, "prefix", span)?;
        let flip_bools = single_value(&attributes, "flip_bools", span)?;
        let repeated = single_value(&attributes, "repeated", span)?;

        let fields = match &value.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => fields
                .named
                .iter()
                .map(DeriveField::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Unit,
                ..
            }) => Vec::default(),
            syn::Data::Struct(_) => {
                return Err(syn::Error::new(
                    span,
                    "Invalid - Args cannot be derived for a tuple struct.",
                ));
            }
            _ => {
                return Err(syn::Error::new(
                    span,
                    "Invalid - Args can only be derived for a struct.",
                ));
            }
        };

        Ok(DeriveArgs {
            struct_name: value.ident,
            generics: value.generics,
            prefix,
            flip_bools,
            repeated,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeriveValue, FieldKind};
    use quote::quote;
    use rstest::rstest;
    use syn::parse_quote;

    #[test]
    fn construct_derive_args_empty() {
        // Setup
        let input: syn::DeriveInput = parse_quote! {
            #[derive(Args)]
            struct Parameters { }
        };

        // Execute
        let derive_args = DeriveArgs::try_from(input).unwrap();

        // Verify
        assert_eq!(derive_args.struct_name.to_string(), "Parameters");
        assert_eq!(derive_args.prefix, None);
        assert_eq!(derive_args.flip_bools, None);
        assert_eq!(derive_args.repeated, None);
        assert!(derive_args.fields.is_empty());
    }

    #[test]
    fn construct_derive_args_unit() {
        // Setup
        let input: syn::DeriveInput = parse_quote! {
            #[derive(Args)]
            struct Parameters;
        };

        // Execute
        let derive_args = DeriveArgs::try_from(input).unwrap();

        // Verify
        assert!(derive_args.fields.is_empty());
    }

    #[test]
    fn construct_derive_args() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Args)]
                #[combarg(prefix = "cfg", flip_bools = false)]
                struct Parameters {
                    apple: usize,
                    #[combarg(help = "Crunchy.")]
                    banana: bool,
                }
            "#,
        )
        .unwrap();

        // Execute
        let derive_args = DeriveArgs::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_args.prefix,
            Some(DeriveValue {
                tokens: quote! { "cfg" }
            })
        );
        assert_eq!(
            derive_args.flip_bools,
            Some(DeriveValue {
                tokens: quote! { false }
            })
        );
        let names: Vec<String> = derive_args
            .fields
            .iter()
            .map(|f| f.field_name.to_string())
            .collect();
        assert_eq!(names, vec!["apple", "banana"]);
        assert_eq!(derive_args.fields[1].kind, FieldKind::Flag);
    }

    #[rstest]
    #[case(parse_quote! { struct Parameters(usize); }, "tuple struct")]
    #[case(parse_quote! { enum Parameters { A } }, "only be derived for a struct")]
    #[case(parse_quote! { #[combarg(program = "x")] struct Parameters { } }, "unknown")]
    #[case(parse_quote! { #[combarg(nested)] struct Parameters { } }, "unknown")]
    #[case(parse_quote! { #[combarg(prefix = "a", prefix = "b")] struct Parameters { } }, "repeated")]
    #[case(parse_quote! { struct Parameters { #[combarg(positional)] flag: bool } }, "bool")]
    fn construct_derive_args_invalid(#[case] input: syn::DeriveInput, #[case] expected: &str) {
        // Execute
        let result = DeriveArgs::try_from(input);

        // Verify
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains(expected),
            "'{message}' does not contain '{expected}'"
        );
    }
}
