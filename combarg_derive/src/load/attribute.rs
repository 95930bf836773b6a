use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;
use std::collections::{HashMap, HashSet};
use syn::spanned::Spanned;

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut singletons = HashSet::default();
        let mut pairs: HashMap<String, Vec<DeriveValue>> = HashMap::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    let values = pairs.entry(left.to_string()).or_default();
                    values.push(DeriveValue {
                        tokens: assignment.right.to_token_stream(),
                    });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    if let Some(ident) = path.path.get_ident() {
                        singletons.insert(ident.to_string());
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        expression.span(),
                        format!(
                            "Unparseable attribute: {}",
                            expression.to_token_stream()
                        ),
                    ));
                }
            };
        }

        Ok(Self { singletons, pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Literal;
    use syn::parse_quote;

    #[test]
    fn construct_attributes_empty() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg()]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(attributes, IntermediateAttributes::default());
    }

    #[test]
    fn construct_attributes() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg(positional, help = "123")]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            attributes,
            IntermediateAttributes {
                singletons: HashSet::from(["positional".to_string()]),
                pairs: HashMap::from([(
                    "help".to_string(),
                    vec![DeriveValue {
                        tokens: Literal::string("123").into_token_stream(),
                    }]
                )])
            }
        );
    }

    #[test]
    fn construct_attributes_multiple() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg(help = "123", help = "456")]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(attributes.pairs.get("help").map(Vec::len), Some(2));
    }

    #[test]
    fn construct_attributes_expression_value() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg(default = 1 + 2)]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            attributes.pairs.get("default").unwrap()[0].tokens.to_string(),
            "1 + 2"
        );
    }

    #[test]
    fn construct_attributes_invalid() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg]
        };

        // Execute
        let result = IntermediateAttributes::try_from(&attribute);

        // Verify
        assert!(result.is_err());
    }

    #[test]
    fn construct_attributes_invalid_expression() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[combarg(1 + 2)]
        };

        // Execute
        let result = IntermediateAttributes::try_from(&attribute);

        // Verify
        assert!(result.is_err());
    }
}
