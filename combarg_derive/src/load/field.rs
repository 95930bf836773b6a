use crate::load::{incompatible_error, load_attributes, single_value};
use crate::model::{DeriveField, DeriveValue, FieldKind, IntermediateAttributes};
use quote::ToTokens;
use syn::spanned::Spanned;

const SINGLETONS: [&str; 1] = ["positional"];
const PAIRS: [&str; 4] = ["default", "help", "parser", "short"];

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(value.span(), "Invalid - field must be named."))?;
        let attributes = load_attributes(&value.attrs)?;
        check_known(&field_name, &attributes)?;

        let positional = attributes.singletons.contains("positional");
        let help = single_value(&attributes, "help", field_name.span())?;
        let default = single_value(&attributes, "default", field_name.span())?;
        let short = single_value(&attributes, "short", field_name.span())?;
        let parser = single_value(&attributes, "parser", field_name.span())?;

        if positional && short.is_some() {
            return Err(incompatible_error(
                &field_name,
                "#[combarg(positional)]",
                "#[combarg(short = ..)]",
            ));
        }

        let (optional, inner) = match option_inner(&value.ty) {
            Some(inner) => (true, inner),
            None => (false, &value.ty),
        };

        if optional && default.is_some() {
            return Err(incompatible_error(
                &field_name,
                "Option<..>",
                "#[combarg(default = ..)]",
            ));
        }

        let kind = if let Some(parser) = parser {
            if positional {
                return Err(incompatible_error(
                    &field_name,
                    "#[combarg(parser = ..)]",
                    "#[combarg(positional)]",
                ));
            }

            if short.is_some() {
                return Err(incompatible_error(
                    &field_name,
                    "#[combarg(parser = ..)]",
                    "#[combarg(short = ..)]",
                ));
            }

            FieldKind::Parser { parser }
        } else if !optional && is_bool(inner) {
            if positional {
                return Err(incompatible_error(
                    &field_name,
                    "bool",
                    "#[combarg(positional)]",
                ));
            }

            FieldKind::Flag
        } else {
            let value_type = DeriveValue {
                tokens: inner.to_token_stream(),
            };

            if positional {
                FieldKind::Argument { value_type }
            } else {
                FieldKind::Option { value_type }
            }
        };

        Ok(DeriveField {
            field_name,
            kind,
            optional,
            help,
            default,
            short,
        })
    }
}

fn check_known(
    field_name: &syn::Ident,
    attributes: &IntermediateAttributes,
) -> Result<(), syn::Error> {
    let unknown = attributes
        .singletons
        .iter()
        .filter(|s| !SINGLETONS.contains(&s.as_str()))
        .chain(
            attributes
                .pairs
                .keys()
                .filter(|k| !PAIRS.contains(&k.as_str())),
        )
        .next();

    match unknown {
        Some(name) => Err(syn::Error::new(
            field_name.span(),
            format!("Invalid - unknown field attribute `{name}`."),
        )),
        None => Ok(()),
    }
}

fn last_segment(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn is_bool(ty: &syn::Type) -> bool {
    matches!(last_segment(ty), Some(segment) if segment.ident == "bool" && segment.arguments.is_empty())
}

/// The `T` of an `Option<T>` field type.
fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let segment = last_segment(ty)?;

    if segment.ident != "Option" {
        return None;
    }

    match &segment.arguments {
        syn::PathArguments::AngleBracketed(arguments) if arguments.args.len() == 1 => {
            match arguments.args.first() {
                Some(syn::GenericArgument::Type(inner)) => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}
