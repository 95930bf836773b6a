use crate::model::{DeriveValue, IntermediateAttributes};

mod args;
mod attribute;
mod field;

pub(self) const ATTRIBUTE: &str = "combarg";

pub(self) fn incompatible_error(
    field_name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!(
            "Invalid - field cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

/// Merge every `#[combarg(..)]` attribute into one set.
pub(self) fn load_attributes(attrs: &[syn::Attribute]) -> Result<IntermediateAttributes, syn::Error> {
    let mut attributes = IntermediateAttributes::default();

    for attribute in attrs {
        if attribute.path().is_ident(ATTRIBUTE) {
            let IntermediateAttributes { singletons, pairs } =
                IntermediateAttributes::try_from(attribute)?;
            attributes.singletons.extend(singletons);

            for (key, values) in pairs {
                attributes.pairs.entry(key).or_default().extend(values);
            }
        }
    }

    Ok(attributes)
}

/// The single value of the pair `key`, if present.
pub(self) fn single_value(
    attributes: &IntermediateAttributes,
    key: &str,
    span: proc_macro2::Span,
) -> Result<Option<DeriveValue>, syn::Error> {
    match attributes.pairs.get(key) {
        Some(values) => match values.as_slice() {
            [value] => Ok(Some(value.clone())),
            _ => Err(syn::Error::new(
                span,
                format!("Invalid - attribute `{key} = ..` cannot be repeated."),
            )),
        },
        None => Ok(None),
    }
}
