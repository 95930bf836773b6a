use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        let st = &self.tokens.to_string();
        let ot = &other.tokens.to_string();
        st == ot
    }
}

impl Eq for DeriveValue {}

/// The raw contents of a `#[combarg(..)]` attribute.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Flag,
    Option { value_type: DeriveValue },
    Argument { value_type: DeriveValue },
    Parser { parser: DeriveValue },
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub kind: FieldKind,
    pub optional: bool,
    pub help: Option<DeriveValue>,
    pub default: Option<DeriveValue>,
    pub short: Option<DeriveValue>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveArgs {
    pub struct_name: syn::Ident,
    pub generics: syn::Generics,
    pub prefix: Option<DeriveValue>,
    pub flip_bools: Option<DeriveValue>,
    pub repeated: Option<DeriveValue>,
    pub fields: Vec<DeriveField>,
}
