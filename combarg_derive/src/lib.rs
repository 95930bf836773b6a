extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::DeriveArgs;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Derive `combarg::Args` for a struct of named fields.
///
/// Each field becomes a `combarg::Field` of the generated `Schema`, keyed by the field name.
/// Field types map as follows:
/// * `bool`: a flag (required unless it has a default).
/// * `Option<T>`: an optional option converting `T` via `FromStr`.
/// * `T`: an option converting `T` via `FromStr`.
///
/// Field attributes: `#[combarg(help = "..", default = expr, short = false, positional, parser = expr)]`.
/// Struct attributes: `#[combarg(prefix = "..", flip_bools = false, repeated = expr)]`.
#[proc_macro_derive(Args, attributes(combarg))]
pub fn combarg_args(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveArgs::try_from(derive_input) {
        Ok(derive_args) => TokenStream2::from(derive_args).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
