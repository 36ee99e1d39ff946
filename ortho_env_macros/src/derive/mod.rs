//! Expansion of `#[derive(Reflect)]`.

pub(crate) mod crate_path;
pub(crate) mod generate;
pub(crate) mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

use parse::{Body, parse_input};

/// Expands the derive for `input`.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse_input(input)?;
    let krate = crate_path::resolve(parsed.attrs.crate_path.as_ref());
    Ok(match &parsed.body {
        Body::Record(fields) => generate::record_impl(&parsed, fields, &krate),
        Body::Scalar => generate::scalar_impl(&parsed, &krate),
    })
}
