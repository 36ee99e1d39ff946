//! Procedural macros for `ortho_env`.
//!
//! `#[derive(Reflect)]` describes a type's shape to the environment loader
//! and gives it mutable field access by segment name. Structs with named
//! fields become records; enums and structs marked
//! `#[ortho_env(scalar)]` become leaves converted by the parser registry.
//!
//! Supported attributes:
//!
//! - `#[ortho_env(crate = "path")]` on the type: path to the `ortho_env`
//!   crate when it is re-exported or renamed.
//! - `#[ortho_env(scalar)]` on the type: treat it as a single leaf value.
//! - `#[ortho_env(flatten)]` on a field: merge the field's own fields into
//!   the parent's variable names. A flattened array, `Vec` or map takes its
//!   keys from every variable under the parent's name that no named field
//!   of the enclosing records owns. Flattening one at the top level with an
//!   empty prefix therefore reads every process variable as a key.
//! - `#[ortho_env(skip)]` on a field: leave the field out entirely.
//! - `#[ortho_env(rename = "Name")]` on a field: use `Name` as the segment
//!   instead of the field identifier.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `ortho_env::Reflect`.
#[proc_macro_derive(Reflect, attributes(ortho_env))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
