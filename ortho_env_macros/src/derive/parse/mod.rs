//! Attribute and input parsing for the `Reflect` derive macro.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Token, parenthesized};

mod input;
mod literals;
#[cfg(test)]
mod tests;
mod type_utils;

pub(crate) use input::{Body, Input, RecordField, parse_input};
use literals::lit_str;
pub(crate) use type_utils::contains_trait_object;

/// Type-level attributes recognised by `#[derive(Reflect)]`.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[ortho_env(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `ortho_env::`.
    pub crate_path: Option<syn::Path>,
    /// Treats the type as a leaf parsed through the registry.
    pub scalar: bool,
}

/// Field-level attributes recognised by `#[derive(Reflect)]`.
///
/// - `flatten` merges the field's own fields into the parent.
/// - `skip` removes the field from the shape and from assignment.
/// - `rename` replaces the identifier used as the path segment.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub flatten: bool,
    pub skip: bool,
    pub rename: Option<String>,
}

/// Iterate all `#[ortho_env(...)]` attributes once and apply a callback.
fn parse_ortho_env<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("ortho_env")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Parses type-level `#[ortho_env(...)]` attributes.
///
/// Unknown keys are ignored to allow forward compatibility.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_ortho_env(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let lit = lit_str(meta, "crate")?;
            out.crate_path = Some(lit.parse::<syn::Path>()?);
        } else if meta.path.is_ident("scalar") {
            out.scalar = true;
        } else {
            discard_unknown(meta)?;
        }
        Ok(())
    })?;
    Ok(out)
}

/// Parses field-level `#[ortho_env(...)]` attributes.
///
/// Unknown keys are ignored to allow forward compatibility.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_ortho_env(attrs, |meta| {
        if meta.path.is_ident("flatten") {
            out.flatten = true;
        } else if meta.path.is_ident("skip") {
            out.skip = true;
        } else if meta.path.is_ident("rename") {
            let lit = lit_str(meta, "rename")?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "rename must not be empty"));
            }
            out.rename = Some(lit.value());
        } else {
            discard_unknown(meta)?;
        }
        Ok(())
    })?;
    Ok(out)
}
