//! Input parsing for the `Reflect` derive macro.
//!
//! This module gathers the type identifier, generics, attributes and the
//! record fields in one pass so expansion can fail fast with useful errors.

use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Type, Visibility};

use super::{StructAttrs, contains_trait_object, parse_field_attrs, parse_struct_attrs};

/// A field that takes part in the record's shape.
pub(crate) struct RecordField {
    pub ident: Ident,
    pub ty: Type,
    /// Path segment name.
    pub name: String,
    pub exported: bool,
    pub flatten: bool,
    pub abstract_capability: bool,
}

pub(crate) enum Body {
    Record(Vec<RecordField>),
    Scalar,
}

pub(crate) struct Input {
    pub ident: Ident,
    pub generics: Generics,
    pub attrs: StructAttrs,
    pub body: Body,
}

/// Gathers information from the user-provided type.
///
/// Enums and `#[ortho_env(scalar)]` types become leaves. Structs with named
/// fields, and unit structs, become records. Tuple structs need the
/// `scalar` marker and unions are rejected.
pub(crate) fn parse_input(input: &DeriveInput) -> Result<Input, syn::Error> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let body = if attrs.scalar {
        Body::Scalar
    } else {
        match &input.data {
            Data::Enum(_) => Body::Scalar,
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => Body::Record(record_fields(named.named.iter())?),
                Fields::Unit => Body::Record(Vec::new()),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new_spanned(
                        data.struct_token,
                        "Reflect requires named fields; mark newtypes with #[ortho_env(scalar)]",
                    ));
                }
            },
            Data::Union(data) => {
                return Err(syn::Error::new_spanned(
                    data.union_token,
                    "Reflect cannot be derived for unions",
                ));
            }
        }
    };
    Ok(Input {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs,
        body,
    })
}

fn record_fields<'a>(fields: impl Iterator<Item = &'a syn::Field>) -> syn::Result<Vec<RecordField>> {
    let mut out = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let name = attrs.rename.unwrap_or_else(|| ident.unraw().to_string());
        out.push(RecordField {
            ident,
            ty: field.ty.clone(),
            name,
            exported: matches!(field.vis, Visibility::Public(_)),
            flatten: attrs.flatten,
            abstract_capability: contains_trait_object(&field.ty),
        });
    }
    Ok(out)
}
