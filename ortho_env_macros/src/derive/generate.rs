//! Token generation for `Reflect` implementations.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericParam, Generics, parse_quote};

use super::parse::{Input, RecordField};

/// Adds `bound` to every type parameter of `generics`.
fn bounded(generics: &Generics, bound: &TokenStream) -> Generics {
    let mut out = generics.clone();
    for param in &mut out.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#bound));
        }
    }
    out
}

fn field_shape(field: &RecordField, krate: &TokenStream) -> TokenStream {
    let name = &field.name;
    let ty = &field.ty;
    let base = if field.abstract_capability {
        let type_name = ty.to_token_stream().to_string();
        quote! {
            #krate::FieldShape::new(#name, || #krate::Shape::Unsupported {
                type_name: #type_name,
                kind: #krate::UnsupportedKind::AbstractCapability,
            })
            .abstract_capability()
        }
    } else {
        quote! { #krate::FieldShape::new(#name, <#ty as #krate::Reflect>::shape) }
    };
    let private = (!field.exported).then(|| quote! { .private() });
    let embedded = field.flatten.then(|| quote! { .embedded() });
    quote! { #base #private #embedded }
}

/// Generates `Reflect` and `RecordMut` for a struct with named fields.
///
/// Exported fields are reachable by segment name. Flattened fields are
/// searched afterwards through `embedded_field_mut`, then handed out by
/// `flattened_mut` so indexed containers can claim the remaining segments.
/// Trait-object fields are described but never touched.
pub(crate) fn record_impl(input: &Input, fields: &[RecordField], krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let generics = bounded(&input.generics, &quote! { #krate::Reflect });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let shapes = fields.iter().map(|field| field_shape(field, krate));
    let (named, flattened): (Vec<_>, Vec<_>) = fields
        .iter()
        .filter(|field| !field.abstract_capability)
        .partition(|field| !field.flatten);
    let named: Vec<_> = named.into_iter().filter(|field| field.exported).collect();
    let names = named.iter().map(|field| &field.name);
    let named_idents = named.iter().map(|field| &field.ident);
    let flat_lookup = flattened.iter().map(|field| &field.ident);
    let flat_list = flattened.iter().map(|field| &field.ident);

    let direct = if named.is_empty() {
        quote! {}
    } else {
        quote! {
            match name {
                #( #names => return ::core::option::Option::Some(&mut self.#named_idents as &mut dyn #krate::Reflect), )*
                _ => {}
            }
        }
    };

    quote! {
        impl #impl_generics #krate::Reflect for #ident #ty_generics #where_clause {
            fn shape() -> #krate::Shape {
                #krate::Shape::Record(#krate::RecordShape::new(
                    ::core::any::type_name::<Self>(),
                    ::std::vec![ #( #shapes ),* ],
                ))
            }

            fn reflect_mut(&mut self) -> #krate::ReflectMut<'_> {
                #krate::ReflectMut::Record(self)
            }
        }

        impl #impl_generics #krate::RecordMut for #ident #ty_generics #where_clause {
            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #krate::Reflect> {
                #direct
                #(
                    if let ::core::option::Option::Some(found) =
                        #krate::__private::embedded_field_mut(&mut self.#flat_lookup, name)
                    {
                        return ::core::option::Option::Some(found);
                    }
                )*
                ::core::option::Option::None
            }

            fn flattened_mut(&mut self) -> ::std::vec::Vec<&mut dyn #krate::Reflect> {
                ::std::vec![ #( &mut self.#flat_list as &mut dyn #krate::Reflect ),* ]
            }
        }
    }
}

/// Generates a leaf `Reflect` implementation.
pub(crate) fn scalar_impl(input: &Input, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let generics = bounded(&input.generics, &quote! { 'static });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        impl #impl_generics #krate::Reflect for #ident #ty_generics #where_clause {
            fn shape() -> #krate::Shape {
                #krate::Shape::scalar::<Self>()
            }

            fn reflect_mut(&mut self) -> #krate::ReflectMut<'_> {
                #krate::ReflectMut::Scalar(self)
            }
        }
    }
}
