//! Implementation of `#[derive(TupleLike)]`.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index, Lifetime, parse_macro_input};

/// Tuples up to this arity have conversions in `stackbind_core`.
const MAX_FIELDS: usize = 12;

pub fn derive_tuple_like_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "TupleLike cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "TupleLike can only be derived for structs",
            ));
        }
    };

    let count = fields.len();
    if count == 0 || count > MAX_FIELDS {
        return Err(syn::Error::new_spanned(
            name,
            format!("TupleLike needs between 1 and {MAX_FIELDS} fields, found {count}"),
        ));
    }

    let types: Vec<_> = fields.iter().map(|field| &field.ty).collect();
    let positions: Vec<Index> = (0..count).map(Index::from).collect();

    // Accessors on `self` and a constructor from the element tuple.
    let (into_elements, from_elements) = match fields {
        Fields::Named(named) => {
            let idents: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            (
                quote! { (#(self.#idents,)*) },
                quote! { Self { #(#idents: elements.#positions,)* } },
            )
        }
        Fields::Unnamed(_) | Fields::Unit => (
            quote! { (#(self.#positions,)*) },
            quote! { Self(#(elements.#positions,)*) },
        ),
    };

    let elements = quote! { (#(#types,)*) };
    let lifetime = Lifetime::new("'v", Span::call_site());

    Ok(quote! {
        impl ::stackbind_core::TupleLike for #name {
            const ARITY: usize = #count;
            type Elements = #elements;

            fn into_elements(self) -> Self::Elements {
                #into_elements
            }

            fn from_elements(elements: Self::Elements) -> Self {
                #from_elements
            }
        }

        impl<#lifetime> ::stackbind_core::FromValue<#lifetime> for #name {
            fn from_value(
                value: &#lifetime ::stackbind_core::Value,
            ) -> ::core::result::Result<Self, ::stackbind_core::ConversionError> {
                <#elements as ::stackbind_core::FromValue<#lifetime>>::from_value(value)
                    .map(<Self as ::stackbind_core::TupleLike>::from_elements)
            }
        }

        impl ::stackbind_core::IntoValue for #name {
            fn into_value(
                self,
            ) -> ::core::result::Result<::stackbind_core::Value, ::stackbind_core::ConversionError> {
                ::stackbind_core::IntoValue::into_value(
                    ::stackbind_core::TupleLike::into_elements(self),
                )
            }
        }

        impl ::stackbind_core::PushEmbedded for #name {
            fn push_embedded(
                self,
                results: &mut ::stackbind_core::Results<'_>,
            ) -> ::core::result::Result<usize, ::stackbind_core::NativeError> {
                ::stackbind_core::PushEmbedded::push_embedded(
                    ::stackbind_core::TupleLike::into_elements(self),
                    results,
                )
            }
        }
    })
}
