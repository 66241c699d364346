//! Implementation of the `entry!` macro.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{Path, PathArguments, parse_macro_input};

pub fn entry_impl(input: TokenStream) -> TokenStream {
    let mut path = parse_macro_input!(input as Path);

    let Some(last) = path.segments.last_mut() else {
        return syn::Error::new(Span::call_site(), "expected a function path")
            .to_compile_error()
            .into();
    };
    if !matches!(last.arguments, PathArguments::None) {
        return syn::Error::new_spanned(
            &last.arguments,
            "exposed functions take no generic arguments",
        )
        .to_compile_error()
        .into();
    }
    last.ident = format_ident!("__stackbind_entry_{}", last.ident, span = last.ident.span());

    quote!((#path as ::stackbind_core::EntryPoint)).into()
}
