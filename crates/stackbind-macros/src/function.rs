//! Implementation of the `#[function]` attribute macro.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote, quote_spanned};
use syn::{
    Expr, FnArg, GenericParam, ItemFn, ReturnType, Type, parse_macro_input, spanned::Spanned,
};

use crate::attrs::FunctionAttrs;
use crate::types::{
    erase_lifetimes, find_char, has_impl_trait, is_borrowable, is_unsized, option_inner,
};

pub fn function_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match syn::parse::<FunctionAttrs>(attr) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };

    let input = parse_macro_input!(item as ItemFn);

    match function_inner(&attrs, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How a parameter crosses from the frame into the call.
enum ParamKind {
    /// `T`: read and moved in.
    Value(Type),
    /// `&str` / `&[u8]`: borrowed straight from the slot.
    Borrowed(Type),
    /// `&T`: read into a local, lent immutably.
    Shared(Type),
    /// `&mut T`: read into a local, lent mutably, returned afterwards.
    Alias(Type),
    /// `Option<&mut T>`: like `Alias`, but nil means no slot.
    OptionalAlias(Type),
}

impl ParamKind {
    fn classify(ty: &Type) -> Self {
        if let Type::Reference(reference) = ty {
            let target = erase_lifetimes(&reference.elem);
            return match (reference.mutability.is_some(), is_borrowable(&reference.elem)) {
                (false, true) => ParamKind::Borrowed(erase_lifetimes(ty)),
                (false, false) => ParamKind::Shared(target),
                (true, _) => ParamKind::Alias(target),
            };
        }

        if let Some(Type::Reference(reference)) = option_inner(ty)
            && reference.mutability.is_some()
        {
            return ParamKind::OptionalAlias(erase_lifetimes(&reference.elem));
        }

        ParamKind::Value(erase_lifetimes(ty))
    }

    /// The type read out of the frame.
    fn stored_type(&self) -> TokenStream2 {
        match self {
            ParamKind::Value(ty)
            | ParamKind::Borrowed(ty)
            | ParamKind::Shared(ty)
            | ParamKind::Alias(ty) => quote!(#ty),
            ParamKind::OptionalAlias(ty) => quote!(::core::option::Option<#ty>),
        }
    }

    fn is_output(&self) -> bool {
        matches!(self, ParamKind::Alias(_) | ParamKind::OptionalAlias(_))
    }
}

fn function_inner(attrs: &FunctionAttrs, input: &ItemFn) -> syn::Result<TokenStream2> {
    let sig = &input.sig;
    let fn_name = &sig.ident;
    let fn_vis = &input.vis;

    check_signature(input)?;

    let param_types: Vec<&Type> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(&*pat_type.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let arity = param_types.len();
    let default_count = attrs.defaults.len();
    if default_count > arity {
        let span = attrs
            .defaults_ident
            .as_ref()
            .map_or_else(Span::call_site, |ident| ident.span());
        return Err(syn::Error::new(
            span,
            format!(
                "`{fn_name}` takes {arity} parameter(s) but {default_count} default value(s) were given"
            ),
        ));
    }
    let first_optional = arity - default_count;

    let mut reads = Vec::with_capacity(arity);
    let mut call_args = Vec::with_capacity(arity);
    let mut outputs = Vec::new();

    for (index, ty) in param_types.iter().enumerate() {
        let position = index + 1;
        let kind = ParamKind::classify(ty);
        let stored = kind.stored_type();
        let local = format_ident!("__arg{}", index);

        let default: Option<&Expr> = index
            .checked_sub(first_optional)
            .and_then(|offset| attrs.defaults.get(offset));

        let read = match default {
            Some(expr) => quote_spanned! {expr.span()=>
                __args.read_or::<#stored, _>(#position, &(#expr))?
            },
            None => quote! { __args.read::<#stored>(#position)? },
        };

        let binding = if kind.is_output() {
            quote!(let mut #local)
        } else {
            quote!(let #local)
        };
        reads.push(quote! { #binding: #stored = #read; });

        call_args.push(match &kind {
            ParamKind::Value(_) | ParamKind::Borrowed(_) => quote!(#local),
            ParamKind::Shared(_) => quote!(&#local),
            ParamKind::Alias(_) => quote!(&mut #local),
            ParamKind::OptionalAlias(_) => quote!(#local.as_mut()),
        });

        if kind.is_output() {
            outputs.push(local);
        }
    }

    let entry_name = format_ident!("__stackbind_entry_{}", fn_name);

    Ok(quote! {
        #input

        #[doc(hidden)]
        #[allow(unused_mut, non_snake_case, clippy::let_unit_value)]
        #fn_vis fn #entry_name(
            frame: &mut ::stackbind_core::CallFrame<'_>,
        ) -> ::core::result::Result<usize, ::stackbind_core::NativeError> {
            let (__args, mut __results) = frame.split();
            #(#reads)*
            let __ret = #fn_name(#(#call_args),*);
            let mut __count = ::stackbind_core::IntoResults::push_results(__ret, &mut __results)?;
            #(
                __count += ::stackbind_core::IntoResults::push_results(#outputs, &mut __results)?;
            )*
            ::core::result::Result::Ok(__count)
        }
    })
}

/// Reject signatures the engine's calling convention cannot express.
fn check_signature(input: &ItemFn) -> syn::Result<()> {
    let sig = &input.sig;

    if let Some(receiver) = sig.receiver() {
        return Err(syn::Error::new_spanned(
            receiver,
            "methods cannot be exposed directly; wrap the call in a free function",
        ));
    }

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "async functions cannot be exposed; native calls complete synchronously",
        ));
    }

    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(
            variadic,
            "variadic functions cannot be exposed",
        ));
    }

    for param in &sig.generics.params {
        if !matches!(param, GenericParam::Lifetime(_)) {
            return Err(syn::Error::new_spanned(
                param,
                "generic functions cannot be exposed; write a concrete wrapper instead",
            ));
        }
    }

    let return_type = match &sig.output {
        ReturnType::Type(_, ty) => Some(&**ty),
        ReturnType::Default => None,
    };
    let param_types = sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => Some(&*pat_type.ty),
        FnArg::Receiver(_) => None,
    });

    for ty in param_types.clone() {
        let (target, mutable) = match ty {
            Type::Reference(reference) => (&*reference.elem, reference.mutability.is_some()),
            _ => match option_inner(ty) {
                Some(Type::Reference(reference)) if reference.mutability.is_some() => {
                    (&*reference.elem, true)
                }
                _ => continue,
            },
        };
        if is_unsized(target) && (mutable || !is_borrowable(target)) {
            return Err(syn::Error::new_spanned(
                ty,
                "only `&str` and `&[u8]` can borrow from a script value; \
                 take an owned `String`, `Vec<T>` or `ArrayView<T>` instead",
            ));
        }
    }

    for ty in param_types.chain(return_type) {
        if let Some(found) = find_char(ty) {
            return Err(syn::Error::new_spanned(
                found,
                "`char` has no script representation; use `u32` or a string instead",
            ));
        }
        if has_impl_trait(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                "`impl Trait` cannot be exposed; name a concrete type",
            ));
        }
    }

    Ok(())
}
