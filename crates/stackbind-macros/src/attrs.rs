//! Attribute parsing for `#[function(...)]`.

use syn::{
    Expr, Ident, Token, parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

/// Parsed `#[function(...)]` attributes.
#[derive(Default)]
pub struct FunctionAttrs {
    /// Default values for the trailing parameters, in order.
    pub defaults: Vec<Expr>,
    /// The `defaults` keyword, for error spans.
    pub defaults_ident: Option<Ident>,
}

impl Parse for FunctionAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = FunctionAttrs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "defaults" => {
                    if attrs.defaults_ident.is_some() {
                        return Err(syn::Error::new(ident.span(), "duplicate `defaults`"));
                    }
                    let content;
                    parenthesized!(content in input);
                    let exprs = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
                    attrs.defaults = exprs.into_iter().collect();
                    attrs.defaults_ident = Some(ident);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown function attribute `{other}`; expected `defaults(...)`"),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(attrs)
    }
}
