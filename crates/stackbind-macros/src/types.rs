//! Type inspection helpers shared by the macros.

use syn::{GenericArgument, Lifetime, PathArguments, Type, visit_mut::VisitMut};

/// Find a `char` anywhere inside `ty`.
pub fn find_char(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(path) => {
            let last = path.path.segments.last()?;
            if path.qself.is_none() && path.path.segments.len() == 1 && last.ident == "char" {
                return Some(ty);
            }
            match &last.arguments {
                PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
                    GenericArgument::Type(inner) => find_char(inner),
                    _ => None,
                }),
                _ => None,
            }
        }
        Type::Reference(reference) => find_char(&reference.elem),
        Type::Tuple(tuple) => tuple.elems.iter().find_map(find_char),
        Type::Array(array) => find_char(&array.elem),
        Type::Slice(slice) => find_char(&slice.elem),
        Type::Paren(paren) => find_char(&paren.elem),
        Type::Group(group) => find_char(&group.elem),
        _ => None,
    }
}

/// Whether `ty` mentions `impl Trait`.
pub fn has_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Reference(reference) => has_impl_trait(&reference.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(has_impl_trait),
        Type::Paren(paren) => has_impl_trait(&paren.elem),
        Type::Group(group) => has_impl_trait(&group.elem),
        Type::Path(path) => path.path.segments.iter().any(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                GenericArgument::Type(inner) => has_impl_trait(inner),
                _ => false,
            }),
            _ => false,
        }),
        _ => false,
    }
}

/// The inner type when `ty` is `Option<X>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// Whether `ty` is `str` or `[u8]`, the slot-borrowable targets.
pub fn is_borrowable(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("str"),
        Type::Slice(slice) => {
            matches!(&*slice.elem, Type::Path(path) if path.qself.is_none() && path.path.is_ident("u8"))
        }
        _ => false,
    }
}

/// Whether `ty` is dynamically sized, so no local can hold it.
pub fn is_unsized(ty: &Type) -> bool {
    match ty {
        Type::Slice(_) | Type::TraitObject(_) => true,
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("str"),
        Type::Paren(paren) => is_unsized(&paren.elem),
        Type::Group(group) => is_unsized(&group.elem),
        _ => false,
    }
}

/// Replace every named lifetime with `'_` so the type can be spelled inside
/// the generated entry point, where the function's lifetimes do not exist.
pub fn erase_lifetimes(ty: &Type) -> Type {
    struct Eraser;

    impl VisitMut for Eraser {
        fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
            if lifetime.ident != "static" {
                *lifetime = Lifetime::new("'_", lifetime.apostrophe);
            }
        }
    }

    let mut ty = ty.clone();
    Eraser.visit_type_mut(&mut ty);
    ty
}
