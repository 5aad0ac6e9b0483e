//! Implementation of #[derive(Walk)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, GenericParam, Ident, Index,
    LitStr, Token, Visibility,
};

pub fn derive_walk_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// One item inside `#[structs(...)]`
enum StructsArg {
    Raw(LitStr),
    Skip,
    OmitNested,
    Rename(LitStr),
}

impl Parse for StructsArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(StructsArg::Raw(input.parse()?));
        }

        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "skip" => Ok(StructsArg::Skip),
            "omitnested" => Ok(StructsArg::OmitNested),
            "rename" => {
                input.parse::<Token![=]>()?;
                Ok(StructsArg::Rename(input.parse()?))
            }
            other => Err(syn::Error::new(
                ident.span(),
                format!(
                    "unknown structs directive `{}`; expected `skip`, `omitnested`, `rename = \"...\"` or a string literal",
                    other
                ),
            )),
        }
    }
}

#[derive(Default)]
struct FieldAttrs {
    directives: Vec<String>,
    rename: Option<String>,
}

// Parse attributes: #[structs("-,omitnested")], #[structs(skip, rename = "X")]
fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("structs")) {
        let args = attr.parse_args_with(Punctuated::<StructsArg, Token![,]>::parse_terminated)?;
        for arg in args {
            match arg {
                StructsArg::Raw(lit) => parsed.directives.push(lit.value()),
                StructsArg::Skip => parsed.directives.push("-".to_string()),
                StructsArg::OmitNested => parsed.directives.push("omitnested".to_string()),
                StructsArg::Rename(lit) => {
                    if parsed.rename.is_some() {
                        return Err(syn::Error::new_spanned(lit, "duplicate `rename`"));
                    }
                    parsed.rename = Some(lit.value());
                }
            }
        }
    }

    Ok(parsed)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let type_name = name.unraw().to_string();

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Walk can only be derived for structs",
            ));
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Walk cannot be derived for structs with lifetime parameters",
        ));
    }

    // Type parameters must themselves be walkable and 'static for `as_any`
    let mut generics = input.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::structx::Walk));
            ty.bounds.push(parse_quote!(::structx::Describe));
            ty.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut entries = Vec::with_capacity(data.fields.len());
    for (index, field) in data.fields.iter().enumerate() {
        let attrs = parse_field_attrs(&field.attrs)?;

        let (member, field_name) = match &field.ident {
            Some(ident) => (quote!(#ident), ident.unraw().to_string()),
            None => {
                let index = Index::from(index);
                (quote!(#index), index.index.to_string())
            }
        };
        let path_name = attrs.rename.unwrap_or(field_name);
        let raw_tag = attrs.directives.join(",");

        let entry = if matches!(field.vis, Visibility::Inherited) {
            quote! {
                ::structx::StructField::inaccessible(#path_name, ::structx::FieldTag::new(#raw_tag))
            }
        } else {
            quote! {
                ::structx::StructField::new(
                    #path_name,
                    ::structx::FieldTag::new(#raw_tag),
                    &self.#member,
                )
            }
        };
        entries.push(entry);
    }

    Ok(quote! {
        impl #impl_generics ::structx::Describe for #name #ty_generics #where_clause {
            fn describe() -> ::structx::TypeDesc {
                ::structx::TypeDesc::Struct(#type_name)
            }
        }

        impl #impl_generics ::structx::Walk for #name #ty_generics #where_clause {
            fn shape(&self) -> ::structx::Shape<'_> {
                ::structx::Shape::Struct(::structx::StructShape::new(
                    #type_name,
                    ::std::vec![#(#entries),*],
                ))
            }

            fn as_any(&self) -> ::core::option::Option<&dyn ::core::any::Any> {
                ::core::option::Option::Some(self)
            }
        }
    })
}
