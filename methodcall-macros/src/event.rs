//! `#[derive(LogEvent)]` implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

/// A field exposed as a property.
struct PropertyField<'a> {
    name: String,
    field: &'a Field,
}

/// Options read from `#[log(...)]` on a field.
#[derive(Default)]
struct FieldArgs {
    rename: Option<String>,
    skip: bool,
}

impl FieldArgs {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let mut args = FieldArgs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("log") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    args.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.rename = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("unknown attribute, expected `rename` or `skip`"))
                }
            })?;
        }
        Ok(args)
    }
}

/// Implementation of the `#[derive(LogEvent)]` macro.
pub fn derive_log_event_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "LogEvent can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "LogEvent can only be derived for structs",
            ));
        }
    };

    let mut properties: Vec<PropertyField<'_>> = Vec::new();
    for field in fields {
        let args = FieldArgs::from_field(field)?;
        if args.skip {
            continue;
        }
        let property = match args.rename {
            Some(rename) => rename,
            None => match &field.ident {
                Some(ident) => ident.to_string(),
                None => continue,
            },
        };
        if properties.iter().any(|p| p.name == property) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate property name `{property}`"),
            ));
        }
        properties.push(PropertyField {
            name: property,
            field,
        });
    }

    let arms = properties.iter().map(|PropertyField { name, field }| {
        let ident = &field.ident;
        quote! {
            #name => ::core::option::Option::Some(
                ::std::borrow::Cow::Owned(::std::string::ToString::to_string(&self.#ident))
            ),
        }
    });

    Ok(quote! {
        impl #impl_generics ::methodcall::LogEvent for #name #ty_generics #where_clause {
            fn property(&self, name: &str) -> ::core::option::Option<::std::borrow::Cow<'_, str>> {
                match name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
