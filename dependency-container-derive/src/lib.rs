//! Derive macro for dependency-container
//!
//! `#[derive(Activatable)]` generates the constructor descriptor of a
//! struct from its fields, so the container can build it without a
//! hand-written `constructors()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dependency_container::{Activatable, Container, Strategy};
//! use std::sync::Arc;
//!
//! struct Config { url: String }
//!
//! #[derive(Activatable)]
//! struct Repository {
//!     config: Arc<Config>,
//!     // Built with Default::default()
//!     #[activate(default)]
//!     queries: std::sync::atomic::AtomicU64,
//! }
//!
//! let container = Container::new();
//! container.register_instance(Config { url: "postgres://localhost".into() })?;
//! container.register_type::<Repository>(Strategy::Singleton)?;
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Type};

/// Derive macro for the `Activatable` trait.
///
/// Generates one public constructor whose parameters are the struct's
/// `Arc<T>` fields, in declaration order. Each parameter is named after its
/// field, so resolution errors point at the field.
///
/// # Attributes
///
/// - *(none)* - the field must be `Arc<T>`; `T` is resolved from the container.
/// - `#[activate(default)]` - the field is built with `Default::default()`.
/// - `#[activate(creatable)]` - like a plain `Arc<T>` field, but `T` is created
///   ad hoc when it is not registered. `T` must itself be `Activatable`.
///
/// Unit structs get a parameterless constructor.
///
/// # Generated Code
///
/// ```rust,ignore
/// #[derive(Activatable)]
/// struct UserService {
///     db: Arc<Database>,
///     #[activate(default)]
///     hits: AtomicU64,
/// }
///
/// // impl Activatable for UserService {
/// //     fn constructors() -> Vec<Constructor<Self>> {
/// //         vec![Constructor::new(
/// //             vec![Param::named::<Database>("db")],
/// //             |args| Ok(Self { db: args.next::<Database>()?, hits: Default::default() }),
/// //         )]
/// //     }
/// // }
/// ```
#[proc_macro_derive(Activatable, attributes(activate))]
pub fn derive_activatable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Some(&fields.named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Activatable can only be derived for structs with named fields or unit structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Activatable can only be derived for structs",
            ));
        }
    };

    let mut params = Vec::new();
    let mut bindings = Vec::new();
    let mut field_inits = Vec::new();

    for field in fields.into_iter().flatten() {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;
        let label = field_name.to_string();

        match find_activate_attr(&field.attrs)? {
            FieldKind::Default => {
                field_inits.push(quote! {
                    #field_name: ::core::default::Default::default()
                });
            }
            kind => {
                let inner = extract_arc_inner_type(field_type).ok_or_else(|| {
                    syn::Error::new_spanned(
                        field_type,
                        "Activatable fields must have type Arc<T> \
                         or be marked #[activate(default)]",
                    )
                })?;

                params.push(match kind {
                    FieldKind::Creatable => quote! {
                        ::dependency_container::Param::creatable::<#inner>().with_name(#label)
                    },
                    _ => quote! {
                        ::dependency_container::Param::named::<#inner>(#label)
                    },
                });
                bindings.push(quote! {
                    let #field_name: ::std::sync::Arc<#inner> = __args.next::<#inner>()?;
                });
                field_inits.push(quote! { #field_name });
            }
        }
    }

    let construct = if fields.is_some() {
        quote! { Self { #(#field_inits),* } }
    } else {
        quote! { Self }
    };

    Ok(quote! {
        impl #impl_generics ::dependency_container::Activatable
            for #name #ty_generics #where_clause
        {
            fn constructors() -> ::std::vec::Vec<::dependency_container::Constructor<Self>> {
                ::std::vec![::dependency_container::Constructor::new(
                    ::std::vec![#(#params),*],
                    |__args: &mut ::dependency_container::Arguments| {
                        #(#bindings)*
                        ::core::result::Result::Ok(#construct)
                    },
                )]
            }
        }
    })
}

/// How a field is supplied
enum FieldKind {
    Resolved,
    Creatable,
    Default,
}

/// Find and parse the #[activate] attribute
fn find_activate_attr(attrs: &[Attribute]) -> syn::Result<FieldKind> {
    for attr in attrs {
        if !attr.path().is_ident("activate") {
            continue;
        }

        let option = attr.parse_args::<syn::Ident>()?;
        return if option == "default" {
            Ok(FieldKind::Default)
        } else if option == "creatable" {
            Ok(FieldKind::Creatable)
        } else {
            Err(syn::Error::new_spanned(
                option,
                "expected #[activate(default)] or #[activate(creatable)]",
            ))
        };
    }
    Ok(FieldKind::Resolved)
}

/// Extract T from Arc<T>
fn extract_arc_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Arc" {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}
