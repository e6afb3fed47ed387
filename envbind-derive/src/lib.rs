//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

mod attrs;

use attrs::{FieldAttrs, FieldKind, StructAttrs};

/// `Populate` derive macro
///
/// Implements `envbind::Populate`, walking the struct's fields in declaration
/// order.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(prefix = "APP")]`: base prefix used by `Populate::from_env()`
///
/// **Field-level**:
/// - `#[env("key[,required][,omitprefix]")]`: leaf field read from `KEY`
/// - `#[env("nested:suffix")]` or `#[env("prefix:suffix")]`: nested record
///   scoped under `SUFFIX`
/// - `default = "value"`: literal used when the variable is absent or empty
/// - `format = "..."`: `time:...`, `file:...`, `json` or `yaml`
///
/// Untagged fields are recursed into when their type implements `Populate`
/// and skipped otherwise.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(Populate, attributes(env))]
pub fn derive_populate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;
    let prefix = &struct_attrs.prefix;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Populate only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Populate only supports structs",
            ));
        }
    };

    let steps = fields
        .iter()
        .map(field_step)
        .collect::<syn::Result<Vec<_>>>()?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envbind::Populate for #struct_name #ty_generics #where_clause {
            const PREFIX: &'static str = #prefix;

            #[allow(clippy::needless_borrow)]
            fn populate(
                &mut self,
                __scope: &::envbind::Scope<'_>,
            ) -> ::core::result::Result<(), ::envbind::Error> {
                #(#steps)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn field_step(field: &Field) -> syn::Result<TokenStream2> {
    let attrs = FieldAttrs::from_field(field)?;
    attrs.validate(field)?;

    let ident = field.ident.as_ref().ok_or_else(|| {
        syn::Error::new_spanned(field, "Populate only supports structs with named fields")
    })?;
    let field_type = &field.ty;

    let name = ident.to_string();
    let tag = attrs.tag.as_deref().unwrap_or_default();
    let format = attrs.format.as_deref().unwrap_or_default();
    let default = match &attrs.default {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    };
    let descriptor = quote! {
        ::envbind::FieldDescriptor {
            name: #name,
            tag: #tag,
            format: #format,
            default: #default,
        }
    };

    Ok(match attrs.kind() {
        FieldKind::Leaf => quote! {
            __scope.leaf(&mut self.#ident, &#descriptor)?;
        },
        FieldKind::Nested => quote! {
            __scope.nested(&mut self.#ident, &#descriptor)?;
        },
        FieldKind::Probe => quote! {
            {
                #[allow(unused_imports)]
                use ::envbind::__private::{ViaPopulate as _, ViaSkip as _};
                (&&::envbind::__private::Probe::<#field_type>::new())
                    .visit(&mut self.#ident, __scope, &#descriptor)?;
            }
        },
    })
}
