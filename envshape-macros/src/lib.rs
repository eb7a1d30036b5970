//! Procedural macros for envshape
//!
//! This crate provides the `#[derive(Environment)]` macro for declaring
//! environment shapes together with their per-field transform annotations.

use darling::{FromDeriveInput, FromField, FromMeta, ast, util};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, DeriveInput, Ident, LitStr, Type, ext::IdentExt, meta::ParseNestedMeta,
    parse_macro_input,
};

/// Arguments for `#[env(transform(...))]`
#[derive(Debug, Default, FromMeta)]
struct TransformArgs {
    /// Parse the raw value as JSON instead of splitting it
    #[darling(default)]
    to_class: bool,
    /// Split separator (default ",")
    #[darling(default)]
    separator: Option<String>,
}

#[derive(Debug, FromField)]
#[darling(attributes(env), forward_attrs(serde))]
struct FieldArgs {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
    /// Override for the environment variable name
    #[darling(default)]
    name: Option<String>,
    /// `transform` alone means "split on comma"
    #[darling(default)]
    transform: Option<util::Override<TransformArgs>>,
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(env), supports(struct_named), forward_attrs(serde))]
struct ShapeArgs {
    ident: Ident,
    generics: syn::Generics,
    attrs: Vec<Attribute>,
    data: ast::Data<util::Ignored, FieldArgs>,
}

/// Derive macro for environment shapes.
///
/// This macro generates:
/// - `EnvironmentShape` trait implementation carrying the per-field transform table
/// - One `EnvKey` associated constant per field (field name upper-cased) for typed lookups
///
/// The environment variable name of a field is `#[env(name = "...")]` when
/// given, otherwise the key serde deserializes it from (`#[serde(rename)]`,
/// then the container's `#[serde(rename_all)]`, then the field name).
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Deserialize, Validate, Environment)]
/// #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// pub struct AppEnv {
///     pub node_env: NodeEnv,
///     #[serde(default = "default_port")]
///     pub port: u16,
///     /// "1.1.1.1,2.2.2.2"
///     #[env(transform)]
///     pub allowed_ips: Vec<IpAddr>,
///     /// '{"host":"db","port":"5432"}'
///     #[env(transform(to_class))]
///     #[validate(nested)]
///     pub database: DatabaseEnv,
/// }
///
/// let port: &u16 = service.get(AppEnv::PORT);
/// ```
#[proc_macro_derive(Environment, attributes(env))]
pub fn derive_environment(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match ShapeArgs::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    TokenStream::from(impl_environment(args, &input))
}

fn impl_environment(args: ShapeArgs, input: &DeriveInput) -> TokenStream2 {
    if !args.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "Environment cannot be derived for generic structs",
        )
        .to_compile_error();
    }

    let struct_name = &args.ident;

    let rename_all = match serde_rename_all(&args.attrs) {
        Ok(rule) => rule,
        Err(e) => return e.to_compile_error(),
    };

    let Some(fields) = args.data.take_struct() else {
        return syn::Error::new_spanned(input, "Environment only supports structs")
            .to_compile_error();
    };

    let mut names = Vec::new();
    let mut transforms = Vec::new();
    let mut keys = Vec::new();

    for field in fields.fields {
        let Some(ident) = field.ident else {
            return syn::Error::new_spanned(
                input,
                "Environment only supports structs with named fields",
            )
            .to_compile_error();
        };

        let plain = ident.unraw().to_string();
        let serde_name = match serde_rename(&field.attrs) {
            Ok(name) => name,
            Err(e) => return e.to_compile_error(),
        };
        let env_name = match (field.name, serde_name) {
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) => rename_all.apply(&plain),
        };
        let const_ident = format_ident!("{}", plain.to_uppercase());
        let ty = &field.ty;
        let doc = format!("Lookup key for the `{}` variable.", env_name);

        keys.push(quote! {
            #[doc = #doc]
            pub const #const_ident: ::envshape::EnvKey<#struct_name, #ty> =
                ::envshape::EnvKey::new(#env_name, {
                    fn access(env: &#struct_name) -> &#ty {
                        &env.#ident
                    }
                    access
                });
        });

        if let Some(transform) = field.transform {
            let transform = transform.unwrap_or_default();
            let to_class = transform.to_class;
            let separator = match transform.separator {
                Some(sep) => quote! { ::std::option::Option::Some(::std::string::String::from(#sep)) },
                None => quote! { ::std::option::Option::None },
            };
            transforms.push(quote! {
                .with(#env_name, ::envshape::TransformOptions {
                    to_class: #to_class,
                    separator: #separator,
                })
            });
        }

        names.push(env_name);
    }

    quote! {
        impl ::envshape::EnvironmentShape for #struct_name {
            fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn field_transforms() -> ::envshape::FieldTransforms {
                ::envshape::FieldTransforms::new()
                    #(#transforms)*
            }
        }

        impl #struct_name {
            #(#keys)*
        }
    }
}

/// Container-level `rename_all` rule, as serde applies it to field names
#[derive(Debug, Clone, Copy, Default)]
enum RenameRule {
    #[default]
    None,
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("Unknown rename_all rule: {}", other),
                ));
            }
        })
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None | RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => pascal_case(field),
            RenameRule::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Read `rename_all = "..."` or `rename_all(deserialize = "...")`
fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in attrs {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if let Some(lit) = deserialize_name(&meta)? {
                    rule = RenameRule::from_lit(&lit)?;
                }
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(rule)
}

/// Read `rename = "..."` or `rename(deserialize = "...")`
fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(lit) = deserialize_name(&meta)? {
                    name = Some(lit.value());
                }
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(name)
}

/// The deserialize-side value of `key = "..."` or `key(serialize = .., deserialize = ..)`
fn deserialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(syn::Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }
    let mut found = None;
    meta.parse_nested_meta(|inner| {
        let lit: LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("deserialize") {
            found = Some(lit);
        }
        Ok(())
    })?;
    Ok(found)
}

/// Consume a serde option this macro does not care about
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_rules_match_serde() {
        assert_eq!(RenameRule::None.apply("allowed_ips"), "allowed_ips");
        assert_eq!(RenameRule::ScreamingSnake.apply("allowed_ips"), "ALLOWED_IPS");
        assert_eq!(RenameRule::Camel.apply("allowed_ips"), "allowedIps");
        assert_eq!(RenameRule::Pascal.apply("allowed_ips"), "AllowedIps");
        assert_eq!(RenameRule::Kebab.apply("allowed_ips"), "allowed-ips");
        assert_eq!(RenameRule::ScreamingKebab.apply("allowed_ips"), "ALLOWED-IPS");
    }

    fn serde_attrs(attrs: Vec<Attribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .filter(|a| a.path().is_ident("serde"))
            .collect()
    }

    fn first_field_attrs(input: DeriveInput) -> Vec<Attribute> {
        match input.data {
            syn::Data::Struct(data) => {
                serde_attrs(data.fields.into_iter().next().unwrap().attrs)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_serde_rename_is_read() {
        let input: DeriveInput = syn::parse_quote! {
            struct Shape {
                #[serde(default = "default_hosts", rename = "UPSTREAM_HOSTS")]
                hosts: Vec<String>,
            }
        };
        let attrs = first_field_attrs(input);
        assert_eq!(serde_rename(&attrs).unwrap().as_deref(), Some("UPSTREAM_HOSTS"));

        let input: DeriveInput = syn::parse_quote! {
            struct Shape {
                #[serde(rename(serialize = "out", deserialize = "IN_HOSTS"), default)]
                hosts: Vec<String>,
            }
        };
        let attrs = first_field_attrs(input);
        assert_eq!(serde_rename(&attrs).unwrap().as_deref(), Some("IN_HOSTS"));
    }

    #[test]
    fn test_serde_without_rename() {
        let input: DeriveInput = syn::parse_quote! {
            struct Shape {
                #[serde(default, with = "humantime")]
                hosts: Vec<String>,
            }
        };
        assert_eq!(serde_rename(&first_field_attrs(input)).unwrap(), None);
    }

    #[test]
    fn test_serde_rename_all_is_read() {
        let input: DeriveInput = syn::parse_quote! {
            #[derive(Deserialize)]
            #[serde(deny_unknown_fields, rename_all = "camelCase")]
            struct Shape { allowed_ips: Vec<String> }
        };
        let rule = serde_rename_all(&serde_attrs(input.attrs)).unwrap();
        assert_eq!(rule.apply("allowed_ips"), "allowedIps");
    }

    #[test]
    fn test_unknown_rename_all_rule() {
        let input: DeriveInput = syn::parse_quote! {
            #[serde(rename_all = "Train-Case")]
            struct Shape { allowed_ips: Vec<String> }
        };
        assert!(serde_rename_all(&serde_attrs(input.attrs)).is_err());
    }
}
