//! # sectorguide Derive Macros
//!
//! This crate provides the `JsonSchema` derive macro used by sectorguide to describe its
//! record shapes (sectors, tools, comparisons) as JSON schemas at compile time.
//!
//! ## Field Rules
//!
//! - Every named field becomes an entry in `properties`.
//! - A field is listed in `required` unless its type is `Option<_>` or it carries
//!   `#[serde(default)]`.
//! - `#[schema(...)]` adds constraints to the field schema:
//!   `description = "..."`, `minimum = N`, `maximum = N`, `min_length = N`, `format = "..."`.
//!
//! ### Example
//!
//! ```rust,ignore
//! use sectorguide::JsonSchema;
//!
//! #[derive(sectorguide_derive::JsonSchema)]
//! struct Review {
//!     #[schema(description = "Reviewer name", min_length = 1)]
//!     author: String,
//!     #[schema(minimum = 0, maximum = 5)]
//!     score: Option<f64>,
//! }
//!
//! let schema = Review::json_schema();
//! assert_eq!(schema["type"], "object");
//! assert_eq!(schema["title"], "Review");
//! assert_eq!(schema["required"], serde_json::json!(["author"]));
//! ```
//!
//! Only structs with named fields are supported.

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use syn::{DeriveInput, Lit, Meta, NestedMeta, parse_macro_input};

use derive_util::StructVisitor;

/// Derive the JsonSchema trait for structs with named fields.
#[proc_macro_derive(JsonSchema, attributes(schema))]
pub fn derive_json_schema(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ty_name = input.ident;
    let title = ty_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let schema_gen = match input.data {
        syn::Data::Struct(ref ds) => {
            let mut jsv = JsonSchemaStructVisitor;
            let (value, required) = jsv.visit_struct(&ty_name, ds);
            quote! {
                let mut result = serde_json::json!({});
                let mut properties = serde_json::json!({});
                #value
                result["title"] = #title.into();
                result["type"] = "object".into();
                result["properties"] = properties;
                result["required"] = serde_json::Value::Array(vec![]);
                #required
                result
            }
        }
        syn::Data::Enum(_) => {
            panic!("enums are not supported");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let generated = quote! {
        impl #impl_generics sectorguide::JsonSchema for #ty_name #ty_generics #where_clause {
            fn json_schema() -> serde_json::Value {
                #schema_gen
            }
        }
    };
    generated.into()
}

///////////////////////////////////////// JsonSchemaStructVisitor ////////////////////////////////////////

struct JsonSchemaStructVisitor;

impl StructVisitor for JsonSchemaStructVisitor {
    type Output = (TokenStream, TokenStream);

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        fields: &syn::FieldsNamed,
    ) -> Self::Output {
        let mut result = quote! {};
        let mut required = quote! {};
        for field in fields.named.iter() {
            if let Some(field_ident) = &field.ident {
                let field_ident = field_ident.to_string();
                let field_ident = if let Some(field_ident) = field_ident.strip_prefix("r#") {
                    field_ident.to_string()
                } else {
                    field_ident.clone()
                };
                let field_type = field.ty.clone();
                let serde_default = has_serde_default(field);
                let constraints = FieldConstraints::from_field(field).into_tokens();
                let default = if serde_default {
                    quote! {
                        if let Ok(default) = serde_json::to_value(
                            <#field_type as ::core::default::Default>::default(),
                        ) {
                            constraints.insert("default".to_string(), default);
                        }
                    }
                } else {
                    quote! {}
                };
                result = quote! {
                    #result
                    {
                        let mut field_schema = <#field_type as sectorguide::JsonSchema>::json_schema();
                        let mut constraints = serde_json::Map::new();
                        #constraints
                        #default
                        sectorguide::apply_constraints(&mut field_schema, constraints);
                        properties[#field_ident] = field_schema;
                    }
                };
                if !serde_default && !is_option(&field.ty) {
                    required = quote! {
                        #required
                        if let Some(serde_json::Value::Array(arr)) = result.get_mut("required") {
                            arr.push(#field_ident.into())
                        }
                    };
                }
            }
        }
        (result, required)
    }
}

////////////////////////////////////////// FieldConstraints //////////////////////////////////////////

#[derive(Default)]
struct FieldConstraints {
    description: Option<String>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    min_length: Option<u64>,
    format: Option<String>,
}

impl FieldConstraints {
    fn from_field(field: &syn::Field) -> Self {
        let mut constraints = Self::default();
        for attr in field.attrs.iter().filter(|a| a.path.is_ident("schema")) {
            let meta = match attr.parse_meta() {
                Ok(Meta::List(list)) => list,
                _ => panic!("expected #[schema(key = value, ...)]"),
            };
            for nested in meta.nested.iter() {
                let nv = match nested {
                    NestedMeta::Meta(Meta::NameValue(nv)) => nv,
                    _ => panic!("expected key = value inside #[schema(...)]"),
                };
                let key = nv
                    .path
                    .get_ident()
                    .map(|i| i.to_string())
                    .unwrap_or_default();
                match key.as_str() {
                    "description" => constraints.description = Some(lit_to_string(&nv.lit)),
                    "minimum" => constraints.minimum = Some(lit_to_f64(&nv.lit)),
                    "maximum" => constraints.maximum = Some(lit_to_f64(&nv.lit)),
                    "min_length" => constraints.min_length = Some(lit_to_u64(&nv.lit)),
                    "format" => constraints.format = Some(lit_to_string(&nv.lit)),
                    other => panic!("unknown schema attribute: {}", other),
                }
            }
        }
        constraints
    }

    fn into_tokens(self) -> TokenStream {
        let mut tokens = quote! {};
        if let Some(description) = self.description {
            tokens = quote! {
                #tokens
                constraints.insert("description".to_string(), serde_json::json!(#description));
            };
        }
        if let Some(minimum) = self.minimum {
            tokens = quote! {
                #tokens
                constraints.insert("minimum".to_string(), serde_json::json!(#minimum));
            };
        }
        if let Some(maximum) = self.maximum {
            tokens = quote! {
                #tokens
                constraints.insert("maximum".to_string(), serde_json::json!(#maximum));
            };
        }
        if let Some(min_length) = self.min_length {
            tokens = quote! {
                #tokens
                constraints.insert("minLength".to_string(), serde_json::json!(#min_length));
            };
        }
        if let Some(format) = self.format {
            tokens = quote! {
                #tokens
                constraints.insert("format".to_string(), serde_json::json!(#format));
            };
        }
        tokens
    }
}

fn lit_to_string(lit: &Lit) -> String {
    match lit {
        Lit::Str(s) => s.value(),
        _ => panic!("expected a string literal"),
    }
}

fn lit_to_f64(lit: &Lit) -> f64 {
    match lit {
        Lit::Int(i) => i.base10_parse::<f64>().expect("invalid numeric literal"),
        Lit::Float(f) => f.base10_parse::<f64>().expect("invalid numeric literal"),
        _ => panic!("expected a numeric literal"),
    }
}

fn lit_to_u64(lit: &Lit) -> u64 {
    match lit {
        Lit::Int(i) => i.base10_parse::<u64>().expect("invalid integer literal"),
        _ => panic!("expected an integer literal"),
    }
}

fn has_serde_default(field: &syn::Field) -> bool {
    field
        .attrs
        .iter()
        .filter(|a| a.path.is_ident("serde"))
        .filter_map(|a| match a.parse_meta() {
            Ok(Meta::List(list)) => Some(list),
            _ => None,
        })
        .any(|list| {
            list.nested.iter().any(|nested| {
                matches!(nested, NestedMeta::Meta(Meta::Path(p)) if p.is_ident("default"))
                    || matches!(nested, NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("default"))
            })
        })
}

fn is_option(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(tp) => tp
            .path
            .segments
            .last()
            .map(|s| s.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}
