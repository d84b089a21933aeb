/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use proc_macro2::{Span, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use proc_macro_error::abort;
use quote::quote;
use syn::spanned::Spanned;

#[derive(Debug, Clone, PartialEq)]
pub enum MappedExtra {
    Default,
    Alias(String),
    Unnamed,
    Skip,
}

#[derive(Debug)]
pub struct FieldInformation {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    pub name: String,
    pub extra: Vec<MappedExtra>,
}

impl FieldInformation {
    pub fn is_skipped(&self) -> bool {
        self.extra.contains(&MappedExtra::Skip)
    }

    pub fn alias(&self) -> Option<&str> {
        self.extra.iter().find_map(|extra| match extra {
            MappedExtra::Alias(alias) => Some(alias.as_str()),
            _ => None,
        })
    }

    pub fn is_unnamed(&self) -> bool {
        self.extra.contains(&MappedExtra::Unnamed)
    }
}

/// Path of the `rowcast` crate as seen from the deriving crate.
pub fn rowcast_path() -> TokenStream {
    match crate_name("rowcast") {
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        _ => quote!(::rowcast),
    }
}

/// Parses every `#[mapped(..)]` attribute in `attrs`.
pub fn find_mapped_annotations(attrs: &[syn::Attribute]) -> Vec<MappedExtra> {
    let mut extras = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path.is_ident("mapped")) {
        let meta = match attr.parse_meta() {
            Ok(meta) => meta,
            Err(err) => abort!(err.span(), "Invalid #[mapped] attribute: {}", err),
        };
        let list = match meta {
            syn::Meta::List(list) => list,
            other => abort!(other.span(), "expected #[mapped(...)]"),
        };
        for nested in list.nested.iter() {
            match nested {
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("default") => extras.push(MappedExtra::Default),
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("unnamed") => extras.push(MappedExtra::Unnamed),
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("skip") => extras.push(MappedExtra::Skip),
                syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("alias") => match &nv.lit {
                    syn::Lit::Str(s) => extras.push(MappedExtra::Alias(s.value())),
                    other => abort!(other.span(), "alias must be a string"),
                },
                other => abort!(
                    other.span(),
                    "unknown mapped option";
                    help = "supported options: default, alias = \"..\", unnamed, skip"
                ),
            }
        }
    }
    extras
}

/// Named fields of the struct with their annotations.
pub fn collect_field_info(ast: &syn::DeriveInput) -> Vec<FieldInformation> {
    let fields = match ast.data {
        syn::Data::Struct(syn::DataStruct { fields: syn::Fields::Named(ref fields), .. }) => fields,
        syn::Data::Struct(_) => abort!(
            ast.span(),
            "struct has unnamed fields";
            help = "#[derive(Mapped)] can only be used on structs with named fields";
        ),
        _ => abort!(ast.span(), "#[derive(Mapped)] can only be used with structs"),
    };
    fields
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.clone()?;
            let name = ident.to_string().trim_start_matches("r#").to_string();
            let extra = find_mapped_annotations(&field.attrs);
            if extra.contains(&MappedExtra::Default) {
                abort!(field.span(), "`default` is a struct option, not a field option");
            }
            Some(FieldInformation { ident, ty: field.ty.clone(), name, extra })
        })
        .collect()
}
