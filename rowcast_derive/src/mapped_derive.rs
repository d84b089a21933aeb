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

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput};
use crate::comm::{collect_field_info, find_mapped_annotations, rowcast_path, MappedExtra};

pub fn impl_mapped(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as DeriveInput);
    build_mapped(&derive_input).into()
}

fn build_mapped(ast: &DeriveInput) -> proc_macro2::TokenStream {
    let krate = rowcast_path();
    let ident = &ast.ident;
    let fields = collect_field_info(ast);
    let with_default = find_mapped_annotations(&ast.attrs).contains(&MappedExtra::Default);

    let mut generics = ast.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#krate::Mapped));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mapped: Vec<_> = fields.iter().filter(|f| !f.is_skipped()).collect();
    let params = mapped.iter().map(|f| {
        let (ty, name) = (&f.ty, &f.name);
        quote!(.param::<#ty>(#name))
    });
    let assigned = mapped.iter().map(|f| {
        let (field, ty) = (&f.ident, &f.ty);
        quote!(#field: __args.next::<#ty>()?,)
    });
    let skipped = fields.iter().filter(|f| f.is_skipped()).map(|f| {
        let field = &f.ident;
        quote!(#field: ::std::default::Default::default(),)
    });
    let properties = mapped.iter().map(|f| {
        let (field, ty, name) = (&f.ident, &f.ty, &f.name);
        let alias = f.alias().map(|alias| quote!(.alias(#alias)));
        let unnamed = if f.is_unnamed() { Some(quote!(.unnamed())) } else { None };
        quote!(
            .property(#krate::Property::new(#name, |target: &mut Self, value: #ty| target.#field = value) #alias #unnamed)
        )
    });
    let default = if with_default { Some(quote!(.default_constructor())) } else { None };

    quote!(
        impl #impl_generics #krate::Mapped for #ident #ty_generics #where_clause {
            fn shape() -> #krate::Shape {
                #krate::ObjectShape::builder::<Self>()
                    .constructor(
                        #krate::Constructor::new::<Self>("new")
                            #(#params)*
                            .build(|__args| ::std::result::Result::Ok(Self {
                                #(#assigned)*
                                #(#skipped)*
                            }))
                    )
                    #default
                    #(#properties)*
                    .build()
            }
        }
    )
}
