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

//! Derive support for `rowcast::Mapped`.

mod comm;
mod mapped_derive;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

/// Describe a struct to the mapping compiler.
/// ```ignore
/// /// Annotion Support: mapped (default, alias, unnamed, skip)
/// #[derive(Mapped, Default)]
/// #[mapped(default)]
/// struct SystemUser {
///     id: i64,
///     #[mapped(alias = "user_name")]
///     username: String,
///     #[mapped(skip)]
///     cached: Option<String>,
/// }
/// ```
///
/// A memberwise constructor `new` is always described. With
/// `#[mapped(default)]` the struct is also built with `Default` and its fields
/// assigned as properties, which lets nested and optional child objects map.
#[proc_macro_derive(Mapped, attributes(mapped))]
#[proc_macro_error]
pub fn to_mapped(input: TokenStream) -> TokenStream {
    mapped_derive::impl_mapped(input)
}
