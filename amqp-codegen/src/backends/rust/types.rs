// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mapping of wire types to Rust types and integer accessors.

use crate::analyzer::WireType;
use quote::{format_ident, quote};

/// Return the Rust type representing values of the wire type.
pub fn rust_type(wire_type: WireType) -> proc_macro2::TokenStream {
    match wire_type {
        WireType::Bit => quote!(bool),
        WireType::Octet | WireType::ShortShort => quote!(u8),
        WireType::Short => quote!(u16),
        WireType::Long => quote!(u32),
        WireType::LongLong => quote!(u64),
        WireType::Timestamp => quote!(Timestamp),
        WireType::Table => quote!(FieldTable),
        WireType::ShortStr => quote!(String),
        WireType::LongStr => quote!(Vec<u8>),
    }
}

/// Generate a big-endian read of a fixed width integer.
pub fn get_uint(width: usize, buf: &proc_macro2::Ident) -> proc_macro2::TokenStream {
    let get_u = format_ident!("get_u{}", width * 8);
    quote! {
        #buf.#get_u()
    }
}

/// Generate a big-endian write of a fixed width integer.
pub fn put_uint(
    width: usize,
    value: &proc_macro2::TokenStream,
    buf: &proc_macro2::Ident,
) -> proc_macro2::TokenStream {
    let put_u = format_ident!("put_u{}", width * 8);
    quote! {
        #buf.#put_u(#value)
    }
}
