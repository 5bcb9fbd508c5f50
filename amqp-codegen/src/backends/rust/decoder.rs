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

use crate::analyzer::{Fieldset, WireType};
use crate::ast;
use crate::backends::rust::{field_local_ident, types};
use quote::quote;

/// Generates the parsing of the arguments of one method.
/// Every named field is parsed into a local variable named after the
/// field with the `field_` prefix.
pub(crate) struct FieldParser<'a> {
    method_name: &'a str,
    buf: proc_macro2::Ident,
    pub(crate) tokens: proc_macro2::TokenStream,
    /// Offset of the next bit in the current run of bit fields.
    bit_offset: usize,
}

impl<'a> FieldParser<'a> {
    pub fn new(method_name: &'a str, buf: proc_macro2::Ident) -> FieldParser<'a> {
        FieldParser { method_name, buf, tokens: quote! {}, bit_offset: 0 }
    }

    pub fn parse_fieldset(&mut self, fieldset: &Fieldset<'_>) {
        match fieldset.wire_type {
            WireType::Bit => {
                self.check_size((fieldset.fields.len() + 7) / 8);
                for (index, field) in fieldset.fields.iter().enumerate() {
                    self.parse_bit_field(field, &fieldset.fields[index..]);
                }
                self.bit_offset = 0;
            }
            WireType::Octet
            | WireType::ShortShort
            | WireType::Short
            | WireType::Long
            | WireType::LongLong => {
                let Some(width) = fieldset.wire_type.width() else {
                    unreachable!("{} is not an integer type", fieldset.wire_type)
                };
                self.check_size(width * fieldset.fields.len());
                for field in &fieldset.fields {
                    self.parse_integer_field(width, field);
                }
            }
            WireType::Timestamp => {
                for field in &fieldset.fields {
                    self.parse_field_with(quote!(read_timestamp), field);
                }
            }
            WireType::Table => {
                for field in &fieldset.fields {
                    self.parse_field_with(quote!(read_table), field);
                }
            }
            WireType::ShortStr => {
                for field in &fieldset.fields {
                    self.parse_field_with(quote!(read_shortstr), field);
                }
            }
            WireType::LongStr => {
                for field in &fieldset.fields {
                    self.parse_field_with(quote!(read_longstr), field);
                }
            }
        }
    }

    /// Check that the buffer holds at least `wanted` octets.
    fn check_size(&mut self, wanted: usize) {
        let buf = &self.buf;
        let method_name = self.method_name;
        let wanted = proc_macro2::Literal::usize_unsuffixed(wanted);
        self.tokens.extend(quote! {
            if #buf.remaining() < #wanted {
                return Err(DecodeError::InvalidLengthError {
                    obj: #method_name,
                    wanted: #wanted,
                    got: #buf.remaining(),
                });
            }
        });
    }

    /// Parse one bit field. `remaining` holds the field and the
    /// fields following it in the same run.
    fn parse_bit_field(&mut self, field: &ast::Field, remaining: &[&ast::Field]) {
        let buf = &self.buf;
        let shift = self.bit_offset % 8;
        if shift == 0 {
            // Start of a new octet, skip it when all its bits are reserved.
            if remaining.iter().take(8).all(|field| field.reserved) {
                self.tokens.extend(quote! {
                    #buf.advance(1);
                });
            } else {
                self.tokens.extend(quote! {
                    let bits = #buf.get_u8();
                });
            }
        }

        if !field.reserved {
            let id = field_local_ident(&field.name);
            let shift = proc_macro2::Literal::usize_unsuffixed(shift);
            self.tokens.extend(quote! {
                let #id = bits & (1 << #shift) != 0;
            });
        }
        self.bit_offset += 1;
    }

    fn parse_integer_field(&mut self, width: usize, field: &ast::Field) {
        let buf = &self.buf;
        if field.reserved {
            let width = proc_macro2::Literal::usize_unsuffixed(width);
            self.tokens.extend(quote! {
                #buf.advance(#width);
            });
        } else {
            let id = field_local_ident(&field.name);
            let get_uint = types::get_uint(width, buf);
            self.tokens.extend(quote! {
                let #id = #get_uint;
            });
        }
    }

    /// Parse a variable size field with a runtime codec function.
    /// Reserved fields are parsed and dropped.
    fn parse_field_with(&mut self, read: proc_macro2::TokenStream, field: &ast::Field) {
        let buf = &self.buf;
        if field.reserved {
            self.tokens.extend(quote! {
                #read(&mut #buf)?;
            });
        } else {
            let id = field_local_ident(&field.name);
            self.tokens.extend(quote! {
                let #id = #read(&mut #buf)?;
            });
        }
    }
}
