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
use crate::backends::rust::{field_ident, types};
use quote::quote;

/// Represents the computed size of a method,
/// composed of constant and variable size fields.
pub(crate) struct RuntimeSize {
    constant: usize,
    variable: Vec<proc_macro2::TokenStream>,
}

impl RuntimeSize {
    fn new() -> Self {
        RuntimeSize { constant: 0, variable: vec![] }
    }
}

impl quote::ToTokens for RuntimeSize {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let constant = proc_macro2::Literal::usize_unsuffixed(self.constant);
        tokens.extend(match self {
            RuntimeSize { variable, .. } if variable.is_empty() => quote! { #constant },
            RuntimeSize { variable, constant: 0 } => quote! { #(#variable)+* },
            RuntimeSize { variable, .. } => quote! { #constant + #(#variable)+* },
        })
    }
}

/// Generates the serialization of the arguments of one method.
/// A new encoder is created for each method.
pub(crate) struct Encoder {
    buf: proc_macro2::Ident,
    pub(crate) method_size: RuntimeSize,
    pub(crate) tokens: proc_macro2::TokenStream,
    /// Offset of the next bit in the current run of bit fields.
    bit_offset: usize,
    /// Assignments of the non reserved bits in the current octet.
    bit_fields: Vec<proc_macro2::TokenStream>,
}

impl Encoder {
    pub fn new(buf: proc_macro2::Ident) -> Self {
        Encoder {
            buf,
            method_size: RuntimeSize::new(),
            tokens: quote! {},
            bit_offset: 0,
            bit_fields: vec![],
        }
    }

    pub fn encode_fieldset(&mut self, fieldset: &Fieldset<'_>) {
        match fieldset.wire_type {
            WireType::Bit => {
                for field in &fieldset.fields {
                    self.encode_bit_field(field);
                }
                self.finish_bit_fields();
            }
            WireType::Octet
            | WireType::ShortShort
            | WireType::Short
            | WireType::Long
            | WireType::LongLong => {
                for field in &fieldset.fields {
                    self.encode_integer_field(fieldset.wire_type, field);
                }
            }
            WireType::Timestamp => {
                for field in &fieldset.fields {
                    self.encode_timestamp_field(field);
                }
            }
            WireType::Table => {
                for field in &fieldset.fields {
                    self.encode_table_field(field);
                }
            }
            WireType::ShortStr | WireType::LongStr => {
                for field in &fieldset.fields {
                    self.encode_string_field(fieldset.wire_type, field);
                }
            }
        }
    }

    fn encode_bit_field(&mut self, field: &ast::Field) {
        let shift = proc_macro2::Literal::usize_unsuffixed(self.bit_offset % 8);
        if !field.reserved {
            let id = field_ident(&field.name);
            self.bit_fields.push(quote! {
                if self.#id {
                    bits |= 1 << #shift;
                }
            });
        }

        self.bit_offset += 1;
        if self.bit_offset % 8 == 0 {
            self.pack_bit_fields();
        }
    }

    /// Write the current octet of packed bits.
    fn pack_bit_fields(&mut self) {
        let buf = &self.buf;
        let bit_fields = std::mem::take(&mut self.bit_fields);
        self.tokens.extend(if bit_fields.is_empty() {
            quote! {
                #buf.put_u8(0);
            }
        } else {
            quote! {
                let mut bits = 0u8;
                #(#bit_fields)*
                #buf.put_u8(bits);
            }
        });
        self.method_size.constant += 1;
    }

    /// Write the last, partially filled octet of a run of bit fields
    /// and reset the bit offset.
    fn finish_bit_fields(&mut self) {
        if self.bit_offset % 8 != 0 {
            self.pack_bit_fields();
        }
        self.bit_offset = 0;
    }

    fn encode_integer_field(&mut self, wire_type: WireType, field: &ast::Field) {
        let Some(width) = wire_type.width() else {
            unreachable!("{} is not an integer type", wire_type)
        };
        let value = if field.reserved {
            quote!(0)
        } else {
            let id = field_ident(&field.name);
            quote!(self.#id)
        };
        let put_uint = types::put_uint(width, &value, &self.buf);
        self.tokens.extend(quote! {
            #put_uint;
        });
        self.method_size.constant += width;
    }

    fn encode_timestamp_field(&mut self, field: &ast::Field) {
        let buf = &self.buf;
        let value = if field.reserved {
            quote!(Timestamp::default())
        } else {
            let id = field_ident(&field.name);
            quote!(self.#id)
        };
        self.tokens.extend(quote! {
            write_timestamp(#buf, #value);
        });
        self.method_size.constant += 8;
    }

    fn encode_table_field(&mut self, field: &ast::Field) {
        let buf = &self.buf;
        if field.reserved {
            self.tokens.extend(quote! {
                write_table(#buf, &FieldTable::default())?;
            });
            self.method_size.constant += 4;
        } else {
            let id = field_ident(&field.name);
            self.tokens.extend(quote! {
                write_table(#buf, &self.#id)?;
            });
            self.method_size.variable.push(quote! { self.#id.encoded_len() });
        }
    }

    fn encode_string_field(&mut self, wire_type: WireType, field: &ast::Field) {
        let buf = &self.buf;
        let (write, empty, prefix_size) = match wire_type {
            WireType::ShortStr => (quote!(write_shortstr), quote!(""), 1),
            WireType::LongStr => (quote!(write_longstr), quote!(&[]), 4),
            _ => unreachable!("{} is not a string type", wire_type),
        };
        if field.reserved {
            self.tokens.extend(quote! {
                #write(#buf, #empty)?;
            });
        } else {
            let id = field_ident(&field.name);
            self.tokens.extend(quote! {
                #write(#buf, &self.#id)?;
            });
            self.method_size.variable.push(quote! { self.#id.len() });
        }
        self.method_size.constant += prefix_size;
    }
}
