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

//! Rust compiler backend.

use crate::analyzer::{self, ResolveError};
use crate::ast;
use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use quote::{format_ident, quote};
use std::path::Path;

mod decoder;
mod encoder;
mod preamble;
mod types;

use decoder::FieldParser;
use encoder::Encoder;

/// Failure to generate the Rust code for a specification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot generate method `{class}.{method}`: {source}")]
    Resolve { class: String, method: String, source: ResolveError },
    #[error("generated code does not parse: {0}")]
    Syntax(#[from] syn::Error),
}

pub trait ToIdent {
    /// Generate a sanitized rust identifier.
    /// Rust specific keywords are renamed for validity.
    fn to_ident(self) -> proc_macro2::Ident;
}

impl ToIdent for &'_ str {
    fn to_ident(self) -> proc_macro2::Ident {
        match self {
            "as" | "break" | "const" | "continue" | "else" | "enum" | "extern" | "false" | "fn"
            | "for" | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move" | "mut"
            | "pub" | "ref" | "return" | "static" | "struct" | "trait" | "true" | "type"
            | "unsafe" | "use" | "where" | "while" | "async" | "await" | "dyn" | "abstract"
            | "become" | "box" | "do" | "final" | "macro" | "override" | "priv" | "typeof"
            | "unsized" | "virtual" | "yield" | "try" => format_ident!("r#{}", self),
            // Path keywords cannot be raw identifiers.
            "self" | "Self" | "super" | "crate" => format_ident!("{}_", self),
            _ => format_ident!("{}", self),
        }
    }
}

/// Return the identifier of the struct member generated for a field.
pub(crate) fn field_ident(name: &str) -> proc_macro2::Ident {
    name.to_snake_case().as_str().to_ident()
}

/// Return the identifier of the local variable holding the decoded
/// value of a field. The prefix keeps field values apart from the
/// locals and functions used by the generated parser.
pub(crate) fn field_local_ident(name: &str) -> proc_macro2::Ident {
    format_ident!("field_{}", field_ident(name))
}

/// Return the identifier of the struct generated for a method,
/// e.g. `BasicConsume` for the method `consume` of the class `basic`.
fn method_type_ident(class: &ast::Class, method: &ast::Method) -> proc_macro2::Ident {
    format_ident!("{}{}", class.name.to_upper_camel_case(), method.name.to_upper_camel_case())
}

/// Format documentation paragraphs as `#[doc]` attribute values.
/// Carriage returns and indentation are removed, paragraphs are
/// separated by an empty line.
fn doc_lines<'a>(docs: impl IntoIterator<Item = &'a ast::Doc>) -> Vec<String> {
    let mut lines = vec![];
    for doc in docs {
        let text = doc.text.replace('\r', "");
        let mut paragraph: Vec<&str> = text.lines().map(str::trim).collect();
        while paragraph.last().is_some_and(|line| line.is_empty()) {
            paragraph.pop();
        }
        let start = paragraph.iter().position(|line| !line.is_empty()).unwrap_or(paragraph.len());
        if start == paragraph.len() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(paragraph[start..].iter().map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        }));
    }
    lines
}

fn generate_constants(spec: &ast::Specification) -> proc_macro2::TokenStream {
    let major = proc_macro2::Literal::u8_unsuffixed(spec.major);
    let minor = proc_macro2::Literal::u8_unsuffixed(spec.minor);
    let revision = proc_macro2::Literal::u8_unsuffixed(spec.revision);
    let port = proc_macro2::Literal::u16_unsuffixed(spec.port);
    let constants = spec.constants.iter().map(|constant| {
        let name = format_ident!("{}", constant.name.to_shouty_snake_case());
        let value = proc_macro2::Literal::u32_unsuffixed(constant.value);
        let docs = doc_lines(&constant.docs);
        quote! {
            #(#[doc = #docs])*
            pub const #name: u32 = #value;
        }
    });

    quote! {
        pub const PROTOCOL_MAJOR: u8 = #major;
        pub const PROTOCOL_MINOR: u8 = #minor;
        pub const PROTOCOL_REVISION: u8 = #revision;
        pub const DEFAULT_PORT: u16 = #port;
        #(#constants)*
    }
}

/// Generate the declaration of a method struct, with the
/// implementation of the `Method` trait, and the `Content` trait for
/// content-bearing methods.
fn generate_method_decl<'d>(
    scope: &analyzer::Scope<'d>,
    class: &'d ast::Class,
    method: &'d ast::Method,
) -> Result<proc_macro2::TokenStream, Error> {
    let name = method_type_ident(class, method);
    let method_name = name.to_string();
    let fieldsets = scope.fieldsets(method).map_err(|source| Error::Resolve {
        class: class.name.clone(),
        method: method.name.clone(),
        source,
    })?;
    tracing::debug!("generating {} with {} fieldsets", method_name, fieldsets.len());

    let named_fields = fieldsets
        .iter()
        .flat_map(|fieldset| fieldset.fields.iter().map(|field| (*field, fieldset.wire_type)))
        .filter(|(field, _)| !field.reserved)
        .collect::<Vec<_>>();
    let field_idents =
        named_fields.iter().map(|(field, _)| field_ident(&field.name)).collect::<Vec<_>>();
    let field_locals = named_fields.iter().map(|(field, _)| field_local_ident(&field.name));
    let field_decls = named_fields.iter().zip(&field_idents).map(|((field, wire_type), id)| {
        let field_type = types::rust_type(*wire_type);
        let doc = field.label.as_ref().map(|label| {
            let label = format!(" {}", label.trim());
            quote!(#[doc = #label])
        });
        quote! {
            #doc
            pub #id: #field_type
        }
    });

    let (content_decls, content_values) = if method.content {
        (
            quote! {
                pub properties: Properties,
                pub body: Vec<u8>,
            },
            quote! {
                properties: Default::default(),
                body: Default::default(),
            },
        )
    } else {
        (quote! {}, quote! {})
    };

    let synchronous = method.synchronous;
    let wait = if synchronous && scope.has_no_wait(method) {
        quote!(!self.no_wait)
    } else {
        quote!(#synchronous)
    };

    let has_fields = !method.fields.is_empty();
    let mut encoder = Encoder::new(if has_fields { format_ident!("buf") } else { format_ident!("_buf") });
    let mut parser = FieldParser::new(&method_name, format_ident!("buf"));
    for fieldset in &fieldsets {
        encoder.encode_fieldset(fieldset);
        parser.parse_fieldset(fieldset);
    }
    let encode_buf = if has_fields { quote!(buf) } else { quote!(_buf) };
    let decode_buf = if has_fields { quote!(mut buf) } else { quote!(buf) };
    let encode_fields = &encoder.tokens;
    let decode_fields = &parser.tokens;
    let method_size = &encoder.method_size;

    let class_index = proc_macro2::Literal::u16_unsuffixed(class.index);
    let method_index = proc_macro2::Literal::u16_unsuffixed(method.index);
    let docs = doc_lines(method.plain_docs());

    let content_impl = method.content.then(|| {
        quote! {
            impl Content for #name {
                fn properties(&self) -> &Properties {
                    &self.properties
                }

                fn body(&self) -> &[u8] {
                    &self.body
                }

                fn set_content(&mut self, properties: Properties, body: Vec<u8>) {
                    self.properties = properties;
                    self.body = body;
                }
            }
        }
    });

    Ok(quote! {
        #(#[doc = #docs])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #name {
            #(#field_decls,)*
            #content_decls
        }

        impl Method for #name {
            const CLASS_ID: u16 = #class_index;
            const METHOD_ID: u16 = #method_index;

            fn wait(&self) -> bool {
                #wait
            }

            fn encoded_len(&self) -> usize {
                #method_size
            }

            fn encode(&self, #encode_buf: &mut impl BufMut) -> Result<(), EncodeError> {
                #encode_fields
                Ok(())
            }

            fn decode(#decode_buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
                #decode_fields
                Ok((Self { #(#field_idents: #field_locals,)* #content_values }, buf))
            }
        }

        #content_impl
    })
}

/// Generate the enum of all methods, with the frame dispatch keyed by
/// the class and method indexes.
fn generate_any_method(spec: &ast::Specification) -> proc_macro2::TokenStream {
    let variants = spec
        .methods()
        .map(|(class, method)| method_type_ident(class, method))
        .collect::<Vec<_>>();
    if variants.is_empty() {
        return quote! {};
    }

    let class_cases = spec.classes.iter().map(|class| {
        let class_index = proc_macro2::Literal::u16_unsuffixed(class.index);
        if class.methods.is_empty() {
            return quote! {
                #class_index => Err(DecodeError::UnknownMethod { class_id, method_id }),
            };
        }
        let method_indexes =
            class.methods.iter().map(|method| proc_macro2::Literal::u16_unsuffixed(method.index));
        let method_types = class.methods.iter().map(|method| method_type_ident(class, method));
        quote! {
            #class_index => match method_id {
                #(#method_indexes => #method_types::decode(buf)
                    .map(|(method, buf)| (AnyMethod::#method_types(method), buf)),)*
                _ => Err(DecodeError::UnknownMethod { class_id, method_id }),
            },
        }
    });

    quote! {
        /// Arguments of any method, identified by class and method index.
        #[derive(Debug, Clone, PartialEq)]
        pub enum AnyMethod {
            #(#variants(#variants),)*
        }

        impl AnyMethod {
            /// Parse the payload of a method frame: the class index,
            /// the method index, and the method arguments.
            pub fn decode(mut buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
                if buf.remaining() < 4 {
                    return Err(DecodeError::InvalidLengthError {
                        obj: "AnyMethod",
                        wanted: 4,
                        got: buf.remaining(),
                    });
                }
                let class_id = buf.get_u16();
                let method_id = buf.get_u16();
                match class_id {
                    #(#class_cases)*
                    _ => Err(DecodeError::UnknownClass { class_id }),
                }
            }

            /// Parse the payload of a method frame.
            /// Returns an error if unparsed bytes remain.
            pub fn decode_full(buf: &[u8]) -> Result<Self, DecodeError> {
                let (method, remaining) = Self::decode(buf)?;
                if remaining.is_empty() {
                    Ok(method)
                } else {
                    Err(DecodeError::TrailingBytes)
                }
            }

            pub fn id(&self) -> (u16, u16) {
                match self {
                    #(AnyMethod::#variants(method) => method.id(),)*
                }
            }

            pub fn wait(&self) -> bool {
                match self {
                    #(AnyMethod::#variants(method) => method.wait(),)*
                }
            }

            pub fn encoded_len(&self) -> usize {
                4 + match self {
                    #(AnyMethod::#variants(method) => method.encoded_len(),)*
                }
            }

            /// Write the payload of a method frame.
            pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), EncodeError> {
                let (class_id, method_id) = self.id();
                buf.put_u16(class_id);
                buf.put_u16(method_id);
                match self {
                    #(AnyMethod::#variants(method) => method.encode(buf),)*
                }
            }

            pub fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
                let mut buf = Vec::with_capacity(self.encoded_len());
                self.encode(&mut buf)?;
                Ok(buf)
            }
        }

        #(
            impl From<#variants> for AnyMethod {
                fn from(method: #variants) -> Self {
                    AnyMethod::#variants(method)
                }
            }
        )*
    }
}

/// Generate Rust tokens from a specification.
pub fn generate_tokens(
    sources: &ast::SourceDatabase,
    spec: &ast::Specification,
) -> Result<proc_macro2::TokenStream, Error> {
    let name = sources.get(spec.file).map(|source| source.name().as_str()).unwrap_or("<stdin>");
    let preamble = preamble::generate(Path::new(name));
    let scope = analyzer::Scope::new(spec);
    let constants = generate_constants(spec);
    let methods = spec
        .methods()
        .map(|(class, method)| generate_method_decl(&scope, class, method))
        .collect::<Result<Vec<_>, _>>()?;
    let any_method = generate_any_method(spec);
    tracing::info!("generated {} methods from {}", methods.len(), name);

    Ok(quote! {
        #preamble
        #constants
        #(#methods)*
        #any_method
    })
}

/// Generate formatted Rust code from a specification.
///
/// The code is formatted with `prettyplease`.
pub fn generate(
    sources: &ast::SourceDatabase,
    spec: &ast::Specification,
) -> Result<String, Error> {
    let syntax_tree = syn::parse2::<syn::File>(generate_tokens(sources, spec)?)?;
    Ok(prettyplease::unparse(&syntax_tree))
}
