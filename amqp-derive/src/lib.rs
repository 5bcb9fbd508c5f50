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

//! Attribute macros generating AMQP method types at compile time.

use amqp_codegen::{analyzer, ast, backends, parser};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::term;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use std::env;
use std::path::Path;
use syn::parse_macro_input;

/// Render diagnostics as a compile error located at `span`.
fn diagnostics_error(
    span: Span,
    sources: &ast::SourceDatabase,
    diagnostics: &[Diagnostic<ast::FileId>],
) -> TokenStream {
    let mut buffer = termcolor::Buffer::no_color();
    let config = term::Config::default();
    for diagnostic in diagnostics {
        if let Err(err) = term::emit(&mut buffer, &config, sources, diagnostic) {
            return syn::Error::new(span, format!("could not emit diagnostics: {err}"))
                .to_compile_error();
        }
    }
    syn::Error::new(span, String::from_utf8_lossy(&buffer.into_inner())).to_compile_error()
}

/// Analyze the specification and wrap the generated code into the
/// annotated module.
fn generate_module(
    span: Span,
    sources: &ast::SourceDatabase,
    spec: &ast::Specification,
    input: syn::ItemMod,
    dependency: TokenStream,
) -> TokenStream {
    if let Err(diagnostics) = analyzer::analyze(spec) {
        return diagnostics_error(span, sources, &diagnostics.diagnostics);
    }

    let methods = match backends::rust::generate_tokens(sources, spec) {
        Ok(methods) => methods,
        Err(err) => return syn::Error::new(span, err.to_string()).to_compile_error(),
    };
    let mod_ident = input.ident;
    let mod_attrs = input.attrs;
    let mod_vis = input.vis;
    let mod_items = input.content.map(|(_, items)| items).unwrap_or_default();

    quote! {
        #(#mod_attrs)*
        #mod_vis mod #mod_ident {
            #dependency
            #methods
            #(#mod_items)*
        }
    }
}

fn amqp_proc_macro(path: syn::LitStr, input: syn::ItemMod) -> TokenStream {
    // Locate the source specification file.
    let root = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let Some(relative_path) =
        [Path::new(&root).join(path.value()), Path::new(&root).join("src").join(path.value())]
            .into_iter()
            .find(|path| path.exists())
    else {
        return syn::Error::new(path.span(), "error: unable to find file").to_compile_error();
    };

    let mut sources = ast::SourceDatabase::new();
    let relative_path = relative_path.to_string_lossy().into_owned();
    let spec = match parser::parse_file(&mut sources, &relative_path) {
        Ok(spec) => spec,
        Err(err) => return diagnostics_error(path.span(), &sources, &[err]),
    };

    // Generate an include_bytes! statement to force a dependency
    // on the source specification file.
    // This workaround is also used by pest, see
    // pest_generator::generator::generate_include.
    let dependency = quote! {
        const _: &[u8] = include_bytes!(#relative_path);
    };
    generate_module(path.span(), &sources, &spec, input, dependency)
}

fn amqp_inline_proc_macro(source: syn::LitStr, input: syn::ItemMod) -> TokenStream {
    let mut sources = ast::SourceDatabase::new();
    let name = format!("{}.xml", input.ident);
    let spec = match parser::parse_inline(&mut sources, &name, source.value()) {
        Ok(spec) => spec,
        Err(err) => return diagnostics_error(source.span(), &sources, &[err]),
    };
    generate_module(source.span(), &sources, &spec, input, quote! {})
}

/// Generate the method types of the AMQP specification file given as
/// argument inside the annotated module. The path is relative to the
/// crate root or to its `src` directory.
#[proc_macro_attribute]
pub fn amqp(
    attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr = parse_macro_input!(attr as syn::LitStr);
    let input = parse_macro_input!(input as syn::ItemMod);
    amqp_proc_macro(attr, input).into()
}

/// Generate the method types of the AMQP specification given inline
/// as a string literal inside the annotated module.
#[proc_macro_attribute]
pub fn amqp_inline(
    attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr = parse_macro_input!(attr as syn::LitStr);
    let input = parse_macro_input!(input as syn::ItemMod);
    amqp_inline_proc_macro(attr, input).into()
}

#[cfg(test)]
mod test {
    use super::{amqp_inline_proc_macro, amqp_proc_macro};
    use proc_macro2::TokenStream;
    use quote::quote;

    fn is_compile_error(input: TokenStream, message_prefix: Option<&str>) -> bool {
        match syn::parse2::<syn::Macro>(input) {
            Ok(syn::Macro {
                path: syn::Path { segments, leading_colon: Some(_) }, tokens, ..
            }) if segments.len() == 2 => {
                // Check macro path
                let segments = segments.iter().collect::<Vec<_>>();
                if segments[0].ident != "core" || segments[1].ident != "compile_error" {
                    return false;
                }

                // Check compile_error message
                match (syn::parse2::<syn::LitStr>(tokens), message_prefix) {
                    (Ok(message), Some(message_prefix)) => {
                        message.value().starts_with(message_prefix)
                    }
                    (Ok(_), None) => true,
                    (Err(_), _) => false,
                }
            }
            Ok(_) | Err(_) => false,
        }
    }

    fn make_attr(input: TokenStream) -> syn::LitStr {
        syn::parse2::<syn::LitStr>(input).unwrap()
    }

    fn make_input(input: TokenStream) -> syn::ItemMod {
        syn::parse2::<syn::ItemMod>(input).unwrap()
    }

    #[test]
    fn test_derive_valid() {
        let output = amqp_proc_macro(
            make_attr(quote! { "src/test_valid.xml" }),
            make_input(quote! { mod test {} }),
        );
        assert!(!is_compile_error(output.clone(), None));
        assert!(syn::parse2::<syn::ItemMod>(output).is_ok());
    }

    #[test]
    fn test_derive_inline_valid() {
        assert!(!is_compile_error(
            amqp_inline_proc_macro(
                make_attr(quote! {
                    r#"<amqp><class name="test" index="10">
                         <method name="probe" index="20"><field name="flag" type="bit"/></method>
                       </class></amqp>"#
                }),
                make_input(quote! { mod test {} }),
            ),
            None
        ));
    }

    #[test]
    fn test_derive_file_not_found() {
        assert!(is_compile_error(
            amqp_proc_macro(
                make_attr(quote! { "src/test_not_found.xml" }),
                make_input(quote! { mod test {} }),
            ),
            Some("error: unable to find file")
        ));
    }

    #[test]
    fn test_derive_parser_error() {
        assert!(is_compile_error(
            amqp_proc_macro(
                make_attr(quote! { "src/test_parser_error.xml" }),
                make_input(quote! { mod test {} }),
            ),
            Some("error: failed to parse input file")
        ));
    }

    #[test]
    fn test_derive_analyzer_error() {
        assert!(is_compile_error(
            amqp_proc_macro(
                make_attr(quote! { "src/test_analyzer_error.xml" }),
                make_input(quote! { mod test {} }),
            ),
            Some("error[E")
        ));
    }

    #[test]
    fn test_derive_inline_analyzer_error() {
        assert!(is_compile_error(
            amqp_inline_proc_macro(
                make_attr(quote! {
                    r#"<amqp><class name="test" index="10">
                         <method name="probe" index="20"><field name="x" domain="missing"/></method>
                       </class></amqp>"#
                }),
                make_input(quote! { mod test {} }),
            ),
            Some("error[E1]")
        ));
    }
}
