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

use crate::ast;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use std::str::FromStr;

// Generate the XML parser.
//
// Only the subset of XML used by protocol definitions is accepted:
// no namespaces processing, DTD internal subsets are skipped
// without validation, and entity references are resolved after
// parsing.
#[derive(pest_derive::Parser)]
#[grammar_inline = r##"
ws = _{ (" " | "\t" | "\r" | "\n")+ }
comment = _{ "<!--" ~ (!"-->" ~ ANY)* ~ "-->" }
pi = _{ "<?" ~ (!"?>" ~ ANY)* ~ "?>" }
doctype = _{
    "<!DOCTYPE" ~ (!("[" | ">") ~ ANY)* ~
    ("[" ~ (!"]" ~ ANY)* ~ "]" ~ ws?)? ~
    ">"
}
misc = _{ comment | pi | ws }

name_start = _{ ASCII_ALPHA | "_" | ":" }
name_char = _{ ASCII_ALPHANUMERIC | "_" | ":" | "-" | "." }
name = @{ name_start ~ name_char* }

quoted_value = @{ (!("\"" | "<") ~ ANY)* }
apostrophed_value = @{ (!("'" | "<") ~ ANY)* }
attribute = {
    name ~ ws? ~ "=" ~ ws? ~
    (("\"" ~ quoted_value ~ "\"") | ("'" ~ apostrophed_value ~ "'"))
}

text = @{ (!"<" ~ ANY)+ }
cdata_text = @{ (!"]]>" ~ ANY)* }
cdata = { "<![CDATA[" ~ cdata_text ~ "]]>" }

element = {
    "<" ~ PUSH(name) ~ (ws ~ attribute)* ~ ws? ~
    (("/>" ~ DROP) | (">" ~ content ~ "</" ~ POP ~ ws? ~ ">"))
}
content = _{ (comment | pi | cdata | element | text)* }

document = {
    SOI ~ misc* ~ (doctype ~ misc*)? ~
    element ~
    misc* ~ EOI
}
"##]
pub struct AmqpParser;

type Node<'i> = Pair<'i, Rule>;
type Error = Diagnostic<ast::FileId>;

struct Context<'a> {
    file: ast::FileId,
    line_starts: &'a Vec<usize>,
}

trait Helpers<'i> {
    fn as_loc(&self, context: &Context) -> ast::SourceRange;
}

impl<'i> Helpers<'i> for Node<'i> {
    fn as_loc(&self, context: &Context) -> ast::SourceRange {
        let span = self.as_span();
        ast::SourceRange {
            file: context.file,
            start: ast::SourceLocation::new(span.start_pos().pos(), context.line_starts),
            end: ast::SourceLocation::new(span.end_pos().pos(), context.line_starts),
        }
    }
}

fn error_at(loc: ast::SourceRange, message: String) -> Error {
    Diagnostic::error().with_message(message).with_labels(vec![loc.primary()])
}

struct Attribute<'i> {
    loc: ast::SourceRange,
    name: &'i str,
    value: &'i str,
}

/// View of an XML element node.
struct Element<'i> {
    loc: ast::SourceRange,
    name: &'i str,
    attributes: Vec<Attribute<'i>>,
    content: Vec<Node<'i>>,
}

/// Resolve the predefined and numeric character references.
fn decode_entities(text: &str) -> Result<String, String> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let len = rest[start..]
            .find(';')
            .ok_or_else(|| format!("unterminated entity reference in '{}'", text))?;
        let entity = &rest[start + 1..start + len];
        output.push(match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                .and_then(|code| code.ok())
                .and_then(char::from_u32)
                .ok_or_else(|| format!("unknown entity reference '&{};'", entity))?,
        });
        rest = &rest[start + len + 1..];
    }
    output.push_str(rest);
    Ok(output)
}

/// Interpret a boolean attribute value, accepting the same spellings
/// as common XML protocol definitions: 1, t, T, true, TRUE, True and
/// their false counterparts.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl<'i> Element<'i> {
    fn new(node: Node<'i>, context: &Context) -> Element<'i> {
        let loc = node.as_loc(context);
        let mut name = "";
        let mut attributes = vec![];
        let mut content = vec![];
        for child in node.into_inner() {
            match child.as_rule() {
                Rule::name => name = child.as_str(),
                Rule::attribute => {
                    let loc = child.as_loc(context);
                    let mut inner = child.into_inner();
                    let name = inner.next().map_or("", |n| n.as_str());
                    let value = inner.next().map_or("", |n| n.as_str());
                    attributes.push(Attribute { loc, name, value })
                }
                _ => content.push(child),
            }
        }
        Element { loc, name, attributes, content }
    }

    /// Iterate over the child elements, in document order.
    fn elements<'a>(&'a self, context: &'a Context) -> impl Iterator<Item = Element<'i>> + 'a {
        self.content
            .iter()
            .filter(|node| node.as_rule() == Rule::element)
            .map(move |node| Element::new(node.clone(), context))
    }

    /// Iterate over the child elements with the selected tag.
    fn children<'a>(
        &'a self,
        tag: &'a str,
        context: &'a Context,
    ) -> impl Iterator<Item = Element<'i>> + 'a {
        self.elements(context).filter(move |element| element.name == tag)
    }

    /// Return the concatenated character data of the element,
    /// nested elements excluded.
    fn text(&self) -> Result<String, Error> {
        let mut text = String::new();
        for node in &self.content {
            match node.as_rule() {
                Rule::text => text.push_str(
                    &decode_entities(node.as_str()).map_err(|err| error_at(self.loc, err))?,
                ),
                Rule::cdata => {
                    text.push_str(node.clone().into_inner().next().map_or("", |n| n.as_str()))
                }
                _ => (),
            }
        }
        Ok(text)
    }

    fn attribute(&self, name: &str) -> Option<&Attribute<'i>> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    fn optional(&self, name: &str) -> Result<Option<String>, Error> {
        self.attribute(name)
            .map(|attribute| {
                decode_entities(attribute.value).map_err(|err| error_at(attribute.loc, err))
            })
            .transpose()
    }

    fn required(&self, name: &str) -> Result<String, Error> {
        self.optional(name)?.ok_or_else(|| {
            error_at(self.loc, format!("element <{}> is missing the attribute '{}'", self.name, name))
        })
    }

    fn boolean(&self, name: &str) -> Result<bool, Error> {
        match self.attribute(name) {
            None => Ok(false),
            Some(attribute) => parse_bool(attribute.value.trim()).ok_or_else(|| {
                error_at(
                    attribute.loc,
                    format!("invalid boolean value '{}' for attribute '{}'", attribute.value, name),
                )
            }),
        }
    }

    fn integer<T: FromStr>(&self, name: &str) -> Result<Option<T>, Error> {
        self.attribute(name)
            .map(|attribute| {
                attribute.value.trim().parse::<T>().map_err(|_| {
                    error_at(
                        attribute.loc,
                        format!(
                            "cannot convert '{}' to {} for attribute '{}'",
                            attribute.value,
                            std::any::type_name::<T>(),
                            name
                        ),
                    )
                })
            })
            .transpose()
    }

    fn required_integer<T: FromStr>(&self, name: &str) -> Result<T, Error> {
        self.integer(name)?.ok_or_else(|| {
            error_at(self.loc, format!("element <{}> is missing the attribute '{}'", self.name, name))
        })
    }
}

fn parse_docs(element: &Element, context: &Context) -> Result<Vec<ast::Doc>, Error> {
    element
        .children("doc", context)
        .map(|doc| -> Result<ast::Doc, Error> {
            Ok(ast::Doc { loc: doc.loc, kind: doc.optional("type")?, text: doc.text()? })
        })
        .collect()
}

fn parse_constant(element: &Element, context: &Context) -> Result<ast::Constant, Error> {
    Ok(ast::Constant {
        loc: element.loc,
        name: element.required("name")?,
        value: element.required_integer("value")?,
        class: element.optional("class")?,
        docs: parse_docs(element, context)?,
    })
}

fn parse_domain(element: &Element, context: &Context) -> Result<ast::Domain, Error> {
    Ok(ast::Domain {
        loc: element.loc,
        name: element.required("name")?,
        wire_type: element.required("type")?,
        label: element.optional("label")?,
        docs: parse_docs(element, context)?,
    })
}

fn parse_field(element: &Element, context: &Context) -> Result<ast::Field, Error> {
    Ok(ast::Field {
        loc: element.loc,
        name: element.required("name")?,
        wire_type: element.optional("type")?,
        domain: element.optional("domain")?,
        reserved: element.boolean("reserved")?,
        label: element.optional("label")?,
        docs: parse_docs(element, context)?,
    })
}

fn parse_method(element: &Element, context: &Context) -> Result<ast::Method, Error> {
    Ok(ast::Method {
        loc: element.loc,
        name: element.required("name")?,
        index: element.required_integer("index")?,
        synchronous: element.boolean("synchronous")?,
        content: element.boolean("content")?,
        label: element.optional("label")?,
        docs: parse_docs(element, context)?,
        responses: element
            .children("response", context)
            .map(|response| response.required("name"))
            .collect::<Result<_, _>>()?,
        fields: element
            .children("field", context)
            .map(|field| parse_field(&field, context))
            .collect::<Result<_, _>>()?,
    })
}

fn parse_class(element: &Element, context: &Context) -> Result<ast::Class, Error> {
    Ok(ast::Class {
        loc: element.loc,
        name: element.required("name")?,
        index: element.required_integer("index")?,
        label: element.optional("label")?,
        docs: parse_docs(element, context)?,
        methods: element
            .children("method", context)
            .map(|method| parse_method(&method, context))
            .collect::<Result<_, _>>()?,
    })
}

fn parse_toplevel(root: Node<'_>, context: &Context) -> Result<ast::Specification, Error> {
    let root = root
        .into_inner()
        .find(|node| node.as_rule() == Rule::element)
        .map(|node| Element::new(node, context))
        .ok_or_else(|| Diagnostic::error().with_message("missing root element"))?;
    if root.name != "amqp" {
        return Err(error_at(
            root.loc,
            format!("expected root element <amqp>, got <{}>", root.name),
        ));
    }

    let mut spec = ast::Specification::new(context.file);
    spec.major = root.integer("major")?.unwrap_or_default();
    spec.minor = root.integer("minor")?.unwrap_or_default();
    spec.revision = root.integer("revision")?.unwrap_or_default();
    spec.port = root.integer("port")?.unwrap_or_default();
    spec.comment = root.optional("comment")?;

    for element in root.elements(context) {
        match element.name {
            "constant" => spec.constants.push(parse_constant(&element, context)?),
            "domain" => spec.domains.push(parse_domain(&element, context)?),
            "class" => spec.classes.push(parse_class(&element, context)?),
            name => tracing::trace!("ignoring element <{}> at {}", name, element.loc),
        }
    }
    Ok(spec)
}

/// Parse a protocol definition from a string.
///
/// The file is added to the compilation database under the provided
/// name.
pub fn parse_inline(
    sources: &mut ast::SourceDatabase,
    name: &str,
    source: String,
) -> Result<ast::Specification, Diagnostic<ast::FileId>> {
    let file = sources.add(name.to_owned(), source.clone());
    let root = AmqpParser::parse(Rule::document, &source)
        .map_err(|err| {
            let range = match err.location {
                InputLocation::Pos(pos) => pos..pos,
                InputLocation::Span((start, end)) => start..end,
            };
            Diagnostic::error()
                .with_message(format!("failed to parse input file '{}'", name))
                .with_labels(vec![Label::primary(file, range).with_message(err.variant.message())])
        })?
        .next()
        .ok_or_else(|| Diagnostic::error().with_message("empty parse tree"))?;
    let line_starts: Vec<_> = files::line_starts(&source).collect();
    let spec = parse_toplevel(root, &Context { file, line_starts: &line_starts })?;
    tracing::debug!(
        "parsed '{}': {} constants, {} domains, {} classes",
        name,
        spec.constants.len(),
        spec.domains.len(),
        spec.classes.len()
    );
    Ok(spec)
}

/// Parse a new source file.
///
/// The source file is fully read and added to the compilation
/// database. Returns the constructed AST, or a descriptive error
/// message in case of syntax error.
pub fn parse_file(
    sources: &mut ast::SourceDatabase,
    name: &str,
) -> Result<ast::Specification, Diagnostic<ast::FileId>> {
    let source = std::fs::read_to_string(name).map_err(|e| {
        Diagnostic::error().with_message(format!("failed to read input file '{}': {}", name, e))
    })?;
    parse_inline(sources, name, source)
}
