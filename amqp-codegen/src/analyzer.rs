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

use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files;
use codespan_reporting::term;
use codespan_reporting::term::termcolor;
use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::ast::*;

/// Closed set of AMQP wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bit,
    Octet,
    ShortShort,
    Short,
    Long,
    LongLong,
    Timestamp,
    Table,
    ShortStr,
    LongStr,
}

impl WireType {
    pub const ALL: [WireType; 10] = [
        WireType::Bit,
        WireType::Octet,
        WireType::ShortShort,
        WireType::Short,
        WireType::Long,
        WireType::LongLong,
        WireType::Timestamp,
        WireType::Table,
        WireType::ShortStr,
        WireType::LongStr,
    ];

    /// Name of the wire type in protocol definitions.
    pub fn name(&self) -> &'static str {
        match self {
            WireType::Bit => "bit",
            WireType::Octet => "octet",
            WireType::ShortShort => "shortshort",
            WireType::Short => "short",
            WireType::Long => "long",
            WireType::LongLong => "longlong",
            WireType::Timestamp => "timestamp",
            WireType::Table => "table",
            WireType::ShortStr => "shortstr",
            WireType::LongStr => "longstr",
        }
    }

    /// Returns the width in octets of fixed width integer types.
    pub fn width(&self) -> Option<usize> {
        match self {
            WireType::Octet | WireType::ShortShort => Some(1),
            WireType::Short => Some(2),
            WireType::Long => Some(4),
            WireType::LongLong => Some(8),
            WireType::Bit
            | WireType::Timestamp
            | WireType::Table
            | WireType::ShortStr
            | WireType::LongStr => None,
        }
    }
}

impl FromStr for WireType {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        WireType::ALL.into_iter().find(|wire_type| wire_type.name() == input).ok_or(())
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure to resolve the wire type of a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("field `{field}` references undeclared domain `{domain}`")]
    UnresolvedDomain { field: String, domain: String },
    #[error("field `{field}` has unknown wire type `{wire_type}`")]
    UnknownWireType { field: String, wire_type: String },
    #[error("field `{field}` declares neither a type nor a domain")]
    MissingFieldType { field: String },
    #[error("field `{field}` declares both the type `{wire_type}` and the domain `{domain}`")]
    AmbiguousFieldType { field: String, wire_type: String, domain: String },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::UnresolvedDomain { .. } => ErrorCode::UnresolvedDomain,
            ResolveError::UnknownWireType { .. } => ErrorCode::UnknownWireType,
            ResolveError::MissingFieldType { .. } => ErrorCode::MissingFieldType,
            ResolveError::AmbiguousFieldType { .. } => ErrorCode::AmbiguousFieldType,
        }
    }
}

/// List of unique errors reported as analyzer diagnostics.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    UnresolvedDomain = 1,
    UnknownWireType = 2,
    MissingFieldType = 3,
    AmbiguousFieldType = 4,
    DuplicateClassIndex = 5,
    DuplicateMethodIndex = 6,
    DuplicateFieldIdentifier = 7,
    InvalidIdentifier = 8,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "E{}", *self as u16)
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        format!("{}", code)
    }
}

/// Aggregate analyzer diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic<FileId>>,
}

impl Diagnostics {
    fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn push(&mut self, diagnostic: Diagnostic<FileId>) {
        self.diagnostics.push(diagnostic)
    }

    fn err_or<T>(self, value: T) -> Result<T, Diagnostics> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn emit(
        &self,
        sources: &SourceDatabase,
        writer: &mut dyn termcolor::WriteColor,
    ) -> Result<(), files::Error> {
        let config = term::Config::default();
        for d in self.diagnostics.iter() {
            term::emit(writer, &config, sources, d)?;
        }
        Ok(())
    }
}

/// Run of consecutive fields sharing the same wire type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fieldset<'d> {
    pub wire_type: WireType,
    pub fields: Vec<&'d Field>,
}

/// Partition fields into maximal runs of consecutive fields with the
/// same wire type. The concatenation of the runs is the input order.
pub fn group_fields<'d>(
    fields: impl IntoIterator<Item = (&'d Field, WireType)>,
) -> Vec<Fieldset<'d>> {
    let mut fieldsets = vec![];
    let mut current: Option<Fieldset<'d>> = None;
    for (field, wire_type) in fields {
        match current.as_mut() {
            Some(fieldset) if fieldset.wire_type == wire_type => fieldset.fields.push(field),
            _ => {
                fieldsets.extend(current.take());
                current = Some(Fieldset { wire_type, fields: vec![field] });
            }
        }
    }
    // Flush the last open run.
    fieldsets.extend(current);
    fieldsets
}

/// Gather domain information about the specification.
#[derive(Debug)]
pub struct Scope<'d> {
    /// Reference to the analyzed specification.
    pub spec: &'d Specification,
    /// Domains indexed by name. The first declaration of a name wins.
    pub domains: HashMap<&'d str, &'d Domain>,
}

impl<'d> Scope<'d> {
    pub fn new(spec: &'d Specification) -> Scope<'d> {
        let mut domains = HashMap::new();
        for domain in &spec.domains {
            domains.entry(domain.name.as_str()).or_insert(domain);
        }
        Scope { spec, domains }
    }

    /// Return the wire type of a field, following the domain
    /// indirection when the field has no explicit type.
    pub fn resolve(&self, field: &Field) -> Result<WireType, ResolveError> {
        let name = match (&field.wire_type, &field.domain) {
            (Some(wire_type), None) => wire_type.as_str(),
            (None, Some(domain)) => self
                .domains
                .get(domain.as_str())
                .map(|domain| domain.wire_type.as_str())
                .ok_or_else(|| ResolveError::UnresolvedDomain {
                    field: field.name.clone(),
                    domain: domain.clone(),
                })?,
            (None, None) => {
                return Err(ResolveError::MissingFieldType { field: field.name.clone() })
            }
            (Some(wire_type), Some(domain)) => {
                return Err(ResolveError::AmbiguousFieldType {
                    field: field.name.clone(),
                    wire_type: wire_type.clone(),
                    domain: domain.clone(),
                })
            }
        };
        name.parse().map_err(|()| ResolveError::UnknownWireType {
            field: field.name.clone(),
            wire_type: name.to_owned(),
        })
    }

    /// Return the fields of a method grouped by wire type.
    pub fn fieldsets(&self, method: &'d Method) -> Result<Vec<Fieldset<'d>>, ResolveError> {
        let fields = method
            .fields
            .iter()
            .map(|field| -> Result<_, ResolveError> { Ok((field, self.resolve(field)?)) })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(group_fields(fields))
    }

    /// Return true if the method carries a non reserved `no-wait` flag.
    pub fn has_no_wait(&self, method: &Method) -> bool {
        method.named_fields().any(|field| {
            field.name.to_snake_case() == "no_wait"
                && matches!(self.resolve(field), Ok(WireType::Bit))
        })
    }
}

/// Check the wire type of every field.
/// Raises error diagnostics for the following cases:
///      - undeclared domain
///      - unknown wire type
///      - field with neither type nor domain
///      - field with both type and domain
fn check_field_types(spec: &Specification, scope: &Scope) -> Result<(), Diagnostics> {
    let mut diagnostics: Diagnostics = Default::default();
    for (class, method) in spec.methods() {
        for field in &method.fields {
            if let Err(err) = scope.resolve(field) {
                let mut labels = vec![field.loc.primary()];
                if let ResolveError::UnknownWireType { .. } = err {
                    if let Some(domain) = field.domain.as_deref().and_then(|d| scope.domains.get(d))
                    {
                        labels.push(
                            domain.loc.secondary().with_message(format!(
                                "`{}` is declared here",
                                domain.name
                            )),
                        );
                    }
                }
                diagnostics.push(
                    Diagnostic::error()
                        .with_code(err.code())
                        .with_message(format!("{} in method `{}.{}`", err, class.name, method.name))
                        .with_labels(labels),
                )
            }
        }
    }

    diagnostics.err_or(())
}

/// Check class indexes.
/// Raises error diagnostics for the following cases:
///      - duplicate class index
fn check_class_indexes(spec: &Specification) -> Result<(), Diagnostics> {
    let mut diagnostics: Diagnostics = Default::default();
    let mut indexes = HashMap::new();
    for class in &spec.classes {
        if let Some(prev) = indexes.insert(class.index, class) {
            diagnostics.push(
                Diagnostic::error()
                    .with_code(ErrorCode::DuplicateClassIndex)
                    .with_message(format!(
                        "class `{}` reuses the index {} of class `{}`",
                        class.name, class.index, prev.name
                    ))
                    .with_labels(vec![
                        class.loc.primary(),
                        prev.loc
                            .secondary()
                            .with_message(format!("`{}` is first declared here", class.index)),
                    ]),
            )
        }
    }

    diagnostics.err_or(())
}

/// Check method indexes.
/// Raises error diagnostics for the following cases:
///      - duplicate method index within a class
fn check_method_indexes(spec: &Specification) -> Result<(), Diagnostics> {
    let mut diagnostics: Diagnostics = Default::default();
    for class in &spec.classes {
        let mut indexes = HashMap::new();
        for method in &class.methods {
            if let Some(prev) = indexes.insert(method.index, method) {
                diagnostics.push(
                    Diagnostic::error()
                        .with_code(ErrorCode::DuplicateMethodIndex)
                        .with_message(format!(
                            "method `{}.{}` reuses the index {} of method `{}.{}`",
                            class.name, method.name, method.index, class.name, prev.name
                        ))
                        .with_labels(vec![
                            method.loc.primary(),
                            prev.loc
                                .secondary()
                                .with_message(format!("`{}` is first declared here", method.index)),
                        ]),
                )
            }
        }
    }

    diagnostics.err_or(())
}

/// Check field identifiers.
/// Raises error diagnostics for the following cases:
///      - two named fields mapping to the same identifier
///      - named field conflicting with the content of a content method
fn check_field_identifiers(spec: &Specification) -> Result<(), Diagnostics> {
    let mut diagnostics: Diagnostics = Default::default();
    for (class, method) in spec.methods() {
        let mut local_scope = HashMap::new();
        for field in method.named_fields() {
            let id = field.name.to_snake_case();
            if method.content && (id == "properties" || id == "body") {
                diagnostics.push(
                    Diagnostic::error()
                        .with_code(ErrorCode::DuplicateFieldIdentifier)
                        .with_message(format!(
                            "field identifier `{}` conflicts with the content of method `{}.{}`",
                            id, class.name, method.name
                        ))
                        .with_labels(vec![field.loc.primary()]),
                )
            }
            if let Some(prev) = local_scope.insert(id.clone(), field) {
                diagnostics.push(
                    Diagnostic::error()
                        .with_code(ErrorCode::DuplicateFieldIdentifier)
                        .with_message(format!(
                            "redeclaration of field identifier `{}` in method `{}.{}`",
                            id, class.name, method.name
                        ))
                        .with_labels(vec![
                            field.loc.primary(),
                            prev.loc
                                .secondary()
                                .with_message(format!("`{}` is first declared here", prev.name)),
                        ]),
                )
            }
        }
    }

    diagnostics.err_or(())
}

/// Return true when the converted name `id` can start a Rust identifier.
fn is_identifier(id: &str) -> bool {
    id.chars().next().map_or(false, |c| c.is_alphabetic() || c == '_')
}

/// Check that every generated name is a valid identifier.
/// Raises error diagnostics for class, method, named field and constant
/// names converting to an empty identifier or an identifier starting
/// with a digit.
fn check_identifiers(spec: &Specification) -> Result<(), Diagnostics> {
    let mut diagnostics: Diagnostics = Default::default();
    let mut check = |kind: &str, name: &str, id: String, loc: &SourceRange| {
        if !is_identifier(&id) {
            diagnostics.push(
                Diagnostic::error()
                    .with_code(ErrorCode::InvalidIdentifier)
                    .with_message(format!(
                        "{} name `{}` does not convert to a valid identifier",
                        kind, name
                    ))
                    .with_labels(vec![loc.primary()])
                    .with_notes(vec![format!("converted identifier is `{}`", id)]),
            )
        }
    };

    for constant in &spec.constants {
        check("constant", &constant.name, constant.name.to_shouty_snake_case(), &constant.loc);
    }
    for class in &spec.classes {
        check("class", &class.name, class.name.to_upper_camel_case(), &class.loc);
        for method in &class.methods {
            check("method", &method.name, method.name.to_upper_camel_case(), &method.loc);
            for field in method.named_fields() {
                check("field", &field.name, field.name.to_snake_case(), &field.loc);
            }
        }
    }

    diagnostics.err_or(())
}

/// Analyzer entry point, returns the domain scope of the specification
/// when all checks pass.
pub fn analyze(spec: &Specification) -> Result<Scope<'_>, Diagnostics> {
    let scope = Scope::new(spec);
    check_field_types(spec, &scope)?;
    check_class_indexes(spec)?;
    check_method_indexes(spec)?;
    check_identifiers(spec)?;
    check_field_identifiers(spec)?;
    Ok(scope)
}

#[cfg(test)]
mod test {
    use crate::analyzer;
    use crate::analyzer::WireType;
    use crate::ast;
    use crate::parser::parse_inline;
    use codespan_reporting::term::termcolor;

    use googletest::prelude::{assert_that, eq, len};

    macro_rules! raises {
        ($code:ident, $text:literal) => {{
            let mut db = ast::SourceDatabase::new();
            let spec = parse_inline(&mut db, "stdin", $text.to_owned()).expect("parsing failure");
            let result = analyzer::analyze(&spec);
            assert!(matches!(result, Err(_)));
            let diagnostics = result.err().unwrap();
            let mut buffer = termcolor::Buffer::no_color();
            let _ = diagnostics.emit(&db, &mut buffer);
            println!("{}", std::str::from_utf8(buffer.as_slice()).unwrap());
            assert_eq!(diagnostics.diagnostics.len(), 1);
            assert_eq!(diagnostics.diagnostics[0].code, Some(analyzer::ErrorCode::$code.into()));
        }};
    }

    macro_rules! valid {
        ($text:literal) => {{
            let mut db = ast::SourceDatabase::new();
            let spec = parse_inline(&mut db, "stdin", $text.to_owned()).expect("parsing failure");
            assert!(analyzer::analyze(&spec).is_ok());
        }};
    }

    fn field(name: &str) -> ast::Field {
        ast::Field {
            loc: ast::SourceRange::default(),
            name: name.to_owned(),
            wire_type: None,
            domain: None,
            reserved: false,
            label: None,
            docs: vec![],
        }
    }

    fn typed(name: &str, wire_type: &str) -> ast::Field {
        ast::Field { wire_type: Some(wire_type.to_owned()), ..field(name) }
    }

    fn with_domain(name: &str, domain: &str) -> ast::Field {
        ast::Field { domain: Some(domain.to_owned()), ..field(name) }
    }

    fn spec_with_domains(domains: &[(&str, &str)]) -> ast::Specification {
        let mut spec = ast::Specification::new(0);
        spec.domains = domains
            .iter()
            .map(|(name, wire_type)| ast::Domain {
                loc: ast::SourceRange::default(),
                name: name.to_string(),
                wire_type: wire_type.to_string(),
                label: None,
                docs: vec![],
            })
            .collect();
        spec
    }

    #[test]
    fn test_wire_type_names() {
        for wire_type in WireType::ALL {
            assert_eq!(wire_type.name().parse(), Ok(wire_type));
        }
        assert_eq!("uint8".parse::<WireType>(), Err(()));
        assert_eq!("Bit".parse::<WireType>(), Err(()));
    }

    #[test]
    fn test_resolve() {
        let spec = spec_with_domains(&[("queue-name", "shortstr"), ("weird", "float")]);
        let scope = analyzer::Scope::new(&spec);

        assert_eq!(scope.resolve(&typed("a", "long")), Ok(WireType::Long));
        assert_eq!(scope.resolve(&with_domain("q", "queue-name")), Ok(WireType::ShortStr));
        assert_eq!(
            scope.resolve(&with_domain("q", "exchange-name")),
            Err(analyzer::ResolveError::UnresolvedDomain {
                field: "q".to_owned(),
                domain: "exchange-name".to_owned()
            })
        );
        assert_eq!(
            scope.resolve(&with_domain("w", "weird")),
            Err(analyzer::ResolveError::UnknownWireType {
                field: "w".to_owned(),
                wire_type: "float".to_owned()
            })
        );
        assert_eq!(
            scope.resolve(&field("x")),
            Err(analyzer::ResolveError::MissingFieldType { field: "x".to_owned() })
        );
        assert!(matches!(
            scope.resolve(&ast::Field { domain: Some("queue-name".to_owned()), ..typed("y", "bit") }),
            Err(analyzer::ResolveError::AmbiguousFieldType { .. })
        ));
    }

    #[test]
    fn test_resolve_first_domain_wins() {
        let spec = spec_with_domains(&[("path", "shortstr"), ("path", "longstr")]);
        let scope = analyzer::Scope::new(&spec);
        assert_eq!(scope.resolve(&with_domain("p", "path")), Ok(WireType::ShortStr));
    }

    #[test]
    fn test_group_fields_merges_runs() {
        let fields = [
            typed("a", "long"),
            typed("b", "bit"),
            typed("c", "bit"),
            typed("d", "shortstr"),
        ];
        let spec = spec_with_domains(&[]);
        let scope = analyzer::Scope::new(&spec);
        let fieldsets = analyzer::group_fields(
            fields.iter().map(|field| (field, scope.resolve(field).unwrap())),
        );
        assert_that!(fieldsets, len(eq(3)));
        assert_eq!(
            fieldsets.iter().map(|f| (f.wire_type, f.fields.len())).collect::<Vec<_>>(),
            vec![(WireType::Long, 1), (WireType::Bit, 2), (WireType::ShortStr, 1)]
        );
    }

    #[test]
    fn test_group_fields_empty() {
        assert_that!(analyzer::group_fields(std::iter::empty()), len(eq(0)));
    }

    #[test]
    fn test_group_fields_keeps_trailing_run() {
        let fields = [typed("a", "long"), typed("b", "long")];
        let fieldsets = analyzer::group_fields(fields.iter().map(|f| (f, WireType::Long)));
        assert_that!(fieldsets, len(eq(1)));
        assert_that!(fieldsets[0].fields, len(eq(2)));
    }

    #[test]
    fn test_group_fields_exhaustive() {
        // Enumerate every sequence of up to five fields over three types.
        let types = [WireType::Bit, WireType::Long, WireType::ShortStr];
        let fields: Vec<_> = (0..5).map(|n| field(&format!("f{}", n))).collect();
        for len in 0..=5u32 {
            for code in 0..3usize.pow(len) {
                let sequence: Vec<_> =
                    (0..len as usize).map(|i| types[code / 3usize.pow(i as u32) % 3]).collect();
                let fieldsets =
                    analyzer::group_fields(fields.iter().zip(sequence.iter().copied()));

                let flattened: Vec<_> = fieldsets
                    .iter()
                    .flat_map(|set| set.fields.iter().map(move |f| (f.name.clone(), set.wire_type)))
                    .collect();
                let expected: Vec<_> =
                    fields.iter().zip(sequence.iter()).map(|(f, t)| (f.name.clone(), *t)).collect();
                assert_eq!(flattened, expected, "{:?}", sequence);

                for pair in fieldsets.windows(2) {
                    assert_ne!(pair[0].wire_type, pair[1].wire_type, "{:?}", sequence);
                }
                assert!(fieldsets.iter().all(|set| !set.fields.is_empty()));
            }
        }
    }

    #[test]
    fn test_e1() {
        raises!(
            UnresolvedDomain,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="queue" domain="queue-name"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e2() {
        raises!(
            UnknownWireType,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="queue" type="string"/>
                </method>
              </class>
            </amqp>
            "#
        );

        raises!(
            UnknownWireType,
            r#"
            <amqp>
              <domain name="queue-name" type="string"/>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="queue" domain="queue-name"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e3() {
        raises!(
            MissingFieldType,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="queue"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e4() {
        raises!(
            AmbiguousFieldType,
            r#"
            <amqp>
              <domain name="queue-name" type="shortstr"/>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="queue" type="shortstr" domain="queue-name"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e5() {
        raises!(
            DuplicateClassIndex,
            r#"
            <amqp>
              <class name="queue" index="50"/>
              <class name="basic" index="50"/>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e6() {
        raises!(
            DuplicateMethodIndex,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10"/>
                <method name="bind" index="10"/>
              </class>
            </amqp>
            "#
        );

        valid!(
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10"/>
              </class>
              <class name="basic" index="60">
                <method name="qos" index="10"/>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e7() {
        raises!(
            DuplicateFieldIdentifier,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="no-wait" type="bit"/>
                  <field name="no_wait" type="bit"/>
                </method>
              </class>
            </amqp>
            "#
        );

        raises!(
            DuplicateFieldIdentifier,
            r#"
            <amqp>
              <class name="basic" index="60">
                <method name="publish" index="40" content="1">
                  <field name="body" type="longstr"/>
                </method>
              </class>
            </amqp>
            "#
        );

        // Reserved fields are not named in generated code.
        valid!(
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="reserved-1" type="short" reserved="1"/>
                  <field name="reserved-1" type="bit" reserved="1"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_e8() {
        raises!(
            InvalidIdentifier,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="2nd-field" type="bit"/>
                </method>
              </class>
            </amqp>
            "#
        );

        raises!(
            InvalidIdentifier,
            r#"
            <amqp>
              <constant name="" value="1"/>
            </amqp>
            "#
        );

        raises!(
            InvalidIdentifier,
            r#"
            <amqp>
              <class name="queue" index="50">
                <method name="--" index="10"/>
              </class>
            </amqp>
            "#
        );

        raises!(
            InvalidIdentifier,
            r#"
            <amqp>
              <class name="0-9" index="50">
                <method name="declare" index="10"/>
              </class>
            </amqp>
            "#
        );

        // Keywords are escaped by the generator.
        valid!(
            r#"
            <amqp>
              <constant name="frame-end" value="206"/>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="type" type="shortstr"/>
                  <field name="field-2" type="bit"/>
                </method>
              </class>
            </amqp>
            "#
        );
    }

    #[test]
    fn test_has_no_wait() {
        let mut db = ast::SourceDatabase::new();
        let spec = parse_inline(
            &mut db,
            "stdin",
            r#"
            <amqp>
              <domain name="no-wait" type="bit"/>
              <class name="queue" index="50">
                <method name="declare" index="10">
                  <field name="no-wait" domain="no-wait"/>
                </method>
                <method name="bind" index="20">
                  <field name="no-wait" type="bit" reserved="1"/>
                </method>
                <method name="purge" index="30"/>
              </class>
            </amqp>
            "#
            .to_owned(),
        )
        .unwrap();
        let scope = analyzer::analyze(&spec).unwrap();
        let methods = &spec.classes[0].methods;
        assert!(scope.has_no_wait(&methods[0]));
        assert!(!scope.has_no_wait(&methods[1]));
        assert!(!scope.has_no_wait(&methods[2]));
    }
}
