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

use codespan_reporting::diagnostic;
use codespan_reporting::files;
use serde::Serialize;
use std::fmt;
use std::ops;

/// File identifier.
/// References a source file in the source database.
pub type FileId = usize;

/// Source database.
/// Stores the source file contents for reference.
pub type SourceDatabase = files::SimpleFiles<String, String>;

#[derive(Debug, Default, Copy, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    /// Byte offset into the file (counted from zero).
    pub offset: usize,
    /// Line number (counted from zero).
    pub line: usize,
    /// Column number (counted from zero)
    pub column: usize,
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    pub file: FileId,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

/// Free-form documentation attached to an element.
/// Documentation with a `type` attribute (e.g. `grammar`, `scenario`)
/// is kept but not rendered in generated code.
#[derive(Debug, Clone, Serialize)]
pub struct Doc {
    pub loc: SourceRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constant {
    pub loc: SourceRange,
    pub name: String,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub docs: Vec<Doc>,
}

/// Named alias for a wire type.
#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub loc: SourceRange,
    pub name: String,
    pub wire_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub docs: Vec<Doc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub loc: SourceRange,
    pub name: String,
    /// Explicit wire type, exclusive with `domain`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub reserved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub docs: Vec<Doc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Method {
    pub loc: SourceRange,
    pub name: String,
    pub index: u16,
    pub synchronous: bool,
    pub content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub docs: Vec<Doc>,
    /// Names of the methods accepted as a reply to this method.
    pub responses: Vec<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Class {
    pub loc: SourceRange,
    pub name: String,
    pub index: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub docs: Vec<Doc>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Specification {
    pub file: FileId,
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub constants: Vec<Constant>,
    pub domains: Vec<Domain>,
    pub classes: Vec<Class>,
}

impl SourceLocation {
    /// Construct a new source location.
    ///
    /// The `line_starts` indicates the byte offsets where new lines
    /// start in the file. The first element should thus be `0` since
    /// every file has at least one line starting at offset `0`.
    pub fn new(offset: usize, line_starts: &[usize]) -> SourceLocation {
        let line = line_starts.partition_point(|start| *start <= offset).saturating_sub(1);
        let column = offset - line_starts.get(line).copied().filter(|s| *s <= offset).unwrap_or(0);
        SourceLocation { offset, line, column }
    }
}

impl SourceRange {
    pub fn primary(&self) -> diagnostic::Label<FileId> {
        diagnostic::Label::primary(self.file, self.start.offset..self.end.offset)
    }
    pub fn secondary(&self) -> diagnostic::Label<FileId> {
        diagnostic::Label::secondary(self.file, self.start.offset..self.end.offset)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
        } else {
            write!(
                f,
                "{}:{}-{}:{}",
                self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRange").finish_non_exhaustive()
    }
}

impl ops::Add<SourceRange> for SourceRange {
    type Output = SourceRange;

    fn add(self, rhs: SourceRange) -> SourceRange {
        assert_eq!(self.file, rhs.file);
        SourceRange {
            file: self.file,
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

impl Eq for Doc {}
impl PartialEq for Doc {
    fn eq(&self, other: &Self) -> bool {
        // Implement structural equality, leave out loc.
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Constant {}
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value == other.value
            && self.class == other.class
            && self.docs == other.docs
    }
}

impl Eq for Domain {}
impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.wire_type == other.wire_type
            && self.label == other.label
            && self.docs == other.docs
    }
}

impl Eq for Field {}
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        // Implement structural equality, leave out loc.
        self.name == other.name
            && self.wire_type == other.wire_type
            && self.domain == other.domain
            && self.reserved == other.reserved
            && self.label == other.label
            && self.docs == other.docs
    }
}

impl Eq for Method {}
impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.index == other.index
            && self.synchronous == other.synchronous
            && self.content == other.content
            && self.label == other.label
            && self.docs == other.docs
            && self.responses == other.responses
            && self.fields == other.fields
    }
}

impl Eq for Class {}
impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.index == other.index
            && self.label == other.label
            && self.docs == other.docs
            && self.methods == other.methods
    }
}

impl Eq for Specification {}
impl PartialEq for Specification {
    fn eq(&self, other: &Self) -> bool {
        // Implement structural equality, leave out the file identifier.
        self.major == other.major
            && self.minor == other.minor
            && self.revision == other.revision
            && self.port == other.port
            && self.comment == other.comment
            && self.constants == other.constants
            && self.domains == other.domains
            && self.classes == other.classes
    }
}

impl Specification {
    pub fn new(file: FileId) -> Specification {
        Specification {
            file,
            major: 0,
            minor: 0,
            revision: 0,
            port: 0,
            comment: None,
            constants: vec![],
            domains: vec![],
            classes: vec![],
        }
    }

    /// Iterate over all methods, paired with their class.
    pub fn methods(&self) -> impl Iterator<Item = (&Class, &Method)> {
        self.classes.iter().flat_map(|class| class.methods.iter().map(move |method| (class, method)))
    }
}

impl Doc {
    /// Documentation rendered in generated code has no `type` attribute.
    pub fn is_plain(&self) -> bool {
        self.kind.is_none()
    }
}

impl Method {
    /// Return the plain documentation paragraphs of the method.
    pub fn plain_docs(&self) -> impl Iterator<Item = &Doc> {
        self.docs.iter().filter(|doc| doc.is_plain())
    }

    /// Iterate over the fields that are exposed in generated types.
    pub fn named_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.reserved)
    }
}
