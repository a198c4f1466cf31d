//! The input AST this pipeline operates over. See spec.md §3.2.
//!
//! `ProtobufFile` and `Message`/`EnumDecl` carry a type parameter for their
//! per-stage annotation payload (spec.md §2: "an AST decorated with a
//! per-stage annotation payload"). It starts as `()` and becomes
//! [`Namespace`](crate::namespace::Namespace) once
//! [`stages::namespace_builder`](crate::stages::namespace_builder) runs —
//! encoding "this file has a namespace yet" in the type system rather than
//! as a runtime-checked `Option`.

use crate::diagnostics::Span;
use crate::identifier::{FullyQualifiedReference, Identifier, QualifiedName};

/// A Protobuf scalar type. Parallels the builtin member of
/// `prost_types::field_descriptor_proto::Type`, minus the `Message`/`Enum`
/// variants (those become [`FieldType::Message`]/[`FieldType::Enum`] here
/// once resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    Bool,
    String,
    Bytes,
}

/// A field's type, before or after resolution (spec.md §3.2, §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Builtin(BuiltinType),
    /// As written by the user; not yet looked up against any namespace.
    Unresolved(String),
    Message(FullyQualifiedReference),
    Enum(FullyQualifiedReference),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Required,
    Optional,
    Repeated,
}

/// A field tag: the wire-position integer a `Field` is keyed by.
///
/// Validity (spec.md I1: `1 <= t <= 2^29 - 1`, outside `[19000, 19999]`) is
/// *not* enforced by the constructor — that's exactly what the label
/// validator stage checks and reports as diagnostics, not a panic.
///
/// Carries its own `location` distinct from the enclosing `Field`'s: the
/// tag literal and the field declaration can point at different columns of
/// the same line (`required int32 x = 5;`), and a diagnostic about the tag
/// specifically should point at the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldTag {
    pub value: i32,
    pub location: Option<Span>,
}

impl FieldTag {
    pub fn new(value: i32) -> Self {
        FieldTag {
            value,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Span) -> Self {
        self.location = Some(location);
        self
    }
}

pub const RESERVED_TAG_RANGE: std::ops::RangeInclusive<i32> = 19000..=19999;
pub const MAX_FIELD_TAG: i32 = (1 << 29) - 1;

/// Tagged-union option value, per spec.md §6: `{OptString, OptBool, OptInt, OptReal}`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldOption {
    pub name: String,
    pub value: OptionValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub modifier: Modifier,
    pub field_type: FieldType,
    pub name: Identifier,
    pub tag: FieldTag,
    pub options: Vec<FieldOption>,
    pub location: Option<Span>,
}

/// One item inside a `Message` body (spec.md §3.2).
#[derive(Debug, Clone, PartialEq)]
pub enum MessageField {
    Field(Field),
    Nested(Message),
    MessageEnum(EnumDecl),
    /// An inline option or extension placeholder: carried through the
    /// pipeline inertly (spec.md does not assign it namespace or IR
    /// semantics), but still occupies a slot for the field sorter's
    /// synthetic-tag ordering (spec.md §4.3).
    Inline(FieldOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: Identifier,
    pub fields: Vec<MessageField>,
    /// The path of the scope this message is declared in, populated by the
    /// namespace builder (spec.md §4.6). `None` before that stage runs.
    pub enclosing_path: Option<QualifiedName>,
    pub location: Option<Span>,
}

impl Message {
    pub fn new(name: Identifier, fields: Vec<MessageField>) -> Self {
        Message {
            name,
            fields,
            enclosing_path: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Identifier,
    pub values: Vec<(Identifier, i64)>,
    pub enclosing_path: Option<QualifiedName>,
    pub location: Option<Span>,
}

impl EnumDecl {
    pub fn new(name: Identifier, values: Vec<(Identifier, i64)>) -> Self {
        EnumDecl {
            name,
            values,
            enclosing_path: None,
            location: None,
        }
    }
}

/// A service method. Services and their methods pass through every stage
/// inertly: spec.md assigns no namespace entries or IR to them (only
/// messages and enums occupy namespace/IR slots), so nothing here ever
/// rewrites a `Method`.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Identifier,
    pub input_type: String,
    pub output_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: Identifier,
    pub methods: Vec<Method>,
}

/// A top-level item in a `.proto` file (spec.md §3.2).
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Package(QualifiedName),
    /// The import literal as written; resolved to a `FileId` via
    /// `Bundle::import_map` (spec.md §6).
    Import(String),
    TopMessage(Message),
    TopEnum(EnumDecl),
    TopService(Service),
    Option(FieldOption),
}

/// A single parsed `.proto` file, annotated with per-stage payload `A`.
/// See spec.md §3.2.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtobufFile<A = ()> {
    pub declarations: Vec<Declaration>,
    /// Populated by the package extractor (spec.md §4.5); empty until then.
    pub package_path: QualifiedName,
    pub annotation: A,
}

impl ProtobufFile<()> {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        ProtobufFile {
            declarations,
            package_path: QualifiedName::empty(),
            annotation: (),
        }
    }
}

impl<A> ProtobufFile<A> {
    /// Replaces the annotation, keeping declarations and package path.
    pub fn with_annotation<B>(self, annotation: B) -> ProtobufFile<B> {
        ProtobufFile {
            declarations: self.declarations,
            package_path: self.package_path,
            annotation,
        }
    }

    pub fn top_messages(&self) -> impl Iterator<Item = &Message> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::TopMessage(m) => Some(m),
            _ => None,
        })
    }

    pub fn top_messages_mut(&mut self) -> impl Iterator<Item = &mut Message> {
        self.declarations.iter_mut().filter_map(|decl| match decl {
            Declaration::TopMessage(m) => Some(m),
            _ => None,
        })
    }

    pub fn top_enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::TopEnum(e) => Some(e),
            _ => None,
        })
    }

    pub fn top_enums_mut(&mut self) -> impl Iterator<Item = &mut EnumDecl> {
        self.declarations.iter_mut().filter_map(|decl| match decl {
            Declaration::TopEnum(e) => Some(e),
            _ => None,
        })
    }
}

/// Visits every [`Message`] in the tree — top-level and nested, in document
/// order — calling `visit` on each. This is the "generic universe
/// combinator" spec.md §9 calls for; implemented here as a plain recursive
/// fold over the AST variants rather than derive/reflection-based
/// traversal, per that section's guidance.
pub fn visit_messages<'a, A>(file: &'a ProtobufFile<A>, mut visit: impl FnMut(&'a Message)) {
    fn walk<'a>(message: &'a Message, visit: &mut impl FnMut(&'a Message)) {
        visit(message);
        for field in &message.fields {
            if let MessageField::Nested(nested) = field {
                walk(nested, visit);
            }
        }
    }
    for message in file.top_messages() {
        walk(message, &mut visit);
    }
}

/// Mutable counterpart of [`visit_messages`].
pub fn visit_messages_mut<A>(file: &mut ProtobufFile<A>, visit: &mut impl FnMut(&mut Message)) {
    fn walk(message: &mut Message, visit: &mut impl FnMut(&mut Message)) {
        visit(message);
        for field in &mut message.fields {
            if let MessageField::Nested(nested) = field {
                walk(nested, visit);
            }
        }
    }
    for message in file.top_messages_mut() {
        walk(message, visit);
    }
}

/// Visits every [`EnumDecl`] in the tree, including inline enums nested
/// inside messages at any depth, in document order.
pub fn visit_enums<'a, A>(file: &'a ProtobufFile<A>, mut visit: impl FnMut(&'a EnumDecl)) {
    fn walk<'a>(message: &'a Message, visit: &mut impl FnMut(&'a EnumDecl)) {
        for field in &message.fields {
            match field {
                MessageField::Nested(nested) => walk(nested, visit),
                MessageField::MessageEnum(e) => visit(e),
                _ => {}
            }
        }
    }
    for e in file.top_enums() {
        visit(e);
    }
    for message in file.top_messages() {
        walk(message, &mut visit);
    }
}
