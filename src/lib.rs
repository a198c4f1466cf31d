#![doc(html_root_url = "https://docs.rs/protoc-ir/0.1.0")]

//! The semantic core of a Protocol Buffers schema compiler: validation,
//! name mangling, namespace resolution, and IR lowering.
//!
//! This crate does not parse `.proto` source or emit code in any target
//! language. It picks up where a parser leaves off — a [`Bundle`] of
//! already-parsed [`ProtobufFile`]s — and hands off a flat [`IrMap`] ready
//! for a code generation backend to consume.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. [`stages::label_validator`] — field tag and enum value checks
//! 2. [`stages::field_sorter`] — canonical field ordering
//! 3. [`stages::name_mangler`] — role-based identifier capitalization
//! 4. [`stages::package_extractor`] — lifts each file's package path
//! 5. [`stages::namespace_builder`] — builds each file's namespace tree
//! 6. [`stages::import_resolver`] — merges namespaces across imports
//! 7. [`stages::type_resolver`] — resolves field type references
//! 8. [`stages::lowering`] — flattens everything into [`IrMap`]
//!
//! [`pipeline::run`] wires all of these together; callers that need finer
//! control can invoke the stages directly.

pub mod ast;
pub mod bundle;
pub mod diagnostics;
pub mod identifier;
pub mod ir;
pub mod namespace;
pub mod pipeline;
pub mod stages;

pub use ast::ProtobufFile;
pub use bundle::{Bundle, FileId};
pub use diagnostics::{Diagnostic, DiagnosticList, Diagnostics, Severity, Span};
pub use identifier::{FullyQualifiedReference, Identifier, QualifiedName, Role};
pub use ir::IrMap;
pub use namespace::Namespace;
