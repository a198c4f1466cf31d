//! The flat intermediate representation lowering produces. See spec.md §3.4.

use std::collections::HashMap;

use crate::ast::{BuiltinType, FieldTag};
use crate::identifier::{FullyQualifiedReference, Identifier};

/// A field's inner type, after resolution — either a scalar or a reference
/// to another IR module.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    Builtin(BuiltinType),
    Message(FullyQualifiedReference),
    Enum(FullyQualifiedReference),
}

/// A field's outer shape: cardinality plus, for `Repeated`, whether it uses
/// the packed wire encoding (spec.md §3.4, §4.9).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Required,
    Optional,
    Repeated { packed: bool },
}

/// A single field of an [`IrMessage`], fully resolved and ready for a code
/// generation backend (out of scope here) to consume.
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub name: Identifier,
    pub shape: Shape,
    pub ty: IrType,
    pub tag: FieldTag,
    pub default: Option<crate::ast::OptionValue>,
}

/// One value of an [`IrModule::Enum`].
#[derive(Debug, Clone, PartialEq)]
pub struct IrEnumValue {
    pub name: Identifier,
    pub number: i64,
}

/// A single lowered declaration — a message or an enum — keyed by its fully
/// qualified name in [`IrMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum IrModule {
    Message { fields: Vec<IrField> },
    Enum { values: Vec<IrEnumValue> },
}

/// Returned by [`IrMap::insert`] when the fully qualified name is already
/// bound — two messages or enums across the bundle share a name (spec.md
/// §4.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateModule(pub FullyQualifiedReference);

/// The pipeline's final output: every message and enum across the bundle,
/// keyed by fully qualified name (spec.md §3.4, §4.9).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IrMap {
    modules: HashMap<FullyQualifiedReference, IrModule>,
}

impl IrMap {
    pub fn new() -> Self {
        IrMap::default()
    }

    /// Inserts `module` under `name`, failing without mutating the map if
    /// the name is already bound.
    pub fn insert(&mut self, name: FullyQualifiedReference, module: IrModule) -> Result<(), DuplicateModule> {
        if self.modules.contains_key(&name) {
            return Err(DuplicateModule(name));
        }
        self.modules.insert(name, module);
        Ok(())
    }

    pub fn get(&self, name: &FullyQualifiedReference) -> Option<&IrModule> {
        self.modules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FullyQualifiedReference, &IrModule)> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
