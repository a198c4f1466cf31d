//! Lowers resolved files into the flat intermediate representation. See
//! spec.md §4.9.

use crate::ast::{visit_enums, visit_messages, EnumDecl, FieldType, Message, MessageField, Modifier, OptionValue, ProtobufFile};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};
use crate::identifier::{FullyQualifiedReference, QualifiedName};
use crate::ir::{DuplicateModule, IrEnumValue, IrField, IrMap, IrModule, IrType, Shape};
use crate::namespace::Namespace;

/// The name of the field option that marks a repeated scalar field as using
/// the packed wire encoding.
const PACKED_OPTION: &str = "packed";

/// Lowers every resolved file into a single [`IrMap`], keyed by fully
/// qualified name across the whole bundle. A name collision between two
/// files' declarations is reported as a diagnostic (spec.md §4.9) rather
/// than silently overwriting the earlier entry.
pub fn lower(files: Vec<ProtobufFile<Namespace>>) -> Result<IrMap, DiagnosticList> {
    let mut diags = Diagnostics::new();
    let mut map = IrMap::new();

    for file in &files {
        visit_messages(file, |message| {
            let fqr = fully_qualified_name(message, &file.package_path);
            let fields = message
                .fields
                .iter()
                .filter_map(|field| match field {
                    MessageField::Field(f) => Some(lower_field(f)),
                    _ => None,
                })
                .collect();
            insert_checked(&mut map, fqr, IrModule::Message { fields }, &mut diags);
        });

        visit_enums(file, |e| {
            let fqr = enum_fully_qualified_name(e, &file.package_path);
            let values = e
                .values
                .iter()
                .map(|(name, number)| IrEnumValue {
                    name: name.clone(),
                    number: *number,
                })
                .collect();
            insert_checked(&mut map, fqr, IrModule::Enum { values }, &mut diags);
        });
    }

    diags.into_result(map)
}

fn enum_fully_qualified_name(e: &EnumDecl, package_path: &QualifiedName) -> FullyQualifiedReference {
    let path = e.enclosing_path.clone().unwrap_or_else(|| package_path.clone());
    FullyQualifiedReference::new(path, e.name.clone())
}

fn fully_qualified_name(message: &Message, package_path: &QualifiedName) -> FullyQualifiedReference {
    let path = message.enclosing_path.clone().unwrap_or_else(|| package_path.clone());
    FullyQualifiedReference::new(path, message.name.clone())
}

fn insert_checked(map: &mut IrMap, name: FullyQualifiedReference, module: IrModule, diags: &mut Diagnostics) {
    if let Err(DuplicateModule(name)) = map.insert(name, module) {
        diags.push(Diagnostic::error(format!("duplicate declaration across bundle: {}", name)));
    }
}

/// Lowers a single field's cardinality, type, and `packed` option.
///
/// A `packed` option value that isn't a boolean literal is an upstream
/// parser contract violation — protoc itself rejects this before this
/// pipeline would ever see it — so it panics rather than producing a
/// diagnostic.
fn lower_field(field: &crate::ast::Field) -> IrField {
    let packed = field
        .options
        .iter()
        .find(|opt| opt.name == PACKED_OPTION)
        .map(|opt| match &opt.value {
            OptionValue::Bool(b) => *b,
            other => panic!("packed option must be boolean, got {:?}", other),
        })
        .unwrap_or(false);

    let shape = match field.modifier {
        Modifier::Required => Shape::Required,
        Modifier::Optional => Shape::Optional,
        Modifier::Repeated => Shape::Repeated { packed },
    };

    let ty = match &field.field_type {
        FieldType::Builtin(b) => IrType::Builtin(*b),
        FieldType::Message(fqr) => IrType::Message(fqr.clone()),
        FieldType::Enum(fqr) => IrType::Enum(fqr.clone()),
        FieldType::Unresolved(name) => {
            panic!("field type '{}' reached lowering unresolved", name)
        }
    };

    let default = field
        .options
        .iter()
        .find(|opt| opt.name == "default")
        .map(|opt| opt.value.clone());

    IrField {
        name: field.name.clone(),
        shape,
        ty,
        tag: field.tag.clone(),
        default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BuiltinType, Declaration, Field, FieldOption, FieldTag, MessageField};
    use crate::identifier::Identifier;
    use pretty_assertions::assert_eq;

    fn scalar_field(name: &str, tag: i32, modifier: Modifier, options: Vec<FieldOption>) -> MessageField {
        MessageField::Field(Field {
            modifier,
            field_type: FieldType::Builtin(BuiltinType::Int32),
            name: Identifier::field_name(name),
            tag: FieldTag::new(tag),
            options,
            location: None,
        })
    }

    fn file_with_message(message: Message) -> ProtobufFile<Namespace> {
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]).with_annotation(Namespace::new());
        file.top_messages_mut().next().unwrap().enclosing_path = Some(QualifiedName::empty());
        file
    }

    #[test]
    fn lowers_required_and_repeated_fields() {
        let message = Message::new(
            Identifier::type_name("M"),
            vec![
                scalar_field("a", 1, Modifier::Required, vec![]),
                scalar_field("b", 2, Modifier::Repeated, vec![]),
            ],
        );
        let file = file_with_message(message);
        let map = lower(vec![file]).unwrap();

        let fqr = FullyQualifiedReference::new(QualifiedName::empty(), Identifier::type_name("M"));
        let IrModule::Message { fields } = map.get(&fqr).unwrap() else {
            unreachable!()
        };
        assert_eq!(fields[0].shape, Shape::Required);
        assert_eq!(fields[1].shape, Shape::Repeated { packed: false });
    }

    #[test]
    fn packed_option_is_honored() {
        let message = Message::new(
            Identifier::type_name("M"),
            vec![scalar_field(
                "a",
                1,
                Modifier::Repeated,
                vec![FieldOption {
                    name: "packed".to_string(),
                    value: OptionValue::Bool(true),
                }],
            )],
        );
        let file = file_with_message(message);
        let map = lower(vec![file]).unwrap();

        let fqr = FullyQualifiedReference::new(QualifiedName::empty(), Identifier::type_name("M"));
        let IrModule::Message { fields } = map.get(&fqr).unwrap() else {
            unreachable!()
        };
        assert_eq!(fields[0].shape, Shape::Repeated { packed: true });
    }

    #[test]
    #[should_panic(expected = "packed option must be boolean")]
    fn non_boolean_packed_option_panics() {
        let message = Message::new(
            Identifier::type_name("M"),
            vec![scalar_field(
                "a",
                1,
                Modifier::Repeated,
                vec![FieldOption {
                    name: "packed".to_string(),
                    value: OptionValue::Int(1),
                }],
            )],
        );
        let file = file_with_message(message);
        let _ = lower(vec![file]);
    }

    #[test]
    fn duplicate_declaration_across_files_is_diagnosed() {
        let message_a = Message::new(Identifier::type_name("Shared"), vec![]);
        let message_b = Message::new(Identifier::type_name("Shared"), vec![]);
        let file_a = file_with_message(message_a);
        let file_b = file_with_message(message_b);

        let err = lower(vec![file_a, file_b]).unwrap_err();
        assert!(err
            .as_slice()
            .iter()
            .any(|d| d.message.contains("duplicate declaration across bundle")));
    }
}
