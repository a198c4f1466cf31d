//! Resolves unqualified and partially-qualified type references against a
//! file's merged namespace. See spec.md §4.8.

use crate::ast::{visit_messages_mut, FieldType, ProtobufFile};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};
use crate::identifier::{FullyQualifiedReference, Identifier, QualifiedName};
use crate::namespace::{Namespace, NamespaceEntry};

/// Resolves every `FieldType::Unresolved` name in `file` against its
/// (already import-merged) namespace, searching from the innermost
/// enclosing scope outward — `P`, then `P` with its last component dropped,
/// and so on down to the bundle root — per spec.md §4.8's successive-prefix
/// search, the same pattern `extern_paths::ExternPaths::resolve_ident` uses
/// to walk a path's ancestors looking for the longest matching prefix.
pub fn resolve_types(mut file: ProtobufFile<Namespace>) -> Result<ProtobufFile<Namespace>, DiagnosticList> {
    let mut diags = Diagnostics::new();
    let root = file.annotation.clone();

    visit_messages_mut(&mut file, &mut |message| {
        let enclosing = message
            .enclosing_path
            .clone()
            .unwrap_or_else(QualifiedName::empty)
            .joined(&message.name);
        for field in &mut message.fields {
            if let crate::ast::MessageField::Field(f) = field {
                resolve_field_type(&mut f.field_type, &enclosing, &root, &mut diags);
            }
        }
    });

    diags.into_result(file)
}

fn resolve_field_type(
    field_type: &mut FieldType,
    scope: &QualifiedName,
    root: &Namespace,
    diags: &mut Diagnostics,
) {
    let FieldType::Unresolved(name) = field_type else {
        return;
    };

    let Some((entry, package_path)) = search_scopes(name, scope, root) else {
        diags.push(Diagnostic::error(format!("Unresolved name: {}", name)));
        return;
    };

    let leaf = entry.name().clone();
    let fqr = FullyQualifiedReference::new(package_path, leaf);

    *field_type = match entry {
        NamespaceEntry::Message { .. } => FieldType::Message(fqr),
        NamespaceEntry::Enum { .. } => FieldType::Enum(fqr),
        NamespaceEntry::Field { .. } => {
            diags.push(Diagnostic::error(format!("Not a type name: {}", name)));
            return;
        }
    };
}

/// Tries `scope.name`, then each successively shorter prefix of `scope`
/// joined with `name`, and finally the bundle root, returning the matching
/// entry together with the package path it was found under.
fn search_scopes<'a>(
    name: &str,
    scope: &QualifiedName,
    root: &'a Namespace,
) -> Option<(&'a NamespaceEntry, QualifiedName)> {
    let segments: Vec<&str> = name.split('.').collect();

    let mut candidate = Some(scope.clone());
    loop {
        let prefix = match &candidate {
            Some(p) => p.clone(),
            None => QualifiedName::empty(),
        };
        let full_path: Vec<&str> = prefix
            .parts()
            .map(Identifier::as_str)
            .chain(segments.iter().copied())
            .collect();
        if let Some(entry) = root.lookup_path(full_path.iter().copied()) {
            let mut package_path = prefix;
            for segment in &segments[..segments.len() - 1] {
                package_path.push(Identifier::type_name(*segment));
            }
            return Some((entry, package_path));
        }
        match candidate {
            Some(p) if !p.is_empty() => candidate = p.parent(),
            Some(_) => return None,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BuiltinType, Declaration, Field, FieldTag, Message, MessageField, Modifier};
    use crate::namespace::wrap_in_package;

    fn build_root() -> Namespace {
        let mut color_enum_scope = Namespace::new();
        color_enum_scope
            .insert(NamespaceEntry::Enum {
                name: Identifier::type_name("Color"),
            })
            .unwrap();
        let mut top = Namespace::new();
        top.insert(NamespaceEntry::Message {
            name: Identifier::type_name("Shape"),
            inner: Namespace::new(),
        })
        .unwrap();
        top.insert(NamespaceEntry::Enum {
            name: Identifier::type_name("Color"),
        })
        .unwrap();
        top
    }

    fn unresolved_field(name: &str, type_name: &str) -> MessageField {
        MessageField::Field(Field {
            modifier: Modifier::Optional,
            field_type: FieldType::Unresolved(type_name.to_string()),
            name: Identifier::field_name(name),
            tag: FieldTag::new(1),
            options: Vec::new(),
            location: None,
        })
    }

    #[test]
    fn resolves_sibling_type_in_same_scope() {
        let root = build_root();
        let message = Message::new(
            Identifier::type_name("Widget"),
            vec![unresolved_field("color", "Color")],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]).with_annotation(root);
        file.top_messages_mut().next().unwrap().enclosing_path = Some(QualifiedName::empty());

        let file = resolve_types(file).unwrap();
        let f = file.top_messages().next().unwrap();
        match &f.fields[0] {
            MessageField::Field(field) => {
                assert!(matches!(field.field_type, FieldType::Enum(_)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn unresolved_name_is_diagnosed() {
        let root = build_root();
        let message = Message::new(
            Identifier::type_name("Widget"),
            vec![unresolved_field("x", "Nonexistent")],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]).with_annotation(root);
        file.top_messages_mut().next().unwrap().enclosing_path = Some(QualifiedName::empty());

        let err = resolve_types(file).unwrap_err();
        assert!(err.as_slice()[0].message.contains("Unresolved name"));
    }

    #[test]
    fn field_name_used_as_type_is_rejected() {
        let mut top = Namespace::new();
        top.insert(NamespaceEntry::Field {
            name: Identifier::field_name("notatype"),
        })
        .unwrap();

        let message = Message::new(
            Identifier::type_name("Widget"),
            vec![unresolved_field("x", "notatype")],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]).with_annotation(top);
        file.top_messages_mut().next().unwrap().enclosing_path = Some(QualifiedName::empty());

        let err = resolve_types(file).unwrap_err();
        assert!(err.as_slice()[0].message.contains("Not a type name"));
    }

    #[test]
    fn resolves_through_package_wrapper_from_outer_scope() {
        let mut inner = Namespace::new();
        inner
            .insert(NamespaceEntry::Message {
                name: Identifier::type_name("Target"),
                inner: Namespace::new(),
            })
            .unwrap();
        let path = vec![Identifier::type_name("p")];
        let wrapped = wrap_in_package(inner, path.iter());

        let message = Message::new(
            Identifier::type_name("Widget"),
            vec![unresolved_field("t", "p.Target")],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]).with_annotation(wrapped);
        file.top_messages_mut().next().unwrap().enclosing_path =
            Some(QualifiedName::from_parts([Identifier::type_name("p")]));

        let file = resolve_types(file).unwrap();
        let f = file.top_messages().next().unwrap();
        match &f.fields[0] {
            MessageField::Field(field) => {
                assert!(matches!(field.field_type, FieldType::Message(_)));
            }
            _ => unreachable!(),
        }
    }
}
