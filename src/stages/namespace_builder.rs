//! Builds each file's namespace tree and detects intra-file collisions. See
//! spec.md §4.6.

use crate::ast::{Declaration, EnumDecl, Message, MessageField, ProtobufFile};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};
use crate::identifier::QualifiedName;
use crate::namespace::{wrap_in_package, DuplicateName, Namespace, NamespaceEntry};

/// Builds the namespace for `file` (already mangled and package-extracted)
/// and attaches it as the file's annotation, wrapped by `package_path`.
/// Also attaches the enclosing path (`qs`) to every `Message` and
/// `EnumDecl` reachable in the tree.
///
/// Implemented as a localized mutable accumulator passed through recursion
/// (spec.md §4.6's "state machine... effectively a state monad over the
/// current scope"): `build_message` pushes a fresh `Namespace` on entering a
/// message and returns it on exit, with no scope ever observable outside
/// the file being processed (spec.md §5, §9).
pub fn build_namespace(file: ProtobufFile<()>) -> Result<ProtobufFile<Namespace>, DiagnosticList> {
    let mut diags = Diagnostics::new();
    let package_path = file.package_path.clone();
    let mut declarations = file.declarations;
    let mut top = Namespace::new();

    for decl in &mut declarations {
        match decl {
            Declaration::TopMessage(message) => {
                let inner = build_message(message, &package_path, &mut diags);
                insert_checked(
                    &mut top,
                    NamespaceEntry::Message {
                        name: message.name.clone(),
                        inner,
                    },
                    &mut diags,
                );
            }
            Declaration::TopEnum(e) => {
                e.enclosing_path = Some(package_path.clone());
                insert_enum(&mut top, e, &mut diags);
            }
            Declaration::Import(_) | Declaration::TopService(_) | Declaration::Option(_) => {}
        }
    }

    let wrapped = wrap_in_package(top, package_path.parts());
    let new_file = ProtobufFile {
        declarations,
        package_path,
        annotation: wrapped,
    };
    diags.into_result(new_file)
}

fn build_message(message: &mut Message, enclosing: &QualifiedName, diags: &mut Diagnostics) -> Namespace {
    message.enclosing_path = Some(enclosing.clone());
    let own_path = enclosing.joined(&message.name);

    let mut scope = Namespace::new();
    for field in &mut message.fields {
        match field {
            MessageField::Field(f) => {
                insert_checked(
                    &mut scope,
                    NamespaceEntry::Field {
                        name: f.name.clone(),
                    },
                    diags,
                );
            }
            MessageField::Nested(nested) => {
                let inner = build_message(nested, &own_path, diags);
                insert_checked(
                    &mut scope,
                    NamespaceEntry::Message {
                        name: nested.name.clone(),
                        inner,
                    },
                    diags,
                );
            }
            MessageField::MessageEnum(e) => {
                e.enclosing_path = Some(own_path.clone());
                insert_enum(&mut scope, e, diags);
            }
            MessageField::Inline(_) => {}
        }
    }
    scope
}

/// Inserts an enum and, per spec.md §4.6 step 2, hoists every enumerator
/// name into the enclosing scope as a `Field` entry.
fn insert_enum(scope: &mut Namespace, e: &EnumDecl, diags: &mut Diagnostics) {
    insert_checked(
        scope,
        NamespaceEntry::Enum {
            name: e.name.clone(),
        },
        diags,
    );
    for (value_name, _) in &e.values {
        insert_checked(
            scope,
            NamespaceEntry::Field {
                name: value_name.clone(),
            },
            diags,
        );
    }
}

fn insert_checked(scope: &mut Namespace, entry: NamespaceEntry, diags: &mut Diagnostics) {
    if let Err(DuplicateName(key)) = scope.insert(entry) {
        diags.push(Diagnostic::error(format!("duplicate name: {}", key)));
    }
}
