//! Role-based capitalization. See spec.md §4.4.

use crate::ast::{Declaration, EnumDecl, Message, MessageField, ProtobufFile};
use crate::identifier::{Identifier, Role};

/// Applies role-based capitalization to every `Type`- and `Field`-role
/// identifier anywhere in `file`: Package declarations (not yet lifted to
/// `package_path` — that happens in the next stage), messages, nested
/// messages, inline enums, and top-level enums. Identifiers of other roles
/// (`Package`, `Method`, `Service`) are left alone, per spec.md §4.4.
///
/// An empty identifier reaching this stage is a precondition violation —
/// the parser must never produce one — and is unreachable in practice
/// because `Identifier::new` already panics on construction.
pub fn mangle<A>(file: &mut ProtobufFile<A>) {
    for decl in &mut file.declarations {
        match decl {
            Declaration::Package(path) => {
                for component in path.parts_mut() {
                    mangle_identifier(component);
                }
            }
            Declaration::TopMessage(message) => mangle_message(message),
            Declaration::TopEnum(e) => mangle_enum(e),
            Declaration::Import(_) | Declaration::TopService(_) | Declaration::Option(_) => {}
        }
    }
}

fn mangle_message(message: &mut Message) {
    mangle_identifier(&mut message.name);
    for field in &mut message.fields {
        match field {
            MessageField::Field(f) => mangle_identifier(&mut f.name),
            MessageField::Nested(nested) => mangle_message(nested),
            MessageField::MessageEnum(e) => mangle_enum(e),
            MessageField::Inline(_) => {}
        }
    }
}

fn mangle_enum(e: &mut EnumDecl) {
    mangle_identifier(&mut e.name);
    for (name, _) in &mut e.values {
        mangle_identifier(name);
    }
}

fn mangle_identifier(id: &mut Identifier) {
    match id.role() {
        Role::Type => set_first_char_upper(id),
        Role::Field => set_first_char_lower(id),
        Role::Package | Role::Method | Role::Service => {}
    }
}

fn set_first_char_upper(id: &mut Identifier) {
    let mut chars = id.as_str().chars();
    let Some(first) = chars.next() else {
        return;
    };
    let mangled: String = first.to_uppercase().chain(chars).collect();
    id.set_text(mangled);
}

fn set_first_char_lower(id: &mut Identifier) {
    let mut chars = id.as_str().chars();
    let Some(first) = chars.next() else {
        return;
    };
    let mangled: String = first.to_lowercase().chain(chars).collect();
    id.set_text(mangled);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BuiltinType;

    fn make_field(name: &str) -> MessageField {
        MessageField::Field(crate::ast::Field {
            modifier: crate::ast::Modifier::Optional,
            field_type: crate::ast::FieldType::Builtin(BuiltinType::Int32),
            name: Identifier::field_name(name),
            tag: crate::ast::FieldTag::new(1),
            options: Vec::new(),
            location: None,
        })
    }

    #[test]
    fn mangles_type_and_field_identifiers() {
        let message = Message::new(
            Identifier::type_name("foo"),
            vec![make_field("Bar")],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]);
        mangle(&mut file);

        let m = file.top_messages().next().unwrap();
        assert_eq!(m.name.as_str(), "Foo");
        match &m.fields[0] {
            MessageField::Field(f) => assert_eq!(f.name.as_str(), "bar"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn mangling_is_idempotent() {
        let message = Message::new(Identifier::type_name("foo"), vec![make_field("Bar")]);
        let mut once = ProtobufFile::new(vec![Declaration::TopMessage(message)]);
        mangle(&mut once);
        let mut twice = once.clone();
        mangle(&mut twice);
        assert_eq!(once, twice);
    }
}
