//! Canonicalizes field order within every message. See spec.md §4.3.

use crate::ast::{visit_messages_mut, MessageField, ProtobufFile};

/// Synthetic tag for `MessageField` items that aren't a `Field` — they sort
/// before every real field, per spec.md §4.3 and the REDESIGN-FLAGS-adjacent
/// note in §9 codifying this as intentional.
const SYNTHETIC_TAG: i32 = -1;

fn sort_key(field: &MessageField) -> i32 {
    match field {
        MessageField::Field(f) => f.tag.value,
        MessageField::Nested(_) | MessageField::MessageEnum(_) | MessageField::Inline(_) => {
            SYNTHETIC_TAG
        }
    }
}

/// Reorders every message's field list (top-level or nested, anywhere in
/// `file`) so that `Field` items appear in ascending tag order. The sort is
/// stable, so items sharing a tag — including every non-`Field` item, which
/// all share the synthetic tag `-1` — keep their relative order (P2).
pub fn sort_fields<A>(file: &mut ProtobufFile<A>) {
    visit_messages_mut(file, &mut |message| {
        message.fields.sort_by_key(sort_key);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BuiltinType, Declaration, Field, FieldTag, FieldType, Message, Modifier};
    use crate::identifier::Identifier;

    fn field(name: &str, tag: i32) -> MessageField {
        MessageField::Field(Field {
            modifier: Modifier::Required,
            field_type: FieldType::Builtin(BuiltinType::Int32),
            name: Identifier::field_name(name),
            tag: FieldTag::new(tag),
            options: Vec::new(),
            location: None,
        })
    }

    #[test]
    fn sorts_fields_ascending_by_tag() {
        let message = Message::new(
            Identifier::type_name("M"),
            vec![field("c", 3), field("a", 1), field("b", 2)],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]);
        sort_fields(&mut file);

        let names: Vec<_> = file
            .top_messages()
            .next()
            .unwrap()
            .fields
            .iter()
            .map(|f| match f {
                MessageField::Field(field) => field.name.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn non_field_items_sort_before_fields_and_keep_relative_order() {
        let nested = Message::new(Identifier::type_name("Nested"), vec![]);
        let message = Message::new(
            Identifier::type_name("M"),
            vec![
                field("z", 5),
                MessageField::Nested(nested.clone()),
                field("a", 1),
            ],
        );
        let mut file = ProtobufFile::new(vec![Declaration::TopMessage(message)]);
        sort_fields(&mut file);

        let fields = &file.top_messages().next().unwrap().fields;
        assert!(matches!(fields[0], MessageField::Nested(_)));
        assert!(matches!(fields[1], MessageField::Field(_)));
        assert!(matches!(fields[2], MessageField::Field(_)));
    }

    #[test]
    fn sort_is_idempotent() {
        let message = Message::new(
            Identifier::type_name("M"),
            vec![field("c", 3), field("a", 1), field("b", 2)],
        );
        let mut once = ProtobufFile::new(vec![Declaration::TopMessage(message)]);
        sort_fields(&mut once);
        let mut twice = once.clone();
        sort_fields(&mut twice);
        assert_eq!(once, twice);
    }
}
