//! Structural checks on field tags and enum labels. See spec.md §4.2.

use crate::ast::{
    visit_enums, visit_messages, EnumDecl, Message, MessageField, ProtobufFile, MAX_FIELD_TAG,
    RESERVED_TAG_RANGE,
};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};

/// Validates every `Message` and `EnumDecl` reachable anywhere in `file`
/// (top-level or nested), emitting a diagnostic for each violation of I1
/// (tag bounds) and I2 (uniqueness) rather than stopping at the first one.
/// Does not mutate the AST (P3).
pub fn validate<A>(file: &ProtobufFile<A>) -> Result<(), DiagnosticList> {
    let mut diags = Diagnostics::new();
    visit_messages(file, |message| check_message(message, &mut diags));
    visit_enums(file, |e| check_enum(e, &mut diags));
    diags.into_result(())
}

fn check_message(message: &Message, diags: &mut Diagnostics) {
    let mut tags = Vec::new();
    for field in &message.fields {
        let MessageField::Field(field) = field else {
            continue;
        };
        let tag = field.tag.value;
        if !(1..=MAX_FIELD_TAG).contains(&tag) {
            diags.push(
                Diagnostic::error(format!(
                    "Field tag {} for '{}' is out of range (must be between 1 and {})",
                    tag, field.name, MAX_FIELD_TAG
                ))
                .at_opt(field.location.clone()),
            );
        } else if RESERVED_TAG_RANGE.contains(&tag) {
            diags.push(
                Diagnostic::error(format!(
                    "Field tag is in reserved range: {} for '{}'",
                    tag, field.name
                ))
                .at_opt(field.location.clone()),
            );
        }
        tags.push(tag);
    }

    if has_duplicate(&tags) {
        diags.push(
            Diagnostic::error(format!("Duplicate label number in message '{}'", message.name))
                .at_opt(message.location.clone()),
        );
    }
}

fn check_enum(e: &EnumDecl, diags: &mut Diagnostics) {
    let values: Vec<i64> = e.values.iter().map(|(_, v)| *v).collect();
    if has_duplicate(&values) {
        diags.push(
            Diagnostic::error(format!("Duplicate label number in enum '{}'", e.name))
                .at_opt(e.location.clone()),
        );
    }
}

/// Duplicate detection by comparing the sorted list against its deduplicated
/// form, per spec.md §4.2.
fn has_duplicate<T: Ord + Clone>(values: &[T]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort();
    let mut deduped = sorted.clone();
    deduped.dedup();
    deduped.len() != sorted.len()
}
