//! Consolidates package declarations into a file-level attribute. See
//! spec.md §4.5.

use crate::ast::{Declaration, ProtobufFile};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};
use crate::identifier::QualifiedName;

/// Scans `file`'s top-level declarations for `Package` items. Zero becomes
/// the empty `QualifiedName`; exactly one is lifted into `package_path`;
/// more than one is a fatal diagnostic and rejects the file. Package
/// declarations are *not* removed from `declarations` — only the summary is
/// lifted, per spec.md §4.5's note.
pub fn extract_package<A>(mut file: ProtobufFile<A>) -> Result<ProtobufFile<A>, DiagnosticList> {
    let mut diags = Diagnostics::new();

    let packages: Vec<&QualifiedName> = file
        .declarations
        .iter()
        .filter_map(|decl| match decl {
            Declaration::Package(path) => Some(path),
            _ => None,
        })
        .collect();

    match packages.len() {
        0 => file.package_path = QualifiedName::empty(),
        1 => file.package_path = packages[0].clone(),
        _ => diags.push(Diagnostic::error("Multiple package declarations")),
    }

    diags.into_result(file)
}
