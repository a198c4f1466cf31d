//! The set of schema files participating in one compilation. See spec.md
//! §3.3 and the GLOSSARY entry for "Bundle".

use std::collections::HashMap;
use std::fmt;

use crate::ast::{Declaration, ProtobufFile};

/// An interned identifier for a file within a [`Bundle`], e.g. a resolved
/// path. Kept as a small newtype rather than a bare `String` so that
/// `files`/`import_map`/`file_map` (spec.md §3.3) all key on the same type,
/// in the spirit of `module::Module`'s newtype-over-path style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        FileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compilation unit: every file under consideration, plus the import
/// graph resolved to [`FileId`]s by the (external) parser.
///
/// Generic over the files' current annotation payload `A`, matching
/// `ProtobufFile<A>` — a `Bundle<()>` is freshly parsed, a
/// `Bundle<Namespace>` has been through the namespace builder, and so on.
#[derive(Debug)]
pub struct Bundle<A = ()> {
    /// Files in parser-supplied order; this order determines diagnostic
    /// emission order across the bundle (spec.md §5).
    pub files: Vec<FileId>,
    /// Maps an `Import` literal as written in any file to the [`FileId`] it
    /// resolves to. Populated by the (external) parser before the bundle
    /// enters the core (spec.md §6).
    pub import_map: HashMap<String, FileId>,
    /// The parsed, annotated file for each [`FileId`].
    pub file_map: HashMap<FileId, ProtobufFile<A>>,
}

impl<A> Default for Bundle<A> {
    fn default() -> Self {
        Bundle {
            files: Vec::new(),
            import_map: HashMap::new(),
            file_map: HashMap::new(),
        }
    }
}

impl<A> Bundle<A> {
    pub fn new() -> Self {
        Bundle::default()
    }

    pub fn insert_file(&mut self, id: FileId, file: ProtobufFile<A>) {
        self.files.push(id.clone());
        self.file_map.insert(id, file);
    }

    pub fn insert_import(&mut self, literal: impl Into<String>, resolved: FileId) {
        self.import_map.insert(literal.into(), resolved);
    }

    /// The files a given file imports directly, resolved to [`FileId`]s via
    /// `import_map`.
    pub fn direct_imports(&self, id: &FileId) -> Vec<FileId> {
        let Some(file) = self.file_map.get(id) else {
            return Vec::new();
        };
        file.declarations
            .iter()
            .filter_map(|decl| match decl {
                Declaration::Import(literal) => self.import_map.get(literal).cloned(),
                _ => None,
            })
            .collect()
    }
}
