//! Namespaces: the mapping from textual identifier to declaration that the
//! namespace builder, import resolver, and type resolver build, merge, and
//! search. See spec.md §3.3.

use std::collections::HashMap;

use crate::identifier::Identifier;

/// One binding in a [`Namespace`]. The role is recorded in the variant
/// itself rather than read off the key, since a textual key alone doesn't
/// distinguish "this is a message" from "this is a field" (spec.md §3.3).
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceEntry {
    Message { name: Identifier, inner: Namespace },
    Enum { name: Identifier },
    Field { name: Identifier },
}

impl NamespaceEntry {
    pub fn name(&self) -> &Identifier {
        match self {
            NamespaceEntry::Message { name, .. } => name,
            NamespaceEntry::Enum { name } => name,
            NamespaceEntry::Field { name } => name,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NamespaceEntry::Message { .. } | NamespaceEntry::Enum { .. }
        )
    }
}

/// A single-level mapping from textual identifier to [`NamespaceEntry`].
/// No two entries within one `Namespace` may share a textual key (spec.md
/// I5's "no two sibling entries share a textual key").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    entries: HashMap<String, NamespaceEntry>,
}

/// Returned by [`Namespace::insert`] when the key is already bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName(pub String);

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    /// Inserts `entry` under its own name. Fails without mutating the
    /// namespace if the key is already bound (spec.md §4.6: "Any insertion
    /// whose key already exists emits a 'duplicate name' diagnostic and is
    /// skipped").
    pub fn insert(&mut self, entry: NamespaceEntry) -> Result<(), DuplicateName> {
        let key = entry.name().as_str().to_owned();
        if self.entries.contains_key(&key) {
            return Err(DuplicateName(key));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&NamespaceEntry> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamespaceEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a dot-separated path by descending through nested
    /// `Message` entries, per spec.md §4.8 step 2: "for each dot-separated
    /// segment, descend through a MessageEntry's inner namespace; the final
    /// segment must match a MessageEntry or EnumEntry" (the final segment
    /// may in fact match any entry — whether that's a valid *type*
    /// reference is for the caller to check).
    pub fn lookup_path<'a>(&self, path: impl Iterator<Item = &'a str>) -> Option<&NamespaceEntry> {
        let mut segments = path.peekable();
        let mut current = self;
        loop {
            let segment = segments.next()?;
            let entry = current.get(segment)?;
            if segments.peek().is_none() {
                return Some(entry);
            }
            match entry {
                NamespaceEntry::Message { inner, .. } => current = inner,
                _ => return None,
            }
        }
    }

    /// Wraps `self` as if it were the contents of a synthetic message named
    /// `component`, the building block for [`wrap_in_package`].
    fn wrap_one(self, component: &Identifier) -> Namespace {
        let mut wrapper = Namespace::new();
        wrapper
            .insert(NamespaceEntry::Message {
                name: component.clone(),
                inner: self,
            })
            .expect("a freshly created namespace cannot have a duplicate key");
        wrapper
    }
}

/// Wraps `ns` under the path `[p1, p2, ..., pk]`, right-to-left, so that a
/// lookup of `p1.p2.....pk.X` in the result terminates in a lookup of `X` in
/// `ns` (spec.md §3.3's `PackageNamespace` right-fold, P8 in §8). The
/// package root is treated as if it were a synthetic message, matching
/// spec.md §4.6 step 3's note: "The Namespace treats the package root as if
/// it were a synthetic message; this permits uniform lookup."
pub fn wrap_in_package<'a>(ns: Namespace, path: impl DoubleEndedIterator<Item = &'a Identifier>) -> Namespace {
    path.rfold(ns, |acc, component| acc.wrap_one(component))
}
