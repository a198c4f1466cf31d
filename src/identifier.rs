//! Identifiers tagged by syntactic role, and the qualified names built from them.

use std::fmt;

use itertools::Itertools;

use crate::diagnostics::Span;

/// The syntactic role an [`Identifier`] plays in a schema.
///
/// The role is carried alongside the identifier (rather than encoded as a
/// phantom type parameter) so that [`Namespace`](crate::namespace::Namespace)
/// entries, which mix roles in a single collection, can still recover it at
/// runtime; see spec.md §3.1 and §9 ("phantom-tagged identifiers").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Type,
    Field,
    Package,
    Method,
    Service,
}

/// A non-empty string tagged by [`Role`].
///
/// Constructing an `Identifier` from an empty string is an invariant
/// violation (the parser must never produce one) and panics, matching the
/// teacher's treatment of "should never happen" upstream-contract breaches
/// (e.g. `extern_paths::ExternPaths::resolve_ident`'s `assert_eq!` on a
/// leading dot).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    text: String,
    role: Role,
    location: Option<Span>,
}

impl Identifier {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        let text = text.into();
        assert!(
            !text.is_empty(),
            "empty identifier violates the parser's contract (role {:?})",
            role
        );
        Identifier {
            text,
            role,
            location: None,
        }
    }

    /// Attaches the point in the source this identifier was parsed from.
    pub fn with_location(mut self, location: Span) -> Self {
        self.location = Some(location);
        self
    }

    pub fn location(&self) -> Option<&Span> {
        self.location.as_ref()
    }

    pub fn type_name(text: impl Into<String>) -> Self {
        Self::new(text, Role::Type)
    }

    pub fn field_name(text: impl Into<String>) -> Self {
        Self::new(text, Role::Field)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Replaces the identifier's text in place, preserving its role.
    ///
    /// Used by the name mangler (spec.md §4.4), which only ever rewrites the
    /// leading character.
    pub fn set_text(&mut self, text: String) {
        assert!(!text.is_empty(), "mangler must not produce an empty identifier");
        self.text = text;
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An ordered sequence of `Type`-role identifiers; may be empty (the root
/// package). See spec.md §3.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    components: Vec<Identifier>,
}

impl QualifiedName {
    pub fn empty() -> Self {
        QualifiedName {
            components: Vec::new(),
        }
    }

    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Identifier>,
    {
        let components: Vec<_> = parts.into_iter().collect();
        debug_assert!(
            components.iter().all(|id| id.role() == Role::Type),
            "QualifiedName components must be Type-role identifiers"
        );
        QualifiedName { components }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn parts(&self) -> impl DoubleEndedIterator<Item = &Identifier> {
        self.components.iter()
    }

    pub fn parts_mut(&mut self) -> impl Iterator<Item = &mut Identifier> {
        self.components.iter_mut()
    }

    /// The path with its last component dropped, i.e. the enclosing scope.
    pub fn parent(&self) -> Option<QualifiedName> {
        if self.components.is_empty() {
            None
        } else {
            Some(QualifiedName {
                components: self.components[..self.components.len() - 1].to_vec(),
            })
        }
    }

    pub fn push(&mut self, component: Identifier) {
        assert_eq!(component.role(), Role::Type);
        self.components.push(component);
    }

    pub fn joined(&self, leaf: &Identifier) -> QualifiedName {
        let mut components = self.components.clone();
        components.push(leaf.clone());
        QualifiedName { components }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.iter().map(Identifier::as_str).join("."))
    }
}

/// A package path plus a single leaf type name, unambiguously identifying a
/// declaration across the entire bundle. See spec.md §3.1 and the GLOSSARY.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullyQualifiedReference {
    package_path: QualifiedName,
    leaf: Identifier,
}

impl FullyQualifiedReference {
    pub fn new(package_path: QualifiedName, leaf: Identifier) -> Self {
        assert_eq!(leaf.role(), Role::Type);
        FullyQualifiedReference { package_path, leaf }
    }

    pub fn package_path(&self) -> &QualifiedName {
        &self.package_path
    }

    pub fn leaf(&self) -> &Identifier {
        &self.leaf
    }

    /// The full path, package components followed by the leaf.
    pub fn full_path(&self) -> QualifiedName {
        self.package_path.joined(&self.leaf)
    }
}

impl fmt::Display for FullyQualifiedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package_path.is_empty() {
            write!(f, "{}", self.leaf)
        } else {
            write!(f, "{}.{}", self.package_path, self.leaf)
        }
    }
}
