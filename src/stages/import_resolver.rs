//! Merges namespaces of imported files into each importer. See spec.md §4.7.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{Graph, NodeIndex};

use crate::ast::ProtobufFile;
use crate::bundle::{Bundle, FileId};
use crate::diagnostics::{Diagnostic, DiagnosticList, Diagnostics};
use crate::namespace::{DuplicateName, Namespace};

/// Builds a graph with an edge from every imported file to each of its
/// importers — the same `HashMap<_, NodeIndex>` + `Graph` shape
/// `message_graph::MessageGraph` uses for message nesting, repurposed here
/// for import dependency order. Edge direction is chosen so that
/// [`petgraph::algo::toposort`] naturally yields imported files before the
/// files that import them.
fn build_import_graph(bundle: &Bundle<Namespace>) -> Graph<FileId, ()> {
    let mut graph = Graph::new();
    let mut index: HashMap<FileId, NodeIndex> = HashMap::new();

    fn node_for(
        id: &FileId,
        graph: &mut Graph<FileId, ()>,
        index: &mut HashMap<FileId, NodeIndex>,
    ) -> NodeIndex {
        *index
            .entry(id.clone())
            .or_insert_with(|| graph.add_node(id.clone()))
    }

    for file in &bundle.files {
        node_for(file, &mut graph, &mut index);
        for imported in bundle.direct_imports(file) {
            let importer_idx = node_for(file, &mut graph, &mut index);
            let imported_idx = node_for(&imported, &mut graph, &mut index);
            graph.add_edge(imported_idx, importer_idx, ());
        }
    }

    graph
}

/// Merges `src` into `dest`, emitting a "duplicate name in imports"
/// diagnostic for each overlapping key (spec.md §4.7). Since
/// `Namespace::insert` never merges the inner namespace of a colliding
/// `Message` entry, two messages sharing a fully qualified name are
/// reported as a collision rather than silently unified, matching spec.md's
/// explicit requirement.
fn merge_into(dest: &mut Namespace, src: &Namespace, importer: &FileId, diags: &mut Diagnostics) {
    for (_, entry) in src.iter() {
        if let Err(DuplicateName(key)) = dest.insert(entry.clone()) {
            diags.push(Diagnostic::error(format!(
                "duplicate name in imports: '{}' (importer: {})",
                key, importer
            )));
        }
    }
}

/// Merges each file's own namespace with the namespaces of every file it
/// (transitively) imports, returning the bundle's files in their original
/// order — `files`/`import_map`/`file_map` are then discarded, per spec.md
/// §4.7: "After this stage, each file is self-contained; the Bundle
/// envelope is discarded."
///
/// Transitivity (I6) falls out of processing files in import-topological
/// order: by the time an importer is merged, each of its direct imports has
/// already absorbed *its own* imports, so a single non-transitive merge per
/// file (spec.md §4.7's description) accumulates the full transitive
/// closure by construction.
pub fn resolve_imports(bundle: Bundle<Namespace>) -> Result<Vec<ProtobufFile<Namespace>>, DiagnosticList> {
    let graph = build_import_graph(&bundle);
    let mut overall = Diagnostics::new();

    let order: Vec<FileId> = match toposort(&graph, None) {
        Ok(order) => order.into_iter().map(|idx| graph[idx].clone()).collect(),
        Err(cycle) => {
            overall.push(Diagnostic::error(format!(
                "cyclic import detected involving '{}'",
                graph[cycle.node_id()]
            )));
            // Best effort: fall back to bundle order so every file still
            // gets *some* merge attempt, even if a cycle leaves it partial.
            bundle.files.clone()
        }
    };

    let mut merged: HashMap<FileId, Namespace> = HashMap::new();
    let mut per_file_diags: HashMap<FileId, Diagnostics> = HashMap::new();

    for id in &order {
        let Some(own) = bundle.file_map.get(id) else {
            continue;
        };
        let mut acc = own.annotation.clone();
        let mut file_diags = Diagnostics::new();
        for imported in bundle.direct_imports(id) {
            if let Some(imported_ns) = merged.get(&imported) {
                merge_into(&mut acc, imported_ns, id, &mut file_diags);
            } else if let Some(imported_file) = bundle.file_map.get(&imported) {
                // Not yet merged — part of a cycle the toposort couldn't
                // order. Fall back to its own (unmerged) namespace.
                merge_into(&mut acc, &imported_file.annotation, id, &mut file_diags);
            }
        }
        merged.insert(id.clone(), acc);
        per_file_diags.insert(id.clone(), file_diags);
    }

    // Diagnostic emission order follows the bundle's original file order,
    // per spec.md §5, independent of the topological processing order above.
    let mut files = Vec::with_capacity(bundle.files.len());
    for id in &bundle.files {
        if let Some(file_diags) = per_file_diags.remove(id) {
            overall.extend(file_diags);
        }
        let mut file = bundle
            .file_map
            .get(id)
            .expect("bundle.files entries must exist in file_map")
            .clone();
        if let Some(ns) = merged.get(id) {
            file.annotation = ns.clone();
        }
        files.push(file);
    }

    overall.into_result(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Declaration;
    use crate::identifier::Identifier;
    use crate::namespace::NamespaceEntry;
    use pretty_assertions::assert_eq;

    fn file_with_message(name: &str) -> ProtobufFile<Namespace> {
        let mut ns = Namespace::new();
        ns.insert(NamespaceEntry::Message {
            name: Identifier::type_name(name),
            inner: Namespace::new(),
        })
        .unwrap();
        ProtobufFile {
            declarations: vec![Declaration::Import("b.proto".to_string())],
            package_path: crate::identifier::QualifiedName::empty(),
            annotation: ns,
        }
    }

    #[test]
    fn merges_direct_import_namespace() {
        let mut bundle: Bundle<Namespace> = Bundle::new();
        let a = FileId::new("a.proto");
        let b = FileId::new("b.proto");

        let mut a_file = file_with_message("A");
        a_file.declarations = vec![Declaration::Import("b.proto".to_string())];
        let b_file = file_with_message("B");

        bundle.insert_import("b.proto", b.clone());
        bundle.insert_file(a.clone(), a_file);
        bundle.insert_file(b.clone(), b_file);

        let resolved = resolve_imports(bundle).unwrap();
        let a_resolved = resolved.iter().find(|f| f.annotation.get("A").is_some()).unwrap();
        assert!(a_resolved.annotation.get("B").is_some());
    }

    #[test]
    fn colliding_import_is_diagnosed() {
        let mut bundle: Bundle<Namespace> = Bundle::new();
        let a = FileId::new("a.proto");
        let b = FileId::new("b.proto");

        let mut a_file = file_with_message("Color");
        a_file.declarations = vec![Declaration::Import("b.proto".to_string())];
        let b_file = file_with_message("Color");

        bundle.insert_import("b.proto", b.clone());
        bundle.insert_file(a.clone(), a_file);
        bundle.insert_file(b.clone(), b_file);

        let err = resolve_imports(bundle).unwrap_err();
        let messages: Vec<&str> = err.as_slice().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate name in imports: 'Color' (importer: a.proto)"]);
    }
}
