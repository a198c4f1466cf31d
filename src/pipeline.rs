//! Wires the ten pipeline stages into a single entry point, the way
//! `prost-build::Config::compile_protos` glues its own stages together
//! (parse, build a `MessageGraph`, generate). See spec.md §2.

use crate::ast::ProtobufFile;
use crate::bundle::Bundle;
use crate::diagnostics::{DiagnosticList, Diagnostics};
use crate::ir::IrMap;
use crate::namespace::Namespace;
use crate::stages::{
    field_sorter, import_resolver, label_validator, lowering, name_mangler, namespace_builder,
    package_extractor, type_resolver,
};

/// Runs every stage over `bundle` in spec order, returning the final IR or
/// every diagnostic collected along the way.
///
/// Diagnostics from earlier stages are not discarded when a later stage
/// also fails: per spec.md §5, output order is fixed by the bundle's file
/// order, but a stage that already failed for some files still lets the
/// remaining files continue through the same stage, so the full set of
/// problems in one pass is visible to the caller in one `DiagnosticList`
/// rather than being rediscovered build after build.
pub fn run(bundle: Bundle<()>) -> Result<IrMap, DiagnosticList> {
    let mut diags = Diagnostics::new();

    let mut per_file: Vec<ProtobufFile<()>> = Vec::with_capacity(bundle.files.len());
    let mut file_ids = Vec::with_capacity(bundle.files.len());
    let import_map = bundle.import_map.clone();
    for id in &bundle.files {
        let Some(file) = bundle.file_map.get(id) else {
            continue;
        };
        file_ids.push(id.clone());
        per_file.push(file.clone());
    }

    let mut mangled = Vec::with_capacity(per_file.len());
    for mut file in per_file {
        log::debug!("validating labels");
        if let Err(err) = label_validator::validate(&file) {
            diags.extend_from_list(err);
            continue;
        }

        log::debug!("sorting fields");
        field_sorter::sort_fields(&mut file);

        log::debug!("mangling names");
        name_mangler::mangle(&mut file);

        log::debug!("extracting package");
        match package_extractor::extract_package(file) {
            Ok(file) => mangled.push(file),
            Err(err) => diags.extend_from_list(err),
        }
    }

    if !diags.is_empty() {
        return Err(diags.into_result(()).unwrap_err());
    }

    let mut namespaced: Vec<ProtobufFile<Namespace>> = Vec::with_capacity(mangled.len());
    for file in mangled {
        log::debug!("building namespace");
        match namespace_builder::build_namespace(file) {
            Ok(file) => namespaced.push(file),
            Err(err) => diags.extend_from_list(err),
        }
    }

    if !diags.is_empty() {
        return Err(diags.into_result(()).unwrap_err());
    }

    let mut namespaced_bundle: Bundle<Namespace> = Bundle::new();
    namespaced_bundle.import_map = import_map;
    for (id, file) in file_ids.into_iter().zip(namespaced) {
        namespaced_bundle.insert_file(id, file);
    }

    log::debug!("resolving imports");
    let imported = match import_resolver::resolve_imports(namespaced_bundle) {
        Ok(files) => files,
        Err(err) => return Err(err),
    };

    let mut resolved = Vec::with_capacity(imported.len());
    for file in imported {
        log::debug!("resolving types");
        match type_resolver::resolve_types(file) {
            Ok(file) => resolved.push(file),
            Err(err) => diags.extend_from_list(err),
        }
    }

    if !diags.is_empty() {
        return Err(diags.into_result(()).unwrap_err());
    }

    log::debug!("lowering to IR");
    lowering::lower(resolved)
}
