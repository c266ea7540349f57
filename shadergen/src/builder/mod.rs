//! Builds a [`ShaderModel`] from a resolved program and a set of entry points.

mod bindings;
mod layout;
mod lower;
mod reachability;
mod validate;

use crate::error::{Result, ShaderGenError};
use crate::logger::Logger;
use crate::model::{EntryPointSet, ResourceBinding, ShaderFunction, ShaderModel, StageUsage};
use indexmap::{IndexMap, IndexSet};
use reachability::CallGraph;
use shadergen_ir::source::ResolvedProgram;
use shadergen_ir::ResourceKind;
use std::collections::HashMap;

/// Builds the model of one program variant.
///
/// Only what the selected entry points transitively reach ends up in the
/// model. Resource slots are assigned over the whole program so every variant
/// agrees on them; explicit slot collisions only fail the variants that use
/// both resources.
pub fn build_model(program: &ResolvedProgram, entry_points: &EntryPointSet) -> Result<ShaderModel> {
    let mut logger = Logger::new();
    let slots = bindings::assign_bindings(&program.resources);

    let mut roots = Vec::new();
    for stage in entry_points.stages() {
        let Some(name) = entry_points.get(stage) else {
            continue;
        };
        let decl = program
            .function(name)
            .ok_or_else(|| ShaderGenError::EntryPointNotFound(name.to_string()))?;
        if decl.metadata.stage != Some(stage) {
            return Err(ShaderGenError::NotAnEntryPoint {
                name: name.to_string(),
                expected: stage,
            });
        }
        roots.push((stage, decl.name.as_str()));
    }

    // Lower everything the entries reach.
    let mut lowered: HashMap<String, ShaderFunction> = HashMap::new();
    let mut calls = CallGraph::new();
    let mut pending: Vec<&str> = roots.iter().map(|(_, name)| *name).collect();
    while let Some(name) = pending.pop() {
        if lowered.contains_key(name) {
            continue;
        }
        let decl = program
            .function(name)
            .ok_or_else(|| ShaderGenError::EntryPointNotFound(name.to_string()))?;
        log::trace!("lowering {}", decl.name);
        let (function, callees) = lower::lower_function(program, decl)?;
        for callee in &callees {
            if let Some(callee) = program.function(callee) {
                pending.push(&callee.name);
            }
        }
        calls.insert(name.to_string(), callees);
        lowered.insert(name.to_string(), function);
    }

    let root_names: Vec<&str> = roots.iter().map(|(_, name)| *name).collect();
    let order = reachability::order_functions(&root_names, &calls)?;
    let mut functions = IndexMap::with_capacity(order.len());
    for name in order {
        if let Some(function) = lowered.remove(&name) {
            functions.insert(name, function);
        }
    }

    // Per-stage usage, resources and structs.
    let mut resource_types = HashMap::new();
    let mut struct_defs = HashMap::new();
    let mut usage = IndexMap::new();
    for (stage, entry) in &roots {
        let mut stage_usage = StageUsage {
            functions: reachability::reachable_functions(entry, &calls),
            ..Default::default()
        };
        let mut seeds = IndexSet::new();
        for function in functions.values().filter(|f| stage_usage.functions.contains(&f.qualified_name)) {
            reachability::function_resources(function, &mut stage_usage.resources);
            reachability::function_structs(function, &mut seeds);
        }
        for name in &stage_usage.resources {
            if !resource_types.contains_key(name) {
                let decl = program.resource(name).ok_or_else(|| {
                    ShaderGenError::construct(entry.to_string(), format!("unknown resource {name}"))
                })?;
                resource_types.insert(name.clone(), lower::lower_resource(program, decl)?);
            }
            if let Some(element) = resource_types.get(name).and_then(|r| r.element()) {
                reachability::type_structs(element, &mut seeds);
            }
        }
        stage_usage.structs = reachability::close_structs(program, &seeds, &mut struct_defs)?;
        usage.insert(*stage, stage_usage);
    }

    let mut reached_structs = IndexSet::new();
    for stage_usage in usage.values() {
        reached_structs.extend(stage_usage.structs.iter().cloned());
    }
    let mut structs = IndexMap::new();
    for name in reachability::order_structs(program, &reached_structs, &struct_defs)? {
        if let Some(definition) = struct_defs.get(&name) {
            structs.insert(name, definition.clone());
        }
    }

    let mut resources = Vec::new();
    for (decl, (set, slot)) in program.resources.iter().zip(slots) {
        if let Some(ty) = resource_types.remove(&decl.name) {
            resources.push(ResourceBinding {
                name: decl.name.clone(),
                ty,
                set,
                slot,
            });
        }
    }
    bindings::check_collisions(&resources)?;

    // Validation.
    for (stage, entry) in &roots {
        if let Some(function) = functions.get(*entry) {
            validate::validate_entry(function, *stage, &struct_defs, &mut logger)?;
        }
        if let Some(stage_usage) = usage.get(stage) {
            for function in functions.values().filter(|f| stage_usage.functions.contains(&f.qualified_name)) {
                validate::validate_stage_intrinsics(function, *stage)?;
            }
        }
    }
    for function in functions.values() {
        if !roots.iter().any(|(_, entry)| *entry == function.qualified_name) {
            validate::validate_helper(function)?;
        }
    }
    if let Some(vertex) = entry_points.vertex.as_deref().and_then(|v| functions.get(v)) {
        let fragment = entry_points.fragment.as_deref().and_then(|f| functions.get(f));
        validate::validate_vertex_input(vertex, fragment)?;
        if let Some(fragment) = fragment {
            validate::validate_varyings(vertex, fragment, &struct_defs)?;
        }
    }

    for resource in &resources {
        if resource.kind() != ResourceKind::UniformBuffer {
            continue;
        }
        if let Some(element) = resource.ty.element() {
            let size = layout::host_size(element, &struct_defs);
            if size % 16 != 0 {
                logger.warn(format!(
                    "uniform buffer {} has size {}, which is not a multiple of 16",
                    resource.name, size
                ));
            }
        }
    }

    log::debug!(
        "built model for {}: {} structs, {} resources, {} functions",
        entry_points,
        structs.len(),
        resources.len(),
        functions.len()
    );

    Ok(ShaderModel {
        structs,
        resources,
        functions,
        entry_points: entry_points.clone(),
        usage,
        warnings: logger.finalize(),
    })
}
