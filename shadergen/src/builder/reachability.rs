//! Call graph, resource and struct reachability.

use crate::builder::lower::lower_struct;
use crate::error::{Result, ShaderGenError};
use crate::model::{ShaderFunction, StructDefinition};
use indexmap::{IndexMap, IndexSet};
use shadergen_ir::ir::{ExprKind, Stmt};
use shadergen_ir::source::ResolvedProgram;
use shadergen_ir::visit::{for_each_expr, for_each_stmt};
use shadergen_ir::ShaderType;
use std::collections::HashMap;

pub(crate) type CallGraph = IndexMap<String, IndexSet<String>>;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders every function reachable from `roots` with callees before callers.
///
/// A cycle in the call graph is reported against the calling function.
pub(crate) fn order_functions(roots: &[&str], calls: &CallGraph) -> Result<Vec<String>> {
    fn visit(
        name: &str,
        calls: &CallGraph,
        marks: &mut HashMap<String, Mark>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        marks.insert(name.to_string(), Mark::Visiting);
        if let Some(callees) = calls.get(name) {
            for callee in callees {
                match marks.get(callee.as_str()) {
                    Some(Mark::Visiting) => {
                        return Err(ShaderGenError::construct(
                            name,
                            format!("recursive call to {callee}"),
                        ))
                    }
                    Some(Mark::Done) => {}
                    None => visit(callee, calls, marks, order)?,
                }
            }
        }
        marks.insert(name.to_string(), Mark::Done);
        order.push(name.to_string());
        Ok(())
    }

    let mut marks = HashMap::new();
    let mut order = Vec::new();
    for root in roots {
        if !marks.contains_key(*root) {
            visit(root, calls, &mut marks, &mut order)?;
        }
    }
    Ok(order)
}

/// Functions transitively called from `entry`, including itself.
pub(crate) fn reachable_functions(entry: &str, calls: &CallGraph) -> IndexSet<String> {
    let mut reached = IndexSet::new();
    let mut pending = vec![entry.to_string()];
    while let Some(name) = pending.pop() {
        if let Some(callees) = calls.get(&name) {
            pending.extend(callees.iter().filter(|c| !reached.contains(*c)).cloned());
        }
        reached.insert(name);
    }
    reached
}

pub(crate) fn function_resources(function: &ShaderFunction, out: &mut IndexSet<String>) {
    for_each_expr(&function.body, &mut |expr| {
        if let ExprKind::Resource(name) = &expr.kind {
            out.insert(name.clone());
        }
    });
}

/// Struct names a type refers to directly.
pub(crate) fn type_structs(ty: &ShaderType, out: &mut IndexSet<String>) {
    match ty {
        ShaderType::Struct(name) => {
            out.insert(name.clone());
        }
        ShaderType::Array(element, _) => type_structs(element, out),
        ShaderType::Resource(resource) => {
            if let Some(element) = resource.element() {
                type_structs(element, out)
            }
        }
        _ => {}
    }
}

pub(crate) fn function_structs(function: &ShaderFunction, out: &mut IndexSet<String>) {
    type_structs(&function.return_type, out);
    for param in &function.params {
        type_structs(&param.ty, out);
    }
    for_each_stmt(&function.body, &mut |stmt| {
        if let Stmt::Declare { ty, .. } = stmt {
            type_structs(ty, out);
        }
    });
    for_each_expr(&function.body, &mut |expr| type_structs(&expr.ty, out));
}

/// Closes `seeds` over nested field types, lowering each struct once.
pub(crate) fn close_structs(
    program: &ResolvedProgram,
    seeds: &IndexSet<String>,
    lowered: &mut HashMap<String, StructDefinition>,
) -> Result<IndexSet<String>> {
    let mut reached = IndexSet::new();
    let mut pending: Vec<String> = seeds.iter().cloned().collect();
    while let Some(name) = pending.pop() {
        if !reached.insert(name.clone()) {
            continue;
        }
        if !lowered.contains_key(&name) {
            let decl = program.struct_decl(&name).ok_or_else(|| {
                ShaderGenError::construct(&name, format!("unknown struct type {name}"))
            })?;
            lowered.insert(name.clone(), lower_struct(program, decl)?);
        }
        if let Some(definition) = lowered.get(&name) {
            let mut nested = IndexSet::new();
            for field in &definition.fields {
                type_structs(&field.ty, &mut nested);
            }
            pending.extend(nested.into_iter().filter(|n| !reached.contains(n)));
        }
    }
    Ok(reached)
}

/// Orders the reached structs by declaration, placing dependencies first.
pub(crate) fn order_structs(
    program: &ResolvedProgram,
    reached: &IndexSet<String>,
    lowered: &HashMap<String, StructDefinition>,
) -> Result<Vec<String>> {
    fn visit(
        name: &str,
        lowered: &HashMap<String, StructDefinition>,
        marks: &mut HashMap<String, Mark>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        marks.insert(name.to_string(), Mark::Visiting);
        if let Some(definition) = lowered.get(name) {
            let mut nested = IndexSet::new();
            for field in &definition.fields {
                type_structs(&field.ty, &mut nested);
            }
            for dependency in nested {
                match marks.get(&dependency) {
                    Some(Mark::Visiting) => {
                        return Err(ShaderGenError::construct(
                            name,
                            format!("struct {dependency} contains itself"),
                        ))
                    }
                    Some(Mark::Done) => {}
                    None => visit(&dependency, lowered, marks, order)?,
                }
            }
        }
        marks.insert(name.to_string(), Mark::Done);
        order.push(name.to_string());
        Ok(())
    }

    let mut marks = HashMap::new();
    let mut order = Vec::with_capacity(reached.len());
    for decl in &program.structs {
        if reached.contains(&decl.name) && !marks.contains_key(&decl.name) {
            visit(&decl.name, lowered, &mut marks, &mut order)?;
        }
    }
    Ok(order)
}
