use crate::enums::StructRoles;
use indexmap::{IndexMap, IndexSet};
use shadergen_ir::ir::Stmt;
use shadergen_ir::{ParamDirection, ResourceKind, ResourceType, Semantic, ShaderType, Stage};
use std::fmt::{Display, Formatter};

/// The entry points of one program variant, at most one per stage.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct EntryPointSet {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
    pub compute: Option<String>,
}

impl EntryPointSet {
    pub fn graphics(vertex: impl Into<String>, fragment: impl Into<String>) -> EntryPointSet {
        EntryPointSet {
            vertex: Some(vertex.into()),
            fragment: Some(fragment.into()),
            compute: None,
        }
    }

    pub fn vertex(vertex: impl Into<String>) -> EntryPointSet {
        EntryPointSet {
            vertex: Some(vertex.into()),
            ..Default::default()
        }
    }

    pub fn fragment(fragment: impl Into<String>) -> EntryPointSet {
        EntryPointSet {
            fragment: Some(fragment.into()),
            ..Default::default()
        }
    }

    pub fn compute(compute: impl Into<String>) -> EntryPointSet {
        EntryPointSet {
            compute: Some(compute.into()),
            ..Default::default()
        }
    }

    pub fn get(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Vertex => self.vertex.as_deref(),
            Stage::Fragment => self.fragment.as_deref(),
            Stage::Compute => self.compute.as_deref(),
        }
    }

    /// The stages with an entry point, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        Stage::ALL.into_iter().filter(|stage| self.get(*stage).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.stages().next().is_none()
    }
}

impl Display for EntryPointSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages().filter_map(|stage| self.get(stage)).collect();
        if names.is_empty() {
            f.write_str("<empty>")
        } else {
            f.write_str(&names.join(" + "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: ShaderType,
    pub semantic: Option<Semantic>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    /// Fully qualified name.
    pub name: String,
    pub fields: Vec<Field>,
}

impl StructDefinition {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields passed between stages, numbered in declaration order. The system
    /// position travels through the target's builtin position instead.
    pub fn varyings(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.fields
            .iter()
            .filter(|f| f.semantic != Some(Semantic::SystemPosition))
            .enumerate()
    }
}

/// A resource with its assigned `(set, slot)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBinding {
    pub name: String,
    pub ty: ResourceType,
    pub set: u32,
    pub slot: u32,
}

impl ResourceBinding {
    pub fn kind(&self) -> ResourceKind {
        self.ty.kind
    }

    pub fn shader_type(&self) -> ShaderType {
        ShaderType::Resource(self.ty.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: ShaderType,
    pub direction: ParamDirection,
    pub semantic: Option<Semantic>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderFunction {
    /// Unqualified name.
    pub name: String,
    pub qualified_name: String,
    /// `None` for helpers.
    pub stage: Option<Stage>,
    pub params: Vec<Parameter>,
    pub return_type: ShaderType,
    pub body: Vec<Stmt>,
    pub thread_group_size: Option<[u32; 3]>,
}

impl ShaderFunction {
    /// The struct parameter of an entry point, i.e. its stage input.
    pub fn input_param(&self) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.semantic.is_none() && p.ty.struct_name().is_some())
    }
}

/// What one stage's entry point transitively reaches.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StageUsage {
    pub functions: IndexSet<String>,
    pub resources: IndexSet<String>,
    pub structs: IndexSet<String>,
}

/// The backend-agnostic representation of one program variant.
///
/// Built once by [`crate::build_model`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderModel {
    pub(crate) structs: IndexMap<String, StructDefinition>,
    pub(crate) resources: Vec<ResourceBinding>,
    pub(crate) functions: IndexMap<String, ShaderFunction>,
    pub(crate) entry_points: EntryPointSet,
    pub(crate) usage: IndexMap<Stage, StageUsage>,
    pub(crate) warnings: Vec<String>,
}

impl ShaderModel {
    /// Structs in declaration order, dependencies first.
    pub fn structs(&self) -> impl Iterator<Item = &StructDefinition> {
        self.structs.values()
    }

    pub fn resources(&self) -> &[ResourceBinding] {
        &self.resources
    }

    /// Functions with callees before callers.
    pub fn functions(&self) -> impl Iterator<Item = &ShaderFunction> {
        self.functions.values()
    }

    pub fn entry_points(&self) -> &EntryPointSet {
        &self.entry_points
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn get_function(&self, qualified_name: &str) -> Option<&ShaderFunction> {
        self.functions.get(qualified_name)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDefinition> {
        self.structs.get(name)
    }

    pub fn get_resource(&self, name: &str) -> Option<&ResourceBinding> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn entry_function(&self, stage: Stage) -> Option<&ShaderFunction> {
        self.entry_points
            .get(stage)
            .and_then(|name| self.functions.get(name))
    }

    pub fn usage(&self, stage: Stage) -> Option<&StageUsage> {
        self.usage.get(&stage)
    }

    pub fn structs_for(&self, stage: Stage) -> impl Iterator<Item = &StructDefinition> {
        let usage = self.usage.get(&stage);
        self.structs
            .values()
            .filter(move |s| usage.map_or(false, |u| u.structs.contains(&s.name)))
    }

    pub fn resources_for(&self, stage: Stage) -> impl Iterator<Item = &ResourceBinding> {
        let usage = self.usage.get(&stage);
        self.resources
            .iter()
            .filter(move |r| usage.map_or(false, |u| u.resources.contains(&r.name)))
    }

    pub fn functions_for(&self, stage: Stage) -> impl Iterator<Item = &ShaderFunction> {
        let usage = self.usage.get(&stage);
        self.functions
            .values()
            .filter(move |f| usage.map_or(false, |u| u.functions.contains(&f.qualified_name)))
    }

    /// The stage interface roles of a struct across the selected entry points.
    pub fn struct_roles(&self, name: &str) -> StructRoles {
        let mut roles = StructRoles::empty();
        let is = |ty: &ShaderType| ty.struct_name() == Some(name);

        if let Some(vertex) = self.entry_function(Stage::Vertex) {
            if vertex.input_param().map_or(false, |p| is(&p.ty)) {
                roles |= StructRoles::VERTEX_INPUT;
            }
            if is(&vertex.return_type) {
                roles |= StructRoles::VERTEX_OUTPUT;
            }
        }
        if let Some(fragment) = self.entry_function(Stage::Fragment) {
            if fragment.input_param().map_or(false, |p| is(&p.ty)) {
                roles |= StructRoles::FRAGMENT_INPUT;
            }
            if is(&fragment.return_type) {
                roles |= StructRoles::FRAGMENT_OUTPUT;
            }
        }
        roles
    }
}
