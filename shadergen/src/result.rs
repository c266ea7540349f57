use crate::enums::BackendKind;
use crate::error::ShaderGenError;
use crate::generator::GenerationPhase;
use crate::model::{EntryPointSet, ShaderFunction, ShaderModel};
use dashmap::DashMap;
use indexmap::IndexMap;
use shadergen_ir::Stage;
use std::sync::{Arc, Mutex};

/// The source one backend produced for one entry point set.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedShaderSet {
    pub backend: BackendKind,
    pub entry_points: EntryPointSet,
    pub model: Arc<ShaderModel>,
    pub vertex_code: Option<String>,
    pub fragment_code: Option<String>,
    pub compute_code: Option<String>,
}

impl GeneratedShaderSet {
    pub fn code(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Vertex => self.vertex_code.as_deref(),
            Stage::Fragment => self.fragment_code.as_deref(),
            Stage::Compute => self.compute_code.as_deref(),
        }
    }

    pub fn vertex_function(&self) -> Option<&ShaderFunction> {
        self.model.entry_function(Stage::Vertex)
    }

    pub fn fragment_function(&self) -> Option<&ShaderFunction> {
        self.model.entry_function(Stage::Fragment)
    }

    pub fn compute_function(&self) -> Option<&ShaderFunction> {
        self.model.entry_function(Stage::Compute)
    }
}

/// An error recorded instead of failing the whole request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure {
    /// Position of the set in the request.
    pub set_index: usize,
    pub set: EntryPointSet,
    /// `None` when the model could not be built.
    pub backend: Option<BackendKind>,
    pub phase: GenerationPhase,
    pub error: ShaderGenError,
}

/// Collects outputs and failures from concurrent jobs.
#[derive(Debug, Default)]
pub(crate) struct ResultCollector {
    outputs: DashMap<(BackendKind, usize), GeneratedShaderSet>,
    failures: Mutex<Vec<GenerationFailure>>,
}

impl ResultCollector {
    pub fn new() -> ResultCollector {
        ResultCollector::default()
    }

    pub fn insert(&self, set_index: usize, output: GeneratedShaderSet) {
        self.outputs.insert((output.backend, set_index), output);
    }

    pub fn fail(&self, failure: GenerationFailure) {
        match self.failures.lock() {
            Ok(mut failures) => failures.push(failure),
            Err(poisoned) => poisoned.into_inner().push(failure),
        }
    }

    /// Orders everything by backend, then by position in the request.
    pub fn finalize(self, backends: &[BackendKind]) -> ShaderGenerationResult {
        let mut entries: Vec<((BackendKind, usize), GeneratedShaderSet)> = self.outputs.into_iter().collect();
        entries.sort_by_key(|(key, _)| *key);

        let mut outputs: IndexMap<BackendKind, Vec<GeneratedShaderSet>> =
            backends.iter().map(|kind| (*kind, Vec::new())).collect();
        for ((kind, _), output) in entries {
            outputs.entry(kind).or_default().push(output);
        }

        let mut failures = match self.failures.into_inner() {
            Ok(failures) => failures,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.sort_by_key(|f| (f.set_index, f.backend));

        ShaderGenerationResult { outputs, failures }
    }
}

/// Everything a generation request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderGenerationResult {
    outputs: IndexMap<BackendKind, Vec<GeneratedShaderSet>>,
    failures: Vec<GenerationFailure>,
}

impl ShaderGenerationResult {
    /// Generated sets of one backend, in request order.
    pub fn get_output(&self, backend: BackendKind) -> &[GeneratedShaderSet] {
        self.outputs.get(&backend).map(Vec::as_slice).unwrap_or_default()
    }

    /// Recorded failures, in request order.
    pub fn failures(&self) -> &[GenerationFailure] {
        &self.failures
    }

    /// The backends the request targeted.
    pub fn backends(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.outputs.keys().copied()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
