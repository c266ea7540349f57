//! Runs model building and every backend over a request.

use crate::backend::LanguageBackend;
use crate::builder::build_model;
use crate::config::GeneratorConfig;
use crate::enums::{BackendCapabilities, BackendKind, FailurePolicy};
use crate::error::{Result, ShaderGenError};
use crate::model::{EntryPointSet, ShaderModel};
use crate::registry::BackendRegistry;
use crate::result::{GeneratedShaderSet, GenerationFailure, ResultCollector, ShaderGenerationResult};
use indexmap::IndexSet;
use rayon::prelude::*;
use shadergen_ir::source::ResolvedProgram;
use shadergen_ir::Stage;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// The given sets, in order.
    Sets(Vec<EntryPointSet>),
    /// Every set the program defines, as found by [`discover_sets`].
    AllSets,
}

/// Where a set is in its lifecycle.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Building,
    Emitting(BackendKind),
    Done,
    Failed,
}

impl Display for GenerationPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationPhase::Idle => f.write_str("idle"),
            GenerationPhase::Building => f.write_str("building"),
            GenerationPhase::Emitting(backend) => write!(f, "emitting {backend}"),
            GenerationPhase::Done => f.write_str("done"),
            GenerationPhase::Failed => f.write_str("failed"),
        }
    }
}

fn transition(set_index: usize, set: &EntryPointSet, from: GenerationPhase, to: GenerationPhase) {
    if to == GenerationPhase::Failed {
        log::debug!("set {set_index} ({set}): {from} -> {to}");
    } else {
        log::trace!("set {set_index} ({set}): {from} -> {to}");
    }
}

/// Every entry point set a program defines.
///
/// Declared shader sets come first, then vertex and fragment entries no
/// declared set covers, each on its own, then every compute entry.
pub fn discover_sets(program: &ResolvedProgram) -> Vec<EntryPointSet> {
    let mut sets = Vec::new();
    let mut covered = IndexSet::new();
    for declared in &program.shader_sets {
        let set = EntryPointSet {
            vertex: declared.vertex.clone(),
            fragment: declared.fragment.clone(),
            compute: None,
        };
        if set.is_empty() {
            log::warn!("[shadergen] shader set {} names no entry points", declared.name);
            continue;
        }
        covered.extend(set.vertex.iter().cloned());
        covered.extend(set.fragment.iter().cloned());
        sets.push(set);
    }
    for function in &program.functions {
        if covered.contains(&function.name) {
            continue;
        }
        match function.metadata.stage {
            Some(Stage::Vertex) => sets.push(EntryPointSet::vertex(function.name.clone())),
            Some(Stage::Fragment) => sets.push(EntryPointSet::fragment(function.name.clone())),
            _ => {}
        }
    }
    for function in program.entry_points(Stage::Compute) {
        sets.push(EntryPointSet::compute(function.name.clone()));
    }
    sets
}

/// Generates source for a program with every registered backend, or a chosen
/// subset of them.
pub struct ShaderGenerator<'a> {
    program: &'a ResolvedProgram,
    registry: &'a BackendRegistry,
    backends: Vec<BackendKind>,
    config: GeneratorConfig,
}

impl<'a> ShaderGenerator<'a> {
    pub fn new(program: &'a ResolvedProgram, registry: &'a BackendRegistry) -> ShaderGenerator<'a> {
        ShaderGenerator {
            program,
            registry,
            backends: registry.kinds().collect(),
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> ShaderGenerator<'a> {
        self.config = config;
        self
    }

    /// Restricts generation to these backends, in this order.
    pub fn with_backends(mut self, backends: &[BackendKind]) -> ShaderGenerator<'a> {
        self.backends = backends.to_vec();
        self
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<ShaderGenerationResult> {
        let (sets, default_policy) = match request {
            GenerationRequest::Sets(sets) => (sets.clone(), FailurePolicy::FailFast),
            GenerationRequest::AllSets => (discover_sets(self.program), FailurePolicy::ReportAll),
        };
        let policy = self.config.failure_policy.unwrap_or(default_policy);
        let backends = self.registry.create_all(&self.backends, &self.config.backend);
        log::debug!(
            "generating {} sets with {} backends ({:?})",
            sets.len(),
            backends.len(),
            policy
        );

        match self.config.worker_threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| self.run(&sets, &backends, policy)),
                Err(e) => {
                    log::warn!("[shadergen] could not start {threads} worker threads: {e}");
                    self.run(&sets, &backends, policy)
                }
            },
            None => self.run(&sets, &backends, policy),
        }
    }

    fn run(
        &self,
        sets: &[EntryPointSet],
        backends: &[Box<dyn LanguageBackend>],
        policy: FailurePolicy,
    ) -> Result<ShaderGenerationResult> {
        let models: Vec<Result<Arc<ShaderModel>>> = sets
            .par_iter()
            .enumerate()
            .map(|(set_index, set)| self.build(set_index, set))
            .collect();

        let jobs: Vec<(usize, usize)> = models
            .iter()
            .enumerate()
            .filter(|(_, model)| model.is_ok())
            .flat_map(|(set_index, _)| (0..backends.len()).map(move |backend| (set_index, backend)))
            .collect();
        // Workers store their outputs directly. Errors are replayed in request order.
        let collector = ResultCollector::new();
        let errors: Vec<((usize, usize), ShaderGenError)> = jobs
            .par_iter()
            .filter_map(|&(set_index, backend)| {
                let model = models[set_index].as_ref().ok()?;
                match self.emit(backends[backend].as_ref(), set_index, &sets[set_index], model) {
                    Ok(output) => {
                        collector.insert(set_index, output);
                        None
                    }
                    Err(error) => Some(((set_index, backend), error)),
                }
            })
            .collect();

        let mut errors = errors.into_iter().peekable();
        for (set_index, (set, model)) in sets.iter().zip(&models).enumerate() {
            if let Err(error) = model {
                if policy == FailurePolicy::FailFast {
                    return Err(error.clone());
                }
                collector.fail(GenerationFailure {
                    set_index,
                    set: set.clone(),
                    backend: None,
                    phase: GenerationPhase::Building,
                    error: error.clone(),
                });
                continue;
            }
            while let Some(((_, backend), error)) = errors.next_if(|((index, _), _)| *index == set_index) {
                if policy == FailurePolicy::FailFast {
                    return Err(error);
                }
                let kind = backends[backend].kind();
                collector.fail(GenerationFailure {
                    set_index,
                    set: set.clone(),
                    backend: Some(kind),
                    phase: GenerationPhase::Emitting(kind),
                    error,
                });
            }
        }

        let kinds: Vec<BackendKind> = backends.iter().map(|b| b.kind()).collect();
        Ok(collector.finalize(&kinds))
    }

    fn build(&self, set_index: usize, set: &EntryPointSet) -> Result<Arc<ShaderModel>> {
        transition(set_index, set, GenerationPhase::Idle, GenerationPhase::Building);
        let model = if set.is_empty() {
            Err(ShaderGenError::EntryPointNotFound(format!("any entry point in set {set_index}")))
        } else {
            build_model(self.program, set)
        };
        match model {
            Ok(model) => Ok(Arc::new(model)),
            Err(e) => {
                transition(set_index, set, GenerationPhase::Building, GenerationPhase::Failed);
                log::debug!("set {set_index} ({set}) failed to build: {e}");
                Err(e)
            }
        }
    }

    fn emit(
        &self,
        backend: &dyn LanguageBackend,
        set_index: usize,
        set: &EntryPointSet,
        model: &Arc<ShaderModel>,
    ) -> Result<GeneratedShaderSet> {
        let kind = backend.kind();
        let phase = GenerationPhase::Emitting(kind);
        transition(set_index, set, GenerationPhase::Building, phase);

        let mut output = GeneratedShaderSet {
            backend: kind,
            entry_points: set.clone(),
            model: model.clone(),
            vertex_code: None,
            fragment_code: None,
            compute_code: None,
        };
        for stage in set.stages() {
            let code = generate_stage(backend, model, stage).map_err(|e| {
                transition(set_index, set, phase, GenerationPhase::Failed);
                e
            })?;
            match stage {
                Stage::Vertex => output.vertex_code = Some(code),
                Stage::Fragment => output.fragment_code = Some(code),
                Stage::Compute => output.compute_code = Some(code),
            }
        }

        transition(set_index, set, phase, GenerationPhase::Done);
        Ok(output)
    }
}

fn generate_stage(backend: &dyn LanguageBackend, model: &ShaderModel, stage: Stage) -> Result<String> {
    let required = match stage {
        Stage::Vertex => BackendCapabilities::VERTEX,
        Stage::Fragment => BackendCapabilities::FRAGMENT,
        Stage::Compute => BackendCapabilities::COMPUTE,
    };
    if !backend.capabilities().contains(required) {
        return Err(ShaderGenError::construct(
            model.entry_points().get(stage).unwrap_or_default(),
            format!("{} cannot generate {stage} stages", backend.kind()),
        ));
    }
    backend.generate(model, stage)
}
