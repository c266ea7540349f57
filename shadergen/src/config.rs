use crate::enums::{ClipSpaceFixup, FailurePolicy};

/// Configuration options for a single backend.
#[derive(Debug, Default, Clone)]
pub struct BackendConfig {
    /// Overrides the backend's default clip-space fixup.
    /// GLSL 330 and GLSL ES default to `DEPTH_REMAP`, GLSL 450 to `Y_FLIP`.
    /// HLSL and Metal ignore it.
    pub clip_space_fixup: Option<ClipSpaceFixup>,
}

/// Configuration options for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Overrides the failure policy. When `None`, direct requests fail fast
    /// and "all sets" requests report every failure.
    pub failure_policy: Option<FailurePolicy>,
    /// Runs generation on a dedicated pool with this many threads instead of
    /// the global rayon pool. `Some(1)` generates sequentially.
    pub worker_threads: Option<usize>,
    /// Passed to every backend the registry creates.
    pub backend: BackendConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            failure_policy: None,
            worker_threads: None,
            backend: BackendConfig::default(),
        }
    }
}
