use crate::backend::{
    Glsl330Backend, Glsl450Backend, GlslEs300Backend, HlslBackend, LanguageBackend, MetalBackend,
};
use crate::config::BackendConfig;
use crate::enums::BackendKind;
use indexmap::IndexMap;

/// Creates a backend from its configuration.
pub type BackendFactory = fn(&BackendConfig) -> Box<dyn LanguageBackend>;

/// The backends a generator can target, by kind.
#[derive(Clone)]
pub struct BackendRegistry {
    factories: IndexMap<BackendKind, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> BackendRegistry {
        BackendRegistry {
            factories: IndexMap::new(),
        }
    }

    /// A registry with all five built-in backends.
    pub fn with_defaults() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(BackendKind::Hlsl, |_| Box::new(HlslBackend::new()));
        registry.register(BackendKind::Glsl330, |config| Box::new(Glsl330Backend::new(config)));
        registry.register(BackendKind::GlslEs300, |config| Box::new(GlslEs300Backend::new(config)));
        registry.register(BackendKind::Glsl450, |config| Box::new(Glsl450Backend::new(config)));
        registry.register(BackendKind::Metal, |_| Box::new(MetalBackend::new()));
        registry
    }

    /// Registers or replaces the factory for `kind`.
    pub fn register(&mut self, kind: BackendKind, factory: BackendFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn contains(&self, kind: BackendKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.factories.keys().copied()
    }

    pub fn create(&self, kind: BackendKind, config: &BackendConfig) -> Option<Box<dyn LanguageBackend>> {
        self.factories.get(&kind).map(|factory| factory(config))
    }

    /// Creates every requested backend that is registered, skipping the rest.
    pub fn create_all(&self, kinds: &[BackendKind], config: &BackendConfig) -> Vec<Box<dyn LanguageBackend>> {
        kinds
            .iter()
            .filter_map(|kind| {
                let backend = self.create(*kind, config);
                if backend.is_none() {
                    log::warn!("[shadergen] no backend registered for {kind}");
                }
                backend
            })
            .collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        BackendRegistry::with_defaults()
    }
}
