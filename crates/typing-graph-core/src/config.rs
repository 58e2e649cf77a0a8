//! `Config`: a plain immutable record, built with a fluent builder. Every
//! field that affects node shape participates in the cache-key fingerprint.

use std::hash::{Hash, Hasher};

/// Forward-reference evaluation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalMode {
    Eager,
    #[default]
    Deferred,
    Stringified,
}

/// Engine configuration. Construct with [`Config::builder`];
/// `Config::default()` is equivalent to calling `.build()` with no
/// overrides.
///
/// Deliberately excludes `globalns`/`localns`: unlike every field below,
/// a namespace overlay is per-call data that never affects node *shape*,
/// only whether a forward reference resolves against it — and `Config`
/// exists specifically to be a structurally-hashable cache-key component
/// (see `fingerprint`). Every `inspect_*` entry point instead takes the
/// overlay as its own `overlay` parameter via an `_with_namespace` sibling
/// (e.g. `Engine::inspect_type_with_namespace`), the same way `source`
/// already bypasses the cache. This is a disclosed deviation from the
/// source spec's `Config` table, which lists `globalns`/`localns` as
/// fields; see SPEC_FULL.md §3 for the rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub eval_mode: EvalMode,
    pub auto_namespace: bool,
    pub max_depth: Option<usize>,
    pub hoist_metadata: bool,
    pub include_source_locations: bool,
    pub normalize_unions: bool,
    pub include_private_members: bool,
    pub include_inherited_members: bool,
    pub include_methods: bool,
    pub include_class_vars: bool,
    pub include_instance_vars: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eval_mode: EvalMode::Deferred,
            auto_namespace: true,
            max_depth: None,
            hoist_metadata: true,
            include_source_locations: false,
            normalize_unions: true,
            include_private_members: false,
            include_inherited_members: true,
            include_methods: true,
            include_class_vars: true,
            include_instance_vars: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Deterministic fingerprint of every field that affects node shape.
    /// Two configs that would build structurally identical nodes for the
    /// same raw type always fingerprint equal. There is no `globalns`/
    /// `localns` field to exclude here — see this struct's doc comment for
    /// where that overlay actually lives and why.
    pub fn fingerprint(&self) -> ConfigFingerprint {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.eval_mode.hash(&mut hasher);
        self.auto_namespace.hash(&mut hasher);
        self.max_depth.hash(&mut hasher);
        self.hoist_metadata.hash(&mut hasher);
        self.include_source_locations.hash(&mut hasher);
        self.normalize_unions.hash(&mut hasher);
        self.include_private_members.hash(&mut hasher);
        self.include_inherited_members.hash(&mut hasher);
        self.include_methods.hash(&mut hasher);
        self.include_class_vars.hash(&mut hasher);
        self.include_instance_vars.hash(&mut hasher);
        ConfigFingerprint(hasher.finish())
    }
}

/// Opaque cache-key component derived from a `Config`. Two configs with the
/// same fingerprint are guaranteed to build structurally identical nodes
/// for the same raw type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint(u64);

/// Fluent builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn eval_mode(mut self, mode: EvalMode) -> Self {
        self.config.eval_mode = mode;
        self
    }

    pub fn auto_namespace(mut self, value: bool) -> Self {
        self.config.auto_namespace = value;
        self
    }

    pub fn max_depth(mut self, value: Option<usize>) -> Self {
        self.config.max_depth = value;
        self
    }

    pub fn hoist_metadata(mut self, value: bool) -> Self {
        self.config.hoist_metadata = value;
        self
    }

    pub fn include_source_locations(mut self, value: bool) -> Self {
        self.config.include_source_locations = value;
        self
    }

    pub fn normalize_unions(mut self, value: bool) -> Self {
        self.config.normalize_unions = value;
        self
    }

    pub fn include_private_members(mut self, value: bool) -> Self {
        self.config.include_private_members = value;
        self
    }

    pub fn include_inherited_members(mut self, value: bool) -> Self {
        self.config.include_inherited_members = value;
        self
    }

    pub fn include_methods(mut self, value: bool) -> Self {
        self.config.include_methods = value;
        self
    }

    pub fn include_class_vars(mut self, value: bool) -> Self {
        self.config.include_class_vars = value;
        self
    }

    pub fn include_instance_vars(mut self, value: bool) -> Self {
        self.config.include_instance_vars = value;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
