//! Type-annotation introspection engine: a reflection-adapter driven
//! recursive builder that turns a source language's type annotations into
//! an immutable, shareable graph of [`Node`]s, plus the cache, walker and
//! metadata-collection surface built on top of it.
//!
//! The crate has no opinion on *how* a host language exposes its own type
//! system: that seam is [`ReflectionAdapter`]. `typing-graph-facet` and
//! `typing-graph-testhelpers` each provide one concrete adapter.

mod builder;
mod cache;
mod classifier;
mod config;
mod context;
mod edge;
mod error;
mod forward_ref;
mod helpers;
mod metadata;
mod namespace;
mod node;
mod qualifier;
mod reflect;
mod source_location;
mod tracing_macros;
mod walker;

pub use cache::{Cache, CacheInfo};
pub use config::{Config, ConfigBuilder, ConfigFingerprint, EvalMode};
pub use edge::{Edge, EdgeConnection, EdgeKind};
pub use error::{
    ForwardRefError, InspectionError, MetadataNotFound, ProtocolNotRuntimeCheckable, ReflectionError,
    TraversalError,
};
pub use helpers::*;
pub use metadata::{Grouped, Metadata, MetadataCollection, RuntimeCheckableProtocol};
pub use node::{
    CallableParams, EnumMember, FieldDef, FunctionNode, GenericAliasNode, LiteralValue, Node, NodeData,
    NodeKind, ParamKind, Parameter, RefState, Signature, SignatureNode, TypeAliasNode, TypeParamNode,
};
pub use qualifier::{Qualifier, Variance};
pub use reflect::{
    CallableParamsRaw, EnumMemberRaw, FieldRaw, Namespace, NamespacePair, ParamSpecInfo, ReflectionAdapter,
    SpecialForm, TypeVarInfo,
};
pub use source_location::SourceLocation;
pub use walker::Walker;

use context::Context;

/// The four-way split `inspect_module` reports: every top-level module
/// binding, bucketed by what the reflection adapter says it is.
/// Anything that isn't a class-like, function, alias, or type-parameter
/// binding lands in `constants`, built as a plain `inspect_type` result.
#[derive(Debug, Clone)]
pub struct ModuleInspection {
    pub classes: Vec<(String, Node)>,
    pub functions: Vec<(String, Node)>,
    pub type_aliases: Vec<(String, Node)>,
    pub type_vars: Vec<(String, Node)>,
    pub constants: Vec<(String, Node)>,
}

/// The engine surface: everything a caller drives through one adapter.
/// `Engine` owns the process-wide cache for that adapter. See [`cache`]'s
/// module doc for why this is an explicit struct rather than a hidden
/// global: the engine is generic over `A`, and stable Rust has no
/// generic-parameterized `static`.
pub struct Engine<A: ReflectionAdapter> {
    adapter: A,
    cache: Cache<A::Id>,
}

impl<A: ReflectionAdapter> Engine<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            cache: Cache::new(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn run_build(
        &self,
        config: &Config,
        namespace: Option<&NamespacePair<A::RawType>>,
        use_cache: bool,
        f: impl FnOnce(&mut Context<A::Id, A::RawType>) -> Result<Node, InspectionError>,
    ) -> Result<Node, InspectionError> {
        let _ = use_cache;
        let mut ctx = Context::new(config);
        if let Some(ns) = namespace {
            ctx = ctx.with_namespace(ns);
        }
        f(&mut ctx)
    }

    /// Top-level entry point. Bypasses the cache whenever `source` is
    /// supplied: a namespace-tainted build is context-dependent and must
    /// not poison future cache hits.
    pub fn inspect_type(
        &self,
        raw: &A::RawType,
        config: Option<&Config>,
        source: Option<&A::RawType>,
    ) -> Result<Node, InspectionError> {
        self.inspect_type_with_namespace(raw, config, source, None)
    }

    /// `inspect_type`, plus a caller-supplied `(globalns, localns)` overlay
    /// that overrides auto-extracted bindings. An overlay is
    /// namespace-tainted exactly like `source` is, so it bypasses the
    /// cache the same way.
    pub fn inspect_type_with_namespace(
        &self,
        raw: &A::RawType,
        config: Option<&Config>,
        source: Option<&A::RawType>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        let config = config.cloned().unwrap_or_default();
        let auto = match source {
            Some(src) if config.auto_namespace => Some(self.extract_namespace(src)),
            _ => None,
        };
        let namespace = if auto.is_some() || overlay.is_some() {
            Some(namespace::apply_overlay(
                auto.unwrap_or_else(|| (Namespace::new(), Namespace::new())),
                overlay,
            ))
        } else {
            None
        };
        let bypass_cache = source.is_some() || overlay.is_some();
        let cache = if bypass_cache { None } else { Some(&self.cache) };
        self.run_build(&config, namespace.as_ref(), cache.is_some(), |ctx| {
            builder::build(&self.adapter, cache, raw, ctx)
        })
    }

    /// Builds `cls`, auto-dispatching to whichever structured kind
    /// `classify` lands on.
    pub fn inspect_class(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_with_namespace(cls, config, None)
    }

    /// `inspect_class`, plus a caller-supplied `(globalns, localns)`
    /// overlay over the auto-extracted bindings. Namespace-tainted exactly
    /// like `inspect_type_with_namespace`'s `overlay`, so it bypasses the
    /// cache the same way.
    pub fn inspect_class_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        let config = config.cloned().unwrap_or_default();
        let auto = config
            .auto_namespace
            .then(|| namespace::extract_class_namespace(&self.adapter, cls));
        let namespace = if auto.is_some() || overlay.is_some() {
            Some(namespace::apply_overlay(
                auto.unwrap_or_else(|| (Namespace::new(), Namespace::new())),
                overlay,
            ))
        } else {
            None
        };
        let cache = if overlay.is_some() { None } else { Some(&self.cache) };
        self.run_build(&config, namespace.as_ref(), cache.is_some(), |ctx| {
            builder::build(&self.adapter, cache, cls, ctx)
        })
    }

    fn inspect_class_asserting(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
        is_expected: impl Fn(&NodeKind) -> bool,
        expected_name: &'static str,
    ) -> Result<Node, InspectionError> {
        let node = self.inspect_class_with_namespace(cls, config, overlay)?;
        if is_expected(node.kind()) {
            Ok(node)
        } else {
            Err(InspectionError::Reflection(ReflectionError::new(format!(
                "expected a {expected_name} node, got {:?}",
                node.kind()
            ))))
        }
    }

    pub fn inspect_dataclass(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, None, is_dataclass_node_kind, "Dataclass")
    }

    pub fn inspect_dataclass_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, overlay, is_dataclass_node_kind, "Dataclass")
    }

    pub fn inspect_typed_dict(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, None, is_typed_dict_node_kind, "TypedDict")
    }

    pub fn inspect_typed_dict_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, overlay, is_typed_dict_node_kind, "TypedDict")
    }

    pub fn inspect_named_tuple(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, None, is_named_tuple_node_kind, "NamedTuple")
    }

    pub fn inspect_named_tuple_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, overlay, is_named_tuple_node_kind, "NamedTuple")
    }

    pub fn inspect_enum(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, None, is_enum_node_kind, "Enum")
    }

    pub fn inspect_enum_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, overlay, is_enum_node_kind, "Enum")
    }

    pub fn inspect_protocol(&self, cls: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, None, is_protocol_node_kind, "Protocol")
    }

    pub fn inspect_protocol_with_namespace(
        &self,
        cls: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_class_asserting(cls, config, overlay, is_protocol_node_kind, "Protocol")
    }

    fn build_top_level(
        &self,
        raw: &A::RawType,
        config: &Config,
        bypass_cache: bool,
        build: impl FnOnce(&mut Context<A::Id, A::RawType>) -> Result<Node, InspectionError>,
    ) -> Result<Node, InspectionError> {
        let identity = self.adapter.identity(raw);
        let fingerprint = config.fingerprint();
        if !bypass_cache {
            if let Some(hit) = self.cache.get(&identity, fingerprint) {
                return Ok(hit);
            }
        }
        let node = build(&mut Context::new(config))?;
        if bypass_cache {
            Ok(node)
        } else {
            Ok(self.cache.insert(identity, fingerprint, node))
        }
    }

    pub fn inspect_function(&self, function: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_function_with_namespace(function, config, None)
    }

    pub fn inspect_function_with_namespace(
        &self,
        function: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        let config = config.cloned().unwrap_or_default();
        let auto = config
            .auto_namespace
            .then(|| namespace::extract_function_namespace(&self.adapter, function));
        let namespace = if auto.is_some() || overlay.is_some() {
            Some(namespace::apply_overlay(
                auto.unwrap_or_else(|| (Namespace::new(), Namespace::new())),
                overlay,
            ))
        } else {
            None
        };
        self.build_top_level(function, &config, overlay.is_some(), |ctx| {
            if let Some(ns) = &namespace {
                *ctx = Context::new(&config).with_namespace(ns);
            }
            builder::build_function(&self.adapter, Some(&self.cache), function, ctx)
        })
    }

    pub fn inspect_signature(&self, function: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_signature_with_namespace(function, config, None)
    }

    pub fn inspect_signature_with_namespace(
        &self,
        function: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        let config = config.cloned().unwrap_or_default();
        let auto = config
            .auto_namespace
            .then(|| namespace::extract_function_namespace(&self.adapter, function));
        let namespace = if auto.is_some() || overlay.is_some() {
            Some(namespace::apply_overlay(
                auto.unwrap_or_else(|| (Namespace::new(), Namespace::new())),
                overlay,
            ))
        } else {
            None
        };
        self.build_top_level(function, &config, overlay.is_some(), |ctx| {
            if let Some(ns) = &namespace {
                *ctx = Context::new(&config).with_namespace(ns);
            }
            builder::build_signature_node(&self.adapter, Some(&self.cache), function, ctx)
        })
    }

    /// `type X = ...` / `X: TypeAlias = ...`. `name` overrides whatever
    /// name the adapter reports for the alias binding: needed for a plain
    /// (non-PEP-695) alias, where the raw type alone doesn't carry the
    /// name it was assigned to.
    pub fn inspect_type_alias(
        &self,
        alias: &A::RawType,
        name: Option<String>,
        config: Option<&Config>,
    ) -> Result<Node, InspectionError> {
        self.inspect_type_alias_with_namespace(alias, name, config, None)
    }

    pub fn inspect_type_alias_with_namespace(
        &self,
        alias: &A::RawType,
        name: Option<String>,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        let node = self.inspect_type_with_namespace(alias, config, None, overlay)?;
        Ok(match name {
            Some(name) => rename_alias(node, name),
            None => node,
        })
    }

    pub fn inspect_type_param(&self, tp: &A::RawType, config: Option<&Config>) -> Result<Node, InspectionError> {
        self.inspect_type(tp, config, None)
    }

    pub fn inspect_type_param_with_namespace(
        &self,
        tp: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<Node, InspectionError> {
        self.inspect_type_with_namespace(tp, config, None, overlay)
    }

    /// Bucket every top-level module binding by what it is. The adapter
    /// contract has no dedicated "is a module" probe, so this walks
    /// `module_globals`' own bindings rather than recursing through
    /// `classify`, which only distinguishes type *shapes*, not "function vs.
    /// class vs. plain value".
    pub fn inspect_module(&self, module: &A::RawType, config: Option<&Config>) -> Result<ModuleInspection, InspectionError> {
        self.inspect_module_with_namespace(module, config, None)
    }

    /// `inspect_module`, threading a caller-supplied `(globalns, localns)`
    /// overlay through every member it inspects.
    pub fn inspect_module_with_namespace(
        &self,
        module: &A::RawType,
        config: Option<&Config>,
        overlay: Option<&NamespacePair<A::RawType>>,
    ) -> Result<ModuleInspection, InspectionError> {
        let config = config.cloned().unwrap_or_default();
        let globals = namespace::extract_module_namespace(&self.adapter, module).0;

        let mut result = ModuleInspection {
            classes: Vec::new(),
            functions: Vec::new(),
            type_aliases: Vec::new(),
            type_vars: Vec::new(),
            constants: Vec::new(),
        };

        for (name, raw) in globals.iter() {
            let bucket = if self.adapter.is_function(raw) {
                (
                    &mut result.functions,
                    self.inspect_function_with_namespace(raw, Some(&config), overlay)?,
                )
            } else if self.adapter.is_alias(raw) {
                (
                    &mut result.type_aliases,
                    self.inspect_type_alias_with_namespace(raw, None, Some(&config), overlay)?,
                )
            } else if self.adapter.is_type_var(raw) || self.adapter.is_param_spec(raw) || self.adapter.is_type_var_tuple(raw) {
                (
                    &mut result.type_vars,
                    self.inspect_type_param_with_namespace(raw, Some(&config), overlay)?,
                )
            } else if self.adapter.is_dataclass(raw)
                || self.adapter.is_typed_dict(raw)
                || self.adapter.is_named_tuple(raw)
                || self.adapter.is_enum(raw)
                || self.adapter.is_protocol(raw)
                || self.adapter.is_generic_type(raw)
            {
                (
                    &mut result.classes,
                    self.inspect_class_with_namespace(raw, Some(&config), overlay)?,
                )
            } else {
                (
                    &mut result.constants,
                    self.inspect_type_with_namespace(raw, Some(&config), None, overlay)?,
                )
            };
            bucket.0.push((name.clone(), bucket.1));
        }

        Ok(result)
    }

    /// Depth-first pre-order traversal over an already-built graph. Purely
    /// structural: doesn't touch the adapter or cache.
    pub fn walk<P: FnMut(&Node) -> bool>(
        &self,
        root: Node,
        max_depth: Option<isize>,
        predicate: P,
    ) -> Result<Walker<P>, TraversalError> {
        Walker::try_new(root, max_depth, predicate)
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }

    pub fn cache_clear(&self) {
        self.cache.clear()
    }

    /// Dispatches to [`extract_function_namespace`](namespace::extract_function_namespace)
    /// or [`extract_class_namespace`](namespace::extract_class_namespace) depending on
    /// what `source` is. The adapter contract has no generic "what kind of
    /// thing is this" probe beyond the specific `is_*` predicates, so a
    /// function is the only source kind distinguished here; anything else is
    /// treated as class-like. Call the specific extractor directly for a
    /// module.
    pub fn extract_namespace(&self, source: &A::RawType) -> NamespacePair<A::RawType> {
        if self.adapter.is_function(source) {
            namespace::extract_function_namespace(&self.adapter, source)
        } else {
            namespace::extract_class_namespace(&self.adapter, source)
        }
    }

    pub fn extract_class_namespace(&self, cls: &A::RawType) -> NamespacePair<A::RawType> {
        namespace::extract_class_namespace(&self.adapter, cls)
    }

    pub fn extract_function_namespace(&self, function: &A::RawType) -> NamespacePair<A::RawType> {
        namespace::extract_function_namespace(&self.adapter, function)
    }

    pub fn extract_module_namespace(&self, module: &A::RawType) -> NamespacePair<A::RawType> {
        namespace::extract_module_namespace(&self.adapter, module)
    }
}

fn is_dataclass_node_kind(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Dataclass { .. })
}

fn is_typed_dict_node_kind(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::TypedDict { .. })
}

fn is_named_tuple_node_kind(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::NamedTuple { .. })
}

fn is_enum_node_kind(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Enum { .. })
}

fn is_protocol_node_kind(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Protocol { .. })
}

fn rename_alias(node: Node, name: String) -> Node {
    let kind = match node.kind().clone() {
        NodeKind::TypeAlias { value, .. } => NodeKind::TypeAlias { name, value },
        NodeKind::GenericAlias { type_params, value, .. } => NodeKind::GenericAlias {
            name,
            type_params,
            value,
        },
        other => other,
    };
    NodeData {
        kind,
        source_location: node.source_location().cloned(),
        metadata: node.metadata().clone(),
        qualifiers: node.qualifiers().clone(),
        children: node.children().to_vec(),
        edges: node.edges().to_vec(),
    }
    .into()
}

impl From<NodeData> for Node {
    fn from(data: NodeData) -> Self {
        Node::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal hand-rolled adapter over a tiny in-memory type tree, just
    /// enough to exercise `Engine`'s own wiring (cache reuse, source-bypass,
    /// walk) independent of `typing-graph-testhelpers`'s fuller mock.
    #[derive(Clone)]
    enum Raw {
        Concrete(&'static str),
        Union(Vec<Raw>),
    }

    struct TinyAdapter;

    impl ReflectionAdapter for TinyAdapter {
        type RawType = Raw;
        type Id = usize;

        fn identity(&self, t: &Raw) -> usize {
            match t {
                Raw::Concrete(name) => name.as_ptr() as usize,
                Raw::Union(members) => members.as_ptr() as usize,
            }
        }
        fn special_form(&self, _t: &Raw) -> Option<SpecialForm> {
            None
        }
        fn type_name(&self, t: &Raw) -> String {
            match t {
                Raw::Concrete(name) => name.to_string(),
                Raw::Union(_) => "union".to_string(),
            }
        }
        fn origin(&self, _t: &Raw) -> Option<Raw> {
            None
        }
        fn args(&self, t: &Raw) -> Vec<Raw> {
            match t {
                Raw::Union(members) => members.clone(),
                _ => Vec::new(),
            }
        }
        fn is_annotated(&self, _t: &Raw) -> bool {
            false
        }
        fn annotated_parts(&self, t: &Raw) -> (Raw, Vec<Box<dyn Metadata>>) {
            (t.clone(), Vec::new())
        }
        fn is_union(&self, t: &Raw) -> bool {
            matches!(t, Raw::Union(_))
        }
        fn is_literal(&self, _t: &Raw) -> bool {
            false
        }
        fn literal_values(&self, _t: &Raw) -> Vec<LiteralValue> {
            Vec::new()
        }
        fn is_tuple(&self, _t: &Raw) -> bool {
            false
        }
        fn is_callable(&self, _t: &Raw) -> bool {
            false
        }
        fn callable_params(&self, _t: &Raw) -> CallableParamsRaw<Raw> {
            CallableParamsRaw::Ellipsis
        }
        fn callable_returns(&self, t: &Raw) -> Raw {
            t.clone()
        }
        fn is_meta(&self, _t: &Raw) -> bool {
            false
        }
        fn is_typeguard(&self, _t: &Raw) -> bool {
            false
        }
        fn is_typeis(&self, _t: &Raw) -> bool {
            false
        }
        fn is_concatenate(&self, _t: &Raw) -> bool {
            false
        }
        fn is_unpack(&self, _t: &Raw) -> bool {
            false
        }
        fn is_alias(&self, _t: &Raw) -> bool {
            false
        }
        fn alias_name(&self, _t: &Raw) -> String {
            String::new()
        }
        fn alias_type_params(&self, _t: &Raw) -> Vec<Raw> {
            Vec::new()
        }
        fn alias_value(&self, t: &Raw) -> Raw {
            t.clone()
        }
        fn is_generic_type(&self, _t: &Raw) -> bool {
            false
        }
        fn is_subscripted_generic(&self, _t: &Raw) -> bool {
            false
        }
        fn qualifier_unwrap(&self, t: &Raw) -> (Option<Qualifier>, Raw) {
            (None, t.clone())
        }
        fn is_new_type(&self, _t: &Raw) -> bool {
            false
        }
        fn new_type_name(&self, _t: &Raw) -> String {
            String::new()
        }
        fn new_type_supertype(&self, t: &Raw) -> Raw {
            t.clone()
        }
        fn is_forward_ref(&self, _t: &Raw) -> bool {
            false
        }
        fn forward_ref_string(&self, _t: &Raw) -> String {
            String::new()
        }
        fn evaluate_forward_ref(
            &self,
            _reference: &str,
            _namespace: &NamespacePair<Raw>,
            _type_params: &[Raw],
        ) -> Result<Raw, ReflectionError> {
            Err(ReflectionError::new("not supported"))
        }
        fn is_type_var(&self, _t: &Raw) -> bool {
            false
        }
        fn type_var_info(&self, t: &Raw) -> TypeVarInfo<Raw> {
            TypeVarInfo {
                name: self.type_name(t),
                variance: Variance::Invariant,
                infer_variance: false,
                bound: None,
                constraints: Vec::new(),
                default: None,
            }
        }
        fn is_param_spec(&self, _t: &Raw) -> bool {
            false
        }
        fn param_spec_info(&self, t: &Raw) -> ParamSpecInfo<Raw> {
            ParamSpecInfo {
                name: self.type_name(t),
                default: None,
            }
        }
        fn is_type_var_tuple(&self, _t: &Raw) -> bool {
            false
        }
        fn type_var_tuple_info(&self, t: &Raw) -> ParamSpecInfo<Raw> {
            self.param_spec_info(t)
        }
        fn is_dataclass(&self, _t: &Raw) -> bool {
            false
        }
        fn is_typed_dict(&self, _t: &Raw) -> bool {
            false
        }
        fn is_named_tuple(&self, _t: &Raw) -> bool {
            false
        }
        fn is_enum(&self, _t: &Raw) -> bool {
            false
        }
        fn is_protocol(&self, _t: &Raw) -> bool {
            false
        }
        fn dataclass_is_frozen(&self, _t: &Raw) -> bool {
            false
        }
        fn dataclass_has_slots(&self, _t: &Raw) -> bool {
            false
        }
        fn typed_dict_is_total(&self, _t: &Raw) -> bool {
            true
        }
        fn protocol_is_runtime_checkable(&self, _t: &Raw) -> bool {
            false
        }
        fn enum_value_type(&self, _t: &Raw) -> Option<Raw> {
            None
        }
        fn enum_members(&self, _t: &Raw) -> Vec<EnumMemberRaw> {
            Vec::new()
        }
        fn fields(&self, _t: &Raw) -> Vec<FieldRaw<Raw>> {
            Vec::new()
        }
        fn methods(&self, _t: &Raw) -> Vec<FieldRaw<Raw>> {
            Vec::new()
        }
        fn owner_class(&self, _t: &Raw, _member_name: &str) -> Option<usize> {
            None
        }
        fn is_function(&self, _t: &Raw) -> bool {
            false
        }
        fn function_name(&self, _t: &Raw) -> String {
            String::new()
        }
        fn function_is_async(&self, _t: &Raw) -> bool {
            false
        }
        fn function_is_generator(&self, _t: &Raw) -> bool {
            false
        }
        fn function_decorators(&self, _t: &Raw) -> Vec<String> {
            Vec::new()
        }
        fn function_parameters(&self, _t: &Raw) -> Vec<(String, Raw, ParamKind, bool, Option<String>)> {
            Vec::new()
        }
        fn function_returns(&self, t: &Raw) -> Raw {
            t.clone()
        }
        fn function_type_params(&self, _t: &Raw) -> Vec<Raw> {
            Vec::new()
        }
        fn type_params(&self, _t: &Raw) -> Vec<Raw> {
            Vec::new()
        }
        fn module_globals(&self, _module: &Raw) -> Namespace<Raw> {
            Namespace::new()
        }
        fn class_module_globals(&self, _cls: &Raw) -> Namespace<Raw> {
            Namespace::new()
        }
        fn class_locals(&self, _cls: &Raw) -> Namespace<Raw> {
            Namespace::new()
        }
        fn function_globals(&self, _function: &Raw) -> Namespace<Raw> {
            Namespace::new()
        }
        fn function_closure(&self, _function: &Raw) -> Namespace<Raw> {
            Namespace::new()
        }
        fn owning_class_of_method(&self, _function: &Raw) -> Option<Raw> {
            None
        }
    }

    #[test]
    fn repeated_inspect_type_hits_the_cache() {
        let engine = Engine::new(TinyAdapter);
        let raw = Raw::Concrete("int");
        let first = engine.inspect_type(&raw, None, None).unwrap();
        let second = engine.inspect_type(&raw, None, None).unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(engine.cache_info().hits, 1);
    }

    #[test]
    fn source_bypasses_the_cache() {
        let engine = Engine::new(TinyAdapter);
        let raw = Raw::Concrete("int");
        let source = Raw::Concrete("owner");
        let first = engine.inspect_type(&raw, None, Some(&source)).unwrap();
        let second = engine.inspect_type(&raw, None, Some(&source)).unwrap();
        assert!(!first.ptr_eq(&second));
        assert_eq!(engine.cache_info().currsize, 0);
    }

    #[test]
    fn cache_clear_resets_counters() {
        let engine = Engine::new(TinyAdapter);
        let raw = Raw::Concrete("int");
        engine.inspect_type(&raw, None, None).unwrap();
        engine.cache_clear();
        assert_eq!(engine.cache_info().currsize, 0);
    }

    #[test]
    fn union_builds_and_walks() {
        let engine = Engine::new(TinyAdapter);
        let raw = Raw::Union(vec![Raw::Concrete("int"), Raw::Concrete("str")]);
        let root = engine.inspect_type(&raw, None, None).unwrap();
        assert!(is_union_node(&root));
        let seen: Vec<_> = engine.walk(root, None, |_| true).unwrap().collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn negative_max_depth_surfaces_as_traversal_error() {
        let engine = Engine::new(TinyAdapter);
        let root = engine.inspect_type(&Raw::Concrete("int"), None, None).unwrap();
        assert!(engine.walk(root, Some(-1), |_| true).is_err());
    }

    #[test]
    fn namespace_overlay_bypasses_the_cache_like_source_does() {
        let engine = Engine::new(TinyAdapter);
        let raw = Raw::Concrete("int");
        let mut globalns = crate::reflect::Namespace::new();
        globalns.insert("int", Raw::Concrete("int"));
        let overlay = (globalns, crate::reflect::Namespace::new());
        let first = engine
            .inspect_type_with_namespace(&raw, None, None, Some(&overlay))
            .unwrap();
        let second = engine
            .inspect_type_with_namespace(&raw, None, None, Some(&overlay))
            .unwrap();
        assert!(!first.ptr_eq(&second));
        assert_eq!(engine.cache_info().currsize, 0);
    }
}
