//! The node taxonomy: every type annotation the engine can classify becomes
//! one `Node`, a cheaply-clonable handle onto a shared, immutable `NodeData`
//! payload. Recursive fields hold `Node` directly (not `Box<Node>`) since
//! `Node` is already pointer-sized.
//!
//! Equality and hashing are structural, following every node down to its
//! leaves. Two `Node`s built from unrelated raw types but with the same
//! shape compare equal. `Node::cache_key` exposes the stronger, pointer-based
//! identity the cache and walker rely on.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::edge::Edge;
use crate::metadata::MetadataCollection;
use crate::qualifier::{Qualifier, Variance};
use crate::source_location::SourceLocation;

/// A handle onto a built node. Clone is an `Arc` bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node(Arc<NodeData>);

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self(Arc::new(data))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn source_location(&self) -> Option<&SourceLocation> {
        self.0.source_location.as_ref()
    }

    pub fn metadata(&self) -> &MetadataCollection {
        &self.0.metadata
    }

    pub fn qualifiers(&self) -> &BTreeSet<Qualifier> {
        &self.0.qualifiers
    }

    pub fn children(&self) -> &[Node] {
        &self.0.children
    }

    pub fn edges(&self) -> &[Edge] {
        &self.0.edges
    }

    /// Stable-for-the-process-lifetime identity of the underlying `Arc`
    /// allocation. Two `Node`s returned from the same cache slot share a
    /// `cache_key`; two structurally-identical but independently-built nodes
    /// do not. `walk`'s cycle guard and the cache's "same object back"
    /// guarantee check this, not structural equality.
    pub fn cache_key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Every field a node carries regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub source_location: Option<SourceLocation>,
    pub metadata: MetadataCollection,
    pub qualifiers: BTreeSet<Qualifier>,
    pub children: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl NodeData {
    /// Construct from an edge/child list already split by `split_edges`, so
    /// the `children.len() == edges.len()` invariant can't be violated at
    /// the call site.
    pub fn new(kind: NodeKind, children: Vec<Node>, edges: Vec<Edge>) -> Self {
        debug_assert_eq!(children.len(), edges.len());
        Self {
            kind,
            source_location: None,
            metadata: MetadataCollection::empty(),
            qualifiers: BTreeSet::new(),
            children,
            edges,
        }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Vec::new(), Vec::new())
    }

    pub fn with_source_location(mut self, location: SourceLocation) -> Self {
        if !location.is_empty() {
            self.source_location = Some(location);
        }
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataCollection) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: BTreeSet<Qualifier>) -> Self {
        self.qualifiers = qualifiers;
        self
    }
}

// `MetadataCollection` hashes via `content_hash` (falling back to a fixed
// value for unhashable collections), so every other field here can derive
// normally and this impl only needs to fold that one field in by hand.
impl Hash for NodeData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.metadata.hash(state);
        self.qualifiers.hash(state);
        self.children.hash(state);
        self.edges.hash(state);
    }
}

/// The tagged sum itself. Each variant carries exactly the
/// payload that kind needs beyond the common `NodeData` fields; shared
/// relationships (element types, bases, fields) are additionally exposed
/// through `children`/`edges` so generic walkers never need to match on
/// `NodeKind` at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A concrete, non-generic class reference (`int`, `str`, a plain
    /// user-defined class with no type parameters).
    Concrete { class_ref: String },

    /// An unsubscripted generic class (`list`, `dict`, a user generic before
    /// `[...]` is applied).
    GenericType {
        class_ref: String,
        type_params: Vec<Node>,
    },

    /// A generic applied to concrete arguments (`list[int]`).
    SubscriptedGeneric { origin: Node, args: Vec<Node> },

    /// `type X[T] = ...` (PEP 695) or an unsubscripted `TypeAlias` target.
    GenericAlias {
        name: String,
        type_params: Vec<Node>,
        value: Node,
    },

    /// A plain, non-generic alias (`type X = int`, `X: TypeAlias = int`).
    TypeAlias { name: String, value: Node },

    /// `Annotated[T, ...]` when `hoist_metadata` is off: the metadata stays
    /// attached to this wrapper node instead of being merged into `base`'s
    /// `NodeData::metadata`.
    Annotated {
        base: Node,
        annotations: MetadataCollection,
    },

    NewType { name: String, supertype: Node },

    Union { members: Vec<Node> },
    Intersection { members: Vec<Node> },
    Tuple { elements: Vec<Node>, variadic: bool },
    Callable { params: CallableParams, returns: Node },

    Any,
    Never,
    SelfType,
    LiteralString,
    Ellipsis,

    Literal { values: Vec<LiteralValue> },

    /// `ClassVar[T]`/`Final[T]`/etc. when the qualifier needs its own wrapper
    /// node rather than attaching to `target`'s `qualifiers` set directly
    /// (nested or repeated qualifiers).
    Meta { target: Node },

    TypeGuard { target: Node },
    TypeIs { target: Node },

    TypeVar {
        name: String,
        variance: Variance,
        infer_variance: bool,
        bound: Option<Node>,
        constraints: Vec<Node>,
        default: Option<Node>,
    },
    ParamSpec { name: String, default: Option<Node> },
    TypeVarTuple { name: String, default: Option<Node> },
    Concatenate { prefix: Vec<Node>, param_spec: Node },
    Unpack { target: Node },

    ForwardRef { reference: String, state: RefState },

    Class {
        fields: Vec<FieldDef>,
        methods: Vec<FieldDef>,
    },
    Dataclass {
        frozen: bool,
        slots: bool,
        fields: Vec<FieldDef>,
    },
    TypedDict { total: bool, fields: Vec<FieldDef> },
    NamedTuple { fields: Vec<FieldDef> },
    Protocol {
        runtime_checkable: bool,
        methods: Vec<FieldDef>,
        attributes: Vec<FieldDef>,
    },
    Enum {
        members: Vec<EnumMember>,
        value_type: Option<Node>,
    },

    Function {
        name: String,
        signature: Signature,
        is_async: bool,
        is_generator: bool,
        decorators: Vec<String>,
    },

    /// A bare signature, not attached to a named function
    /// (`inspect_signature`). A `Function` node also carries a `Signature`
    /// value inline, but reaches it through a child `Signature`-kind node
    /// connected by a `Signature` edge, so both entry points share one
    /// representation.
    Signature(Signature),
}

/// `Callable`'s parameter list shape: a fixed positional list,
/// `...` (any arguments), or a `ParamSpec` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallableParams {
    Fixed(Vec<Node>),
    Ellipsis,
    ParamSpec(Node),
}

/// A scalar accepted inside `Literal[...]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Int(i64),
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    EnumMember { enum_name: String, member: String },
    None,
}

/// A forward reference's lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefState {
    Unresolved,
    Resolved(Node),
    Failed(String),
}

impl RefState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, RefState::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&Node> {
        match self {
            RefState::Resolved(node) => Some(node),
            _ => None,
        }
    }
}

/// One field, attribute, or method slot on a structured node (`Class`,
/// `Dataclass`, `TypedDict`, `NamedTuple`, `Protocol`). A method is
/// represented the same way as a field, with `ty` pointing at a `Function`
/// node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: String,
    pub ty: Node,
    pub has_default: bool,
    pub default_repr: Option<String>,
    pub metadata: MetadataCollection,
    pub qualifiers: BTreeSet<Qualifier>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Node) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            default_repr: None,
            metadata: MetadataCollection::empty(),
            qualifiers: BTreeSet::new(),
        }
    }
}

/// An enum member. `value_repr` is a best-effort debug rendering of the
/// member's value, not a parsed literal: enum member values can be
/// arbitrary objects in the source language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    pub name: String,
    pub value_repr: Option<String>,
}

/// A callable's full parameter list and return type. Shared by
/// `Function` nodes and any bare signature the adapter surfaces on its own
/// (e.g. `inspect_signature`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub returns: Node,
    pub type_params: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub ty: Node,
    pub kind: ParamKind,
    pub has_default: bool,
    pub default_repr: Option<String>,
    pub metadata: MetadataCollection,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Node, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            has_default: false,
            default_repr: None,
            metadata: MetadataCollection::empty(),
        }
    }
}

/// Aliases for node categories this engine represents with the same
/// `Node`/`NodeKind` shape. `TypeParamNode` covers
/// `TypeVar`/`ParamSpec`/`TypeVarTuple`; the others are `Node`s whose
/// `kind()` is guaranteed to be the named variant. See `helpers.rs` for the
/// narrowing guards that uphold that guarantee.
pub type TypeParamNode = Node;
pub type FunctionNode = Node;
pub type SignatureNode = Node;
pub type GenericAliasNode = Node;
pub type TypeAliasNode = Node;

#[cfg(test)]
mod tests {
    use super::*;

    fn concrete(name: &str) -> Node {
        Node::new(NodeData::leaf(NodeKind::Concrete {
            class_ref: name.to_string(),
        }))
    }

    #[test]
    fn clone_shares_identity() {
        let a = concrete("int");
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn structurally_identical_nodes_are_not_the_same_instance() {
        let a = concrete("int");
        let b = concrete("int");
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn union_hash_is_order_sensitive_like_eq() {
        use std::collections::hash_map::DefaultHasher;

        let members_ab = vec![concrete("int"), concrete("str")];
        let members_ba = vec![concrete("str"), concrete("int")];
        let union_ab = Node::new(NodeData::leaf(NodeKind::Union {
            members: members_ab,
        }));
        let union_ba = Node::new(NodeData::leaf(NodeKind::Union {
            members: members_ba,
        }));
        assert_ne!(union_ab, union_ba);

        let hash_of = |n: &Node| {
            let mut h = DefaultHasher::new();
            n.hash(&mut h);
            h.finish()
        };
        // Not a guarantee in general (hash collisions exist), but for these
        // two inputs the values differ, which is what an order-sensitive
        // implementation should produce.
        assert_ne!(hash_of(&union_ab), hash_of(&union_ba));
    }
}
