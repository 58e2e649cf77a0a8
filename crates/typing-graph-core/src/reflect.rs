//! The `ReflectionAdapter` contract: the seam between this crate and
//! whatever source-language reflection primitives a caller has. The engine
//! only ever calls through this trait; it never inspects a raw type any
//! other way. `typing-graph-facet` and `typing-graph-testhelpers` each
//! provide one concrete implementation.

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::error::ReflectionError;
use crate::node::ParamKind;
use crate::qualifier::{Qualifier, Variance};
use crate::source_location::SourceLocation;

/// A global/local binding pair used to resolve forward references.
/// Bindings map a name to the raw type it resolves to; adapters are free
/// to leave a name unbound rather than model every possible value.
#[derive(Debug, Clone, Default)]
pub struct Namespace<R> {
    bindings: BTreeMap<String, R>,
}

impl<R> Namespace<R> {
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: R) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.bindings.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &R)> {
        self.bindings.iter()
    }

    /// Merge `other` over `self`; `other`'s bindings win on conflict. Used to
    /// apply a user-supplied `globalns`/`localns` overlay on top of
    /// auto-extracted bindings.
    pub fn overlay(mut self, other: &Namespace<R>) -> Self
    where
        R: Clone,
    {
        for (name, value) in &other.bindings {
            self.bindings.insert(name.clone(), value.clone());
        }
        self
    }
}

/// `(globals, locals)`, as returned by every namespace-extraction entry
/// point and consumed by `evaluate_forward_ref`.
pub type NamespacePair<R> = (Namespace<R>, Namespace<R>);

/// What `type_var_info` reports for a `TypeVar`.
pub struct TypeVarInfo<R> {
    pub name: String,
    pub variance: Variance,
    pub infer_variance: bool,
    pub bound: Option<R>,
    pub constraints: Vec<R>,
    pub default: Option<R>,
}

/// What `param_spec_info`/`type_var_tuple_info` report: strictly a subset
/// of `TypeVarInfo`'s fields, since neither has variance or bounds.
pub struct ParamSpecInfo<R> {
    pub name: String,
    pub default: Option<R>,
}

/// One field/attribute/method slot, as enumerated by a structured facet
/// probe (`fields`, `methods`).
pub struct FieldRaw<R> {
    pub name: String,
    pub raw_type: R,
    pub has_default: bool,
    pub default_repr: Option<String>,
    pub metadata: Vec<Box<dyn crate::metadata::Metadata>>,
    pub qualifiers: Vec<Qualifier>,
}

/// One enum member, as enumerated by `enum_members`.
pub struct EnumMemberRaw {
    pub name: String,
    pub value_repr: Option<String>,
}

/// `Callable`'s parameter list, in whatever shape the adapter found it:
/// a fixed list, a bare ellipsis, or a `ParamSpec`.
pub enum CallableParamsRaw<R> {
    Fixed(Vec<R>),
    Ellipsis,
    ParamSpec(R),
}

/// Which singleton special form a raw type is, if any. Singletons are
/// identified by identity, not by structural shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Any,
    Never,
    SelfType,
    LiteralString,
    Ellipsis,
}

/// The adapter contract itself. Every method is a pure query against the
/// raw type (or, for `evaluate_forward_ref`, against a namespace pair).
/// None of them recurse or build nodes; that is the builder's job.
pub trait ReflectionAdapter {
    /// The source language's own representation of a type expression.
    type RawType: Clone + 'static;
    /// A hashable, comparable key standing in for `RawType`'s object
    /// identity. `RawType` itself need not be `Eq`/`Hash` (the values it
    /// wraps might not be), so the adapter names what identity actually is.
    type Id: Clone + Eq + Hash + 'static;

    fn identity(&self, t: &Self::RawType) -> Self::Id;

    fn special_form(&self, t: &Self::RawType) -> Option<SpecialForm>;

    /// The class's own name, used for `Concrete`/`GenericType` nodes. Not
    /// to be confused with `alias_name`, which names the alias binding
    /// rather than the thing it points at.
    fn type_name(&self, t: &Self::RawType) -> String;

    fn origin(&self, t: &Self::RawType) -> Option<Self::RawType>;
    fn args(&self, t: &Self::RawType) -> Vec<Self::RawType>;

    fn is_annotated(&self, t: &Self::RawType) -> bool;
    /// The `(base, annotations)` split for an `Annotated` wrapper. Only
    /// meaningful when `is_annotated` returns `true`.
    fn annotated_parts(&self, t: &Self::RawType) -> (Self::RawType, Vec<Box<dyn crate::metadata::Metadata>>);

    fn is_union(&self, t: &Self::RawType) -> bool;
    fn is_literal(&self, t: &Self::RawType) -> bool;
    fn literal_values(&self, t: &Self::RawType) -> Vec<crate::node::LiteralValue>;
    fn is_tuple(&self, t: &Self::RawType) -> bool;
    fn is_callable(&self, t: &Self::RawType) -> bool;
    fn callable_params(&self, t: &Self::RawType) -> CallableParamsRaw<Self::RawType>;
    fn callable_returns(&self, t: &Self::RawType) -> Self::RawType;
    fn is_meta(&self, t: &Self::RawType) -> bool;
    fn is_typeguard(&self, t: &Self::RawType) -> bool;
    fn is_typeis(&self, t: &Self::RawType) -> bool;
    fn is_concatenate(&self, t: &Self::RawType) -> bool;
    fn is_unpack(&self, t: &Self::RawType) -> bool;

    /// Alias facets: a generic alias with its own parameter scope vs. a
    /// plain alias without one.
    fn is_alias(&self, t: &Self::RawType) -> bool;
    fn alias_name(&self, t: &Self::RawType) -> String;
    fn alias_type_params(&self, t: &Self::RawType) -> Vec<Self::RawType>;
    fn alias_value(&self, t: &Self::RawType) -> Self::RawType;

    fn is_generic_type(&self, t: &Self::RawType) -> bool;
    fn is_subscripted_generic(&self, t: &Self::RawType) -> bool;

    fn qualifier_unwrap(&self, t: &Self::RawType) -> (Option<Qualifier>, Self::RawType);

    fn is_new_type(&self, t: &Self::RawType) -> bool;
    fn new_type_name(&self, t: &Self::RawType) -> String;
    fn new_type_supertype(&self, t: &Self::RawType) -> Self::RawType;

    fn is_forward_ref(&self, t: &Self::RawType) -> bool;
    fn forward_ref_string(&self, t: &Self::RawType) -> String;
    fn evaluate_forward_ref(
        &self,
        reference: &str,
        namespace: &NamespacePair<Self::RawType>,
        type_params: &[Self::RawType],
    ) -> Result<Self::RawType, ReflectionError>;

    fn is_type_var(&self, t: &Self::RawType) -> bool;
    fn type_var_info(&self, t: &Self::RawType) -> TypeVarInfo<Self::RawType>;
    fn is_param_spec(&self, t: &Self::RawType) -> bool;
    fn param_spec_info(&self, t: &Self::RawType) -> ParamSpecInfo<Self::RawType>;
    fn is_type_var_tuple(&self, t: &Self::RawType) -> bool;
    fn type_var_tuple_info(&self, t: &Self::RawType) -> ParamSpecInfo<Self::RawType>;

    fn is_dataclass(&self, t: &Self::RawType) -> bool;
    fn is_typed_dict(&self, t: &Self::RawType) -> bool;
    fn is_named_tuple(&self, t: &Self::RawType) -> bool;
    fn is_enum(&self, t: &Self::RawType) -> bool;
    fn is_protocol(&self, t: &Self::RawType) -> bool;

    fn dataclass_is_frozen(&self, t: &Self::RawType) -> bool;
    fn dataclass_has_slots(&self, t: &Self::RawType) -> bool;
    fn typed_dict_is_total(&self, t: &Self::RawType) -> bool;
    fn protocol_is_runtime_checkable(&self, t: &Self::RawType) -> bool;
    fn enum_value_type(&self, t: &Self::RawType) -> Option<Self::RawType>;
    fn enum_members(&self, t: &Self::RawType) -> Vec<EnumMemberRaw>;

    /// Every field/attribute this structured type declares directly. No
    /// inherited-member or private-member filtering happens here: the
    /// builder applies `Config::include_inherited_members` and
    /// `include_private_members` over the full list this returns, together
    /// with `owner_class`.
    fn fields(&self, t: &Self::RawType) -> Vec<FieldRaw<Self::RawType>>;
    fn methods(&self, t: &Self::RawType) -> Vec<FieldRaw<Self::RawType>>;
    /// Which class (by identity) directly declared a given member, so the
    /// builder can tell an inherited member from one declared on `t` itself.
    fn owner_class(&self, t: &Self::RawType, member_name: &str) -> Option<Self::Id>;

    fn is_function(&self, t: &Self::RawType) -> bool;
    fn function_name(&self, t: &Self::RawType) -> String;
    fn function_is_async(&self, t: &Self::RawType) -> bool;
    fn function_is_generator(&self, t: &Self::RawType) -> bool;
    fn function_decorators(&self, t: &Self::RawType) -> Vec<String>;
    fn function_parameters(&self, t: &Self::RawType) -> Vec<(String, Self::RawType, ParamKind, bool, Option<String>)>;
    fn function_returns(&self, t: &Self::RawType) -> Self::RawType;
    fn function_type_params(&self, t: &Self::RawType) -> Vec<Self::RawType>;

    fn type_params(&self, t: &Self::RawType) -> Vec<Self::RawType>;

    fn module_globals(&self, module: &Self::RawType) -> Namespace<Self::RawType>;
    fn class_module_globals(&self, cls: &Self::RawType) -> Namespace<Self::RawType>;
    fn class_locals(&self, cls: &Self::RawType) -> Namespace<Self::RawType>;
    fn function_globals(&self, function: &Self::RawType) -> Namespace<Self::RawType>;
    fn function_closure(&self, function: &Self::RawType) -> Namespace<Self::RawType>;
    fn owning_class_of_method(&self, function: &Self::RawType) -> Option<Self::RawType>;

    /// Best-effort; returns an empty `SourceLocation` if the adapter cannot
    /// determine one. Only consulted when `Config::include_source_locations`
    /// is set. Locating source is the adapter's business, not the engine's.
    fn source_location(&self, t: &Self::RawType) -> SourceLocation {
        let _ = t;
        SourceLocation::default()
    }
}
