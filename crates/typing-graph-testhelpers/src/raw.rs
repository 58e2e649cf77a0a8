//! The in-memory raw-type enum `MockAdapter` reflects over. Every variant
//! mirrors one shape the classifier recognizes. There is no parser or
//! host-language binding underneath: fixtures build these values by hand.

use std::rc::Rc;

use typing_graph_core::{LiteralValue, ParamKind, Qualifier, Variance};

/// One node in a hand-built type expression. `Rc` wraps the structured
/// definitions (`StructDef`, `EnumDef`, `FunctionDef`, `ModuleDef`) so the
/// same class can be referenced from many places (a field's type, a forward
/// reference's resolved namespace entry, …) without re-describing it;
/// `PartialEq`/`Hash` still compare by value, not by pointer, the way `Rc`'s
/// own impls delegate to `T`'s. Two independently-built `Struct`s with the
/// same shape are still the same raw type as far as `MockAdapter::identity`
/// is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockRaw {
    Concrete(&'static str),
    NoneType,
    Any,
    Never,
    SelfType,
    LiteralString,
    Ellipsis,

    /// An unsubscripted generic (`list`, `dict`, a user generic class before
    /// `[...]` is applied), carrying its own type parameters as `TypeVar`s.
    Generic {
        name: &'static str,
        type_params: Vec<MockRaw>,
    },
    /// A generic applied to concrete arguments (`list[int]`).
    Subscripted {
        origin: Box<MockRaw>,
        args: Vec<MockRaw>,
    },
    Union(Vec<MockRaw>),
    /// Raw subscript arguments, verbatim. `tuple[int, ...]`'s args are
    /// `[int, Ellipsis]`, matching what `classify` expects to find when it
    /// asks whether the second argument is the `Ellipsis` special form.
    Tuple(Vec<MockRaw>),
    Callable {
        params: CallableShape,
        returns: Box<MockRaw>,
    },
    Literal(Vec<LiteralValue>),
    Annotated {
        base: Box<MockRaw>,
        metadata: Vec<MetaItem>,
    },
    Qualified {
        qualifier: Qualifier,
        inner: Box<MockRaw>,
    },
    Meta(Box<MockRaw>),
    TypeGuard(Box<MockRaw>),
    TypeIs(Box<MockRaw>),
    Concatenate {
        prefix: Vec<MockRaw>,
        param_spec: Box<MockRaw>,
    },
    Unpack(Box<MockRaw>),

    ForwardRef(String),

    TypeVar {
        name: &'static str,
        variance: Variance,
        infer_variance: bool,
        bound: Option<Box<MockRaw>>,
        constraints: Vec<MockRaw>,
        default: Option<Box<MockRaw>>,
    },
    ParamSpec {
        name: &'static str,
        default: Option<Box<MockRaw>>,
    },
    TypeVarTuple {
        name: &'static str,
        default: Option<Box<MockRaw>>,
    },

    NewType {
        name: &'static str,
        supertype: Box<MockRaw>,
    },
    GenericAlias {
        name: &'static str,
        type_params: Vec<MockRaw>,
        value: Box<MockRaw>,
    },
    TypeAlias {
        name: &'static str,
        value: Box<MockRaw>,
    },

    Struct(Rc<StructDef>),
    Enum(Rc<EnumDef>),
    Function(Rc<FunctionDef>),
    Module(Rc<ModuleDef>),
}

impl MockRaw {
    pub fn boxed(self) -> Box<MockRaw> {
        Box::new(self)
    }

    pub fn optional(self) -> MockRaw {
        MockRaw::Union(vec![self, MockRaw::NoneType])
    }
}

/// `Callable`'s parameter list shape, mirroring
/// [`typing_graph_core::CallableParamsRaw`] but storable. That type carries
/// no derives of its own, since the engine only ever constructs one on the
/// fly from whatever the adapter reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallableShape {
    Fixed(Vec<MockRaw>),
    Ellipsis,
    ParamSpec(Box<MockRaw>),
}

/// A single opaque annotation, as it would sit inside `Annotated[T, ...]`.
/// Kept tiny and closed rather than open-ended. Fixtures needing a richer
/// shape reach for `MetaGroup` (see `metadata.rs`) instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaItem {
    Str(String),
    Int(i64),
    Gt(i64),
    Ge(i64),
    Lt(i64),
    Le(i64),
    MaxLen(usize),
    MinLen(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    Class,
    Dataclass { frozen: bool, slots: bool },
    TypedDict { total: bool },
    NamedTuple,
    Protocol { runtime_checkable: bool },
}

/// One field, attribute, or method slot on a [`StructDef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: MockRaw,
    pub has_default: bool,
    pub default_repr: Option<&'static str>,
    pub metadata: Vec<MetaItem>,
    pub qualifiers: Vec<Qualifier>,
    /// `None` means "declared directly here"; `Some(owner)` names the base
    /// class that actually declared it, for `include_inherited_members`
    /// fixtures.
    pub owner: Option<MockRaw>,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: MockRaw) -> Self {
        Self {
            name,
            ty,
            has_default: false,
            default_repr: None,
            metadata: Vec::new(),
            qualifiers: Vec::new(),
            owner: None,
        }
    }

    pub fn with_default(mut self, repr: &'static str) -> Self {
        self.has_default = true;
        self.default_repr = Some(repr);
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<MetaItem>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn inherited_from(mut self, owner: MockRaw) -> Self {
        self.owner = Some(owner);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructDef {
    pub name: &'static str,
    pub kind: StructKindSlot,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<FieldDef>,
    /// Bindings visible in the module that defines this class
    /// (`class_module_globals`).
    pub module_globals: Vec<(&'static str, MockRaw)>,
    /// Bindings visible in the class body's own enclosing scope
    /// (`class_locals`). The class's own name is added automatically by
    /// `namespace::extract_class_namespace`, so fixtures only need to supply
    /// anything beyond that (nested classes, a `TypeVar` bound in the class
    /// body, …).
    pub locals: Vec<(&'static str, MockRaw)>,
}

/// `StructKind` wrapped so `StructDef` can derive `Default` for the builder
/// pattern below; a def is never actually built with the default kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructKindSlot(pub StructKind);

impl Default for StructKindSlot {
    fn default() -> Self {
        StructKindSlot(StructKind::Class)
    }
}

impl StructDef {
    pub fn new(name: &'static str, kind: StructKind) -> Self {
        Self {
            name,
            kind: StructKindSlot(kind),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: FieldDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_locals(mut self, locals: Vec<(&'static str, MockRaw)>) -> Self {
        self.locals = locals;
        self
    }

    pub fn with_module_globals(mut self, globals: Vec<(&'static str, MockRaw)>) -> Self {
        self.module_globals = globals;
        self
    }

    pub fn into_raw(self) -> MockRaw {
        MockRaw::Struct(Rc::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMemberDef {
    pub name: &'static str,
    pub value_repr: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EnumDef {
    pub name: &'static str,
    pub value_type: Option<MockRaw>,
    pub members: Vec<EnumMemberDef>,
}

impl EnumDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_value_type(mut self, value_type: MockRaw) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_member(mut self, name: &'static str, value_repr: Option<&'static str>) -> Self {
        self.members.push(EnumMemberDef { name, value_repr });
        self
    }

    pub fn into_raw(self) -> MockRaw {
        MockRaw::Enum(Rc::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamDef {
    pub name: &'static str,
    pub ty: MockRaw,
    pub kind: ParamKind,
    pub has_default: bool,
    pub default_repr: Option<&'static str>,
}

impl ParamDef {
    pub fn new(name: &'static str, ty: MockRaw, kind: ParamKind) -> Self {
        Self {
            name,
            ty,
            kind,
            has_default: false,
            default_repr: None,
        }
    }

    pub fn with_default(mut self, repr: &'static str) -> Self {
        self.has_default = true;
        self.default_repr = Some(repr);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FunctionDef {
    pub name: &'static str,
    pub is_async: bool,
    pub is_generator: bool,
    pub decorators: Vec<&'static str>,
    pub parameters: Vec<ParamDef>,
    pub returns: Option<MockRaw>,
    pub type_params: Vec<MockRaw>,
    pub owning_class: Option<MockRaw>,
    pub globals: Vec<(&'static str, MockRaw)>,
    pub closure: Vec<(&'static str, MockRaw)>,
}

impl FunctionDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_param(mut self, param: ParamDef) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn returning(mut self, returns: MockRaw) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn async_fn(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn generator(mut self) -> Self {
        self.is_generator = true;
        self
    }

    pub fn with_decorator(mut self, name: &'static str) -> Self {
        self.decorators.push(name);
        self
    }

    pub fn with_type_param(mut self, tp: MockRaw) -> Self {
        self.type_params.push(tp);
        self
    }

    pub fn owned_by(mut self, owner: MockRaw) -> Self {
        self.owning_class = Some(owner);
        self
    }

    pub fn with_globals(mut self, globals: Vec<(&'static str, MockRaw)>) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_closure(mut self, closure: Vec<(&'static str, MockRaw)>) -> Self {
        self.closure = closure;
        self
    }

    pub fn into_raw(self) -> MockRaw {
        MockRaw::Function(Rc::new(self))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ModuleDef {
    pub name: &'static str,
    pub globals: Vec<(&'static str, MockRaw)>,
}

impl ModuleDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn with_global(mut self, name: &'static str, value: MockRaw) -> Self {
        self.globals.push((name, value));
        self
    }

    pub fn into_raw(self) -> MockRaw {
        MockRaw::Module(Rc::new(self))
    }
}
