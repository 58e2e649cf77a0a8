//! The classifier: a pure decision procedure over a raw type that picks
//! which sub-builder the builder should invoke. It never recurses into
//! building child `Node`s; only the builder does that.

use crate::node::LiteralValue;
use crate::qualifier::Qualifier;
use crate::reflect::{CallableParamsRaw, ParamSpecInfo, ReflectionAdapter, SpecialForm, TypeVarInfo};

/// What the builder should construct next, plus any qualifiers peeled off
/// along the way. A qualifier attaches to the eventual node, not to this
/// intermediate classification.
pub struct Classified<R> {
    pub qualifiers: Vec<Qualifier>,
    pub shape: Shape<R>,
}

/// The decision itself: one arm per sub-builder in `builder.rs`. Carries
/// only raw pieces (`R`), never built `Node`s.
pub enum Shape<R> {
    Special(SpecialForm),
    Annotated {
        base: R,
        annotations: Vec<Box<dyn crate::metadata::Metadata>>,
    },
    ForwardRef {
        reference: String,
    },
    Union {
        members: Vec<R>,
    },
    GenericAlias {
        name: String,
        type_params: Vec<R>,
        value: R,
    },
    TypeAlias {
        name: String,
        value: R,
    },
    Tuple {
        elements: Vec<R>,
        variadic: bool,
    },
    Callable {
        params: CallableParamsRaw<R>,
        returns: R,
    },
    Meta {
        target: R,
    },
    TypeGuard {
        target: R,
    },
    TypeIs {
        target: R,
    },
    Literal {
        values: Vec<LiteralValue>,
    },
    Concatenate {
        prefix: Vec<R>,
        param_spec: R,
    },
    Unpack {
        target: R,
    },
    SubscriptedGeneric {
        origin: R,
        args: Vec<R>,
    },
    GenericType {
        class_ref: String,
        type_params: Vec<R>,
    },
    TypeVar(TypeVarInfo<R>),
    ParamSpec(ParamSpecInfo<R>),
    TypeVarTuple(ParamSpecInfo<R>),
    Dataclass(R),
    TypedDict(R),
    NamedTuple(R),
    Enum(R),
    Protocol(R),
    Class(R),
    NewType {
        name: String,
        supertype: R,
    },
    Concrete {
        class_ref: String,
    },
}

/// Runs the full decision order once. Qualifiers are peeled in a loop
/// before any of the remaining checks run, so `Final[ClassVar[int]]`-style
/// stacking collapses onto a single qualifier set over `int`'s shape.
pub fn classify<A: ReflectionAdapter>(adapter: &A, raw: &A::RawType) -> Classified<A::RawType> {
    if let Some(form) = adapter.special_form(raw) {
        return Classified {
            qualifiers: Vec::new(),
            shape: Shape::Special(form),
        };
    }

    if adapter.is_annotated(raw) {
        let (base, annotations) = adapter.annotated_parts(raw);
        return Classified {
            qualifiers: Vec::new(),
            shape: Shape::Annotated { base, annotations },
        };
    }

    let mut qualifiers = Vec::new();
    let mut current = raw.clone();
    loop {
        let (qualifier, inner) = adapter.qualifier_unwrap(&current);
        match qualifier {
            Some(q) => {
                qualifiers.push(q);
                current = inner;
            }
            None => break,
        }
    }

    let shape = classify_unqualified(adapter, &current);
    Classified { qualifiers, shape }
}

fn classify_unqualified<A: ReflectionAdapter>(adapter: &A, raw: &A::RawType) -> Shape<A::RawType> {
    if adapter.is_forward_ref(raw) {
        return Shape::ForwardRef {
            reference: adapter.forward_ref_string(raw),
        };
    }

    if adapter.is_union(raw) {
        return Shape::Union {
            members: adapter.args(raw),
        };
    }

    if adapter.is_alias(raw) {
        let name = adapter.alias_name(raw);
        let type_params = adapter.alias_type_params(raw);
        let value = adapter.alias_value(raw);
        return if type_params.is_empty() {
            Shape::TypeAlias { name, value }
        } else {
            Shape::GenericAlias {
                name,
                type_params,
                value,
            }
        };
    }

    if adapter.is_subscripted_generic(raw) {
        if adapter.is_tuple(raw) {
            let args = adapter.args(raw);
            let variadic = args.len() == 2 && adapter.special_form(&args[1]) == Some(SpecialForm::Ellipsis);
            return Shape::Tuple {
                elements: args,
                variadic,
            };
        }
        if adapter.is_callable(raw) {
            return Shape::Callable {
                params: adapter.callable_params(raw),
                returns: adapter.callable_returns(raw),
            };
        }
        if adapter.is_meta(raw) {
            return Shape::Meta {
                target: adapter.args(raw).remove(0),
            };
        }
        if adapter.is_typeguard(raw) {
            return Shape::TypeGuard {
                target: adapter.args(raw).remove(0),
            };
        }
        if adapter.is_typeis(raw) {
            return Shape::TypeIs {
                target: adapter.args(raw).remove(0),
            };
        }
        if adapter.is_literal(raw) {
            return Shape::Literal {
                values: adapter.literal_values(raw),
            };
        }
        if adapter.is_concatenate(raw) {
            let mut args = adapter.args(raw);
            let param_spec = args.pop().expect("concatenate has a trailing ParamSpec");
            return Shape::Concatenate {
                prefix: args,
                param_spec,
            };
        }
        if adapter.is_unpack(raw) {
            return Shape::Unpack {
                target: adapter.args(raw).remove(0),
            };
        }
        let origin = adapter.origin(raw).expect("subscripted generic has an origin");
        return Shape::SubscriptedGeneric {
            origin,
            args: adapter.args(raw),
        };
    }

    if adapter.is_generic_type(raw) {
        return Shape::GenericType {
            class_ref: adapter.type_name(raw),
            type_params: adapter.type_params(raw),
        };
    }

    if adapter.is_type_var(raw) {
        return Shape::TypeVar(adapter.type_var_info(raw));
    }
    if adapter.is_param_spec(raw) {
        return Shape::ParamSpec(adapter.param_spec_info(raw));
    }
    if adapter.is_type_var_tuple(raw) {
        return Shape::TypeVarTuple(adapter.type_var_tuple_info(raw));
    }

    if adapter.is_new_type(raw) {
        return Shape::NewType {
            name: adapter.new_type_name(raw),
            supertype: adapter.new_type_supertype(raw),
        };
    }

    if adapter.is_dataclass(raw) {
        return Shape::Dataclass(raw.clone());
    }
    if adapter.is_typed_dict(raw) {
        return Shape::TypedDict(raw.clone());
    }
    if adapter.is_named_tuple(raw) {
        return Shape::NamedTuple(raw.clone());
    }
    if adapter.is_enum(raw) {
        return Shape::Enum(raw.clone());
    }
    if adapter.is_protocol(raw) {
        return Shape::Protocol(raw.clone());
    }
    if adapter.is_function(raw) {
        // A bare function reference used as a type; falls back to Class.
        return Shape::Class(raw.clone());
    }

    // No dedicated is_class probe exists; a non-empty field or method list
    // is the signal. A type with no reflectable members falls to Concrete.
    if !adapter.fields(raw).is_empty() || !adapter.methods(raw).is_empty() {
        return Shape::Class(raw.clone());
    }

    Shape::Concrete {
        class_ref: adapter.type_name(raw),
    }
}
