//! `MockAdapter`: the `ReflectionAdapter` implementation fixtures drive the
//! engine through. Zero-sized; all the state lives in the `MockRaw` values
//! passed to each call.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use typing_graph_core::{
    CallableParamsRaw, EnumMemberRaw, FieldRaw, Metadata, Namespace, NamespacePair, ParamSpecInfo,
    ReflectionAdapter, ReflectionError, SpecialForm, TypeVarInfo,
};

use crate::raw::{CallableShape, MockRaw, StructKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct MockAdapter;

fn boxed_metadata(items: &[crate::raw::MetaItem]) -> Vec<Box<dyn Metadata>> {
    items
        .iter()
        .map(|item| Box::new(item.clone()) as Box<dyn Metadata>)
        .collect()
}

fn namespace_of(pairs: &[(&'static str, MockRaw)]) -> Namespace<MockRaw> {
    let mut ns = Namespace::new();
    for (name, value) in pairs {
        ns.insert(*name, value.clone());
    }
    ns
}

impl ReflectionAdapter for MockAdapter {
    type RawType = MockRaw;
    type Id = u64;

    fn identity(&self, t: &MockRaw) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }

    fn special_form(&self, t: &MockRaw) -> Option<SpecialForm> {
        match t {
            MockRaw::Any => Some(SpecialForm::Any),
            MockRaw::Never => Some(SpecialForm::Never),
            MockRaw::SelfType => Some(SpecialForm::SelfType),
            MockRaw::LiteralString => Some(SpecialForm::LiteralString),
            MockRaw::Ellipsis => Some(SpecialForm::Ellipsis),
            _ => None,
        }
    }

    fn type_name(&self, t: &MockRaw) -> String {
        match t {
            MockRaw::Concrete(name) => name.to_string(),
            MockRaw::NoneType => "None".to_string(),
            MockRaw::Generic { name, .. } => name.to_string(),
            MockRaw::Struct(s) => s.name.to_string(),
            MockRaw::Enum(e) => e.name.to_string(),
            MockRaw::Function(f) => f.name.to_string(),
            MockRaw::Module(m) => m.name.to_string(),
            other => format!("{other:?}"),
        }
    }

    fn origin(&self, t: &MockRaw) -> Option<MockRaw> {
        match t {
            MockRaw::Subscripted { origin, .. } => Some((**origin).clone()),
            _ => None,
        }
    }

    fn args(&self, t: &MockRaw) -> Vec<MockRaw> {
        match t {
            MockRaw::Subscripted { args, .. } => args.clone(),
            MockRaw::Union(members) => members.clone(),
            MockRaw::Tuple(elements) => elements.clone(),
            MockRaw::Meta(target) | MockRaw::TypeGuard(target) | MockRaw::TypeIs(target) | MockRaw::Unpack(target) => {
                vec![(**target).clone()]
            }
            MockRaw::Concatenate { prefix, param_spec } => {
                let mut args = prefix.clone();
                args.push((**param_spec).clone());
                args
            }
            _ => Vec::new(),
        }
    }

    fn is_annotated(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Annotated { .. })
    }

    fn annotated_parts(&self, t: &MockRaw) -> (MockRaw, Vec<Box<dyn Metadata>>) {
        match t {
            MockRaw::Annotated { base, metadata } => ((**base).clone(), boxed_metadata(metadata)),
            _ => unreachable!("annotated_parts called on a non-Annotated raw type"),
        }
    }

    fn is_union(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Union(_))
    }

    fn is_literal(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Literal(_))
    }

    fn literal_values(&self, t: &MockRaw) -> Vec<typing_graph_core::LiteralValue> {
        match t {
            MockRaw::Literal(values) => values.clone(),
            _ => Vec::new(),
        }
    }

    fn is_tuple(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Tuple(_))
    }

    fn is_callable(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Callable { .. })
    }

    fn callable_params(&self, t: &MockRaw) -> CallableParamsRaw<MockRaw> {
        match t {
            MockRaw::Callable { params, .. } => match params {
                CallableShape::Fixed(ps) => CallableParamsRaw::Fixed(ps.clone()),
                CallableShape::Ellipsis => CallableParamsRaw::Ellipsis,
                CallableShape::ParamSpec(ps) => CallableParamsRaw::ParamSpec((**ps).clone()),
            },
            _ => unreachable!("callable_params called on a non-Callable raw type"),
        }
    }

    fn callable_returns(&self, t: &MockRaw) -> MockRaw {
        match t {
            MockRaw::Callable { returns, .. } => (**returns).clone(),
            _ => unreachable!("callable_returns called on a non-Callable raw type"),
        }
    }

    fn is_meta(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Meta(_))
    }

    fn is_typeguard(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::TypeGuard(_))
    }

    fn is_typeis(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::TypeIs(_))
    }

    fn is_concatenate(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Concatenate { .. })
    }

    fn is_unpack(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Unpack(_))
    }

    fn is_alias(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::GenericAlias { .. } | MockRaw::TypeAlias { .. })
    }

    fn alias_name(&self, t: &MockRaw) -> String {
        match t {
            MockRaw::GenericAlias { name, .. } | MockRaw::TypeAlias { name, .. } => name.to_string(),
            _ => unreachable!("alias_name called on a non-alias raw type"),
        }
    }

    fn alias_type_params(&self, t: &MockRaw) -> Vec<MockRaw> {
        match t {
            MockRaw::GenericAlias { type_params, .. } => type_params.clone(),
            MockRaw::TypeAlias { .. } => Vec::new(),
            _ => unreachable!("alias_type_params called on a non-alias raw type"),
        }
    }

    fn alias_value(&self, t: &MockRaw) -> MockRaw {
        match t {
            MockRaw::GenericAlias { value, .. } | MockRaw::TypeAlias { value, .. } => (**value).clone(),
            _ => unreachable!("alias_value called on a non-alias raw type"),
        }
    }

    fn is_generic_type(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Generic { .. })
    }

    fn is_subscripted_generic(&self, t: &MockRaw) -> bool {
        matches!(
            t,
            MockRaw::Subscripted { .. }
                | MockRaw::Tuple(_)
                | MockRaw::Callable { .. }
                | MockRaw::Meta(_)
                | MockRaw::TypeGuard(_)
                | MockRaw::TypeIs(_)
                | MockRaw::Literal(_)
                | MockRaw::Concatenate { .. }
                | MockRaw::Unpack(_)
        )
    }

    fn qualifier_unwrap(&self, t: &MockRaw) -> (Option<typing_graph_core::Qualifier>, MockRaw) {
        match t {
            MockRaw::Qualified { qualifier, inner } => (Some(*qualifier), (**inner).clone()),
            other => (None, other.clone()),
        }
    }

    fn is_new_type(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::NewType { .. })
    }

    fn new_type_name(&self, t: &MockRaw) -> String {
        match t {
            MockRaw::NewType { name, .. } => name.to_string(),
            _ => unreachable!("new_type_name called on a non-NewType raw type"),
        }
    }

    fn new_type_supertype(&self, t: &MockRaw) -> MockRaw {
        match t {
            MockRaw::NewType { supertype, .. } => (**supertype).clone(),
            _ => unreachable!("new_type_supertype called on a non-NewType raw type"),
        }
    }

    fn is_forward_ref(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::ForwardRef(_))
    }

    fn forward_ref_string(&self, t: &MockRaw) -> String {
        match t {
            MockRaw::ForwardRef(reference) => reference.clone(),
            _ => unreachable!("forward_ref_string called on a non-ForwardRef raw type"),
        }
    }

    fn evaluate_forward_ref(
        &self,
        reference: &str,
        namespace: &NamespacePair<MockRaw>,
        _type_params: &[MockRaw],
    ) -> Result<MockRaw, ReflectionError> {
        let (globals, locals) = namespace;
        locals
            .get(reference)
            .or_else(|| globals.get(reference))
            .cloned()
            .ok_or_else(|| ReflectionError::new(format!("name `{reference}` is not defined")))
    }

    fn is_type_var(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::TypeVar { .. })
    }

    fn type_var_info(&self, t: &MockRaw) -> TypeVarInfo<MockRaw> {
        match t {
            MockRaw::TypeVar {
                name,
                variance,
                infer_variance,
                bound,
                constraints,
                default,
            } => TypeVarInfo {
                name: name.to_string(),
                variance: *variance,
                infer_variance: *infer_variance,
                bound: bound.as_ref().map(|b| (**b).clone()),
                constraints: constraints.clone(),
                default: default.as_ref().map(|d| (**d).clone()),
            },
            _ => unreachable!("type_var_info called on a non-TypeVar raw type"),
        }
    }

    fn is_param_spec(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::ParamSpec { .. })
    }

    fn param_spec_info(&self, t: &MockRaw) -> ParamSpecInfo<MockRaw> {
        match t {
            MockRaw::ParamSpec { name, default } => ParamSpecInfo {
                name: name.to_string(),
                default: default.as_ref().map(|d| (**d).clone()),
            },
            _ => unreachable!("param_spec_info called on a non-ParamSpec raw type"),
        }
    }

    fn is_type_var_tuple(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::TypeVarTuple { .. })
    }

    fn type_var_tuple_info(&self, t: &MockRaw) -> ParamSpecInfo<MockRaw> {
        match t {
            MockRaw::TypeVarTuple { name, default } => ParamSpecInfo {
                name: name.to_string(),
                default: default.as_ref().map(|d| (**d).clone()),
            },
            _ => unreachable!("type_var_tuple_info called on a non-TypeVarTuple raw type"),
        }
    }

    fn is_dataclass(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Struct(s) if matches!(s.kind.0, StructKind::Dataclass { .. }))
    }

    fn is_typed_dict(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Struct(s) if matches!(s.kind.0, StructKind::TypedDict { .. }))
    }

    fn is_named_tuple(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Struct(s) if matches!(s.kind.0, StructKind::NamedTuple))
    }

    fn is_enum(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Enum(_))
    }

    fn is_protocol(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Struct(s) if matches!(s.kind.0, StructKind::Protocol { .. }))
    }

    fn dataclass_is_frozen(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Struct(s) => matches!(s.kind.0, StructKind::Dataclass { frozen: true, .. }),
            _ => false,
        }
    }

    fn dataclass_has_slots(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Struct(s) => matches!(s.kind.0, StructKind::Dataclass { slots: true, .. }),
            _ => false,
        }
    }

    fn typed_dict_is_total(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Struct(s) => matches!(s.kind.0, StructKind::TypedDict { total: true }),
            _ => false,
        }
    }

    fn protocol_is_runtime_checkable(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Struct(s) => matches!(s.kind.0, StructKind::Protocol { runtime_checkable: true }),
            _ => false,
        }
    }

    fn enum_value_type(&self, t: &MockRaw) -> Option<MockRaw> {
        match t {
            MockRaw::Enum(e) => e.value_type.clone(),
            _ => None,
        }
    }

    fn enum_members(&self, t: &MockRaw) -> Vec<EnumMemberRaw> {
        match t {
            MockRaw::Enum(e) => e
                .members
                .iter()
                .map(|m| EnumMemberRaw {
                    name: m.name.to_string(),
                    value_repr: m.value_repr.map(str::to_string),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn fields(&self, t: &MockRaw) -> Vec<FieldRaw<MockRaw>> {
        match t {
            MockRaw::Struct(s) => s.fields.iter().map(field_raw_of).collect(),
            _ => Vec::new(),
        }
    }

    fn methods(&self, t: &MockRaw) -> Vec<FieldRaw<MockRaw>> {
        match t {
            MockRaw::Struct(s) => s.methods.iter().map(field_raw_of).collect(),
            _ => Vec::new(),
        }
    }

    fn owner_class(&self, t: &MockRaw, member_name: &str) -> Option<u64> {
        let s = match t {
            MockRaw::Struct(s) => s,
            _ => return None,
        };
        let declared = s.fields.iter().chain(s.methods.iter()).find(|f| f.name == member_name)?;
        match &declared.owner {
            Some(owner) => Some(self.identity(owner)),
            None => Some(self.identity(t)),
        }
    }

    fn is_function(&self, t: &MockRaw) -> bool {
        matches!(t, MockRaw::Function(_))
    }

    fn function_name(&self, t: &MockRaw) -> String {
        match t {
            MockRaw::Function(f) => f.name.to_string(),
            _ => unreachable!("function_name called on a non-Function raw type"),
        }
    }

    fn function_is_async(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Function(f) => f.is_async,
            _ => false,
        }
    }

    fn function_is_generator(&self, t: &MockRaw) -> bool {
        match t {
            MockRaw::Function(f) => f.is_generator,
            _ => false,
        }
    }

    fn function_decorators(&self, t: &MockRaw) -> Vec<String> {
        match t {
            MockRaw::Function(f) => f.decorators.iter().map(|d| d.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    fn function_parameters(
        &self,
        t: &MockRaw,
    ) -> Vec<(String, MockRaw, typing_graph_core::ParamKind, bool, Option<String>)> {
        match t {
            MockRaw::Function(f) => f
                .parameters
                .iter()
                .map(|p| {
                    (
                        p.name.to_string(),
                        p.ty.clone(),
                        p.kind,
                        p.has_default,
                        p.default_repr.map(str::to_string),
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn function_returns(&self, t: &MockRaw) -> MockRaw {
        match t {
            MockRaw::Function(f) => f.returns.clone().unwrap_or(MockRaw::NoneType),
            _ => unreachable!("function_returns called on a non-Function raw type"),
        }
    }

    fn function_type_params(&self, t: &MockRaw) -> Vec<MockRaw> {
        match t {
            MockRaw::Function(f) => f.type_params.clone(),
            _ => Vec::new(),
        }
    }

    fn type_params(&self, t: &MockRaw) -> Vec<MockRaw> {
        match t {
            MockRaw::Generic { type_params, .. } => type_params.clone(),
            _ => Vec::new(),
        }
    }

    fn module_globals(&self, module: &MockRaw) -> Namespace<MockRaw> {
        match module {
            MockRaw::Module(m) => {
                let pairs: Vec<(&'static str, MockRaw)> = m.globals.clone();
                namespace_of(&pairs)
            }
            _ => Namespace::new(),
        }
    }

    fn class_module_globals(&self, cls: &MockRaw) -> Namespace<MockRaw> {
        match cls {
            MockRaw::Struct(s) => namespace_of(&s.module_globals),
            _ => Namespace::new(),
        }
    }

    fn class_locals(&self, cls: &MockRaw) -> Namespace<MockRaw> {
        match cls {
            MockRaw::Struct(s) => namespace_of(&s.locals),
            _ => Namespace::new(),
        }
    }

    fn function_globals(&self, function: &MockRaw) -> Namespace<MockRaw> {
        match function {
            MockRaw::Function(f) => namespace_of(&f.globals),
            _ => Namespace::new(),
        }
    }

    fn function_closure(&self, function: &MockRaw) -> Namespace<MockRaw> {
        match function {
            MockRaw::Function(f) => namespace_of(&f.closure),
            _ => Namespace::new(),
        }
    }

    fn owning_class_of_method(&self, function: &MockRaw) -> Option<MockRaw> {
        match function {
            MockRaw::Function(f) => f.owning_class.clone(),
            _ => None,
        }
    }
}

fn field_raw_of(f: &crate::raw::FieldDef) -> FieldRaw<MockRaw> {
    FieldRaw {
        name: f.name.to_string(),
        raw_type: f.ty.clone(),
        has_default: f.has_default,
        default_repr: f.default_repr.map(str::to_string),
        metadata: boxed_metadata(&f.metadata),
        qualifiers: f.qualifiers.clone(),
    }
}
