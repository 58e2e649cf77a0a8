//! The recursive builder: turns a raw type into a `Node`, consulting the
//! cache, breaking cycles, honoring `max_depth`, peeling qualifiers and
//! `Annotated` wrappers, and dispatching to one kind-specific sub-builder
//! per classifier shape.

use crate::cache::Cache;
use crate::classifier::{classify, Shape};
use crate::config::Config;
use crate::context::Context;
use crate::edge::{Edge, EdgeConnection, EdgeKind};
use crate::error::InspectionError;
use crate::forward_ref::build_forward_ref;
use crate::metadata::MetadataCollection;
use crate::node::{
    CallableParams, EnumMember, FieldDef, Node, NodeData, NodeKind, Parameter, RefState, Signature,
};
use crate::reflect::{CallableParamsRaw, FieldRaw, ReflectionAdapter, SpecialForm};

#[cfg(any(test, feature = "tracing"))]
use crate::{debug, trace};

/// Build (or fetch from cache) the node for `raw` under `ctx`. `cache` is
/// `None` exactly when the caller passed an explicit `source` to an entry
/// point, bypassing the cache entirely.
pub fn build<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    let identity = adapter.identity(raw);
    let fingerprint = ctx.config.fingerprint();

    if let Some(cache) = cache {
        if let Some(hit) = cache.get(&identity, fingerprint) {
            trace!("cache hit");
            return Ok(hit);
        }
    }

    if !ctx.enter(identity.clone()) {
        debug!("cycle detected, emitting unresolved forward ref");
        return Ok(cycle_break(adapter, raw));
    }

    if ctx.max_depth_reached() {
        ctx.leave(&identity);
        debug!("max depth reached, emitting truncation sentinel");
        return Ok(truncated());
    }

    let outcome = build_shape(adapter, cache, raw, ctx);
    ctx.leave(&identity);
    let node = outcome?;

    Ok(match cache {
        Some(cache) => cache.insert(identity, fingerprint, node),
        None => node,
    })
}

fn cycle_break<A: ReflectionAdapter>(adapter: &A, raw: &A::RawType) -> Node {
    Node::new(NodeData::leaf(NodeKind::ForwardRef {
        reference: adapter.type_name(raw),
        state: RefState::Unresolved,
    }))
}

fn truncated() -> Node {
    Node::new(NodeData::leaf(NodeKind::ForwardRef {
        reference: String::new(),
        state: RefState::Failed("max depth exceeded".to_string()),
    }))
}

fn build_child<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    ctx.descend(|ctx| build(adapter, cache, raw, ctx))
}

fn build_children<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raws: &[A::RawType],
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Vec<Node>, InspectionError> {
    raws.iter().map(|raw| build_child(adapter, cache, raw, ctx)).collect()
}

fn build_shape<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    let classified = classify(adapter, raw);
    let qualifiers: std::collections::BTreeSet<_> = classified.qualifiers.into_iter().collect();

    // Annotated hoisting reuses the base node's own kind instead of a
    // wrapper kind, so it can't go through the generic dispatch below.
    match classified.shape {
        Shape::Annotated { base, annotations } => {
            build_annotated(adapter, cache, &base, annotations, qualifiers, ctx)
        }
        shape => {
            let (kind, connections) = build_kind(adapter, cache, shape, ctx)?;
            let (children, edges) = crate::edge::split_edges(connections);
            let mut data = NodeData::new(kind, children, edges).with_qualifiers(qualifiers);
            if ctx.config.include_source_locations {
                data = data.with_source_location(adapter.source_location(raw));
            }
            Ok(Node::new(data))
        }
    }
}

fn build_annotated<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    base: &A::RawType,
    annotations: Vec<Box<dyn crate::metadata::Metadata>>,
    qualifiers: std::collections::BTreeSet<crate::qualifier::Qualifier>,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    let new_metadata = MetadataCollection::of(annotations, true);
    let base_node = build_child(adapter, cache, base, ctx)?;

    if ctx.config.hoist_metadata {
        let combined = base_node.metadata() + &new_metadata;
        let mut qualifiers = qualifiers;
        qualifiers.extend(base_node.qualifiers().iter().copied());
        let data = NodeData {
            kind: base_node.kind().clone(),
            source_location: base_node.source_location().cloned(),
            metadata: combined,
            qualifiers,
            children: base_node.children().to_vec(),
            edges: base_node.edges().to_vec(),
        };
        Ok(Node::new(data))
    } else {
        let data = NodeData::new(
            NodeKind::Annotated {
                base: base_node.clone(),
                annotations: new_metadata,
            },
            vec![base_node],
            vec![Edge::plain(EdgeKind::AnnotatedBase)],
        )
        .with_qualifiers(qualifiers);
        Ok(Node::new(data))
    }
}

type Built<A> = (NodeKind, Vec<EdgeConnection>);

fn build_kind<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    shape: Shape<A::RawType>,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    match shape {
        Shape::Special(form) => Ok((special_form_kind(form), Vec::new())),

        Shape::Annotated { .. } => unreachable!("handled by build_annotated"),

        Shape::ForwardRef { reference } => {
            let node = build_forward_ref(adapter, ctx, reference, |ctx, raw| {
                build_child(adapter, cache, raw, ctx)
            })?;
            // `build_forward_ref` already returns a complete node (it needs
            // to special-case the in-progress/stringified no-recursion
            // paths); unpack it back into (kind, connections) so the
            // uniform `with_qualifiers`/source-location tail in
            // `build_shape` still applies.
            let kind = node.kind().clone();
            let connections = node
                .children()
                .iter()
                .zip(node.edges().iter())
                .map(|(child, edge)| EdgeConnection {
                    edge: edge.clone(),
                    target: child.clone(),
                })
                .collect();
            Ok((kind, connections))
        }

        Shape::Union { members } => {
            let built = build_children(adapter, cache, &members, ctx)?;
            let flattened = if ctx.config.normalize_unions {
                flatten_unions(built)
            } else {
                built
            };
            let connections = flattened
                .iter()
                .cloned()
                .map(|m| EdgeConnection::plain(EdgeKind::UnionMember, m))
                .collect();
            Ok((NodeKind::Union { members: flattened }, connections))
        }

        Shape::GenericAlias {
            name,
            type_params,
            value,
        } => {
            let params = build_children(adapter, cache, &type_params, ctx)?;
            let value_node = build_child(adapter, cache, &value, ctx)?;
            let mut connections: Vec<EdgeConnection> = params
                .iter()
                .enumerate()
                .map(|(i, p)| EdgeConnection::positional(EdgeKind::TypeParam, i, p.clone()))
                .collect();
            connections.push(EdgeConnection::plain(EdgeKind::AliasTarget, value_node.clone()));
            Ok((
                NodeKind::GenericAlias {
                    name,
                    type_params: params,
                    value: value_node,
                },
                connections,
            ))
        }

        Shape::TypeAlias { name, value } => {
            let value_node = build_child(adapter, cache, &value, ctx)?;
            Ok((
                NodeKind::TypeAlias {
                    name,
                    value: value_node.clone(),
                },
                vec![EdgeConnection::plain(EdgeKind::AliasTarget, value_node)],
            ))
        }

        Shape::Tuple { elements, variadic } => {
            let to_build: &[A::RawType] = if variadic { &elements[..1] } else { &elements[..] };
            let built = build_children(adapter, cache, to_build, ctx)?;
            let connections = built
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, n)| EdgeConnection::positional(EdgeKind::Element, i, n))
                .collect();
            Ok((
                NodeKind::Tuple {
                    elements: built,
                    variadic,
                },
                connections,
            ))
        }

        Shape::Callable { params, returns } => {
            let returns_node = build_child(adapter, cache, &returns, ctx)?;
            let (params_kind, mut connections) = match params {
                CallableParamsRaw::Fixed(raws) => {
                    let built = build_children(adapter, cache, &raws, ctx)?;
                    let connections = built
                        .iter()
                        .cloned()
                        .enumerate()
                        .map(|(i, n)| EdgeConnection::positional(EdgeKind::Param, i, n))
                        .collect();
                    (CallableParams::Fixed(built), connections)
                }
                CallableParamsRaw::Ellipsis => (CallableParams::Ellipsis, Vec::new()),
                CallableParamsRaw::ParamSpec(raw) => {
                    let node = build_child(adapter, cache, &raw, ctx)?;
                    (
                        CallableParams::ParamSpec(node.clone()),
                        vec![EdgeConnection::plain(EdgeKind::ParamSpec, node)],
                    )
                }
            };
            connections.push(EdgeConnection::plain(EdgeKind::Return, returns_node.clone()));
            Ok((
                NodeKind::Callable {
                    params: params_kind,
                    returns: returns_node,
                },
                connections,
            ))
        }

        Shape::Meta { target } => {
            let node = build_child(adapter, cache, &target, ctx)?;
            Ok((
                NodeKind::Meta { target: node.clone() },
                vec![EdgeConnection::plain(EdgeKind::MetaOf, node)],
            ))
        }

        Shape::TypeGuard { target } => {
            let node = build_child(adapter, cache, &target, ctx)?;
            Ok((
                NodeKind::TypeGuard { target: node.clone() },
                vec![EdgeConnection::plain(EdgeKind::Narrows, node)],
            ))
        }

        Shape::TypeIs { target } => {
            let node = build_child(adapter, cache, &target, ctx)?;
            Ok((
                NodeKind::TypeIs { target: node.clone() },
                vec![EdgeConnection::plain(EdgeKind::Narrows, node)],
            ))
        }

        Shape::Literal { values } => Ok((NodeKind::Literal { values }, Vec::new())),

        Shape::Concatenate { prefix, param_spec } => {
            let prefix_nodes = build_children(adapter, cache, &prefix, ctx)?;
            let param_spec_node = build_child(adapter, cache, &param_spec, ctx)?;
            let mut connections: Vec<EdgeConnection> = prefix_nodes
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, n)| EdgeConnection::positional(EdgeKind::Prefix, i, n))
                .collect();
            connections.push(EdgeConnection::plain(EdgeKind::ParamSpec, param_spec_node.clone()));
            Ok((
                NodeKind::Concatenate {
                    prefix: prefix_nodes,
                    param_spec: param_spec_node,
                },
                connections,
            ))
        }

        Shape::Unpack { target } => {
            let node = build_child(adapter, cache, &target, ctx)?;
            Ok((
                NodeKind::Unpack { target: node.clone() },
                vec![EdgeConnection::plain(EdgeKind::Target, node)],
            ))
        }

        Shape::SubscriptedGeneric { origin, args } => {
            let origin_node = build_child(adapter, cache, &origin, ctx)?;
            let arg_nodes = build_children(adapter, cache, &args, ctx)?;
            let mut connections = vec![EdgeConnection::plain(EdgeKind::Origin, origin_node.clone())];
            connections.extend(
                arg_nodes
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, n)| EdgeConnection::positional(EdgeKind::TypeArg, i, n)),
            );
            Ok((
                NodeKind::SubscriptedGeneric {
                    origin: origin_node,
                    args: arg_nodes,
                },
                connections,
            ))
        }

        Shape::GenericType { class_ref, type_params } => {
            let params = build_children(adapter, cache, &type_params, ctx)?;
            let connections = params
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, n)| EdgeConnection::positional(EdgeKind::TypeParam, i, n))
                .collect();
            Ok((
                NodeKind::GenericType {
                    class_ref,
                    type_params: params,
                },
                connections,
            ))
        }

        Shape::TypeVar(info) => {
            let bound = info.bound.map(|b| build_child(adapter, cache, &b, ctx)).transpose()?;
            let constraints = build_children(adapter, cache, &info.constraints, ctx)?;
            let default = info.default.map(|d| build_child(adapter, cache, &d, ctx)).transpose()?;
            let mut connections = Vec::new();
            if let Some(n) = &bound {
                connections.push(EdgeConnection::plain(EdgeKind::Bound, n.clone()));
            }
            connections.extend(
                constraints
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, n)| EdgeConnection::positional(EdgeKind::Constraint, i, n)),
            );
            if let Some(n) = &default {
                connections.push(EdgeConnection::plain(EdgeKind::Default, n.clone()));
            }
            Ok((
                NodeKind::TypeVar {
                    name: info.name,
                    variance: info.variance,
                    infer_variance: info.infer_variance,
                    bound,
                    constraints,
                    default,
                },
                connections,
            ))
        }

        Shape::ParamSpec(info) => {
            let default = info.default.map(|d| build_child(adapter, cache, &d, ctx)).transpose()?;
            let connections = default
                .iter()
                .cloned()
                .map(|n| EdgeConnection::plain(EdgeKind::Default, n))
                .collect();
            Ok((
                NodeKind::ParamSpec {
                    name: info.name,
                    default,
                },
                connections,
            ))
        }

        Shape::TypeVarTuple(info) => {
            let default = info.default.map(|d| build_child(adapter, cache, &d, ctx)).transpose()?;
            let connections = default
                .iter()
                .cloned()
                .map(|n| EdgeConnection::plain(EdgeKind::Default, n))
                .collect();
            Ok((
                NodeKind::TypeVarTuple {
                    name: info.name,
                    default,
                },
                connections,
            ))
        }

        Shape::NewType { name, supertype } => {
            let node = build_child(adapter, cache, &supertype, ctx)?;
            Ok((
                NodeKind::NewType {
                    name,
                    supertype: node.clone(),
                },
                vec![EdgeConnection::plain(EdgeKind::Supertype, node)],
            ))
        }

        Shape::Dataclass(raw) => build_structured_dataclass(adapter, cache, &raw, ctx),
        Shape::TypedDict(raw) => build_structured_typed_dict(adapter, cache, &raw, ctx),
        Shape::NamedTuple(raw) => build_structured_named_tuple(adapter, cache, &raw, ctx),
        Shape::Protocol(raw) => build_structured_protocol(adapter, cache, &raw, ctx),
        Shape::Enum(raw) => build_structured_enum(adapter, cache, &raw, ctx),
        Shape::Class(raw) => build_structured_class(adapter, cache, &raw, ctx),

        Shape::Concrete { class_ref } => Ok((NodeKind::Concrete { class_ref }, Vec::new())),
    }
}

fn special_form_kind(form: SpecialForm) -> NodeKind {
    match form {
        SpecialForm::Any => NodeKind::Any,
        SpecialForm::Never => NodeKind::Never,
        SpecialForm::SelfType => NodeKind::SelfType,
        SpecialForm::LiteralString => NodeKind::LiteralString,
        SpecialForm::Ellipsis => NodeKind::Ellipsis,
    }
}

/// Flatten any member that is itself a `Union` into the outer list, when
/// `normalize_unions` is set. Duplicates are preserved; only nesting is
/// collapsed.
fn flatten_unions(members: Vec<Node>) -> Vec<Node> {
    let mut flat = Vec::with_capacity(members.len());
    for member in members {
        match member.kind() {
            NodeKind::Union { members: nested } => flat.extend(nested.iter().cloned()),
            _ => flat.push(member),
        }
    }
    flat
}

/// Build one field or method, applying `Config`'s member-inclusion flags.
/// Returns `None` when the member should be dropped.
fn build_member<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    owner_raw: &A::RawType,
    owner_identity: &A::Id,
    raw_field: FieldRaw<A::RawType>,
    config: &Config,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Option<FieldDef>, InspectionError> {
    if !config.include_private_members && raw_field.name.starts_with('_') {
        return Ok(None);
    }
    if !config.include_inherited_members {
        if let Some(owner) = adapter.owner_class(owner_raw, &raw_field.name) {
            if owner != *owner_identity {
                return Ok(None);
            }
        }
    }

    let ty = build_child(adapter, cache, &raw_field.raw_type, ctx)?;
    let is_class_var = ty.qualifiers().contains(&crate::qualifier::Qualifier::ClassVar);
    if is_class_var && !config.include_class_vars {
        return Ok(None);
    }
    if !is_class_var && !config.include_instance_vars {
        return Ok(None);
    }

    let metadata = MetadataCollection::of(raw_field.metadata, true);
    Ok(Some(FieldDef {
        name: raw_field.name,
        ty,
        has_default: raw_field.has_default,
        default_repr: raw_field.default_repr,
        metadata,
        qualifiers: raw_field.qualifiers.into_iter().collect(),
    }))
}

fn build_members<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    owner_raw: &A::RawType,
    owner_identity: &A::Id,
    raw_fields: Vec<FieldRaw<A::RawType>>,
    config: &Config,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Vec<FieldDef>, InspectionError> {
    let mut out = Vec::new();
    for raw_field in raw_fields {
        if let Some(field) = build_member(adapter, cache, owner_raw, owner_identity, raw_field, config, ctx)? {
            out.push(field);
        }
    }
    Ok(out)
}

fn field_connections(fields: &[FieldDef]) -> Vec<EdgeConnection> {
    fields
        .iter()
        .map(|f| EdgeConnection::named(EdgeKind::Field, f.name.clone(), f.ty.clone()))
        .collect()
}

fn method_connections(methods: &[FieldDef]) -> Vec<EdgeConnection> {
    methods
        .iter()
        .map(|f| EdgeConnection::named(EdgeKind::Method, f.name.clone(), f.ty.clone()))
        .collect()
}

fn build_structured_dataclass<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let identity = adapter.identity(raw);
    let config = ctx.config;
    let fields = build_members(adapter, cache, raw, &identity, adapter.fields(raw), config, ctx)?;
    let methods = if config.include_methods {
        build_members(adapter, cache, raw, &identity, adapter.methods(raw), config, ctx)?
    } else {
        Vec::new()
    };
    let mut connections = field_connections(&fields);
    connections.extend(method_connections(&methods));
    Ok((
        NodeKind::Dataclass {
            frozen: adapter.dataclass_is_frozen(raw),
            slots: adapter.dataclass_has_slots(raw),
            fields,
        },
        connections,
    ))
}

fn build_structured_typed_dict<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let identity = adapter.identity(raw);
    let config = ctx.config;
    let fields = build_members(adapter, cache, raw, &identity, adapter.fields(raw), config, ctx)?;
    let connections = field_connections(&fields);
    Ok((
        NodeKind::TypedDict {
            total: adapter.typed_dict_is_total(raw),
            fields,
        },
        connections,
    ))
}

fn build_structured_named_tuple<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let identity = adapter.identity(raw);
    let config = ctx.config;
    let fields = build_members(adapter, cache, raw, &identity, adapter.fields(raw), config, ctx)?;
    let connections = field_connections(&fields);
    Ok((NodeKind::NamedTuple { fields }, connections))
}

fn build_structured_protocol<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let identity = adapter.identity(raw);
    let config = ctx.config;
    let attributes = build_members(adapter, cache, raw, &identity, adapter.fields(raw), config, ctx)?;
    let methods = if config.include_methods {
        build_members(adapter, cache, raw, &identity, adapter.methods(raw), config, ctx)?
    } else {
        Vec::new()
    };
    let mut connections = field_connections(&attributes);
    connections.extend(method_connections(&methods));
    Ok((
        NodeKind::Protocol {
            runtime_checkable: adapter.protocol_is_runtime_checkable(raw),
            methods,
            attributes,
        },
        connections,
    ))
}

fn build_structured_enum<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let value_type = match adapter.enum_value_type(raw) {
        Some(raw_value_type) => Some(build_child(adapter, cache, &raw_value_type, ctx)?),
        None => None,
    };
    let members = adapter
        .enum_members(raw)
        .into_iter()
        .map(|m| EnumMember {
            name: m.name,
            value_repr: m.value_repr,
        })
        .collect();
    let connections = value_type
        .iter()
        .cloned()
        .map(|n| EdgeConnection::plain(EdgeKind::ValueType, n))
        .collect();
    Ok((NodeKind::Enum { members, value_type }, connections))
}

fn build_structured_class<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Built<A>, InspectionError> {
    let identity = adapter.identity(raw);
    let config = ctx.config;
    let fields = build_members(adapter, cache, raw, &identity, adapter.fields(raw), config, ctx)?;
    let methods = if config.include_methods {
        build_members(adapter, cache, raw, &identity, adapter.methods(raw), config, ctx)?
    } else {
        Vec::new()
    };
    let mut connections = field_connections(&fields);
    connections.extend(method_connections(&methods));
    Ok((NodeKind::Class { fields, methods }, connections))
}

/// Build a `Function` node directly. Unlike the shapes above this is an
/// entry point in its own right, not reached through `classify`, since
/// functions are inspected explicitly rather than discovered mid-recursion
/// through a type annotation.
pub fn build_function<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    let signature_node = build_signature_node(adapter, cache, raw, ctx)?;
    let signature = match signature_node.kind() {
        NodeKind::Signature(s) => s.clone(),
        _ => unreachable!("build_signature_node always returns a Signature-kind node"),
    };
    let data = NodeData::new(
        NodeKind::Function {
            name: adapter.function_name(raw),
            signature,
            is_async: adapter.function_is_async(raw),
            is_generator: adapter.function_is_generator(raw),
            decorators: adapter.function_decorators(raw),
        },
        vec![signature_node],
        vec![Edge::plain(EdgeKind::Signature)],
    );
    Ok(Node::new(data))
}

/// Build a bare `Signature` node. Shared by `build_function`, which wraps
/// the result behind a `Signature` edge.
pub fn build_signature_node<A: ReflectionAdapter>(
    adapter: &A,
    cache: Option<&Cache<A::Id>>,
    raw: &A::RawType,
    ctx: &mut Context<A::Id, A::RawType>,
) -> Result<Node, InspectionError> {
    let params_raw = adapter.function_parameters(raw);
    let mut parameters = Vec::with_capacity(params_raw.len());
    let mut connections = Vec::with_capacity(params_raw.len() + 1);
    for (i, (name, ty_raw, kind, has_default, default_repr)) in params_raw.into_iter().enumerate() {
        let ty = build_child(adapter, cache, &ty_raw, ctx)?;
        let is_named = matches!(
            kind,
            crate::node::ParamKind::PositionalOrKeyword | crate::node::ParamKind::KeywordOnly
        );
        connections.push(if is_named {
            EdgeConnection::named(EdgeKind::Param, name.clone(), ty.clone())
        } else {
            EdgeConnection::positional(EdgeKind::Param, i, ty.clone())
        });
        parameters.push(Parameter {
            name,
            ty,
            kind,
            has_default,
            default_repr,
            metadata: MetadataCollection::empty(),
        });
    }
    let returns = build_child(adapter, cache, &adapter.function_returns(raw), ctx)?;
    connections.push(EdgeConnection::plain(EdgeKind::Return, returns.clone()));
    let type_params = build_children(adapter, cache, &adapter.function_type_params(raw), ctx)?;
    connections.extend(
        type_params
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, n)| EdgeConnection::positional(EdgeKind::TypeParam, i, n)),
    );

    let signature = Signature {
        parameters,
        returns,
        type_params,
    };
    let (children, edges) = crate::edge::split_edges(connections);
    Ok(Node::new(NodeData::new(NodeKind::Signature(signature), children, edges)))
}
