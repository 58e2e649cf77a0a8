//! End-to-end scenarios against `MockAdapter`, covering the literal I/O
//! examples documented for this engine plus a handful of config-flag and
//! qualifier cases exercised the same way.

use typing_graph_core::{
    is_concrete_node, is_optional_node, is_union_node, unwrap_optional, CallableParams, Config, Engine,
    EvalMode, Namespace, NodeKind, Qualifier, RefState,
};
use typing_graph_testhelpers::adapter::MockAdapter;
use typing_graph_testhelpers::raw::{CallableShape, FieldDef, MockRaw, StructDef, StructKind};
use typing_graph_testhelpers::metadata::Tag;

fn engine() -> Engine<MockAdapter> {
    Engine::new(MockAdapter)
}

fn list_of(arg: MockRaw) -> MockRaw {
    MockRaw::Subscripted {
        origin: MockRaw::Generic {
            name: "list",
            type_params: Vec::new(),
        }
        .boxed(),
        args: vec![arg],
    }
}

/// S1. `list[Optional[int]]` with a container-level `Annotated` "max-length"
/// constraint: root is `SubscriptedGeneric` over `list`, its single type
/// argument is a `Union` of `int`/`NoneType`, and only the root carries
/// metadata.
#[test]
fn s1_optional_container() {
    let raw = MockRaw::Annotated {
        base: list_of(MockRaw::Concrete("int").optional()).boxed(),
        metadata: vec![typing_graph_testhelpers::raw::MetaItem::MaxLen(3)],
    };

    let node = engine().inspect_type(&raw, None, None).unwrap();
    match node.kind() {
        NodeKind::SubscriptedGeneric { origin, args } => {
            assert!(matches!(origin.kind(), NodeKind::GenericType { class_ref, .. } if class_ref == "list"));
            assert_eq!(args.len(), 1);
            let union = &args[0];
            assert!(is_union_node(union));
            assert!(is_optional_node(union));
            let members = unwrap_optional(union).unwrap();
            assert_eq!(members.len(), 1);
            assert!(is_concrete_node(&members[0]));
            assert!(union.metadata().is_empty());
        }
        other => panic!("expected SubscriptedGeneric, got {other:?}"),
    }
    assert_eq!(node.metadata().len(), 1);
    assert!(node.metadata().has::<typing_graph_testhelpers::raw::MetaItem>());
}

/// S2. Nested `Annotated`: the outer wrapper's metadata hoists onto the
/// `list[...]` root, the inner wrapper's metadata hoists onto the `int`
/// leaf. Hoisting never merges the two.
#[test]
fn s2_nested_annotated() {
    use typing_graph_testhelpers::raw::MetaItem;

    let inner = MockRaw::Annotated {
        base: MockRaw::Concrete("int").boxed(),
        metadata: vec![MetaItem::Str("element-ge-0".to_string())],
    };
    let outer = MockRaw::Annotated {
        base: list_of(inner).boxed(),
        metadata: vec![MetaItem::Str("container-max-100".to_string())],
    };

    let node = engine().inspect_type(&outer, None, None).unwrap();
    match node.kind() {
        NodeKind::SubscriptedGeneric { args, .. } => {
            assert_eq!(node.metadata().find::<MetaItem>().unwrap(), &MetaItem::Str("container-max-100".to_string()));
            assert_eq!(args.len(), 1);
            assert!(is_concrete_node(&args[0]));
            assert_eq!(
                args[0].metadata().find::<MetaItem>().unwrap(),
                &MetaItem::Str("element-ge-0".to_string())
            );
        }
        other => panic!("expected SubscriptedGeneric, got {other:?}"),
    }
}

/// S3. A frozen, self-referential dataclass: `Tree { value: int, children:
/// list["Tree"] }`. The forward reference inside `children` either resolves
/// back to the same `Dataclass` shape or breaks the cycle with an
/// `Unresolved` state; either way `walk` terminates.
#[test]
fn s3_self_referential_dataclass() {
    let tree = StructDef::new("Tree", StructKind::Dataclass { frozen: true, slots: false })
        .with_field(FieldDef::new("value", MockRaw::Concrete("int")))
        .with_field(FieldDef::new(
            "children",
            list_of(MockRaw::ForwardRef("Tree".to_string())),
        ));
    let raw = tree.into_raw();

    let engine = engine();
    let node = engine.inspect_dataclass(&raw, None).unwrap();
    match node.kind() {
        NodeKind::Dataclass { frozen, fields, .. } => {
            assert!(*frozen);
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "value");
            assert!(is_concrete_node(&fields[0].ty));
            assert_eq!(fields[1].name, "children");
            match fields[1].ty.kind() {
                NodeKind::SubscriptedGeneric { args, .. } => {
                    assert!(matches!(args[0].kind(), NodeKind::ForwardRef { .. }));
                }
                other => panic!("expected SubscriptedGeneric for `children`, got {other:?}"),
            }
        }
        other => panic!("expected Dataclass, got {other:?}"),
    }

    // Default config is `deferred`; a self-reference may resolve (into
    // another Dataclass node wrapped by the ForwardRef) or stay Unresolved
    // if the recursive build collides with the cycle guard. Either way
    // walking the whole graph must terminate and visit at least one
    // ForwardRef node.
    let walked: Vec<_> = engine.walk(node, None, |_| true).unwrap().collect();
    assert!(walked
        .iter()
        .any(|n| matches!(n.kind(), NodeKind::ForwardRef { state, .. } if !matches!(state, RefState::Failed(_)))));
}

/// S4. `int | str | None` classifies as `Union`, is detected as optional,
/// and unwraps to its two non-`None` members.
#[test]
fn s4_union_dispatch() {
    let raw = MockRaw::Union(vec![
        MockRaw::Concrete("int"),
        MockRaw::Concrete("str"),
        MockRaw::NoneType,
    ]);
    let node = engine().inspect_type(&raw, None, None).unwrap();
    assert!(is_union_node(&node));
    assert!(is_optional_node(&node));
    let members = unwrap_optional(&node).unwrap();
    assert_eq!(members.len(), 2);
    assert!(is_concrete_node(&members[0]));
    assert!(is_concrete_node(&members[1]));
}

/// S5. `Callable[[int, str], bool]`: fixed two-parameter signature and a
/// `bool` return.
#[test]
fn s5_callable_signature() {
    let raw = MockRaw::Callable {
        params: CallableShape::Fixed(vec![MockRaw::Concrete("int"), MockRaw::Concrete("str")]),
        returns: MockRaw::Concrete("bool").boxed(),
    };
    let node = engine().inspect_type(&raw, None, None).unwrap();
    match node.kind() {
        NodeKind::Callable { params, returns } => {
            match params {
                CallableParams::Fixed(ps) => {
                    assert_eq!(ps.len(), 2);
                    assert!(is_concrete_node(&ps[0]));
                    assert!(is_concrete_node(&ps[1]));
                }
                other => panic!("expected fixed params, got {other:?}"),
            }
            assert!(is_concrete_node(returns));
        }
        other => panic!("expected Callable, got {other:?}"),
    }
}

/// S6. `MetadataCollection::of([Gt(0), Le(150), "age in years"])` queries:
/// find/find_all/has/exclude/sorted (exercised through a field's metadata
/// collection rather than a bare `MetadataCollection`, since `Annotated`
/// parts go through the adapter).
#[test]
fn s6_metadata_collection_query() {
    use typing_graph_testhelpers::raw::MetaItem;

    let raw = MockRaw::Annotated {
        base: MockRaw::Concrete("int").boxed(),
        metadata: vec![
            MetaItem::Gt(0),
            MetaItem::Le(150),
            MetaItem::Str("age in years".to_string()),
        ],
    };
    let node = engine().inspect_type(&raw, None, None).unwrap();
    let meta = node.metadata();

    assert_eq!(meta.find::<MetaItem>(), Some(&MetaItem::Gt(0)));
    assert_eq!(
        meta.find_all_of(&typing_graph_core::type_ids![MetaItem]).len(),
        3
    );
    assert!(meta.has::<MetaItem>());
    assert_eq!(meta.exclude(&typing_graph_core::type_ids![MetaItem]).len(), 0);
    let sorted = meta.sorted();
    assert_eq!(sorted.sorted().len(), sorted.len());
}

/// `hoist_metadata=true` (the default) yields a node of the *same kind* as
/// the base with the metadata folded on; turning it off preserves an
/// explicit `Annotated` wrapper instead, and the two shapes are never mixed
/// within one call.
#[test]
fn hoisting_toggle_picks_one_shape() {
    use typing_graph_testhelpers::raw::MetaItem;

    let raw = MockRaw::Annotated {
        base: MockRaw::Concrete("int").boxed(),
        metadata: vec![MetaItem::Str("m".to_string())],
    };

    let hoisted = engine().inspect_type(&raw, None, None).unwrap();
    assert!(is_concrete_node(&hoisted));
    assert_eq!(hoisted.metadata().len(), 1);

    let config = Config::builder().hoist_metadata(false).build();
    let wrapped = engine().inspect_type(&raw, Some(&config), None).unwrap();
    match wrapped.kind() {
        NodeKind::Annotated { base, annotations } => {
            assert!(is_concrete_node(base));
            assert_eq!(annotations.len(), 1);
            assert!(base.metadata().is_empty());
        }
        other => panic!("expected Annotated wrapper, got {other:?}"),
    }
}

/// `Final[int]` yields the same node kind as plain `int`, with
/// `qualifiers == {final}`.
#[test]
fn final_qualifier_does_not_change_kind() {
    let raw = MockRaw::Qualified {
        qualifier: Qualifier::Final,
        inner: MockRaw::Concrete("int").boxed(),
    };
    let node = engine().inspect_type(&raw, None, None).unwrap();
    assert!(is_concrete_node(&node));
    assert_eq!(node.qualifiers().len(), 1);
    assert!(node.qualifiers().contains(&Qualifier::Final));
}

/// A cyclic self-reference is `Unresolved` in `deferred` mode, fails with
/// `ForwardRefError` in `eager` mode, and is unconditionally `Unresolved` in
/// `stringified` mode.
#[test]
fn forward_ref_eval_modes() {
    let cyclic = StructDef::new("Node", StructKind::Class)
        .with_field(FieldDef::new("next", MockRaw::ForwardRef("Node".to_string())));
    let raw = cyclic.into_raw();

    let deferred = engine().inspect_class(&raw, None).unwrap();
    let next_field_state = |node: &typing_graph_core::Node| match node.kind() {
        NodeKind::Class { fields, .. } => fields[0].ty.clone(),
        _ => panic!("expected Class"),
    };
    match next_field_state(&deferred).kind() {
        NodeKind::ForwardRef { state, .. } => assert!(matches!(state, RefState::Unresolved)),
        other => panic!("expected ForwardRef, got {other:?}"),
    }

    let eager = Config::builder().eval_mode(EvalMode::Eager).build();
    let result = engine().inspect_class(&raw, Some(&eager));
    assert!(result.is_err());

    let stringified = Config::builder().eval_mode(EvalMode::Stringified).build();
    let never_evaluated = engine().inspect_class(&raw, Some(&stringified)).unwrap();
    match next_field_state(&never_evaluated).kind() {
        NodeKind::ForwardRef { state, .. } => assert!(matches!(state, RefState::Unresolved)),
        other => panic!("expected ForwardRef, got {other:?}"),
    }
}

/// A `globalns`/`localns` overlay is only reachable through the
/// `_with_namespace` sibling of an entry point, never through the plain one:
/// a reference to a name the class doesn't itself auto-extract fails under
/// `inspect_class`, then resolves once the same call goes through
/// `inspect_class_with_namespace` with that name bound in the overlay.
#[test]
fn class_namespace_overlay_resolves_forward_ref_unreachable_via_inspect_class() {
    let cls = StructDef::new("Widget", StructKind::Class)
        .with_field(FieldDef::new("sibling", MockRaw::ForwardRef("Other".to_string())));
    let raw = cls.into_raw();

    let field_ty = |node: &typing_graph_core::Node| match node.kind() {
        NodeKind::Class { fields, .. } => fields[0].ty.clone(),
        other => panic!("expected Class, got {other:?}"),
    };

    let without_overlay = engine().inspect_class(&raw, None).unwrap();
    match field_ty(&without_overlay).kind() {
        NodeKind::ForwardRef { state, .. } => assert!(matches!(state, RefState::Failed(_))),
        other => panic!("expected ForwardRef, got {other:?}"),
    }

    let mut globalns = Namespace::new();
    globalns.insert("Other", MockRaw::Concrete("str"));
    let overlay = (globalns, Namespace::new());
    let with_overlay = engine()
        .inspect_class_with_namespace(&raw, None, Some(&overlay))
        .unwrap();
    match field_ty(&with_overlay).kind() {
        NodeKind::ForwardRef { state, .. } => match state {
            RefState::Resolved(child) => assert!(is_concrete_node(&child)),
            other => panic!("expected Resolved, got {other:?}"),
        },
        other => panic!("expected ForwardRef, got {other:?}"),
    }
}

/// `include_private_members`/`include_methods` gate which fields a
/// structured node reports.
#[test]
fn structured_member_inclusion_flags() {
    let cls = StructDef::new("Widget", StructKind::Class)
        .with_field(FieldDef::new("name", MockRaw::Concrete("str")))
        .with_field(FieldDef::new("_hidden", MockRaw::Concrete("int")))
        .with_method(FieldDef::new("render", MockRaw::Concrete("str")));
    let raw = cls.into_raw();

    let default = engine().inspect_class(&raw, None).unwrap();
    match default.kind() {
        NodeKind::Class { fields, methods } => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].name, "name");
            assert_eq!(methods.len(), 1);
        }
        other => panic!("expected Class, got {other:?}"),
    }

    let config = Config::builder()
        .include_private_members(true)
        .include_methods(false)
        .build();
    let with_private = engine().inspect_class(&raw, Some(&config)).unwrap();
    match with_private.kind() {
        NodeKind::Class { fields, methods } => {
            assert_eq!(fields.len(), 2);
            assert!(methods.is_empty());
        }
        other => panic!("expected Class, got {other:?}"),
    }
}

/// `find_protocol` against a `RuntimeCheckableProtocol` marker, exercised
/// through a field's hoisted metadata.
#[test]
fn metadata_protocol_matching() {
    let raw = MockRaw::Annotated {
        base: MockRaw::Concrete("str").boxed(),
        metadata: Vec::new(),
    };
    let node = engine().inspect_type(&raw, None, None).unwrap();
    assert!(node.metadata().is_empty());

    let tagged = typing_graph_core::MetadataCollection::new(vec![Box::new(Tag("alice".to_string())) as _]);
    assert!(tagged
        .has_protocol::<typing_graph_testhelpers::metadata::Named>()
        .unwrap());
    assert!(tagged
        .find_protocol::<typing_graph_testhelpers::metadata::NotCheckable>()
        .is_err());
}
