//! Property tests for the quantified invariants documented for
//! `MetadataCollection` and for graphs produced by the builder/walker pair.
//! Generators are kept small and shallow on purpose: these laws hold at
//! every size, so there is nothing to gain from deep or wide trees beyond
//! longer runs.

use proptest::prelude::*;
use typing_graph_core::{Config, Engine, MetadataCollection};
use typing_graph_testhelpers::adapter::MockAdapter;
use typing_graph_testhelpers::metadata::Tag;
use typing_graph_testhelpers::raw::{MetaItem, MockRaw};

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

fn arb_tag() -> impl Strategy<Value = Tag> {
    prop::string::string_regex("[a-z]{0,6}").unwrap().prop_map(Tag)
}

fn arb_collection() -> impl Strategy<Value = MetadataCollection> {
    prop::collection::vec(arb_tag(), 0..8)
        .prop_map(|tags| MetadataCollection::new(tags.into_iter().map(|t| Box::new(t) as _)))
}

fn arb_meta_item() -> impl Strategy<Value = MetaItem> {
    prop_oneof![
        any::<i64>().prop_map(MetaItem::Int),
        any::<i64>().prop_map(MetaItem::Gt),
        "[a-z]{0,6}".prop_map(MetaItem::Str),
    ]
}

fn as_metadata(items: &[MetaItem]) -> MetadataCollection {
    MetadataCollection::new(items.iter().cloned().map(|m| Box::new(m) as _))
}

/// A bounded tree of `list[...]`/`int | str | bool` shapes, shallow enough
/// that every generated case finishes quickly but still nests at least a
/// couple of levels some of the time.
fn arb_raw() -> impl Strategy<Value = MockRaw> {
    let leaf = prop_oneof![
        Just(MockRaw::Concrete("int")),
        Just(MockRaw::Concrete("str")),
        Just(MockRaw::Concrete("bool")),
        Just(MockRaw::NoneType),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(list_of),
            prop::collection::vec(inner, 2..4).prop_map(MockRaw::Union),
        ]
    })
}

proptest! {
    /// Concatenating with an empty collection on either side is a no-op.
    #[test]
    fn concat_with_empty_is_identity(c in arb_collection()) {
        prop_assert_eq!(MetadataCollection::empty().concat(&c), c.clone());
        prop_assert_eq!(c.concat(&MetadataCollection::empty()), c);
    }

    /// Concatenation is length-additive.
    #[test]
    fn concat_length_is_additive(a in arb_collection(), b in arb_collection()) {
        prop_assert_eq!(a.concat(&b).len(), a.len() + b.len());
    }

    /// First-occurrence de-duplication never grows the collection.
    #[test]
    fn unique_never_grows(c in arb_collection()) {
        prop_assert!(c.unique().len() <= c.len());
    }

    /// Sorting twice is the same as sorting once (stable-sort fixpoint).
    #[test]
    fn sorted_is_a_fixpoint(c in arb_collection()) {
        let once = c.sorted();
        let twice = once.sorted();
        prop_assert_eq!(once, twice);
    }

    /// Reversing twice returns to the original order.
    #[test]
    fn double_reverse_is_identity(c in arb_collection()) {
        prop_assert_eq!(c.reversed().reversed(), c);
    }

    /// Excluding a type that was never present is a no-op.
    #[test]
    fn exclude_of_absent_type_is_identity(c in arb_collection()) {
        let other_type_ids = typing_graph_core::type_ids![typing_graph_testhelpers::metadata::MetaGroup];
        prop_assert_eq!(c.exclude(&other_type_ids), c);
    }

    /// Every node in a built graph reports exactly as many children as
    /// edges, no matter the shape.
    #[test]
    fn children_and_edges_stay_equal_length(raw in arb_raw()) {
        let node = engine().inspect_type(&raw, None, None).unwrap();
        let walked: Vec<_> = engine().walk(node, None, |_| true).unwrap().collect();
        for n in &walked {
            prop_assert_eq!(n.children().len(), n.edges().len());
        }
    }

    /// `max_depth == 0` always yields exactly the root, regardless of shape.
    #[test]
    fn zero_max_depth_yields_only_the_root(raw in arb_raw()) {
        let node = engine().inspect_type(&raw, None, None).unwrap();
        let walked: Vec<_> = engine().walk(node.clone(), Some(0), |_| true).unwrap().collect();
        prop_assert_eq!(walked.len(), 1);
        prop_assert!(walked[0].ptr_eq(&node));
    }

    /// The walker never yields the same node identity twice over a tree with
    /// no intentional sharing.
    #[test]
    fn walker_does_not_repeat_identities(raw in arb_raw()) {
        let node = engine().inspect_type(&raw, None, None).unwrap();
        let walked: Vec<_> = engine().walk(node, None, |_| true).unwrap().collect();
        let mut seen = std::collections::HashSet::new();
        for n in &walked {
            prop_assert!(seen.insert(n.cache_key()));
        }
    }

    /// Re-inspecting the same raw value under the default config hits the
    /// cache and returns the identical node instance.
    #[test]
    fn repeated_inspection_is_cached(raw in arb_raw()) {
        let engine = engine();
        let first = engine.inspect_type(&raw, None, None).unwrap();
        let second = engine.inspect_type(&raw, None, None).unwrap();
        prop_assert!(first.ptr_eq(&second));
    }

    /// A stricter config fingerprint is a distinct cache entry from the
    /// default: same raw value, different node instance.
    #[test]
    fn distinct_config_is_a_distinct_cache_entry(raw in arb_raw()) {
        let engine = engine();
        let default = engine.inspect_type(&raw, None, None).unwrap();
        let stricter = Config::builder().max_depth(Some(64)).build();
        let other = engine.inspect_type(&raw, Some(&stricter), None).unwrap();
        prop_assert!(!default.ptr_eq(&other));
    }

    /// `from_annotated` on a single `Annotated[T, ...]` layer collects
    /// exactly that layer's metadata, in order, regardless of `recursive`.
    #[test]
    fn from_annotated_collects_one_layer(base in arb_meta_item(), rest in prop::collection::vec(arb_meta_item(), 0..4)) {
        let mut items = vec![base];
        items.extend(rest);
        let raw = MockRaw::Annotated {
            base: MockRaw::Concrete("int").boxed(),
            metadata: items.clone(),
        };
        let expected = as_metadata(&items);
        prop_assert_eq!(MetadataCollection::from_annotated(&MockAdapter, &raw, false), expected.clone());
        prop_assert_eq!(MetadataCollection::from_annotated(&MockAdapter, &raw, true), expected);
    }

    /// `recursive=true` appends an inner wrapper's metadata after the outer
    /// layer's; `recursive=false` stops at the outer layer.
    #[test]
    fn from_annotated_recursive_flattens_nested_layers(outer in prop::collection::vec(arb_meta_item(), 1..4), inner in prop::collection::vec(arb_meta_item(), 1..4)) {
        let raw = MockRaw::Annotated {
            base: MockRaw::Annotated {
                base: MockRaw::Concrete("int").boxed(),
                metadata: inner.clone(),
            }
            .boxed(),
            metadata: outer.clone(),
        };

        let shallow = MetadataCollection::from_annotated(&MockAdapter, &raw, false);
        prop_assert_eq!(shallow, as_metadata(&outer));

        let mut combined = outer;
        combined.extend(inner);
        let deep = MetadataCollection::from_annotated(&MockAdapter, &raw, true);
        prop_assert_eq!(deep, as_metadata(&combined));
    }
}
