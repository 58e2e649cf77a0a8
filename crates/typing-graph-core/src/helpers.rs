//! Type-narrowing guards over a built `Node`: one `is_<kind>_node`
//! predicate per node kind, plus the union/optional conveniences every
//! consumer ends up reaching for.

use crate::metadata::MetadataCollection;
use crate::node::{Node, NodeKind};

macro_rules! is_kind {
    ($fn_name:ident, $variant:pat) => {
        pub fn $fn_name(node: &Node) -> bool {
            matches!(node.kind(), $variant)
        }
    };
}

is_kind!(is_concrete_node, NodeKind::Concrete { .. });
is_kind!(is_generic_type_node, NodeKind::GenericType { .. });
is_kind!(is_subscripted_generic_node, NodeKind::SubscriptedGeneric { .. });
is_kind!(is_generic_alias_node, NodeKind::GenericAlias { .. });
is_kind!(is_type_alias_node, NodeKind::TypeAlias { .. });
is_kind!(is_annotated_node, NodeKind::Annotated { .. });
is_kind!(is_new_type_node, NodeKind::NewType { .. });
is_kind!(is_union_node, NodeKind::Union { .. });
is_kind!(is_intersection_node, NodeKind::Intersection { .. });
is_kind!(is_tuple_node, NodeKind::Tuple { .. });
is_kind!(is_callable_node, NodeKind::Callable { .. });
is_kind!(is_any_node, NodeKind::Any);
is_kind!(is_never_node, NodeKind::Never);
is_kind!(is_self_type_node, NodeKind::SelfType);
is_kind!(is_literal_string_node, NodeKind::LiteralString);
is_kind!(is_ellipsis_node, NodeKind::Ellipsis);
is_kind!(is_literal_node, NodeKind::Literal { .. });
is_kind!(is_meta_node, NodeKind::Meta { .. });
is_kind!(is_type_guard_node, NodeKind::TypeGuard { .. });
is_kind!(is_type_is_node, NodeKind::TypeIs { .. });
is_kind!(is_type_var_node, NodeKind::TypeVar { .. });
is_kind!(is_param_spec_node, NodeKind::ParamSpec { .. });
is_kind!(is_type_var_tuple_node, NodeKind::TypeVarTuple { .. });
is_kind!(is_concatenate_node, NodeKind::Concatenate { .. });
is_kind!(is_unpack_node, NodeKind::Unpack { .. });
is_kind!(is_forward_ref_node, NodeKind::ForwardRef { .. });
is_kind!(is_class_node, NodeKind::Class { .. });
is_kind!(is_dataclass_node, NodeKind::Dataclass { .. });
is_kind!(is_typed_dict_node, NodeKind::TypedDict { .. });
is_kind!(is_named_tuple_node, NodeKind::NamedTuple { .. });
is_kind!(is_protocol_node, NodeKind::Protocol { .. });
is_kind!(is_enum_node, NodeKind::Enum { .. });
is_kind!(is_function_node, NodeKind::Function { .. });
is_kind!(is_signature_node, NodeKind::Signature(..));

/// Any union with at least one `None` member: the common case every
/// consumer of `Optional[T]` actually wants, since the source language has
/// no distinct "Optional" node kind (it classifies to `Union`). Not
/// restricted to two-member unions: `int | str | None` is optional too.
pub fn is_optional_node(node: &Node) -> bool {
    match node.kind() {
        NodeKind::Union { members } => members.iter().any(is_none_type),
        _ => false,
    }
}

pub fn get_union_members(node: &Node) -> Option<&[Node]> {
    match node.kind() {
        NodeKind::Union { members } => Some(members),
        _ => None,
    }
}

/// The non-`None` members of an optional union. A plain `Vec`, since these
/// are `Node`s rather than opaque metadata items.
pub fn unwrap_optional(node: &Node) -> Option<Vec<Node>> {
    match node.kind() {
        NodeKind::Union { members } if is_optional_node(node) => {
            Some(members.iter().filter(|m| !is_none_type(m)).cloned().collect())
        }
        _ => None,
    }
}

fn is_none_type(node: &Node) -> bool {
    matches!(node.kind(), NodeKind::Concrete { class_ref } if class_ref == "NoneType")
}

/// Convenience for callers that want an empty collection without reaching
/// into `MetadataCollection` directly.
pub fn empty_metadata() -> MetadataCollection {
    MetadataCollection::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;

    fn concrete(name: &str) -> Node {
        Node::new(NodeData::leaf(NodeKind::Concrete {
            class_ref: name.to_string(),
        }))
    }

    #[test]
    fn optional_detection_and_unwrap() {
        let members = vec![concrete("int"), concrete("NoneType")];
        let union = Node::new(NodeData::leaf(NodeKind::Union { members }));
        assert!(is_optional_node(&union));
        let unwrapped = unwrap_optional(&union).unwrap();
        assert_eq!(unwrapped.len(), 1);
        assert!(is_concrete_node(&unwrapped[0]));
    }

    #[test]
    fn three_member_union_with_none_is_optional() {
        let members = vec![concrete("int"), concrete("str"), concrete("NoneType")];
        let union = Node::new(NodeData::leaf(NodeKind::Union { members }));
        assert!(is_optional_node(&union));
        let unwrapped = unwrap_optional(&union).unwrap();
        assert_eq!(unwrapped.len(), 2);
    }

    #[test]
    fn union_without_none_is_not_optional() {
        let members = vec![concrete("int"), concrete("str")];
        let union = Node::new(NodeData::leaf(NodeKind::Union { members }));
        assert!(!is_optional_node(&union));
        assert!(unwrap_optional(&union).is_none());
    }

    #[test]
    fn signature_node_is_narrowed_correctly() {
        use crate::node::Signature;

        let signature = Node::new(NodeData::leaf(NodeKind::Signature(Signature {
            parameters: Vec::new(),
            returns: concrete("None"),
            type_params: Vec::new(),
        })));
        assert!(is_signature_node(&signature));
        assert!(!is_function_node(&signature));
        assert!(!is_signature_node(&concrete("int")));
    }
}
