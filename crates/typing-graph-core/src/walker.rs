//! The walker: a depth-first, pre-order, iterative traversal over a node
//! graph. A true `Iterator`, not a callback-driven visitor, so ordinary
//! `for` loops and adapter methods (`.take_while`, `.filter`, …) work as
//! expected. The consumer can stop at any time and no internal state
//! outlives the iterator.

use std::collections::HashSet;

use crate::error::TraversalError;
use crate::node::Node;

/// One stack frame: a node queued for emission, at a known depth from root.
struct Frame {
    node: Node,
    depth: usize,
}

/// Depth-first pre-order iterator over a `Node` graph. Each unique node
/// (by identity) is yielded at most once; a node whose depth exceeds
/// `max_depth` is never pushed. `predicate`, when present, filters output
/// only: a non-matching node's children are still traversed.
pub struct Walker<P> {
    stack: Vec<Frame>,
    visited: HashSet<usize>,
    max_depth: Option<usize>,
    predicate: P,
}

impl Walker<fn(&Node) -> bool> {
    pub fn new(root: Node) -> Self {
        Self::with_predicate(root, None, |_| true)
    }
}

impl<P> Walker<P>
where
    P: FnMut(&Node) -> bool,
{
    pub fn with_predicate(root: Node, max_depth: Option<isize>, predicate: P) -> Self {
        let max_depth = max_depth.map(|d| d.max(0) as usize);
        Self {
            stack: vec![Frame { node: root, depth: 0 }],
            visited: HashSet::new(),
            max_depth,
            predicate,
        }
    }

    /// Validates `max_depth` up front: a negative value fails with
    /// `TraversalError` before the iterator is built.
    pub fn try_new(root: Node, max_depth: Option<isize>, predicate: P) -> Result<Self, TraversalError> {
        if matches!(max_depth, Some(d) if d < 0) {
            return Err(TraversalError::NegativeMaxDepth);
        }
        Ok(Self::with_predicate(root, max_depth, predicate))
    }

    fn push_children(&mut self, node: &Node, depth: usize) {
        let next_depth = depth + 1;
        if matches!(self.max_depth, Some(max) if next_depth > max) {
            return;
        }
        // Push in reverse so children pop in `edges` order.
        for child in node.children().iter().rev() {
            self.stack.push(Frame {
                node: child.clone(),
                depth: next_depth,
            });
        }
    }
}

impl<P> Iterator for Walker<P>
where
    P: FnMut(&Node) -> bool,
{
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        loop {
            let Frame { node, depth } = self.stack.pop()?;
            if !self.visited.insert(node.cache_key()) {
                continue;
            }
            self.push_children(&node, depth);
            if (self.predicate)(&node) {
                return Some(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, EdgeKind};
    use crate::node::{NodeData, NodeKind};

    fn leaf(name: &str) -> Node {
        Node::new(NodeData::leaf(NodeKind::Concrete {
            class_ref: name.to_string(),
        }))
    }

    fn union(members: Vec<Node>) -> Node {
        let edges: Vec<Edge> = members.iter().map(|_| Edge::plain(EdgeKind::UnionMember)).collect();
        Node::new(NodeData::new(NodeKind::Union { members: members.clone() }, members, edges))
    }

    #[test]
    fn visits_every_node_once_pre_order() {
        let root = union(vec![leaf("int"), leaf("str")]);
        let seen: Vec<_> = Walker::new(root.clone()).collect();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].ptr_eq(&root));
    }

    #[test]
    fn shared_child_only_yielded_once() {
        let shared = leaf("int");
        let root = union(vec![shared.clone(), shared.clone()]);
        let seen: Vec<_> = Walker::new(root).collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn negative_max_depth_is_rejected() {
        let root = leaf("int");
        let result = Walker::try_new(root, Some(-1), |_| true);
        assert!(matches!(result, Err(TraversalError::NegativeMaxDepth)));
    }

    #[test]
    fn max_depth_zero_yields_only_root() {
        let root = union(vec![leaf("int"), leaf("str")]);
        let seen: Vec<_> = Walker::try_new(root, Some(0), |_| true).unwrap().collect();
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn predicate_filters_output_not_traversal() {
        let root = union(vec![leaf("int"), leaf("str")]);
        let seen: Vec<_> = Walker::with_predicate(root, None, |n| {
            matches!(n.kind(), NodeKind::Concrete { .. })
        })
        .collect();
        assert_eq!(seen.len(), 2);
    }
}
