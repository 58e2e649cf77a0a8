//! Forward-reference lifecycle: a state machine evaluated at most once per
//! reference string within one top-level inspection, driven by
//! `Config::eval_mode`.

use crate::config::EvalMode;
use crate::context::Context;
use crate::edge::{Edge, EdgeKind};
use crate::error::{ForwardRefError, InspectionError};
use crate::node::{Node, NodeData, NodeKind, RefState};
use crate::reflect::ReflectionAdapter;

/// What attempting to evaluate and build a reference's target produced.
/// `Cycle` is distinct from an evaluation failure: the adapter successfully
/// named a target, but that target is the same raw type currently being
/// built further up the call stack, so there is nothing new to attach.
enum Outcome {
    Resolved(Node),
    Cycle,
}

/// Resolve (or decline to resolve) `reference` and return the resulting
/// `ForwardRef` node. `build_child` recursively builds whatever raw type
/// the adapter's evaluator returns on success; it is only ever called once,
/// and only when evaluation is attempted at all.
///
/// `deferred`/`stringified` never return `Err`: failures recover locally
/// into `Failed`/`Unresolved` states, matching the builder's failure
/// semantics. Only `eager` propagates, including for a cyclic
/// self-reference.
pub fn build_forward_ref<A, F>(
    adapter: &A,
    ctx: &mut Context<A::Id, A::RawType>,
    reference: String,
    build_child: F,
) -> Result<Node, InspectionError>
where
    A: ReflectionAdapter,
    F: FnOnce(&mut Context<A::Id, A::RawType>, &A::RawType) -> Result<Node, InspectionError>,
{
    if ctx.is_forward_ref_in_progress(&reference) {
        return Ok(leaf(reference, RefState::Unresolved));
    }

    match ctx.config.eval_mode {
        EvalMode::Stringified => Ok(leaf(reference, RefState::Unresolved)),
        EvalMode::Eager => match attempt(adapter, ctx, &reference, build_child) {
            Ok(Outcome::Resolved(child)) => Ok(resolved(reference, child)),
            Ok(Outcome::Cycle) => Err(InspectionError::ForwardRef(ForwardRefError::new(
                reference,
                "reference cycles back to a type currently being built".to_string(),
            ))),
            Err(message) => Err(InspectionError::ForwardRef(ForwardRefError::new(reference, message))),
        },
        EvalMode::Deferred => match attempt(adapter, ctx, &reference, build_child) {
            Ok(Outcome::Resolved(child)) => Ok(resolved(reference, child)),
            Ok(Outcome::Cycle) => Ok(leaf(reference, RefState::Unresolved)),
            Err(message) => Ok(leaf(reference, RefState::Failed(message))),
        },
    }
}

fn attempt<A, F>(
    adapter: &A,
    ctx: &mut Context<A::Id, A::RawType>,
    reference: &str,
    build_child: F,
) -> Result<Outcome, String>
where
    A: ReflectionAdapter,
    F: FnOnce(&mut Context<A::Id, A::RawType>, &A::RawType) -> Result<Node, InspectionError>,
{
    ctx.enter_forward_ref(reference);
    let result = evaluate_and_build(adapter, ctx, reference, build_child);
    ctx.leave_forward_ref(reference);
    result
}

fn evaluate_and_build<A, F>(
    adapter: &A,
    ctx: &mut Context<A::Id, A::RawType>,
    reference: &str,
    build_child: F,
) -> Result<Outcome, String>
where
    A: ReflectionAdapter,
    F: FnOnce(&mut Context<A::Id, A::RawType>, &A::RawType) -> Result<Node, InspectionError>,
{
    let namespace = ctx
        .namespace
        .cloned()
        .unwrap_or_else(|| (crate::reflect::Namespace::new(), crate::reflect::Namespace::new()));
    let raw = adapter
        .evaluate_forward_ref(reference, &namespace, &[])
        .map_err(|e| e.message)?;
    if ctx.is_in_progress(&adapter.identity(&raw)) {
        return Ok(Outcome::Cycle);
    }
    build_child(ctx, &raw).map(Outcome::Resolved).map_err(|e| e.to_string())
}

fn leaf(reference: String, state: RefState) -> Node {
    Node::new(NodeData::leaf(NodeKind::ForwardRef { reference, state }))
}

fn resolved(reference: String, child: Node) -> Node {
    Node::new(NodeData::new(
        NodeKind::ForwardRef {
            reference,
            state: RefState::Resolved(child.clone()),
        },
        vec![child],
        vec![Edge::plain(EdgeKind::Resolved)],
    ))
}
