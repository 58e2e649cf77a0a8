//! Per-call `Context`: configuration plus the bookkeeping a single
//! top-level inspection needs and nothing more. A `Context` never outlives
//! the call that created it.

use std::collections::HashSet;

use crate::config::Config;
use crate::reflect::NamespacePair;

/// Mutable state threaded through one recursive `inspect_*` call.
/// `in_progress` breaks reference cycles; `depth` is compared against
/// `Config::max_depth` before each recursive descent.
///
/// Two type parameters because `Id` (the cycle-detection key) and `R` (the
/// raw type values a namespace overlay binds names to) are unrelated:
/// `Id` is a small hashable stand-in, `R` is the adapter's actual
/// `RawType`.
pub struct Context<'a, Id, R> {
    pub config: &'a Config,
    pub namespace: Option<&'a NamespacePair<R>>,
    depth: usize,
    in_progress: HashSet<Id>,
    forward_ref_in_progress: HashSet<String>,
}

impl<'a, Id, R> Context<'a, Id, R>
where
    Id: Eq + std::hash::Hash,
{
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            namespace: None,
            depth: 0,
            in_progress: HashSet::new(),
            forward_ref_in_progress: HashSet::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: &'a NamespacePair<R>) -> Self {
        self.namespace = Some(namespace);
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth_reached(&self) -> bool {
        matches!(self.config.max_depth, Some(max) if self.depth >= max)
    }

    /// Enter one level of recursion for the duration of `f`, restoring depth
    /// on the way out regardless of how `f` returns.
    pub fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Record `id` as being built; returns `false` if it was already
    /// in-progress (the caller should break the cycle instead of
    /// recursing). Call `leave` with the same id once the build completes.
    pub fn enter(&mut self, id: Id) -> bool {
        self.in_progress.insert(id)
    }

    pub fn leave(&mut self, id: &Id) {
        self.in_progress.remove(id);
    }

    pub fn is_in_progress(&self, id: &Id) -> bool {
        self.in_progress.contains(id)
    }

    pub fn enter_forward_ref(&mut self, reference: &str) -> bool {
        self.forward_ref_in_progress.insert(reference.to_string())
    }

    pub fn leave_forward_ref(&mut self, reference: &str) {
        self.forward_ref_in_progress.remove(reference);
    }

    pub fn is_forward_ref_in_progress(&self, reference: &str) -> bool {
        self.forward_ref_in_progress.contains(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_reports_cycles() {
        let config = Config::default();
        let mut ctx: Context<'_, u32, ()> = Context::new(&config);
        assert!(ctx.enter(1));
        assert!(!ctx.enter(1));
        ctx.leave(&1);
        assert!(ctx.enter(1));
    }

    #[test]
    fn descend_restores_depth_on_panic_free_path() {
        let config = Config::default();
        let mut ctx: Context<'_, u32, ()> = Context::new(&config);
        assert_eq!(ctx.depth(), 0);
        ctx.descend(|inner| {
            assert_eq!(inner.depth(), 1);
        });
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn max_depth_reached_respects_config() {
        let config = Config::builder().max_depth(Some(1)).build();
        let mut ctx: Context<'_, u32, ()> = Context::new(&config);
        assert!(!ctx.max_depth_reached());
        ctx.descend(|inner| {
            assert!(inner.max_depth_reached());
        });
    }
}
