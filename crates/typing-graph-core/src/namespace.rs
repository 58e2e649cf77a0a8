//! Namespace extraction: pure functions from a class, function, or module
//! to the `(globals, locals)` pair forward-reference evaluation needs.
//! `auto_namespace` gates whether these run automatically for entry points
//! that accept a source object; a caller-supplied overlay always wins on
//! conflict.

use crate::reflect::{Namespace, NamespacePair, ReflectionAdapter};

pub fn extract_class_namespace<A: ReflectionAdapter>(adapter: &A, cls: &A::RawType) -> NamespacePair<A::RawType> {
    let globals = adapter.class_module_globals(cls);
    let mut locals = adapter.class_locals(cls);
    locals.insert(adapter.type_name(cls), cls.clone());
    (globals, locals)
}

pub fn extract_function_namespace<A: ReflectionAdapter>(adapter: &A, function: &A::RawType) -> NamespacePair<A::RawType> {
    let mut globals = adapter.function_globals(function);
    let closure = adapter.function_closure(function);
    let additions: Vec<(String, A::RawType)> = closure
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    for (name, value) in additions {
        globals.insert(name, value);
    }
    let locals = match adapter.owning_class_of_method(function) {
        Some(owner) => adapter.class_locals(&owner),
        None => Namespace::new(),
    };
    (globals, locals)
}

pub fn extract_module_namespace<A: ReflectionAdapter>(adapter: &A, module: &A::RawType) -> NamespacePair<A::RawType> {
    (adapter.module_globals(module), Namespace::new())
}

/// Overlay a user-supplied `(globalns, localns)` pair on top of
/// auto-extracted bindings; the user's bindings win on conflict.
pub fn apply_overlay<R: Clone>(
    auto: NamespacePair<R>,
    overlay: Option<&NamespacePair<R>>,
) -> NamespacePair<R> {
    match overlay {
        None => auto,
        Some((globalns, localns)) => {
            let (globals, locals) = auto;
            (globals.overlay(globalns), locals.overlay(localns))
        }
    }
}
