//! Qualifiers and variance: small closed enums attached to nodes and type
//! parameters.

/// A typing construct that modifies how the wrapped type is interpreted
/// (`Final[T]`, `ClassVar[T]`, …). Stored as an element of a node's
/// `qualifiers` set, never as its own node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qualifier {
    ClassVar,
    Final,
    Required,
    NotRequired,
    ReadOnly,
    InitVar,
}

impl Qualifier {
    /// Stable lowercase name, used for deterministic ordering/printing.
    pub fn name(self) -> &'static str {
        match self {
            Qualifier::ClassVar => "class_var",
            Qualifier::Final => "final",
            Qualifier::Required => "required",
            Qualifier::NotRequired => "not_required",
            Qualifier::ReadOnly => "read_only",
            Qualifier::InitVar => "init_var",
        }
    }
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How subtyping of a type parameter relates to subtyping of the containing
/// generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}
