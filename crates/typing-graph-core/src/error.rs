//! Error types. Hand-written enums with manual `Display` impls, no
//! `thiserror`, because every error here is about a malformed call or an
//! unresolvable symbol, not about rendering a diagnostic against a source
//! document.

use std::fmt;

/// Raised by `MetadataCollection::get_required` when no item of the
/// requested type is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataNotFound {
    pub type_name: &'static str,
}

impl MetadataNotFound {
    pub fn new(type_name: &'static str) -> Self {
        Self { type_name }
    }
}

impl fmt::Display for MetadataNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no metadata item of type `{}` found", self.type_name)
    }
}

impl std::error::Error for MetadataNotFound {}

/// Raised by protocol-based metadata queries when the target protocol has
/// not declared itself runtime-checkable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolNotRuntimeCheckable {
    pub protocol_name: &'static str,
}

impl ProtocolNotRuntimeCheckable {
    pub fn new(protocol_name: &'static str) -> Self {
        Self { protocol_name }
    }
}

impl fmt::Display for ProtocolNotRuntimeCheckable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol `{}` is not runtime-checkable",
            self.protocol_name
        )
    }
}

impl std::error::Error for ProtocolNotRuntimeCheckable {}

/// Raised by `walk` for invalid traversal parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    NegativeMaxDepth,
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalError::NegativeMaxDepth => f.write_str("max_depth must not be negative"),
        }
    }
}

impl std::error::Error for TraversalError {}

/// Why a forward reference could not be resolved in `eager` mode, or why a
/// per-element resolution attempt in `deferred`/`stringified` mode was
/// recorded as `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRefError {
    pub reference: String,
    pub message: String,
}

impl ForwardRefError {
    pub fn new(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ForwardRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not resolve forward reference `{}`: {}",
            self.reference, self.message
        )
    }
}

impl std::error::Error for ForwardRefError {}

/// The reflection adapter returned a shape the builder did not expect (a
/// programming error in the adapter, not in the type being reflected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionError {
    pub message: String,
}

impl ReflectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reflection adapter error: {}", self.message)
    }
}

impl std::error::Error for ReflectionError {}

/// Umbrella error for everything the builder can fail with mid-recursion.
/// Only raised in contexts the builder cannot recover from locally: cycles,
/// deferred/stringified forward-ref failures, and max-depth exhaustion are
/// all recovered locally instead of reaching here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionError {
    ForwardRef(ForwardRefError),
    Reflection(ReflectionError),
}

impl fmt::Display for InspectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionError::ForwardRef(e) => e.fmt(f),
            InspectionError::Reflection(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for InspectionError {}

impl From<ForwardRefError> for InspectionError {
    fn from(e: ForwardRefError) -> Self {
        InspectionError::ForwardRef(e)
    }
}

impl From<ReflectionError> for InspectionError {
    fn from(e: ReflectionError) -> Self {
        InspectionError::Reflection(e)
    }
}
