//! A [`typing_graph_core::ReflectionAdapter`] over `facet`'s Rust runtime
//! reflection.
//!
//! Every other crate in this workspace either defines the engine
//! (`typing-graph-core`) or fakes a source language for it
//! (`typing-graph-testhelpers`). This one drives the engine against a real,
//! type-checked reflection API instead of a hand-built fixture, the same
//! role `facet`-derived `Shape`s play anywhere else in this corpus: ground
//! truth for a generic, `Facet`-bounded traversal.
//!
//! ```
//! use facet::Facet;
//! use typing_graph_core::{Engine, NodeKind};
//! use typing_graph_facet::{FacetAdapter, FacetType};
//!
//! #[derive(Facet)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! let engine = Engine::new(FacetAdapter::new());
//! let node = engine.inspect_type(&FacetType::of::<Point>(), None, None).unwrap();
//! assert!(matches!(node.kind(), NodeKind::Dataclass { .. }));
//! ```

mod adapter;
mod tracing_macros;

pub use adapter::{ContainerKind, DocComment, FacetAdapter, FacetId, FacetType};
