//! Hand-implemented [`Metadata`] types exercising the parts of that trait
//! the blanket impl can't cover: grouped expansion and protocol matching.

use typing_graph_core::{Grouped, Metadata, RuntimeCheckableProtocol};

/// A bundle of tags that expands into its members under `flatten`/
/// `flatten_deep`, the way a validator library's combined-constraints object
/// would.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaGroup {
    pub tags: Vec<String>,
}

impl MetaGroup {
    pub fn new(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl Grouped for MetaGroup {
    fn sub_items(&self) -> Vec<Box<dyn Metadata>> {
        self.tags.iter().cloned().map(|tag| Box::new(Tag(tag)) as Box<dyn Metadata>).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

/// A marker protocol `MetadataCollection::find_protocol` can match against:
/// anything tagged with a non-empty string is considered "named".
pub struct Named;

impl RuntimeCheckableProtocol for Named {
    const RUNTIME_CHECKABLE: bool = true;

    fn matches(item: &dyn Metadata) -> bool {
        item.as_any()
            .downcast_ref::<Tag>()
            .is_some_and(|tag| !tag.0.is_empty())
    }
}

/// A protocol that declares itself runtime-checkable but matches nothing.
/// Exercises `find_protocol`'s "no match" path distinctly from its
/// `ProtocolNotRuntimeCheckable` path.
pub struct Unmatchable;

impl RuntimeCheckableProtocol for Unmatchable {
    const RUNTIME_CHECKABLE: bool = true;

    fn matches(_item: &dyn Metadata) -> bool {
        false
    }
}

/// A protocol that is deliberately *not* runtime-checkable, for exercising
/// `ProtocolNotRuntimeCheckable`.
pub struct NotCheckable;

impl RuntimeCheckableProtocol for NotCheckable {
    fn matches(_item: &dyn Metadata) -> bool {
        true
    }
}
