//! `MetadataCollection`: an immutable, ordered sequence of arbitrary opaque
//! items hoisted off `Annotated[...]` wrappers (or attached to a node by a
//! structured builder), plus its query/filter/transform/introspection
//! surface.
//!
//! Items are type-erased behind the [`Metadata`] trait so the collection can
//! hold a `Gt(0)`, a `"free-form string"`, and a user-defined validator side
//! by side, the same way the source system's metadata tuples do.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, OnceLock};

use crate::error::{MetadataNotFound, ProtocolNotRuntimeCheckable};

/// A single opaque metadata item.
///
/// Most items should rely on the blanket implementation below (anything
/// `Debug + Clone + PartialEq + Eq + Hash + 'static` gets one for free).
/// Items that cannot be hashed (for example, anything carrying a `f64`)
/// implement `Metadata` by hand and report `is_hashable() == false`; this is
/// what [`MetadataCollection::unique`] falls back to an O(n²) scan for.
pub trait Metadata: std::fmt::Debug + 'static {
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn Metadata>;
    fn dyn_eq(&self, other: &dyn Metadata) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn is_hashable(&self) -> bool {
        true
    }
    fn type_name(&self) -> &'static str;
    fn type_id(&self) -> TypeId;

    /// Items implementing the "grouped metadata" protocol override this to
    /// expose their sub-items for `flatten`/`flatten_deep`.
    fn as_grouped(&self) -> Option<&dyn Grouped> {
        None
    }
}

impl<T> Metadata for T
where
    T: std::fmt::Debug + Clone + PartialEq + Eq + Hash + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Metadata> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Metadata) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|o| self == o)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        Hash::hash(self, &mut state);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }
}

/// A metadata item that can yield an iterable of sub-items on demand, the
/// "grouped metadata" protocol. `of`, `flatten` and `flatten_deep` expand
/// one or more layers of any item that implements this.
pub trait Grouped {
    fn sub_items(&self) -> Vec<Box<dyn Metadata>>;
}

/// A metadata item declaring itself runtime-checkable so
/// `MetadataCollection::find_protocol` et al. can structurally test items
/// against it. Implementors that are not actually runtime-checkable should
/// leave `RUNTIME_CHECKABLE` at its default `false`, which makes any
/// protocol query against them fail with [`ProtocolNotRuntimeCheckable`].
pub trait RuntimeCheckableProtocol {
    const RUNTIME_CHECKABLE: bool = false;

    /// Structural test: does this item satisfy the protocol?
    fn matches(item: &dyn Metadata) -> bool;
}

#[derive(Clone)]
struct MetaItem(Box<dyn Metadata>);

impl std::fmt::Debug for MetaItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for MetaItem {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

/// Immutable, ordered sequence of opaque metadata items. Cheap to clone: the
/// backing storage is reference-counted.
pub struct MetadataCollection {
    items: Arc<[MetaItem]>,
    hashable_cache: OnceLock<bool>,
}

impl Clone for MetadataCollection {
    fn clone(&self) -> Self {
        // Cloning shares the item storage but starts a fresh probe cache;
        // cheap either way since probing is a single linear scan.
        Self {
            items: self.items.clone(),
            hashable_cache: OnceLock::new(),
        }
    }
}

static EMPTY_STORAGE: LazyLock<Arc<[MetaItem]>> = LazyLock::new(|| Arc::from(Vec::new()));

impl MetadataCollection {
    /// The shared empty collection. Every transform that would produce a
    /// zero-length result returns a fresh handle onto this storage instead
    /// of allocating.
    pub fn empty() -> Self {
        Self {
            items: EMPTY_STORAGE.clone(),
            hashable_cache: OnceLock::new(),
        }
    }

    fn from_items(items: Vec<MetaItem>) -> Self {
        if items.is_empty() {
            return Self::empty();
        }
        Self {
            items: Arc::from(items),
            hashable_cache: OnceLock::new(),
        }
    }

    /// Build a collection from boxed items. When `auto_flatten` is set, any
    /// item implementing [`Grouped`] is expanded one layer before being
    /// stored.
    pub fn of(items: impl IntoIterator<Item = Box<dyn Metadata>>, auto_flatten: bool) -> Self {
        let items: Vec<MetaItem> = items.into_iter().map(MetaItem).collect();
        let collection = Self::from_items(items);
        if auto_flatten {
            collection.flatten()
        } else {
            collection
        }
    }

    /// Convenience constructor equivalent to `of(items, true)`.
    pub fn new(items: impl IntoIterator<Item = Box<dyn Metadata>>) -> Self {
        Self::of(items, true)
    }

    /// Build a collection directly from an `Annotated` raw type, via the
    /// adapter's `annotated_parts`. `raw` must be annotated; callers check
    /// `adapter.is_annotated` first (the builder always does, through
    /// `classify`).
    ///
    /// When `recursive` is set, a base that is itself `Annotated` is peeled
    /// again and its annotations appended, continuing until a non-annotated
    /// base is reached. Without it, only the outermost wrapper's
    /// annotations are collected.
    pub fn from_annotated<A: crate::reflect::ReflectionAdapter>(
        adapter: &A,
        raw: &A::RawType,
        recursive: bool,
    ) -> Self {
        let mut collected: Vec<Box<dyn Metadata>> = Vec::new();
        let mut current = raw.clone();
        loop {
            if !adapter.is_annotated(&current) {
                break;
            }
            let (base, annotations) = adapter.annotated_parts(&current);
            collected.extend(annotations);
            if !recursive {
                break;
            }
            current = base;
        }
        Self::of(collected, true)
    }

    // --- Sequence -------------------------------------------------------

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_index(&self, index: usize) -> Option<&dyn Metadata> {
        self.items.get(index).map(|i| i.0.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Metadata> {
        self.items.iter().map(|i| i.0.as_ref())
    }

    pub fn contains<T: 'static>(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter()
            .filter_map(|m| m.as_any().downcast_ref::<T>())
            .any(|v| v == value)
    }

    pub fn reversed(&self) -> Self {
        let mut items: Vec<MetaItem> = self.items.iter().cloned().collect();
        items.reverse();
        Self::from_items(items)
    }

    // --- Query ------------------------------------------------------------

    /// First item of concrete type `T`, if any.
    pub fn find<T: 'static>(&self) -> Option<&T> {
        self.iter().find_map(|m| m.as_any().downcast_ref::<T>())
    }

    /// First item whose type id is one of `type_ids`, preserving the
    /// collection's order.
    pub fn find_first_of(&self, type_ids: &[TypeId]) -> Option<&dyn Metadata> {
        self.iter().find(|m| type_ids.contains(&m.type_id()))
    }

    /// All items whose type id is one of `type_ids`, in order.
    pub fn find_all_of(&self, type_ids: &[TypeId]) -> Self {
        self.filter(|m| type_ids.contains(&m.type_id()))
    }

    pub fn get<T: Clone + 'static>(&self, default: T) -> T {
        self.find::<T>().cloned().unwrap_or(default)
    }

    pub fn get_required<T: 'static>(&self) -> Result<&T, MetadataNotFound> {
        self.find::<T>()
            .ok_or_else(|| MetadataNotFound::new(std::any::type_name::<T>()))
    }

    pub fn has<T: 'static>(&self) -> bool {
        self.iter().any(|m| m.as_any().is::<T>())
    }

    pub fn has_of(&self, type_ids: &[TypeId]) -> bool {
        self.iter().any(|m| type_ids.contains(&m.type_id()))
    }

    pub fn count<T: 'static>(&self) -> usize {
        self.iter().filter(|m| m.as_any().is::<T>()).count()
    }

    pub fn count_of(&self, type_ids: &[TypeId]) -> usize {
        self.iter().filter(|m| type_ids.contains(&m.type_id())).count()
    }

    // --- Filter -------------------------------------------------------

    pub fn filter(&self, pred: impl Fn(&dyn Metadata) -> bool) -> Self {
        let items: Vec<MetaItem> = self
            .items
            .iter()
            .filter(|i| pred(i.0.as_ref()))
            .cloned()
            .collect();
        Self::from_items(items)
    }

    pub fn filter_by_type<T: 'static>(&self, pred: impl Fn(&T) -> bool) -> Self {
        self.filter(|m| m.as_any().downcast_ref::<T>().is_some_and(&pred))
    }

    pub fn first(&self, pred: impl Fn(&dyn Metadata) -> bool) -> Option<&dyn Metadata> {
        self.iter().find(|m| pred(*m))
    }

    pub fn first_of_type<T: 'static>(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.iter()
            .filter_map(|m| m.as_any().downcast_ref::<T>())
            .find(|v| pred(v))
    }

    pub fn any(&self, pred: impl Fn(&dyn Metadata) -> bool) -> bool {
        self.iter().any(|m| pred(m))
    }

    /// Structural protocol query. Fails with [`ProtocolNotRuntimeCheckable`]
    /// if `P` has not opted into `RUNTIME_CHECKABLE`.
    pub fn find_protocol<P: RuntimeCheckableProtocol>(
        &self,
    ) -> Result<Option<&dyn Metadata>, ProtocolNotRuntimeCheckable> {
        if !P::RUNTIME_CHECKABLE {
            return Err(ProtocolNotRuntimeCheckable::new(std::any::type_name::<P>()));
        }
        Ok(self.iter().find(|m| P::matches(*m)))
    }

    pub fn has_protocol<P: RuntimeCheckableProtocol>(
        &self,
    ) -> Result<bool, ProtocolNotRuntimeCheckable> {
        Ok(self.find_protocol::<P>()?.is_some())
    }

    pub fn count_protocol<P: RuntimeCheckableProtocol>(
        &self,
    ) -> Result<usize, ProtocolNotRuntimeCheckable> {
        if !P::RUNTIME_CHECKABLE {
            return Err(ProtocolNotRuntimeCheckable::new(std::any::type_name::<P>()));
        }
        Ok(self.iter().filter(|m| P::matches(*m)).count())
    }

    // --- Transform ------------------------------------------------------

    pub fn concat(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut items: Vec<MetaItem> = self.items.iter().cloned().collect();
        items.extend(other.items.iter().cloned());
        Self::from_items(items)
    }

    pub fn exclude(&self, type_ids: &[TypeId]) -> Self {
        self.filter(|m| !type_ids.contains(&m.type_id()))
    }

    /// First-occurrence de-duplication. O(n) when every item is hashable,
    /// O(n²) fallback otherwise.
    pub fn unique(&self) -> Self {
        if self.is_hashable() {
            let mut seen: HashSet<(TypeId, u64)> = HashSet::new();
            let items: Vec<MetaItem> = self
                .items
                .iter()
                .filter(|i| {
                    let mut hasher = std::collections::hash_map::DefaultHasher::new();
                    i.0.dyn_hash(&mut hasher);
                    seen.insert((i.0.type_id(), hasher.finish()))
                })
                .cloned()
                .collect();
            Self::from_items(items)
        } else {
            let mut kept: Vec<MetaItem> = Vec::new();
            for item in self.items.iter() {
                if !kept.iter().any(|k| k.0.dyn_eq(item.0.as_ref())) {
                    kept.push(item.clone());
                }
            }
            Self::from_items(kept)
        }
    }

    /// Stable sort using the default key: `(type name, debug repr)`. Two
    /// passes with the same key are a fixpoint because `Vec::sort_by` is
    /// stable and the key is pure.
    pub fn sorted(&self) -> Self {
        self.sorted_by(|m| (m.type_name().to_string(), format!("{m:?}")))
    }

    pub fn sorted_by<K: Ord>(&self, key: impl Fn(&dyn Metadata) -> K) -> Self {
        let mut items: Vec<MetaItem> = self.items.iter().cloned().collect();
        items.sort_by(|a, b| key(a.0.as_ref()).cmp(&key(b.0.as_ref())));
        Self::from_items(items)
    }

    pub fn map<U>(&self, f: impl Fn(&dyn Metadata) -> U) -> Vec<U> {
        self.iter().map(|m| f(m)).collect()
    }

    pub fn partition(&self, pred: impl Fn(&dyn Metadata) -> bool) -> (Self, Self) {
        let (yes, no): (Vec<MetaItem>, Vec<MetaItem>) =
            self.items.iter().cloned().partition(|i| pred(i.0.as_ref()));
        (Self::from_items(yes), Self::from_items(no))
    }

    // --- Grouped flattening ----------------------------------------------

    /// Expand one layer of any item implementing [`Grouped`].
    pub fn flatten(&self) -> Self {
        let mut items: Vec<MetaItem> = Vec::with_capacity(self.items.len());
        for item in self.items.iter() {
            match item.0.as_grouped() {
                Some(group) => items.extend(group.sub_items().into_iter().map(MetaItem)),
                None => items.push(item.clone()),
            }
        }
        Self::from_items(items)
    }

    /// Expand [`Grouped`] items recursively until none remain.
    pub fn flatten_deep(&self) -> Self {
        let mut current = self.clone();
        loop {
            let next = current.flatten();
            if next.len() == current.len() {
                return next;
            }
            current = next;
        }
    }

    // --- Introspection ----------------------------------------------------

    pub fn types(&self) -> BTreeSet<&'static str> {
        self.iter().map(Metadata::type_name).collect()
    }

    pub fn by_type(&self) -> BTreeMap<&'static str, Self> {
        let mut groups: BTreeMap<&'static str, Vec<MetaItem>> = BTreeMap::new();
        for item in self.items.iter() {
            groups.entry(item.0.type_name()).or_default().push(item.clone());
        }
        groups
            .into_iter()
            .map(|(k, v)| (k, Self::from_items(v)))
            .collect()
    }

    /// Whether every item in this collection can be hashed. Probed once and
    /// cached for the lifetime of this instance.
    pub fn is_hashable(&self) -> bool {
        *self
            .hashable_cache
            .get_or_init(|| self.items.iter().all(|i| i.0.is_hashable()))
    }

    /// `Some(hash)` if every item is hashable, `None` otherwise. Kept
    /// separate from `std::hash::Hash` so a partially-unhashable collection
    /// never silently produces a hash that ignores some of its items.
    pub fn content_hash(&self) -> Option<u64> {
        if !self.is_hashable() {
            return None;
        }
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.items.len().hash(&mut hasher);
        for item in self.items.iter() {
            item.0.type_id().hash(&mut hasher);
            item.0.dyn_hash(&mut hasher);
        }
        Some(hasher.finish())
    }
}

impl Default for MetadataCollection {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for MetadataCollection {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for MetadataCollection {}

// Delegates to `content_hash`, falling back to a fixed value for collections
// that contain unhashable items. `x == y` still implies `hash(x) == hash(y)`
// because hashability is itself a deterministic function of an item's
// already-compared contents; see `content_hash`'s doc comment.
impl Hash for MetadataCollection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content_hash().unwrap_or(0).hash(state);
    }
}

impl std::ops::Add for &MetadataCollection {
    type Output = MetadataCollection;
    fn add(self, rhs: &MetadataCollection) -> MetadataCollection {
        self.concat(rhs)
    }
}

impl std::ops::BitOr for &MetadataCollection {
    type Output = MetadataCollection;
    fn bitor(self, rhs: &MetadataCollection) -> MetadataCollection {
        self.concat(rhs)
    }
}

impl<'a> IntoIterator for &'a MetadataCollection {
    type Item = &'a dyn Metadata;
    type IntoIter = Box<dyn Iterator<Item = &'a dyn Metadata> + 'a>;
    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

const REPR_TRUNCATE_AT: usize = 8;

impl std::fmt::Debug for MetadataCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().take(REPR_TRUNCATE_AT).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", item.0.as_ref())?;
        }
        let rest = self.items.len().saturating_sub(REPR_TRUNCATE_AT);
        if rest > 0 {
            write!(f, ", … (+{rest} more)")?;
        }
        write!(f, "]")
    }
}

/// Build a `&[TypeId]` list from a set of concrete types, for the
/// multi-type query methods (`find_first_of`, `find_all_of`, `exclude`, …).
#[macro_export]
macro_rules! type_ids {
    ($($t:ty),+ $(,)?) => {
        [$(::std::any::TypeId::of::<$t>()),+]
    };
}
