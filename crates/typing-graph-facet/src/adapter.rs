//! `FacetAdapter`: a [`ReflectionAdapter`] over Rust's own runtime
//! reflection, via the `facet` family of crates, walking the same
//! `Shape`/`Def`/`Type` traversal `facet_core` exposes for any `Facet`
//! type.
//!
//! Rust's reflection is type-level, not value-level, and several
//! source-language constructs this engine's taxonomy was built for have no
//! Rust analog reachable through `facet`:
//!
//! - **Forward references** don't exist; the compiler has already resolved
//!   every identifier by the time a `Shape` exists. `is_forward_ref` is
//!   always `false`.
//! - **Generic type parameters** aren't reflected per-instantiation: a
//!   `Vec<i32>`'s `Shape` carries no trace of an unapplied `Vec<T>`. This
//!   adapter fabricates a synthetic [`FacetType::GenericOrigin`] marker to
//!   stand in for the unsubscripted generic a `SubscriptedGeneric` node
//!   points at.
//! - **`Annotated` metadata instances** can't be recovered from a type-level
//!   `Shape` (only an instance carries the metadata values); `is_annotated`
//!   is always `false`. Doc comments are carried as field-level metadata
//!   instead (see [`DocComment`]).
//! - **Qualifiers** (`ClassVar`, `Final`, …) and **structural protocols**
//!   have no Rust equivalent `facet` exposes; `qualifier_unwrap` is a no-op
//!   and `is_protocol` is always `false`.
//!
//! `typing_graph_testhelpers::MockAdapter` is where all of those are
//! actually exercised end to end; this adapter's job is narrower: ground
//! the builder's recursive-structural-typing rules (containers, structs,
//! enums, newtypes) against real, type-checked Rust shapes.

use facet_core::{Def, EnumType, Facet, Shape, StructKind, Type, UserType};

use typing_graph_core::{
    CallableParamsRaw, EnumMemberRaw, FieldRaw, Metadata, Namespace, NamespacePair, ParamKind,
    ParamSpecInfo, Qualifier, ReflectionAdapter, ReflectionError, SpecialForm, SourceLocation,
    TypeVarInfo,
};

/// A doc comment hoisted off a `facet` field, carried as ordinary
/// `MetadataCollection` content the way any other annotation metadata is.
/// Sourced from `facet`'s own `field.doc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocComment(pub String);

/// Which built-in container kind a `Vec`/`HashMap`/`HashSet`/… shape was
/// classified as. Stands in for the unsubscripted generic origin a
/// `SubscriptedGeneric` node points at (see module docs: `facet` has no
/// value for an unapplied `Vec<T>` on its own).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Map,
    Set,
}

/// The raw type this adapter hands the engine. Most of the time this is a
/// real `facet_core::Shape`; the remaining variants are synthetic markers
/// needed to round out the taxonomy (see module docs).
#[derive(Clone)]
pub enum FacetType {
    Shape(&'static Shape),
    /// One enum variant's fields, treated as its own dataclass-shaped
    /// record. Only constructed for enums that carry at least one
    /// data-bearing variant (see [`is_sum_enum`]); a variant's index is
    /// stable for the lifetime of the program since `EnumType::variants` is
    /// a `&'static` slice.
    Variant { shape: &'static Shape, index: usize },
    GenericOrigin(ContainerKind),
    /// The `None` arm of `Option<T>`, surfaced as `Concrete{NoneType}` the
    /// same way Python's `type(None)` is.
    NoneType,
}

impl FacetType {
    /// Build the raw type for `T`'s own shape: the usual entry point into
    /// `Engine::inspect_type`.
    pub fn of<T: Facet<'static>>() -> Self {
        FacetType::Shape(T::SHAPE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetId {
    Shape(usize),
    Variant(usize, usize),
    GenericOrigin(ContainerKind),
    NoneType,
}

/// Follow `Box<T>`/`Rc<T>`/`Arc<T>`/`Cow<T>`/… through to `T`'s shape,
/// treating smart pointers as transparent wrappers around their pointee.
fn unwrap_pointers(mut shape: &'static Shape) -> &'static Shape {
    while let Def::Pointer(ptr_def) = &shape.def {
        match ptr_def.pointee {
            Some(pointee) => shape = pointee,
            None => break,
        }
    }
    shape
}

fn variant_of(shape: &'static Shape, index: usize) -> &'static facet_core::Variant {
    match &unwrap_pointers(shape).ty {
        Type::User(UserType::Enum(enum_type)) => &enum_type.variants[index],
        _ => unreachable!("FacetType::Variant constructed from a non-enum shape"),
    }
}

/// An enum where at least one variant carries fields is modeled as a
/// `Union` of per-variant records rather than this engine's `Enum` node.
/// `Enum` is a closed set of named *scalar* members, which only matches a
/// Rust enum when every variant is fieldless. A mixed or data-carrying
/// enum is closer to a tagged union.
fn is_sum_enum(enum_type: &EnumType) -> bool {
    enum_type.variants.iter().any(|v| !matches!(v.data.kind, StructKind::Unit))
}

fn doc_metadata(doc: &[&str]) -> Vec<Box<dyn Metadata>> {
    if doc.is_empty() {
        return Vec::new();
    }
    let text = doc.iter().map(|line| line.trim()).collect::<Vec<_>>().join(" ");
    vec![Box::new(DocComment(text))]
}

/// Struct-shaped fields, whether from a plain struct (`StructType::fields`)
/// or one enum variant's data (`Variant::data`, itself a `StructType`).
/// Tuple/tuple-struct fields have no source name, so they're given
/// positional names `"0"`, `"1"`, …
fn struct_fields(struct_type: &facet_core::StructType) -> Vec<FieldRaw<FacetType>> {
    struct_type
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let name = match struct_type.kind {
                StructKind::Struct => field.effective_name().to_string(),
                _ => i.to_string(),
            };
            FieldRaw {
                name,
                raw_type: FacetType::Shape(field.shape()),
                has_default: field.default.is_some(),
                default_repr: None,
                metadata: doc_metadata(field.doc),
                qualifiers: Vec::new(),
            }
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FacetAdapter;

impl FacetAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReflectionAdapter for FacetAdapter {
    type RawType = FacetType;
    type Id = FacetId;

    fn identity(&self, t: &FacetType) -> FacetId {
        match t {
            FacetType::Shape(s) => FacetId::Shape(unwrap_pointers(s) as *const Shape as usize),
            FacetType::Variant { shape, index } => FacetId::Variant(*shape as *const Shape as usize, *index),
            FacetType::GenericOrigin(kind) => FacetId::GenericOrigin(*kind),
            FacetType::NoneType => FacetId::NoneType,
        }
    }

    fn special_form(&self, t: &FacetType) -> Option<SpecialForm> {
        match t {
            FacetType::Shape(s) => {
                let s = unwrap_pointers(s);
                matches!(s.ty, Type::Primitive(facet_core::PrimitiveType::Never))
                    .then_some(SpecialForm::Never)
            }
            _ => None,
        }
    }

    fn type_name(&self, t: &FacetType) -> String {
        match t {
            FacetType::Shape(s) => unwrap_pointers(s).type_identifier.to_string(),
            FacetType::Variant { shape, index } => {
                format!("{}.{}", shape.type_identifier, variant_of(shape, *index).effective_name())
            }
            FacetType::GenericOrigin(ContainerKind::List) => "list".to_string(),
            FacetType::GenericOrigin(ContainerKind::Map) => "dict".to_string(),
            FacetType::GenericOrigin(ContainerKind::Set) => "set".to_string(),
            FacetType::NoneType => "NoneType".to_string(),
        }
    }

    fn origin(&self, t: &FacetType) -> Option<FacetType> {
        let FacetType::Shape(s) = t else { return None };
        let s = unwrap_pointers(s);
        let kind = match &s.def {
            Def::List(_) | Def::Array(_) | Def::Slice(_) => ContainerKind::List,
            Def::Map(_) => ContainerKind::Map,
            Def::Set(_) => ContainerKind::Set,
            _ => return None,
        };
        Some(FacetType::GenericOrigin(kind))
    }

    fn args(&self, t: &FacetType) -> Vec<FacetType> {
        let FacetType::Shape(s) = t else { return Vec::new() };
        let s = unwrap_pointers(s);
        match &s.def {
            Def::Option(opt) => return vec![FacetType::Shape(opt.t), FacetType::NoneType],
            Def::Result(res) => return vec![FacetType::Shape(res.t), FacetType::Shape(res.e)],
            Def::List(list) => return vec![FacetType::Shape(list.t)],
            Def::Array(arr) => return vec![FacetType::Shape(arr.t)],
            Def::Slice(slice) => return vec![FacetType::Shape(slice.t)],
            Def::Set(set) => return vec![FacetType::Shape(set.t)],
            Def::Map(map) => return vec![FacetType::Shape(map.k), FacetType::Shape(map.v)],
            _ => {}
        }
        if let Type::User(UserType::Enum(enum_type)) = &s.ty {
            if is_sum_enum(enum_type) {
                return (0..enum_type.variants.len())
                    .map(|index| FacetType::Variant { shape: s, index })
                    .collect();
            }
        }
        Vec::new()
    }

    fn is_annotated(&self, _t: &FacetType) -> bool {
        false
    }
    fn annotated_parts(&self, t: &FacetType) -> (FacetType, Vec<Box<dyn Metadata>>) {
        (t.clone(), Vec::new())
    }

    fn is_union(&self, t: &FacetType) -> bool {
        let FacetType::Shape(s) = t else { return false };
        let s = unwrap_pointers(s);
        if matches!(&s.def, Def::Option(_) | Def::Result(_)) {
            return true;
        }
        matches!(&s.ty, Type::User(UserType::Enum(e)) if is_sum_enum(e))
    }

    fn is_literal(&self, _t: &FacetType) -> bool {
        false
    }
    fn literal_values(&self, _t: &FacetType) -> Vec<typing_graph_core::LiteralValue> {
        Vec::new()
    }

    fn is_tuple(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_callable(&self, _t: &FacetType) -> bool {
        false
    }
    fn callable_params(&self, _t: &FacetType) -> CallableParamsRaw<FacetType> {
        CallableParamsRaw::Ellipsis
    }
    fn callable_returns(&self, t: &FacetType) -> FacetType {
        t.clone()
    }
    fn is_meta(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_typeguard(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_typeis(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_concatenate(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_unpack(&self, _t: &FacetType) -> bool {
        false
    }

    fn is_alias(&self, _t: &FacetType) -> bool {
        false
    }
    fn alias_name(&self, t: &FacetType) -> String {
        self.type_name(t)
    }
    fn alias_type_params(&self, _t: &FacetType) -> Vec<FacetType> {
        Vec::new()
    }
    fn alias_value(&self, t: &FacetType) -> FacetType {
        t.clone()
    }

    fn is_generic_type(&self, t: &FacetType) -> bool {
        matches!(t, FacetType::GenericOrigin(_))
    }
    fn is_subscripted_generic(&self, t: &FacetType) -> bool {
        let FacetType::Shape(s) = t else { return false };
        matches!(
            &unwrap_pointers(s).def,
            Def::List(_) | Def::Array(_) | Def::Slice(_) | Def::Map(_) | Def::Set(_)
        )
    }

    fn qualifier_unwrap(&self, t: &FacetType) -> (Option<Qualifier>, FacetType) {
        (None, t.clone())
    }

    fn is_new_type(&self, t: &FacetType) -> bool {
        let FacetType::Shape(s) = t else { return false };
        match &unwrap_pointers(s).ty {
            Type::User(UserType::Struct(st)) => {
                matches!(st.kind, StructKind::Tuple | StructKind::TupleStruct) && st.fields.len() == 1
            }
            _ => false,
        }
    }
    fn new_type_name(&self, t: &FacetType) -> String {
        self.type_name(t)
    }
    fn new_type_supertype(&self, t: &FacetType) -> FacetType {
        let FacetType::Shape(s) = t else {
            unreachable!("is_new_type only answers true for FacetType::Shape")
        };
        match &unwrap_pointers(s).ty {
            Type::User(UserType::Struct(st)) => FacetType::Shape(st.fields[0].shape()),
            _ => unreachable!("is_new_type checked this was a one-field tuple struct"),
        }
    }

    fn is_forward_ref(&self, _t: &FacetType) -> bool {
        false
    }
    fn forward_ref_string(&self, _t: &FacetType) -> String {
        unreachable!("is_forward_ref is always false for FacetAdapter")
    }
    fn evaluate_forward_ref(
        &self,
        reference: &str,
        _namespace: &NamespacePair<FacetType>,
        _type_params: &[FacetType],
    ) -> Result<FacetType, ReflectionError> {
        Err(ReflectionError::new(format!(
            "FacetAdapter has no forward references to resolve (`{reference}`): Rust resolves \
             type identifiers at compile time"
        )))
    }

    fn is_type_var(&self, _t: &FacetType) -> bool {
        false
    }
    fn type_var_info(&self, _t: &FacetType) -> TypeVarInfo<FacetType> {
        unreachable!("is_type_var is always false for FacetAdapter")
    }
    fn is_param_spec(&self, _t: &FacetType) -> bool {
        false
    }
    fn param_spec_info(&self, _t: &FacetType) -> ParamSpecInfo<FacetType> {
        unreachable!("is_param_spec is always false for FacetAdapter")
    }
    fn is_type_var_tuple(&self, _t: &FacetType) -> bool {
        false
    }
    fn type_var_tuple_info(&self, _t: &FacetType) -> ParamSpecInfo<FacetType> {
        unreachable!("is_type_var_tuple is always false for FacetAdapter")
    }

    fn is_dataclass(&self, t: &FacetType) -> bool {
        match t {
            FacetType::Shape(s) => {
                let s = unwrap_pointers(s);
                match &s.ty {
                    Type::User(UserType::Struct(st)) => {
                        !(matches!(st.kind, StructKind::Tuple | StructKind::TupleStruct) && st.fields.len() == 1)
                    }
                    _ => false,
                }
            }
            FacetType::Variant { .. } => true,
            _ => false,
        }
    }
    fn is_typed_dict(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_named_tuple(&self, _t: &FacetType) -> bool {
        false
    }
    fn is_enum(&self, t: &FacetType) -> bool {
        let FacetType::Shape(s) = t else { return false };
        matches!(&unwrap_pointers(s).ty, Type::User(UserType::Enum(e)) if !is_sum_enum(e))
    }
    fn is_protocol(&self, _t: &FacetType) -> bool {
        false
    }

    fn dataclass_is_frozen(&self, _t: &FacetType) -> bool {
        false
    }
    fn dataclass_has_slots(&self, _t: &FacetType) -> bool {
        false
    }
    fn typed_dict_is_total(&self, _t: &FacetType) -> bool {
        true
    }
    fn protocol_is_runtime_checkable(&self, _t: &FacetType) -> bool {
        false
    }
    fn enum_value_type(&self, _t: &FacetType) -> Option<FacetType> {
        None
    }
    fn enum_members(&self, t: &FacetType) -> Vec<EnumMemberRaw> {
        let FacetType::Shape(s) = t else { return Vec::new() };
        match &unwrap_pointers(s).ty {
            Type::User(UserType::Enum(e)) => e
                .variants
                .iter()
                .map(|v| EnumMemberRaw {
                    name: v.effective_name().to_string(),
                    value_repr: None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn fields(&self, t: &FacetType) -> Vec<FieldRaw<FacetType>> {
        match t {
            FacetType::Shape(s) => match &unwrap_pointers(s).ty {
                Type::User(UserType::Struct(st)) => struct_fields(st),
                _ => Vec::new(),
            },
            FacetType::Variant { shape, index } => struct_fields(&variant_of(shape, *index).data),
            _ => Vec::new(),
        }
    }
    fn methods(&self, _t: &FacetType) -> Vec<FieldRaw<FacetType>> {
        // `facet` reflects data shape, not `impl` blocks; there is no
        // method enumeration to ground this in.
        Vec::new()
    }
    fn owner_class(&self, t: &FacetType, _member_name: &str) -> Option<FacetId> {
        // Rust has no struct inheritance, so every field is declared on its
        // own owner; `include_inherited_members` is a no-op for this adapter.
        Some(self.identity(t))
    }

    fn is_function(&self, _t: &FacetType) -> bool {
        false
    }
    fn function_name(&self, t: &FacetType) -> String {
        self.type_name(t)
    }
    fn function_is_async(&self, _t: &FacetType) -> bool {
        false
    }
    fn function_is_generator(&self, _t: &FacetType) -> bool {
        false
    }
    fn function_decorators(&self, _t: &FacetType) -> Vec<String> {
        Vec::new()
    }
    fn function_parameters(&self, _t: &FacetType) -> Vec<(String, FacetType, ParamKind, bool, Option<String>)> {
        Vec::new()
    }
    fn function_returns(&self, t: &FacetType) -> FacetType {
        t.clone()
    }
    fn function_type_params(&self, _t: &FacetType) -> Vec<FacetType> {
        Vec::new()
    }

    fn type_params(&self, _t: &FacetType) -> Vec<FacetType> {
        Vec::new()
    }

    fn module_globals(&self, _module: &FacetType) -> Namespace<FacetType> {
        Namespace::new()
    }
    fn class_module_globals(&self, _cls: &FacetType) -> Namespace<FacetType> {
        Namespace::new()
    }
    fn class_locals(&self, _cls: &FacetType) -> Namespace<FacetType> {
        Namespace::new()
    }
    fn function_globals(&self, _function: &FacetType) -> Namespace<FacetType> {
        Namespace::new()
    }
    fn function_closure(&self, _function: &FacetType) -> Namespace<FacetType> {
        Namespace::new()
    }
    fn owning_class_of_method(&self, _function: &FacetType) -> Option<FacetType> {
        None
    }

    fn source_location(&self, t: &FacetType) -> SourceLocation {
        match t {
            FacetType::Shape(s) => SourceLocation {
                module: None,
                qualname: Some(unwrap_pointers(s).type_identifier.to_string()),
                line: None,
                file: None,
            },
            _ => SourceLocation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet::Facet;
    use facet_testhelpers::test;
    use typing_graph_core::{Config, Engine, NodeKind};

    fn engine() -> Engine<FacetAdapter> {
        Engine::new(FacetAdapter::new())
    }

    #[test]
    fn scalar_is_concrete() {
        let node = engine().inspect_type(&FacetType::of::<u32>(), None, None).unwrap();
        assert!(matches!(node.kind(), NodeKind::Concrete { .. }));
    }

    #[test]
    fn option_is_union_of_t_and_none() {
        let node = engine()
            .inspect_type(&FacetType::of::<Option<u32>>(), None, None)
            .unwrap();
        let NodeKind::Union { members } = node.kind() else {
            panic!("expected Union, got {node:?}");
        };
        assert_eq!(members.len(), 2);
        assert!(matches!(members[1].kind(), NodeKind::Concrete { class_ref } if class_ref == "NoneType"));
    }

    #[test]
    fn vec_is_subscripted_generic_over_list() {
        let node = engine()
            .inspect_type(&FacetType::of::<Vec<u32>>(), None, None)
            .unwrap();
        let NodeKind::SubscriptedGeneric { origin, args } = node.kind() else {
            panic!("expected SubscriptedGeneric, got {node:?}");
        };
        assert!(matches!(origin.kind(), NodeKind::GenericType { class_ref, .. } if class_ref == "list"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn single_field_tuple_struct_is_new_type() {
        #[derive(Facet)]
        #[allow(dead_code)]
        struct UserId(u64);

        let node = engine().inspect_type(&FacetType::of::<UserId>(), None, None).unwrap();
        assert!(matches!(node.kind(), NodeKind::NewType { .. }));
    }

    #[test]
    fn named_struct_is_dataclass_with_doc_metadata() {
        /// A point in 2D space.
        #[derive(Facet)]
        #[allow(dead_code)]
        struct Point {
            /// The x coordinate.
            x: f64,
            y: f64,
        }

        let node = engine().inspect_type(&FacetType::of::<Point>(), None, None).unwrap();
        let NodeKind::Dataclass { fields, .. } = node.kind() else {
            panic!("expected Dataclass, got {node:?}");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "x");
        assert_eq!(fields[0].metadata.find::<DocComment>().unwrap().0, "The x coordinate.");
        assert!(fields[1].metadata.is_empty());
    }

    #[test]
    fn fieldless_enum_is_enum_node() {
        #[derive(Facet)]
        #[allow(dead_code)]
        enum Direction {
            North,
            South,
            East,
            West,
        }

        let node = engine()
            .inspect_type(&FacetType::of::<Direction>(), None, None)
            .unwrap();
        let NodeKind::Enum { members, value_type } = node.kind() else {
            panic!("expected Enum, got {node:?}");
        };
        assert_eq!(members.len(), 4);
        assert!(value_type.is_none());
    }

    #[test]
    fn data_carrying_enum_is_union_of_variant_records() {
        #[derive(Facet)]
        #[allow(dead_code)]
        enum Shape {
            Circle { radius: f64 },
            Square(f64),
            Empty,
        }

        let node = engine().inspect_type(&FacetType::of::<Shape>(), None, None).unwrap();
        let NodeKind::Union { members } = node.kind() else {
            panic!("expected Union, got {node:?}");
        };
        assert_eq!(members.len(), 3);
        let NodeKind::Dataclass { fields, .. } = members[0].kind() else {
            panic!("expected Dataclass variant, got {:?}", members[0]);
        };
        assert_eq!(fields[0].name, "radius");
    }

    #[test]
    fn repeated_inspection_hits_cache() {
        let engine = engine();
        let a = engine.inspect_type(&FacetType::of::<u32>(), None, None).unwrap();
        let b = engine.inspect_type(&FacetType::of::<u32>(), None, None).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(engine.cache_info().hits, 1);
    }

    #[test]
    fn include_source_locations_reports_type_identifier() {
        let config = Config::builder().include_source_locations(true).build();
        let node = engine()
            .inspect_type(&FacetType::of::<u32>(), Some(&config), None)
            .unwrap();
        assert_eq!(node.source_location().unwrap().qualname.as_deref(), Some("u32"));
    }
}
