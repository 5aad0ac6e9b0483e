//! Shape descriptions for walkable values
//!
//! Values describe themselves to the traverser through two traits:
//!
//! - [`Walk`] exposes the runtime shape of a value (its fields, entries or
//!   elements) and is object safe, so the traverser works on `&dyn Walk`.
//! - [`Describe`] exposes the static type of a value. The traverser uses it to
//!   decide whether a map or sequence is worth descending into before it looks
//!   at any entry.
//!
//! Both are normally generated with `#[derive(Walk)]`.

use std::any::Any;
use std::fmt;

use crate::tag::FieldTag;

/// Static type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// Struct with the given type name
    Struct(&'static str),
    /// Map; carries the value type
    Map(Box<TypeDesc>),
    /// Array, slice or other sequence; carries the element type
    Sequence(Box<TypeDesc>),
    /// Owning or borrowing pointer; carries the target type
    Pointer(Box<TypeDesc>),
    /// Dynamically typed value (`Box<dyn Walk>`)
    Interface,
    /// Anything else
    Scalar,
}

impl TypeDesc {
    /// Pointer to `target`
    pub fn pointer(target: TypeDesc) -> Self {
        TypeDesc::Pointer(Box::new(target))
    }

    /// Sequence of `elem`
    pub fn sequence(elem: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(elem))
    }

    /// Map with `value` values
    pub fn map(value: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(value))
    }

    /// True for struct types
    pub fn is_struct(&self) -> bool {
        matches!(self, TypeDesc::Struct(_))
    }

    /// Strip one level of pointer indirection
    pub fn deref(&self) -> &TypeDesc {
        match self {
            TypeDesc::Pointer(target) => target,
            other => other,
        }
    }

    /// Whether a map with values of this type is traversed.
    ///
    /// Values must be structs or sequences of structs, after stripping one
    /// pointer level.
    pub fn is_walkable_map_value(&self) -> bool {
        match self.deref() {
            TypeDesc::Struct(_) => true,
            TypeDesc::Sequence(elem) => elem.is_struct(),
            _ => false,
        }
    }

    /// Whether a sequence with elements of this type is traversed.
    ///
    /// Elements must be structs or pointers to structs. Interface elements are
    /// never inspected.
    pub fn is_walkable_sequence_elem(&self) -> bool {
        match self {
            TypeDesc::Interface => false,
            TypeDesc::Struct(_) => true,
            TypeDesc::Pointer(target) => target.is_struct(),
            _ => false,
        }
    }
}

/// Static type information for walkable values
pub trait Describe {
    /// Describe the type without needing a value
    fn describe() -> TypeDesc;
}

/// A value the traverser can look into
pub trait Walk {
    /// Runtime shape of this value
    fn shape(&self) -> Shape<'_>;

    /// Name of the concrete type, used in diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Downcast hook. `'static` types return `Some(self)`.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// Runtime shape of a value
pub enum Shape<'a> {
    /// Struct with ordered named fields
    Struct(StructShape<'a>),
    /// Keyed collection
    Map(MapShape<'a>),
    /// Indexed collection
    Sequence(SequenceShape<'a>),
    /// Pointer; `None` is a nil handle
    Pointer(Option<&'a dyn Walk>),
    /// Dynamically typed slot holding a value
    Interface(&'a dyn Walk),
    /// Leaf value
    Scalar(Scalar<'a>),
    /// Value that cannot be introspected
    Inaccessible,
}

impl<'a> Shape<'a> {
    /// Short name of the shape category
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Struct(_) => "struct",
            Shape::Map(_) => "map",
            Shape::Sequence(_) => "sequence",
            Shape::Pointer(_) => "pointer",
            Shape::Interface(_) => "interface",
            Shape::Scalar(_) => "scalar",
            Shape::Inaccessible => "inaccessible",
        }
    }

    /// False for inaccessible values and nil pointers
    pub fn is_valid(&self) -> bool {
        !matches!(self, Shape::Inaccessible | Shape::Pointer(None))
    }
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct(s) => f
                .debug_struct("Struct")
                .field("name", &s.name)
                .field("fields", &s.fields.len())
                .finish(),
            Shape::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Shape::Pointer(target) => f
                .debug_tuple("Pointer")
                .field(&target.map(|t| t.type_name()))
                .finish(),
            Shape::Interface(inner) => f
                .debug_tuple("Interface")
                .field(&inner.type_name())
                .finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Fields of a struct value
pub struct StructShape<'a> {
    name: &'static str,
    fields: Vec<StructField<'a>>,
}

impl<'a> StructShape<'a> {
    /// Create a struct shape from fields in declaration order
    pub fn new(name: &'static str, fields: Vec<StructField<'a>>) -> Self {
        Self { name, fields }
    }

    /// Type name, used as the root path
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }
}

/// One declared struct field
#[derive(Clone, Copy)]
pub struct StructField<'a> {
    name: &'static str,
    tag: FieldTag,
    value: &'a dyn Walk,
}

impl<'a> StructField<'a> {
    /// Field with a value
    pub fn new(name: &'static str, tag: FieldTag, value: &'a dyn Walk) -> Self {
        Self { name, tag, value }
    }

    /// Field whose value cannot be introspected
    pub fn inaccessible(name: &'static str, tag: FieldTag) -> Self {
        Self {
            name,
            tag,
            value: &Inaccessible,
        }
    }

    /// Path segment for this field
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attached directives
    pub fn tag(&self) -> FieldTag {
        self.tag
    }

    /// Field value
    pub fn value(&self) -> &'a dyn Walk {
        self.value
    }
}

/// Entries of a map value, keys already rendered to strings
pub struct MapShape<'a> {
    value_desc: TypeDesc,
    entries: Box<dyn Iterator<Item = (String, &'a dyn Walk)> + 'a>,
}

impl<'a> MapShape<'a> {
    /// Create a map shape; `entries` is only consumed if the map is traversed
    pub fn new(
        value_desc: TypeDesc,
        entries: impl Iterator<Item = (String, &'a dyn Walk)> + 'a,
    ) -> Self {
        Self {
            value_desc,
            entries: Box::new(entries),
        }
    }

    /// Static type of the map values
    pub fn value_desc(&self) -> &TypeDesc {
        &self.value_desc
    }

    /// Consume the shape into its entries
    pub fn into_entries(self) -> Box<dyn Iterator<Item = (String, &'a dyn Walk)> + 'a> {
        self.entries
    }
}

/// Elements of a sequence value
pub struct SequenceShape<'a> {
    elem_desc: TypeDesc,
    items: Box<dyn Iterator<Item = &'a dyn Walk> + 'a>,
}

impl<'a> SequenceShape<'a> {
    /// Create a sequence shape; `items` is only consumed if the sequence is traversed
    pub fn new(elem_desc: TypeDesc, items: impl Iterator<Item = &'a dyn Walk> + 'a) -> Self {
        Self {
            elem_desc,
            items: Box::new(items),
        }
    }

    /// Static type of the elements
    pub fn elem_desc(&self) -> &TypeDesc {
        &self.elem_desc
    }

    /// Consume the shape into its elements
    pub fn into_items(self) -> Box<dyn Iterator<Item = &'a dyn Walk> + 'a> {
        self.items
    }
}

/// Borrowed view of a leaf value
#[derive(Clone, Copy)]
pub enum Scalar<'a> {
    /// `()`
    Unit,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(f64),
    /// Single character
    Char(char),
    /// String slice
    Str(&'a str),
    /// Any other leaf, rendered through `Display`
    Display(&'a dyn fmt::Display),
}

impl Scalar<'_> {
    /// Convert to a JSON value for inspection.
    ///
    /// Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match *self {
            Scalar::Unit => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::from(i),
            Scalar::Uint(u) => Value::from(u),
            Scalar::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Char(c) => Value::String(c.to_string()),
            Scalar::Str(s) => Value::String(s.to_owned()),
            Scalar::Display(d) => Value::String(d.to_string()),
        }
    }
}

impl fmt::Debug for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Unit => f.write_str("Unit"),
            Scalar::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Scalar::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Scalar::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Scalar::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Scalar::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Scalar::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Scalar::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Unit => f.write_str("()"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Uint(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Char(c) => write!(f, "{}", c),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Display(d) => write!(f, "{}", d),
        }
    }
}

/// Placeholder for values that cannot be introspected.
///
/// The derive emits it for non-public fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inaccessible;

impl Walk for Inaccessible {
    fn shape(&self) -> Shape<'_> {
        Shape::Inaccessible
    }
}

impl Describe for Inaccessible {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}
