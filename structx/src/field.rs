//! Recorded fields and the path-keyed result map

use std::any::Any;
use std::fmt;

use ahash::AHashMap;

use crate::error::{FieldError, FieldResult};
use crate::shape::{Scalar, Shape, Walk};
use crate::tag::FieldTag;

/// A visited value paired with the directives of the field it came from
#[derive(Clone, Copy)]
pub struct Field<'a> {
    value: &'a dyn Walk,
    tag: FieldTag,
}

impl<'a> Field<'a> {
    /// Pair a value with its tag
    pub fn new(value: &'a dyn Walk, tag: FieldTag) -> Self {
        Self { value, tag }
    }

    /// The visited value
    pub fn value(&self) -> &'a dyn Walk {
        self.value
    }

    /// Directives of the declaring field; empty for map entries, sequence
    /// elements and the root
    pub fn tag(&self) -> FieldTag {
        self.tag
    }

    /// Concrete type name of the value
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Scalar view of the value, following one pointer or interface level
    pub fn scalar(&self) -> Option<Scalar<'a>> {
        match self.value.shape() {
            Shape::Scalar(scalar) => Some(scalar),
            Shape::Pointer(Some(target)) | Shape::Interface(target) => match target.shape() {
                Shape::Scalar(scalar) => Some(scalar),
                _ => None,
            },
            _ => None,
        }
    }

    /// JSON rendering of a scalar value
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.scalar().map(|scalar| scalar.to_json())
    }

    /// Downcast the value, following one pointer or interface level
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        if let Some(found) = self.value.as_any().and_then(|any| any.downcast_ref::<T>()) {
            return Some(found);
        }
        match self.value.shape() {
            Shape::Pointer(Some(target)) | Shape::Interface(target) => {
                target.as_any()?.downcast_ref::<T>()
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Field");
        s.field("type", &self.type_name());
        if let Some(scalar) = self.scalar() {
            s.field("value", &scalar);
        }
        s.field("tag", &self.tag).finish()
    }
}

/// Fields compare equal when they wrap the same value with the same tag
impl PartialEq for Field<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && std::ptr::addr_eq(self.value as *const dyn Walk, other.value as *const dyn Walk)
    }
}

/// Result of one walk: every recorded path and its field
#[derive(Clone, Default, PartialEq)]
pub struct FieldMap<'a> {
    inner: AHashMap<String, Field<'a>>,
}

impl<'a> FieldMap<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path: &str, field: Field<'a>) {
        self.inner.insert(path.to_owned(), field);
    }

    /// Field recorded at `path`
    pub fn get(&self, path: &str) -> Option<&Field<'a>> {
        self.inner.get(path)
    }

    /// Whether `path` was recorded
    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains_key(path)
    }

    /// Typed access to the value recorded at `path`
    pub fn get_as<T: Any>(&self, path: &str) -> FieldResult<&'a T> {
        let field = self.get(path).ok_or_else(|| FieldError::NotFound {
            path: path.to_string(),
        })?;
        field
            .downcast_ref::<T>()
            .ok_or_else(|| FieldError::TypeMismatch {
                path: path.to_string(),
                expected: std::any::type_name::<T>(),
                found: field.type_name(),
            })
    }

    /// Number of recorded paths
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Recorded paths in lexicographic order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Iterate `(path, field)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field<'a>)> {
        self.inner.iter().map(|(path, field)| (path.as_str(), field))
    }

    /// Take the underlying map
    pub fn into_inner(self) -> AHashMap<String, Field<'a>> {
        self.inner
    }
}

impl fmt::Debug for FieldMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.paths().into_iter().map(|path| (path, &self.inner[path])))
            .finish()
    }
}

impl<'a> IntoIterator for FieldMap<'a> {
    type Item = (String, Field<'a>);
    type IntoIter = std::collections::hash_map::IntoIter<String, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
