//! Depth-first traversal and the filter pipeline

use ahash::AHashMap;
use tracing::trace;

use crate::error::WalkError;
use crate::field::{Field, FieldMap};
use crate::path;
use crate::shape::{MapShape, SequenceShape, Shape, StructShape, Walk};
use crate::tag::{FieldTag, TagRule};
use crate::FieldFilter;

/// How a walk bounds its depth, and the error it stops with.
pub(crate) trait DepthPolicy<E> {
    /// Error returned when the walk stops early
    type Error;

    /// Check a value about to be visited at `depth`
    fn check(&self, path: &str, depth: usize) -> Result<(), Self::Error>;

    /// Wrap a filter error
    fn filter_error(err: E) -> Self::Error;
}

/// No depth bound; filter errors are returned unchanged.
pub(crate) struct Unbounded;

impl<E> DepthPolicy<E> for Unbounded {
    type Error = E;

    fn check(&self, _path: &str, _depth: usize) -> Result<(), E> {
        Ok(())
    }

    fn filter_error(err: E) -> E {
        err
    }
}

/// Optional depth bound reported through [`WalkError`].
pub(crate) struct MaxDepth(pub(crate) Option<usize>);

impl<E> DepthPolicy<E> for MaxDepth {
    type Error = WalkError<E>;

    fn check(&self, path: &str, depth: usize) -> Result<(), WalkError<E>> {
        match self.0 {
            Some(max_depth) if depth > max_depth => Err(WalkError::DepthLimitExceeded {
                path: path.to_string(),
                depth,
                max_depth,
            }),
            _ => Ok(()),
        }
    }

    fn filter_error(err: E) -> WalkError<E> {
        WalkError::Filter(err)
    }
}

/// State of one walk.
///
/// The tag and value maps live only as long as the walk; nothing is shared
/// between calls.
pub(crate) struct Traverser<'a, 'r, 's, 'f, E, P> {
    filters: &'r mut [&'s mut FieldFilter<'f, E>],
    policy: P,
    tags: AHashMap<String, FieldTag>,
    values: FieldMap<'a>,
}

impl<'a, 'r, 's, 'f, E, P: DepthPolicy<E>> Traverser<'a, 'r, 's, 'f, E, P> {
    pub(crate) fn new(filters: &'r mut [&'s mut FieldFilter<'f, E>], policy: P) -> Self {
        Self {
            filters,
            policy,
            tags: AHashMap::new(),
            values: FieldMap::new(),
        }
    }

    pub(crate) fn finish(self) -> FieldMap<'a> {
        self.values
    }

    /// Visit `value` at `path`, dispatching on its shape after one level of
    /// pointer dereference.
    pub(crate) fn visit(
        &mut self,
        path: String,
        value: &'a dyn Walk,
        depth: usize,
    ) -> Result<(), P::Error> {
        self.policy.check(&path, depth)?;

        let shape = match value.shape() {
            Shape::Pointer(Some(target)) => match target.shape() {
                Shape::Struct(shape) => Shape::Struct(shape),
                Shape::Map(_) | Shape::Sequence(_) => {
                    trace!(path = %path, "skipping pointer to collection");
                    return Ok(());
                }
                Shape::Inaccessible => {
                    trace!(path = %path, "ignoring invalid pointer target");
                    return Ok(());
                }
                // Pointers to scalars, pointers and interfaces are leaves; the
                // recorded value is the outer pointer.
                Shape::Scalar(_) | Shape::Pointer(_) | Shape::Interface(_) => {
                    return self.apply_filters(&path, value);
                }
            },
            shape => shape,
        };

        match shape {
            Shape::Struct(shape) => self.visit_struct(path, value, shape, depth),
            Shape::Map(shape) => self.visit_map(path, shape, depth),
            Shape::Sequence(shape) => self.visit_sequence(path, shape, depth),
            Shape::Interface(inner) => self.visit_interface(path, inner, depth),
            Shape::Scalar(_) => self.apply_filters(&path, value),
            Shape::Pointer(_) | Shape::Inaccessible => {
                trace!(path = %path, "ignoring value that cannot be introspected");
                Ok(())
            }
        }
    }

    /// The slot's static type is an interface, so the collection checks have
    /// no element type to go on.
    fn visit_interface(
        &mut self,
        path: String,
        inner: &'a dyn Walk,
        depth: usize,
    ) -> Result<(), P::Error> {
        let collection = match inner.shape() {
            Shape::Map(_) | Shape::Sequence(_) => true,
            Shape::Pointer(Some(target)) => {
                matches!(target.shape(), Shape::Map(_) | Shape::Sequence(_))
            }
            _ => false,
        };
        if collection {
            trace!(path = %path, "skipping collection behind interface");
            return Ok(());
        }

        self.visit(path, inner, depth)
    }

    fn visit_struct(
        &mut self,
        path: String,
        value: &'a dyn Walk,
        shape: StructShape<'a>,
        depth: usize,
    ) -> Result<(), P::Error> {
        let tag = self.tags.get(&path).copied().unwrap_or_default();
        if tag.rule() == TagRule::OmitNested {
            trace!(path = %path, "recording omitnested struct as a leaf");
            return self.apply_filters(&path, value);
        }

        for field in shape.fields() {
            match field.tag().rule() {
                TagRule::Exclude => {
                    trace!(path = %path, field = field.name(), "excluding field");
                }
                TagRule::OmitNested | TagRule::None => {
                    let child = path::join_field(&path, field.name());
                    self.tags.insert(child.clone(), field.tag());
                    self.visit(child, field.value(), depth + 1)?;
                }
            }
        }

        Ok(())
    }

    fn visit_map(
        &mut self,
        path: String,
        shape: MapShape<'a>,
        depth: usize,
    ) -> Result<(), P::Error> {
        if !shape.value_desc().is_walkable_map_value() {
            trace!(path = %path, value = ?shape.value_desc(), "skipping map without struct values");
            return Ok(());
        }

        for (key, entry) in shape.into_entries() {
            self.visit(path::join_key(&path, &key), entry, depth + 1)?;
        }

        Ok(())
    }

    fn visit_sequence(
        &mut self,
        path: String,
        shape: SequenceShape<'a>,
        depth: usize,
    ) -> Result<(), P::Error> {
        if !shape.elem_desc().is_walkable_sequence_elem() {
            trace!(path = %path, elem = ?shape.elem_desc(), "skipping sequence without struct elements");
            return Ok(());
        }

        for (index, item) in shape.into_items().enumerate() {
            self.visit(path::join_index(&path, index), item, depth + 1)?;
        }

        Ok(())
    }

    /// Run every filter on a leaf, recording the field after each one.
    ///
    /// The first filter error aborts the walk.
    fn apply_filters(&mut self, path: &str, value: &'a dyn Walk) -> Result<(), P::Error> {
        if !value.shape().is_valid() {
            return Ok(());
        }

        for filter in self.filters.iter_mut() {
            let tag = self.tags.get(path).copied().unwrap_or_default();
            let field = Field::new(value, tag);

            (**filter)(path, &field).map_err(P::filter_error)?;

            self.values.insert(path, field);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{StructField, TypeDesc};
    use crate::Describe;

    struct Pair {
        left: u32,
        right: String,
    }

    impl Walk for Pair {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(StructShape::new(
                "Pair",
                vec![
                    StructField::new("left", FieldTag::EMPTY, &self.left),
                    StructField::new("right", FieldTag::new("x"), &self.right),
                ],
            ))
        }
    }

    impl Describe for Pair {
        fn describe() -> TypeDesc {
            TypeDesc::Struct("Pair")
        }
    }

    fn walk<'a>(
        value: &'a dyn Walk,
        root: &str,
        max_depth: Option<usize>,
    ) -> Result<FieldMap<'a>, WalkError<()>> {
        let mut record = |_: &str, _: &Field<'_>| Ok::<(), ()>(());
        let mut filters: [&mut FieldFilter<'_, ()>; 1] = [&mut record];
        let mut traverser = Traverser::new(&mut filters, MaxDepth(max_depth));
        traverser.visit(root.to_string(), value, 0)?;
        Ok(traverser.finish())
    }

    #[test]
    fn test_tags_registered_for_leaves() {
        let pair = Pair {
            left: 1,
            right: "r".to_string(),
        };
        let values = walk(&pair, "Pair", None).unwrap();
        assert_eq!(values.paths(), vec!["Pair.left", "Pair.right"]);
        assert_eq!(values.get("Pair.right").unwrap().tag().raw(), "x");
        assert!(values.get("Pair.left").unwrap().tag().is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let pairs = vec![Pair {
            left: 1,
            right: String::new(),
        }];
        let err = walk(&pairs, "", Some(1)).unwrap_err();
        match err {
            WalkError::DepthLimitExceeded {
                path,
                depth,
                max_depth,
            } => {
                assert_eq!(path, "[0].left");
                assert_eq!(depth, 2);
                assert_eq!(max_depth, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(walk(&pairs, "", Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_nil_pointer_is_ignored() {
        let missing: Option<Pair> = None;
        assert!(walk(&missing, "", None).unwrap().is_empty());
    }

    #[test]
    fn test_pointer_to_sequence_is_skipped() {
        let boxed = Box::new(vec![Pair {
            left: 1,
            right: String::new(),
        }]);
        assert!(walk(&boxed, "", None).unwrap().is_empty());
    }

    #[test]
    fn test_pointer_to_nil_pointer_is_a_leaf() {
        let nested: Option<Option<u32>> = Some(None);
        let values = walk(&nested, "", None).unwrap();
        assert_eq!(values.paths(), vec![""]);
        assert!(values.get("").unwrap().scalar().is_none());
    }

    #[test]
    fn test_unbounded_policy_returns_filter_error() {
        let pair = Pair {
            left: 1,
            right: String::new(),
        };
        let mut reject = |path: &str, _: &Field<'_>| Err::<(), String>(path.to_string());
        let mut filters: [&mut FieldFilter<'_, String>; 1] = [&mut reject];
        let mut traverser = Traverser::new(&mut filters, Unbounded);
        let err = traverser.visit("Pair".to_string(), &pair, 0).unwrap_err();
        assert_eq!(err, "Pair.left");
    }
}
