//! structx - Path-keyed field iteration
//!
//! Walks a nested value (structs, maps, sequences and scalars) and flattens it
//! into a map from a readable path such as `Config.servers[eu][0].host` to the
//! visited value and the directives of the field it was declared on.
//!
//! - Values describe their shape through [`Walk`] and [`Describe`], usually
//!   generated with `#[derive(Walk)]`
//! - Fields carry `#[structs(...)]` directives: `-` excludes a field,
//!   `omitnested` records a nested struct as one opaque entry
//! - Caller-supplied filters run on every leaf; the first filter error aborts
//!   the walk and discards everything recorded so far
//!
//! ```ignore
//! use structx::{iterate_object, Field, Walk};
//!
//! #[derive(Walk)]
//! pub struct Config {
//!     pub name: String,
//!     #[structs(skip)]
//!     pub password: String,
//! }
//!
//! let config = Config { name: "svc".into(), password: "hunter2".into() };
//! let mut log = |path: &str, field: &Field<'_>| {
//!     println!("{} = {:?}", path, field.to_json());
//!     Ok::<(), std::convert::Infallible>(())
//! };
//! let mut filters: [&mut structx::FieldFilter<'_, std::convert::Infallible>; 1] = [&mut log];
//! let fields = iterate_object(&config, &mut filters).unwrap();
//! assert!(fields.contains("Config.name"));
//! assert!(!fields.contains("Config.password"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate self as structx;

pub mod error;
pub mod field;
mod impls;
pub mod path;
pub mod shape;
pub mod tag;
mod traverse;

use std::convert::Infallible;

use tracing::debug;

pub use error::{FieldError, FieldResult, WalkError};
pub use field::{Field, FieldMap};
pub use shape::{
    Describe, Inaccessible, MapShape, Scalar, SequenceShape, Shape, StructField, StructShape,
    TypeDesc, Walk,
};
pub use tag::{FieldTag, TagRule};

#[cfg(feature = "derive")]
pub use structx_derive::Walk;

use traverse::{DepthPolicy, MaxDepth, Traverser, Unbounded};

/// Filter invoked on every recorded field with its path
pub type FieldFilter<'f, E> = dyn FnMut(&str, &Field<'_>) -> Result<(), E> + 'f;

/// Walk options
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Maximum nesting depth below the root (root is depth 0). `None` walks
    /// without a bound.
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    /// Options with a depth bound
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

/// Walk `value` and run `filters` on every leaf.
///
/// Returns the recorded fields keyed by path, or the first filter error
/// unchanged. With no filters nothing is recorded.
pub fn iterate_object<'a, E>(
    value: &'a dyn Walk,
    filters: &mut [&mut FieldFilter<'_, E>],
) -> Result<FieldMap<'a>, E> {
    walk(value, Unbounded, filters)
}

/// Walk `value` with explicit options.
pub fn iterate_object_with<'a, E>(
    value: &'a dyn Walk,
    options: &WalkOptions,
    filters: &mut [&mut FieldFilter<'_, E>],
) -> Result<FieldMap<'a>, WalkError<E>> {
    walk(value, MaxDepth(options.max_depth), filters)
}

fn walk<'a, E, P: DepthPolicy<E>>(
    value: &'a dyn Walk,
    policy: P,
    filters: &mut [&mut FieldFilter<'_, E>],
) -> Result<FieldMap<'a>, P::Error> {
    // The root is handed over by value, never through an interface slot.
    let mut value = value;
    while let Shape::Interface(inner) = value.shape() {
        value = inner;
    }

    let root = match value.shape() {
        Shape::Inaccessible => return Ok(FieldMap::default()),
        Shape::Pointer(Some(target)) => target.shape(),
        shape => shape,
    };
    let root_path = match &root {
        Shape::Struct(shape) => shape.name().to_string(),
        _ => String::new(),
    };

    let mut traverser = Traverser::new(filters, policy);
    traverser.visit(root_path.clone(), value, 0)?;
    let values = traverser.finish();

    debug!(root = %root_path, entries = values.len(), "walk complete");
    Ok(values)
}

/// Record every leaf of `value` without filtering.
pub fn fields(value: &dyn Walk) -> FieldMap<'_> {
    let mut record = |_: &str, _: &Field<'_>| Ok::<(), Infallible>(());
    let mut filters: [&mut FieldFilter<'_, Infallible>; 1] = [&mut record];
    match iterate_object(value, &mut filters) {
        Ok(values) => values,
        Err(never) => match never {},
    }
}

/// Builder for walks with owned filters
pub struct Walker<'f, E> {
    filters: Vec<Box<FieldFilter<'f, E>>>,
    options: WalkOptions,
}

impl<'f, E> Walker<'f, E> {
    /// Walker with no filters and no depth bound
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            options: WalkOptions::default(),
        }
    }

    /// Append a filter; filters run in the order they were added
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: FnMut(&str, &Field<'_>) -> Result<(), E> + 'f,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Replace the walk options
    pub fn options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Bound the nesting depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    /// Number of registered filters
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Walk `value` through the registered filters
    pub fn iterate<'a>(&mut self, value: &'a dyn Walk) -> Result<FieldMap<'a>, WalkError<E>> {
        let mut filters: Vec<&mut FieldFilter<'f, E>> =
            self.filters.iter_mut().map(|filter| &mut **filter).collect();
        iterate_object_with(value, &self.options, &mut filters)
    }
}

impl<E> Default for Walker<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::*;

    #[derive(Walk)]
    pub struct Endpoint {
        pub host: String,
        pub port: u16,
    }

    #[derive(Walk)]
    pub struct Service {
        pub name: String,
        #[structs(omitnested)]
        pub primary: Endpoint,
        pub replicas: Vec<Endpoint>,
    }

    fn service() -> Service {
        Service {
            name: "api".to_string(),
            primary: Endpoint {
                host: "a".to_string(),
                port: 80,
            },
            replicas: vec![Endpoint {
                host: "b".to_string(),
                port: 81,
            }],
        }
    }

    #[test]
    fn test_fields_records_every_leaf() {
        let svc = service();
        let values = fields(&svc);
        assert_eq!(
            values.paths(),
            vec![
                "Service.name",
                "Service.primary",
                "Service.replicas[0].host",
                "Service.replicas[0].port",
            ]
        );
        assert_eq!(values.get_as::<u16>("Service.replicas[0].port").unwrap(), &81);
    }

    #[test]
    fn test_walker_runs_filters_in_order() {
        let svc = service();
        let mut order = Vec::new();
        let mut walker = Walker::<Infallible>::new()
            .filter(|path, _| {
                order.push(format!("first:{}", path));
                Ok(())
            });
        walker.iterate(&svc).unwrap();
        drop(walker);
        assert_eq!(order.len(), 4);
        assert!(order.iter().all(|entry| entry.starts_with("first:")));
    }

    #[test]
    fn test_walker_depth_bound() {
        let svc = service();
        let mut walker = Walker::<Infallible>::new()
            .filter(|_, _| Ok(()))
            .max_depth(1);
        let err = walker.iterate(&svc).unwrap_err();
        assert!(matches!(err, WalkError::DepthLimitExceeded { depth: 2, .. }));
    }

    #[test]
    fn test_walker_without_filters_records_nothing() {
        let svc = service();
        let mut walker = Walker::<Infallible>::new();
        assert_eq!(walker.filter_count(), 0);
        assert!(walker.iterate(&svc).unwrap().is_empty());
    }
}
