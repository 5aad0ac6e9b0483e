//! Procedural macros for structx
//!
//! This crate provides `#[derive(Walk)]`, which implements `structx::Walk` and
//! `structx::Describe` for a struct so it can be flattened with
//! `structx::iterate_object`.

use proc_macro::TokenStream;

mod walk;

/// Derive `Walk` and `Describe` for a struct.
///
/// Public fields are visited in declaration order. Non-public fields are
/// reported as inaccessible and never recorded; their types do not need to
/// implement `Walk`.
///
/// # Attributes
///
/// - `#[structs(skip)]` or `#[structs("-")]` - Exclude the field from the walk
/// - `#[structs(omitnested)]` - Record the field as one entry instead of
///   visiting its members
/// - `#[structs("name,omitnested")]` - Raw directive list, kept verbatim in the
///   field's tag
/// - `#[structs(rename = "Name")]` - Path segment to use instead of the field name
///
/// # Example
///
/// ```ignore
/// #[derive(Walk)]
/// pub struct Config {
///     pub name: String,
///     #[structs(omitnested)]
///     pub listen: SocketConfig,
///     #[structs(skip)]
///     pub secret: String,
/// }
/// ```
#[proc_macro_derive(Walk, attributes(structs))]
pub fn derive_walk(input: TokenStream) -> TokenStream {
    walk::derive_walk_impl(input)
}
