//! Field directive parsing
//!
//! Struct fields carry a comma-separated directive list under the `structs`
//! attribute key. Two directives are recognized:
//!
//! - `-` excludes the field from the walk entirely
//! - `omitnested` records the field as a single opaque entry
//!
//! Any other token is carried along in the raw tag but has no effect on the walk.

use std::fmt;

/// Directive token that excludes a field
pub const EXCLUDE: &str = "-";
/// Directive token that treats a nested value as a leaf
pub const OMIT_NESTED: &str = "omitnested";

/// Traversal rule derived from a field's directive list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagRule {
    /// No recognized directive: traverse normally
    #[default]
    None,
    /// `-`: never visited, never recorded
    Exclude,
    /// `omitnested`: visited once as an opaque leaf
    OmitNested,
}

/// Metadata attached to a struct field
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldTag {
    raw: &'static str,
}

impl FieldTag {
    /// Tag with no directives
    pub const EMPTY: FieldTag = FieldTag { raw: "" };

    /// Wrap a raw directive list such as `"-"` or `"name,omitnested"`
    pub const fn new(raw: &'static str) -> Self {
        Self { raw }
    }

    /// Raw directive list as written on the field
    pub fn raw(&self) -> &'static str {
        self.raw
    }

    /// True if no directive list was attached
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Iterate the comma-separated tokens
    pub fn directives(&self) -> impl Iterator<Item = &'static str> {
        let raw = self.raw;
        raw.split(',').filter(move |_| !raw.is_empty())
    }

    /// Check membership of a single directive token
    pub fn has(&self, directive: &str) -> bool {
        has_directive(self.raw, directive)
    }

    /// Field must be left out of the walk
    pub fn is_excluded(&self) -> bool {
        self.has(EXCLUDE)
    }

    /// Field must be recorded whole instead of recursed into
    pub fn is_omit_nested(&self) -> bool {
        self.has(OMIT_NESTED)
    }

    /// Collapse the directive list into the rule the traverser applies.
    ///
    /// `-` wins over `omitnested` when both are present, since an excluded
    /// field is never reached.
    pub fn rule(&self) -> TagRule {
        if self.is_excluded() {
            TagRule::Exclude
        } else if self.is_omit_nested() {
            TagRule::OmitNested
        } else {
            TagRule::None
        }
    }
}

impl fmt::Debug for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldTag({:?})", self.raw)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

impl From<&'static str> for FieldTag {
    fn from(raw: &'static str) -> Self {
        Self::new(raw)
    }
}

/// Test whether `directive` is one of the comma-separated tokens in `raw`.
///
/// Tokens are compared exactly, without trimming.
pub fn has_directive(raw: &str, directive: &str) -> bool {
    raw.split(',').any(|token| token == directive)
}
