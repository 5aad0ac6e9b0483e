//! Path construction
//!
//! Paths follow `Root(.FieldName)*([key])*`: the root struct's type name, then
//! `.name` for struct fields and `[key]` / `[index]` for map entries and
//! sequence elements.

/// Path of a struct field
pub fn join_field(parent: &str, name: &str) -> String {
    let mut path = String::with_capacity(parent.len() + name.len() + 1);
    path.push_str(parent);
    path.push('.');
    path.push_str(name);
    path
}

/// Path of a map entry
pub fn join_key(parent: &str, key: &str) -> String {
    let mut path = String::with_capacity(parent.len() + key.len() + 2);
    path.push_str(parent);
    path.push('[');
    path.push_str(key);
    path.push(']');
    path
}

/// Path of a sequence element
pub fn join_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
