use crate::core::container::{Named, OrderedNamedContainer};
use crate::core::lookup::CachedLookup;

/// Declares which physical column (field within a table) a description maps.
pub trait Supports {
    fn supports(&self, field: &str, table_constraint: &str) -> bool;
}

/// Cache key of a support lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub field: String,
    pub table_constraint: String,
}

impl FieldRef {
    pub fn new(field: &str, table_constraint: &str) -> Self {
        Self {
            field: field.to_string(),
            table_constraint: table_constraint.to_string(),
        }
    }
}

/// Exact match on both stored values; an unset value never matches.
pub fn field_matches(
    stored_field: Option<&str>,
    stored_table: Option<&str>,
    field: &str,
    table_constraint: &str,
) -> bool {
    stored_field == Some(field) && stored_table == Some(table_constraint)
}

/// First child, in insertion order, supporting `(field, table_constraint)`.
pub fn find_support<'a, T: Named + Supports>(
    container: &'a OrderedNamedContainer<T>,
    cache: &CachedLookup<FieldRef>,
    field: &str,
    table_constraint: &str,
) -> Option<&'a T> {
    let key = FieldRef::new(field, table_constraint);
    cache.lookup(
        &key,
        container,
        |child| child.supports(field, table_constraint),
        |children| children.find_rank(|child| child.supports(field, table_constraint)),
    )
}
