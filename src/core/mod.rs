pub mod container;
pub mod lookup;
pub mod resolver;
pub mod support;

pub use container::{Named, OrderedNamedContainer, Rank};
pub use lookup::CachedLookup;
pub use resolver::{resolve, CompoundName, Resolvable};
pub use support::{field_matches, find_support, FieldRef, Supports};
pub use crate::utils::error::Result;
