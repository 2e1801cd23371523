//! Resolution of possibly compound filter names against a collection.
//!
//! A plain name matches a child by its own internal name or by one of the
//! child's direct options. A compound name `x.y` addresses option `y` pushed by
//! option `x`; if some child is itself named `y`, that child wins outright.
//! Names with more than one separator are rejected and never match.

use crate::core::container::{Named, OrderedNamedContainer, Rank};
use crate::core::lookup::CachedLookup;

/// Capabilities the resolver needs from the children it scans.
pub trait Resolvable: Named {
    /// True iff `name` is a direct (one level deep) option of this child.
    fn contains_option(&self, _name: &str) -> bool {
        false
    }

    /// True iff direct option `option` has a push action offering `pushed`.
    fn pushes_option(&self, _option: &str, _pushed: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundName<'a> {
    Simple(&'a str),
    Qualified { outer: &'a str, inner: &'a str },
    Malformed,
}

impl<'a> CompoundName<'a> {
    /// A leading or trailing separator leaves the name plain.
    pub fn parse(name: &'a str) -> Self {
        match name.find('.') {
            Some(idx) if idx > 0 && !name.ends_with('.') => {
                let (outer, inner) = (&name[..idx], &name[idx + 1..]);
                if inner.contains('.') {
                    CompoundName::Malformed
                } else {
                    CompoundName::Qualified { outer, inner }
                }
            }
            _ => CompoundName::Simple(name),
        }
    }

    /// Whether `child` answers this name on its own.
    pub fn matches<T: Resolvable>(&self, child: &T) -> bool {
        match *self {
            CompoundName::Simple(name) => {
                child.internal_name() == name || child.contains_option(name)
            }
            CompoundName::Qualified { outer, inner } => {
                child.internal_name() == inner || child.pushes_option(outer, inner)
            }
            CompoundName::Malformed => false,
        }
    }

    fn search<T: Resolvable>(&self, container: &OrderedNamedContainer<T>) -> Option<Rank> {
        match *self {
            CompoundName::Simple(_) => container.find_rank(|child| self.matches(child)),
            CompoundName::Qualified { outer, inner } => container
                .find_rank(|child| child.internal_name() == inner)
                .or_else(|| container.find_rank(|child| child.pushes_option(outer, inner))),
            CompoundName::Malformed => None,
        }
    }
}

/// Resolve `name` to the top-level child of `container` that answers it.
pub fn resolve<'a, T: Resolvable>(
    container: &'a OrderedNamedContainer<T>,
    cache: &CachedLookup<String>,
    name: &str,
) -> Option<&'a T> {
    let compound = CompoundName::parse(name);
    if compound == CompoundName::Malformed {
        tracing::debug!("'{}' has more than one '.' and cannot be resolved", name);
        cache.clear();
        return None;
    }

    cache.lookup(
        name,
        container,
        |child| compound.matches(child),
        |children| compound.search(children),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Desc {
        name: &'static str,
        options: Vec<&'static str>,
        pushes: Vec<(&'static str, &'static str)>,
    }

    impl Named for Desc {
        fn internal_name(&self) -> &str {
            self.name
        }
    }

    impl Resolvable for Desc {
        fn contains_option(&self, name: &str) -> bool {
            self.options.contains(&name)
        }

        fn pushes_option(&self, option: &str, pushed: &str) -> bool {
            self.pushes.iter().any(|(o, p)| *o == option && *p == pushed)
        }
    }

    fn desc(name: &'static str) -> Desc {
        Desc {
            name,
            options: vec![],
            pushes: vec![],
        }
    }

    #[test]
    fn test_parse_compound_names() {
        assert_eq!(CompoundName::parse("gene"), CompoundName::Simple("gene"));
        assert_eq!(
            CompoundName::parse("x.y"),
            CompoundName::Qualified {
                outer: "x",
                inner: "y"
            }
        );
        assert_eq!(CompoundName::parse("x."), CompoundName::Simple("x."));
        assert_eq!(CompoundName::parse(".x"), CompoundName::Simple(".x"));
        assert_eq!(CompoundName::parse("a.b.c"), CompoundName::Malformed);
        assert_eq!(CompoundName::parse("a..b"), CompoundName::Malformed);
    }

    #[test]
    fn test_plain_name_matches_option_holder() {
        let mut holder = desc("chromosome");
        holder.options = vec!["chr1", "chr2"];
        let children: OrderedNamedContainer<Desc> = vec![desc("gene"), holder].into_iter().collect();
        let cache = CachedLookup::new();

        assert_eq!(resolve(&children, &cache, "chr2").unwrap().name, "chromosome");
        assert_eq!(resolve(&children, &cache, "gene").unwrap().name, "gene");
        assert!(resolve(&children, &cache, "chr3").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_inner_name_takes_precedence() {
        let mut pusher = desc("b");
        pusher.options = vec!["x"];
        pusher.pushes = vec![("x", "y"), ("x", "y2")];
        let children: OrderedNamedContainer<Desc> = vec![pusher, desc("y")].into_iter().collect();
        let cache = CachedLookup::new();

        assert_eq!(resolve(&children, &cache, "x.y").unwrap().name, "y");
        assert_eq!(resolve(&children, &cache, "x.y2").unwrap().name, "b");
    }

    #[test]
    fn test_trailing_separator_is_plain() {
        let children: OrderedNamedContainer<Desc> = vec![desc("odd.")].into_iter().collect();
        let cache = CachedLookup::new();
        assert_eq!(resolve(&children, &cache, "odd.").unwrap().name, "odd.");
    }

    #[test]
    fn test_multiple_separators_never_match() {
        let children: OrderedNamedContainer<Desc> = vec![desc("c")].into_iter().collect();
        let cache = CachedLookup::new();
        assert!(resolve(&children, &cache, "a.b.c").is_none());
    }
}
