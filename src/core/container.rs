use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Anything addressable by its internal name.
pub trait Named {
    fn internal_name(&self) -> &str;
}

/// Insertion counter assigned by a container. Ranks are never reused, even
/// after the child holding one has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u64);

impl Rank {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Children kept in insertion order and indexed by internal name.
///
/// Adding a child whose name is already indexed repoints the index at the new
/// child; the earlier child stays in the ordered sequence but can no longer be
/// reached by name.
///
/// Every mutable access bumps a generation counter, which lookup caches use to
/// tell whether a remembered answer may still hold.
#[derive(Debug, Clone)]
pub struct OrderedNamedContainer<T> {
    children: BTreeMap<Rank, T>,
    names: HashMap<String, Rank>,
    next_rank: u64,
    generation: u64,
}

impl<T> Default for OrderedNamedContainer<T> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            names: HashMap::new(),
            next_rank: 0,
            generation: 0,
        }
    }
}

impl<T: Named> OrderedNamedContainer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, child: T) -> Rank {
        let rank = Rank(self.next_rank);
        self.next_rank += 1;
        self.generation += 1;

        if let Some(previous) = self.names.insert(child.internal_name().to_string(), rank) {
            tracing::debug!(
                "'{}' re-added; rank {} is no longer reachable by name",
                child.internal_name(),
                previous.value()
            );
        }
        self.children.insert(rank, child);
        rank
    }

    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, children: I) {
        for child in children {
            self.add(child);
        }
    }

    /// Removes the child currently indexed under `name`.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let rank = self.names.remove(name)?;
        self.generation += 1;
        self.children.remove(&rank)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.names.get(name).and_then(|rank| self.children.get(rank))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let rank = *self.names.get(name)?;
        self.generation += 1;
        self.children.get_mut(&rank)
    }

    pub fn rank_of(&self, name: &str) -> Option<Rank> {
        self.names.get(name).copied()
    }

    pub fn get_by_rank(&self, rank: Rank) -> Option<&T> {
        self.children.get(&rank)
    }

    /// Rank of the first child, in insertion order, satisfying `predicate`.
    pub fn find_rank<F>(&self, mut predicate: F) -> Option<Rank>
    where
        F: FnMut(&T) -> bool,
    {
        self.children
            .iter()
            .find(|(_, child)| predicate(child))
            .map(|(rank, _)| *rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.children.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.generation += 1;
        self.children.values_mut()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(Named::internal_name).collect()
    }
}

impl<T: Named + Clone> OrderedNamedContainer<T> {
    /// Owned copy of every child in rank order.
    pub fn to_vec(&self) -> Vec<T> {
        self.children.values().cloned().collect()
    }
}

impl<T: Named> FromIterator<T> for OrderedNamedContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut container = Self::new();
        container.add_all(iter);
        container
    }
}

// Equality follows the child sequence; ranks, the name index and the
// generation are bookkeeping and do not participate.
impl<T: PartialEq> PartialEq for OrderedNamedContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.children.len() == other.children.len()
            && self.children.values().eq(other.children.values())
    }
}

impl<T: Eq> Eq for OrderedNamedContainer<T> {}

impl<T: Hash> Hash for OrderedNamedContainer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.children.len());
        for child in self.children.values() {
            child.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Item {
        name: String,
        payload: u32,
    }

    impl Item {
        fn new(name: &str, payload: u32) -> Self {
            Self {
                name: name.to_string(),
                payload,
            }
        }
    }

    impl Named for Item {
        fn internal_name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut container = OrderedNamedContainer::new();
        container.add(Item::new("zeta", 1));
        container.add(Item::new("alpha", 2));
        container.add_all(vec![Item::new("mid", 3), Item::new("beta", 4)]);

        assert_eq!(container.names(), vec!["zeta", "alpha", "mid", "beta"]);
        assert!(container.contains("mid"));
        assert_eq!(container.get("beta").unwrap().payload, 4);
        assert_eq!(container.len(), 4);
    }

    #[test]
    fn test_ranks_are_not_reused_after_removal() {
        let mut container = OrderedNamedContainer::new();
        let first = container.add(Item::new("a", 1));
        container.add(Item::new("b", 2));

        let removed = container.remove("a").unwrap();
        assert_eq!(removed.payload, 1);
        assert!(!container.contains("a"));

        let again = container.add(Item::new("a", 3));
        assert!(again > first);
        assert_eq!(container.names(), vec!["b", "a"]);
        assert!(container.remove("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_keeps_old_child_in_sequence() {
        let mut container = OrderedNamedContainer::new();
        container.add(Item::new("dup", 1));
        container.add(Item::new("other", 2));
        container.add(Item::new("dup", 3));

        assert_eq!(container.len(), 3);
        assert_eq!(container.get("dup").unwrap().payload, 3);
        let payloads: Vec<u32> = container.iter().map(|i| i.payload).collect();
        assert_eq!(payloads, vec![1, 2, 3]);

        // removal only reaches the indexed child
        container.remove("dup");
        assert_eq!(container.len(), 2);
        assert!(!container.contains("dup"));
        assert_eq!(container.iter().next().unwrap().payload, 1);
    }

    #[test]
    fn test_to_vec_is_a_detached_copy() {
        let mut container: OrderedNamedContainer<Item> =
            vec![Item::new("a", 1), Item::new("b", 2)].into_iter().collect();

        let mut copy = container.to_vec();
        copy[0].payload = 99;
        copy.clear();

        assert_eq!(container.get("a").unwrap().payload, 1);
        let before = container.generation();
        container.get_mut("a").unwrap().payload = 7;
        assert_eq!(container.get("a").unwrap().payload, 7);
        assert!(container.generation() > before);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: OrderedNamedContainer<Item> =
            vec![Item::new("x", 1), Item::new("y", 2)].into_iter().collect();
        let b: OrderedNamedContainer<Item> =
            vec![Item::new("x", 1), Item::new("y", 2)].into_iter().collect();
        let reordered: OrderedNamedContainer<Item> =
            vec![Item::new("y", 2), Item::new("x", 1)].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, reordered);
    }

    #[test]
    fn test_find_rank_returns_first_match() {
        let container: OrderedNamedContainer<Item> = vec![
            Item::new("a", 5),
            Item::new("b", 10),
            Item::new("c", 10),
        ]
        .into_iter()
        .collect();

        let rank = container.find_rank(|i| i.payload == 10).unwrap();
        assert_eq!(container.get_by_rank(rank).unwrap().name, "b");
        assert_eq!(container.rank_of("b"), Some(rank));
        assert!(container.find_rank(|i| i.payload == 0).is_none());
    }
}
