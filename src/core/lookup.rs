use crate::core::container::{Named, OrderedNamedContainer, Rank};
use std::borrow::Borrow;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};

/// Single-slot memo of the last successful lookup against one container.
///
/// The slot remembers the query key, the container generation, and the rank
/// of the child it produced. A later query is served from the slot only when
/// the key and generation are unchanged and the caller's re-validation
/// predicate still holds for the ranked child; anything else empties the slot
/// and searches again.
///
/// Uses `RefCell`, so containers holding one are `Send` but not `Sync`.
#[derive(Debug)]
pub struct CachedLookup<K> {
    slot: RefCell<Option<Slot<K>>>,
}

#[derive(Debug)]
struct Slot<K> {
    key: K,
    generation: u64,
    rank: Rank,
}

impl<K> Default for CachedLookup<K> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<K> CachedLookup<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    pub fn cached_rank(&self) -> Option<Rank> {
        self.slot.borrow().as_ref().map(|slot| slot.rank)
    }
}

impl<K> CachedLookup<K> {
    pub fn lookup<'a, T, Q, V, S>(
        &self,
        key: &Q,
        container: &'a OrderedNamedContainer<T>,
        still_matches: V,
        search: S,
    ) -> Option<&'a T>
    where
        T: Named,
        Q: ?Sized + PartialEq + ToOwned<Owned = K>,
        K: Borrow<Q>,
        V: Fn(&T) -> bool,
        S: FnOnce(&OrderedNamedContainer<T>) -> Option<Rank>,
    {
        let cached = self
            .slot
            .borrow()
            .as_ref()
            .filter(|slot| {
                slot.generation == container.generation()
                    && <K as Borrow<Q>>::borrow(&slot.key) == key
            })
            .and_then(|slot| container.get_by_rank(slot.rank))
            .filter(|child| still_matches(child));

        if let Some(child) = cached {
            tracing::trace!("lookup cache hit on '{}'", child.internal_name());
            return Some(child);
        }

        self.clear();
        let rank = search(container)?;
        *self.slot.borrow_mut() = Some(Slot {
            key: key.to_owned(),
            generation: container.generation(),
            rank,
        });
        container.get_by_rank(rank)
    }
}

// The slot is transient lookup state: a cloned owner starts cold, and the
// slot never takes part in equality or hashing of its owner.
impl<K> Clone for CachedLookup<K> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<K> PartialEq for CachedLookup<K> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<K> Eq for CachedLookup<K> {}

impl<K> Hash for CachedLookup<K> {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}
