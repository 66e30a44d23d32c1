use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use super::input::{Key, KeySet};

/// Key-combination to action mapping as exposed by an environment.
///
/// Combinations are normalized (sorted, deduplicated) on insert, so `[W, A]`
/// and `[A, W]` address the same entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysToAction<A> {
    entries: BTreeMap<Vec<Key>, A>,
}

impl<A> Default for KeysToAction<A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<A> KeysToAction<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the action previously bound to the same combination, if any.
    pub fn insert(&mut self, keys: impl IntoIterator<Item = Key>, action: A) -> Option<A> {
        self.entries.insert(normalize_combo(keys), action)
    }

    pub fn get(&self, keys: &[Key]) -> Option<&A> {
        self.entries.get(keys)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Key], &A)> {
        self.entries.iter().map(|(keys, action)| (keys.as_slice(), action))
    }

    /// Every key used by at least one combination.
    pub fn relevant_keys(&self) -> BTreeSet<Key> {
        self.entries.keys().flatten().copied().collect()
    }
}

impl<A, K> FromIterator<(K, A)> for KeysToAction<A>
where
    K: IntoIterator<Item = Key>,
{
    fn from_iter<T: IntoIterator<Item = (K, A)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (keys, action) in iter {
            let combo = normalize_combo(keys);
            if mapping.entries.insert(combo.clone(), action).is_some() {
                warn!(keys = ?combo, "duplicate key combination; last binding wins");
            }
        }
        mapping
    }
}

fn normalize_combo(keys: impl IntoIterator<Item = Key>) -> Vec<Key> {
    let mut combo: Vec<Key> = keys.into_iter().collect();
    combo.sort_unstable();
    combo.dedup();
    combo
}

/// Resolves held keys to an action; built once per session.
#[derive(Debug, Clone)]
pub struct ActionTable<A> {
    mapping: KeysToAction<A>,
    no_op: A,
    relevant_keys: BTreeSet<Key>,
}

impl<A: Clone> ActionTable<A> {
    pub fn new(mapping: KeysToAction<A>, no_op: A) -> Self {
        let relevant_keys = mapping.relevant_keys();
        Self {
            mapping,
            no_op,
            relevant_keys,
        }
    }

    pub fn relevant_keys(&self) -> &BTreeSet<Key> {
        &self.relevant_keys
    }

    pub fn no_op(&self) -> &A {
        &self.no_op
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn resolve(&self, keys: &KeySet) -> A {
        self.resolve_combo(&keys.sorted())
    }

    /// Unmapped combinations fall back to the no-op action.
    pub fn resolve_combo(&self, keys: &[Key]) -> A {
        let combo = normalize_combo(keys.iter().copied());
        self.mapping
            .get(&combo)
            .unwrap_or(&self.no_op)
            .clone()
    }
}
