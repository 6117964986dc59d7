//! Folding entries into keyed groups.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::entry::Entry;

/// Accumulated values keyed by a group key.
///
/// Keys carry no order in storage; use [`Groups::sorted`] for deterministic
/// iteration.
#[derive(Debug, Clone)]
pub struct Groups<K, V>(HashMap<K, V>);

impl<K, V> Groups<K, V>
where
    K: Ord + Hash,
{
    /// Keys in ascending order.
    pub fn sorted_keys(&self) -> Vec<&K> {
        let mut keys: Vec<&K> = self.0.keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Key/value pairs in ascending key order.
    ///
    /// Sorting happens on every call.
    pub fn sorted(&self) -> impl Iterator<Item = (&K, &V)> {
        self.sorted_keys()
            .into_iter()
            .filter_map(|key| self.0.get_key_value(key))
    }

    /// Value of the group `key`, if any entry mapped to it.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key)
    }

    /// Returns true if any entry mapped to `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.contains_key(key)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> PartialEq for Groups<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K, V> Eq for Groups<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl<K, V> Default for Groups<K, V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K, V> From<HashMap<K, V>> for Groups<K, V> {
    fn from(map: HashMap<K, V>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Groups<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Folds entries into groups.
///
/// For every entry in input order, `key_fn` picks its group and `value_fn`
/// combines the group's current value with the entry. Groups start from
/// `V::default()`. The calls to `value_fn` for one key follow input order, so
/// order-sensitive reducers see a stable sequence.
///
/// Returning the input value unchanged from `value_fn` skips an entry while
/// still registering its key.
pub fn group<K, V, I, KF, VF>(entries: I, mut key_fn: KF, mut value_fn: VF) -> Groups<K, V>
where
    I: IntoIterator<Item = Entry>,
    K: Eq + Hash,
    V: Default,
    KF: FnMut(&Entry) -> K,
    VF: FnMut(V, &Entry) -> V,
{
    let mut groups = HashMap::new();

    for entry in entries {
        let key = key_fn(&entry);
        let current = groups.remove(&key).unwrap_or_default();
        groups.insert(key, value_fn(current, &entry));
    }

    Groups(groups)
}
