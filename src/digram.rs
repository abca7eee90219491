use crate::symbol::Fingerprint;
use ahash::AHashMap as HashMap;
use slotmap::DefaultKey;
use std::hash::Hash;

/// Key of a digram: the ordered fingerprint pair of two adjacent symbols.
pub(crate) type DigramKey<T> = (Fingerprint<T>, Fingerprint<T>);

/// Maps each digram to the left symbol of its recorded occurrence.
///
/// One instance per engine. The map holds non-owning keys into the symbol
/// arena; every symbol-removal path scrubs its entry through [`remove_if`]
/// before the symbol goes away.
///
/// [`remove_if`]: DigramIndex::remove_if
#[derive(Debug)]
pub(crate) struct DigramIndex<T> {
    map: HashMap<DigramKey<T>, DefaultKey>,
}

impl<T: Hash + Eq> DigramIndex<T> {
    pub(crate) fn new() -> Self {
        Self {
            map: HashMap::default(),
        }
    }

    /// The recorded left symbol for `key`, if any.
    #[inline]
    pub(crate) fn get(&self, key: &DigramKey<T>) -> Option<DefaultKey> {
        self.map.get(key).copied()
    }

    /// Records `left` as the occurrence of `key`, overwriting any prior
    /// entry. Prior occurrences are resolved before this is called.
    #[inline]
    pub(crate) fn insert(&mut self, key: DigramKey<T>, left: DefaultKey) {
        self.map.insert(key, left);
    }

    /// Removes the entry for `key` only if it still points at `left`.
    ///
    /// A fresher occurrence may have overwritten the slot; cleanup for an
    /// older occurrence must not clobber it.
    #[inline]
    pub(crate) fn remove_if(&mut self, key: &DigramKey<T>, left: DefaultKey) {
        if self.map.get(key) == Some(&left) {
            self.map.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&DigramKey<T>, DefaultKey)> {
        self.map.iter().map(|(k, &v)| (k, v))
    }
}
