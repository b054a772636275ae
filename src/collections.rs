use indexmap::map;
use indexmap::IndexMap;


// A String-keyed mapping that remembers first-insertion order.
//
// Key order is observable here: argument lists render left to right,
// and the compiler pops children in declaration order. Updating an
// existing key replaces the value but keeps the original position.
#[derive(Clone, Debug)]
pub struct OrdMap<V> {
    inner: IndexMap<String, V>,
}


impl<V> OrdMap<V> {
    pub fn new() -> OrdMap<V> {
        OrdMap { inner: IndexMap::new() }
    }

    pub fn from_list(pairs: Vec<(&str, V)>) -> OrdMap<V> {
        let mut out = OrdMap::new();
        for (key, val) in pairs {
            out.insert(key, val);
        }
        out
    }

    pub fn insert(&mut self, key: &str, value: V) {
        self.inner.insert(String::from(key), value);
    }

    // Builder-style variants, so construction chains read like data.
    pub fn add(mut self, key: &str, value: V) -> OrdMap<V> {
        self.insert(key, value);
        self
    }

    pub fn discard(mut self, key: &str) -> OrdMap<V> {
        self.inner.shift_remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> map::Keys<String, V> {
        self.inner.keys()
    }

    pub fn values(&self) -> map::Values<String, V> {
        self.inner.values()
    }

    pub fn values_mut(&mut self) -> map::ValuesMut<String, V> {
        self.inner.values_mut()
    }

    pub fn iter(&self) -> map::Iter<String, V> {
        self.inner.iter()
    }
}


impl<V: Clone> OrdMap<V> {
    pub fn merge(mut self, other: &OrdMap<V>) -> OrdMap<V> {
        for (key, val) in other.iter() {
            self.inner.insert(key.clone(), val.clone());
        }
        self
    }

    pub fn slice(&self, start: usize, end: usize) -> OrdMap<V> {
        let mut out = OrdMap::new();
        for (key, val) in self.iter().skip(start).take(end.saturating_sub(start)) {
            out.insert(key, val.clone());
        }
        out
    }
}


impl<V> Default for OrdMap<V> {
    fn default() -> OrdMap<V> {
        OrdMap::new()
    }
}


impl<V> IntoIterator for OrdMap<V> {
    type Item = (String, V);
    type IntoIter = map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}


// IndexMap equality is order-blind; ours is not. Two maps are equal
// only when their (key, value) sequences match pairwise.
impl<V: PartialEq> PartialEq for OrdMap<V> {
    fn eq(&self, other: &OrdMap<V>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}
