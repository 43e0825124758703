//! Named and countable entities, and collections of them keyed by name ignoring case.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

pub trait Named {
    fn name(&self) -> &str;
}

pub trait Countable {
    fn count(&self) -> usize;

    fn increment_count(&mut self, step: usize);

    fn set_count(&mut self, count: usize);
}

/// Key used to compare names, so that `OTU1` and `otu1` are the same name.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Order names ignoring case, falling back to the exact bytes for a stable order.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(&name_key(b)).then_with(|| a.cmp(b))
}

/// Elements with names unique ignoring case, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct NamedCollection<T: Named> {
    elements: Vec<T>,
    index: FxHashMap<String, usize>,
}

impl<T: Named> NamedCollection<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name_key(name))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(&name_key(name)).map(|&i| &self.elements[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(&name_key(name)) {
            Some(&i) => Some(&mut self.elements[i]),
            None => None,
        }
    }

    /// Add an element unless one with the same name is already present.
    ///
    /// Returns the element stored under that name and whether it was inserted.
    pub fn add_unique(&mut self, element: T) -> (&mut T, bool) {
        let name = element.name().to_owned();
        self.get_or_insert_with(&name, || element)
    }

    /// Look up `name`, creating the element with `create` if it is missing.
    pub fn get_or_insert_with(&mut self, name: &str, create: impl FnOnce() -> T) -> (&mut T, bool) {
        use std::collections::hash_map::Entry::*;

        match self.index.entry(name_key(name)) {
            Occupied(e) => (&mut self.elements[*e.get()], false),
            Vacant(e) => {
                e.insert(self.elements.len());
                self.elements.push(create());
                let last = self.elements.len() - 1;
                (&mut self.elements[last], true)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.name())
    }

    /// Elements ordered by name ignoring case.
    pub fn sorted(&self) -> Vec<&T> {
        let mut sorted = self.elements.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| cmp_names(a.name(), b.name()));
        sorted
    }
}

impl<T: Named> Default for NamedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Named> IntoIterator for &'a NamedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
