//! Fetch requests.
//!
//! A `FetchRequest` describes what a results controller should materialize:
//! which entities (predicate), in what order (sort descriptors), grouped how
//! (section key), and with what paging and caching hints.

use crate::sort::SortDescriptor;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

/// Filter closure over an entity.
pub type Predicate<E> = Rc<dyn Fn(&E) -> bool>;

/// Maps an entity to the name of the section it belongs to.
pub type SectionKey<E> = Rc<dyn Fn(&E) -> String>;

/// A description of a live query against an entity store.
pub struct FetchRequest<E> {
    predicate: Option<Predicate<E>>,
    sort_descriptors: Vec<SortDescriptor<E>>,
    batch_size: usize,
    section_key: Option<SectionKey<E>>,
    cache_name: Option<String>,
}

impl<E> FetchRequest<E> {
    /// Creates an unfiltered, unsorted, unsectioned request.
    pub fn new() -> Self {
        Self {
            predicate: None,
            sort_descriptors: Vec::new(),
            batch_size: 0,
            section_key: None,
            cache_name: None,
        }
    }

    /// Restricts the request to entities matching `predicate`.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        self.predicate = Some(Rc::new(predicate));
        self
    }

    /// Restricts the request with an already shared predicate.
    pub fn with_shared_predicate(mut self, predicate: Predicate<E>) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Appends a sort descriptor. Descriptors apply in the order added.
    pub fn sorted_by(mut self, descriptor: SortDescriptor<E>) -> Self {
        self.sort_descriptors.push(descriptor);
        self
    }

    /// Replaces the sort descriptor chain.
    pub fn with_sort_descriptors(mut self, descriptors: Vec<SortDescriptor<E>>) -> Self {
        self.sort_descriptors = descriptors;
        self
    }

    /// Sets the fetch batch size hint. `0` means unbounded.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Groups results into sections named by `key`.
    ///
    /// Entities are grouped by consecutive key values after sorting, so the
    /// leading sort descriptor should order by the same key.
    pub fn sectioned_by<F>(mut self, key: F) -> Self
    where
        F: Fn(&E) -> String + 'static,
    {
        self.section_key = Some(Rc::new(key));
        self
    }

    /// Groups results with an already shared section key.
    pub fn with_shared_section_key(mut self, key: SectionKey<E>) -> Self {
        self.section_key = Some(key);
        self
    }

    /// Names a cache the store may use for section topology.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = Some(name.into());
        self
    }

    /// Returns the predicate, if any.
    pub fn predicate(&self) -> Option<&Predicate<E>> {
        self.predicate.as_ref()
    }

    /// Returns the sort descriptor chain.
    pub fn sort_descriptors(&self) -> &[SortDescriptor<E>] {
        &self.sort_descriptors
    }

    /// Returns the batch size hint. `0` means unbounded.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns true if results are grouped into named sections.
    #[inline]
    pub fn is_sectioned(&self) -> bool {
        self.section_key.is_some()
    }

    /// Returns the cache name, if any.
    pub fn cache_name(&self) -> Option<&str> {
        self.cache_name.as_deref()
    }

    /// Returns true if `entity` satisfies the predicate (or there is none).
    pub fn matches(&self, entity: &E) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(entity),
            None => true,
        }
    }

    /// Compares two entities under the sort descriptor chain.
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        SortDescriptor::compare_all(&self.sort_descriptors, a, b)
    }

    /// Returns the section name for `entity`, or `None` when unsectioned.
    pub fn section_of(&self, entity: &E) -> Option<String> {
        self.section_key.as_ref().map(|key| key(entity))
    }
}

impl<E> Default for FetchRequest<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for FetchRequest<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            sort_descriptors: self.sort_descriptors.clone(),
            batch_size: self.batch_size,
            section_key: self.section_key.clone(),
            cache_name: self.cache_name.clone(),
        }
    }
}

impl<E> fmt::Debug for FetchRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("filtered", &self.predicate.is_some())
            .field("sort_descriptors", &self.sort_descriptors)
            .field("batch_size", &self.batch_size)
            .field("sectioned", &self.section_key.is_some())
            .field("cache_name", &self.cache_name)
            .finish()
    }
}
