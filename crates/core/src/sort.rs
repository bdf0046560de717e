//! Sort descriptors for fetch requests.

use alloc::rc::Rc;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

/// Comparator closure over two entities.
pub type Comparator<E> = Rc<dyn Fn(&E, &E) -> Ordering>;

/// A single sort criterion: a comparator plus a direction.
///
/// Descriptors are applied in sequence; the first one that orders a pair of
/// entities decides. The `key` is a diagnostic label and plays no part in
/// the comparison.
pub struct SortDescriptor<E> {
    key: String,
    compare: Comparator<E>,
    ascending: bool,
}

impl<E> SortDescriptor<E> {
    /// Creates a sort descriptor from a raw comparator.
    ///
    /// The comparator defines the ascending order; a descending descriptor
    /// reverses it.
    pub fn new<F>(key: impl Into<String>, ascending: bool, compare: F) -> Self
    where
        F: Fn(&E, &E) -> Ordering + 'static,
    {
        Self {
            key: key.into(),
            compare: Rc::new(compare),
            ascending,
        }
    }

    /// Creates a sort descriptor that orders by an extracted key.
    pub fn by_key<K, F>(key: impl Into<String>, ascending: bool, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + 'static,
    {
        Self::new(key, ascending, move |a, b| extract(a).cmp(&extract(b)))
    }

    /// Returns the diagnostic label.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns whether this descriptor sorts ascending.
    #[inline]
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Compares two entities under this descriptor.
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        let ordering = (self.compare)(a, b);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }

    /// Compares two entities under a descriptor chain.
    ///
    /// Returns `Ordering::Equal` when the chain is empty or no descriptor
    /// distinguishes the pair; callers that need total order should sort
    /// stably over an already deterministic base order.
    pub fn compare_all(descriptors: &[Self], a: &E, b: &E) -> Ordering {
        for descriptor in descriptors {
            match descriptor.compare(a, b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl<E> Clone for SortDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            compare: Rc::clone(&self.compare),
            ascending: self.ascending,
        }
    }
}

impl<E> fmt::Debug for SortDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("key", &self.key)
            .field("ascending", &self.ascending)
            .finish()
    }
}
