//! Ordered, duplicate-free collection with batched change events.
//!
//! [`ObservableCollection`] is what owns the nodes and connections of a
//! [`Network`](crate::Network) and the connectors of a [`Node`](crate::Node).
//! Every mutating call reports its effect as at most one
//! [`items_removed`](ObservableCollection::items_removed) batch followed by
//! at most one [`items_added`](ObservableCollection::items_added) batch, never
//! one event per item. Cascade handlers downstream (parent back-references,
//! connection detachment) therefore see a whole bulk edit at once.
//!
//! The collection also implements [`slint::Model`], so the rendering layer
//! can bind it directly (typically through `ModelExt::map`).
//!
//! # Example
//!
//! ```
//! use slint_node_network::ObservableCollection;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let names: ObservableCollection<&'static str> = ObservableCollection::new();
//! let batches = Rc::new(RefCell::new(Vec::new()));
//! names.items_added().subscribe({
//!     let batches = batches.clone();
//!     move |added: &[&'static str]| batches.borrow_mut().push(added.to_vec())
//! });
//!
//! names.extend(["in", "out", "aux"]);
//! assert_eq!(*batches.borrow(), vec![vec!["in", "out", "aux"]]);
//! ```

use crate::event::Event;
use slint::{Model, ModelNotify, ModelRc, ModelTracker};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct CollectionInner<T> {
    items: RefCell<Vec<T>>,
    items_added: Event<[T]>,
    items_removed: Event<[T]>,
    notify: ModelNotify,
}

/// Shared handle to an ordered set of items.
///
/// Cloning the handle shares the underlying collection. Items are compared
/// with `PartialEq`; the model's handle types compare by identity, so a node
/// or connector can appear at most once.
///
/// Inserting an item that is already present is a no-op (`push` and
/// `insert` return `false`), as is removing an item that is absent.
pub struct ObservableCollection<T> {
    inner: Rc<CollectionInner<T>>,
}

impl<T> Clone for ObservableCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                items: RefCell::new(Vec::new()),
                items_added: Event::new(),
                items_removed: Event::new(),
                notify: ModelNotify::default(),
            }),
        }
    }
}

impl<T> ObservableCollection<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired once per mutation with every item that was added.
    pub fn items_added(&self) -> &Event<[T]> {
        &self.inner.items_added
    }

    /// Fired once per mutation with every item that was removed.
    pub fn items_removed(&self) -> &Event<[T]> {
        &self.inner.items_removed
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.items.borrow().contains(item)
    }

    /// Index of `item`, if present.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.inner.items.borrow().iter().position(|i| i == item)
    }

    /// Copy of the current contents in insertion order.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Iterate over a snapshot of the contents.
    ///
    /// The snapshot is taken up front, so the loop body may mutate the
    /// collection without invalidating the iteration.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Append `item`. Returns `false` (and fires nothing) if already present.
    pub fn push(&self, item: T) -> bool {
        let index = self.len();
        self.insert(index, item)
    }

    /// Insert `item` at `index` (clamped to the length).
    /// Returns `false` (and fires nothing) if already present.
    pub fn insert(&self, index: usize, item: T) -> bool {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            if items.contains(&item) {
                return false;
            }
            let index = index.min(items.len());
            items.insert(index, item.clone());
            index
        };
        self.inner.notify.row_added(index, 1);
        tracing::trace!(index, "collection item inserted");
        self.inner.items_added.emit(std::slice::from_ref(&item));
        true
    }

    /// Append every item not already present, firing a single added batch.
    /// Returns the number of items actually added.
    pub fn extend<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let (start, added) = {
            let mut current = self.inner.items.borrow_mut();
            let start = current.len();
            let mut added = Vec::new();
            for item in items {
                if !current.contains(&item) {
                    current.push(item.clone());
                    added.push(item);
                }
            }
            (start, added)
        };
        if added.is_empty() {
            return 0;
        }
        self.inner.notify.row_added(start, added.len());
        tracing::trace!(count = added.len(), "collection items added");
        self.inner.items_added.emit(&added);
        added.len()
    }

    /// Remove `item`. Returns `false` (and fires nothing) if absent.
    pub fn remove(&self, item: &T) -> bool {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            match items.iter().position(|i| i == item) {
                Some(index) => (index, items.remove(index)),
                None => return false,
            }
        };
        self.inner.notify.row_removed(removed.0, 1);
        tracing::trace!(index = removed.0, "collection item removed");
        self.inner.items_removed.emit(std::slice::from_ref(&removed.1));
        true
    }

    /// Remove every listed item that is present, firing a single removed
    /// batch (in collection order). Returns the number of items removed.
    pub fn remove_all<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let targets: Vec<T> = items.into_iter().collect();
        let (indices, removed) = {
            let mut current = self.inner.items.borrow_mut();
            let indices: Vec<usize> = current
                .iter()
                .enumerate()
                .filter(|(_, item)| targets.contains(item))
                .map(|(index, _)| index)
                .collect();
            let mut removed = Vec::with_capacity(indices.len());
            for &index in indices.iter().rev() {
                removed.push(current.remove(index));
            }
            removed.reverse();
            (indices, removed)
        };
        if removed.is_empty() {
            return 0;
        }
        self.notify_removed_rows(&indices);
        tracing::trace!(count = removed.len(), "collection items removed");
        self.inner.items_removed.emit(&removed);
        removed.len()
    }

    /// Remove everything, firing a single removed batch.
    /// Returns the number of items removed.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.inner.items.borrow_mut());
        if removed.is_empty() {
            return 0;
        }
        self.inner.notify.row_removed(0, removed.len());
        tracing::trace!(count = removed.len(), "collection cleared");
        self.inner.items_removed.emit(&removed);
        removed.len()
    }

    /// Replace the whole contents (duplicates in `items` are dropped).
    ///
    /// Only the difference is reported: items that were present before and
    /// after are in neither batch. Removed fires before added. Replacing the
    /// contents with the same items in the same order does nothing.
    pub fn replace<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut next: Vec<T> = Vec::new();
        for item in items {
            if !next.contains(&item) {
                next.push(item);
            }
        }
        let (removed, added) = {
            let mut current = self.inner.items.borrow_mut();
            if *current == next {
                return;
            }
            let removed: Vec<T> = current
                .iter()
                .filter(|item| !next.contains(item))
                .cloned()
                .collect();
            let added: Vec<T> = next
                .iter()
                .filter(|item| !current.contains(item))
                .cloned()
                .collect();
            *current = next;
            (removed, added)
        };
        self.inner.notify.reset();
        tracing::trace!(
            removed = removed.len(),
            added = added.len(),
            "collection replaced"
        );
        if !removed.is_empty() {
            self.inner.items_removed.emit(&removed);
        }
        if !added.is_empty() {
            self.inner.items_added.emit(&added);
        }
    }

    /// Wrap this collection for a Slint `[T]` property.
    pub fn model(&self) -> ModelRc<T> {
        ModelRc::new(self.clone())
    }

    /// Report removed rows (ascending original indices) to Slint, highest
    /// run first so every reported index is still valid when it arrives.
    fn notify_removed_rows(&self, indices: &[usize]) {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for &index in indices {
            match runs.last_mut() {
                Some((start, count)) if *start + *count == index => *count += 1,
                _ => runs.push((index, 1)),
            }
        }
        for &(start, count) in runs.iter().rev() {
            self.inner.notify.row_removed(start, count);
        }
    }
}

impl<T> Model for ObservableCollection<T>
where
    T: Clone + 'static,
{
    type Data = T;

    fn row_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    fn row_data(&self, row: usize) -> Option<T> {
        self.inner.items.borrow().get(row).cloned()
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.inner.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every batch delivered by a collection's events.
    struct Batches {
        added: Rc<RefCell<Vec<Vec<i32>>>>,
        removed: Rc<RefCell<Vec<Vec<i32>>>>,
    }

    fn record(collection: &ObservableCollection<i32>) -> Batches {
        let added = Rc::new(RefCell::new(Vec::new()));
        let removed = Rc::new(RefCell::new(Vec::new()));
        collection.items_added().subscribe({
            let added = added.clone();
            move |batch: &[i32]| added.borrow_mut().push(batch.to_vec())
        });
        collection.items_removed().subscribe({
            let removed = removed.clone();
            move |batch: &[i32]| removed.borrow_mut().push(batch.to_vec())
        });
        Batches { added, removed }
    }

    // ========================================================================
    // Adding
    // ========================================================================

    #[test]
    fn test_new_collection_is_empty() {
        let c: ObservableCollection<i32> = ObservableCollection::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert_eq!(c.get(0), None);
    }

    #[test]
    fn test_push_appends_and_fires_single_item_batch() {
        let c = ObservableCollection::new();
        let batches = record(&c);

        assert!(c.push(1));
        assert!(c.push(2));

        assert_eq!(c.to_vec(), vec![1, 2]);
        assert_eq!(*batches.added.borrow(), vec![vec![1], vec![2]]);
        assert!(batches.removed.borrow().is_empty());
    }

    #[test]
    fn test_push_duplicate_is_silent_noop() {
        let c = ObservableCollection::new();
        c.push(7);
        let batches = record(&c);

        assert!(!c.push(7));

        assert_eq!(c.to_vec(), vec![7]);
        assert!(batches.added.borrow().is_empty());
    }

    #[test]
    fn test_insert_at_index_and_clamps() {
        let c = ObservableCollection::new();
        c.extend([1, 3]);
        assert!(c.insert(1, 2));
        assert!(c.insert(100, 4));
        assert_eq!(c.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_extend_fires_one_batch_with_all_items() {
        let c = ObservableCollection::new();
        let batches = record(&c);

        assert_eq!(c.extend([10, 20, 30]), 3);

        assert_eq!(*batches.added.borrow(), vec![vec![10, 20, 30]]);
    }

    #[test]
    fn test_extend_skips_present_and_repeated_items() {
        let c = ObservableCollection::new();
        c.push(1);
        let batches = record(&c);

        assert_eq!(c.extend([1, 2, 2, 3]), 2);

        assert_eq!(c.to_vec(), vec![1, 2, 3]);
        assert_eq!(*batches.added.borrow(), vec![vec![2, 3]]);
    }

    #[test]
    fn test_extend_with_nothing_new_fires_nothing() {
        let c = ObservableCollection::new();
        c.extend([1, 2]);
        let batches = record(&c);

        assert_eq!(c.extend([2, 1]), 0);
        assert_eq!(c.extend(std::iter::empty()), 0);
        assert!(batches.added.borrow().is_empty());
    }

    // ========================================================================
    // Removing
    // ========================================================================

    #[test]
    fn test_remove_fires_single_item_batch() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let batches = record(&c);

        assert!(c.remove(&2));

        assert_eq!(c.to_vec(), vec![1, 3]);
        assert_eq!(*batches.removed.borrow(), vec![vec![2]]);
    }

    #[test]
    fn test_remove_absent_is_silent_noop() {
        let c = ObservableCollection::new();
        c.push(1);
        let batches = record(&c);

        assert!(!c.remove(&99));
        assert!(batches.removed.borrow().is_empty());
    }

    #[test]
    fn test_remove_all_fires_one_batch_in_collection_order() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3, 4, 5]);
        let batches = record(&c);

        assert_eq!(c.remove_all([5, 2, 42, 4]), 3);

        assert_eq!(c.to_vec(), vec![1, 3]);
        assert_eq!(*batches.removed.borrow(), vec![vec![2, 4, 5]]);
    }

    #[test]
    fn test_clear_fires_one_batch() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let batches = record(&c);

        assert_eq!(c.clear(), 3);
        assert!(c.is_empty());
        assert_eq!(*batches.removed.borrow(), vec![vec![1, 2, 3]]);

        // Clearing an empty collection reports nothing
        assert_eq!(c.clear(), 0);
        assert_eq!(batches.removed.borrow().len(), 1);
    }

    // ========================================================================
    // Replacing
    // ========================================================================

    #[test]
    fn test_replace_reports_only_the_difference() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let batches = record(&c);

        c.replace([3, 4, 1, 4]);

        assert_eq!(c.to_vec(), vec![3, 4, 1]);
        assert_eq!(*batches.removed.borrow(), vec![vec![2]]);
        assert_eq!(*batches.added.borrow(), vec![vec![4]]);
    }

    #[test]
    fn test_replace_with_same_contents_is_silent() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let batches = record(&c);

        c.replace([1, 2, 3]);
        c.replace([1, 2, 2, 3]);

        assert_eq!(c.to_vec(), vec![1, 2, 3]);
        assert!(batches.added.borrow().is_empty());
        assert!(batches.removed.borrow().is_empty());
    }

    #[test]
    fn test_replace_can_reorder_without_batches() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let batches = record(&c);

        c.replace([3, 1, 2]);

        assert_eq!(c.to_vec(), vec![3, 1, 2]);
        assert_eq!(c.row_data(0), Some(3));
        assert!(batches.added.borrow().is_empty());
        assert!(batches.removed.borrow().is_empty());
    }

    #[test]
    fn test_replace_fires_removed_before_added() {
        let c: ObservableCollection<i32> = ObservableCollection::new();
        c.push(1);
        let order = Rc::new(RefCell::new(Vec::new()));
        c.items_added().subscribe({
            let order = order.clone();
            move |_: &[i32]| order.borrow_mut().push("added")
        });
        c.items_removed().subscribe({
            let order = order.clone();
            move |_: &[i32]| order.borrow_mut().push("removed")
        });

        c.replace([2]);
        assert_eq!(*order.borrow(), vec!["removed", "added"]);
    }

    // ========================================================================
    // Re-entrancy
    // ========================================================================

    #[test]
    fn test_handlers_observe_completed_mutation() {
        let c: ObservableCollection<i32> = ObservableCollection::new();
        let seen_len = Rc::new(RefCell::new(None));
        c.items_added().subscribe({
            let c = c.clone();
            let seen_len = seen_len.clone();
            move |_: &[i32]| *seen_len.borrow_mut() = Some(c.len())
        });

        c.extend([1, 2, 3]);
        assert_eq!(*seen_len.borrow(), Some(3));
    }

    #[test]
    fn test_handler_may_mutate_collection() {
        let c: ObservableCollection<i32> = ObservableCollection::new();
        c.items_added().subscribe({
            let c = c.clone();
            move |added: &[i32]| {
                // Reject negative numbers by removing them again
                let negatives: Vec<i32> = added.iter().copied().filter(|v| *v < 0).collect();
                c.remove_all(negatives);
            }
        });

        c.extend([1, -2, 3, -4]);
        assert_eq!(c.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_iter_is_a_snapshot() {
        let c = ObservableCollection::new();
        c.extend([1, 2, 3]);
        let mut visited = Vec::new();
        for item in c.iter() {
            visited.push(item);
            c.remove(&item);
        }
        assert_eq!(visited, vec![1, 2, 3]);
        assert!(c.is_empty());
    }

    // ========================================================================
    // Slint model
    // ========================================================================

    #[test]
    fn test_model_reflects_contents() {
        let c = ObservableCollection::new();
        c.extend([5, 6]);
        let model = c.model();
        assert_eq!(model.row_count(), 2);
        assert_eq!(model.row_data(1), Some(6));

        c.remove(&5);
        assert_eq!(model.row_count(), 1);
        assert_eq!(model.row_data(0), Some(6));
        assert_eq!(model.row_data(1), None);
    }

    #[test]
    fn test_clones_share_contents() {
        let a = ObservableCollection::new();
        let b = a.clone();
        a.push(1);
        assert!(b.contains(&1));
        assert_eq!(b.position(&1), Some(0));
    }
}
