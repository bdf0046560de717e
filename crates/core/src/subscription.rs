//! Subscription management for live query results.
//!
//! This module provides subscription IDs and a manager for tracking
//! active subscriptions to a results controller.

use crate::change::ChangeBatch;
use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for change notifications.
pub type ChangeCallback<E> = Box<dyn Fn(&ChangeBatch<E>)>;

/// A subscription to result-set changes.
pub struct Subscription<E> {
    /// Unique identifier
    id: SubscriptionId,
    /// Callback to invoke on changes
    callback: ChangeCallback<E>,
    /// Whether this subscription is active
    active: bool,
}

impl<E> Subscription<E> {
    /// Creates a new subscription.
    pub fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: Fn(&ChangeBatch<E>) + 'static,
    {
        Self {
            id,
            callback: Box::new(callback),
            active: true,
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this subscription is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivates this subscription.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Notifies this subscription of changes.
    pub fn notify(&self, changes: &ChangeBatch<E>) {
        if self.active {
            (self.callback)(changes);
        }
    }
}

/// Manages subscriptions for a results controller.
pub struct SubscriptionManager<E> {
    /// Active subscriptions
    subscriptions: HashMap<SubscriptionId, Subscription<E>>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<E> Default for SubscriptionManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriptionManager<E> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Subscribes to changes with the given callback.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeBatch<E>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let subscription = Subscription::new(id, callback);
        self.subscriptions.insert(id, subscription);

        id
    }

    /// Subscribes with an already boxed callback.
    pub fn subscribe_boxed(&mut self, callback: ChangeCallback<E>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;

        self.subscriptions.insert(
            id,
            Subscription {
                id,
                callback,
                active: true,
            },
        );

        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Notifies a specific subscription of changes.
    pub fn notify(&self, id: SubscriptionId, changes: &ChangeBatch<E>) {
        if let Some(sub) = self.subscriptions.get(&id) {
            sub.notify(changes);
        }
    }

    /// Notifies all active subscriptions of changes.
    pub fn notify_all(&self, changes: &ChangeBatch<E>) {
        for sub in self.subscriptions.values() {
            sub.notify(changes);
        }
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Returns all subscription IDs.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.keys().copied().collect()
    }

    /// Clears all subscriptions.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}
