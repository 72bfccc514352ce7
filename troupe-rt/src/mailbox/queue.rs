//! Partition-indexed subscription queues.
//!
//! The mailbox routes every pushed envelope to all subscriptions of its
//! partition (broadcast within a partition, FIFO per subscription) and
//! exposes a polling operation that delivers at most one queued message per
//! subscription per call.

// Layer 1: Standard library imports
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};
use tracing::warn;

// Layer 3: Internal module imports
use super::traits::Subscriber;
use crate::message::Envelope;
use crate::util::{Partition, SubscriptionId};

/// One per-partition queue paired with its subscriber.
///
/// A subscriber declaring several partitions gets one independent
/// subscription instance per partition, all sharing the subscriber handle.
struct Subscription<T> {
    id: SubscriptionId,
    subscriber: Arc<dyn Subscriber<T>>,
    queue: Mutex<VecDeque<Envelope<T>>>,

    /// Excludes overlapping deliveries of the same head when fiber ticks
    /// overlap. Set for the whole duration of one delivery attempt.
    delivering: AtomicBool,
}

struct MailboxInner<T> {
    /// partition -> subscriptions listening on it, in subscribe order.
    partitions: RwLock<HashMap<Partition, Vec<Arc<Subscription<T>>>>>,

    /// subscription id -> partitions it was registered under.
    index: RwLock<HashMap<SubscriptionId, Vec<Partition>>>,
}

/// Routes messages to interested subscribers by partition.
///
/// Cheap to clone; all clones share the same routing state. Locks guard the
/// maps and queues only across synchronous sections, never across awaits.
///
/// # Delivery contract
///
/// [`Mailbox::poll`] visits every subscription of the polled id and delivers
/// the current queue head to the subscriber. A `true` return consumes the
/// head; `false` leaves it in place for the next poll. Queues are never
/// reordered.
pub struct Mailbox<T> {
    inner: Arc<MailboxInner<T>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Mailbox<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MailboxInner {
                partitions: RwLock::new(HashMap::new()),
                index: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a subscriber on every partition it declares.
    ///
    /// Each declared partition gets its own subscription instance (own
    /// queue) sharing the subscriber handle. Returns the id that later
    /// removes all of them at once.
    pub fn add_subscriber(&self, subscriber: Arc<dyn Subscriber<T>>) -> SubscriptionId {
        let id = SubscriptionId::new();
        let declared = subscriber.partitions();

        let mut partitions = self.inner.partitions.write();
        for partition in &declared {
            let subscription = Arc::new(Subscription {
                id,
                subscriber: Arc::clone(&subscriber),
                queue: Mutex::new(VecDeque::new()),
                delivering: AtomicBool::new(false),
            });
            partitions
                .entry(partition.clone())
                .or_default()
                .push(subscription);
        }
        drop(partitions);

        self.inner.index.write().insert(id, declared);
        id
    }

    /// Remove every subscription registered under `id`.
    ///
    /// Queued, undelivered envelopes are dropped with the subscriptions;
    /// their pending callers observe the drop through their reply channel.
    /// Removing an unknown id is a no-op.
    pub fn remove_subscription(&self, id: &SubscriptionId) {
        let Some(declared) = self.inner.index.write().remove(id) else {
            return;
        };

        let mut partitions = self.inner.partitions.write();
        for partition in declared {
            if let Some(bucket) = partitions.get_mut(&partition) {
                bucket.retain(|subscription| subscription.id != *id);
                if bucket.is_empty() {
                    partitions.remove(&partition);
                }
            }
        }
    }

    /// Append `envelope` to the queue of every subscription on its partition.
    ///
    /// A partition nobody subscribed to drops the envelope; the producer
    /// path normally guarantees at least one subscription exists.
    pub fn push(&self, envelope: Envelope<T>) {
        let partitions = self.inner.partitions.read();
        match partitions.get(&envelope.partition) {
            Some(bucket) => {
                for subscription in bucket {
                    subscription.queue.lock().push_back(envelope.clone());
                }
            }
            None => {
                warn!(partition = %envelope.partition, "dropping push to partition with no subscriptions");
            }
        }
    }

    /// Deliver at most one queued message to every subscription of `id`.
    ///
    /// An unknown id returns without work.
    pub async fn poll(&self, id: &SubscriptionId) {
        let Some(declared) = self.inner.index.read().get(id).cloned() else {
            return;
        };

        for partition in declared {
            let matching: Vec<Arc<Subscription<T>>> = {
                let partitions = self.inner.partitions.read();
                partitions
                    .get(&partition)
                    .map(|bucket| {
                        bucket
                            .iter()
                            .filter(|subscription| subscription.id == *id)
                            .map(Arc::clone)
                            .collect()
                    })
                    .unwrap_or_default()
            };

            for subscription in matching {
                Self::deliver_head(&subscription).await;
            }
        }
    }

    /// One delivery attempt: hand the queue head to the subscriber and
    /// consume it on success.
    async fn deliver_head(subscription: &Subscription<T>) {
        if subscription.delivering.swap(true, Ordering::AcqRel) {
            // A previous attempt for this subscription is still running.
            return;
        }

        let head = subscription.queue.lock().front().cloned();
        if let Some(envelope) = head {
            let consumed = subscription.subscriber.on_receive(&envelope).await;
            if consumed {
                let mut queue = subscription.queue.lock();
                // The head can only have changed if it was consumed by a
                // competing delivery, which the delivering flag excludes;
                // the id check keeps the operation safe regardless.
                if queue.front().map(|m| m.id) == Some(envelope.id) {
                    queue.pop_front();
                }
            }
        }

        subscription.delivering.store(false, Ordering::Release);
    }

    /// Whether `id` is currently registered.
    pub fn is_registered(&self, id: &SubscriptionId) -> bool {
        self.inner.index.read().contains_key(id)
    }

    /// Number of subscriptions listening on `partition`.
    pub fn subscription_count(&self, partition: &Partition) -> usize {
        self.inner
            .partitions
            .read()
            .get(partition)
            .map_or(0, Vec::len)
    }

    /// Total queued envelopes across all partitions of `id`.
    pub fn queued(&self, id: &SubscriptionId) -> usize {
        let Some(declared) = self.inner.index.read().get(id).cloned() else {
            return 0;
        };
        let partitions = self.inner.partitions.read();
        declared
            .iter()
            .filter_map(|partition| partitions.get(partition))
            .flat_map(|bucket| bucket.iter())
            .filter(|subscription| subscription.id == *id)
            .map(|subscription| subscription.queue.lock().len())
            .sum()
    }
}
