mod error;

pub use error::Error;

use std::collections::VecDeque;

use dashmap::DashMap;

/// Per-topic FIFO queues of payload strings for the polling provider.
///
/// The store is explicitly constructed and shared by `Arc`; its
/// lifecycle belongs to the hosting application. Queues are created
/// lazily on first use and live until [`clear`](Self::clear). Per-topic
/// queues sit in independent map shards, so posting on one topic never
/// blocks draining another.
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    queues: DashMap<String, VecDeque<String>>,
    capacity: Option<usize>,
}

impl MemoryQueueStore {
    /// Creates a store with unbounded per-topic queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose per-topic queues hold at most `capacity`
    /// payloads.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queues: DashMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Appends a payload to the topic's queue, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueFull`] if the topic's queue is at its
    /// capacity bound.
    pub fn enqueue(&self, topic_name: &str, payload: String) -> Result<(), Error> {
        let mut queue = self.queues.entry(topic_name.to_owned()).or_default();
        if let Some(capacity) = self.capacity {
            if queue.len() >= capacity {
                return Err(Error::QueueFull {
                    topic: topic_name.to_owned(),
                    capacity,
                });
            }
        }
        queue.push_back(payload);
        Ok(())
    }

    /// Removes and returns pending payloads for the topic in FIFO order,
    /// up to `max` if given.
    #[must_use]
    pub fn drain(&self, topic_name: &str, max: Option<usize>) -> Vec<String> {
        self.queues.get_mut(topic_name).map_or_else(Vec::new, |mut queue| {
            let count = max.map_or(queue.len(), |limit| limit.min(queue.len()));
            queue.drain(..count).collect()
        })
    }

    /// The number of pending payloads for the topic.
    #[must_use]
    pub fn len(&self, topic_name: &str) -> usize {
        self.queues.get(topic_name).map_or(0, |queue| queue.len())
    }

    /// Discards every queue. Test support only.
    pub fn clear(&self) {
        self.queues.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order() {
        let store = MemoryQueueStore::new();
        for payload in ["a", "b", "c"] {
            store.enqueue("orders", payload.to_owned()).unwrap();
        }

        assert_eq!(store.drain("orders", None), vec!["a", "b", "c"]);
        assert_eq!(store.drain("orders", None), Vec::<String>::new());
    }

    #[test]
    fn drain_respects_max_count() {
        let store = MemoryQueueStore::new();
        for payload in ["a", "b", "c"] {
            store.enqueue("orders", payload.to_owned()).unwrap();
        }

        assert_eq!(store.drain("orders", Some(2)), vec!["a", "b"]);
        assert_eq!(store.drain("orders", Some(5)), vec!["c"]);
    }

    #[test]
    fn drain_of_unknown_topic_is_empty() {
        let store = MemoryQueueStore::new();
        assert!(store.drain("missing", None).is_empty());
    }

    #[test]
    fn capacity_bound_rejects_overflow() {
        let store = MemoryQueueStore::with_capacity(1);
        store.enqueue("orders", "a".to_owned()).unwrap();

        let error = store.enqueue("orders", "b".to_owned()).unwrap_err();
        assert!(error.to_string().contains("full"));
        assert_eq!(store.len("orders"), 1);
    }

    #[test]
    fn topics_are_independent() {
        let store = MemoryQueueStore::with_capacity(1);
        store.enqueue("orders", "a".to_owned()).unwrap();
        store.enqueue("payments", "b".to_owned()).unwrap();

        assert_eq!(store.drain("payments", None), vec!["b"]);
        assert_eq!(store.drain("orders", None), vec!["a"]);
    }

    #[test]
    fn clear_discards_everything() {
        let store = MemoryQueueStore::new();
        store.enqueue("orders", "a".to_owned()).unwrap();
        store.clear();

        assert_eq!(store.len("orders"), 0);
    }
}
