use std::cmp::{Ordering, Reverse};
use std::collections::binary_heap::BinaryHeap;
use std::collections::HashMap;
use std::hash::Hash;

/// Event Queue that allows invalidating events.
///
/// Items are identified by value (give every event its own id), so pushing
/// an item that is already queued does nothing. Invalidated items stay in
/// the heap and are skipped when they reach the top.
#[derive(Debug)]
pub struct EventQueue<K, T> where K: Ord + Copy, T: Eq + Hash + Copy {
    queue: BinaryHeap<Reverse<Entry<K, T>>>,
    /// The insertion number of the live entry of every queued item.
    live: HashMap<T, u64>,
    counter: u64
}

#[derive(Debug, Clone, Copy)]
struct Entry<K, T> {
    key: K,
    order: u64,
    item: T
}

impl<K: Ord, T> PartialEq for Entry<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, T> Eq for Entry<K, T> {}

impl<K: Ord, T> PartialOrd for Entry<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> Ord for Entry<K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal keys come out in insertion order.
        self.key.cmp(&other.key).then(self.order.cmp(&other.order))
    }
}

impl<K, T> EventQueue<K, T> where K: Ord + Copy, T: Eq + Hash + Copy {
    pub fn new() -> EventQueue<K, T> {
        EventQueue {
            queue: BinaryHeap::new(),
            live: HashMap::new(),
            counter: 0
        }
    }

    /// Queue `item` under `key`. Returns false if the item was already queued.
    pub fn push(&mut self, key: K, item: T) -> bool {
        if self.live.contains_key(&item) {
            return false;
        }

        let order = self.counter;
        self.counter += 1;
        self.live.insert(item, order);
        self.queue.push(Reverse(Entry { key, order, item }));
        true
    }

    /// Remove and return the live item with the smallest key.
    pub fn pop_min(&mut self) -> Option<(K, T)> {
        self.discard_stale();

        let Reverse(entry) = self.queue.pop()?;
        self.live.remove(&entry.item);
        Some((entry.key, entry.item))
    }

    /// The live item with the smallest key, without removing it.
    ///
    /// Takes `&mut self` since stale entries on top are dropped on the way.
    pub fn peek_min(&mut self) -> Option<(K, T)> {
        self.discard_stale();

        self.queue.peek().map(|&Reverse(entry)| (entry.key, entry.item))
    }

    /// Mark `item` as stale. Returns false if it was not queued.
    pub fn invalidate(&mut self, item: T) -> bool {
        self.live.remove(&item).is_some()
    }

    pub fn contains(&self, item: T) -> bool {
        self.live.contains_key(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// The number of live items.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    fn discard_stale(&mut self) {
        while let Some(&Reverse(entry)) = self.queue.peek() {
            if self.live.get(&entry.item) == Some(&entry.order) {
                break;
            }

            self.queue.pop();
        }
    }
}

impl<K, T> Default for EventQueue<K, T> where K: Ord + Copy, T: Eq + Hash + Copy {
    fn default() -> EventQueue<K, T> {
        EventQueue::new()
    }
}
