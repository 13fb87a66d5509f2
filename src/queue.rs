//! A FIFO queue that can also be drained one tag at a time.
//!
//! [`TaggedQueue`] keeps every entry on two doubly linked lists at once: the
//! overall arrival order, and the arrival order of entries sharing its tag.
//! Links are slot indices into one arena, so unlinking an entry from both
//! lists is O(1) whichever list it was found through.
//!
//! Entries are identified by the [`EntryId`] returned from `enqueue`, never
//! by comparing items, so equal items never collide.
//!
//! ```rust
//! use sigil_format::TaggedQueue;
//!
//! let mut queue = TaggedQueue::new();
//! queue.enqueue(Some('A'), 1);
//! queue.enqueue(Some('B'), 2);
//! queue.enqueue(Some('A'), 3);
//!
//! assert_eq!(queue.dequeue_tagged(&'A'), Some(1));
//! assert_eq!(queue.dequeue(), Some(2));
//! assert_eq!(queue.count_of(&'A'), 1);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// Handle to an entry of a [`TaggedQueue`].
///
/// Handles are generation-checked: once the entry leaves the queue the
/// handle goes stale, even if its slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId {
    slot: usize,
    generation: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Links {
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Ends {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

#[derive(Debug)]
struct Node<T, I> {
    tag: Option<T>,
    item: I,
    overall: Links,
    tagged: Links,
}

#[derive(Debug)]
struct Slot<T, I> {
    generation: u64,
    node: Option<Node<T, I>>,
}

#[derive(Debug)]
pub struct TaggedQueue<T, I> {
    slots: Vec<Slot<T, I>>,
    free: Vec<usize>,
    overall: Ends,
    by_tag: HashMap<T, Ends>,
}

impl<T, I> Default for TaggedQueue<T, I> {
    fn default() -> Self {
        TaggedQueue {
            slots: Vec::new(),
            free: Vec::new(),
            overall: Ends::default(),
            by_tag: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Clone, I> TaggedQueue<T, I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overall.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overall.len == 0
    }

    /// Number of queued entries carrying `tag`.
    #[must_use]
    pub fn count_of(&self, tag: &T) -> usize {
        self.by_tag.get(tag).map_or(0, |ends| ends.len)
    }

    /// Appends `item` to the back of the queue (and of its tag's list).
    pub fn enqueue(&mut self, tag: Option<T>, item: I) -> EntryId {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                self.slots.len() - 1
            }
        };

        let overall_prev = self.overall.tail;
        match overall_prev {
            Some(tail) => self.node_mut(tail).overall.next = Some(slot),
            None => self.overall.head = Some(slot),
        }
        self.overall.tail = Some(slot);
        self.overall.len += 1;

        let mut tagged = Links::default();
        if let Some(tag) = &tag {
            let ends = self.by_tag.entry(tag.clone()).or_default();
            let tag_prev = ends.tail;
            if ends.head.is_none() {
                ends.head = Some(slot);
            }
            ends.tail = Some(slot);
            ends.len += 1;
            if let Some(prev) = tag_prev {
                self.node_mut(prev).tagged.next = Some(slot);
            }
            tagged.prev = tag_prev;
        }

        let entry = &mut self.slots[slot];
        entry.node = Some(Node {
            tag,
            item,
            overall: Links {
                prev: overall_prev,
                next: None,
            },
            tagged,
        });
        EntryId {
            slot,
            generation: entry.generation,
        }
    }

    /// Removes the oldest entry of the whole queue.
    pub fn dequeue(&mut self) -> Option<I> {
        let head = self.overall.head?;
        Some(self.unlink(head))
    }

    /// Removes the oldest entry carrying `tag`.
    pub fn dequeue_tagged(&mut self, tag: &T) -> Option<I> {
        let head = self.by_tag.get(tag)?.head?;
        Some(self.unlink(head))
    }

    /// Removes an arbitrary entry; `None` if it already left the queue.
    pub fn remove(&mut self, id: EntryId) -> Option<I> {
        let slot = self.slots.get(id.slot)?;
        if slot.generation != id.generation || slot.node.is_none() {
            return None;
        }
        Some(self.unlink(id.slot))
    }

    /// The oldest entry, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&I> {
        self.overall.head.map(|head| &self.node(head).item)
    }

    /// The oldest entry carrying `tag`, without removing it.
    #[must_use]
    pub fn peek_tagged(&self, tag: &T) -> Option<&I> {
        let head = self.by_tag.get(tag)?.head?;
        Some(&self.node(head).item)
    }

    /// Iterates over `(tag, item)` in arrival order.
    pub fn iter(&self) -> Iter<'_, T, I> {
        Iter {
            queue: self,
            cursor: self.overall.head,
            remaining: self.overall.len,
        }
    }

    fn node(&self, slot: usize) -> &Node<T, I> {
        match &self.slots[slot].node {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", slot),
        }
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<T, I> {
        match &mut self.slots[slot].node {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", slot),
        }
    }

    fn unlink(&mut self, slot: usize) -> I {
        let entry = &mut self.slots[slot];
        let node = match entry.node.take() {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", slot),
        };
        entry.generation += 1;
        self.free.push(slot);

        match node.overall.prev {
            Some(prev) => self.node_mut(prev).overall.next = node.overall.next,
            None => self.overall.head = node.overall.next,
        }
        match node.overall.next {
            Some(next) => self.node_mut(next).overall.prev = node.overall.prev,
            None => self.overall.tail = node.overall.prev,
        }
        self.overall.len -= 1;

        if let Some(tag) = &node.tag {
            match node.tagged.prev {
                Some(prev) => self.node_mut(prev).tagged.next = node.tagged.next,
                None => {
                    if let Some(ends) = self.by_tag.get_mut(tag) {
                        ends.head = node.tagged.next;
                    }
                }
            }
            match node.tagged.next {
                Some(next) => self.node_mut(next).tagged.prev = node.tagged.prev,
                None => {
                    if let Some(ends) = self.by_tag.get_mut(tag) {
                        ends.tail = node.tagged.prev;
                    }
                }
            }
            let emptied = match self.by_tag.get_mut(tag) {
                Some(ends) => {
                    ends.len -= 1;
                    ends.len == 0
                }
                None => false,
            };
            if emptied {
                self.by_tag.remove(tag);
            }
        }

        node.item
    }
}

pub struct Iter<'a, T, I> {
    queue: &'a TaggedQueue<T, I>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T: Eq + Hash + Clone, I> Iterator for Iter<'a, T, I> {
    type Item = (Option<&'a T>, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.queue.node(slot);
        self.cursor = node.overall.next;
        self.remaining -= 1;
        Some((node.tag.as_ref(), &node.item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Eq + Hash + Clone, I> ExactSizeIterator for Iter<'_, T, I> {}

/// Draining iterator: yields items in arrival order.
pub struct IntoIter<T, I> {
    queue: TaggedQueue<T, I>,
}

impl<T: Eq + Hash + Clone, I> Iterator for IntoIter<T, I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        self.queue.dequeue()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<T: Eq + Hash + Clone, I> IntoIterator for TaggedQueue<T, I> {
    type Item = I;
    type IntoIter = IntoIter<T, I>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<T: Eq + Hash + Clone, I> Extend<(Option<T>, I)> for TaggedQueue<T, I> {
    fn extend<It: IntoIterator<Item = (Option<T>, I)>>(&mut self, iter: It) {
        for (tag, item) in iter {
            self.enqueue(tag, item);
        }
    }
}
