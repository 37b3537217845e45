//! Bounded FIFO used between the serial side and the protocol side.

use heapless::Deque;

/// Capacity of every queue in the emulator.
pub const QUEUE_CAPACITY: usize = 16;

/// A fixed capacity FIFO.
///
/// Pushing onto a full queue hands the element back to the caller instead of
/// blocking or overwriting, the caller decides whether to log and drop it.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T, const K: usize = QUEUE_CAPACITY> {
    inner: Deque<T, K>,
}

impl<T, const K: usize> Default for BoundedQueue<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize> BoundedQueue<T, K> {
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Append `item` at the back, or return it if the queue is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        self.inner.push_back(item)
    }

    /// Remove the oldest element.
    ///
    /// Callers check [`Self::is_empty`] first, an empty pop is a logic error
    /// and trips a debug assertion.
    pub fn pop(&mut self) -> Option<T> {
        debug_assert!(!self.inner.is_empty(), "pop on an empty queue");
        self.inner.pop_front()
    }

    pub fn peek(&self) -> Option<&T> {
        self.inner.front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        K
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q: BoundedQueue<u8, 4> = BoundedQueue::new();
        assert!(q.is_empty());
        for i in 0..4 {
            q.push(i).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.len(), 4);
        assert_eq!(q.peek(), Some(&0));

        for i in 0..4 {
            assert_eq!(q.pop(), Some(i));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn push_on_full_returns_item() {
        let mut q: BoundedQueue<u8> = BoundedQueue::new();
        assert_eq!(q.capacity(), QUEUE_CAPACITY);
        for i in 0..QUEUE_CAPACITY as u8 {
            q.push(i).unwrap();
        }
        assert_eq!(q.push(99), Err(99));
        assert_eq!(q.len(), QUEUE_CAPACITY);
        assert!(q.iter().copied().eq(0..QUEUE_CAPACITY as u8));
    }

    #[test]
    fn wraps_around_storage() {
        let mut q: BoundedQueue<u8, 3> = BoundedQueue::new();
        for round in 0..10u8 {
            q.push(round).unwrap();
            q.push(round + 100).unwrap();
            assert_eq!(q.pop(), Some(round));
            assert_eq!(q.pop(), Some(round + 100));
        }
        assert!(q.is_empty());
    }

    #[test]
    #[should_panic(expected = "pop on an empty queue")]
    fn pop_on_empty_is_a_logic_error() {
        let mut q: BoundedQueue<u8, 2> = BoundedQueue::new();
        let _ = q.pop();
    }
}
