//! # Priority tier for deferred events.
//!
//! [`PriorityScheduler`] is an array-backed binary min-heap keyed by a signed
//! priority: the entry with the **lowest** priority value is served first.
//!
//! ## Rules
//! - `push` appends, then sifts the new entry up while it is smaller than its parent.
//! - `pop` takes the root, moves the last entry to the root, then sifts it down,
//!   swapping with whichever child has the smaller priority.
//! - Equal priorities are served in unspecified order (the heap is not stable).
//!
//! ```text
//!              [-5]
//!             /    \
//!          [1]      [10]
//!          /
//!       [3]
//! pop() → -5, then 1, 3, 10
//! ```

/// One heap entry.
#[derive(Debug)]
struct Node<T> {
    priority: i32,
    value: T,
}

/// Binary min-heap ordered by ascending priority.
#[derive(Debug)]
pub struct PriorityScheduler<T> {
    nodes: Vec<Node<T>>,
}

impl<T> PriorityScheduler<T> {
    /// Creates an empty scheduler with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` with the given priority.
    ///
    /// The backing storage doubles when full.
    pub fn push(&mut self, value: T, priority: i32) {
        if self.nodes.len() == self.nodes.capacity() {
            self.nodes.reserve_exact(self.nodes.capacity().max(4));
        }
        self.nodes.push(Node { priority, value });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Removes and returns the entry with the lowest priority.
    pub fn pop(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let root = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(root.value)
    }

    /// Priority of the root entry, if any.
    pub fn peek_priority(&self) -> Option<i32> {
        self.nodes.first().map(|n| n.priority)
    }

    /// Number of pending entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every pending entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.nodes[idx].priority >= self.nodes[parent].priority {
                break;
            }
            self.nodes.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.nodes[right].priority < self.nodes[left].priority {
                right
            } else {
                left
            };
            if self.nodes[child].priority >= self.nodes[idx].priority {
                break;
            }
            self.nodes.swap(idx, child);
            idx = child;
        }
    }
}

impl<T> Default for PriorityScheduler<T> {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut PriorityScheduler<i32>) -> Vec<i32> {
        std::iter::from_fn(|| s.pop()).collect()
    }

    #[test]
    fn test_pop_empty_returns_none() {
        let mut s: PriorityScheduler<u8> = PriorityScheduler::default();
        assert!(s.pop().is_none());
        assert!(s.is_empty());
        assert_eq!(s.peek_priority(), None);
    }

    #[test]
    fn test_pops_in_ascending_priority() {
        let mut s = PriorityScheduler::with_capacity(2);
        for p in [7, -3, 12, 0, -10, 5, 5, 1, -3, 99, -42] {
            s.push(p, p);
        }
        assert_eq!(s.len(), 11);
        assert_eq!(s.peek_priority(), Some(-42));
        assert_eq!(drain(&mut s), vec![-42, -10, -3, -3, 0, 1, 5, 5, 7, 12, 99]);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut s = PriorityScheduler::with_capacity(1);
        for p in (0..100).rev() {
            s.push(p, p);
        }
        assert_eq!(s.len(), 100);
        assert_eq!(drain(&mut s), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut s = PriorityScheduler::default();
        s.push(10, 10);
        s.push(1, 1);
        assert_eq!(s.pop(), Some(1));
        s.push(-5, -5);
        s.push(3, 3);
        assert_eq!(s.pop(), Some(-5));
        assert_eq!(s.pop(), Some(3));
        assert_eq!(s.pop(), Some(10));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn test_clear_drops_entries() {
        let mut s = PriorityScheduler::default();
        s.push("a", 1);
        s.push("b", 2);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.pop(), None);
    }
}
