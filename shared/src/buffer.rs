use std::collections::VecDeque;

/// Fixed-capacity FIFO that keeps only the most recent items.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingBuffer<T> {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `item`, evicting and returning the oldest entry when full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a RollingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_everything_below_capacity() {
        let mut buf = RollingBuffer::new(3);
        assert_eq!(buf.push(1), None);
        assert_eq!(buf.push(2), None);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn evicts_oldest_once_full() {
        let mut buf = RollingBuffer::new(3);
        for i in 1..=3 {
            buf.push(i);
        }
        assert_eq!(buf.push(4), Some(1));
        assert_eq!(buf.push(5), Some(2));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(buf.latest(), Some(&5));
    }

    #[test]
    fn never_exceeds_capacity_over_long_runs() {
        let mut buf = RollingBuffer::new(50);
        for i in 0..1_000 {
            buf.push(i);
            assert!(buf.len() <= 50);
        }
        let kept: Vec<_> = buf.iter().copied().collect();
        assert_eq!(kept, (950..1_000).collect::<Vec<_>>());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = RollingBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.push("a");
        assert_eq!(buf.push("b"), Some("a"));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut buf = RollingBuffer::new(2);
        buf.push(1);
        buf.push(2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 2);
    }
}
