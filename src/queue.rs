use std::{marker::PhantomData, ptr};

/// A singly linked FIFO queue. Every link is a raw pointer from `Box::into_raw`; the queue owns
/// all of its nodes and rebuilds the `Box` when one is popped or cleared. `tail` points at the
/// last node so pushes don't have to walk the list.
pub struct Queue<T> {
    head: *mut Node<T>,
    tail: *mut Node<T>,
    len: usize,
    _owns: PhantomData<Box<Node<T>>>,
}

struct Node<T> {
    value: T,
    next: *mut Node<T>,
}

// SAFETY: the queue owns its nodes exclusively, like a Vec would.
unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Sync> Sync for Queue<T> {}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub const fn new() -> Self {
        Queue {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            len: 0,
            _owns: PhantomData,
        }
    }

    pub fn push(&mut self, value: T) {
        let node = Box::into_raw(Box::new(Node {
            value,
            next: ptr::null_mut(),
        }));
        if self.tail.is_null() {
            self.head = node;
        } else {
            // SAFETY: tail is non-null only while it points at the last live node.
            unsafe { (*self.tail).next = node };
        }
        self.tail = node;
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.head.is_null() {
            return None;
        }
        // SAFETY: head came from Box::into_raw and is unlinked here before being freed.
        let node = unsafe { Box::from_raw(self.head) };
        self.head = node.next;
        if self.head.is_null() {
            self.tail = ptr::null_mut();
        }
        self.len -= 1;
        Some(node.value)
    }

    pub fn front(&self) -> Option<&T> {
        // SAFETY: live nodes stay valid while the queue is borrowed.
        unsafe { self.head.as_ref().map(|node| &node.value) }
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: &mut self guarantees no other borrow of the chain is live.
        unsafe { self.head.as_mut().map(|node| &mut node.value) }
    }

    pub fn back(&self) -> Option<&T> {
        // SAFETY: as in front().
        unsafe { self.tail.as_ref().map(|node| &node.value) }
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as in front_mut().
        unsafe { self.tail.as_mut().map(|node| &mut node.value) }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.head.is_null(), self.tail.is_null());
        self.head.is_null()
    }

    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Iterates from the front of the queue to the back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            _queue: PhantomData,
        }
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.push(v));
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

pub struct Iter<'a, T> {
    next: *const Node<T>,
    _queue: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the iterator borrows the queue, so no node is freed while it runs.
        let node = unsafe { self.next.as_ref()? };
        self.next = node.next;
        Some(&node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        assert_eq!(queue.pop(), None);

        queue.push('a');
        queue.push('b');
        queue.push('c');
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.front(), Some(&'a'));
        assert_eq!(queue.back(), Some(&'c'));
        assert_eq!(queue.pop(), Some('a'));
        assert_eq!(queue.pop(), Some('b'));
        assert_eq!(queue.front(), queue.back());
        assert_eq!(queue.pop(), Some('c'));
        assert!(queue.is_empty());
    }

    #[test]
    fn push_after_draining() {
        let mut queue = Queue::new();
        queue.push(1);
        assert_eq!(queue.pop(), Some(1));
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.front(), Some(&2));
        assert_eq!(queue.back(), Some(&3));
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn mutable_ends() {
        let mut queue: Queue<i32> = (1..=3).collect();
        *queue.front_mut().unwrap() = 10;
        *queue.back_mut().unwrap() = 30;
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![10, 2, 30]);
    }

    #[test]
    fn push_after_front_mut() {
        let mut queue = Queue::new();
        queue.push(1);
        *queue.front_mut().unwrap() += 10;
        queue.push(2);
        *queue.back_mut().unwrap() += 20;
        queue.push(3);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![11, 22, 3]);
        assert_eq!(queue.pop(), Some(11));
        *queue.front_mut().unwrap() = 0;
        queue.push(4);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![0, 3, 4]);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: Queue<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b = a.clone();
        a.pop();
        a.push("z".to_string());
        assert_eq!(b.iter().cloned().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(a.iter().cloned().collect::<Vec<_>>(), vec!["y", "z"]);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn clear_then_reuse() {
        let mut queue: Queue<u8> = (0..5).collect();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        queue.push(9);
        assert_eq!(queue.back(), Some(&9));
    }

    #[test]
    fn long_queue_drops() {
        let queue: Queue<u32> = (0..1_000_000).collect();
        assert_eq!(queue.len(), 1_000_000);
    }
}
