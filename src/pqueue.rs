//! Addressable binary max-heap over dense `u32` ids.
//!
//! After inserting an (id, key) pair the entry can be found, re-keyed or removed through the id in
//! O(log n). Both the contraction queue (ids are hyperedges) and the per-part gain queues (ids are
//! hypernodes) are built on it.

const ABSENT: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Node<K> {
    key: K,
    val: u32,
}

#[derive(Clone, Debug)]
pub struct IndexedPriorityQueue<K>
where
    K: Ord + Copy,
{
    locator: Box<[usize]>,
    heap: Vec<Node<K>>,
}

impl<K> IndexedPriorityQueue<K>
where
    K: Ord + Copy,
{
    /// queue for ids in `0..maxnodes`
    pub fn new(maxnodes: usize) -> Self {
        Self {
            locator: vec![ABSENT; maxnodes].into_boxed_slice(),
            heap: Vec::with_capacity(maxnodes),
        }
    }

    /// clear the queue
    pub fn reset(&mut self) {
        for node in &self.heap {
            self.locator[node.val as usize] = ABSENT;
        }
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, val: u32) -> bool {
        self.locator[val as usize] != ABSENT
    }

    /// insert an item that is not in the queue
    pub fn insert(&mut self, val: u32, key: K) {
        debug_assert!(self.check_heap());
        assert!(!self.contains(val), "{val} is already queued");

        self.heap.push(Node { key, val });
        let i = self.heap.len() - 1;
        self.sift_up(i, Node { key, val });

        debug_assert!(self.check_heap());
    }

    /// delete an item, returns false if it was not queued
    pub fn delete(&mut self, val: u32) -> bool {
        if !self.contains(val) {
            return false;
        }
        debug_assert!(self.check_heap());

        let i = self.locator[val as usize];
        self.locator[val as usize] = ABSENT;

        let last = self.heap.pop().expect("queue holds val");
        if i < self.heap.len() {
            let oldkey = self.heap[i].key;
            if last.key > oldkey {
                self.sift_up(i, last);
            } else {
                self.sift_down(i, last);
            }
        }

        debug_assert!(self.check_heap());
        true
    }

    /// change the key of a queued item
    pub fn update(&mut self, val: u32, newkey: K) {
        assert!(self.contains(val), "{val} is not queued");
        debug_assert!(self.check_heap());

        let i = self.locator[val as usize];
        let oldkey = self.heap[i].key;
        if newkey == oldkey {
            return;
        }

        let node = Node { key: newkey, val };
        if newkey > oldkey {
            self.sift_up(i, node);
        } else {
            self.sift_down(i, node);
        }

        debug_assert!(self.check_heap());
    }

    /// insert or update
    pub fn push(&mut self, val: u32, key: K) {
        if self.contains(val) {
            self.update(val, key);
        } else {
            self.insert(val, key);
        }
    }

    /// returns the item at the top of the queue and removes it
    pub fn get_top(&mut self) -> Option<u32> {
        let top = self.see_top_val()?;
        self.delete(top);
        Some(top)
    }

    /// the item at the top of the queue, which stays queued
    pub fn see_top_val(&self) -> Option<u32> {
        self.heap.first().map(|n| n.val)
    }

    /// the key of the top item, which stays queued
    pub fn see_top_key(&self) -> Option<K> {
        self.heap.first().map(|n| n.key)
    }

    /// key of a specific item
    pub fn key(&self, val: u32) -> Option<K> {
        match self.locator[val as usize] {
            ABSENT => None,
            i => Some(self.heap[i].key),
        }
    }

    /// queued items in heap order
    pub fn iter(&self) -> impl Iterator<Item = (u32, K)> + '_ {
        self.heap.iter().map(|n| (n.val, n.key))
    }

    /// moves `node` up from slot `i` to where it belongs and stores it there
    fn sift_up(&mut self, mut i: usize, node: Node<K>) {
        while i > 0 {
            let j = (i - 1) >> 1;
            if node.key > self.heap[j].key {
                self.heap[i] = self.heap[j];
                self.locator[self.heap[i].val as usize] = i;
                i = j;
            } else {
                break;
            }
        }
        self.heap[i] = node;
        self.locator[node.val as usize] = i;
    }

    /// moves `node` down from slot `i` to where it belongs and stores it there
    fn sift_down(&mut self, mut i: usize, node: Node<K>) {
        let nnodes = self.heap.len();
        loop {
            let mut j = (i << 1) + 1;
            if j >= nnodes {
                break;
            }
            if j + 1 < nnodes && self.heap[j + 1].key > self.heap[j].key {
                j += 1;
            }
            if self.heap[j].key > node.key {
                self.heap[i] = self.heap[j];
                self.locator[self.heap[i].val as usize] = i;
                i = j;
            } else {
                break;
            }
        }
        self.heap[i] = node;
        self.locator[node.val as usize] = i;
    }

    /// checks the consistency of the heap
    pub fn check_heap(&self) -> bool {
        let heap = &self.heap;
        let locator = &self.locator;

        if heap.is_empty() {
            return true;
        }

        assert!(locator[heap[0].val as usize] == 0);
        for i in 1..heap.len() {
            assert!(locator[heap[i].val as usize] == i);
            assert!(heap[i].key <= heap[(i - 1) / 2].key);
        }

        let j = locator.iter().filter(|&&l| l != ABSENT).count();
        assert!(j == heap.len(), "{} {}", j, heap.len());

        true
    }
}
