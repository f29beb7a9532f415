//! Direct access list: a sparse set over `0..cap` with O(1) insert and membership, and clear
//! proportional to the number of members. Used as a reusable mark array for refinement nodes and
//! for the neighborhoods touched by a gain update.

const ABSENT: u32 = u32::MAX;

#[derive(Default, Clone, Debug)]
pub struct DirectAccessList {
    ptr: Vec<u32>,
    ind: Vec<u32>,
}

impl DirectAccessList {
    pub fn new(cap: usize) -> Self {
        Self {
            ptr: vec![ABSENT; cap],
            ind: Vec::with_capacity(cap),
        }
    }

    /// returns true if key was not already in set
    pub fn insert(&mut self, key: u32) -> bool {
        if self.contains(key) {
            return false;
        }

        self.ptr[key as usize] = self.ind.len() as u32;
        self.ind.push(key);
        true
    }

    /// returns true if list contains key
    pub fn contains(&self, key: u32) -> bool {
        debug_assert!((key as usize) < self.ptr.len());
        self.ptr[key as usize] != ABSENT
    }

    /// empties the list in O(len)
    pub fn clear(&mut self) {
        for &key in &self.ind {
            self.ptr[key as usize] = ABSENT;
        }
        self.ind.clear();
    }

    /// keys in insertion order
    pub fn as_slice(&self) -> &[u32] {
        &self.ind
    }

    pub fn len(&self) -> usize {
        self.ind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ind.is_empty()
    }
}

impl Extend<u32> for DirectAccessList {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}
