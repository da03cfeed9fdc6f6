use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

/// A vector of `Copy` elements which keeps up to N of them inline
/// and moves them to a heap `Vec` once more are pushed.
#[derive(Clone)]
pub struct SmallVec<T, const N: usize> {
    data: SmallVecData<T, N>,
}

#[derive(Clone)]
enum SmallVecData<T, const N: usize> {
    Inline { items: [T; N], len: usize },
    Heap(Vec<T>),
}

impl<T: Copy + Default, const N: usize> SmallVec<T, N> {
    /// An empty vector using the inline storage.
    pub fn new() -> Self {
        Self {
            data: SmallVecData::Inline {
                items: [T::default(); N],
                len: 0,
            },
        }
    }

    /// Creates a SmallVec holding `n` copies of `value`.
    pub fn from_elem(value: T, n: usize) -> Self {
        let mut sv = Self::new();
        sv.resize(n, value);
        sv
    }

    /// Inline capacity `N`, or the heap capacity after spilling.
    pub fn capacity(&self) -> usize {
        match &self.data {
            SmallVecData::Inline { .. } => N,
            SmallVecData::Heap(vec) => vec.capacity(),
        }
    }

    /// Returns true while the elements are still stored inline.
    pub fn is_inline(&self) -> bool {
        matches!(self.data, SmallVecData::Inline { .. })
    }

    /// Appends `value`, moving to the heap when the inline slots are full.
    pub fn push(&mut self, value: T) {
        if let SmallVecData::Inline { items, len } = &mut self.data {
            if *len < N {
                items[*len] = value;
                *len += 1;
                return;
            }
        }

        self.spill_to_heap();
        if let SmallVecData::Heap(vec) = &mut self.data {
            vec.push(value);
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        match &mut self.data {
            SmallVecData::Inline { items, len } => {
                if *len == 0 {
                    return None;
                }
                *len -= 1;
                Some(items[*len])
            }
            SmallVecData::Heap(vec) => vec.pop(),
        }
    }

    /// Inserts an element at the given index, shifting the tail to the right.
    /// Returns false if the index is past the end.
    pub fn insert(&mut self, index: usize, value: T) -> bool {
        if index > self.len() {
            return false;
        }

        if let SmallVecData::Inline { items, len } = &mut self.data {
            if *len < N {
                items[*len] = value;
                items[index..=*len].rotate_right(1);
                *len += 1;
                return true;
            }
        }

        self.spill_to_heap();
        if let SmallVecData::Heap(vec) = &mut self.data {
            vec.insert(index, value);
        }

        true
    }

    /// Removes the element at `index`, shifting the tail left; `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }

        match &mut self.data {
            SmallVecData::Inline { items, len } => {
                let value = items[index];
                items[index..*len].rotate_left(1);
                *len -= 1;
                Some(value)
            }
            SmallVecData::Heap(vec) => Some(vec.remove(index)),
        }
    }

    /// Shortens the SmallVec to `new_len` elements, keeping the first ones.
    pub fn truncate(&mut self, new_len: usize) {
        match &mut self.data {
            SmallVecData::Inline { len, .. } => *len = (*len).min(new_len),
            SmallVecData::Heap(vec) => vec.truncate(new_len),
        }
    }

    /// Resizes in place, filling new slots with `value`.
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.truncate(new_len);
        while self.len() < new_len {
            self.push(value);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    fn spill_to_heap(&mut self) {
        if let SmallVecData::Inline { items, len } = self.data {
            let mut vec = Vec::with_capacity((N * 2).max(len + 1));
            vec.extend_from_slice(&items[..len]);
            self.data = SmallVecData::Heap(vec);
        }
    }
}

impl<T, const N: usize> Deref for SmallVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        match &self.data {
            SmallVecData::Inline { items, len } => &items[..*len],
            SmallVecData::Heap(vec) => vec,
        }
    }
}

impl<T, const N: usize> DerefMut for SmallVec<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.data {
            SmallVecData::Inline { items, len } => &mut items[..*len],
            SmallVecData::Heap(vec) => vec,
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for SmallVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for SmallVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq, const N: usize> Eq for SmallVec<T, N> {}

impl<T: Hash, const N: usize> Hash for SmallVec<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state)
    }
}

impl<T: std::fmt::Debug, const N: usize> std::fmt::Debug for SmallVec<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SmallVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + Default, const N: usize> FromIterator<T> for SmallVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sv = Self::new();
        sv.extend(iter);
        sv
    }
}

impl<T: Copy + Default, const N: usize> Extend<T> for SmallVec<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Copy + Default, const N: usize> From<&[T]> for SmallVec<T, N> {
    fn from(values: &[T]) -> Self {
        values.iter().copied().collect()
    }
}

#[macro_export]
macro_rules! small_vec {
    ($elem:expr; $n:expr) => {
        $crate::SmallVec::from_elem($elem, $n)
    };
    ($($elem:expr),* $(,)?) => {
        {
            let mut sv = $crate::SmallVec::new();
            $(sv.push($elem);)*
            sv
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_vec_basic() {
        let mut sv: SmallVec<usize, 4> = SmallVec::new();
        assert_eq!(sv.len(), 0);
        assert!(sv.is_empty());

        sv.push(2);
        sv.push(3);
        sv.push(4);
        assert_eq!(sv.len(), 3);
        assert_eq!(&sv[..], &[2, 3, 4]);
        assert!(sv.is_inline());
    }

    #[test]
    fn test_spill_to_heap() {
        let mut sv: SmallVec<usize, 2> = small_vec![1, 2];
        assert_eq!(sv.capacity(), 2);
        assert!(sv.is_inline());

        sv.push(3);
        assert!(!sv.is_inline());
        assert!(sv.capacity() > 2);
        assert_eq!(&sv[..], &[1, 2, 3]);
    }

    #[test]
    fn test_pop() {
        let mut sv: SmallVec<usize, 4> = small_vec![1, 2];

        assert_eq!(sv.pop(), Some(2));
        assert_eq!(sv.pop(), Some(1));
        assert_eq!(sv.pop(), None);
        assert!(sv.is_empty());
    }

    #[test]
    fn test_insert_remove_inline() {
        let mut sv: SmallVec<usize, 4> = small_vec![1, 3];

        assert!(sv.insert(1, 2));
        assert_eq!(&sv[..], &[1, 2, 3]);
        assert!(sv.insert(3, 4));
        assert_eq!(&sv[..], &[1, 2, 3, 4]);
        assert!(!sv.insert(9, 5));

        assert_eq!(sv.remove(0), Some(1));
        assert_eq!(&sv[..], &[2, 3, 4]);
        assert_eq!(sv.remove(5), None);
    }

    #[test]
    fn test_insert_spills_when_full() {
        let mut sv: SmallVec<usize, 2> = small_vec![7, 9];

        assert!(sv.insert(1, 8));
        assert!(!sv.is_inline());
        assert_eq!(&sv[..], &[7, 8, 9]);
        assert_eq!(sv.remove(1), Some(8));
        assert_eq!(&sv[..], &[7, 9]);
    }

    #[test]
    fn test_macro_and_resize() {
        let sv: SmallVec<usize, 4> = small_vec![1; 5];
        assert_eq!(&sv[..], &[1, 1, 1, 1, 1]);

        let mut sv: SmallVec<usize, 4> = small_vec![5, 6, 7];
        sv.resize(1, 0);
        assert_eq!(&sv[..], &[5]);
        sv.resize(3, 0);
        assert_eq!(&sv[..], &[5, 0, 0]);
    }

    #[test]
    fn test_equality_ignores_storage() {
        let inline: SmallVec<usize, 8> = (0..5).collect();
        let mut extended: SmallVec<usize, 8> = SmallVec::new();
        extended.extend(0..5);
        assert_eq!(inline, extended);

        let heap: SmallVec<usize, 2> = (0..5).collect();
        assert_eq!(&heap[..], &inline[..]);
    }

    #[test]
    fn test_truncate_and_clear() {
        let mut sv: SmallVec<usize, 2> = small_vec![1, 2, 3, 4];
        assert!(!sv.is_inline());

        sv.truncate(10);
        assert_eq!(&sv[..], &[1, 2, 3, 4]);
        sv.truncate(2);
        assert_eq!(&sv[..], &[1, 2]);

        sv.clear();
        assert!(sv.is_empty());
        sv.push(7);
        assert_eq!(&sv[..], &[7]);
    }

    #[test]
    fn test_hash_ignores_storage() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(sv: &SmallVec<usize, 2>) -> u64 {
            let mut hasher = DefaultHasher::new();
            sv.hash(&mut hasher);
            hasher.finish()
        }

        let inline: SmallVec<usize, 2> = small_vec![1, 2];
        let mut heap = inline.clone();
        heap.push(3);
        heap.pop();
        assert!(inline.is_inline());
        assert!(!heap.is_inline());

        assert_eq!(inline, heap);
        assert_eq!(hash_of(&inline), hash_of(&heap));
        assert_ne!(hash_of(&inline), hash_of(&small_vec![2, 1]));
    }

    #[test]
    fn test_deref_mut() {
        let mut sv: SmallVec<usize, 4> = small_vec![3, 2, 1];
        sv.reverse();
        sv[0] = 10;
        assert_eq!(&sv[..], &[10, 2, 3]);
    }
}
