/// The operations an in-place sort needs from a collection.
pub trait Sortable {
    fn len(&self) -> usize;
    fn swap(&mut self, i: usize, j: usize);
    fn less(&self, i: usize, j: usize) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ascending order over a sequence of `i64`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Int64Arr(pub Vec<i64>);

impl Sortable for Int64Arr {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j)
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.0[i] < self.0[j]
    }
}

impl From<Vec<i64>> for Int64Arr {
    fn from(value: Vec<i64>) -> Self {
        Int64Arr(value)
    }
}

impl Int64Arr {
    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

// Heap sort, only touches the data through `Sortable`.
pub fn sort<T: Sortable + ?Sized>(data: &mut T) {
    let n = data.len();
    if n < 2 {
        return;
    }

    for root in (0..n / 2).rev() {
        sift_down(data, root, n);
    }

    for end in (1..n).rev() {
        data.swap(0, end);
        sift_down(data, 0, end);
    }
}

pub fn is_sorted<T: Sortable + ?Sized>(data: &T) -> bool {
    (1..data.len()).all(|i| !data.less(i, i - 1))
}

fn sift_down<T: Sortable + ?Sized>(data: &mut T, mut root: usize, end: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return;
        }
        if child + 1 < end && data.less(child, child + 1) {
            child += 1;
        }
        if !data.less(root, child) {
            return;
        }
        data.swap(root, child);
        root = child;
    }
}
