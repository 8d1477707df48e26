//! Packed lower-triangular matrix, the pairwise dissimilarity table of the
//! medoid driver.

/// Stores the lower triangle (including the diagonal) of an n x n matrix
/// in n(n+1)/2 entries. Accessors accept (i, j) in either order.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangularMatrix<T> {
    order: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> TriangularMatrix<T> {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            data: vec![T::default(); order * (order + 1) / 2],
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        let (hi, lo) = if i >= j { (i, j) } else { (j, i) };
        debug_assert!(hi < self.order);
        hi * (hi + 1) / 2 + lo
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.offset(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let offset = self.offset(i, j);
        self.data[offset] = value;
    }
}
