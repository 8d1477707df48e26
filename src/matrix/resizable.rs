//! Row-resizable matrix, the codebook container of the variable-K drivers
//! and the PNN merge engine.
use super::RowStore;
use crate::feature::Feature;

/// K x d matrix whose row count moves between 0 and a fixed capacity.
/// Pushes are amortized O(1); [remove_row](ResizableMatrix::remove_row)
/// swaps with the last row and pops, so row order is not stable across
/// removals (cluster bookkeeping mirrors the same swap).
#[derive(Clone, Debug, PartialEq)]
pub struct ResizableMatrix<T> {
    num_rows: usize,
    num_columns: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> ResizableMatrix<T> {
    pub fn with_capacity(max_rows: usize, num_columns: usize) -> Self {
        Self {
            num_rows: 0,
            num_columns,
            data: Vec::with_capacity(max_rows * num_columns),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.num_rows);
        let start = row * self.num_columns;
        &self.data[start..start + self.num_columns]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.num_rows);
        let start = row * self.num_columns;
        &mut self.data[start..start + self.num_columns]
    }

    pub fn push_row(&mut self, src: &[T]) {
        assert_eq!(src.len(), self.num_columns);
        self.data.extend_from_slice(src);
        self.num_rows += 1;
    }

    pub fn pop_row(&mut self) {
        debug_assert!(self.num_rows > 0);
        self.num_rows -= 1;
        self.data.truncate(self.num_rows * self.num_columns);
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let (head, tail) = self.data.split_at_mut(hi * self.num_columns);
        head[lo * self.num_columns..(lo + 1) * self.num_columns]
            .swap_with_slice(&mut tail[..self.num_columns]);
    }

    /// Swap with the last row, then pop.
    pub fn remove_row(&mut self, row: usize) {
        self.swap_rows(row, self.num_rows - 1);
        self.pop_row();
    }

    /// Truncates, or zero-extends with default rows.
    pub fn resize(&mut self, num_rows: usize) {
        self.data.resize(num_rows * self.num_columns, T::default());
        self.num_rows = num_rows;
    }

    /// Appends every row of `b` then every row of `c`.
    pub fn merge(&mut self, b: &ResizableMatrix<T>, c: &ResizableMatrix<T>) {
        assert_eq!(b.num_columns, self.num_columns);
        assert_eq!(c.num_columns, self.num_columns);
        self.data.extend_from_slice(&b.data);
        self.data.extend_from_slice(&c.data);
        self.num_rows += b.num_rows + c.num_rows;
    }
}

impl<F: Feature> ResizableMatrix<F> {
    /// Replaces row `i` with the count-weighted mean of rows `i` and `j`:
    /// `(n_i * M_i + n_j * M_j) / (n_i + n_j)`, rounding once at the end
    /// for integer features. Row `j` is left for the caller to remove.
    pub fn merge_two_rows(&mut self, i: usize, j: usize, count_i: i64, count_j: i64) {
        debug_assert!(i != j);
        debug_assert!(count_i + count_j > 0);
        let total = (count_i + count_j) as f64;
        for column in 0..self.num_columns {
            let a = self.row(i)[column].as_f64();
            let b = self.row(j)[column].as_f64();
            let merged = (count_i as f64 * a + count_j as f64 * b) / total;
            self.row_mut(i)[column] = F::from_f64_rounded(merged);
        }
    }
}

impl<T: Copy + Default> RowStore<T> for ResizableMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }
    fn num_columns(&self) -> usize {
        self.num_columns
    }
    fn row(&self, row: usize) -> &[T] {
        ResizableMatrix::row(self, row)
    }
    fn row_mut(&mut self, row: usize) -> &mut [T] {
        ResizableMatrix::row_mut(self, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_row_swaps_with_last() {
        let mut m: ResizableMatrix<i32> = ResizableMatrix::with_capacity(4, 2);
        m.push_row(&[1, 1]);
        m.push_row(&[2, 2]);
        m.push_row(&[3, 3]);
        m.remove_row(0);
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.row(0), &[3, 3]);
        assert_eq!(m.row(1), &[2, 2]);
    }

    #[test]
    fn merge_two_rows_weighted_mean() {
        let mut m: ResizableMatrix<f64> = ResizableMatrix::with_capacity(2, 1);
        m.push_row(&[0.0]);
        m.push_row(&[9.0]);
        m.merge_two_rows(0, 1, 1, 2);
        assert_eq!(m.row(0), &[6.0]);
    }

    #[test]
    fn merge_two_rows_rounds_integer_features() {
        let mut m: ResizableMatrix<i32> = ResizableMatrix::with_capacity(2, 1);
        m.push_row(&[0]);
        m.push_row(&[5]);
        m.merge_two_rows(0, 1, 1, 1);
        assert_eq!(m.row(0), &[3]);
    }
}
