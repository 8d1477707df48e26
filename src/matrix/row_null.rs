//! Matrix whose rows can be individually deleted while keeping stable row
//! indices; the centroid store of the incremental driver, where an emptied
//! cluster's row is nulled until a point moves back in.
use super::RowStore;

#[derive(Clone, Debug, PartialEq)]
pub struct MatrixWithRowNull<T> {
    rows: Vec<Option<Box<[T]>>>,
    num_columns: usize,
}

impl<T: Copy + Default> MatrixWithRowNull<T> {
    pub fn new(num_rows: usize, num_columns: usize) -> Self {
        Self {
            rows: (0..num_rows)
                .map(|_| Some(vec![T::default(); num_columns].into_boxed_slice()))
                .collect(),
            num_columns,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.rows[row].is_none()
    }

    pub fn num_non_null(&self) -> usize {
        self.rows.iter().filter(|row| row.is_some()).count()
    }

    /// Marks the row deleted. Its storage is dropped; a later
    /// [set_row](MatrixWithRowNull::set_row) restores it.
    pub fn null_row(&mut self, row: usize) {
        self.rows[row] = None;
    }

    pub fn try_row(&self, row: usize) -> Option<&[T]> {
        self.rows[row].as_deref()
    }

    /// Writes `src`, restoring the row if it was null.
    pub fn set_row(&mut self, row: usize, src: &[T]) {
        assert_eq!(src.len(), self.num_columns);
        match &mut self.rows[row] {
            Some(existing) => existing.copy_from_slice(src),
            slot @ None => *slot = Some(src.to_vec().into_boxed_slice()),
        }
    }
}

impl<T: Copy + Default> RowStore<T> for MatrixWithRowNull<T> {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }
    fn num_columns(&self) -> usize {
        self.num_columns
    }
    fn row_is_null(&self, row: usize) -> bool {
        self.rows[row].is_none()
    }
    fn row(&self, row: usize) -> &[T] {
        self.rows[row].as_deref().expect("row access on a null row")
    }
    fn row_mut(&mut self, row: usize) -> &mut [T] {
        self.rows[row]
            .as_deref_mut()
            .expect("row access on a null row")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_rows_keep_indices_stable() {
        let mut m: MatrixWithRowNull<i32> = MatrixWithRowNull::new(3, 2);
        m.set_row(1, &[4, 5]);
        m.null_row(0);
        assert!(m.is_null(0));
        assert_eq!(m.try_row(1), Some(&[4, 5][..]));
        assert_eq!(m.num_non_null(), 2);
        m.set_row(0, &[7, 8]);
        assert_eq!(m.try_row(0), Some(&[7, 8][..]));
    }
}
