//! Matrix containers backing centroids, dissimilarity tables and crisp
//! partitions.
mod bit;
mod resizable;
mod row;
mod row_null;
mod triangular;

pub use self::bit::{BitMatrix, CrispMatrix};
pub use self::resizable::ResizableMatrix;
pub use self::row::MatrixRow;
pub use self::row_null::MatrixWithRowNull;
pub use self::triangular::TriangularMatrix;

/// Row-addressable storage of cluster centroids. The clustering kernel is
/// written against this trait so that fixed-K drivers ([MatrixRow]),
/// variable-K drivers ([ResizableMatrix]) and the incremental driver
/// ([MatrixWithRowNull]) share one implementation.
pub trait RowStore<T> {
    fn num_rows(&self) -> usize;
    fn num_columns(&self) -> usize;
    /// A null row is a hard-deleted cluster; [row](RowStore::row) must not
    /// be called for it and nearest-centroid scans skip it.
    fn row_is_null(&self, _row: usize) -> bool {
        false
    }
    fn row(&self, row: usize) -> &[T];
    fn row_mut(&mut self, row: usize) -> &mut [T];
}
