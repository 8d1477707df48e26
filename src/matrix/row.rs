//! Dense row-major matrix with the linear-algebra entry points the
//! induced distance and the supervised measures need.
use super::RowStore;
use crate::error::Error;
use std::fmt;
use std::ops::{AddAssign, SubAssign};

#[derive(Clone, Debug, PartialEq)]
pub struct MatrixRow<T> {
    num_rows: usize,
    num_columns: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> MatrixRow<T> {
    pub fn new(num_rows: usize, num_columns: usize) -> Self {
        Self {
            num_rows,
            num_columns,
            data: vec![T::default(); num_rows * num_columns],
        }
    }

    /// Takes ownership of a row-major buffer. Panics if the buffer does not
    /// hold exactly `num_rows * num_columns` entries.
    pub fn from_vec(num_rows: usize, num_columns: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), num_rows * num_columns);
        Self {
            num_rows,
            num_columns,
            data,
        }
    }

    pub fn from_rows(rows: &[&[T]]) -> Self {
        let num_rows = rows.len();
        let num_columns = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(num_rows * num_columns);
        for row in rows {
            assert_eq!(row.len(), num_columns);
            data.extend_from_slice(row);
        }
        Self {
            num_rows,
            num_columns,
            data,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.num_columns;
        &self.data[start..start + self.num_columns]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.num_columns;
        &mut self.data[start..start + self.num_columns]
    }

    pub fn get(&self, row: usize, column: usize) -> T {
        self.data[row * self.num_columns + column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) {
        self.data[row * self.num_columns + column] = value;
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

    pub fn copy_row(&mut self, row: usize, src: &[T]) {
        self.row_mut(row).copy_from_slice(src);
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.num_columns, self.num_rows);
        for i in 0..self.num_rows {
            for j in 0..self.num_columns {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }
}

impl<T: Copy + Default + AddAssign> AddAssign<&MatrixRow<T>> for MatrixRow<T> {
    fn add_assign(&mut self, other: &MatrixRow<T>) {
        assert_eq!(self.data.len(), other.data.len());
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }
}

impl<T: Copy + Default + SubAssign> SubAssign<&MatrixRow<T>> for MatrixRow<T> {
    fn sub_assign(&mut self, other: &MatrixRow<T>) {
        assert_eq!(self.data.len(), other.data.len());
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
    }
}

impl MatrixRow<f64> {
    pub fn identity(order: usize) -> Self {
        let mut out = Self::new(order, order);
        for i in 0..order {
            out.set(i, i, 1.0);
        }
        out
    }

    /// Inverse by LU decomposition with partial pivoting. Fails with
    /// [Error::Singular] when no non-zero pivot is available.
    pub fn inverse(&self) -> Result<Self, Error> {
        assert_eq!(self.num_rows, self.num_columns);
        let n = self.num_rows;
        let mut lu = self.clone();
        let mut perm: Vec<usize> = (0..n).collect();

        for col in 0..n {
            let mut pivot_row = col;
            let mut pivot_mag = lu.get(col, col).abs();
            for row in col + 1..n {
                let mag = lu.get(row, col).abs();
                if mag > pivot_mag {
                    pivot_mag = mag;
                    pivot_row = row;
                }
            }
            if pivot_mag == 0.0 {
                return Err(Error::Singular);
            }
            if pivot_row != col {
                lu.swap_rows(pivot_row, col);
                perm.swap(pivot_row, col);
            }
            let pivot = lu.get(col, col);
            for row in col + 1..n {
                let factor = lu.get(row, col) / pivot;
                lu.set(row, col, factor);
                for k in col + 1..n {
                    let value = lu.get(row, k) - factor * lu.get(col, k);
                    lu.set(row, k, value);
                }
            }
        }

        // Solve L U x = P e_j for each unit column.
        let mut out = Self::new(n, n);
        let mut column = vec![0.0; n];
        for j in 0..n {
            for (i, value) in column.iter_mut().enumerate() {
                *value = if perm[i] == j { 1.0 } else { 0.0 };
            }
            for i in 1..n {
                let mut acc = column[i];
                for k in 0..i {
                    acc -= lu.get(i, k) * column[k];
                }
                column[i] = acc;
            }
            for i in (0..n).rev() {
                let mut acc = column[i];
                for k in i + 1..n {
                    acc -= lu.get(i, k) * column[k];
                }
                column[i] = acc / lu.get(i, i);
            }
            for i in 0..n {
                out.set(i, j, column[i]);
            }
        }
        Ok(out)
    }

    /// Eigen decomposition of a symmetric matrix by cyclic Jacobi
    /// rotations. Returns eigenvalues ascending and the matching
    /// eigenvectors as columns.
    pub fn eigen_sym(&self) -> (Vec<f64>, MatrixRow<f64>) {
        assert_eq!(self.num_rows, self.num_columns);
        let n = self.num_rows;
        let mut a = self.clone();
        let mut v = Self::identity(n);

        const MAX_SWEEPS: usize = 64;
        for _ in 0..MAX_SWEEPS {
            let mut off_diagonal = 0.0;
            for i in 0..n {
                for j in i + 1..n {
                    off_diagonal += a.get(i, j) * a.get(i, j);
                }
            }
            if off_diagonal.sqrt() <= f64::EPSILON * n as f64 {
                break;
            }
            for p in 0..n {
                for q in p + 1..n {
                    let apq = a.get(p, q);
                    if apq == 0.0 {
                        continue;
                    }
                    let theta = (a.get(q, q) - a.get(p, p)) / (2.0 * apq);
                    let t = if theta >= 0.0 {
                        1.0 / (theta + (1.0 + theta * theta).sqrt())
                    } else {
                        1.0 / (theta - (1.0 + theta * theta).sqrt())
                    };
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = t * c;
                    for k in 0..n {
                        let akp = a.get(k, p);
                        let akq = a.get(k, q);
                        a.set(k, p, c * akp - s * akq);
                        a.set(k, q, s * akp + c * akq);
                    }
                    for k in 0..n {
                        let apk = a.get(p, k);
                        let aqk = a.get(q, k);
                        a.set(p, k, c * apk - s * aqk);
                        a.set(q, k, s * apk + c * aqk);
                    }
                    for k in 0..n {
                        let vkp = v.get(k, p);
                        let vkq = v.get(k, q);
                        v.set(k, p, c * vkp - s * vkq);
                        v.set(k, q, s * vkp + c * vkq);
                    }
                }
            }
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| a.get(i, i).partial_cmp(&a.get(j, j)).unwrap());
        let eigenvalues: Vec<f64> = order.iter().map(|&i| a.get(i, i)).collect();
        let mut eigenvectors = Self::new(n, n);
        for (dst, &src) in order.iter().enumerate() {
            for k in 0..n {
                eigenvectors.set(k, dst, v.get(k, src));
            }
        }
        (eigenvalues, eigenvectors)
    }
}

impl<T: Copy + Default> RowStore<T> for MatrixRow<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }
    fn num_columns(&self) -> usize {
        self.num_columns
    }
    fn row(&self, row: usize) -> &[T] {
        MatrixRow::row(self, row)
    }
    fn row_mut(&mut self, row: usize) -> &mut [T] {
        MatrixRow::row_mut(self, row)
    }
}

impl<T: Copy + Default + fmt::Display> fmt::Display for MatrixRow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.num_rows {
            let row = self.row(i);
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
