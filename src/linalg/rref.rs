use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::tolerance::Tolerance;
use crate::traits::{FloatScalar, MatrixMut};

/// How the columns of the input are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemKind {
    /// Every column is a coefficient column (`A·x = 0`).
    Homogeneous,
    /// The last column is the right-hand side `b` of `A·x = b`.
    Augmented,
}

/// Row operations performed during one elimination phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowOpCounts {
    /// Row interchanges.
    pub swaps: usize,
    /// `row_i -= factor · row_p` updates with a non-zero factor.
    pub eliminations: usize,
    /// Pivot rows rescaled to a leading 1.
    pub scalings: usize,
}

impl RowOpCounts {
    /// Total number of row operations.
    pub fn total(&self) -> usize {
        self.swaps + self.eliminations + self.scalings
    }
}

/// Classification of the solution set of a linear system.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SolutionSet<T> {
    /// Some row reads `0 = c` with `c ≠ 0`.
    NoSolution { inconsistent_row: usize },
    /// Exactly one solution.
    Unique(Vector<T>),
    /// `x = particular + Σ sᵢ · directions[i]` for any scalars `sᵢ`.
    ///
    /// `particular` sets every free variable to zero; `directions` are the
    /// un-normalized null-space vectors, one per free column.
    Infinite {
        particular: Vector<T>,
        directions: Vec<Vector<T>>,
    },
}

/// Result of reducing a matrix to reduced row echelon form.
///
/// Invariants: `rank == pivot_cols.len()` and
/// `rank + free_cols.len()` equals the number of coefficient columns
/// (all columns for a homogeneous system, all but the last for an
/// augmented one).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decomposition<T> {
    /// How the input columns were interpreted.
    pub kind: SystemKind,
    /// Row echelon form after forward elimination.
    pub ref_form: Matrix<T>,
    /// Reduced row echelon form.
    pub rref: Matrix<T>,
    /// Number of pivots.
    pub rank: usize,
    /// Pivot columns in discovery order.
    pub pivot_cols: Vec<usize>,
    /// Non-pivot coefficient columns, ascending.
    pub free_cols: Vec<usize>,
    /// Unit-norm null-space basis, one vector per free column.
    pub null_basis: Vec<Vector<T>>,
    /// First row of the form `[0 … 0 | c]` with `c ≠ 0` (augmented only).
    pub inconsistent_row: Option<usize>,
    /// Operations performed while reaching REF.
    pub forward_ops: RowOpCounts,
    /// Additional operations performed while going from REF to RREF.
    pub backward_ops: RowOpCounts,
    directions: Vec<Vector<T>>,
}

impl<T: FloatScalar> Decomposition<T> {
    /// Number of coefficient columns.
    pub fn coefficient_cols(&self) -> usize {
        self.rank + self.free_cols.len()
    }

    /// Dimension of the null space (number of free columns).
    pub fn nullity(&self) -> usize {
        self.free_cols.len()
    }

    /// Whether every coefficient column holds a pivot.
    pub fn is_full_rank(&self) -> bool {
        self.free_cols.is_empty()
    }

    /// Classify the solution set.
    ///
    /// For a homogeneous system the answer is `Unique(0)` or `Infinite`.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// use microsim_kernels::linalg::{reduce_augmented, SolutionSet};
    ///
    /// let ab = Matrix::new([[1.0_f64, 2.0, 3.0], [1.0, 2.0, 5.0], [2.0, 4.0, 8.0]]);
    /// let dec = reduce_augmented(&ab).unwrap();
    /// assert!(matches!(dec.solution_set(), SolutionSet::NoSolution { .. }));
    /// ```
    pub fn solution_set(&self) -> SolutionSet<T> {
        if let Some(row) = self.inconsistent_row {
            return SolutionSet::NoSolution {
                inconsistent_row: row,
            };
        }
        let n = self.coefficient_cols();
        let mut particular = Vector::zeros(n);
        if self.kind == SystemKind::Augmented {
            for (row, &col) in self.pivot_cols.iter().enumerate() {
                particular[col] = self.rref[(row, n)];
            }
        }
        if self.free_cols.is_empty() {
            SolutionSet::Unique(particular)
        } else {
            SolutionSet::Infinite {
                particular,
                directions: self.directions.clone(),
            }
        }
    }
}

/// Reduce a homogeneous system with the default tolerance.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::reduce;
///
/// let a = Matrix::new([[1.0_f64, 2.0, 3.0], [2.0, 4.0, 6.0]]);
/// let dec = reduce(&a).unwrap();
/// assert_eq!(dec.rank, 1);
/// assert_eq!(dec.pivot_cols, vec![0]);
/// assert_eq!(dec.free_cols, vec![1, 2]);
/// assert_eq!(dec.null_basis.len(), 2);
/// ```
pub fn reduce<T: FloatScalar>(a: &Matrix<T>) -> Result<Decomposition<T>, LinalgError> {
    reduce_with(a, SystemKind::Homogeneous, &Tolerance::default())
}

/// Reduce an augmented system `[A | b]` with the default tolerance.
pub fn reduce_augmented<T: FloatScalar>(a: &Matrix<T>) -> Result<Decomposition<T>, LinalgError> {
    reduce_with(a, SystemKind::Augmented, &Tolerance::default())
}

/// Gaussian elimination with partial pivoting to RREF.
///
/// Forward elimination scans each coefficient column from the current pivot
/// row downward and swaps the entry of largest magnitude into place. A column
/// whose best candidate is below `tol.eps` gets no pivot: its remaining
/// entries are set to exactly zero and the pivot row does not advance.
/// Backward elimination then clears the entries above each pivot and scales
/// each pivot row to a leading 1.
///
/// # Errors
///
/// [`LinalgError::NonFinite`] for NaN/∞ input, [`LinalgError::MissingRhs`]
/// for an augmented system with no columns.
pub fn reduce_with<T: FloatScalar>(
    a: &Matrix<T>,
    kind: SystemKind,
    tol: &Tolerance<T>,
) -> Result<Decomposition<T>, LinalgError> {
    if !a.is_finite() {
        return Err(LinalgError::NonFinite);
    }
    let coef_cols = match kind {
        SystemKind::Homogeneous => a.ncols(),
        SystemKind::Augmented => a.ncols().checked_sub(1).ok_or(LinalgError::MissingRhs)?,
    };

    let mut work = a.clone();
    let mut forward_ops = RowOpCounts::default();
    let pivots = forward_eliminate(&mut work, coef_cols, tol, &mut forward_ops);
    let ref_form = work.clone();

    let mut backward_ops = RowOpCounts::default();
    back_eliminate(&mut work, &pivots, &mut backward_ops);
    let rref = work;

    let pivot_cols: Vec<usize> = pivots.iter().map(|&(_, col)| col).collect();
    let free_cols: Vec<usize> = (0..coef_cols).filter(|c| !pivot_cols.contains(c)).collect();

    let directions: Vec<Vector<T>> = free_cols
        .iter()
        .map(|&free| null_vector(&rref, &pivot_cols, free, coef_cols))
        .collect();
    for (v, &free) in directions.iter().zip(free_cols.iter()) {
        check_null_residual(a, coef_cols, v, free, tol);
    }
    let null_basis = directions
        .iter()
        .map(|v| v.normalize().unwrap_or_else(|| v.clone()))
        .collect();

    let inconsistent_row = match kind {
        SystemKind::Homogeneous => None,
        SystemKind::Augmented => find_inconsistent_row(&rref, coef_cols, tol),
    };
    if let Some(row) = inconsistent_row {
        log::debug!("row reduction: row {} is inconsistent (0 = c)", row);
    }

    Ok(Decomposition {
        kind,
        ref_form,
        rref,
        rank: pivot_cols.len(),
        pivot_cols,
        free_cols,
        null_basis,
        inconsistent_row,
        forward_ops,
        backward_ops,
        directions,
    })
}

fn swap_rows_in_place<T: Copy>(a: &mut impl MatrixMut<T>, r1: usize, r2: usize) {
    for j in 0..a.ncols() {
        let tmp = *a.get(r1, j);
        *a.get_mut(r1, j) = *a.get(r2, j);
        *a.get_mut(r2, j) = tmp;
    }
}

/// `row_target -= factor · row_source` over columns `col_start..`.
fn subtract_row<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    target: usize,
    source: usize,
    factor: T,
    col_start: usize,
) {
    for j in col_start..a.ncols() {
        let s = *a.get(source, j);
        let t = a.get_mut(target, j);
        *t = *t - factor * s;
    }
}

/// Forward elimination to row echelon form, in place.
///
/// Only the first `coef_cols` columns are searched for pivots; trailing
/// columns are carried along by the row operations. Returns the pivot
/// positions `(row, col)` in discovery order.
pub(crate) fn forward_eliminate<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    coef_cols: usize,
    tol: &Tolerance<T>,
    ops: &mut RowOpCounts,
) -> Vec<(usize, usize)> {
    let m = a.nrows();
    let mut pivots = Vec::new();
    let mut pivot_row = 0;

    for col in 0..coef_cols {
        if pivot_row >= m {
            break;
        }

        // Partial pivoting: find row with largest magnitude in this column
        let mut max_row = pivot_row;
        let mut max_val = a.get(pivot_row, col).abs();
        for row in (pivot_row + 1)..m {
            let val = a.get(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if tol.is_zero(max_val) {
            log::trace!("column {}: no pivot (max |a| = {:?})", col, max_val);
            for row in pivot_row..m {
                *a.get_mut(row, col) = T::zero();
            }
            continue;
        }

        if max_row != pivot_row {
            swap_rows_in_place(a, pivot_row, max_row);
            ops.swaps += 1;
            log::trace!("column {}: swap rows {} and {}", col, pivot_row, max_row);
        }

        let pivot = *a.get(pivot_row, col);
        for row in (pivot_row + 1)..m {
            let factor = *a.get(row, col) / pivot;
            if factor == T::zero() {
                continue;
            }
            subtract_row(a, row, pivot_row, factor, col);
            *a.get_mut(row, col) = T::zero();
            ops.eliminations += 1;
        }

        pivots.push((pivot_row, col));
        pivot_row += 1;
    }

    pivots
}

/// Backward elimination from REF to RREF, in place.
///
/// Walks the pivots last to first, scaling each pivot row to a leading 1
/// and clearing the entries above it.
pub(crate) fn back_eliminate<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    pivots: &[(usize, usize)],
    ops: &mut RowOpCounts,
) {
    for &(row, col) in pivots.iter().rev() {
        let pivot = *a.get(row, col);
        if pivot != T::one() {
            let inv_pivot = T::one() / pivot;
            for j in col..a.ncols() {
                let x = a.get_mut(row, j);
                *x = *x * inv_pivot;
            }
            ops.scalings += 1;
        }
        *a.get_mut(row, col) = T::one();

        for above in 0..row {
            let factor = *a.get(above, col);
            if factor == T::zero() {
                continue;
            }
            subtract_row(a, above, row, factor, col);
            *a.get_mut(above, col) = T::zero();
            ops.eliminations += 1;
        }
    }
}

/// Null-space vector for free column `free`: `1` at `free`, `-rref[i][free]`
/// at each pivot column `p_i`, zero elsewhere.
fn null_vector<T: FloatScalar>(
    rref: &Matrix<T>,
    pivot_cols: &[usize],
    free: usize,
    coef_cols: usize,
) -> Vector<T> {
    let mut v = Vector::zeros(coef_cols);
    v[free] = T::one();
    for (row, &col) in pivot_cols.iter().enumerate() {
        v[col] = -rref[(row, free)];
    }
    v
}

fn check_null_residual<T: FloatScalar>(
    a: &Matrix<T>,
    coef_cols: usize,
    v: &Vector<T>,
    free: usize,
    tol: &Tolerance<T>,
) {
    let mut residual = T::zero();
    for i in 0..a.nrows() {
        let mut sum = T::zero();
        for j in 0..coef_cols {
            sum = sum + a[(i, j)] * v[j];
        }
        residual = residual + sum * sum;
    }
    let residual = residual.sqrt();
    let bound = tol.eps * (T::one() + a.max_abs()) * (T::one() + v.max_abs());
    if residual > bound {
        log::warn!(
            "null-space vector for free column {} has residual {:?} (bound {:?})",
            free,
            residual,
            bound
        );
    }
}

fn find_inconsistent_row<T: FloatScalar>(
    rref: &Matrix<T>,
    coef_cols: usize,
    tol: &Tolerance<T>,
) -> Option<usize> {
    (0..rref.nrows()).find(|&i| {
        let row = rref.row(i);
        row[..coef_cols].iter().all(|&x| tol.is_zero(x)) && !tol.is_zero(row[coef_cols])
    })
}
