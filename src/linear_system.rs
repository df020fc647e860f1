use std::{
    fmt::{self, Display, Formatter},
    ops::Index,
};

use tracing::{debug, instrument, trace};

use crate::{
    decimal::Decimal,
    hyperplane::Hyperplane,
    tensors::vector::{Vector, VectorError},
};

/// Errors from misusing a [`LinearSystem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinearSystemError {
    /// A system needs at least one equation.
    Empty,
    /// All equations of a system must live in the same dimension.
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// Scaling a row by zero destroys the equation.
    ZeroScaleFactor,
}

impl Display for LinearSystemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LinearSystemError::Empty => write!(f, "A linear system needs at least one equation"),
            LinearSystemError::DimensionMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "All equations in the system should live in the same dimension: equation {} has dimension {} instead of {}",
                row + 1,
                found,
                expected
            ),
            LinearSystemError::IndexOutOfRange { index, len } => write!(
                f,
                "Row index {} is out of range for a system of {} equations",
                index, len
            ),
            LinearSystemError::ZeroScaleFactor => write!(f, "Cannot scale a row by zero"),
        }
    }
}

impl std::error::Error for LinearSystemError {}

/// The solution set of a linear system with infinitely many solutions:
/// `basepoint + t_1 * direction_vectors[0] + t_2 * direction_vectors[1] + ...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parametrization {
    basepoint: Vector,
    direction_vectors: Vec<Vector>,
}

impl Parametrization {
    /// Read off the parametrization from a system in reduced row-echelon form.
    /// `pivots` holds the `(row, column)` of every pivot.
    fn from_rref(system: &LinearSystem, pivots: &[(usize, usize)]) -> Parametrization {
        let dimension = system.dimension;

        let mut basepoint = vec![Decimal::zero(); dimension];
        let mut is_pivot = vec![false; dimension];
        for &(row, col) in pivots {
            basepoint[col] = system.rows[row].constant().clone();
            is_pivot[col] = true;
        }

        let direction_vectors = (0..dimension)
            .filter(|&free| !is_pivot[free])
            .map(|free| {
                let mut direction = vec![Decimal::zero(); dimension];
                direction[free] = Decimal::one();
                for &(row, col) in pivots {
                    direction[col] = -&system.rows[row].normal()[free];
                }
                Vector {
                    data: direction.into(),
                }
            })
            .collect();

        Parametrization {
            basepoint: Vector {
                data: basepoint.into(),
            },
            direction_vectors,
        }
    }

    pub fn basepoint(&self) -> &Vector {
        &self.basepoint
    }

    /// One direction per free variable.
    pub fn direction_vectors(&self) -> &[Vector] {
        &self.direction_vectors
    }

    pub fn dimension(&self) -> usize {
        self.basepoint.dimension()
    }

    /// Evaluate the parametrization at the given values of the free parameters.
    pub fn point_at(&self, parameters: &[Decimal]) -> Result<Vector, VectorError> {
        if parameters.len() != self.direction_vectors.len() {
            return Err(VectorError::DimensionMismatch {
                expected: self.direction_vectors.len(),
                found: parameters.len(),
            });
        }

        let mut point = self.basepoint.clone();
        for (t, direction) in parameters.iter().zip(&self.direction_vectors) {
            point = point.plus(&direction.scalar_multiply(t))?;
        }
        Ok(point)
    }
}

/// The outcome of solving a linear system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// Exactly one point satisfies every equation.
    Unique(Vector),
    /// The solutions form a line, plane or higher-dimensional flat.
    Infinite(Parametrization),
    /// The equations contradict each other.
    NoSolution,
}

impl Solution {
    pub fn is_unique(&self) -> bool {
        matches!(self, Solution::Unique(_))
    }

    /// Get the solution point, if it is unique.
    pub fn point(&self) -> Option<&Vector> {
        match self {
            Solution::Unique(p) => Some(p),
            _ => None,
        }
    }
}

/// An ordered list of hyperplane equations that share one dimension.
///
/// Row operations replace equations by new values; no equation is ever shared
/// between two rows.
///
/// ```
/// use hyperplanes::{hyperplane::Hyperplane, linear_system::{LinearSystem, Solution}};
///
/// let system = LinearSystem::new(vec![
///     Hyperplane::from_coefficients([1, 1, 1], 1).unwrap(),
///     Hyperplane::from_coefficients([0, 1, 1], 2).unwrap(),
/// ])
/// .unwrap();
///
/// assert!(matches!(system.solve(), Solution::Infinite(_)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem {
    rows: Vec<Hyperplane>,
    dimension: usize,
}

impl LinearSystem {
    /// Create a new system, checking that every equation has the same dimension.
    pub fn new(rows: Vec<Hyperplane>) -> Result<LinearSystem, LinearSystemError> {
        let dimension = rows.first().ok_or(LinearSystemError::Empty)?.dimension();

        if let Some((row, h)) = rows
            .iter()
            .enumerate()
            .find(|(_, h)| h.dimension() != dimension)
        {
            return Err(LinearSystemError::DimensionMismatch {
                row,
                expected: dimension,
                found: h.dimension(),
            });
        }

        Ok(LinearSystem { rows, dimension })
    }

    /// The number of equations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of variables.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn rows(&self) -> &[Hyperplane] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Hyperplane> {
        self.rows
    }

    fn check_index(&self, index: usize) -> Result<(), LinearSystemError> {
        if index >= self.rows.len() {
            return Err(LinearSystemError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Replace the equation at `index`.
    pub fn set_row(&mut self, index: usize, row: Hyperplane) -> Result<(), LinearSystemError> {
        self.check_index(index)?;
        if row.dimension() != self.dimension {
            return Err(LinearSystemError::DimensionMismatch {
                row: index,
                expected: self.dimension,
                found: row.dimension(),
            });
        }

        self.rows[index] = row;
        Ok(())
    }

    pub fn swap_rows(&mut self, row1: usize, row2: usize) -> Result<(), LinearSystemError> {
        self.check_index(row1)?;
        self.check_index(row2)?;
        self.rows.swap(row1, row2);
        Ok(())
    }

    /// Multiply both sides of the equation at `row` by a nonzero `coefficient`.
    pub fn scale_row(&mut self, row: usize, coefficient: &Decimal) -> Result<(), LinearSystemError> {
        self.check_index(row)?;
        if coefficient.is_zero() {
            return Err(LinearSystemError::ZeroScaleFactor);
        }

        self.rows[row] = self.rows[row].scaled(coefficient);
        Ok(())
    }

    /// Replace the equation at `dst` by `dst + coefficient * src`. `src` and `dst`
    /// may be the same row.
    pub fn add_multiple_of_row(
        &mut self,
        coefficient: &Decimal,
        src: usize,
        dst: usize,
    ) -> Result<(), LinearSystemError> {
        self.check_index(src)?;
        self.check_index(dst)?;

        self.rows[dst] = self.rows[dst].plus_multiple(coefficient, &self.rows[src]);
        Ok(())
    }

    /// Get the column of the leading coefficient of every row, or `None` for rows
    /// whose normal vector vanishes.
    pub fn first_nonzero_indices(&self) -> Vec<Option<usize>> {
        self.rows.iter().map(|r| r.first_nonzero_index()).collect()
    }

    /// Bring a copy of the system into triangular (row-echelon) form.
    #[instrument(level = "debug", skip_all, fields(rows = self.rows.len(), dimension = self.dimension))]
    pub fn compute_triangular_form(&self) -> LinearSystem {
        let mut system = self.clone();
        let rank = system.gaussian_elimination();
        debug!("Triangular form has {} pivot rows", rank);
        system
    }

    /// Bring a copy of the system into reduced row-echelon form.
    #[instrument(level = "debug", skip_all, fields(rows = self.rows.len(), dimension = self.dimension))]
    pub fn compute_rref(&self) -> LinearSystem {
        let mut system = self.clone();
        system.gaussian_elimination();
        system.back_substitution();
        system
    }

    /// Forward elimination in place. Returns the number of pivot rows.
    fn gaussian_elimination(&mut self) -> usize {
        let nrows = self.rows.len();

        let mut i = 0;
        for j in 0..self.dimension {
            if i >= nrows {
                break;
            }

            if self.rows[i].normal()[j].is_near_zero() {
                // select a non-zero pivot
                match (i + 1..nrows).find(|&k| !self.rows[k].normal()[j].is_near_zero()) {
                    Some(k) => {
                        trace!("Swap rows {} and {} to pivot on x_{}", i + 1, k + 1, j + 1);
                        self.rows.swap(i, k);
                    }
                    None => {
                        trace!("No pivot for x_{} at row {}", j + 1, i + 1);
                        continue;
                    }
                }
            }

            let Ok(inv_x) = Decimal::one().checked_div(&self.rows[i].normal()[j]) else {
                continue;
            };

            for k in i + 1..nrows {
                let coefficient = &self.rows[k].normal()[j];
                if coefficient.is_near_zero() {
                    continue;
                }

                let s = -(coefficient * &inv_x);
                self.rows[k] = self.rows[k].plus_multiple(&s, &self.rows[i]);
            }

            i += 1;
        }

        i
    }

    /// Turn a system in triangular form into reduced row-echelon form.
    fn back_substitution(&mut self) {
        for i in (0..self.rows.len()).rev() {
            let Some(j) = self.rows[i].first_nonzero_index() else {
                continue;
            };

            let pivot = &self.rows[i].normal()[j];
            if !pivot.is_one() {
                let Ok(inv_x) = Decimal::one().checked_div(pivot) else {
                    continue;
                };
                self.rows[i] = self.rows[i].scaled(&inv_x);
            }

            for k in 0..i {
                let coefficient = &self.rows[k].normal()[j];
                if coefficient.is_near_zero() {
                    continue;
                }

                let s = -coefficient;
                self.rows[k] = self.rows[k].plus_multiple(&s, &self.rows[i]);
            }
        }
    }

    /// Solve the system and classify its solution set.
    #[instrument(level = "debug", skip_all, fields(rows = self.rows.len(), dimension = self.dimension))]
    pub fn solve(&self) -> Solution {
        let rref = self.compute_rref();

        let mut pivots = Vec::with_capacity(self.dimension);
        for (row, h) in rref.rows.iter().enumerate() {
            match h.first_nonzero_index() {
                Some(col) => pivots.push((row, col)),
                None if h.constant().is_near_zero() => {}
                None => {
                    debug!("Equation {} reads 0 = {}: no solutions", row + 1, h.constant());
                    return Solution::NoSolution;
                }
            }
        }

        if pivots.len() < self.dimension {
            debug!(
                "Rank {} is smaller than the dimension {}: infinitely many solutions",
                pivots.len(),
                self.dimension
            );
            return Solution::Infinite(Parametrization::from_rref(&rref, &pivots));
        }

        let mut point = vec![Decimal::zero(); self.dimension];
        for (row, col) in pivots {
            point[col] = rref.rows[row].constant().clone();
        }

        debug!("Unique solution");
        Solution::Unique(Vector { data: point.into() })
    }
}

impl Index<usize> for LinearSystem {
    type Output = Hyperplane;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}
