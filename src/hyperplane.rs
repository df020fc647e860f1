//! Lines, planes and their higher-dimensional generalisation.

use std::fmt::{self, Display, Formatter};

use smallvec::smallvec;

use crate::{
    decimal::{Decimal, DecimalError, IntoDecimal},
    tensors::vector::{Vector, VectorError},
};

/// Errors from intersecting hyperplanes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HyperplaneError {
    /// The lines are parallel. When `coincident` is set they are the same line
    /// and there are infinitely many intersection points, otherwise there are none.
    NoUniqueSolution { coincident: bool },
    /// The operation is only defined for lines in the plane.
    NotTwoDimensional(usize),
    DimensionMismatch { expected: usize, found: usize },
}

impl Display for HyperplaneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HyperplaneError::NoUniqueSolution { coincident: true } => {
                write!(f, "The lines coincide: infinitely many intersection points")
            }
            HyperplaneError::NoUniqueSolution { coincident: false } => {
                write!(f, "The lines are parallel: no intersection point")
            }
            HyperplaneError::NotTwoDimensional(d) => {
                write!(f, "Expected a line in two dimensions, found dimension {}", d)
            }
            HyperplaneError::DimensionMismatch { expected, found } => write!(
                f,
                "Hyperplanes do not have equal dimension: {} vs {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for HyperplaneError {}

/// How two hyperplanes of the same dimension lie with respect to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Identical,
    Parallel,
    Intersecting,
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Identical => f.write_str("same hyperplane"),
            Relation::Parallel => f.write_str("parallel, not the same hyperplane"),
            Relation::Intersecting => f.write_str("intersecting"),
        }
    }
}

/// The hyperplane `normal · x = constant`: a line in two dimensions and a plane
/// in three.
///
/// Equality is geometric: two hyperplanes are equal when they describe the same
/// point set, up to the tolerance of the current
/// [`DecimalContext`](crate::decimal::DecimalContext).
#[derive(Clone, Debug)]
pub struct Hyperplane {
    normal: Vector,
    constant: Decimal,
}

impl Hyperplane {
    pub fn new(normal: Vector, constant: Decimal) -> Hyperplane {
        Hyperplane { normal, constant }
    }

    /// Create a hyperplane from its coefficients and constant term.
    ///
    /// ```
    /// use hyperplanes::hyperplane::Hyperplane;
    ///
    /// let line = Hyperplane::from_coefficients([4.046, 2.836], 1.21).unwrap();
    /// assert_eq!(line.dimension(), 2);
    /// ```
    pub fn from_coefficients<I, C>(coefficients: I, constant: C) -> Result<Hyperplane, VectorError>
    where
        I: IntoIterator,
        I::Item: IntoDecimal,
        C: IntoDecimal,
    {
        Ok(Hyperplane {
            normal: Vector::new(coefficients)?,
            constant: constant.into_decimal()?,
        })
    }

    /// The degenerate hyperplane `0 = 0`, satisfied by every point.
    pub fn zero(dimension: usize) -> Result<Hyperplane, VectorError> {
        Self::from_constant(dimension, Decimal::zero())
    }

    /// The degenerate hyperplane `0 = constant`.
    pub fn from_constant(dimension: usize, constant: Decimal) -> Result<Hyperplane, VectorError> {
        Ok(Hyperplane {
            normal: Vector::zero(dimension)?,
            constant,
        })
    }

    pub fn normal(&self) -> &Vector {
        &self.normal
    }

    pub fn constant(&self) -> &Decimal {
        &self.constant
    }

    pub fn dimension(&self) -> usize {
        self.normal.dimension()
    }

    /// Get the index of the first coefficient that is not near zero, or `None`
    /// if the normal vector vanishes.
    pub fn first_nonzero_index(&self) -> Option<usize> {
        self.normal.first_nonzero_index()
    }

    /// A point on the hyperplane: all coordinates are zero except the one at
    /// [`Hyperplane::first_nonzero_index`]. Returns `None` for a zero normal.
    pub fn basepoint(&self) -> Option<Vector> {
        let index = self.first_nonzero_index()?;
        let mut point = Vector::zero(self.dimension()).ok()?;
        point.data[index] = self.constant.checked_div(&self.normal[index]).ok()?;
        Some(point)
    }

    pub fn is_parallel_to(&self, other: &Hyperplane) -> bool {
        self.dimension() == other.dimension() && self.normal.is_parallel_to(&other.normal)
    }

    /// Check if the two hyperplanes describe the same point set.
    pub fn is_same_as(&self, other: &Hyperplane) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }

        // a normal without a coefficient above the tolerance has no basepoint
        // and counts as zero, as it does for the solver
        match (self.basepoint(), other.basepoint()) {
            (None, None) => (&self.constant - &other.constant).is_near_zero(),
            (Some(p1), Some(p2)) => {
                self.normal.is_parallel_to(&other.normal)
                    && (&p2 - &p1).is_orthogonal_to(&self.normal)
            }
            _ => false,
        }
    }

    /// Classify the relative position of two hyperplanes.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    pub fn relation_to(&self, other: &Hyperplane) -> Relation {
        if self.is_same_as(other) {
            Relation::Identical
        } else if self.normal.is_parallel_to(&other.normal) {
            Relation::Parallel
        } else {
            Relation::Intersecting
        }
    }

    /// Intersect two lines in the plane using Cramer's rule.
    pub fn intersect_line(&self, other: &Hyperplane) -> Result<Vector, HyperplaneError> {
        if self.dimension() != 2 {
            return Err(HyperplaneError::NotTwoDimensional(self.dimension()));
        }
        if other.dimension() != 2 {
            return Err(HyperplaneError::NotTwoDimensional(other.dimension()));
        }

        // Ax + By = k1
        // Cx + Dy = k2
        let (a, b) = (&self.normal[0], &self.normal[1]);
        let (c, d) = (&other.normal[0], &other.normal[1]);
        let (k1, k2) = (&self.constant, &other.constant);

        let det = a * d - b * c;
        if det.is_near_zero() {
            return Err(HyperplaneError::NoUniqueSolution {
                coincident: self.is_same_as(other),
            });
        }

        let no_solution = |_: DecimalError| HyperplaneError::NoUniqueSolution { coincident: false };
        let x = (d * k1 - b * k2).checked_div(&det).map_err(no_solution)?;
        let y = (a * k2 - c * k1).checked_div(&det).map_err(no_solution)?;

        Ok(Vector {
            data: smallvec![x, y],
        })
    }

    /// Check if `point` satisfies the equation up to the tolerance of the current
    /// context.
    pub fn contains(&self, point: &Vector) -> Result<bool, HyperplaneError> {
        let lhs = self
            .normal
            .dot(point)
            .map_err(|_| HyperplaneError::DimensionMismatch {
                expected: self.dimension(),
                found: point.dimension(),
            })?;
        Ok((lhs - &self.constant).is_near_zero())
    }

    /// Multiply both sides of the equation by `c`.
    pub(crate) fn scaled(&self, c: &Decimal) -> Hyperplane {
        Hyperplane {
            normal: self.normal.scalar_multiply(c),
            constant: &self.constant * c,
        }
    }

    /// Add `c` times `other` to this equation. Both must have the same dimension.
    pub(crate) fn plus_multiple(&self, c: &Decimal, other: &Hyperplane) -> Hyperplane {
        Hyperplane {
            normal: Vector {
                data: self
                    .normal
                    .iter()
                    .zip(other.normal.iter())
                    .map(|(x, y)| x + c * y)
                    .collect(),
            },
            constant: &self.constant + c * &other.constant,
        }
    }
}

impl PartialEq for Hyperplane {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_as(other)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        decimal::Decimal,
        tensors::vector::{Vector, VectorError},
    };

    use super::{Hyperplane, HyperplaneError, Relation};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn plane(n: [f64; 3], k: f64) -> Hyperplane {
        Hyperplane::from_coefficients(n, k).unwrap()
    }

    fn line(n: [f64; 2], k: f64) -> Hyperplane {
        Hyperplane::from_coefficients(n, k).unwrap()
    }

    #[test]
    fn construction() {
        let h = Hyperplane::zero(3).unwrap();
        assert_eq!(h.dimension(), 3);
        assert!(h.normal().is_zero());
        assert!(h.constant().is_zero());
        assert_eq!(h.first_nonzero_index(), None);
        assert_eq!(h.basepoint(), None);

        assert_eq!(
            Hyperplane::from_coefficients(Vec::<i64>::new(), 1).unwrap_err(),
            VectorError::Empty
        );
        assert!(Hyperplane::from_coefficients([1, 2], "k").is_err());
    }

    #[test]
    fn basepoint() {
        let h = Hyperplane::from_coefficients([0, 2, 1], 3).unwrap();
        assert_eq!(h.first_nonzero_index(), Some(1));
        assert_eq!(h.basepoint(), Some(Vector::new(["0", "1.5", "0"]).unwrap()));
        assert_eq!(h.contains(&h.basepoint().unwrap()), Ok(true));
    }

    #[test]
    fn parallel_planes() {
        let p1 = plane([-0.412, 3.806, 0.728], -3.46);
        let p2 = plane([1.03, -9.515, -1.82], 8.65);
        assert!(p1.is_parallel_to(&p2));
        assert!(p1 == p2);
        assert_eq!(p1.relation_to(&p2), Relation::Identical);

        let p3 = plane([2.611, 5.528, 0.283], 4.6);
        let p4 = plane([7.715, 8.306, 5.342], 3.76);
        assert!(!p3.is_parallel_to(&p4));
        assert!(p3 != p4);
        assert_eq!(p3.relation_to(&p4), Relation::Intersecting);

        let p5 = plane([-7.926, 8.625, -7.212], -7.952);
        let p6 = plane([-2.642, 2.875, -2.404], -2.443);
        assert!(p5.is_parallel_to(&p6));
        assert!(p5 != p6);
        assert_eq!(p5.relation_to(&p6), Relation::Parallel);
        assert_eq!(
            p5.relation_to(&p6).to_string(),
            "parallel, not the same hyperplane"
        );
    }

    #[test]
    fn equality_of_degenerate_equations() {
        let z1 = Hyperplane::from_constant(3, d("1")).unwrap();
        let z2 = Hyperplane::from_coefficients([0, 0, 0], "1.00000000000001").unwrap();
        let z3 = Hyperplane::zero(3).unwrap();
        assert!(z1 == z2);
        assert!(z1 != z3);

        let p = plane([1.0, 1.0, 1.0], 1.0);
        assert!(p != z1);
        assert!(z1 != p);
        assert!(p != line([1.0, 1.0], 1.0));

        // every coefficient is below the tolerance, the magnitude is not
        let tiny = Hyperplane::from_coefficients(["9e-11", "9e-11"], 1).unwrap();
        assert!(!tiny.normal().is_zero());
        assert_eq!(tiny.basepoint(), None);
        assert!(tiny == tiny.clone());
        assert!(tiny == Hyperplane::from_constant(2, d("1")).unwrap());
        assert!(tiny != Hyperplane::zero(2).unwrap());
        assert!(tiny != line([1.0, 1.0], 1.0));
    }

    #[test]
    fn intersect_lines() {
        let l1 = line([4.046, 2.836], 1.21);
        let l2 = line([10.115, 7.09], 3.025);
        assert!(l1.is_parallel_to(&l2));
        assert!(l1 == l2);
        assert_eq!(
            l1.intersect_line(&l2),
            Err(HyperplaneError::NoUniqueSolution { coincident: true })
        );

        let l3 = line([7.204, 3.182], 8.68);
        let l4 = line([8.172, 4.114], 9.883);
        let p = l3.intersect_line(&l4).unwrap();
        assert!((&p[0] - &d("1.17277663546")).is_near_zero_within(&d("1e-10")));
        assert!((&p[1] - &d("0.0726955116633")).is_near_zero_within(&d("1e-10")));
        assert_eq!(l3.contains(&p), Ok(true));
        assert_eq!(l4.contains(&p), Ok(true));

        let l5 = line([1.182, 5.562], 6.744);
        let l6 = line([1.773, 8.343], 9.525);
        assert!(l5.is_parallel_to(&l6));
        assert!(l5 != l6);
        assert_eq!(
            l5.intersect_line(&l6),
            Err(HyperplaneError::NoUniqueSolution { coincident: false })
        );

        assert_eq!(
            plane([1.0, 0.0, 0.0], 1.0).intersect_line(&l1),
            Err(HyperplaneError::NotTwoDimensional(3))
        );
    }

    #[test]
    fn row_arithmetic() {
        let h = Hyperplane::from_coefficients([1, -1, 2], 3).unwrap();
        let g = Hyperplane::from_coefficients([0, 1, 1], 1).unwrap();

        let s = h.scaled(&(-2).into());
        assert_eq!(s.normal(), &Vector::new([-2, 2, -4]).unwrap());
        assert_eq!(s.constant(), &Decimal::from(-6));

        let r = h.plus_multiple(&3.into(), &g);
        assert_eq!(r.normal(), &Vector::new([1, 2, 5]).unwrap());
        assert_eq!(r.constant(), &Decimal::from(6));
    }
}
