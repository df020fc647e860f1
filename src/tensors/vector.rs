use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Index, Mul, Neg, Sub},
    slice::Iter,
};

use smallvec::{smallvec, SmallVec};

use crate::decimal::{Decimal, DecimalContext, DecimalError, IntoDecimal};

/// Errors from constructing or combining vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// A vector needs at least one coordinate.
    Empty,
    /// A coordinate could not be converted.
    Decimal(DecimalError),
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
    /// The operation is undefined for a vector of (near-)zero magnitude.
    ZeroVector,
    /// The operation is not defined in this many dimensions.
    UnsupportedDimension(usize),
}

impl Display for VectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::Empty => write!(f, "The coordinates must be nonempty"),
            VectorError::Decimal(e) => write!(f, "Invalid coordinate: {}", e),
            VectorError::DimensionMismatch { expected, found } => write!(
                f,
                "Vectors do not have equal dimension: {} vs {}",
                expected, found
            ),
            VectorError::ZeroVector => write!(f, "The operation is undefined for the zero vector"),
            VectorError::UnsupportedDimension(d) => {
                write!(f, "The operation is not supported in {} dimensions", d)
            }
        }
    }
}

impl std::error::Error for VectorError {}

impl From<DecimalError> for VectorError {
    fn from(value: DecimalError) -> Self {
        VectorError::Decimal(value)
    }
}

/// The unit of an angle returned by [`Vector::angle_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// A coordinate vector with exact entries.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Vector {
    pub(crate) data: SmallVec<[Decimal; 3]>,
}

impl Vector {
    /// Create a new vector from a list of coordinates.
    ///
    /// ```
    /// use hyperplanes::tensors::vector::Vector;
    ///
    /// let v = Vector::new([8.462, 7.893, -8.187]).unwrap();
    /// let w = Vector::new(["6.984", "-5.975", "4.778"]).unwrap();
    /// assert_eq!(v.dimension(), w.dimension());
    /// ```
    pub fn new<I>(coordinates: I) -> Result<Vector, VectorError>
    where
        I: IntoIterator,
        I::Item: IntoDecimal,
    {
        let data = coordinates
            .into_iter()
            .map(IntoDecimal::into_decimal)
            .collect::<Result<SmallVec<_>, _>>()?;

        if data.is_empty() {
            return Err(VectorError::Empty);
        }

        Ok(Vector { data })
    }

    /// Create a new vector from a list of decimals.
    pub fn from_decimals(data: Vec<Decimal>) -> Result<Vector, VectorError> {
        if data.is_empty() {
            return Err(VectorError::Empty);
        }

        Ok(Vector { data: data.into() })
    }

    /// Create the zero vector of dimension `dimension`.
    pub fn zero(dimension: usize) -> Result<Vector, VectorError> {
        if dimension == 0 {
            return Err(VectorError::Empty);
        }

        Ok(Vector {
            data: smallvec![Decimal::zero(); dimension],
        })
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn coordinates(&self) -> &[Decimal] {
        &self.data
    }

    pub fn iter(&self) -> Iter<'_, Decimal> {
        self.data.iter()
    }

    fn check_dimension(&self, rhs: &Vector) -> Result<(), VectorError> {
        if self.data.len() != rhs.data.len() {
            return Err(VectorError::DimensionMismatch {
                expected: self.data.len(),
                found: rhs.data.len(),
            });
        }
        Ok(())
    }

    fn assert_dimension(&self, rhs: &Vector) {
        if self.data.len() != rhs.data.len() {
            panic!(
                "Vectors do not have equal dimension: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }
    }

    pub fn plus(&self, rhs: &Vector) -> Result<Vector, VectorError> {
        self.check_dimension(rhs)?;
        Ok(Vector {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect(),
        })
    }

    pub fn minus(&self, rhs: &Vector) -> Result<Vector, VectorError> {
        self.check_dimension(rhs)?;
        Ok(Vector {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| a - b).collect(),
        })
    }

    pub fn scalar_multiply(&self, c: &Decimal) -> Vector {
        Vector {
            data: self.data.iter().map(|x| x * c).collect(),
        }
    }

    /// Take the Euclidean scalar product of two vectors.
    pub fn dot(&self, rhs: &Vector) -> Result<Decimal, VectorError> {
        self.check_dimension(rhs)?;
        Ok(self.data.iter().zip(&rhs.data).map(|(a, b)| a * b).sum())
    }

    /// The exact square of the magnitude.
    pub fn norm_squared(&self) -> Decimal {
        self.data.iter().map(|x| x * x).sum()
    }

    /// The Euclidean norm, evaluated at the precision of the current
    /// [`DecimalContext`].
    pub fn magnitude(&self) -> Decimal {
        self.norm_squared().sqrt_abs()
    }

    /// Check if the magnitude is below the tolerance of the current context.
    pub fn is_zero(&self) -> bool {
        let eps = DecimalContext::current_epsilon();
        self.norm_squared() < &eps * &eps
    }

    /// Scale the vector to unit length.
    pub fn unit(&self) -> Result<Vector, VectorError> {
        if self.is_zero() {
            return Err(VectorError::ZeroVector);
        }

        let inv = Decimal::one().checked_div(&self.magnitude())?;
        Ok(self.scalar_multiply(&inv))
    }

    /// Compute the angle between two non-zero vectors.
    pub fn angle_with(&self, rhs: &Vector, unit: AngleUnit) -> Result<Decimal, VectorError> {
        self.check_dimension(rhs)?;
        if self.is_zero() || rhs.is_zero() {
            return Err(VectorError::ZeroVector);
        }

        let cos = self
            .dot(rhs)?
            .checked_div(&(self.magnitude() * rhs.magnitude()))?;
        let angle = cos.acos();

        Ok(match unit {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_degrees(),
        })
    }

    /// Check if two vectors point in the same or in opposite directions.
    /// The zero vector is parallel to every vector.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    pub fn is_parallel_to(&self, rhs: &Vector) -> bool {
        self.assert_dimension(rhs);
        if self.is_zero() || rhs.is_zero() {
            return true;
        }

        match self.angle_with(rhs, AngleUnit::Radians) {
            Ok(angle) => angle.is_near_zero() || (angle - Decimal::pi()).is_near_zero(),
            Err(e) => unreachable!("Angle between non-zero vectors of equal dimension: {}", e),
        }
    }

    /// Check if the scalar product is below the tolerance of the current context.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    pub fn is_orthogonal_to(&self, rhs: &Vector) -> bool {
        self.is_orthogonal_to_within(rhs, &DecimalContext::current_epsilon())
    }

    /// Check if `|self · rhs| < tolerance`.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    pub fn is_orthogonal_to_within(&self, rhs: &Vector, tolerance: &Decimal) -> bool {
        self.assert_dimension(rhs);
        let dot: Decimal = self.data.iter().zip(&rhs.data).map(|(a, b)| a * b).sum();
        dot.is_near_zero_within(tolerance)
    }

    /// Get the index of the first coordinate that is not near zero.
    pub fn first_nonzero_index(&self) -> Option<usize> {
        self.data.iter().position(|x| !x.is_near_zero())
    }

    fn as_three_dimensional(&self) -> Result<[Decimal; 3], VectorError> {
        match self.data.as_slice() {
            [x, y] => Ok([x.clone(), y.clone(), Decimal::zero()]),
            [x, y, z] => Ok([x.clone(), y.clone(), z.clone()]),
            _ => Err(VectorError::UnsupportedDimension(self.data.len())),
        }
    }

    /// Compute the Euclidean cross product in three dimensions. Two-dimensional
    /// vectors are embedded in the `z = 0` plane first.
    pub fn cross_product(&self, rhs: &Vector) -> Result<Vector, VectorError> {
        self.check_dimension(rhs)?;
        let [x1, y1, z1] = self.as_three_dimensional()?;
        let [x2, y2, z2] = rhs.as_three_dimensional()?;

        Ok(Vector {
            data: smallvec![
                &y1 * &z2 - &z1 * &y2,
                &z1 * &x2 - &x1 * &z2,
                &x1 * &y2 - &y1 * &x2,
            ],
        })
    }

    pub fn area_of_parallelogram(&self, rhs: &Vector) -> Result<Decimal, VectorError> {
        Ok(self.cross_product(rhs)?.magnitude())
    }

    pub fn area_of_triangle(&self, rhs: &Vector) -> Result<Decimal, VectorError> {
        Ok(self.area_of_parallelogram(rhs)? * Decimal::from((1, 2)))
    }

    /// Project the vector onto `base`.
    pub fn projection_onto(&self, base: &Vector) -> Result<Vector, VectorError> {
        self.check_dimension(base)?;
        if base.is_zero() {
            return Err(VectorError::ZeroVector);
        }

        let scale = self.dot(base)?.checked_div(&base.norm_squared())?;
        Ok(base.scalar_multiply(&scale))
    }

    /// The component of the vector that is orthogonal to `base`.
    pub fn component_orthogonal_to(&self, base: &Vector) -> Result<Vector, VectorError> {
        self.minus(&self.projection_onto(base)?)
    }
}

impl Index<usize> for Vector {
    type Output = Decimal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Decimal;
    type IntoIter = Iter<'a, Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl Display for Vector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(x, f)?;
        }
        f.write_str(")")
    }
}

impl<'a> Add<&'a Vector> for &'a Vector {
    type Output = Vector;

    /// Add two vectors.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    fn add(self, rhs: &'a Vector) -> Self::Output {
        self.assert_dimension(rhs);
        Vector {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect(),
        }
    }
}

impl<'a> Sub<&'a Vector> for &'a Vector {
    type Output = Vector;

    /// Subtract two vectors.
    ///
    /// # Panics
    ///
    /// Panics when the dimensions differ.
    fn sub(self, rhs: &'a Vector) -> Self::Output {
        self.assert_dimension(rhs);
        Vector {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| a - b).collect(),
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = -&*e;
        }
        self
    }
}

impl Mul<&Decimal> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &Decimal) -> Self::Output {
        self.scalar_multiply(rhs)
    }
}

#[cfg(test)]
mod test {
    use crate::decimal::Decimal;

    use super::{AngleUnit, Vector, VectorError};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn construction() {
        assert_eq!(Vector::new(Vec::<i64>::new()), Err(VectorError::Empty));
        assert!(matches!(
            Vector::new(["1", "x"]),
            Err(VectorError::Decimal(_))
        ));
        assert_eq!(Vector::zero(0), Err(VectorError::Empty));

        let v = Vector::new([1, 2, 3]).unwrap();
        assert_eq!(v.dimension(), 3);
        assert_eq!(v[1], 2.into());
        assert_eq!(Vector::zero(2).unwrap(), Vector::new([0, 0]).unwrap());
    }

    #[test]
    fn plus_minus_scale() {
        let v = Vector::new([8.218, -9.341]).unwrap();
        let w = Vector::new([-1.129, 2.111]).unwrap();
        assert_eq!(v.plus(&w).unwrap(), Vector::new(["7.089", "-7.23"]).unwrap());
        assert_eq!(v.plus(&w).unwrap(), w.plus(&v).unwrap());
        assert_eq!(v.plus(&w).unwrap().minus(&w).unwrap(), v);
        assert_eq!(&v + &w, v.plus(&w).unwrap());
        assert_eq!(&v - &w, v.minus(&w).unwrap());

        let s = Vector::new([1.671, -1.012, -0.318]).unwrap();
        assert_eq!(
            s.scalar_multiply(&d("7.41")),
            Vector::new(["12.38211", "-7.49892", "-2.35638"]).unwrap()
        );
        assert_eq!(-s.clone(), s.scalar_multiply(&(-1).into()));

        let u = Vector::new([1, 2, 3]).unwrap();
        assert_eq!(
            v.plus(&u),
            Err(VectorError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    #[should_panic]
    fn operator_dimension_mismatch() {
        let v = Vector::new([1, 2]).unwrap();
        let w = Vector::new([1, 2, 3]).unwrap();
        let _ = &v + &w;
    }

    #[test]
    fn magnitude_and_unit() {
        let v = Vector::new([3, 4]).unwrap();
        assert_eq!(v.magnitude(), 5.into());
        assert_eq!(v.unit().unwrap(), Vector::new(["0.6", "0.8"]).unwrap());

        let w = Vector::new([-0.221, 7.437]).unwrap();
        assert!((w.magnitude() - d("7.440282924728")).is_near_zero_within(&d("1e-12")));

        let u = Vector::new([5.581, -2.136]).unwrap().unit().unwrap();
        assert!((u.magnitude() - Decimal::one()).is_near_zero());

        assert_eq!(
            Vector::zero(3).unwrap().unit(),
            Err(VectorError::ZeroVector)
        );
    }

    #[test]
    fn dot_and_angle() {
        let v = Vector::new([7.887, 4.138]).unwrap();
        let w = Vector::new([-8.802, 6.776]).unwrap();
        assert_eq!(v.dot(&w).unwrap(), d("-41.382286"));

        let v = Vector::new([3.183, -7.627]).unwrap();
        let w = Vector::new([-2.668, 5.319]).unwrap();
        let rad = v.angle_with(&w, AngleUnit::Radians).unwrap();
        assert!((rad - d("3.07202630983")).is_near_zero_within(&d("1e-10")));

        let v = Vector::new([7.35, 0.221, 5.188]).unwrap();
        let w = Vector::new([2.751, 8.259, 3.985]).unwrap();
        let deg = v.angle_with(&w, AngleUnit::Degrees).unwrap();
        assert!((deg - d("60.27581120523")).is_near_zero_within(&d("1e-9")));

        let zero = Vector::zero(3).unwrap();
        assert_eq!(
            v.angle_with(&zero, AngleUnit::Radians),
            Err(VectorError::ZeroVector)
        );
    }

    #[test]
    fn parallel_and_orthogonal() {
        let v = Vector::new([-7.579, -7.88]).unwrap();
        let w = Vector::new([22.737, 23.64]).unwrap();
        assert!(v.is_parallel_to(&w));
        assert!(!v.is_orthogonal_to(&w));

        let v = Vector::new([-2.029, 9.97, 4.172]).unwrap();
        let w = Vector::new([-9.231, -6.639, -7.245]).unwrap();
        assert!(!v.is_parallel_to(&w));
        assert!(!v.is_orthogonal_to(&w));

        let v = Vector::new([-2.328, -7.284, -1.214]).unwrap();
        let w = Vector::new([-1.821, 1.072, -2.94]).unwrap();
        assert!(!v.is_parallel_to(&w));
        assert!(v.is_orthogonal_to(&w));

        let v = Vector::new([2.118, 4.827]).unwrap();
        let zero = Vector::zero(2).unwrap();
        assert!(v.is_parallel_to(&zero));
        assert!(v.is_orthogonal_to(&zero));
        assert!(v.is_parallel_to(&-v.clone()));
        assert!(!v.is_orthogonal_to_within(&Vector::new([1, 0]).unwrap(), &d("2")));

        // small but above the tolerance: the angle decides
        let v = Vector::new(["1e-9", "1e-9"]).unwrap();
        assert!(v.is_parallel_to(&Vector::new(["2e-9", "2e-9"]).unwrap()));
        assert!(!v.is_parallel_to(&Vector::new(["1e-9", "-1e-9"]).unwrap()));
    }

    #[test]
    #[should_panic]
    fn parallel_dimension_mismatch() {
        let v = Vector::new([1, 2]).unwrap();
        v.is_parallel_to(&Vector::new([1, 2, 3]).unwrap());
    }

    #[test]
    fn projection() {
        let v = Vector::new([-0.123, 2.0]).unwrap();
        let b = Vector::new([3, 4]).unwrap();
        let p = v.projection_onto(&b).unwrap();
        let q = v.component_orthogonal_to(&b).unwrap();
        assert!(p.is_parallel_to(&b));
        assert!(q.is_orthogonal_to(&b));
        assert_eq!(p.plus(&q).unwrap(), v);

        let v = Vector::new([3.039, 1.879]).unwrap();
        let b = Vector::new([0.825, 2.036]).unwrap();
        let p = v.projection_onto(&b).unwrap();
        assert!((&p[0] - &d("1.08260696248")).is_near_zero_within(&d("1e-10")));
        assert!((&p[1] - &d("2.67174275832")).is_near_zero_within(&d("1e-10")));

        assert_eq!(
            v.projection_onto(&Vector::zero(2).unwrap()),
            Err(VectorError::ZeroVector)
        );
    }

    #[test]
    fn cross_product() {
        let v = Vector::new([8.462, 7.893, -8.187]).unwrap();
        let w = Vector::new([6.984, -5.975, 4.778]).unwrap();
        let c = v.cross_product(&w).unwrap();
        assert_eq!(
            c,
            Vector::new(["-11.204571", "-97.609444", "-105.685162"]).unwrap()
        );
        assert_eq!(c, w.cross_product(&v).unwrap().scalar_multiply(&(-1).into()));
        assert!(c.is_orthogonal_to(&v));
        assert!(c.is_orthogonal_to(&w));

        let v = Vector::new([1, 0]).unwrap();
        let w = Vector::new([0, 1]).unwrap();
        assert_eq!(
            v.cross_product(&w).unwrap(),
            Vector::new([0, 0, 1]).unwrap()
        );

        let v = Vector::new([1, 2, 3, 4]).unwrap();
        assert_eq!(
            v.cross_product(&v),
            Err(VectorError::UnsupportedDimension(4))
        );
    }

    #[test]
    fn areas() {
        let v = Vector::new([3, 0, 0]).unwrap();
        let w = Vector::new([0, 4, 0]).unwrap();
        assert_eq!(v.area_of_parallelogram(&w).unwrap(), 12.into());
        assert_eq!(v.area_of_triangle(&w).unwrap(), 6.into());

        let v = Vector::new([-8.987, -9.838, 5.031]).unwrap();
        let w = Vector::new([-4.268, -1.861, -8.866]).unwrap();
        let area = v.area_of_parallelogram(&w).unwrap();
        assert!((area - d("142.122221402")).is_near_zero_within(&d("1e-8")));
    }

    #[test]
    fn first_nonzero_index() {
        assert_eq!(
            Vector::new(["0", "1e-12", "2"]).unwrap().first_nonzero_index(),
            Some(2)
        );
        assert_eq!(Vector::zero(3).unwrap().first_nonzero_index(), None);
    }
}
