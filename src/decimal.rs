use std::{
    cell::RefCell,
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rug::{float::Constant, ops::Pow, Float, Integer, Rational};

thread_local!(
    /// The precision context of the current thread. Every thread starts from
    /// [`DecimalContext::default`].
    static CONTEXT: RefCell<DecimalContext> = RefCell::new(DecimalContext::default())
);

/// Settings that govern the inexact operations on [`Decimal`]s.
///
/// Addition, subtraction, multiplication and division are always exact. The
/// context only affects square roots, inverse cosines, the value of pi, the
/// tolerance used by [`Decimal::is_near_zero`] and the number of places used
/// when a decimal is displayed.
#[derive(Clone, Debug, PartialEq)]
pub struct DecimalContext {
    /// Binary precision of irrational operations.
    pub precision: u32,
    /// Absolute tolerance below which a value counts as zero.
    pub epsilon: Decimal,
    /// Maximal number of decimal places written by `Display`.
    pub display_places: usize,
}

impl Default for DecimalContext {
    fn default() -> Self {
        DecimalContext {
            precision: 100,
            epsilon: Decimal::from((1, 10_000_000_000)),
            display_places: 28,
        }
    }
}

impl DecimalContext {
    /// Get a copy of the context of the current thread.
    pub fn get() -> DecimalContext {
        CONTEXT.with(|c| c.borrow().clone())
    }

    /// Replace the context of the current thread, returning the previous one.
    pub fn set(context: DecimalContext) -> DecimalContext {
        CONTEXT.with(|c| c.replace(context))
    }

    /// Run `f` with `context` installed and restore the previous context afterwards,
    /// also when `f` panics.
    pub fn with<T>(context: DecimalContext, f: impl FnOnce() -> T) -> T {
        let _guard = RestoreContext(Some(Self::set(context)));
        f()
    }

    pub(crate) fn current_precision() -> u32 {
        CONTEXT.with(|c| c.borrow().precision)
    }

    pub(crate) fn current_epsilon() -> Decimal {
        CONTEXT.with(|c| c.borrow().epsilon.clone())
    }
}

/// Puts the held context back on the current thread when dropped.
struct RestoreContext(Option<DecimalContext>);

impl Drop for RestoreContext {
    #[inline]
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            let _ = CONTEXT.try_with(|c| {
                if let Ok(mut c) = c.try_borrow_mut() {
                    *c = previous;
                }
            });
        }
    }
}

/// Errors from parsing or dividing decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecimalError {
    Parse(String),
    NotFinite,
    DivisionByZero,
    NegativeSqrt,
}

impl Display for DecimalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::Parse(s) => write!(f, "Could not parse '{}' as a decimal", s),
            DecimalError::NotFinite => write!(f, "The value is not finite"),
            DecimalError::DivisionByZero => write!(f, "Division by zero"),
            DecimalError::NegativeSqrt => write!(f, "Square root of a negative number"),
        }
    }
}

impl std::error::Error for DecimalError {}

/// An exact scalar. Decimal literals such as `4.046` are stored without
/// rounding, as are the results of `+`, `-`, `*` and [`Decimal::checked_div`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Decimal(Rational);

fn pow10(e: u32) -> Integer {
    Integer::from(10).pow(e)
}

/// Round to the nearest integer, with ties going to the even neighbour.
fn round_half_even(r: &Rational) -> Integer {
    let floor = r.clone().floor();
    let diff = Rational::from(r - &floor);
    let mut n = floor.numer().clone();
    match diff.cmp(&Rational::from((1, 2))) {
        Ordering::Greater => n += 1,
        Ordering::Equal if n.is_odd() => n += 1,
        _ => {}
    }
    n
}

impl Decimal {
    pub fn zero() -> Decimal {
        Decimal(Rational::new())
    }

    pub fn one() -> Decimal {
        Decimal(Rational::from(1))
    }

    /// Convert a finite float that was produced by an operation on finite input.
    fn from_finite_float(f: Float) -> Decimal {
        debug_assert!(f.is_finite());
        Decimal(f.to_rational().unwrap_or_default())
    }

    fn to_float(&self) -> Float {
        Float::with_val(DecimalContext::current_precision(), &self.0)
    }

    /// Get the underlying rational number.
    pub fn as_rational(&self) -> &Rational {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }

    pub fn is_one(&self) -> bool {
        *self.0.numer() == 1 && *self.0.denom() == 1
    }

    pub fn is_integer(&self) -> bool {
        *self.0.denom() == 1
    }

    /// Check if `|self|` is smaller than the epsilon of the current [`DecimalContext`].
    pub fn is_near_zero(&self) -> bool {
        self.is_near_zero_within(&DecimalContext::current_epsilon())
    }

    /// Check if `|self| < eps`.
    pub fn is_near_zero_within(&self, eps: &Decimal) -> bool {
        self.0.clone().abs() < eps.0
    }

    pub fn abs(&self) -> Decimal {
        Decimal(self.0.clone().abs())
    }

    /// Divide `self` by `rhs`, failing when `rhs` is exactly zero.
    pub fn checked_div(&self, rhs: &Decimal) -> Result<Decimal, DecimalError> {
        if rhs.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        Ok(Decimal(Rational::from(&self.0 / &rhs.0)))
    }

    /// Compute the square root at the precision of the current context.
    pub fn sqrt(&self) -> Result<Decimal, DecimalError> {
        if self.is_negative() {
            return Err(DecimalError::NegativeSqrt);
        }
        Ok(self.sqrt_abs())
    }

    /// The square root of `|self|`.
    pub(crate) fn sqrt_abs(&self) -> Decimal {
        Decimal::from_finite_float(self.abs().to_float().sqrt())
    }

    /// Compute the inverse cosine in radians. The argument is clamped to `[-1, 1]`
    /// first, so that rounding noise just outside the domain is harmless.
    pub fn acos(&self) -> Decimal {
        let one = Decimal::one();
        let minus_one = -Decimal::one();
        let clamped = if *self > one {
            one
        } else if *self < minus_one {
            minus_one
        } else {
            self.clone()
        };
        Decimal::from_finite_float(clamped.to_float().acos())
    }

    /// Pi at the precision of the current context.
    pub fn pi() -> Decimal {
        Decimal::from_finite_float(Float::with_val(
            DecimalContext::current_precision(),
            Constant::Pi,
        ))
    }

    /// Convert an angle in radians to degrees.
    pub fn to_degrees(&self) -> Decimal {
        let pi = Float::with_val(DecimalContext::current_precision(), Constant::Pi);
        Decimal::from_finite_float(self.to_float() * 180u32 / pi)
    }

    /// Round to `places` decimal places, with ties going to the even neighbour.
    pub fn round_to_places(&self, places: u32) -> Decimal {
        let scale = Rational::from(pow10(places));
        let n = round_half_even(&Rational::from(&self.0 * &scale));
        Decimal(Rational::from((n, pow10(places))))
    }

    /// Write the value with exactly `places` decimal places, or fewer when `trim`
    /// is set and the expansion ends in zeros.
    pub fn to_fixed_string(&self, places: usize, trim: bool) -> String {
        let scale = Rational::from(pow10(places as u32));
        let n = round_half_even(&Rational::from(&self.0 * &scale));
        let negative = n.cmp0() == Ordering::Less;

        let mut digits = n.abs().to_string();
        if digits.len() <= places {
            digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - places);

        let mut out = String::with_capacity(digits.len() + 2);
        if negative {
            out.push('-');
        }
        out.push_str(int_part);
        if places > 0 {
            let frac_part = if trim {
                frac_part.trim_end_matches('0')
            } else {
                frac_part
            };
            if !frac_part.is_empty() {
                out.push('.');
                out.push_str(frac_part);
            }
        }
        out
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => f.write_str(&self.to_fixed_string(p, false)),
            None => {
                let places = CONTEXT.with(|c| c.borrow().display_places);
                f.write_str(&self.to_fixed_string(places, true))
            }
        }
    }
}

/// The largest power of ten a parsed literal may be scaled by.
const MAX_DECIMAL_EXPONENT: u32 = 100_000;

/// Parse `[+-]digits[.digits][(e|E)[+-]digits]` or `[+-]digits/digits`. The
/// exponent, after shifting out the fractional digits, must lie within
/// `±MAX_DECIMAL_EXPONENT`.
fn parse_rational(s: &str) -> Option<Rational> {
    let s = s.trim();

    if let Some((num, den)) = s.split_once('/') {
        let num = Integer::from_str_radix(num.trim(), 10).ok()?;
        let den = Integer::from_str_radix(den.trim(), 10).ok()?;
        if den.cmp0() == Ordering::Equal {
            return None;
        }
        return Some(Rational::from((num, den)));
    }

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(p) => (&s[..p], s[p + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let mut num = Integer::from_str_radix(&format!("{}{}", int_part, frac_part), 10).ok()?;
    if negative {
        num = -num;
    }

    let shift = exponent as i64 - frac_part.len() as i64;
    let shift_abs = u32::try_from(shift.unsigned_abs())
        .ok()
        .filter(|&e| e <= MAX_DECIMAL_EXPONENT)?;
    if shift >= 0 {
        Some(Rational::from(num * pow10(shift_abs)))
    } else {
        Some(Rational::from((num, pow10(shift_abs))))
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rational(s)
            .map(Decimal)
            .ok_or_else(|| DecimalError::Parse(s.to_owned()))
    }
}

impl TryFrom<f64> for Decimal {
    type Error = DecimalError;

    /// Convert through the shortest decimal representation that round-trips to
    /// the same float, so that `4.046` becomes exactly `4.046`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(DecimalError::NotFinite);
        }
        format!("{}", value).parse()
    }
}

impl From<Rational> for Decimal {
    fn from(value: Rational) -> Self {
        Decimal(value)
    }
}

impl From<Integer> for Decimal {
    fn from(value: Integer) -> Self {
        Decimal(Rational::from(value))
    }
}

impl From<(i64, i64)> for Decimal {
    /// Create the fraction `num / den`.
    ///
    /// # Panics
    ///
    /// Panics when `den` is zero.
    fn from((num, den): (i64, i64)) -> Self {
        Decimal(Rational::from((num, den)))
    }
}

macro_rules! from_integer_impl {
    ($($t:ty),*) => {
        $(
        impl From<$t> for Decimal {
            fn from(value: $t) -> Self {
                Decimal(Rational::from(value))
            }
        }
        )*
    };
}

from_integer_impl!(i32, i64, u32, u64, usize);

/// Conversion of coordinate-like input into a [`Decimal`].
pub trait IntoDecimal {
    fn into_decimal(self) -> Result<Decimal, DecimalError>;
}

macro_rules! into_decimal_infallible {
    ($($t:ty),*) => {
        $(
        impl IntoDecimal for $t {
            fn into_decimal(self) -> Result<Decimal, DecimalError> {
                Ok(Decimal::from(self))
            }
        }
        )*
    };
}

into_decimal_infallible!(i32, i64, u32, u64, usize, Decimal, Rational, Integer);

impl IntoDecimal for &Decimal {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        Ok(self.clone())
    }
}

impl IntoDecimal for f64 {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        Decimal::try_from(self)
    }
}

impl IntoDecimal for f32 {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        // go through the shortest f32 representation, not the widened f64
        if !self.is_finite() {
            return Err(DecimalError::NotFinite);
        }
        format!("{}", self).parse()
    }
}

impl IntoDecimal for &str {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        self.parse()
    }
}

impl IntoDecimal for String {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        self.parse()
    }
}

impl IntoDecimal for &String {
    fn into_decimal(self) -> Result<Decimal, DecimalError> {
        self.parse()
    }
}

macro_rules! binary_op_impl {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident) => {
        impl $op<Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                Decimal(self.0.$method(rhs.0))
            }
        }

        impl<'a> $op<&'a Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &'a Decimal) -> Decimal {
                Decimal(self.0.$method(&rhs.0))
            }
        }

        impl<'a> $op<Decimal> for &'a Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                Decimal(Rational::from((&self.0).$method(&rhs.0)))
            }
        }

        impl<'a, 'b> $op<&'b Decimal> for &'a Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &'b Decimal) -> Decimal {
                Decimal(Rational::from((&self.0).$method(&rhs.0)))
            }
        }

        impl $op_assign<Decimal> for Decimal {
            #[inline]
            fn $method_assign(&mut self, rhs: Decimal) {
                self.0.$method_assign(rhs.0);
            }
        }

        impl<'a> $op_assign<&'a Decimal> for Decimal {
            #[inline]
            fn $method_assign(&mut self, rhs: &'a Decimal) {
                self.0.$method_assign(&rhs.0);
            }
        }
    };
}

binary_op_impl!(Add, add, AddAssign, add_assign);
binary_op_impl!(Sub, sub, SubAssign, sub_assign);
binary_op_impl!(Mul, mul, MulAssign, mul_assign);

impl Neg for Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Self::Output {
        Decimal(-self.0)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Self::Output {
        Decimal(Rational::from(-&self.0))
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}
