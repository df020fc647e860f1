//! Exact-arithmetic vectors, lines, planes and their higher-dimensional
//! generalisation, together with a Gaussian-elimination solver that brings a
//! system of hyperplane equations into triangular and reduced row-echelon form
//! and classifies its solutions.
//!
//! For example:
//!
//! ```
//! use hyperplanes::{
//!     hyperplane::Hyperplane,
//!     linear_system::{LinearSystem, Solution},
//! };
//!
//! let system = LinearSystem::new(vec![
//!     Hyperplane::from_coefficients([0, 1, 1], 1).unwrap(),
//!     Hyperplane::from_coefficients([1, -1, 1], 2).unwrap(),
//!     Hyperplane::from_coefficients([1, 2, -5], 3).unwrap(),
//! ])
//! .unwrap();
//!
//! println!("{}", system.compute_triangular_form());
//!
//! match system.solve() {
//!     Solution::Unique(x) => println!("x = {}", x),
//!     Solution::Infinite(p) => println!("{}", p),
//!     Solution::NoSolution => println!("no solutions"),
//! }
//! ```
//!
//! Arithmetic is exact. Square roots and angles are evaluated at the precision of
//! the thread's [`DecimalContext`](decimal::DecimalContext), which also holds the
//! tolerance used to decide whether a coefficient vanishes.

pub mod decimal;
pub mod hyperplane;
pub mod linear_system;
pub mod printer;
pub mod tensors;
