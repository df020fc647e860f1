//! Coordinate vectors and the geometry built on them.

pub mod vector;
