//! # sharemat
//!
//! Dense matrices over a generic scalar type, with reference-counted
//! storage and zero-copy views. no-std compatible (needs `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use sharemat::Matrix;
//!
//! let m = Matrix::from_rows(3, 3, &[
//!     1.0_f64, 4.0, 0.0,
//!     0.0, 2.0, 0.0,
//!     0.0, 0.0, 3.0,
//! ]);
//!
//! // Views alias the parent's elements.
//! let t = m.transpose();
//! assert_eq!(t.get(1, 0), 4.0);
//!
//! let p = &t * &Matrix::eye(3);
//! assert_eq!(p.to_vec(), [1.0, 0.0, 0.0, 4.0, 2.0, 0.0, 0.0, 0.0, 3.0]);
//!
//! assert_eq!(m.determinant(), Ok(6.0));
//! let inv = m.inverse().unwrap();
//! assert_eq!(&m * &inv, Matrix::eye(3));
//! ```
//!
//! ## Sharing model
//!
//! A [`Matrix`] is a handle on a [`Storage`](storage::Storage). `clone()` is
//! shallow: both handles share one buffer and see each other's writes.
//! [`Matrix::copy`] is the deep copy. [`Matrix::transpose`],
//! [`Matrix::partial`], [`Matrix::row_vector`] and [`Matrix::column_vector`]
//! return views ([`TransposedMatrix`], [`PartialMatrix`]) that forward to
//! the parent's buffer through a coordinate transform; views of views nest
//! freely. Buffers are freed when the last handle drops.
//!
//! Elements sit in `Cell`s, so writes go through `&self`. Handles are
//! neither `Send` nor `Sync`.
//!
//! ## Modules
//!
//! - [`matrix`] — the [`Matrix`] facade, constructors, element access,
//!   operators, views, exchange / pivot-merge mutators and the text dump.
//! - [`storage`] — [`SharedBuffer`](storage::SharedBuffer), compact and
//!   alignment-padded [`Dense`](storage::Dense) stores, and the view
//!   variants.
//! - [`linalg`] — determinant, LU and UD decompositions, inverse.
//! - [`kernel`] — matrix-product backends: the default naive loop and a
//!   dense strided kernel that reads transposed operands in place.
//! - [`traits`] — [`Scalar`], [`LinalgScalar`], [`MatrixRef`], [`MatrixMut`].
//!
//! ## Errors
//!
//! Fallible methods return [`MatrixError`]. The arithmetic operators panic
//! with the same message; use `checked_add` / `checked_mul` / ... to get a
//! `Result` instead.
//!
//! ## Cargo features
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `std`     | yes     | `std::error::Error` for [`MatrixError`]; std for `num-traits` and `tracing` |
//! | `complex` | no      | `Complex<f32>` / `Complex<f64>` elements via `num-complex` |
//! | `all`     | no      | `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub mod kernel;
pub mod linalg;
pub mod matrix;
pub mod storage;
pub mod traits;

pub use error::MatrixError;
pub use linalg::{Lu, Ud};
pub use matrix::{Dump, Matrix, PartialMatrix, TransposedMatrix};
pub use traits::{LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
