//! # hhsvd
//!
//! Pure-Rust singular value decomposition, no-std compatible. Householder
//! bidiagonalization followed by implicit-shift QR iteration on the bidiagonal
//! (Golub-Kahan-Reinsch), with guarded arithmetic and explicit error codes.
//!
//! ## Quick start
//!
//! ```
//! use hhsvd::DynMatrix;
//!
//! let a = DynMatrix::from_rows(3, 2, &[
//!     3.0_f64, 2.0,
//!     2.0, 3.0,
//!     0.0, 0.0,
//! ]);
//! let svd = a.svd().unwrap();
//! assert!((svd.singular_values()[0] - 5.0).abs() < 1e-12);
//! assert!((svd.singular_values()[1] - 1.0).abs() < 1e-12);
//! assert!((&svd.reconstruct() - &a).frobenius_norm() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`linalg`]: The decomposition itself. [`linalg::decompose`] fills
//!   caller-owned U, S, V and workspace buffers through the [`MatrixRef`] /
//!   [`MatrixMut`] traits and returns [`SvdError`] on failure. Tuning lives in
//!   [`SvdSettings`] (sweep budget, zero threshold).
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions and
//!   column-major `Vec<T>` storage, plus the [`DynVector<T>`] newtype. The
//!   [`DynSvd`] wrapper owns its factors; `a.svd()` is shorthand for it.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`), used by the decomposition
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade under the
//! `hhsvd` target: `debug` on entry, `trace` per converged singular value,
//! `warn` on non-convergence or numerical failure. No logger is installed.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`  | baseline | Pure-Rust software float fallback |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynMatrixf32, DynMatrixf64, DynSvd, DynVector, DynVectorf32, DynVectorf64};
pub use linalg::{NumericalFailure, SvdError, SvdSettings};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
