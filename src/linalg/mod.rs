//! Dense numeric algorithms on [`Matrix`](crate::Matrix).
//!
//! All of them read their input through the element interface, so views
//! work as inputs without being materialised, and all of them build their
//! results in fresh dense scratch matrices.
//!
//! | Method | Result |
//! |---|---|
//! | `determinant()` | cofactor expansion along the first column |
//! | `co_matrix(r, c)` | minor with row `r` and column `c` removed |
//! | `decompose_lu()` / `lu()` | packed `[L \| U]`, no pivoting |
//! | `decompose_ud()` / `ud()` | packed `[U \| D]` of a symmetric matrix |
//! | `inverse()` | Gauss-Jordan with row exchange on zero pivots |

mod determinant;
mod inverse;
mod lu;
mod ud;

pub use lu::Lu;
pub use ud::Ud;
