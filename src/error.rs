//! Errors for stationary-density evaluation: parameter validation and
//! numeric-domain checks.

use std::error::Error;
use std::fmt;

/// Crate-wide result alias for operations that may produce [`DensityError`].
pub type DensityResult<T> = Result<T, DensityError>;

/// Unified error type for the wrapped OU stationary density.
///
/// Construction of an evaluator either succeeds or fails with one of these;
/// evaluation itself is total once an evaluator exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityError {
  /// A diffusion variance is zero or negative. Both entries of the diagonal
  /// of Sigma are divided by and square-rooted, so they must be strictly
  /// positive.
  NonPositiveVariance { index: usize, value: f64 },

  /// The drift encoding fails `a0 * a1 > a2^2` and strict validation was
  /// requested instead of the off-diagonal correction.
  NonPositiveDefiniteDrift { discriminant: f64 },

  /// The drift diagonal product `a0 * a1` is non-positive, so no choice of
  /// `a2` can make the encoded matrix positive definite.
  UncorrectableDrift { diagonal_product: f64 },

  /// `det(2 * Sigma^-1 * A)` came out non-positive after validation, leaving
  /// the log-normalizing constant undefined.
  DegenerateKernel { det: f64 },
}

impl fmt::Display for DensityError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DensityError::NonPositiveVariance { index, value } => write!(
        f,
        "diffusion variance sigma[{}] = {} must be strictly positive",
        index, value
      ),
      DensityError::NonPositiveDefiniteDrift { discriminant } => write!(
        f,
        "drift encoding is not positive definite: a0 * a1 - a2^2 = {} <= 0",
        discriminant
      ),
      DensityError::UncorrectableDrift { diagonal_product } => write!(
        f,
        "drift diagonal product a0 * a1 = {} <= 0 admits no positive definite correction",
        diagonal_product
      ),
      DensityError::DegenerateKernel { det } => write!(
        f,
        "exponent matrix 2 * Sigma^-1 * A has non-positive determinant {}",
        det
      ),
    }
  }
}

impl Error for DensityError {}
