//! # Parameters
//!
//! $$
//! A=\begin{pmatrix}\alpha_0 & \alpha_2 q\\\\ \alpha_2/q & \alpha_1\end{pmatrix},
//! \qquad q=\sqrt{\sigma_0/\sigma_1}
//! $$
//!
//! Drift and diffusion parametrization of the wrapped OU process. The
//! three-scalar encoding of `A` enforces that `A^-1 * Sigma` is symmetric;
//! positive definiteness holds iff `a0 * a1 > a2^2`.
use ndarray::array;
use ndarray::Array2;

use crate::error::DensityError;
use crate::error::DensityResult;

/// Shrink factor applied to the off-diagonal drift coefficient when the
/// encoding fails the positive-definiteness test. Strictly below 1, so the
/// corrected discriminant is strictly positive.
pub const DRIFT_SHRINK: f64 = 0.9999;

/// How to handle a drift encoding that fails `a0 * a1 > a2^2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionMode {
  /// Shrink `a2` onto the positive-definite region and continue.
  #[default]
  Correct,
  /// Reject the encoding with [`DensityError::NonPositiveDefiniteDrift`].
  Strict,
}

/// Diagonal of the diffusion matrix Sigma. These are the *squares*
/// (variances) of the coefficients multiplying the Wiener process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionVars {
  var0: f64,
  var1: f64,
}

impl DiffusionVars {
  /// Both variances must be strictly positive: the kernel divides by each
  /// of them and by `sqrt(var0 / var1)`.
  pub fn new(var0: f64, var1: f64) -> DensityResult<Self> {
    for (index, value) in [(0, var0), (1, var1)] {
      if value <= 0.0 {
        return Err(DensityError::NonPositiveVariance { index, value });
      }
    }

    Ok(Self { var0, var1 })
  }

  pub fn var0(&self) -> f64 {
    self.var0
  }

  pub fn var1(&self) -> f64 {
    self.var1
  }

  /// Ratio `q = sqrt(var0 / var1)` scaling the off-diagonal drift entries.
  pub fn aspect(&self) -> f64 {
    (self.var0 / self.var1).sqrt()
  }
}

/// Three-scalar encoding `(a0, a1, a2)` of the 2x2 drift matrix `A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftCoeffs {
  /// Upper-left entry of `A`.
  pub a0: f64,
  /// Lower-right entry of `A`.
  pub a1: f64,
  /// Cross-coupling coefficient; enters `A` as `a2 * q` and `a2 / q`.
  pub a2: f64,
}

impl DriftCoeffs {
  pub fn new(a0: f64, a1: f64, a2: f64) -> Self {
    Self { a0, a1, a2 }
  }

  /// `a0 * a1 - a2^2`, positive iff the encoded matrix yields a positive
  /// definite `A^-1 * Sigma`.
  pub fn discriminant(&self) -> f64 {
    self.a0 * self.a1 - self.a2 * self.a2
  }

  pub fn is_positive_definite(&self) -> bool {
    self.discriminant() > 0.0
  }

  /// Returns an encoding guaranteed to pass the positive-definiteness test,
  /// leaving the receiver untouched.
  ///
  /// A passing encoding is returned as-is. A failing one is either rejected
  /// ([`CorrectionMode::Strict`]) or has its `a2` replaced by
  /// `signum(a2) * sqrt(a0 * a1) * DRIFT_SHRINK`. The shrink target only
  /// exists when `a0 * a1 > 0`; otherwise the encoding is uncorrectable and
  /// an error is returned in both modes.
  pub fn validated(self, mode: CorrectionMode) -> DensityResult<Self> {
    if self.is_positive_definite() {
      return Ok(self);
    }

    match mode {
      CorrectionMode::Strict => Err(DensityError::NonPositiveDefiniteDrift {
        discriminant: self.discriminant(),
      }),
      CorrectionMode::Correct => {
        let diagonal_product = self.a0 * self.a1;
        if diagonal_product <= 0.0 {
          return Err(DensityError::UncorrectableDrift { diagonal_product });
        }

        Ok(Self {
          a2: self.a2.signum() * diagonal_product.sqrt() * DRIFT_SHRINK,
          ..self
        })
      }
    }
  }

  /// Materializes `A` for the given diffusion variances.
  pub fn matrix(&self, sigma: &DiffusionVars) -> Array2<f64> {
    let q = sigma.aspect();

    array![[self.a0, self.a2 * q], [self.a2 / q, self.a1]]
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn rejects_non_positive_variances() {
    assert_eq!(
      DiffusionVars::new(0.0, 1.0),
      Err(DensityError::NonPositiveVariance {
        index: 0,
        value: 0.0
      })
    );
    assert_eq!(
      DiffusionVars::new(1.0, -2.0),
      Err(DensityError::NonPositiveVariance {
        index: 1,
        value: -2.0
      })
    );
    assert!(DiffusionVars::new(1.5, 0.3).is_ok());
  }

  #[test]
  fn aspect_is_sqrt_of_variance_ratio() {
    let sigma = DiffusionVars::new(4.0, 1.0).unwrap();
    assert_relative_eq!(sigma.aspect(), 2.0);
  }

  #[test]
  fn passing_encoding_is_returned_unchanged() {
    let drift = DriftCoeffs::new(1.0, 1.0, 0.5);
    assert_eq!(drift.validated(CorrectionMode::Correct).unwrap(), drift);
    assert_eq!(drift.validated(CorrectionMode::Strict).unwrap(), drift);
  }

  #[test]
  fn zero_cross_coupling_with_positive_diagonal_needs_no_correction() {
    let drift = DriftCoeffs::new(2.0, 0.5, 0.0);
    assert!(drift.is_positive_definite());
    assert_eq!(drift.validated(CorrectionMode::Strict).unwrap(), drift);
  }

  #[test]
  fn correction_shrinks_a2_onto_the_positive_definite_region() {
    let drift = DriftCoeffs::new(1.0, 1.0, 5.0);
    let corrected = drift.validated(CorrectionMode::Correct).unwrap();

    assert_relative_eq!(corrected.a2, 0.9999);
    assert!(corrected.is_positive_definite());
    // The receiver keeps the raw encoding.
    assert_relative_eq!(drift.a2, 5.0);
  }

  #[test]
  fn correction_preserves_the_sign_of_a2() {
    let corrected = DriftCoeffs::new(1.0, 4.0, -7.0)
      .validated(CorrectionMode::Correct)
      .unwrap();

    assert_relative_eq!(corrected.a2, -2.0 * 0.9999);
    assert!(corrected.is_positive_definite());
  }

  #[test]
  fn strict_mode_rejects_what_correction_would_fix() {
    let err = DriftCoeffs::new(1.0, 1.0, 5.0)
      .validated(CorrectionMode::Strict)
      .unwrap_err();

    assert_eq!(
      err,
      DensityError::NonPositiveDefiniteDrift {
        discriminant: -24.0
      }
    );
  }

  #[test]
  fn non_positive_diagonal_product_is_uncorrectable() {
    let drift = DriftCoeffs::new(-1.0, 1.0, 0.0);

    assert_eq!(
      drift.validated(CorrectionMode::Correct).unwrap_err(),
      DensityError::UncorrectableDrift {
        diagonal_product: -1.0
      }
    );
    assert!(matches!(
      drift.validated(CorrectionMode::Strict).unwrap_err(),
      DensityError::NonPositiveDefiniteDrift { .. }
    ));
  }

  #[test]
  fn matrix_applies_the_aspect_ratio_to_the_off_diagonal() {
    let sigma = DiffusionVars::new(4.0, 1.0).unwrap();
    let a = DriftCoeffs::new(1.0, 2.0, 0.5).matrix(&sigma);

    assert_relative_eq!(a[[0, 0]], 1.0);
    assert_relative_eq!(a[[1, 1]], 2.0);
    assert_relative_eq!(a[[0, 1]], 1.0);
    assert_relative_eq!(a[[1, 0]], 0.25);
  }
}
