//! # Wrapped OU stationary density
//!
//! $$
//! p(\mathbf{x})\propto\sum_{\mathbf{k}\in\mathbb{Z}^2}
//! \exp\!\left(-\tfrac{1}{2}\,(\mathbf{x}-\boldsymbol{\mu}+2\pi\mathbf{k})^\top
//! \left(\tfrac{1}{2}A^{-1}\Sigma\right)^{-1}
//! (\mathbf{x}-\boldsymbol{\mu}+2\pi\mathbf{k})\right)
//! $$
//!
//! Stationary density of the bivariate wrapped Ornstein-Uhlenbeck (MWN-OU)
//! diffusion with diagonal diffusion matrix, evaluated on the torus
//! `[-pi, pi)^2`. The infinite wrapping sum is truncated at `max_winding`
//! copies per axis and the exponent at `etrunc`; the returned values are
//! unnormalized.
use std::f64::consts::TAU;

use ndarray::array;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Zip;
use tracing::warn;

use crate::error::DensityError;
use crate::error::DensityResult;
use crate::params::CorrectionMode;
use crate::params::DiffusionVars;
use crate::params::DriftCoeffs;
use crate::windings::WindingLattice;

/// Default truncation order of the winding lattice.
pub const DEFAULT_MAX_WINDING: usize = 2;
/// Default exponent cutoff: `exp(-e)` with `e > DEFAULT_ETRUNC` is taken as zero.
pub const DEFAULT_ETRUNC: f64 = 50.0;

// Below these settings, whole rows of weights can truncate to zero for points
// far from the mean plus a wrap.
const HAZARD_ETRUNC: f64 = 30.0;
const HAZARD_MAX_WINDING: usize = 1;

/// Evaluator for the stationary density of a wrapped OU diffusion.
///
/// Construction validates the parameters, corrects (or rejects) the drift
/// encoding and derives the exponent matrix `2 * Sigma^-1 * A` together with
/// its log-normalizing constant. Evaluation is a pure function of the points;
/// the evaluator holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedOuDensity {
  mu: [f64; 2],
  drift: DriftCoeffs,
  sigma: DiffusionVars,
  lattice: WindingLattice,
  etrunc: f64,
  inv_sigma_a: Array2<f64>,
  log_norm_const: f64,
}

impl WrappedOuDensity {
  /// Builds an evaluator with the default [`CorrectionMode::Correct`]
  /// handling of non-positive-definite drift encodings.
  ///
  /// `mu` should lie in `[-pi, pi)^2`; this is a precondition of the wrapped
  /// parametrization, not a runtime check.
  pub fn new(
    mu: [f64; 2],
    drift: DriftCoeffs,
    sigma: DiffusionVars,
    max_winding: usize,
    etrunc: f64,
  ) -> DensityResult<Self> {
    Self::with_mode(mu, drift, sigma, max_winding, etrunc, CorrectionMode::default())
  }

  pub fn with_mode(
    mu: [f64; 2],
    drift: DriftCoeffs,
    sigma: DiffusionVars,
    max_winding: usize,
    etrunc: f64,
    mode: CorrectionMode,
  ) -> DensityResult<Self> {
    let drift = drift.validated(mode)?;
    let a = drift.matrix(&sigma);

    // Inverse of 1/2 * A^-1 * Sigma, i.e. 2 * Sigma^-1 * A.
    let inv_sigma_a = array![
      [2.0 * a[[0, 0]] / sigma.var0(), 2.0 * a[[0, 1]] / sigma.var0()],
      [2.0 * a[[1, 0]] / sigma.var1(), 2.0 * a[[1, 1]] / sigma.var1()],
    ];
    let det = inv_sigma_a[[0, 0]] * inv_sigma_a[[1, 1]]
      - inv_sigma_a[[0, 1]] * inv_sigma_a[[1, 0]];
    if det <= 0.0 {
      return Err(DensityError::DegenerateKernel { det });
    }
    let log_norm_const = -TAU.ln() + det.ln() / 2.0;

    if etrunc < HAZARD_ETRUNC && max_winding <= HAZARD_MAX_WINDING {
      warn!(
        etrunc,
        max_winding,
        "low exponent cutoff with a thin winding lattice can truncate entire densities to zero"
      );
    }

    Ok(Self {
      mu,
      drift,
      sigma,
      lattice: WindingLattice::new(max_winding),
      etrunc,
      inv_sigma_a,
      log_norm_const,
    })
  }

  /// Mean of the stationary distribution on the torus.
  pub fn mu(&self) -> [f64; 2] {
    self.mu
  }

  /// Drift encoding after validation; differs from the constructor argument
  /// when the correction was applied.
  pub fn drift(&self) -> DriftCoeffs {
    self.drift
  }

  pub fn sigma(&self) -> DiffusionVars {
    self.sigma
  }

  pub fn lattice(&self) -> WindingLattice {
    self.lattice
  }

  pub fn etrunc(&self) -> f64 {
    self.etrunc
  }

  /// Unnormalized stationary density at a single point of `[-pi, pi)^2`.
  pub fn density_at(&self, point: [f64; 2]) -> f64 {
    let m = &self.inv_sigma_a;
    let (m00, m01) = (m[[0, 0]], m[[0, 1]]);
    let (m10, m11) = (m[[1, 0]], m[[1, 1]]);

    // Factors of the exponent that do not depend on the winding offset.
    let d = [point[0] - self.mu[0], point[1] - self.mu[1]];
    let qd = [m00 * d[0] + m01 * d[1], m10 * d[0] + m11 * d[1]];
    let base = (qd[0] * d[0] + qd[1] * d[1]) / 2.0;

    self
      .lattice
      .offsets()
      .map(|w| {
        let quad = (m00 * w[0] + m01 * w[1]) * w[0] + (m10 * w[0] + m11 * w[1]) * w[1];
        let exponent =
          base + qd[0] * w[0] + qd[1] * w[1] + quad / 2.0 - self.log_norm_const;

        if exponent > self.etrunc {
          0.0
        } else {
          (-exponent).exp()
        }
      })
      .sum()
  }

  /// Evaluates the density at every row of an `(N, 2)` point matrix.
  ///
  /// Points should lie in `[-pi, pi)^2` so that the truncated wrapping
  /// captures the periodicity. The result has one non-negative entry per
  /// row, in order; an empty matrix yields an empty vector.
  pub fn evaluate(&self, points: &Array2<f64>) -> Array1<f64> {
    let mut dens = Array1::zeros(points.nrows());
    Zip::from(&mut dens)
      .and(points.rows())
      .for_each(|dens, row| *dens = self.density_at([row[0], row[1]]));

    dens
  }

  /// Parallel variant of [`evaluate`](Self::evaluate). Rows are mutually
  /// independent, so the work splits across the rayon pool.
  pub fn evaluate_par(&self, points: &Array2<f64>) -> Array1<f64> {
    let mut dens = Array1::zeros(points.nrows());
    Zip::from(&mut dens)
      .and(points.rows())
      .par_for_each(|dens, row| *dens = self.density_at([row[0], row[1]]));

    dens
  }
}
