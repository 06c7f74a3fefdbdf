//! # Wrapped OU stationary density
//!
//! `wrapped_ou` evaluates the stationary probability density of a bivariate
//! angular (wrapped) Ornstein-Uhlenbeck diffusion with diagonal diffusion
//! matrix at query points on the torus `[-pi, pi)^2`. The density has no
//! closed form; it is approximated by truncating the infinite sum over
//! integer winding numbers that unwrap periodic copies of a bivariate
//! Gaussian kernel.
//!
//! ## Modules
//!
//! | Module       | Description                                                              |
//! |--------------|--------------------------------------------------------------------------|
//! | [`density`]  | Kernel construction and the truncated winding-sum evaluator.             |
//! | [`error`]    | Error taxonomy for parameter validation and numeric-domain checks.       |
//! | [`params`]   | Drift encoding, diffusion variances and positive-definiteness correction.|
//! | [`windings`] | Lazy, restartable lattice of winding offsets.                            |
//!
//! ## Example Usage
//!
//! ```rust
//! use ndarray::array;
//! use wrapped_ou::{DiffusionVars, DriftCoeffs, WrappedOuDensity};
//! use wrapped_ou::{DEFAULT_ETRUNC, DEFAULT_MAX_WINDING};
//!
//! let density = WrappedOuDensity::new(
//!   [0.0, 0.0],
//!   DriftCoeffs::new(1.0, 1.0, 0.5),
//!   DiffusionVars::new(1.0, 1.0)?,
//!   DEFAULT_MAX_WINDING,
//!   DEFAULT_ETRUNC,
//! )?;
//! let dens = density.evaluate(&array![[0.0, 0.0], [1.5, -2.0]]);
//! ```
//!
//! ## Parallelism
//!
//! [`WrappedOuDensity::evaluate_par`] splits the evaluation points across the
//! rayon pool; per-point results are independent and identical to the
//! sequential path.

pub mod density;
pub mod error;
pub mod params;
pub mod windings;

pub use crate::density::WrappedOuDensity;
pub use crate::density::DEFAULT_ETRUNC;
pub use crate::density::DEFAULT_MAX_WINDING;
pub use crate::error::DensityError;
pub use crate::error::DensityResult;
pub use crate::params::CorrectionMode;
pub use crate::params::DiffusionVars;
pub use crate::params::DriftCoeffs;
pub use crate::params::DRIFT_SHRINK;
pub use crate::windings::WindingLattice;
