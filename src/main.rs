use std::env;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use ndarray::Array2;
use wrapped_ou::DiffusionVars;
use wrapped_ou::DriftCoeffs;
use wrapped_ou::WrappedOuDensity;

/// One fully decoded invocation of the density evaluator.
///
/// Tokens arrive as the flat list
/// `mu1 mu2 a0 a1 a2 sigma0 sigma1 maxK etrunc x…`, where `x` is the N x 2
/// evaluation-point matrix stored by rows. Decoding validates shape and
/// numeric syntax only; parameter semantics are the core's responsibility.
struct DensityRequest {
  mu: [f64; 2],
  alpha: [f64; 3],
  sigma: [f64; 2],
  max_winding: usize,
  etrunc: f64,
  points: Array2<f64>,
}

impl DensityRequest {
  fn decode(tokens: &[String]) -> Result<Self> {
    if tokens.len() < 9 {
      bail!(
        "expected at least 9 parameter tokens (mu1 mu2 a0 a1 a2 sigma0 sigma1 maxK etrunc), got {}",
        tokens.len()
      );
    }

    let scalar = |i: usize| -> Result<f64> {
      tokens[i]
        .parse::<f64>()
        .with_context(|| format!("token {} ({:?}) is not a number", i + 1, tokens[i]))
    };

    let mu = [scalar(0)?, scalar(1)?];
    let alpha = [scalar(2)?, scalar(3)?, scalar(4)?];
    let sigma = [scalar(5)?, scalar(6)?];
    let max_winding = tokens[7]
      .parse::<usize>()
      .with_context(|| format!("token 8 ({:?}) is not a non-negative integer", tokens[7]))?;
    let etrunc = scalar(8)?;

    let rest = &tokens[9..];
    if rest.len() % 2 != 0 {
      bail!(
        "evaluation points must form (x, y) pairs, got {} trailing tokens",
        rest.len()
      );
    }

    let mut points = Array2::zeros((rest.len() / 2, 2));
    for (i, pair) in rest.chunks(2).enumerate() {
      for (j, token) in pair.iter().enumerate() {
        points[[i, j]] = token
          .parse::<f64>()
          .with_context(|| format!("point token {:?} is not a number", token))?;
      }
    }

    Ok(Self {
      mu,
      alpha,
      sigma,
      max_winding,
      etrunc,
      points,
    })
  }
}

fn main() -> Result<()> {
  let tokens: Vec<String> = env::args().skip(1).collect();
  let request = DensityRequest::decode(&tokens)?;

  let density = WrappedOuDensity::new(
    request.mu,
    DriftCoeffs::new(request.alpha[0], request.alpha[1], request.alpha[2]),
    DiffusionVars::new(request.sigma[0], request.sigma[1])?,
    request.max_winding,
    request.etrunc,
  )?;
  let dens = density.evaluate(&request.points);

  let line: Vec<String> = dens.iter().map(f64::to_string).collect();
  println!("{}", line.join(" "));

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokens(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_owned).collect()
  }

  #[test]
  fn decodes_a_well_formed_token_list() {
    let request = DensityRequest::decode(&tokens(
      "0.5 -0.5 1.0 1.0 0.2 1.0 2.0 2 50 0.1 0.2 -3.0 3.0",
    ))
    .unwrap();

    assert_eq!(request.mu, [0.5, -0.5]);
    assert_eq!(request.alpha, [1.0, 1.0, 0.2]);
    assert_eq!(request.sigma, [1.0, 2.0]);
    assert_eq!(request.max_winding, 2);
    assert_eq!(request.etrunc, 50.0);
    assert_eq!(request.points.nrows(), 2);
    assert_eq!(request.points[[1, 0]], -3.0);
  }

  #[test]
  fn accepts_an_empty_point_list() {
    let request = DensityRequest::decode(&tokens("0 0 1 1 0 1 1 2 50")).unwrap();
    assert_eq!(request.points.nrows(), 0);
  }

  #[test]
  fn rejects_short_token_lists() {
    assert!(DensityRequest::decode(&tokens("0 0 1 1 0 1 1 2")).is_err());
  }

  #[test]
  fn rejects_an_odd_point_token_count() {
    assert!(DensityRequest::decode(&tokens("0 0 1 1 0 1 1 2 50 0.1")).is_err());
  }

  #[test]
  fn rejects_a_negative_winding_order() {
    assert!(DensityRequest::decode(&tokens("0 0 1 1 0 1 1 -2 50")).is_err());
  }

  #[test]
  fn rejects_non_numeric_tokens() {
    assert!(DensityRequest::decode(&tokens("0 0 1 1 zero 1 1 2 50")).is_err());
  }
}
