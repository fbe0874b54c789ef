//! Uncertain values and the strategies that create them.
//!
//! An [`Ensemble`] carries a quantity as a set of Monte Carlo samples. Arithmetic
//! on ensembles is element-wise, so sample `k` of a result is computed only from
//! sample `k` of each operand. Correlation between values that share an origin
//! (stream density appears in both the velocity and the pressure) is therefore
//! preserved through the whole pipeline.
//!
//! Which kind of value a run uses is picked at run time through an
//! [`UncertaintyModel`]: [`MonteCarlo`] samples Gaussian or uniform
//! distributions, while [`Deterministic`] keeps plain `f64`s and reports zero
//! error.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_SAMPLE_COUNT, PARALLEL_THRESHOLD, UNIFORM_WIDTH_PER_STD_DEV};
use crate::error::LiftError;
use crate::scalar::Scalar;

/// A scalar represented by Monte Carlo samples
///
/// # Panics
/// Arithmetic between two `Sampled` ensembles panics when their sample counts
/// differ. Draw every value of one computation from the same [`MonteCarlo`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ensemble {
    /// Exactly known value, broadcast against any sample set
    Constant(f64),
    /// Equally weighted samples of the value's distribution
    Sampled(Arc<[f64]>),
}

fn map_samples<F>(samples: &[f64], op: F) -> Arc<[f64]>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    if samples.len() >= PARALLEL_THRESHOLD {
        samples.par_iter().map(|&x| op(x)).collect::<Vec<f64>>().into()
    } else {
        samples.iter().map(|&x| op(x)).collect()
    }
}

fn zip_samples<F>(lhs: &[f64], rhs: &[f64], op: F) -> Arc<[f64]>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    assert_eq!(lhs.len(), rhs.len(), "ensembles must share a sample count");
    if lhs.len() >= PARALLEL_THRESHOLD {
        lhs.par_iter()
            .zip(rhs.par_iter())
            .map(|(&x, &y)| op(x, y))
            .collect::<Vec<f64>>()
            .into()
    } else {
        lhs.iter().zip(rhs.iter()).map(|(&x, &y)| op(x, y)).collect()
    }
}

impl Ensemble {
    fn combine<F>(self, rhs: Ensemble, op: F) -> Ensemble
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        match (self, rhs) {
            (Ensemble::Constant(a), Ensemble::Constant(b)) => Ensemble::Constant(op(a, b)),
            (Ensemble::Constant(a), Ensemble::Sampled(b)) => {
                Ensemble::Sampled(map_samples(&b, |x| op(a, x)))
            }
            (Ensemble::Sampled(a), Ensemble::Constant(b)) => {
                Ensemble::Sampled(map_samples(&a, |x| op(x, b)))
            }
            (Ensemble::Sampled(a), Ensemble::Sampled(b)) => {
                Ensemble::Sampled(zip_samples(&a, &b, op))
            }
        }
    }

    fn map<F>(&self, op: F) -> Ensemble
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        match self {
            Ensemble::Constant(a) => Ensemble::Constant(op(*a)),
            Ensemble::Sampled(samples) => Ensemble::Sampled(map_samples(samples, op)),
        }
    }

    /// The raw samples; a constant is a single sample
    pub fn samples(&self) -> &[f64] {
        match self {
            Ensemble::Constant(value) => std::slice::from_ref(value),
            Ensemble::Sampled(samples) => &samples[..],
        }
    }

    pub fn len(&self) -> usize {
        self.samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Ensemble::Constant(_))
    }

    /// Sample mean (NaN for an empty sample set)
    pub fn mean(&self) -> f64 {
        let samples = self.samples();
        if samples.is_empty() {
            return f64::NAN;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// `n`th central moment, `E[(X - mean)^n]`
    pub fn central_moment(&self, n: u32) -> f64 {
        if n == 0 {
            return 1.0;
        }
        match self {
            Ensemble::Constant(_) => 0.0,
            Ensemble::Sampled(samples) => {
                let mean = self.mean();
                let power = n as i32;
                samples.iter().map(|x| (x - mean).powi(power)).sum::<f64>() / samples.len() as f64
            }
        }
    }

    pub fn variance(&self) -> f64 {
        self.central_moment(2)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.samples().iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.samples().iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Nearest-rank percentile, `p` in `[0, 100]`
    pub fn percentile(&self, p: f64) -> f64 {
        match self {
            Ensemble::Constant(value) => *value,
            Ensemble::Sampled(samples) => {
                if samples.is_empty() {
                    return f64::NAN;
                }
                let mut sorted = samples.to_vec();
                sorted.sort_by(f64::total_cmp);
                let n = sorted.len();
                let rank = ((p.clamp(0.0, 100.0) / 100.0) * n as f64).ceil() as usize;
                sorted[rank.clamp(1, n) - 1]
            }
        }
    }
}

impl From<f64> for Ensemble {
    fn from(value: f64) -> Self {
        Ensemble::Constant(value)
    }
}

macro_rules! impl_ensemble_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Ensemble {
            type Output = Ensemble;

            fn $method(self, rhs: Ensemble) -> Ensemble {
                self.combine(rhs, |a, b| a $op b)
            }
        }
    };
}

impl_ensemble_op!(Add, add, +);
impl_ensemble_op!(Sub, sub, -);
impl_ensemble_op!(Mul, mul, *);
impl_ensemble_op!(Div, div, /);

impl Neg for Ensemble {
    type Output = Ensemble;

    fn neg(self) -> Ensemble {
        self.map(|x| -x)
    }
}

impl Scalar for Ensemble {
    fn cos(&self) -> Self {
        self.map(f64::cos)
    }

    fn nominal(&self) -> f64 {
        self.mean()
    }
}

/// Shape of the distribution a measurement error describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionShape {
    /// Error is the standard deviation of a normal distribution
    Gaussian,
    /// Error is the standard deviation of a uniform distribution centred on the nominal value
    Uniform,
}

/// How measurement errors are treated for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyMode {
    /// Plain nominal arithmetic, zero reported error
    None,
    Gaussian,
    Uniform,
}

impl UncertaintyMode {
    pub fn shape(self) -> Option<DistributionShape> {
        match self {
            UncertaintyMode::None => None,
            UncertaintyMode::Gaussian => Some(DistributionShape::Gaussian),
            UncertaintyMode::Uniform => Some(DistributionShape::Uniform),
        }
    }
}

/// Run-time selection of the uncertainty strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    pub mode: UncertaintyMode,
    pub samples: usize,
    /// Seed for reproducible sampling; entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            mode: UncertaintyMode::Gaussian,
            samples: DEFAULT_SAMPLE_COUNT,
            seed: None,
        }
    }
}

fn check_error(nominal: f64, error: f64) -> Result<(), LiftError> {
    if !nominal.is_finite() {
        return Err(LiftError::InvalidUncertainty(format!(
            "nominal value must be finite, got {nominal}"
        )));
    }
    if !error.is_finite() || error < 0.0 {
        return Err(LiftError::InvalidUncertainty(format!(
            "error magnitude must be finite and non-negative, got {error}"
        )));
    }
    Ok(())
}

/// Strategy for turning measured values into scalars and reading back their spread
pub trait UncertaintyModel {
    type Value: Scalar;

    /// A value with absolute error `error` about `nominal`
    fn with_error(&mut self, nominal: f64, error: f64) -> Result<Self::Value, LiftError>;

    /// A value whose error is `fractional_error` of its magnitude
    fn with_fractional_error(
        &mut self,
        nominal: f64,
        fractional_error: f64,
    ) -> Result<Self::Value, LiftError> {
        self.with_error(nominal, nominal.abs() * fractional_error)
    }

    fn mean(&self, value: &Self::Value) -> f64;

    /// Square root of the second central moment
    fn std_dev(&self, value: &Self::Value) -> f64;

    fn percentile(&self, value: &Self::Value, p: f64) -> f64;
}

/// Nominal arithmetic only; every error is reported as zero
#[derive(Debug, Clone, Copy, Default)]
pub struct Deterministic;

impl UncertaintyModel for Deterministic {
    type Value = f64;

    fn with_error(&mut self, nominal: f64, error: f64) -> Result<f64, LiftError> {
        check_error(nominal, error)?;
        Ok(nominal)
    }

    fn mean(&self, value: &f64) -> f64 {
        *value
    }

    fn std_dev(&self, _value: &f64) -> f64 {
        0.0
    }

    fn percentile(&self, value: &f64, _p: f64) -> f64 {
        *value
    }
}

/// Sampling-based uncertainty propagation
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    shape: DistributionShape,
    samples: usize,
    rng: StdRng,
}

impl MonteCarlo {
    pub fn new(
        shape: DistributionShape,
        samples: usize,
        seed: Option<u64>,
    ) -> Result<Self, LiftError> {
        if samples == 0 {
            return Err(LiftError::InvalidUncertainty(
                "sample count must be greater than 0".to_string(),
            ));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(?shape, samples, ?seed, "monte carlo model ready");
        Ok(Self { shape, samples, rng })
    }
}

impl UncertaintyModel for MonteCarlo {
    type Value = Ensemble;

    fn with_error(&mut self, nominal: f64, error: f64) -> Result<Ensemble, LiftError> {
        check_error(nominal, error)?;
        if error == 0.0 {
            return Ok(Ensemble::Constant(nominal));
        }

        let n = self.samples;
        let samples: Arc<[f64]> = match self.shape {
            DistributionShape::Gaussian => {
                let dist = Normal::new(nominal, error).map_err(|e| {
                    LiftError::InvalidUncertainty(format!("normal distribution: {e}"))
                })?;
                dist.sample_iter(&mut self.rng).take(n).collect()
            }
            DistributionShape::Uniform => {
                let half_width = error * UNIFORM_WIDTH_PER_STD_DEV / 2.0;
                let (low, high) = (nominal - half_width, nominal + half_width);
                if !(low.is_finite() && high.is_finite() && (high - low).is_finite()) {
                    return Err(LiftError::InvalidUncertainty(format!(
                        "uniform error {error} about {nominal} overflows the sampling range"
                    )));
                }
                // error too small to widen the interval at this magnitude
                if low >= high {
                    return Ok(Ensemble::Constant(nominal));
                }
                Uniform::new(low, high)
                    .sample_iter(&mut self.rng)
                    .take(n)
                    .collect()
            }
        };
        Ok(Ensemble::Sampled(samples))
    }

    fn mean(&self, value: &Ensemble) -> f64 {
        value.mean()
    }

    fn std_dev(&self, value: &Ensemble) -> f64 {
        value.std_dev()
    }

    fn percentile(&self, value: &Ensemble, p: f64) -> f64 {
        value.percentile(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn gaussian(seed: u64) -> MonteCarlo {
        MonteCarlo::new(DistributionShape::Gaussian, 20_000, Some(seed)).unwrap()
    }

    #[test]
    fn test_gaussian_moments() {
        let mut model = gaussian(7);
        let x = model.with_error(5.0, 0.5).unwrap();
        assert_eq!(x.len(), 20_000);
        assert_relative_eq!(x.mean(), 5.0, epsilon = 0.02);
        assert_relative_eq!(x.std_dev(), 0.5, max_relative = 0.05);
    }

    #[test]
    fn test_uniform_error_is_std_dev() {
        let mut model = MonteCarlo::new(DistributionShape::Uniform, 20_000, Some(11)).unwrap();
        let x = model.with_error(10.0, 1.0).unwrap();
        let half_width = 12.0_f64.sqrt() / 2.0;
        assert!(x.min() >= 10.0 - half_width);
        assert!(x.max() < 10.0 + half_width);
        assert_relative_eq!(x.std_dev(), 1.0, max_relative = 0.05);
    }

    #[test]
    fn test_zero_error_is_constant() {
        let mut model = gaussian(1);
        let x = model.with_error(3.0, 0.0).unwrap();
        assert_eq!(x, Ensemble::Constant(3.0));
        assert_eq!(x.std_dev(), 0.0);
    }

    #[test]
    fn test_invalid_errors_rejected() {
        let mut model = gaussian(1);
        assert!(matches!(
            model.with_error(1.0, -0.1),
            Err(LiftError::InvalidUncertainty(_))
        ));
        assert!(model.with_error(1.0, f64::NAN).is_err());
        assert!(model.with_error(f64::INFINITY, 0.1).is_err());
        assert!(Deterministic.with_error(1.0, -1.0).is_err());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = MonteCarlo::new(DistributionShape::Gaussian, 0, None);
        assert!(matches!(result, Err(LiftError::InvalidUncertainty(_))));
    }

    #[test]
    fn test_uniform_range_overflow_rejected() {
        let mut model = MonteCarlo::new(DistributionShape::Uniform, 10, Some(1)).unwrap();
        assert!(matches!(
            model.with_error(0.0, 1e308),
            Err(LiftError::InvalidUncertainty(_))
        ));
        assert!(matches!(
            model.with_error(f64::MAX, 1.0e300),
            Err(LiftError::InvalidUncertainty(_))
        ));
        // a wide but representable range still samples
        assert_eq!(model.with_error(0.0, 1e300).unwrap().len(), 10);
    }

    #[test]
    #[should_panic(expected = "ensembles must share a sample count")]
    fn test_mismatched_sample_counts_panic() {
        let x = gaussian(1).with_error(1.0, 0.1).unwrap();
        let mut small = MonteCarlo::new(DistributionShape::Gaussian, 10, Some(2)).unwrap();
        let y = small.with_error(1.0, 0.1).unwrap();
        let _ = x + y;
    }

    #[test]
    fn test_correlated_values_cancel() {
        let mut model = gaussian(3);
        let x = model.with_error(2.0, 0.3).unwrap();
        let diff = x.clone() - x;
        assert_abs_diff_eq!(diff.std_dev(), 0.0);
        assert_abs_diff_eq!(diff.mean(), 0.0);
    }

    #[test]
    fn test_independent_values_add_in_quadrature() {
        let mut model = gaussian(5);
        let a = model.with_error(0.0, 1.0).unwrap();
        let b = model.with_error(0.0, 1.0).unwrap();
        let sum = a + b;
        assert_relative_eq!(sum.std_dev(), 2.0_f64.sqrt(), max_relative = 0.05);
    }

    #[test]
    fn test_constant_broadcasts() {
        let mut model = gaussian(9);
        let x = model.with_error(4.0, 0.2).unwrap();
        let scaled = Ensemble::from(3.0) * x.clone();
        assert_relative_eq!(scaled.std_dev(), 3.0 * x.std_dev(), max_relative = 1e-12);
        assert_relative_eq!(scaled.mean(), 3.0 * x.mean(), max_relative = 1e-12);

        let shifted = x.clone() - Ensemble::from(4.0);
        assert_relative_eq!(shifted.std_dev(), x.std_dev(), max_relative = 1e-12);
        assert_eq!(Ensemble::from(6.0) / Ensemble::from(2.0), Ensemble::Constant(3.0));
    }

    #[test]
    fn test_cos_and_neg() {
        let angle = Ensemble::from(std::f64::consts::PI);
        assert_abs_diff_eq!(Scalar::cos(&angle).mean(), -1.0, epsilon = 1e-15);
        assert_eq!(-Ensemble::from(2.0), Ensemble::Constant(-2.0));
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let samples: Vec<f64> = (0..PARALLEL_THRESHOLD * 2).map(|i| i as f64).collect();
        let big = Ensemble::Sampled(samples.into());
        let doubled = big.clone() + big.clone();
        for (i, v) in doubled.samples().iter().enumerate() {
            assert_eq!(*v, 2.0 * i as f64);
        }
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let a = gaussian(42).with_error(1.0, 0.1).unwrap();
        let b = gaussian(42).with_error(1.0, 0.1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_central_moments_and_percentiles() {
        let x = Ensemble::Sampled(vec![1.0, 2.0, 3.0, 4.0].into());
        assert_abs_diff_eq!(x.mean(), 2.5);
        assert_abs_diff_eq!(x.central_moment(1), 0.0);
        assert_abs_diff_eq!(x.variance(), 1.25);
        assert_abs_diff_eq!(x.central_moment(3), 0.0);
        assert_eq!(x.percentile(50.0), 2.0);
        assert_eq!(x.percentile(100.0), 4.0);
        assert_eq!(x.percentile(0.0), 1.0);
        assert_eq!(x.min(), 1.0);
        assert_eq!(x.max(), 4.0);
        assert_eq!(Ensemble::Constant(7.0).central_moment(2), 0.0);
    }

    #[test]
    fn test_fractional_error() {
        let mut model = gaussian(13);
        let x = model.with_fractional_error(-0.1, 0.05).unwrap();
        assert_relative_eq!(x.std_dev(), 0.005, max_relative = 0.05);
        assert_eq!(Deterministic.with_fractional_error(-0.1, 0.05).unwrap(), -0.1);
    }

    #[test]
    fn test_mode_shapes() {
        assert_eq!(UncertaintyMode::None.shape(), None);
        assert_eq!(UncertaintyMode::Uniform.shape(), Some(DistributionShape::Uniform));
        assert_eq!(UncertaintyConfig::default().samples, DEFAULT_SAMPLE_COUNT);
    }
}
