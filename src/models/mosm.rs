//! MOSM — multi-output spectral mixture model.
//!
//! Each of the `Q` components couples every channel through a magnitude,
//! a spectral mean and variance per input dimension and channel, plus delay,
//! phase and noise terms. Initialization either transfers full per-channel
//! SM fits (`Full`) or only BNSE peak locations (`Means`).
use crate::{
    data::{dataset::Data, estimation::SpectralEstimator},
    kernels::spec::{KernelSpec, KernelSum},
    models::{
        aggregate::estimate_from_sm_with_rng,
        base::{
            ModelBase, ModelKind, SpectralModel, expect_shape, normal_mat, normal_vec, uniform_mat,
            uniform_vec,
        },
        errors::ModelResult,
        options::{MosmMode, SmFitOptions},
        training::Trainer,
    },
};
use ndarray::{Array1, Array2, Axis, s};
use rand::Rng;
use std::f64::consts::PI;

/// One MOSM component.
///
/// Shapes: `magnitude`, `phase`, `noise` are `m`; `mean`, `variance`,
/// `delay` are `d × m`.
#[derive(Debug, Clone, PartialEq)]
pub struct MOSMComponent {
    pub magnitude: Array1<f64>,
    pub mean: Array2<f64>,
    pub variance: Array2<f64>,
    pub delay: Array2<f64>,
    pub phase: Array1<f64>,
    pub noise: Array1<f64>,
}

impl MOSMComponent {
    /// Check every field against `d = input_dims`, `m = output_dims`.
    pub fn check_shape(&self, input_dims: usize, output_dims: usize) -> ModelResult<()> {
        let (d, m) = (input_dims, output_dims);
        expect_shape("magnitude", &[m], self.magnitude.shape())?;
        expect_shape("mean", &[d, m], self.mean.shape())?;
        expect_shape("variance", &[d, m], self.variance.shape())?;
        expect_shape("delay", &[d, m], self.delay.shape())?;
        expect_shape("phase", &[m], self.phase.shape())?;
        expect_shape("noise", &[m], self.noise.shape())
    }
}

/// A (component, channel) pair whose spectral mean is smaller than its
/// spectral variance, so the component behaves like an RBF kernel there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RbfApproach {
    pub component: usize,
    pub channel: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MOSMModel {
    pub base: ModelBase,
    pub params: Vec<MOSMComponent>,
}

impl MOSMModel {
    pub const DEFAULT_NAME: &'static str = "MOSM";

    /// Build a MOSM model.
    ///
    /// Defaults per component: magnitude and mean standard normal, variance
    /// and noise uniform on `[0, 1)`, delay and phase zero.
    pub fn new(data: Data, q: usize, name: &str) -> ModelResult<Self> {
        Self::with_rng(data, q, name, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        data: Data, q: usize, name: &str, rng: &mut R,
    ) -> ModelResult<Self> {
        let base = ModelBase::new(name, data, q)?;
        let (d, m) = (base.data.input_dims(), base.data.output_dims());
        let mut params = Vec::with_capacity(q);
        for _ in 0..q {
            params.push(MOSMComponent {
                magnitude: normal_vec(m, rng),
                mean: normal_mat((d, m), rng),
                variance: uniform_mat((d, m), rng),
                delay: Array2::zeros((d, m)),
                phase: Array1::zeros(m),
                noise: uniform_vec(m, rng),
            });
        }
        Ok(MOSMModel { base, params })
    }

    pub fn params(&self) -> &[MOSMComponent] {
        &self.params
    }

    /// Initialize from per-channel spectral-mixture estimates.
    ///
    /// - `Full`: for component `q`, magnitude is the mean estimated weight
    ///   over input dimensions, mean and variance are the estimated angular
    ///   means and scales (`d × m`).
    /// - `Means`: delegates to [`MOSMModel::init_means`]; `opts` and
    ///   `trainer` are unused.
    pub fn init_params(
        &mut self, mode: MosmMode, opts: &SmFitOptions, estimator: &dyn SpectralEstimator,
        trainer: &mut dyn Trainer,
    ) -> ModelResult<()> {
        self.init_params_with_rng(mode, opts, estimator, trainer, &mut rand::thread_rng())
    }

    pub fn init_params_with_rng<R: Rng + ?Sized>(
        &mut self, mode: MosmMode, opts: &SmFitOptions, estimator: &dyn SpectralEstimator,
        trainer: &mut dyn Trainer, rng: &mut R,
    ) -> ModelResult<()> {
        match mode {
            MosmMode::Means => self.init_means(estimator),
            MosmMode::Full => {
                let q = self.base.q;
                let est =
                    estimate_from_sm_with_rng(&self.base.data, q, opts, estimator, trainer, rng)?;
                let m = self.base.data.output_dims();
                for (k, component) in self.params.iter_mut().enumerate() {
                    component.magnitude = est
                        .weight
                        .slice(s![k, .., ..])
                        .mean_axis(Axis(0))
                        .unwrap_or_else(|| Array1::zeros(m));
                    component.mean = est.mean.slice(s![k, .., ..]).to_owned();
                    component.variance = est.scale.slice(s![k, .., ..]).to_owned();
                }
                Ok(())
            }
        }
    }

    /// Set every component's spectral mean from BNSE peaks.
    ///
    /// Component `q` gets `mean[i, c] = 2π · peaks.means[c][i, q]`.
    pub fn init_means(&mut self, estimator: &dyn SpectralEstimator) -> ModelResult<()> {
        let q = self.base.q;
        let (d, m) = (self.base.data.input_dims(), self.base.data.output_dims());
        let peaks = estimator.bnse(&self.base.data, q)?;
        peaks.check_shape(m, d, q)?;
        for (k, component) in self.params.iter_mut().enumerate() {
            component.mean = Array2::from_shape_fn((d, m), |(i, c)| peaks.means[c][[i, k]] * 2.0 * PI);
        }
        Ok(())
    }

    /// Pairs whose spectral mean norm is below the spectral variance norm.
    ///
    /// Each hit is also reported at info level.
    pub fn rbf_components(&self) -> Vec<RbfApproach> {
        let m = self.base.data.output_dims();
        let names = self.base.data.channel_names();
        let mut hits = Vec::new();
        for channel in 0..m {
            for (component, params) in self.params.iter().enumerate() {
                let mean_norm = norm(params.mean.column(channel).iter());
                let variance_norm = norm(params.variance.column(channel).iter());
                if mean_norm < variance_norm {
                    log::info!(
                        "MOSM approaches RBF kernel for q={component} in channel='{}'",
                        names.get(channel).copied().unwrap_or_default()
                    );
                    hits.push(RbfApproach { component, channel });
                }
            }
        }
        hits
    }
}

impl SpectralModel for MOSMModel {
    fn kind(&self) -> ModelKind {
        ModelKind::MOSM
    }

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn kernel(&self) -> KernelSum {
        let (d, m) = (self.base.data.input_dims(), self.base.data.output_dims());
        self.params
            .iter()
            .map(|c| KernelSpec::MultiOutputSpectralMixture {
                input_dims: d,
                output_dims: m,
                magnitude: c.magnitude.clone(),
                mean: c.mean.clone(),
                variance: c.variance.clone(),
                delay: c.delay.clone(),
                phase: c.phase.clone(),
                noise: c.noise.clone(),
            })
            .collect()
    }
}

fn norm<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}
