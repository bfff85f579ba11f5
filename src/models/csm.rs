//! CSM — cross-spectral mixture model.
//!
//! Components share one spectral mean and variance across channels and mix
//! channels through `Rq × m` constants and phases. Only `Rq = 1` is
//! supported. Initialization keeps the `Q` strongest per-channel SM
//! components (see [`rank_components`]).
use crate::{
    data::{dataset::Data, estimation::SpectralEstimator},
    kernels::spec::{KernelSpec, KernelSum},
    models::{
        aggregate::{estimate_from_sm_with_rng, rank_components},
        base::{ModelBase, ModelKind, SpectralModel, expect_shape, uniform_mat, uniform_vec},
        errors::{ModelError, ModelResult},
        options::SmFitOptions,
        training::Trainer,
    },
};
use ndarray::{Array1, Array2};
use rand::Rng;

/// One CSM component. `constant`, `phase`: `Rq × m`; `mean`, `variance`: `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct CSMComponent {
    pub constant: Array2<f64>,
    pub mean: Array1<f64>,
    pub variance: Array1<f64>,
    pub phase: Array2<f64>,
}

impl CSMComponent {
    pub fn check_shape(&self, input_dims: usize, output_dims: usize, rq: usize) -> ModelResult<()> {
        expect_shape("constant", &[rq, output_dims], self.constant.shape())?;
        expect_shape("mean", &[input_dims], self.mean.shape())?;
        expect_shape("variance", &[input_dims], self.variance.shape())?;
        expect_shape("phase", &[rq, output_dims], self.phase.shape())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CSMModel {
    pub base: ModelBase,
    pub rq: usize,
    pub params: Vec<CSMComponent>,
}

impl CSMModel {
    pub const DEFAULT_NAME: &'static str = "CSM";

    /// Build a CSM model with uniform constants, means and variances and
    /// zero phases.
    ///
    /// # Errors
    /// - [`ModelError::UnsupportedRq`] unless `rq == 1`.
    pub fn new(data: Data, q: usize, rq: usize, name: &str) -> ModelResult<Self> {
        Self::with_rng(data, q, rq, name, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        data: Data, q: usize, rq: usize, name: &str, rng: &mut R,
    ) -> ModelResult<Self> {
        let base = ModelBase::new(name, data, q)?;
        if rq != 1 {
            return Err(ModelError::UnsupportedRq { rq });
        }
        let (d, m) = (base.data.input_dims(), base.data.output_dims());
        let mut params = Vec::with_capacity(q);
        for _ in 0..q {
            params.push(CSMComponent {
                constant: uniform_mat((rq, m), rng),
                mean: uniform_vec(d, rng),
                variance: uniform_vec(d, rng),
                phase: Array2::zeros((rq, m)),
            });
        }
        Ok(CSMModel { base, rq, params })
    }

    pub fn params(&self) -> &[CSMComponent] {
        &self.params
    }

    /// Seed means and variances from the `Q` strongest per-channel SM
    /// components, strongest first. Constants and phases are untouched.
    pub fn init_params(
        &mut self, opts: &SmFitOptions, estimator: &dyn SpectralEstimator, trainer: &mut dyn Trainer,
    ) -> ModelResult<()> {
        self.init_params_with_rng(opts, estimator, trainer, &mut rand::thread_rng())
    }

    pub fn init_params_with_rng<R: Rng + ?Sized>(
        &mut self, opts: &SmFitOptions, estimator: &dyn SpectralEstimator,
        trainer: &mut dyn Trainer, rng: &mut R,
    ) -> ModelResult<()> {
        let est =
            estimate_from_sm_with_rng(&self.base.data, self.base.q, opts, estimator, trainer, rng)?;
        for (component, ranked) in self.params.iter_mut().zip(rank_components(&est, opts.indexing)) {
            component.mean = ranked.mean;
            component.variance = ranked.scale;
        }
        Ok(())
    }
}

impl SpectralModel for CSMModel {
    fn kind(&self) -> ModelKind {
        ModelKind::CSM
    }

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn kernel(&self) -> KernelSum {
        let (d, m) = (self.base.data.input_dims(), self.base.data.output_dims());
        self.params
            .iter()
            .map(|c| KernelSpec::CrossSpectralMixture {
                input_dims: d,
                output_dims: m,
                rq: self.rq,
                constant: c.constant.clone(),
                mean: c.mean.clone(),
                variance: c.variance.clone(),
                phase: c.phase.clone(),
            })
            .collect()
    }
}
