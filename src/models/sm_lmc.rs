//! SM-LMC — spectral-mixture linear model of coregionalization.
//!
//! Same layout as CSM without phases; constants start standard normal.
//! Initialization matches CSM: the `Q` strongest per-channel SM components
//! become the shared spectral means and variances.
use crate::{
    data::{dataset::Data, estimation::SpectralEstimator},
    kernels::spec::{KernelSpec, KernelSum},
    models::{
        aggregate::{estimate_from_sm_with_rng, rank_components},
        base::{ModelBase, ModelKind, SpectralModel, expect_shape, normal_mat, uniform_vec},
        errors::{ModelError, ModelResult},
        options::SmFitOptions,
        training::Trainer,
    },
};
use ndarray::{Array1, Array2};
use rand::Rng;

/// One SM-LMC component. `constant`: `Rq × m`; `mean`, `variance`: `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct SMLMCComponent {
    pub constant: Array2<f64>,
    pub mean: Array1<f64>,
    pub variance: Array1<f64>,
}

impl SMLMCComponent {
    pub fn check_shape(&self, input_dims: usize, output_dims: usize, rq: usize) -> ModelResult<()> {
        expect_shape("constant", &[rq, output_dims], self.constant.shape())?;
        expect_shape("mean", &[input_dims], self.mean.shape())?;
        expect_shape("variance", &[input_dims], self.variance.shape())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SMLMCModel {
    pub base: ModelBase,
    pub rq: usize,
    pub params: Vec<SMLMCComponent>,
}

impl SMLMCModel {
    pub const DEFAULT_NAME: &'static str = "SM-LMC";

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
            params.push(SMLMCComponent {
                constant: normal_mat((rq, m), rng),
                mean: uniform_vec(d, rng),
                variance: uniform_vec(d, rng),
            });
        }
        Ok(SMLMCModel { base, rq, params })
    }

    pub fn params(&self) -> &[SMLMCComponent] {
        &self.params
    }

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

impl SpectralModel for SMLMCModel {
    fn kind(&self) -> ModelKind {
        ModelKind::SMLMC
    }

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn kernel(&self) -> KernelSum {
        let (d, m) = (self.base.data.input_dims(), self.base.data.output_dims());
        self.params
            .iter()
            .map(|c| KernelSpec::SpectralMixtureLMC {
                input_dims: d,
                output_dims: m,
                rq: self.rq,
                constant: c.constant.clone(),
                mean: c.mean.clone(),
                variance: c.variance.clone(),
            })
            .collect()
    }
}
