//! CG — convolutional Gaussian model.
//!
//! Each component holds a constant per channel and a variance per input
//! dimension and channel. Initialization copies the per-channel SM scales
//! of component `q` straight into its variance (`d × m`).
use crate::{
    data::{dataset::Data, estimation::SpectralEstimator},
    kernels::spec::{KernelSpec, KernelSum},
    models::{
        aggregate::estimate_from_sm_with_rng,
        base::{ModelBase, ModelKind, SpectralModel, expect_shape, uniform_vec},
        errors::ModelResult,
        options::SmFitOptions,
        training::Trainer,
    },
};
use ndarray::{Array1, Array2, s};
use rand::Rng;

/// One CG component. `constant`: `m`; `variance`: `d × m`.
#[derive(Debug, Clone, PartialEq)]
pub struct CGComponent {
    pub constant: Array1<f64>,
    pub variance: Array2<f64>,
}

impl CGComponent {
    pub fn check_shape(&self, input_dims: usize, output_dims: usize) -> ModelResult<()> {
        expect_shape("constant", &[output_dims], self.constant.shape())?;
        expect_shape("variance", &[input_dims, output_dims], self.variance.shape())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CGModel {
    pub base: ModelBase,
    pub params: Vec<CGComponent>,
}

impl CGModel {
    pub const DEFAULT_NAME: &'static str = "CG";

    /// Uniform constants, zero variances.
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
            params.push(CGComponent { constant: uniform_vec(m, rng), variance: Array2::zeros((d, m)) });
        }
        Ok(CGModel { base, params })
    }

    pub fn params(&self) -> &[CGComponent] {
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
        for (k, component) in self.params.iter_mut().enumerate() {
            component.variance = est.scale.slice(s![k, .., ..]).to_owned();
        }
        Ok(())
    }
}

impl SpectralModel for CGModel {
    fn kind(&self) -> ModelKind {
        ModelKind::CG
    }

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn kernel(&self) -> KernelSum {
        let (d, m) = (self.base.data.input_dims(), self.base.data.output_dims());
        self.params
            .iter()
            .map(|c| KernelSpec::ConvolutionalGaussian {
                input_dims: d,
                output_dims: m,
                constant: c.constant.clone(),
                variance: c.variance.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn defaults_are_zero_variance() {
        let mut data = Data::new();
        data.add_1d(array![0.0, 1.0, 3.0], array![1.0, 2.0, 0.0], Some("x")).unwrap();
        data.add_1d(array![0.0, 2.0], array![1.0, 2.0], Some("y")).unwrap();

        let model = CGModel::with_rng(data, 2, "CG", &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(model.params()[1].variance, Array2::<f64>::zeros((1, 2)));
        assert_eq!(model.params()[1].constant.len(), 2);
        assert_eq!(model.kind().tag(), "CG");
    }
}
