//! SM — single-output spectral mixture model.
//!
//! Purpose
//! -------
//! Hold the `Q` spectral-mixture components of a one-channel dataset and
//! seed them with a closed-form draw or with periodogram peaks. The
//! per-channel fits behind every multi-output initializer are SM models.
//!
//! Key behaviors
//! -------------
//! - Construction requires exactly one output channel.
//! - [`SMModel::init_params`] supports `random`, `LS` and `BNSE`:
//!   * `random` uses [`sm_init`] on the channel's inputs and outputs;
//!   * `LS` / `BNSE` take peak locations as means and set
//!     `w_q = sqrt(amp_q · std(y) / Σ amp)` from the first input dimension.
//! - A peak estimator that finds nothing (all amplitudes zero) logs a
//!   warning and leaves the parameters untouched.
//! - [`SMModel::update_params`] writes trainer output back, validating every
//!   array shape before any component changes.
//!
//! Invariants & assumptions
//! ------------------------
//! - `params.len() == Q`; each component carries `d` means and `d` scales.
//! - Kernel layout: weights `Q`, means `Q × d`, scales `d × Q`.
use crate::{
    data::{
        dataset::Data,
        estimation::{SpectralEstimator, SpectralPeaks},
    },
    kernels::{
        sm_init::{output_std, sm_init},
        spec::{KernelSpec, KernelSum},
    },
    models::{
        base::{ModelBase, ModelKind, SpectralModel, abs_normal_vec, expect_shape},
        errors::{ModelError, ModelResult},
        options::SmInit,
        training::{Trainables, kernel_param_name},
    },
};
use ndarray::{Array1, Array2, ArrayD, ArrayView, Axis, Dimension, Ix1, Ix2};
use rand::Rng;

/// One spectral-mixture component.
#[derive(Debug, Clone, PartialEq)]
pub struct SMComponent {
    pub mixture_weight: f64,
    /// Spectral mean per input dimension.
    pub mixture_means: Array1<f64>,
    /// Spectral scale per input dimension.
    pub mixture_scales: Array1<f64>,
}

impl SMComponent {
    /// Check means and scales against `input_dims`.
    ///
    /// # Errors
    /// - [`ModelError::ParamShapeMismatch`] naming the first bad field.
    pub fn check_shape(&self, input_dims: usize) -> ModelResult<()> {
        expect_shape("mixture_means", &[input_dims], self.mixture_means.shape())?;
        expect_shape("mixture_scales", &[input_dims], self.mixture_scales.shape())
    }
}

/// Single-output spectral mixture model.
#[derive(Debug, Clone, PartialEq)]
pub struct SMModel {
    pub base: ModelBase,
    pub params: Vec<SMComponent>,
}

impl SMModel {
    pub const DEFAULT_NAME: &'static str = "SM";

    /// Build an SM model with `|N(0, 1)|` component defaults.
    ///
    /// # Errors
    /// - [`ModelError::InvalidOutputDims`] unless `data` has exactly one
    ///   channel.
    /// - [`ModelError::InvalidComponentCount`] when `q == 0`.
    pub fn new(data: Data, q: usize, name: &str) -> ModelResult<Self> {
        Self::with_rng(data, q, name, &mut rand::thread_rng())
    }

    /// As [`SMModel::new`], drawing defaults from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        data: Data, q: usize, name: &str, rng: &mut R,
    ) -> ModelResult<Self> {
        let output_dims = data.output_dims();
        if output_dims != 1 {
            return Err(ModelError::InvalidOutputDims { expected: 1, actual: output_dims });
        }
        let base = ModelBase::new(name, data, q)?;
        let input_dims = base.data.input_dims();
        let mut params = Vec::with_capacity(q);
        for _ in 0..q {
            let mixture_weight = abs_normal_vec(1, rng)[0];
            let mixture_means = abs_normal_vec(input_dims, rng);
            let mixture_scales = abs_normal_vec(input_dims, rng);
            params.push(SMComponent { mixture_weight, mixture_means, mixture_scales });
        }
        Ok(SMModel { base, params })
    }

    pub fn params(&self) -> &[SMComponent] {
        &self.params
    }

    /// Mixture weights in component order.
    pub fn weights(&self) -> Array1<f64> {
        self.params.iter().map(|c| c.mixture_weight).collect()
    }

    /// Seed the components with `method`.
    ///
    /// `estimator` is consulted for `LS` / `BNSE` only; `random` draws from
    /// the thread-local generator.
    ///
    /// # Errors
    /// - Data errors from the estimator or from [`sm_init`], and peak tables
    ///   that are not `1` channel of `d × Q`.
    pub fn init_params(
        &mut self, method: SmInit, estimator: &dyn SpectralEstimator,
    ) -> ModelResult<()> {
        self.init_params_with_rng(method, estimator, &mut rand::thread_rng())
    }

    /// As [`SMModel::init_params`], drawing the `random` case from `rng`.
    pub fn init_params_with_rng<R: Rng + ?Sized>(
        &mut self, method: SmInit, estimator: &dyn SpectralEstimator, rng: &mut R,
    ) -> ModelResult<()> {
        let q = self.base.q;
        let peaks = match method {
            SmInit::Random => {
                let channel = self.base.data.channel(0)?;
                let draw = sm_init(channel.x.view(), channel.y.view(), q, rng)?;
                for (k, component) in self.params.iter_mut().enumerate() {
                    component.mixture_weight = draw.weights[k];
                    component.mixture_means = draw.means.row(k).to_owned();
                    component.mixture_scales = draw.scales.row(k).to_owned();
                }
                return Ok(());
            }
            SmInit::LombScargle => estimator.lomb_scargle(&self.base.data, q)?,
            SmInit::Bnse => estimator.bnse(&self.base.data, q)?,
        };
        self.apply_peaks(method, &peaks)
    }

    /// Overwrite components from trainer output.
    ///
    /// Only paths of the form `<model>/kern/<name>` are considered; other
    /// paths (likelihood, mean function) are ignored.
    ///
    /// # Errors
    /// - [`ModelError::UnknownParameter`] for a kernel name other than
    ///   `mixture_weights`, `mixture_means`, `mixture_scales`.
    /// - [`ModelError::ParamShapeMismatch`] for arrays not shaped `Q`,
    ///   `Q × d` and `d × Q` respectively.
    ///
    /// On error no component is modified.
    pub fn update_params(&mut self, trainables: &Trainables) -> ModelResult<()> {
        let q = self.base.q;
        let input_dims = self.base.data.input_dims();
        let mut params = self.params.clone();
        for (path, values) in trainables {
            let Some(name) = kernel_param_name(path) else {
                continue;
            };
            match name {
                "mixture_weights" => {
                    let weights = param_view::<Ix1>(name, values, &[q])?;
                    for (component, w) in params.iter_mut().zip(weights.iter()) {
                        component.mixture_weight = *w;
                    }
                }
                "mixture_means" => {
                    let means = param_view::<Ix2>(name, values, &[q, input_dims])?;
                    for (component, row) in params.iter_mut().zip(means.rows()) {
                        component.mixture_means = row.to_owned();
                    }
                }
                "mixture_scales" => {
                    let scales = param_view::<Ix2>(name, values, &[input_dims, q])?;
                    for (component, column) in params.iter_mut().zip(scales.columns()) {
                        component.mixture_scales = column.to_owned();
                    }
                }
                _ => return Err(ModelError::UnknownParameter { name: name.to_string() }),
            }
        }
        self.params = params;
        Ok(())
    }

    // ---- Helper Methods ----

    fn apply_peaks(&mut self, method: SmInit, peaks: &SpectralPeaks) -> ModelResult<()> {
        let q = self.base.q;
        let input_dims = self.base.data.input_dims();
        peaks.check_shape(1, input_dims, q)?;
        if peaks.is_empty() {
            log::warn!("{} could not find peaks for SM", method.as_str());
            return Ok(());
        }

        let amplitudes = &peaks.amplitudes[0];
        let total = amplitudes.sum();
        let std = output_std(self.base.data.channel(0)?.y.view());
        for (k, component) in self.params.iter_mut().enumerate() {
            component.mixture_weight = (amplitudes[[0, k]] * std / total).sqrt();
            component.mixture_means = peaks.means[0].column(k).to_owned();
        }
        Ok(())
    }
}

impl SpectralModel for SMModel {
    fn kind(&self) -> ModelKind {
        ModelKind::SM
    }

    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn kernel(&self) -> KernelSum {
        let q = self.base.q;
        let input_dims = self.base.data.input_dims();
        KernelSum::from(KernelSpec::SpectralMixture {
            q,
            input_dims,
            weights: self.weights(),
            means: Array2::from_shape_fn((q, input_dims), |(k, i)| self.params[k].mixture_means[i]),
            scales: Array2::from_shape_fn((input_dims, q), |(i, k)| {
                self.params[k].mixture_scales[i]
            }),
        })
    }

    /// The lone channel's inputs (`n × d`) and outputs as an `n × 1` column.
    fn transform_data(&self) -> ModelResult<(Array2<f64>, Option<Array2<f64>>)> {
        let channel = self.base.data.channel(0)?;
        Ok((channel.x.clone(), Some(channel.y.clone().insert_axis(Axis(1)))))
    }
}

fn param_view<'a, D: Dimension>(
    name: &str, values: &'a ArrayD<f64>, expected: &[usize],
) -> ModelResult<ArrayView<'a, f64, D>> {
    let mismatch = || ModelError::ParamShapeMismatch {
        name: name.to_string(),
        expected: expected.to_vec(),
        actual: values.shape().to_vec(),
    };
    if values.shape() != expected {
        return Err(mismatch());
    }
    values.view().into_dimensionality::<D>().map_err(|_| mismatch())
}
