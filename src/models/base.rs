//! Shared model state and the common model interface.
//!
//! Purpose
//! -------
//! Every spectral GP model in this crate carries the same base state (name,
//! owned [`Data`], component count `Q`, fixed parameter names) and exposes
//! the same read-only surface through [`SpectralModel`]. Model-specific
//! component records live in the per-model modules.
//!
//! Key behaviors
//! -------------
//! - [`ModelBase::new`] validates `Q ≥ 1` and a non-empty dataset.
//! - [`ModelKind`] is the closed set of model kinds, with the string tags
//!   used by persisted artifacts.
//! - [`SpectralModel::transform_data`] defaults to the channel-indexed
//!   flattening used by multi-output kernels.
//!
//! Invariants & assumptions
//! ------------------------
//! - A model owns exactly `Q` component records, created with randomized
//!   defaults at construction and overwritten in place by `init_params`.
//! - `init_params` takes `&mut self`; a model has a single writer at a time.
use crate::{
    data::{dataset::Data, errors::DataError},
    kernels::spec::KernelSum,
    models::errors::{ModelError, ModelResult},
};
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;
use std::{collections::BTreeSet, str::FromStr};

/// The five model kinds, with their persisted type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Single-output spectral mixture (`"SM"`).
    SM,
    /// Multi-output spectral mixture (`"MOGP"`, also accepted as `"MOSM"`).
    MOSM,
    /// Convolutional Gaussian (`"CG"`).
    CG,
    /// Cross-spectral mixture (`"CSM"`).
    CSM,
    /// Spectral-mixture linear model of coregionalization (`"SM_LMC"`).
    SMLMC,
}

impl ModelKind {
    /// Tag written to persisted artifacts.
    pub fn tag(&self) -> &'static str {
        match self {
            ModelKind::SM => "SM",
            ModelKind::MOSM => "MOGP",
            ModelKind::CG => "CG",
            ModelKind::CSM => "CSM",
            ModelKind::SMLMC => "SM_LMC",
        }
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    /// Tags are matched exactly; anything else is `UnknownModelType`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SM" => Ok(ModelKind::SM),
            "MOGP" | "MOSM" => Ok(ModelKind::MOSM),
            "CG" => Ok(ModelKind::CG),
            "CSM" => Ok(ModelKind::CSM),
            "SM_LMC" => Ok(ModelKind::SMLMC),
            _ => Err(ModelError::UnknownModelType { tag: s.to_string() }),
        }
    }
}

/// State shared by every model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBase {
    /// Model name.
    pub name: String,
    /// Observations the model is fitted to.
    pub data: Data,
    /// Number of spectral components.
    pub q: usize,
    /// Parameter names held fixed during training.
    pub fixed_params: BTreeSet<String>,
}

impl ModelBase {
    /// Validate and assemble the base state.
    ///
    /// # Errors
    /// - [`ModelError::InvalidComponentCount`] when `q == 0`.
    /// - [`ModelError::Data`] wrapping `DataError::EmptyInput` when `data`
    ///   has no channels.
    pub fn new(name: &str, data: Data, q: usize) -> ModelResult<Self> {
        if q == 0 {
            return Err(ModelError::InvalidComponentCount { q });
        }
        if data.output_dims() == 0 {
            return Err(DataError::EmptyInput.into());
        }
        Ok(ModelBase { name: name.to_string(), data, q, fixed_params: BTreeSet::new() })
    }

    /// Hold `name` fixed during training.
    pub fn fix_param(&mut self, name: &str) {
        self.fixed_params.insert(name.to_string());
    }

    /// Release a previously fixed parameter.
    pub fn unfix_param(&mut self, name: &str) {
        self.fixed_params.remove(name);
    }

    pub fn is_fixed(&self, name: &str) -> bool {
        self.fixed_params.contains(name)
    }
}

/// Read-only interface shared by the spectral GP models.
pub trait SpectralModel {
    fn kind(&self) -> ModelKind;

    fn base(&self) -> &ModelBase;

    /// Kernel description for the GP backend.
    fn kernel(&self) -> KernelSum;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn data(&self) -> &Data {
        &self.base().data
    }

    fn q(&self) -> usize {
        self.base().q
    }

    /// Training design `(X, Y)` as the GP backend consumes it.
    ///
    /// Defaults to the channel-indexed flattening of
    /// [`transform_multioutput_data`](crate::data::transform::transform_multioutput_data).
    fn transform_data(&self) -> ModelResult<(Array2<f64>, Option<Array2<f64>>)> {
        Ok(self.data().transform()?)
    }
}

/// `ParamShapeMismatch` for `name` unless `actual == expected`.
pub(crate) fn expect_shape(name: &str, expected: &[usize], actual: &[usize]) -> ModelResult<()> {
    if actual != expected {
        return Err(ModelError::ParamShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

// ---- Random defaults ----

pub(crate) fn abs_normal_vec<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Array1<f64> {
    normal_vec(len, rng).mapv(f64::abs)
}

pub(crate) fn normal_vec<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| rng.sample::<f64, _>(StandardNormal))
}

pub(crate) fn normal_mat<R: Rng + ?Sized>(shape: (usize, usize), rng: &mut R) -> Array2<f64> {
    Array2::from_shape_fn(shape, |_| rng.sample::<f64, _>(StandardNormal))
}

pub(crate) fn uniform_vec<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| rng.gen::<f64>())
}

pub(crate) fn uniform_mat<R: Rng + ?Sized>(shape: (usize, usize), rng: &mut R) -> Array2<f64> {
    Array2::from_shape_fn(shape, |_| rng.gen::<f64>())
}
