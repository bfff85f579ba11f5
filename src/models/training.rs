//! Trainer seam for single-output spectral-mixture fits.
//!
//! Gradient-based training of a GP (marginal likelihood, its gradient, the
//! optimizer loop) lives outside this crate. A [`Trainer`] receives an
//! initialized [`SMModel`] plus [`TrainOptions`] and returns the fitted
//! kernel parameters as [`Trainables`], keyed by hierarchical paths such as
//! `model/kern/mixture_scales`. [`SMModel::update_params`] writes them back.
//!
//! Conventions
//! -----------
//! - Paths are split on `/`; only three-part paths whose middle segment is
//!   `kern` address kernel parameters (see [`kernel_param_name`]).
//! - Array layouts follow the kernel description: `mixture_weights` is `Q`,
//!   `mixture_means` is `Q × d`, `mixture_scales` is `d × Q`.
use crate::models::{errors::ModelResult, sm::SMModel};
use ndarray::ArrayD;
use std::collections::BTreeMap;

/// Fitted parameter values keyed by hierarchical path.
pub type Trainables = BTreeMap<String, ArrayD<f64>>;

/// Optimizer configuration forwarded to a [`Trainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    /// Optimizer method name, e.g. `"BFGS"`.
    pub method: String,
    /// Iteration cap.
    pub maxiter: usize,
}

/// External optimizer for single-output spectral-mixture models.
pub trait Trainer {
    fn train(&mut self, model: &SMModel, opts: &TrainOptions) -> ModelResult<Trainables>;
}

impl<F> Trainer for F
where
    F: FnMut(&SMModel, &TrainOptions) -> ModelResult<Trainables>,
{
    fn train(&mut self, model: &SMModel, opts: &TrainOptions) -> ModelResult<Trainables> {
        self(model, opts)
    }
}

/// Trainer that keeps the initialized parameters as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraining;

impl Trainer for NoTraining {
    fn train(&mut self, _model: &SMModel, _opts: &TrainOptions) -> ModelResult<Trainables> {
        Ok(Trainables::new())
    }
}

/// Kernel parameter name addressed by `path`, if any.
///
/// `"model/kern/mixture_means"` yields `Some("mixture_means")`;
/// `"model/likelihood/variance"` and malformed paths yield `None`.
pub fn kernel_param_name(path: &str) -> Option<&str> {
    let mut names = path.split('/');
    match (names.next(), names.next(), names.next(), names.next()) {
        (Some(_), Some("kern"), Some(name), None) => Some(name),
        _ => None,
    }
}
