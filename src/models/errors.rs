//! Errors for spectral GP models (configuration, parameter updates, loading).
//!
//! This module defines [`ModelError`], returned by model constructors,
//! `init_params` routines, parameter updates from a trainer, and the
//! persisted-model loader. It implements `Display`/`Error` and converts to
//! `PyErr` for PyO3.
//!
//! ## Conventions
//! - Configuration problems (bad method names, output-dimension counts,
//!   unsupported `Rq`, unknown model tags) are hard failures returned to the
//!   caller immediately.
//! - A spectral estimator that finds no peaks is **not** an error; the model
//!   logs a warning and keeps its previous parameters.
//! - Data-layer failures are wrapped as [`ModelError::Data`].
//! - Trainer failures are normalized to [`ModelError::TrainingFailed`] with a
//!   human-readable status.
use crate::data::errors::DataError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for model operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for spectral GP models.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Data ----
    /// Wrapped data-layer error.
    Data(DataError),

    // ---- Configuration ----
    /// Model requires a specific number of output channels.
    InvalidOutputDims { expected: usize, actual: usize },

    /// Number of spectral components must be at least one.
    InvalidComponentCount { q: usize },

    /// Unknown single-output initialization method name.
    InvalidInitMethod { name: String },

    /// Unknown multi-output initialization mode name.
    InvalidMode { name: String },

    /// Only one latent function per component is supported.
    UnsupportedRq { rq: usize },

    /// Optimizer method name must be non-empty.
    EmptyMethod,

    // ---- Parameter updates ----
    /// Trainer reported a kernel parameter this model does not have.
    UnknownParameter { name: String },

    /// Trainer reported a parameter array with an unexpected shape.
    ParamShapeMismatch { name: String, expected: Vec<usize>, actual: Vec<usize> },

    /// External trainer failed; include a human-readable status.
    TrainingFailed { status: String },

    // ---- Loading ----
    /// Persisted model carries an unknown type tag.
    UnknownModelType { tag: String },

    /// Persisted artifact could not be found by the store.
    ArtifactNotFound { name: String },

    /// Persisted parameters belong to a different model kind.
    ParamKindMismatch { expected: &'static str, found: &'static str },

    /// Number of parameter sets does not match Q.
    ComponentCountMismatch { expected: usize, actual: usize },
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data ----
            ModelError::Data(err) => write!(f, "Data error: {err}"),
            // ---- Configuration ----
            ModelError::InvalidOutputDims { expected, actual } => {
                write!(
                    f,
                    "Model can only take {expected} output dimension(s) in the data; got {actual}."
                )
            }
            ModelError::InvalidComponentCount { q } => {
                write!(f, "Number of components Q must be at least 1; got {q}.")
            }
            ModelError::InvalidInitMethod { name } => {
                write!(
                    f,
                    "Unknown initialization method '{name}'; possible methods are 'random', 'LS' and 'BNSE'."
                )
            }
            ModelError::InvalidMode { name } => {
                write!(f, "Unknown mode '{name}'; possible modes are either 'full' or 'means'.")
            }
            ModelError::UnsupportedRq { rq } => {
                write!(f, "Rq != 1 is not supported; got Rq = {rq}.")
            }
            ModelError::EmptyMethod => write!(f, "Optimizer method name must not be empty."),
            // ---- Parameter updates ----
            ModelError::UnknownParameter { name } => {
                write!(f, "Unknown kernel parameter '{name}'.")
            }
            ModelError::ParamShapeMismatch { name, expected, actual } => {
                write!(f, "Parameter '{name}' has shape {actual:?}; expected {expected:?}.")
            }
            ModelError::TrainingFailed { status } => {
                write!(f, "Training failed: {status}")
            }
            // ---- Loading ----
            ModelError::UnknownModelType { tag } => {
                write!(f, "unknown model type '{tag}'")
            }
            ModelError::ArtifactNotFound { name } => {
                write!(f, "No persisted model named '{name}'.")
            }
            ModelError::ParamKindMismatch { expected, found } => {
                write!(f, "Persisted parameters are for a {found} model; expected {expected}.")
            }
            ModelError::ComponentCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} parameter sets; got {actual}.")
            }
        }
    }
}

impl From<DataError> for ModelError {
    fn from(err: DataError) -> Self {
        ModelError::Data(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
