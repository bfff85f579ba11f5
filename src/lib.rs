//! spectral_mogp — spectral parameter initialization for multi-output
//! Gaussian process models, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing the data-layer routines through the
//! `_spectral_mogp` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `data` (datasets, channel flattening,
//!   spectral-peak seam), `kernels` (spectral-mixture draws, kernel
//!   descriptions) and `models` (SM, MOSM, CSM, SM-LMC, CG, loading).
//! - Define the `#[pyfunction]` / `#[pyclass]` wrappers and the `#[pymodule]`
//!   initializer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Numerical work lives in the inner modules; this file does FFI glue,
//!   input conversion and error mapping only.
//! - Errors from core code are converted to `PyErr` (`ValueError`) at the
//!   PyO3 boundary.
//!
//! Conventions
//! -----------
//! - Spectral peak estimation and GP training are supplied by the caller
//!   through [`data::SpectralEstimator`] and [`models::Trainer`].
//! - Diagnostics go through the `log` facade; install any `log` backend to
//!   see them.
//!
//! Testing notes
//! -------------
//! - Unit tests sit in each module; `tests/` runs the initialization
//!   pipelines end to end with stub estimators and trainers.

pub mod data;
pub mod kernels;
pub mod models;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    data::{dataset::Data, transform::transform_multioutput_data},
    utils::{
        extract_channel_inputs, extract_channel_outputs, extract_f64_matrix, extract_f64_vector,
        output_views,
    },
};

/// transform_multioutput_data — flatten per-channel inputs into a
/// channel-indexed design.
///
/// Parameters
/// ----------
/// - `x`: list or dict of per-channel inputs (`n_c × d` arrays, or 1-D
///   arrays read as `n_c × 1`). Dict keys are the channel indices and must
///   be numeric.
/// - `y`: optional list (or dict) of per-channel 1-D outputs.
///
/// Returns
/// -------
/// `(X, Y)` with `X` of shape `N × (d + 1)`, rows `[channel, x...]`, and `Y`
/// of shape `N × 1`, or `None` when `y` is omitted.
///
/// Raises
/// ------
/// `ValueError` for any other `x` type, non-numeric keys, or misaligned
/// shapes.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "transform_multioutput_data")]
#[pyo3(signature = (x, y = None))]
fn py_transform_multioutput_data<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, y: Option<&Bound<'py, PyAny>>,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Option<Bound<'py, PyArray2<f64>>>)> {
    let inputs = extract_channel_inputs(x)?;
    let outputs = y.map(extract_channel_outputs).transpose()?;
    let views = outputs.as_deref().map(output_views);

    let (flat_x, flat_y) = transform_multioutput_data(inputs.as_inputs(), views.as_deref())?;
    Ok((flat_x.into_pyarray(py), flat_y.map(|a| a.into_pyarray(py))))
}

/// Dataset — Python-facing wrapper for a multi-channel [`Data`] set.
///
/// Channels are added one at a time with `add(x, y, name=None)`; inputs may
/// be `n × d` or 1-D. Exposes the Nyquist estimate and the channel-indexed
/// flattening used by multi-output kernels.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "spectral_mogp")]
pub struct Dataset {
    inner: Data,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Dataset {
    #[new]
    pub fn new() -> Self {
        Dataset { inner: Data::new() }
    }

    /// Append a channel; raises `ValueError` on misaligned or non-finite data.
    #[pyo3(signature = (x, y, name = None))]
    pub fn add<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, name: Option<&str>,
    ) -> PyResult<()> {
        let x = extract_f64_matrix(x)?;
        let y = extract_f64_vector(y)?;
        self.inner.add(x, y, name)?;
        Ok(())
    }

    #[getter]
    pub fn input_dims(&self) -> usize {
        self.inner.input_dims()
    }

    #[getter]
    pub fn output_dims(&self) -> usize {
        self.inner.output_dims()
    }

    #[getter]
    pub fn channel_names(&self) -> Vec<String> {
        self.inner.channel_names().into_iter().map(str::to_string).collect()
    }

    /// `output_dims × input_dims` Nyquist frequency estimates.
    pub fn nyquist_estimation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(self.inner.nyquist_estimation()?.into_pyarray(py))
    }

    /// Channel-indexed `(X, Y)` design of the stored channels.
    pub fn transform<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<(Bound<'py, PyArray2<f64>>, Option<Bound<'py, PyArray2<f64>>>)> {
        let (x, y) = self.inner.transform()?;
        Ok((x.into_pyarray(py), y.map(|a| a.into_pyarray(py))))
    }
}

/// _spectral_mogp — PyO3 module initializer.
///
/// Registers `transform_multioutput_data` and the `Dataset` class. Invoked by
/// Python on import; not called directly.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _spectral_mogp<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_transform_multioutput_data, m)?)?;
    m.add_class::<Dataset>()?;
    Ok(())
}
