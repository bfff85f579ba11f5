//! Conversion helpers between Python objects and the crate's array types.
//!
//! [`OwnedChannels`] holds per-channel inputs copied out of a list or dict so
//! they can be lent to
//! [`transform_multioutput_data`](crate::data::transform::transform_multioutput_data)
//! as a [`ChannelInputs`] view. The `extract_*` functions are PyO3-only.
use crate::data::transform::ChannelInputs;
use ndarray::{Array1, Array2, ArrayView1};

#[cfg(feature = "python-bindings")]
use crate::data::errors::DataError;

#[cfg(feature = "python-bindings")]
use ndarray::Axis;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyDict, PyList, PyTuple},
};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

/// Per-channel inputs and outputs owned on the Rust side.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedChannels {
    /// Channels in positional order.
    Sequence(Vec<Array2<f64>>),
    /// Channels keyed by label, in mapping order.
    Keyed(Vec<(String, Array2<f64>)>),
}

impl OwnedChannels {
    /// Borrow as the input form of `transform_multioutput_data`.
    pub fn as_inputs(&self) -> ChannelInputs<'_> {
        match self {
            OwnedChannels::Sequence(xs) => ChannelInputs::Sequence(xs.iter().map(|x| x.view()).collect()),
            OwnedChannels::Keyed(xs) => {
                ChannelInputs::Keyed(xs.iter().map(|(k, x)| (k.clone(), x.view())).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OwnedChannels::Sequence(xs) => xs.len(),
            OwnedChannels::Keyed(xs) => xs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrow owned outputs as views.
pub fn output_views(ys: &[Array1<f64>]) -> Vec<ArrayView1<'_, f64>> {
    ys.iter().map(|y| y.view()).collect()
}

/// Copy a 2-D float array out of `raw`.
///
/// Accepts a 2-D `numpy.ndarray`, a 1-D one (read as a single input column),
/// anything with `to_numpy()`, or a nested sequence of floats.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned().insert_axis(Axis(1)));
    }
    if let Ok(obj) = raw.call_method0("to_numpy") {
        if !obj.is(raw) {
            return extract_f64_matrix(&obj);
        }
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray or nested sequence of float64")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyTypeError::new_err("nested sequence rows must have equal length"));
    }
    let nrows = rows.len();
    Array2::from_shape_vec((nrows, ncols), rows.into_iter().flatten().collect())
        .map_err(|e| PyTypeError::new_err(e.to_string()))
}

/// Copy a 1-D float array out of `raw`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(obj) = raw.call_method0("to_numpy") {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    let values: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(Array1::from(values))
}

/// Per-channel inputs from a list/tuple (positional channels) or a dict
/// (keyed channels). Any other type is `DataError::UnsupportedInput`.
#[cfg(feature = "python-bindings")]
pub fn extract_channel_inputs<'py>(x: &Bound<'py, PyAny>) -> PyResult<OwnedChannels> {
    if let Ok(dict) = x.downcast::<PyDict>() {
        let mut keyed = Vec::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            keyed.push((key.str()?.to_string(), extract_f64_matrix(&value)?));
        }
        return Ok(OwnedChannels::Keyed(keyed));
    }
    if x.is_instance_of::<PyList>() || x.is_instance_of::<PyTuple>() {
        let mut channels = Vec::new();
        for item in x.try_iter()? {
            channels.push(extract_f64_matrix(&item?)?);
        }
        return Ok(OwnedChannels::Sequence(channels));
    }
    let found = x.get_type().name()?.to_string();
    Err(DataError::UnsupportedInput { found }.into())
}

/// Per-channel outputs from a list/tuple or the values of a dict.
#[cfg(feature = "python-bindings")]
pub fn extract_channel_outputs<'py>(y: &Bound<'py, PyAny>) -> PyResult<Vec<Array1<f64>>> {
    let values = match y.downcast::<PyDict>() {
        Ok(dict) => dict.values().into_any(),
        Err(_) => y.clone(),
    };
    let mut outputs = Vec::new();
    for item in values.try_iter()? {
        outputs.push(extract_f64_vector(&item?)?);
    }
    Ok(outputs)
}
