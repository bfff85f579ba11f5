//! Errors for multi-output data containers and the channel transform.
//!
//! This module defines [`DataError`], the error type returned by
//! [`Data`](crate::data::dataset::Data) construction, sub-dataset extraction,
//! the Nyquist estimate, and
//! [`transform_multioutput_data`](crate::data::transform::transform_multioutput_data).
//! It implements `Display`/`Error` and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Channel and dimension indices are 0-based** (match Rust/NumPy).
//! - Inputs and outputs must be **finite**.
//! - A channel's input matrix is `n × d`; its outputs have length `n`.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for data operations that may produce [`DataError`].
pub type DataResult<T> = Result<T, DataError>;

/// Unified error type for data containers and transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Channel construction ----
    /// A channel was added with zero observations.
    EmptyChannel { channel: usize },

    /// Number of input rows does not match number of outputs.
    LengthMismatch { channel: usize, x_len: usize, y_len: usize },

    /// A channel's input dimensionality differs from the container's.
    InputDimsMismatch { channel: usize, expected: usize, actual: usize },

    /// Input matrix has zero columns.
    ZeroInputDims { channel: usize },

    /// An input or output value is NaN/±inf.
    NonFiniteValue { channel: usize, index: usize, value: f64 },

    // ---- Lookups ----
    /// Requested channel does not exist.
    ChannelOutOfRange { channel: usize, output_dims: usize },

    /// Requested input dimension does not exist.
    InputDimOutOfRange { dim: usize, input_dims: usize },

    // ---- Spacing / spectral heuristics ----
    /// Fewer than two distinct input locations; spacing is undefined.
    InsufficientSpacing { channel: usize, dim: usize },

    // ---- Transform ----
    /// No channels were supplied to the transform.
    EmptyInput,

    /// X was neither a sequence nor a keyed mapping of channels.
    UnsupportedInput { found: String },

    /// A mapping key could not be cast to a numeric channel index.
    NonNumericChannelKey { key: String },

    /// Number of Y channels does not match number of X channels.
    ChannelCountMismatch { x_channels: usize, y_channels: usize },

    // ---- Spectral estimates ----
    /// Estimator returned peaks for the wrong number of channels.
    PeakChannelMismatch { expected: usize, actual: usize },

    /// Estimator returned a peak table of the wrong shape for a channel.
    PeakShapeMismatch { channel: usize, expected: (usize, usize), actual: (usize, usize) },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Channel construction ----
            DataError::EmptyChannel { channel } => {
                write!(f, "Channel {channel} has no observations.")
            }
            DataError::LengthMismatch { channel, x_len, y_len } => {
                write!(
                    f,
                    "Channel {channel} has {x_len} input rows but {y_len} outputs; lengths must match."
                )
            }
            DataError::InputDimsMismatch { channel, expected, actual } => {
                write!(
                    f,
                    "Channel {channel} has {actual} input dimensions; expected {expected}."
                )
            }
            DataError::ZeroInputDims { channel } => {
                write!(f, "Channel {channel} has an input matrix with zero columns.")
            }
            DataError::NonFiniteValue { channel, index, value } => {
                write!(f, "Channel {channel} has a non-finite value at index {index}: {value}")
            }
            // ---- Lookups ----
            DataError::ChannelOutOfRange { channel, output_dims } => {
                write!(f, "Channel {channel} out of range; data has {output_dims} channels.")
            }
            DataError::InputDimOutOfRange { dim, input_dims } => {
                write!(
                    f,
                    "Input dimension {dim} out of range; data has {input_dims} input dimensions."
                )
            }
            // ---- Spacing ----
            DataError::InsufficientSpacing { channel, dim } => {
                write!(
                    f,
                    "Channel {channel}, input dimension {dim} needs at least two distinct input locations."
                )
            }
            // ---- Transform ----
            DataError::EmptyInput => write!(f, "No channels supplied."),
            DataError::UnsupportedInput { found } => {
                write!(f, "unknown data type for x: expected a list or dict of arrays, got {found}")
            }
            DataError::NonNumericChannelKey { key } => {
                write!(f, "Channel key '{key}' cannot be cast to a numeric channel index.")
            }
            DataError::ChannelCountMismatch { x_channels, y_channels } => {
                write!(f, "X has {x_channels} channels but Y has {y_channels}.")
            }
            // ---- Spectral estimates ----
            DataError::PeakChannelMismatch { expected, actual } => {
                write!(f, "Spectral estimate covers {actual} channels; expected {expected}.")
            }
            DataError::PeakShapeMismatch { channel, expected, actual } => {
                write!(
                    f,
                    "Spectral estimate for channel {channel} has shape {actual:?}; expected {expected:?}."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DataError> for PyErr {
    fn from(err: DataError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
