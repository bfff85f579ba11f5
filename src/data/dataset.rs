//! Multi-output data container — per-channel inputs and outputs.
//!
//! Purpose
//! -------
//! Hold the observations a multi-output GP is fitted to: an ordered list of
//! channels (outputs), each with its own input matrix and output vector.
//! This module centralizes input validation so the estimation code in
//! [`crate::models`] can assume well-formed, aligned, finite arrays.
//!
//! Key behaviors
//! -------------
//! - [`Data::add`] / [`Data::add_1d`] append validated channels; the input
//!   dimensionality is fixed by the first channel.
//! - [`Data::single_input`] isolates one (channel, input-dimension) pair as a
//!   single-input single-output dataset, the unit of work of
//!   [`estimate_from_sm`](crate::models::aggregate::estimate_from_sm).
//! - [`Data::nyquist_estimation`] reports `0.5 / min spacing` per channel and
//!   input dimension.
//!
//! Invariants & assumptions
//! ------------------------
//! - For every channel, `x.nrows() == y.len() > 0` and `x.ncols() == d`,
//!   where `d` is the container's input dimensionality.
//! - All stored values are finite.
//! - Channels keep insertion order; the channel index is its position.
//!
//! Conventions
//! -----------
//! - Input matrices are `n × d` (`ndarray::Array2<f64>`), outputs are
//!   length-`n` vectors (`ndarray::Array1<f64>`).
//! - `Data` is owned by models; `Clone` is the explicit copy.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction failures (length mismatch, dimension
//!   mismatch, non-finite values, empty channels), sub-dataset extraction,
//!   and the Nyquist estimate including duplicated input locations.
use crate::data::{
    errors::{DataError, DataResult},
    transform::{ChannelInputs, transform_multioutput_data},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// One output channel: inputs, outputs, and a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Channel name used in diagnostics.
    pub name: String,
    /// Inputs, `n × d`.
    pub x: Array2<f64>,
    /// Outputs, length `n`.
    pub y: Array1<f64>,
}

/// `Data` — validated multi-output dataset.
///
/// Purpose
/// -------
/// Represent per-channel `(X, Y)` observations with a shared input
/// dimensionality. Models own a `Data` value and read it when initializing
/// their spectral parameters.
///
/// Invariants
/// ----------
/// - Every channel is non-empty with aligned, finite `x` / `y`.
/// - All channels share `input_dims()` columns.
///
/// Notes
/// -----
/// - Construction is incremental (`Data::new` then `add`), matching how
///   callers typically collect channels from heterogeneous sources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Data {
    channels: Vec<Channel>,
}

impl Data {
    /// Empty dataset with no channels.
    pub fn new() -> Self {
        Data { channels: Vec::new() }
    }

    /// Append a channel with `n × d` inputs and `n` outputs.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   Input locations, one row per observation.
    /// - `y`: `Array1<f64>`
    ///   Observed outputs aligned with the rows of `x`.
    /// - `name`: `Option<&str>`
    ///   Channel name; defaults to the channel index.
    ///
    /// Errors
    /// ------
    /// - `DataError::EmptyChannel` when `y` is empty.
    /// - `DataError::ZeroInputDims` when `x` has no columns.
    /// - `DataError::LengthMismatch` when `x.nrows() != y.len()`.
    /// - `DataError::InputDimsMismatch` when `x.ncols()` differs from earlier
    ///   channels.
    /// - `DataError::NonFiniteValue` for the first NaN/±inf in `x` (row-major
    ///   flat index) or `y`.
    pub fn add(&mut self, x: Array2<f64>, y: Array1<f64>, name: Option<&str>) -> DataResult<()> {
        let channel = self.channels.len();
        if y.is_empty() || x.nrows() == 0 {
            return Err(DataError::EmptyChannel { channel });
        }
        if x.ncols() == 0 {
            return Err(DataError::ZeroInputDims { channel });
        }
        if x.nrows() != y.len() {
            return Err(DataError::LengthMismatch { channel, x_len: x.nrows(), y_len: y.len() });
        }
        if let Some(first) = self.channels.first() {
            if first.x.ncols() != x.ncols() {
                return Err(DataError::InputDimsMismatch {
                    channel,
                    expected: first.x.ncols(),
                    actual: x.ncols(),
                });
            }
        }
        for (index, &value) in x.iter().chain(y.iter()).enumerate() {
            if !value.is_finite() {
                return Err(DataError::NonFiniteValue { channel, index, value });
            }
        }

        let name = name.map_or_else(|| channel.to_string(), str::to_string);
        self.channels.push(Channel { name, x, y });
        Ok(())
    }

    /// Append a single-input channel; `x` becomes an `n × 1` matrix.
    pub fn add_1d(&mut self, x: Array1<f64>, y: Array1<f64>, name: Option<&str>) -> DataResult<()> {
        self.add(x.insert_axis(Axis(1)), y, name)
    }

    /// Input dimensionality `d` (0 for an empty dataset).
    pub fn input_dims(&self) -> usize {
        self.channels.first().map_or(0, |c| c.x.ncols())
    }

    /// Number of output channels.
    pub fn output_dims(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, channel: usize) -> DataResult<&Channel> {
        self.channels
            .get(channel)
            .ok_or(DataError::ChannelOutOfRange { channel, output_dims: self.output_dims() })
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    /// Borrowed input matrices, one per channel.
    pub fn xs(&self) -> Vec<ArrayView2<'_, f64>> {
        self.channels.iter().map(|c| c.x.view()).collect()
    }

    /// Borrowed output vectors, one per channel.
    pub fn ys(&self) -> Vec<ArrayView1<'_, f64>> {
        self.channels.iter().map(|c| c.y.view()).collect()
    }

    /// Isolate column `dim` of `channel` as a single-input, single-output
    /// dataset. The channel name is carried over.
    ///
    /// Errors
    /// ------
    /// - `DataError::ChannelOutOfRange` / `DataError::InputDimOutOfRange` for
    ///   invalid indices.
    pub fn single_input(&self, channel: usize, dim: usize) -> DataResult<Data> {
        let source = self.channel(channel)?;
        let input_dims = self.input_dims();
        if dim >= input_dims {
            return Err(DataError::InputDimOutOfRange { dim, input_dims });
        }
        let mut sub = Data::new();
        sub.add_1d(source.x.column(dim).to_owned(), source.y.clone(), Some(&source.name))?;
        Ok(sub)
    }

    /// Nyquist frequency estimate per channel and input dimension.
    ///
    /// Returns an `output_dims × input_dims` array whose entry `[c, i]` is
    /// `0.5 / δ`, with `δ` the smallest strictly positive gap between sorted
    /// input locations of channel `c` along dimension `i`. Duplicated input
    /// locations are skipped.
    ///
    /// Errors
    /// ------
    /// - `DataError::InsufficientSpacing` when a channel has fewer than two
    ///   distinct locations along some dimension.
    pub fn nyquist_estimation(&self) -> DataResult<Array2<f64>> {
        let mut nyquist = Array2::<f64>::zeros((self.output_dims(), self.input_dims()));
        for (channel, ch) in self.channels.iter().enumerate() {
            for (dim, column) in ch.x.columns().into_iter().enumerate() {
                let spacing = min_positive_spacing(column)
                    .ok_or(DataError::InsufficientSpacing { channel, dim })?;
                nyquist[[channel, dim]] = 0.5 / spacing;
            }
        }
        Ok(nyquist)
    }

    /// Flatten the stored channels with
    /// [`transform_multioutput_data`]; rows are `[channel, x_1, …, x_d]`.
    pub fn transform(&self) -> DataResult<(Array2<f64>, Option<Array2<f64>>)> {
        let ys = self.ys();
        transform_multioutput_data(ChannelInputs::Sequence(self.xs()), Some(ys.as_slice()))
    }
}

/// Smallest strictly positive gap between sorted values, if any.
pub fn min_positive_spacing(values: ArrayView1<'_, f64>) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).map(|w| w[1] - w[0]).filter(|gap| *gap > 0.0).min_by(f64::total_cmp)
}

/// Range `max - min` of the values (0 for fewer than two values).
pub fn extent(values: ArrayView1<'_, f64>) -> f64 {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.len() < 2 { 0.0 } else { hi - lo }
}
