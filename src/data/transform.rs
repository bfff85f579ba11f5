//! Channel-indexed flattening of multi-output data.
//!
//! Multi-output kernels (MOSM, CSM, SM-LMC, CG) consume a single input matrix
//! whose first column carries the channel index. [`transform_multioutput_data`]
//! builds that matrix from per-channel inputs and stacks the outputs into an
//! aligned column vector.
//!
//! Notes
//! -----
//! - Rows keep the channel order they were given in; within a channel, the
//!   original row order is preserved.
//! - Keyed inputs use the key (parsed as `f64`) as the channel index, so
//!   keys must be numeric. Non-numeric keys are rejected with
//!   [`DataError::NonNumericChannelKey`].
use crate::data::errors::{DataError, DataResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};

/// Per-channel inputs accepted by [`transform_multioutput_data`].
#[derive(Debug, Clone)]
pub enum ChannelInputs<'a> {
    /// Channels in order; the channel index is the position.
    Sequence(Vec<ArrayView2<'a, f64>>),
    /// Channels keyed by a numeric label; the key is the channel index.
    Keyed(Vec<(String, ArrayView2<'a, f64>)>),
}

/// Flatten per-channel inputs (and optionally outputs) into a single
/// channel-indexed design.
///
/// Parameters
/// ----------
/// - `x`: [`ChannelInputs`]
///   Per-channel `n_c × d` input matrices.
/// - `y`: `Option<&[ArrayView1<f64>]>`
///   Per-channel outputs, aligned with the rows of `x`.
///
/// Returns
/// -------
/// `DataResult<(Array2<f64>, Option<Array2<f64>>)>`
///   - An `N × (d + 1)` matrix with rows `[channel, x_1, …, x_d]`, where
///     `N = Σ n_c` and channels are concatenated in order.
///   - When `y` is given, an `N × 1` column of the concatenated outputs.
///
/// Errors
/// ------
/// - `DataError::EmptyInput` when no channels are given.
/// - `DataError::NonNumericChannelKey` when a key does not parse to a finite
///   number.
/// - `DataError::InputDimsMismatch` when channels disagree on `d`.
/// - `DataError::ChannelCountMismatch` / `DataError::LengthMismatch` when `y`
///   is not aligned with `x`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use spectral_mogp::data::transform::{ChannelInputs, transform_multioutput_data};
/// let a = array![[0.0], [1.0]];
/// let b = array![[5.0]];
/// let (x, _) = transform_multioutput_data(ChannelInputs::Sequence(vec![a.view(), b.view()]), None)
///     .unwrap();
/// assert_eq!(x, array![[0.0, 0.0], [0.0, 1.0], [1.0, 5.0]]);
/// ```
pub fn transform_multioutput_data(
    x: ChannelInputs<'_>, y: Option<&[ArrayView1<'_, f64>]>,
) -> DataResult<(Array2<f64>, Option<Array2<f64>>)> {
    let (indices, blocks) = split_channels(x)?;
    let Some(first) = blocks.first() else {
        return Err(DataError::EmptyInput);
    };
    let input_dims = first.ncols();
    for (channel, block) in blocks.iter().enumerate() {
        if block.ncols() != input_dims {
            return Err(DataError::InputDimsMismatch {
                channel,
                expected: input_dims,
                actual: block.ncols(),
            });
        }
    }

    let total: usize = blocks.iter().map(|b| b.nrows()).sum();
    let mut flat_x = Array2::<f64>::zeros((total, input_dims + 1));
    let mut row = 0;
    for (&channel, block) in indices.iter().zip(blocks.iter()) {
        let n = block.nrows();
        flat_x.slice_mut(s![row..row + n, 0]).fill(channel);
        flat_x.slice_mut(s![row..row + n, 1..]).assign(block);
        row += n;
    }

    let flat_y = match y {
        None => None,
        Some(ys) => Some(stack_outputs(ys, &blocks)?),
    };
    Ok((flat_x, flat_y))
}

// ---- Helper Methods ----

fn split_channels(x: ChannelInputs<'_>) -> DataResult<(Vec<f64>, Vec<ArrayView2<'_, f64>>)> {
    match x {
        ChannelInputs::Sequence(blocks) => {
            let indices = (0..blocks.len()).map(|c| c as f64).collect();
            Ok((indices, blocks))
        }
        ChannelInputs::Keyed(entries) => {
            let mut indices = Vec::with_capacity(entries.len());
            let mut blocks = Vec::with_capacity(entries.len());
            for (key, block) in entries {
                let index = key
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataError::NonNumericChannelKey { key: key.clone() })?;
                indices.push(index);
                blocks.push(block);
            }
            Ok((indices, blocks))
        }
    }
}

fn stack_outputs(ys: &[ArrayView1<'_, f64>], blocks: &[ArrayView2<'_, f64>]) -> DataResult<Array2<f64>> {
    if ys.len() != blocks.len() {
        return Err(DataError::ChannelCountMismatch {
            x_channels: blocks.len(),
            y_channels: ys.len(),
        });
    }
    for (channel, (y, block)) in ys.iter().zip(blocks).enumerate() {
        if y.len() != block.nrows() {
            return Err(DataError::LengthMismatch { channel, x_len: block.nrows(), y_len: y.len() });
        }
    }
    let flat: Array1<f64> = ys.iter().flat_map(|y| y.iter().copied()).collect();
    Ok(flat.insert_axis(Axis(1)))
}
