//! Spectral peak estimation seam.
//!
//! The periodogram-style estimators that seed spectral-mixture parameters
//! (Lomb–Scargle and Bayesian Nonparametric Spectral Estimation) are provided
//! by the caller through [`SpectralEstimator`]. This module fixes the shape of
//! what they return ([`SpectralPeaks`]) and validates it before the model
//! layer consumes it.
//!
//! Conventions
//! -----------
//! - Peak tables are `input_dims × Q`: column `q` holds the `q`-th strongest
//!   peak for every input dimension.
//! - Peak locations are ordinary frequencies (cycles per input unit); models
//!   multiply by 2π where they need angular frequencies.
//! - Missing peaks are reported as zero amplitude, so a table whose
//!   amplitudes sum to zero means "no peaks found".
use crate::data::{
    dataset::Data,
    errors::{DataError, DataResult},
};
use ndarray::Array2;

/// Per-channel spectral peaks returned by a [`SpectralEstimator`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPeaks {
    /// Per channel, `input_dims × Q` peak locations.
    pub means: Vec<Array2<f64>>,
    /// Per channel, `input_dims × Q` peak amplitudes.
    pub amplitudes: Vec<Array2<f64>>,
}

impl SpectralPeaks {
    pub fn new(means: Vec<Array2<f64>>, amplitudes: Vec<Array2<f64>>) -> Self {
        SpectralPeaks { means, amplitudes }
    }

    /// Sum of every amplitude across channels and input dimensions.
    pub fn total_amplitude(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.sum()).sum()
    }

    /// `true` when the estimator found no peaks at all.
    pub fn is_empty(&self) -> bool {
        self.total_amplitude() == 0.0
    }

    /// Check that both tables cover `output_dims` channels of
    /// `input_dims × q` entries.
    ///
    /// Errors
    /// ------
    /// - `DataError::PeakChannelMismatch` when either table has the wrong
    ///   number of channels.
    /// - `DataError::PeakShapeMismatch` for the first channel whose table is
    ///   not `input_dims × q`.
    pub fn check_shape(&self, output_dims: usize, input_dims: usize, q: usize) -> DataResult<()> {
        for tables in [&self.means, &self.amplitudes] {
            if tables.len() != output_dims {
                return Err(DataError::PeakChannelMismatch {
                    expected: output_dims,
                    actual: tables.len(),
                });
            }
            for (channel, table) in tables.iter().enumerate() {
                if table.dim() != (input_dims, q) {
                    return Err(DataError::PeakShapeMismatch {
                        channel,
                        expected: (input_dims, q),
                        actual: table.dim(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Source of spectral peak estimates for a dataset.
///
/// Implementations return the `q` strongest peaks per channel and input
/// dimension, padded with zero amplitudes when fewer peaks exist.
pub trait SpectralEstimator {
    /// Peaks of the Lomb–Scargle periodogram.
    fn lomb_scargle(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks>;

    /// Peaks of the BNSE posterior power spectral density.
    fn bnse(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify amplitude totals and the empty-peaks predicate.
    //
    // Given
    // -----
    // - Two channels with amplitudes [[1, 2]] and [[0, 0.5]].
    // - A second estimate with all-zero amplitudes.
    //
    // Expect
    // ------
    // - Total 3.5 and not empty; zero table reports empty.
    fn total_amplitude_and_emptiness() {
        let peaks = SpectralPeaks::new(
            vec![array![[0.1, 0.2]], array![[0.3, 0.4]]],
            vec![array![[1.0, 2.0]], array![[0.0, 0.5]]],
        );
        let none = SpectralPeaks::new(vec![array![[0.0, 0.0]]], vec![array![[0.0, 0.0]]]);

        assert_eq!(peaks.total_amplitude(), 3.5);
        assert!(!peaks.is_empty());
        assert!(none.is_empty());
    }

    #[test]
    fn check_shape_reports_first_mismatch() {
        let peaks = SpectralPeaks::new(
            vec![array![[0.1, 0.2]], array![[0.3]]],
            vec![array![[1.0, 2.0]], array![[0.5]]],
        );

        assert_eq!(
            peaks.check_shape(3, 1, 2).unwrap_err(),
            DataError::PeakChannelMismatch { expected: 3, actual: 2 }
        );
        assert_eq!(
            peaks.check_shape(2, 1, 2).unwrap_err(),
            DataError::PeakShapeMismatch { channel: 1, expected: (1, 2), actual: (1, 1) }
        );
    }
}
