//! data — multi-output datasets, channel flattening, and spectral estimates.
//!
//! Purpose
//! -------
//! Collect everything the model layer reads from observations: the validated
//! per-channel container ([`Data`]), the channel-indexed flattening used by
//! multi-output kernels ([`transform_multioutput_data`]), and the seam through
//! which periodogram-style peak estimators are plugged in
//! ([`SpectralEstimator`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every channel of a [`Data`] holds aligned, finite, non-empty `x` / `y`
//!   with a common input dimensionality.
//! - Peak tables returned by a [`SpectralEstimator`] are `input_dims × Q` per
//!   channel and are shape-checked before use.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; channel `c` is the `c`-th channel added.
//! - Errors are reported as [`DataError`] through [`DataResult`].
//! - This module performs no logging and no I/O.
pub mod dataset;
pub mod errors;
pub mod estimation;
pub mod transform;

pub use self::dataset::{Channel, Data};
pub use self::errors::{DataError, DataResult};
pub use self::estimation::{SpectralEstimator, SpectralPeaks};
pub use self::transform::{ChannelInputs, transform_multioutput_data};
