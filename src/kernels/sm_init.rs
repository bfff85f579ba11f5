//! Closed-form random initialization for spectral-mixture components.
//!
//! Purpose
//! -------
//! Draw a plausible starting point for a Q-component spectral-mixture kernel
//! from the geometry of the inputs alone, without any periodogram. This is
//! the `random` initialization of the single-output model.
//!
//! Key behaviors
//! -------------
//! - Scales (inverse lengthscales): `1 / (|N(0, 1)| · extent_i)`, i.e. the
//!   inverse of a lengthscale drawn from the half-normal `|N(0, extent_i²)|`.
//! - Means: `U(0, 1) · 0.5 / δ_i`, uniform up to the Nyquist frequency of the
//!   smallest positive input spacing `δ_i`; component 0 is pinned to zero
//!   frequency so one term always behaves like a squared-exponential.
//! - Weights: `std(y) / Q` for every component (population standard
//!   deviation).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every input dimension has at least two distinct locations; otherwise the
//!   extent and spacing are undefined and an error is returned.
//! - The RNG is supplied by the caller so draws are reproducible under a
//!   seeded generator.
use crate::data::{
    dataset::{extent, min_positive_spacing},
    errors::{DataError, DataResult},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::statistics::Statistics;

/// Random spectral-mixture draw for `Q` components over `d` input dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMixtureDraw {
    /// Mixture weights, length `Q`.
    pub weights: Array1<f64>,
    /// Spectral means, `Q × d`.
    pub means: Array2<f64>,
    /// Spectral scales, `Q × d`.
    pub scales: Array2<f64>,
}

/// Draw spectral-mixture parameters from the input extent and spacing.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView2<f64>`
///   Inputs, `n × d`.
/// - `y`: `ArrayView1<f64>`
///   Outputs, length `n`.
/// - `q`: `usize`
///   Number of components.
/// - `rng`: random source.
///
/// Errors
/// ------
/// - `DataError::InsufficientSpacing { channel: 0, dim }` when dimension
///   `dim` has fewer than two distinct input locations.
pub fn sm_init<R: Rng + ?Sized>(
    x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, q: usize, rng: &mut R,
) -> DataResult<SpectralMixtureDraw> {
    let input_dims = x.ncols();
    let mut max_dist = Array1::<f64>::zeros(input_dims);
    let mut nyquist = Array1::<f64>::zeros(input_dims);
    for (dim, column) in x.columns().into_iter().enumerate() {
        let spacing =
            min_positive_spacing(column).ok_or(DataError::InsufficientSpacing { channel: 0, dim })?;
        max_dist[dim] = extent(column);
        nyquist[dim] = 0.5 / spacing;
    }

    let scales = Array2::from_shape_fn((q, input_dims), |(_, dim)| {
        let draw: f64 = rng.sample(StandardNormal);
        1.0 / (draw.abs().max(f64::MIN_POSITIVE) * max_dist[dim])
    });
    let mut means = Array2::from_shape_fn((q, input_dims), |(_, dim)| rng.gen::<f64>() * nyquist[dim]);
    if q > 0 {
        means.row_mut(0).fill(0.0);
    }
    let weights = Array1::from_elem(q, output_std(y) / q.max(1) as f64);

    Ok(SpectralMixtureDraw { weights, means, scales })
}

/// Population standard deviation of the outputs (NumPy `std` convention).
pub fn output_std(y: ArrayView1<'_, f64>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().population_std_dev()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, array};
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shapes and support of the random draw.
    // - Weight formula std(y) / Q.
    // - Failure on degenerate inputs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check shapes, the pinned zero-frequency component, and the bounds of
    // the means and scales.
    //
    // Given
    // -----
    // - x = 0, 0.5, …, 9.5 (extent 9.5, spacing 0.5, Nyquist 1.0).
    // - y alternating ±1 (population std 1), Q = 4, seeded RNG.
    //
    // Expect
    // ------
    // - weights all 0.25; means 4 × 1 within [0, 1) with row 0 zero;
    //   scales strictly positive.
    fn draw_respects_extent_and_nyquist() {
        let x = Array::linspace(0.0, 9.5, 20).insert_axis(ndarray::Axis(1));
        let y = Array1::from_shape_fn(20, |i| if i % 2 == 0 { 1.0 } else { -1.0 });
        let mut rng = StdRng::seed_from_u64(7);

        let draw = sm_init(x.view(), y.view(), 4, &mut rng).unwrap();

        assert_eq!(draw.weights.len(), 4);
        for w in draw.weights.iter() {
            assert_relative_eq!(*w, 0.25, epsilon = 1e-12);
        }
        assert_eq!(draw.means.dim(), (4, 1));
        assert_eq!(draw.scales.dim(), (4, 1));
        assert_eq!(draw.means[[0, 0]], 0.0);
        assert!(draw.means.iter().all(|m| (0.0..1.0).contains(m)));
        assert!(draw.scales.iter().all(|s| *s > 0.0 && s.is_finite()));
    }

    #[test]
    fn draw_fails_without_distinct_locations() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![0.0, 1.0, 2.0];
        let mut rng = StdRng::seed_from_u64(1);

        let err = sm_init(x.view(), y.view(), 2, &mut rng).unwrap_err();

        assert_eq!(err, DataError::InsufficientSpacing { channel: 0, dim: 0 });
    }

    #[test]
    fn output_std_matches_population_convention() {
        assert_relative_eq!(output_std(array![1.0, 2.0, 3.0, 4.0].view()), 1.25f64.sqrt());
        assert_eq!(output_std(Array1::<f64>::zeros(0).view()), 0.0);
    }
}
