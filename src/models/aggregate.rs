//! Per-channel spectral-mixture estimates for multi-output initialization.
//!
//! Purpose
//! -------
//! Multi-output kernels are seeded from independent single-output fits: for
//! every channel and every input dimension an [`SMModel`] is built on that
//! one column, initialized, optionally trained, and its components collected
//! into [`SmEstimates`]. CSM and SM-LMC further collapse the estimates into
//! the `Q` strongest components across channels with [`rank_components`].
//!
//! Key behaviors
//! -------------
//! - [`estimate_from_sm`] runs `output_dims × input_dims` fits; estimated
//!   means are converted to angular frequency (× 2π).
//! - Training is delegated to a [`Trainer`] and skipped when `maxiter == 0`.
//! - [`rank_components`] averages each component's weight over input
//!   dimensions, normalizes it by the component's total weight across input
//!   dimensions and channels, and keeps the `Q` largest.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimate arrays are indexed `[q, input_dim, channel]`.
//! - The ranking sort is stable; ties keep the reverse of their slot order.
//!
//! Testing notes
//! -------------
//! - Unit tests cover estimate shapes, the skip-training path, the 2π
//!   conversion, and both ranking-table layouts.
use crate::{
    data::{dataset::Data, errors::DataError, estimation::SpectralEstimator},
    models::{
        errors::{ModelError, ModelResult},
        options::{ComponentIndexing, SmFitOptions},
        sm::SMModel,
        training::Trainer,
    },
};
use ndarray::{Array1, Array2, Array3, s};
use rand::Rng;
use std::f64::consts::PI;

/// Spectral-mixture parameters estimated per channel and input dimension.
///
/// Each array has shape `(Q, input_dims, output_dims)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmEstimates {
    pub weight: Array3<f64>,
    /// Angular spectral means.
    pub mean: Array3<f64>,
    pub scale: Array3<f64>,
}

impl SmEstimates {
    pub fn zeros(q: usize, input_dims: usize, output_dims: usize) -> Self {
        let shape = (q, input_dims, output_dims);
        SmEstimates {
            weight: Array3::zeros(shape),
            mean: Array3::zeros(shape),
            scale: Array3::zeros(shape),
        }
    }

    pub fn q(&self) -> usize {
        self.weight.dim().0
    }

    pub fn input_dims(&self) -> usize {
        self.weight.dim().1
    }

    pub fn output_dims(&self) -> usize {
        self.weight.dim().2
    }
}

/// Estimate spectral-mixture parameters for every channel and input
/// dimension of `data` via independent single-output fits.
///
/// Parameters
/// ----------
/// - `data`: dataset with at least one channel.
/// - `q`: components per fit.
/// - `opts`: init heuristic, optimizer method, iteration cap.
/// - `estimator`: peak source for `LS` / `BNSE` init.
/// - `trainer`: optimizer for each fit; not called when `opts.maxiter == 0`.
///
/// Returns
/// -------
/// [`SmEstimates`] with entry `[k, i, c]` holding component `k` of the fit on
/// channel `c`, input dimension `i`.
///
/// Errors
/// ------
/// - `ModelError::InvalidComponentCount` when `q == 0`.
/// - Data, estimator and trainer errors from any single fit.
pub fn estimate_from_sm(
    data: &Data, q: usize, opts: &SmFitOptions, estimator: &dyn SpectralEstimator,
    trainer: &mut dyn Trainer,
) -> ModelResult<SmEstimates> {
    estimate_from_sm_with_rng(data, q, opts, estimator, trainer, &mut rand::thread_rng())
}

/// As [`estimate_from_sm`], drawing every random default from `rng`.
pub fn estimate_from_sm_with_rng<R: Rng + ?Sized>(
    data: &Data, q: usize, opts: &SmFitOptions, estimator: &dyn SpectralEstimator,
    trainer: &mut dyn Trainer, rng: &mut R,
) -> ModelResult<SmEstimates> {
    if q == 0 {
        return Err(ModelError::InvalidComponentCount { q });
    }
    let output_dims = data.output_dims();
    if output_dims == 0 {
        return Err(DataError::EmptyInput.into());
    }
    let input_dims = data.input_dims();
    let train_opts = opts.train_options();

    let mut estimates = SmEstimates::zeros(q, input_dims, output_dims);
    for channel in 0..output_dims {
        for dim in 0..input_dims {
            let sub = data.single_input(channel, dim)?;
            let mut sm = SMModel::with_rng(sub, q, SMModel::DEFAULT_NAME, rng)?;
            sm.init_params_with_rng(opts.init, estimator, rng)?;
            if opts.maxiter > 0 {
                let fitted = trainer.train(&sm, &train_opts)?;
                sm.update_params(&fitted)?;
            }
            log::debug!(
                "SM fit for channel {channel}, input {dim}: weights {}",
                sm.weights()
            );

            for (k, component) in sm.params().iter().enumerate() {
                estimates.weight[[k, dim, channel]] = component.mixture_weight;
                estimates.mean[[k, dim, channel]] = component.mixture_means[0] * 2.0 * PI;
                estimates.scale[[k, dim, channel]] = component.mixture_scales[0];
            }
        }
    }
    Ok(estimates)
}

/// A component selected by [`rank_components`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedComponent {
    /// Normalized aggregate weight.
    pub weight: f64,
    /// Angular spectral mean per input dimension.
    pub mean: Array1<f64>,
    /// Spectral scale per input dimension.
    pub scale: Array1<f64>,
}

/// The `Q` strongest (channel, component) pairs of `estimates`, strongest
/// first.
///
/// For component `k` of channel `c` the aggregate weight is the mean of
/// `weight[k, :, c]`, divided by `Σ weight[k, :, :]` when both are nonzero.
/// Pairs are written to a `Q · output_dims` table at
/// `indexing.slot(c, k, Q)`; unwritten slots stay zero. The table is sorted
/// by weight (stable, ascending) and read from the top.
pub fn rank_components(estimates: &SmEstimates, indexing: ComponentIndexing) -> Vec<RankedComponent> {
    let (q_total, input_dims, output_dims) = estimates.weight.dim();
    let slots = q_total * output_dims;
    let mut weight = vec![0.0; slots];
    let mut mean = Array2::<f64>::zeros((slots, input_dims));
    let mut scale = Array2::<f64>::zeros((slots, input_dims));

    for channel in 0..output_dims {
        for k in 0..q_total {
            let mut w = estimates.weight.slice(s![k, .., channel]).mean().unwrap_or(0.0);
            let total = estimates.weight.slice(s![k, .., ..]).sum();
            if w != 0.0 && total != 0.0 {
                w /= total;
            }
            let slot = indexing.slot(channel, k, q_total);
            weight[slot] = w;
            mean.row_mut(slot).assign(&estimates.mean.slice(s![k, .., channel]));
            scale.row_mut(slot).assign(&estimates.scale.slice(s![k, .., channel]));
        }
    }

    let mut order: Vec<usize> = (0..slots).collect();
    order.sort_by(|&a, &b| weight[a].total_cmp(&weight[b]));
    order
        .into_iter()
        .rev()
        .take(q_total)
        .map(|slot| RankedComponent {
            weight: weight[slot],
            mean: mean.row(slot).to_owned(),
            scale: scale.row(slot).to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{errors::DataResult, estimation::SpectralPeaks},
        models::{
            options::SmInit,
            training::{NoTraining, TrainOptions, Trainables},
        },
    };
    use approx::assert_relative_eq;
    use ndarray::{Array, array};
    use rand::{SeedableRng, rngs::StdRng};

    // ---- Scope ----
    // Estimate aggregation over channels / input dims and the ranking table.

    /// Peaks at 0.1 · (q + 1) with amplitude q + 1, for any channel count.
    struct LadderPeaks;

    impl SpectralEstimator for LadderPeaks {
        fn lomb_scargle(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
            let d = data.input_dims();
            let means = Array2::from_shape_fn((d, q), |(_, k)| 0.1 * (k + 1) as f64);
            let amps = Array2::from_shape_fn((d, q), |(_, k)| (k + 1) as f64);
            let m = data.output_dims();
            Ok(SpectralPeaks::new(vec![means; m], vec![amps; m]))
        }

        fn bnse(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
            self.lomb_scargle(data, q)
        }
    }

    fn two_input_data() -> Data {
        let t = Array::linspace(0.0, 5.0, 12);
        let x = ndarray::stack![ndarray::Axis(1), t, t.mapv(|v| v * 2.0)];
        let mut data = Data::new();
        data.add(x.clone(), t.mapv(f64::sin), Some("a")).unwrap();
        data.add(x, t.mapv(f64::cos), Some("b")).unwrap();
        data.add(
            array![[0.0, 0.0], [1.0, 1.5], [2.0, 2.5]],
            array![1.0, 0.0, -1.0],
            Some("c"),
        )
        .unwrap();
        data
    }

    #[test]
    // Purpose
    // -------
    // Estimate arrays cover every (component, input dim, channel) triple.
    //
    // Given
    // -----
    // - 3 channels, 2 input dims, Q = 2, BNSE init, maxiter = 0.
    //
    // Expect
    // ------
    // - All arrays shaped (2, 2, 3); means equal 2π · peak location.
    fn estimates_have_expected_shape_and_angular_means() {
        let data = two_input_data();
        let opts = SmFitOptions { maxiter: 0, ..SmFitOptions::default() };
        let mut rng = StdRng::seed_from_u64(1);

        let est =
            estimate_from_sm_with_rng(&data, 2, &opts, &LadderPeaks, &mut NoTraining, &mut rng)
                .unwrap();

        assert_eq!(est.weight.dim(), (2, 2, 3));
        assert_eq!(est.mean.dim(), (2, 2, 3));
        assert_eq!(est.scale.dim(), (2, 2, 3));
        assert_eq!((est.q(), est.input_dims(), est.output_dims()), (2, 2, 3));
        assert_relative_eq!(est.mean[[1, 1, 2]], 0.2 * 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn trainer_skipped_when_maxiter_is_zero_and_used_otherwise() {
        let data = two_input_data();
        let mut calls = 0usize;
        let mut counting = |model: &SMModel, opts: &TrainOptions| -> ModelResult<Trainables> {
            calls += 1;
            assert_eq!(opts.method, "BFGS");
            let mut out = Trainables::new();
            let q = model.params().len();
            out.insert("SM/kern/mixture_scales".into(), Array2::from_elem((1, q), 4.0).into_dyn());
            Ok(out)
        };

        let skip = SmFitOptions { maxiter: 0, ..SmFitOptions::default() };
        estimate_from_sm(&data, 2, &skip, &LadderPeaks, &mut counting).unwrap();
        let train = SmFitOptions { maxiter: 5, ..SmFitOptions::default() };
        let est = estimate_from_sm(&data, 2, &train, &LadderPeaks, &mut counting).unwrap();

        assert_eq!(calls, 6);
        assert!(est.scale.iter().all(|s| *s == 4.0));
    }

    #[test]
    fn trainer_errors_propagate() {
        let data = two_input_data();
        let mut failing = |_: &SMModel, _: &TrainOptions| -> ModelResult<Trainables> {
            Err(ModelError::TrainingFailed { status: "diverged".to_string() })
        };
        let opts = SmFitOptions { init: SmInit::LombScargle, ..SmFitOptions::default() };

        let err = estimate_from_sm(&data, 1, &opts, &LadderPeaks, &mut failing).unwrap_err();

        assert_eq!(err, ModelError::TrainingFailed { status: "diverged".to_string() });
    }

    fn ranked_fixture() -> SmEstimates {
        // Q = 2, one input dim, two channels.
        let mut est = SmEstimates::zeros(2, 1, 2);
        est.weight.assign(&array![[[1.0, 3.0]], [[2.0, 2.0]]]);
        est.mean.assign(&array![[[10.0, 30.0]], [[20.0, 21.0]]]);
        est.scale.assign(&array![[[0.1, 0.3]], [[0.2, 0.21]]]);
        est
    }

    #[test]
    // Purpose
    // -------
    // Channel-major ranking keeps the Q strongest normalized weights.
    //
    // Given
    // -----
    // - Component 0 weights (1, 3) over channels, component 1 weights (2, 2).
    //
    // Expect
    // ------
    // - Normalized weights 0.25, 0.75, 0.5, 0.5; the top two are channel 1
    //   component 0 (0.75) then the later of the tied 0.5 slots.
    fn channel_major_ranking_keeps_strongest() {
        let ranked = rank_components(&ranked_fixture(), ComponentIndexing::ChannelMajor);

        assert_eq!(ranked.len(), 2);
        assert_relative_eq!(ranked[0].weight, 0.75);
        assert_eq!(ranked[0].mean, array![30.0]);
        assert_relative_eq!(ranked[1].weight, 0.5);
        assert_eq!(ranked[1].mean, array![21.0]);
        assert!(ranked[0].weight >= ranked[1].weight);
    }

    #[test]
    // Purpose
    // -------
    // The legacy layout lets later channels overwrite earlier slots.
    //
    // Given
    // -----
    // - Same fixture; legacy slots are (c=0,k=0)->0, (0,1)->1, (1,0)->0,
    //   (1,1)->2, leaving slot 3 empty.
    //
    // Expect
    // ------
    // - Table weights [0.75, 0.5, 0.5, 0]; top two are slot 0 then slot 2.
    fn legacy_ranking_overwrites_colliding_slots() {
        let ranked = rank_components(&ranked_fixture(), ComponentIndexing::Legacy);

        assert_relative_eq!(ranked[0].weight, 0.75);
        assert_eq!(ranked[0].scale, array![0.3]);
        assert_eq!(ranked[1].mean, array![21.0]);
    }
}
