//! Integration tests for spectral parameter initialization.
//!
//! Purpose
//! -------
//! - Validate the end-to-end initialization pipelines: from a multi-channel
//!   `Data` set, through per-channel single-output fits, to the component
//!   records of every multi-output model.
//! - Pin the observable contracts: shapes, 2π conversions, ranking order,
//!   and the "no peaks found" path.
//!
//! Coverage
//! --------
//! - `models::aggregate`: `estimate_from_sm` shapes and trainer hand-off.
//! - `models::{mosm, csm, sm_lmc, cg}`: `init_params` for every model, with
//!   both component slot layouts.
//! - `models::sm`: output-count check and the zero-amplitude no-op.
//! - `models::loader`: reload of an initialized model through a store.
//!
//! Exclusions
//! ----------
//! - Real periodogram estimators and GP training; both are replaced by
//!   deterministic stubs here.
//! - Python bindings.
use approx::assert_relative_eq;
use ndarray::{Array, Array1, Array2, array};
use rand::{SeedableRng, rngs::StdRng};
use spectral_mogp::{
    data::{Data, DataResult, SpectralEstimator, SpectralPeaks},
    models::{
        ArtifactStore, CGModel, CSMModel, ComponentIndexing, MOSMModel, ModelArtifact, ModelError,
        ModelKind, ModelParams, ModelResult, MosmMode, NoTraining, SMLMCModel, SMModel,
        SmFitOptions, SmInit, SpectralModel, TrainOptions, Trainables, estimate_from_sm, load,
        rank_components,
    },
};
use std::f64::consts::PI;

/// Peaks at `0.1 · (channel + 1) · (k + 1)` with unit amplitude; every
/// estimator method returns the same table.
struct ChannelPeaks;

impl SpectralEstimator for ChannelPeaks {
    fn lomb_scargle(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
        let d = data.input_dims();
        let means = (0..data.output_dims())
            .map(|c| Array2::from_shape_fn((d, q), |(_, k)| 0.1 * ((c + 1) * (k + 1)) as f64))
            .collect();
        Ok(SpectralPeaks::new(means, vec![Array2::ones((d, q)); data.output_dims()]))
    }

    fn bnse(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
        self.lomb_scargle(data, q)
    }
}

/// An estimator that never finds a peak.
struct NoPeaks;

impl SpectralEstimator for NoPeaks {
    fn lomb_scargle(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
        let d = data.input_dims();
        let zeros = vec![Array2::zeros((d, q)); data.output_dims()];
        Ok(SpectralPeaks::new(zeros.clone(), zeros))
    }

    fn bnse(&self, data: &Data, q: usize) -> DataResult<SpectralPeaks> {
        self.lomb_scargle(data, q)
    }
}

/// Two channels "0" and "1" of 50 points on [0, 10].
fn two_channels() -> Data {
    let t = Array::linspace(0.0, 10.0, 50);
    let mut data = Data::new();
    data.add_1d(t.clone(), t.mapv(|v: f64| (1.3 * v).sin()), Some("0")).unwrap();
    data.add_1d(t.clone(), t.mapv(|v: f64| (0.4 * v).cos()), Some("1")).unwrap();
    data
}

/// Trainer stub: for the single-input fit on channel `c` it reports
/// `weights[c]`, means equal to those weights and scales
/// `10 · (c + 1) + k`.
fn scripted_trainer(
    weights: Vec<Array1<f64>>,
) -> impl FnMut(&SMModel, &TrainOptions) -> ModelResult<Trainables> {
    move |model: &SMModel, _opts: &TrainOptions| {
        let channel: usize = model.data().channel_names()[0]
            .parse()
            .map_err(|_| ModelError::TrainingFailed { status: "unnamed channel".to_string() })?;
        let q = model.q();
        let w = weights[channel].clone();
        let mut out = Trainables::new();
        out.insert("SM/kern/mixture_means".into(), w.clone().insert_axis(ndarray::Axis(1)).into_dyn());
        out.insert("SM/kern/mixture_weights".into(), w.into_dyn());
        out.insert(
            "SM/kern/mixture_scales".into(),
            Array2::from_shape_fn((1, q), |(_, k)| 10.0 * (channel + 1) as f64 + k as f64).into_dyn(),
        );
        Ok(out)
    }
}

fn train_opts() -> SmFitOptions {
    SmFitOptions::new(SmInit::Bnse, "BFGS", 100, ComponentIndexing::ChannelMajor).unwrap()
}

#[test]
// Purpose
// -------
// MOSM `means` mode maps BNSE peaks to angular frequencies.
//
// Given
// -----
// - Two channels of 50 points, Q = 2.
//
// Expect
// ------
// - Each component mean is 1 × 2 and equals 2π · 0.1 · (c + 1) · (q + 1).
fn mosm_means_mode_sets_angular_peak_frequencies() {
    let mut model =
        MOSMModel::with_rng(two_channels(), 2, "MOSM", &mut StdRng::seed_from_u64(11)).unwrap();

    model.init_params(MosmMode::Means, &SmFitOptions::default(), &ChannelPeaks, &mut NoTraining)
        .unwrap();

    for (q, component) in model.params().iter().enumerate() {
        assert_eq!(component.mean.dim(), (1, 2));
        for c in 0..2 {
            let expected = 2.0 * PI * 0.1 * ((c + 1) * (q + 1)) as f64;
            assert_relative_eq!(component.mean[[0, c]], expected, epsilon = 1e-12);
        }
    }
}

#[test]
// Purpose
// -------
// `estimate_from_sm` covers every channel / input pair and forwards the
// trainer's output.
//
// Given
// -----
// - Two channels, Q = 2, scripted trainer.
//
// Expect
// ------
// - Arrays shaped (2, 1, 2); means are 2π · trained means; scales match.
fn estimates_follow_trainer_output() {
    let mut trainer = scripted_trainer(vec![array![4.0, 1.0], array![1.0, 3.0]]);

    let est = estimate_from_sm(&two_channels(), 2, &train_opts(), &ChannelPeaks, &mut trainer)
        .unwrap();

    assert_eq!(est.weight.dim(), (2, 1, 2));
    assert_eq!(est.weight[[1, 0, 1]], 3.0);
    assert_relative_eq!(est.mean[[0, 0, 0]], 2.0 * PI * 4.0, epsilon = 1e-12);
    assert_eq!(est.scale[[1, 0, 1]], 21.0);
}

#[test]
// Purpose
// -------
// CG variances are the estimated SM scales, component by component.
//
// Given
// -----
// - Scripted scales 10 · (c + 1) + q.
//
// Expect
// ------
// - Component q variance is [[10 + q, 20 + q]].
fn cg_variance_equals_sm_scales() {
    let mut model = CGModel::with_rng(two_channels(), 2, "CG", &mut StdRng::seed_from_u64(1)).unwrap();
    let mut trainer = scripted_trainer(vec![array![1.0, 1.0], array![1.0, 1.0]]);

    model.init_params(&train_opts(), &ChannelPeaks, &mut trainer).unwrap();

    assert_eq!(model.params()[0].variance, array![[10.0, 20.0]]);
    assert_eq!(model.params()[1].variance, array![[11.0, 21.0]]);
}

#[test]
// Purpose
// -------
// CSM / SM-LMC keep the strongest normalized components, strongest first.
//
// Given
// -----
// - Weights: channel 0 (4, 1), channel 1 (1, 3); channel-major slots.
// - Normalized: (0,0) 0.8, (0,1) 0.25, (1,0) 0.2, (1,1) 0.75.
//
// Expect
// ------
// - Component 0 takes channel 0 / q 0 (mean 2π · 4, scale 10).
// - Component 1 takes channel 1 / q 1 (mean 2π · 3, scale 21).
fn csm_and_sm_lmc_rank_components_descending() {
    let weights = vec![array![4.0, 1.0], array![1.0, 3.0]];
    let mut csm =
        CSMModel::with_rng(two_channels(), 2, 1, "CSM", &mut StdRng::seed_from_u64(2)).unwrap();
    let mut lmc =
        SMLMCModel::with_rng(two_channels(), 2, 1, "SM-LMC", &mut StdRng::seed_from_u64(3)).unwrap();

    csm.init_params(&train_opts(), &ChannelPeaks, &mut scripted_trainer(weights.clone())).unwrap();
    lmc.init_params(&train_opts(), &ChannelPeaks, &mut scripted_trainer(weights)).unwrap();

    assert_relative_eq!(csm.params()[0].mean[0], 2.0 * PI * 4.0, epsilon = 1e-12);
    assert_eq!(csm.params()[0].variance, array![10.0]);
    assert_relative_eq!(csm.params()[1].mean[0], 2.0 * PI * 3.0, epsilon = 1e-12);
    assert_eq!(csm.params()[1].variance, array![21.0]);
    assert_eq!(lmc.params()[0].mean, csm.params()[0].mean);
    assert_eq!(lmc.params()[1].variance, csm.params()[1].variance);
}

#[test]
// Purpose
// -------
// Default options keep the legacy slot layout `channel · q + q`, where a
// later channel can overwrite an earlier one's slot.
//
// Given
// -----
// - Same weights as above with `SmFitOptions::default()` (legacy slots).
// - Slots: 0 <- (0,0) 0.8 then (1,0) 0.2; 1 <- (0,1) 0.25; 2 <- (1,1) 0.75.
//
// Expect
// ------
// - Ranked weights are [0.75, 0.25]: non-increasing, and the overwritten
//   0.8 component is gone.
// - CSM component 0 is channel 1 / q 1 (mean 2π · 3, scale 21), component 1
//   is channel 0 / q 1 (mean 2π · 1, scale 11).
fn csm_default_indexing_lets_channel_one_overwrite_slot_zero() {
    let weights = vec![array![4.0, 1.0], array![1.0, 3.0]];
    let opts = SmFitOptions::default();
    assert_eq!(opts.indexing, ComponentIndexing::Legacy);

    let est = estimate_from_sm(
        &two_channels(),
        2,
        &opts,
        &ChannelPeaks,
        &mut scripted_trainer(weights.clone()),
    )
    .unwrap();
    let ranked = rank_components(&est, ComponentIndexing::Legacy);

    assert_eq!(ranked.len(), 2);
    assert_relative_eq!(ranked[0].weight, 0.75, epsilon = 1e-12);
    assert_relative_eq!(ranked[1].weight, 0.25, epsilon = 1e-12);
    assert!(ranked.windows(2).all(|w| w[0].weight >= w[1].weight));
    assert!(ranked.iter().all(|r| (r.weight - 0.8).abs() > 1e-9));

    let mut csm =
        CSMModel::with_rng(two_channels(), 2, 1, "CSM", &mut StdRng::seed_from_u64(2)).unwrap();
    csm.init_params(&opts, &ChannelPeaks, &mut scripted_trainer(weights)).unwrap();

    assert_relative_eq!(csm.params()[0].mean[0], 2.0 * PI * 3.0, epsilon = 1e-12);
    assert_eq!(csm.params()[0].variance, array![21.0]);
    assert_relative_eq!(csm.params()[1].mean[0], 2.0 * PI * 1.0, epsilon = 1e-12);
    assert_eq!(csm.params()[1].variance, array![11.0]);
}

#[test]
fn mosm_full_mode_uses_trained_estimates() {
    let mut model =
        MOSMModel::with_rng(two_channels(), 2, "MOSM", &mut StdRng::seed_from_u64(5)).unwrap();
    let mut trainer = scripted_trainer(vec![array![4.0, 1.0], array![1.0, 3.0]]);

    model.init_params(MosmMode::Full, &train_opts(), &ChannelPeaks, &mut trainer).unwrap();

    let second = &model.params()[1];
    assert_eq!(second.magnitude, array![1.0, 3.0]);
    assert_relative_eq!(second.mean[[0, 1]], 2.0 * PI * 3.0, epsilon = 1e-12);
    assert_eq!(second.variance, array![[11.0, 21.0]]);
    assert_eq!(model.kernel().len(), 2);
}

#[test]
fn sm_rejects_multi_channel_data() {
    let err = SMModel::new(two_channels(), 1, "SM").unwrap_err();

    assert_eq!(err, ModelError::InvalidOutputDims { expected: 1, actual: 2 });
}

#[test]
// Purpose
// -------
// When the estimator finds nothing, SM init keeps its parameters.
//
// Given
// -----
// - An estimator whose amplitudes are all zero; both LS and BNSE.
//
// Expect
// ------
// - Ok(()) and unchanged components.
fn sm_without_peaks_keeps_parameters() {
    let data = two_channels().single_input(0, 0).unwrap();
    let mut model = SMModel::with_rng(data, 3, "SM", &mut StdRng::seed_from_u64(8)).unwrap();
    let before = model.params().to_vec();

    model.init_params(SmInit::LombScargle, &NoPeaks).unwrap();
    model.init_params(SmInit::Bnse, &NoPeaks).unwrap();

    assert_eq!(model.params(), before.as_slice());
}

struct SingleArtifact(ModelArtifact);

impl ArtifactStore for SingleArtifact {
    fn fetch(&self, filename: &str) -> ModelResult<ModelArtifact> {
        if filename == "cg.mogptk" {
            Ok(self.0.clone())
        } else {
            Err(ModelError::ArtifactNotFound { name: filename.to_string() })
        }
    }
}

#[test]
fn initialized_model_reloads_from_store() {
    let mut model = CGModel::with_rng(two_channels(), 2, "CG", &mut StdRng::seed_from_u64(1)).unwrap();
    let mut trainer = scripted_trainer(vec![array![1.0, 1.0], array![1.0, 1.0]]);
    model.init_params(&train_opts(), &ChannelPeaks, &mut trainer).unwrap();
    let store = SingleArtifact(ModelArtifact {
        kind_tag: ModelKind::CG.tag().to_string(),
        name: model.name().to_string(),
        data: model.data().clone(),
        q: model.q(),
        params: ModelParams::CG(model.params().to_vec()),
        fixed_params: Default::default(),
    });

    let loaded = load(&store, "cg").unwrap();

    assert_eq!(loaded.kind(), ModelKind::CG);
    assert_eq!(loaded.params(), ModelParams::CG(model.params().to_vec()));
    assert_eq!(loaded.kernel(), model.kernel());
}
