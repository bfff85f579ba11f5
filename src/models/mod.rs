//! models — spectral GP models and their parameter initialization.
//!
//! Purpose
//! -------
//! Define the five spectral kernel models (SM, MOSM, CSM, SM-LMC, CG), their
//! component records, and the heuristics that seed those records before
//! gradient-based training. Multi-output models are seeded from independent
//! single-output SM fits per channel and input dimension.
//!
//! Key behaviors
//! -------------
//! - Constructors validate the dataset and `Q`, and draw randomized
//!   defaults (`new` uses the thread-local RNG, `with_rng` a caller RNG).
//! - `init_params` overwrites the records in place; spectral peaks come from
//!   a caller-supplied [`SpectralEstimator`](crate::data::SpectralEstimator)
//!   and training from a [`Trainer`].
//! - Every model describes its kernel as a
//!   [`KernelSum`](crate::kernels::KernelSum).
//! - [`load`] rebuilds a persisted model from an [`ArtifactStore`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Angular frequencies (× 2π) are used for multi-output spectral means;
//!   single-output SM means stay in cycles per input unit.
//! - Models own their [`Data`](crate::data::Data); callers clone to share.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each model; `tests/` runs the end-to-end
//!   initialization pipelines with stub estimators and trainers.
pub mod aggregate;
pub mod base;
pub mod cg;
pub mod csm;
pub mod errors;
pub mod loader;
pub mod mosm;
pub mod options;
pub mod sm;
pub mod sm_lmc;
pub mod training;

pub use self::aggregate::{
    RankedComponent, SmEstimates, estimate_from_sm, estimate_from_sm_with_rng, rank_components,
};
pub use self::base::{ModelBase, ModelKind, SpectralModel};
pub use self::cg::{CGComponent, CGModel};
pub use self::csm::{CSMComponent, CSMModel};
pub use self::errors::{ModelError, ModelResult};
pub use self::loader::{ArtifactStore, Model, ModelArtifact, ModelParams, load};
pub use self::mosm::{MOSMComponent, MOSMModel, RbfApproach};
pub use self::options::{ComponentIndexing, MosmMode, SmFitOptions, SmInit};
pub use self::sm::{SMComponent, SMModel};
pub use self::sm_lmc::{SMLMCComponent, SMLMCModel};
pub use self::training::{NoTraining, TrainOptions, Trainables, Trainer, kernel_param_name};
