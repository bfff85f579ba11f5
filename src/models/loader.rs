//! Reconstruct persisted models.
//!
//! Purpose
//! -------
//! A persisted model is a tagged artifact: type tag, name, dataset, `Q`,
//! component parameters and fixed-parameter names. The byte format belongs
//! to the storage backend behind [`ArtifactStore`]; this module dispatches on
//! the tag and rebuilds the matching model variant.
//!
//! Key behaviors
//! -------------
//! - [`load`] appends the `.mogptk` extension when missing.
//! - Tags map onto [`ModelKind`]; unknown tags fail with
//!   `UnknownModelType`.
//! - The stored parameters must belong to the tagged kind and hold exactly
//!   `Q` component records, each shaped for the stored dataset (`d` input
//!   dimensions, `m` channels, `Rq = 1`). They then replace the
//!   reconstructed defaults, as do the fixed-parameter names.
//!
//! Downstream usage
//! ----------------
//! - [`Model`] is the closed set of loaded models; match on it or use the
//!   [`SpectralModel`] view from [`Model::as_spectral`].
use crate::{
    data::dataset::Data,
    kernels::spec::KernelSum,
    models::{
        base::{ModelBase, ModelKind, SpectralModel},
        cg::{CGComponent, CGModel},
        csm::{CSMComponent, CSMModel},
        errors::{ModelError, ModelResult},
        mosm::{MOSMComponent, MOSMModel},
        sm::{SMComponent, SMModel},
        sm_lmc::{SMLMCComponent, SMLMCModel},
    },
};
use std::collections::BTreeSet;

/// File extension of persisted models.
pub const ARTIFACT_EXTENSION: &str = ".mogptk";

/// Component records of one model kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelParams {
    SM(Vec<SMComponent>),
    MOSM(Vec<MOSMComponent>),
    CG(Vec<CGComponent>),
    CSM(Vec<CSMComponent>),
    SMLMC(Vec<SMLMCComponent>),
}

impl ModelParams {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelParams::SM(_) => ModelKind::SM,
            ModelParams::MOSM(_) => ModelKind::MOSM,
            ModelParams::CG(_) => ModelKind::CG,
            ModelParams::CSM(_) => ModelKind::CSM,
            ModelParams::SMLMC(_) => ModelKind::SMLMC,
        }
    }

    /// Number of component records.
    pub fn len(&self) -> usize {
        match self {
            ModelParams::SM(p) => p.len(),
            ModelParams::MOSM(p) => p.len(),
            ModelParams::CG(p) => p.len(),
            ModelParams::CSM(p) => p.len(),
            ModelParams::SMLMC(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a persisted model carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    /// Type tag, e.g. `"SM"` or `"MOGP"`.
    pub kind_tag: String,
    pub name: String,
    pub data: Data,
    pub q: usize,
    pub params: ModelParams,
    pub fixed_params: BTreeSet<String>,
}

/// Storage backend for persisted models.
pub trait ArtifactStore {
    /// Fetch the artifact saved under `filename`.
    ///
    /// Implementations return `ModelError::ArtifactNotFound` when nothing is
    /// stored there.
    fn fetch(&self, filename: &str) -> ModelResult<ModelArtifact>;
}

/// A loaded model of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    SM(SMModel),
    MOSM(MOSMModel),
    CG(CGModel),
    CSM(CSMModel),
    SMLMC(SMLMCModel),
}

impl Model {
    pub fn as_spectral(&self) -> &dyn SpectralModel {
        match self {
            Model::SM(m) => m,
            Model::MOSM(m) => m,
            Model::CG(m) => m,
            Model::CSM(m) => m,
            Model::SMLMC(m) => m,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.as_spectral().kind()
    }

    pub fn base(&self) -> &ModelBase {
        self.as_spectral().base()
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn q(&self) -> usize {
        self.base().q
    }

    pub fn kernel(&self) -> KernelSum {
        self.as_spectral().kernel()
    }

    /// Snapshot of the component records.
    pub fn params(&self) -> ModelParams {
        match self {
            Model::SM(m) => ModelParams::SM(m.params.clone()),
            Model::MOSM(m) => ModelParams::MOSM(m.params.clone()),
            Model::CG(m) => ModelParams::CG(m.params.clone()),
            Model::CSM(m) => ModelParams::CSM(m.params.clone()),
            Model::SMLMC(m) => ModelParams::SMLMC(m.params.clone()),
        }
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        match self {
            Model::SM(m) => &mut m.base,
            Model::MOSM(m) => &mut m.base,
            Model::CG(m) => &mut m.base,
            Model::CSM(m) => &mut m.base,
            Model::SMLMC(m) => &mut m.base,
        }
    }
}

/// Load the model persisted under `filename` from `store`.
///
/// Errors
/// ------
/// - `ModelError::UnknownModelType` for an unrecognized tag.
/// - `ModelError::ParamKindMismatch` when the stored parameters belong to
///   another kind.
/// - `ModelError::ComponentCountMismatch` when the number of component
///   records differs from `Q`.
/// - `ModelError::ParamShapeMismatch` naming the first record field whose
///   shape does not fit the stored dataset.
/// - Store and constructor errors (e.g. `InvalidOutputDims` for an SM
///   artifact with several channels).
pub fn load(store: &dyn ArtifactStore, filename: &str) -> ModelResult<Model> {
    let filename = if filename.ends_with(ARTIFACT_EXTENSION) {
        filename.to_string()
    } else {
        format!("{filename}{ARTIFACT_EXTENSION}")
    };
    let ModelArtifact { kind_tag, name, data, q, params, fixed_params } = store.fetch(&filename)?;

    let kind: ModelKind = kind_tag.parse()?;
    if params.len() != q {
        return Err(ModelError::ComponentCountMismatch { expected: q, actual: params.len() });
    }
    let mismatch = ModelError::ParamKindMismatch { expected: kind.tag(), found: params.kind().tag() };

    let (d, m) = (data.input_dims(), data.output_dims());

    let mut model = match (kind, params) {
        (ModelKind::SM, ModelParams::SM(p)) => {
            let mut model = SMModel::new(data, q, &name)?;
            for c in &p {
                c.check_shape(d)?;
            }
            model.params = p;
            Model::SM(model)
        }
        (ModelKind::MOSM, ModelParams::MOSM(p)) => {
            let mut model = MOSMModel::new(data, q, &name)?;
            for c in &p {
                c.check_shape(d, m)?;
            }
            model.params = p;
            Model::MOSM(model)
        }
        (ModelKind::CG, ModelParams::CG(p)) => {
            let mut model = CGModel::new(data, q, &name)?;
            for c in &p {
                c.check_shape(d, m)?;
            }
            model.params = p;
            Model::CG(model)
        }
        (ModelKind::CSM, ModelParams::CSM(p)) => {
            let mut model = CSMModel::new(data, q, 1, &name)?;
            for c in &p {
                c.check_shape(d, m, model.rq)?;
            }
            model.params = p;
            Model::CSM(model)
        }
        (ModelKind::SMLMC, ModelParams::SMLMC(p)) => {
            let mut model = SMLMCModel::new(data, q, 1, &name)?;
            for c in &p {
                c.check_shape(d, m, model.rq)?;
            }
            model.params = p;
            Model::SMLMC(model)
        }
        _ => return Err(mismatch),
    };
    model.base_mut().fixed_params = fixed_params;
    Ok(model)
}
