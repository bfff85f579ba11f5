//! Initialization options for spectral GP models.
//!
//! - [`SmInit`]: heuristic used to seed a single-output spectral mixture.
//! - [`MosmMode`]: which MOSM parameters are initialized.
//! - [`ComponentIndexing`]: slot layout used when ranking per-channel
//!   components for CSM / SM-LMC.
//! - [`SmFitOptions`]: configuration of the per-channel single-output fits
//!   behind every multi-output `init_params`.
//!
//! Parsing: the enums implement `FromStr` and accept case-insensitive names.
//! Unknown names return a [`ModelError`] describing the valid choices.
use crate::models::{
    errors::{ModelError, ModelResult},
    training::TrainOptions,
};
use std::str::FromStr;

/// Heuristic used to seed single-output spectral-mixture parameters.
///
/// Variants:
/// - `Random`: closed-form draw from input extent and spacing.
/// - `LombScargle`: strongest Lomb–Scargle periodogram peaks (`"LS"`).
/// - `Bnse`: strongest BNSE posterior PSD peaks (`"BNSE"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmInit {
    Random,
    LombScargle,
    Bnse,
}

impl SmInit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmInit::Random => "random",
            SmInit::LombScargle => "LS",
            SmInit::Bnse => "BNSE",
        }
    }
}

impl FromStr for SmInit {
    type Err = ModelError;

    /// Accepts `"random"`, `"LS"` and `"BNSE"` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(SmInit::Random),
            "ls" => Ok(SmInit::LombScargle),
            "bnse" => Ok(SmInit::Bnse),
            _ => Err(ModelError::InvalidInitMethod { name: s.to_string() }),
        }
    }
}

/// MOSM initialization mode.
///
/// - `Full`: spectral means, variances and magnitudes from per-channel
///   single-output fits.
/// - `Means`: spectral means only, straight from BNSE peaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosmMode {
    Full,
    Means,
}

impl FromStr for MosmMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(MosmMode::Full),
            "means" => Ok(MosmMode::Means),
            _ => Err(ModelError::InvalidMode { name: s.to_string() }),
        }
    }
}

/// Slot layout of the flattened `(Q · output_dims)` ranking table.
///
/// - `Legacy`: slot `channel * q + q`. Reproduces reference outputs
///   bit-for-bit, but every channel writes component 0 to slot 0 and other
///   (channel, q) pairs can collide, so later channels overwrite earlier
///   ones.
/// - `ChannelMajor`: slot `channel * Q + q`; every pair gets its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentIndexing {
    #[default]
    Legacy,
    ChannelMajor,
}

impl ComponentIndexing {
    /// Table slot for component `q` of `channel`, with `q_total` components.
    pub fn slot(&self, channel: usize, q: usize, q_total: usize) -> usize {
        match self {
            ComponentIndexing::Legacy => channel * q + q,
            ComponentIndexing::ChannelMajor => channel * q_total + q,
        }
    }
}

/// Configuration of the per-channel single-output fits.
///
/// Fields:
/// - `init: SmInit` — heuristic for each single-output model.
/// - `method: String` — optimizer method name forwarded to the trainer.
/// - `maxiter: usize` — optimizer iteration cap; `0` skips training.
/// - `indexing: ComponentIndexing` — ranking-table layout (CSM / SM-LMC).
///
/// Default:
/// - `init`: `Bnse`
/// - `method`: `"BFGS"`
/// - `maxiter`: `2000`
/// - `indexing`: `Legacy`
#[derive(Debug, Clone, PartialEq)]
pub struct SmFitOptions {
    pub init: SmInit,
    pub method: String,
    pub maxiter: usize,
    pub indexing: ComponentIndexing,
}

impl SmFitOptions {
    /// Build validated fit options.
    ///
    /// # Errors
    /// - [`ModelError::EmptyMethod`] if `method` is blank.
    pub fn new(
        init: SmInit, method: &str, maxiter: usize, indexing: ComponentIndexing,
    ) -> ModelResult<Self> {
        if method.trim().is_empty() {
            return Err(ModelError::EmptyMethod);
        }
        Ok(Self { init, method: method.to_string(), maxiter, indexing })
    }

    /// Trainer-facing view of these options.
    pub fn train_options(&self) -> TrainOptions {
        TrainOptions { method: self.method.clone(), maxiter: self.maxiter }
    }
}

impl Default for SmFitOptions {
    fn default() -> Self {
        Self {
            init: SmInit::Bnse,
            method: "BFGS".to_string(),
            maxiter: 2000,
            indexing: ComponentIndexing::Legacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sm_init_parses_case_insensitively() {
        assert_eq!("BNSE".parse::<SmInit>().unwrap(), SmInit::Bnse);
        assert_eq!("ls".parse::<SmInit>().unwrap(), SmInit::LombScargle);
        assert_eq!("Random".parse::<SmInit>().unwrap(), SmInit::Random);
        assert_eq!(
            "periodogram".parse::<SmInit>().unwrap_err(),
            ModelError::InvalidInitMethod { name: "periodogram".to_string() }
        );
    }

    #[test]
    fn mosm_mode_rejects_unknown_names() {
        assert_eq!("means".parse::<MosmMode>().unwrap(), MosmMode::Means);
        assert_eq!(
            "partial".parse::<MosmMode>().unwrap_err(),
            ModelError::InvalidMode { name: "partial".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Pin down both slot layouts.
    //
    // Given
    // -----
    // - Q = 3, channels 0..2.
    //
    // Expect
    // ------
    // - Legacy: q = 0 maps to slot 0 for every channel; (1, 1) -> 2.
    // - ChannelMajor: (c, q) -> 3c + q, all distinct.
    fn component_indexing_slots() {
        let legacy = ComponentIndexing::Legacy;
        let major = ComponentIndexing::ChannelMajor;

        assert_eq!(legacy.slot(0, 0, 3), 0);
        assert_eq!(legacy.slot(1, 0, 3), 0);
        assert_eq!(legacy.slot(1, 1, 3), 2);
        assert_eq!(legacy.slot(1, 2, 3), 4);
        assert_eq!(major.slot(1, 0, 3), 3);
        assert_eq!(major.slot(1, 2, 3), 5);
    }

    #[test]
    fn fit_options_validate_method() {
        let opts = SmFitOptions::default();
        assert_eq!(opts.init, SmInit::Bnse);
        assert_eq!(opts.train_options().maxiter, 2000);

        let err = SmFitOptions::new(SmInit::LombScargle, "  ", 10, ComponentIndexing::Legacy)
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyMethod);
    }
}
