//! kernels — spectral-mixture heuristics and kernel descriptions.
//!
//! - [`sm_init`] draws random spectral-mixture parameters from input extent
//!   and spacing.
//! - [`KernelSpec`] / [`KernelSum`] describe the kernels a model asks its GP
//!   backend to build.
pub mod sm_init;
pub mod spec;

pub use self::sm_init::{SpectralMixtureDraw, output_std, sm_init};
pub use self::spec::{KernelSpec, KernelSum};
