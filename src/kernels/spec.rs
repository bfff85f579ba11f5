//! Kernel descriptions handed to the kernel-construction backend.
//!
//! Models do not evaluate covariances themselves. Instead each model turns
//! its component parameters into a [`KernelSum`]: an additive composition of
//! [`KernelSpec`] terms, one per spectral component (or a single
//! spectral-mixture term for the single-output model). A GP backend maps
//! each variant onto its own kernel constructor.
use ndarray::{Array1, Array2};
use std::ops::AddAssign;

/// One kernel term, parameterized by the arrays a model assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelSpec {
    /// Single-output spectral mixture with `q` components.
    ///
    /// `weights`: `Q`; `means`: `Q × d`; `scales`: `d × Q`.
    SpectralMixture {
        q: usize,
        input_dims: usize,
        weights: Array1<f64>,
        means: Array2<f64>,
        scales: Array2<f64>,
    },
    /// Multi-output spectral mixture (one component).
    MultiOutputSpectralMixture {
        input_dims: usize,
        output_dims: usize,
        magnitude: Array1<f64>,
        mean: Array2<f64>,
        variance: Array2<f64>,
        delay: Array2<f64>,
        phase: Array1<f64>,
        noise: Array1<f64>,
    },
    /// Cross-spectral mixture (one component, `rq` latent functions).
    CrossSpectralMixture {
        input_dims: usize,
        output_dims: usize,
        rq: usize,
        constant: Array2<f64>,
        mean: Array1<f64>,
        variance: Array1<f64>,
        phase: Array2<f64>,
    },
    /// Spectral-mixture linear model of coregionalization (one component).
    SpectralMixtureLMC {
        input_dims: usize,
        output_dims: usize,
        rq: usize,
        constant: Array2<f64>,
        mean: Array1<f64>,
        variance: Array1<f64>,
    },
    /// Convolutional Gaussian (one component).
    ConvolutionalGaussian {
        input_dims: usize,
        output_dims: usize,
        constant: Array1<f64>,
        variance: Array2<f64>,
    },
}

impl KernelSpec {
    /// Backend-facing kernel name.
    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::SpectralMixture { .. } => "SpectralMixture",
            KernelSpec::MultiOutputSpectralMixture { .. } => "MultiOutputSpectralMixture",
            KernelSpec::CrossSpectralMixture { .. } => "CrossSpectralMixture",
            KernelSpec::SpectralMixtureLMC { .. } => "SpectralMixtureLMC",
            KernelSpec::ConvolutionalGaussian { .. } => "ConvolutionalGaussian",
        }
    }
}

/// Additive composition of kernel terms, in component order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KernelSum {
    terms: Vec<KernelSpec>,
}

impl KernelSum {
    pub fn terms(&self) -> &[KernelSpec] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<KernelSpec> for KernelSum {
    fn from(term: KernelSpec) -> Self {
        KernelSum { terms: vec![term] }
    }
}

impl AddAssign<KernelSpec> for KernelSum {
    fn add_assign(&mut self, term: KernelSpec) {
        self.terms.push(term);
    }
}

impl FromIterator<KernelSpec> for KernelSum {
    fn from_iter<I: IntoIterator<Item = KernelSpec>>(iter: I) -> Self {
        KernelSum { terms: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn terms_accumulate_in_order() {
        let cg = |c: f64| KernelSpec::ConvolutionalGaussian {
            input_dims: 1,
            output_dims: 1,
            constant: array![c],
            variance: array![[1.0]],
        };
        let mut sum = KernelSum::from(cg(1.0));
        sum += cg(2.0);

        assert_eq!(sum.len(), 2);
        assert_eq!(sum.terms()[1], cg(2.0));
        assert_eq!(sum.terms()[0].name(), "ConvolutionalGaussian");
    }
}
