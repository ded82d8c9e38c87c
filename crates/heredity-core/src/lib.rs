//! # Heredity Core
//!
//! Exact inference of gene copies and trait presence over a family pedigree.

pub mod engine;

// Re-export commonly used types
pub use engine::errors::{Distribution, InferenceError, ModelTable};
pub use engine::evidence::Evidence;
pub use engine::inference::{
    infer, infer_with_options, ExecutionMode, InferenceDiagnostics, InferenceOptions,
};
pub use engine::marginals::{GeneDistribution, Marginals, PersonMarginal, TraitDistribution};
pub use engine::model::{GeneCount, GenePrior, InheritanceModel, TraitGivenGene, TraitLikelihood};
pub use engine::numeric_kernels::Summation;
pub use engine::pedigree::{PedigreeGraph, PersonId, MAX_INDIVIDUALS};

/// Parse, validate and index a pedigree file.
///
/// This is a convenience function that combines parsing, validation and graph
/// construction, converting frontend errors to core errors.
pub fn parse_and_build(source: &str) -> Result<PedigreeGraph, InferenceError> {
    let ast = heredity_frontend::parse_pedigree(source)?;
    heredity_frontend::validate_pedigree(&ast)?;
    PedigreeGraph::from_records(&ast.records)
}
