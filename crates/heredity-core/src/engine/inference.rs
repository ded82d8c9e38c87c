//! Exact posterior inference over a pedigree.
//!
//! [`infer`] is the engine's entrypoint: validate the model, enumerate every
//! evidence-consistent hypothesis, weight each by its joint probability, fold
//! the weights into per-person marginals and normalize. It performs no I/O.
//!
//! A linear run whose total mass underflows to zero is repeated with
//! [`Summation::LogDomain`]; only evidence that is impossible in the log
//! domain too is reported as [`InferenceError::IndeterminateEvidence`].

use crate::engine::enumerate::HypothesisSpace;
use crate::engine::errors::{InferenceError, ModelTable};
use crate::engine::evidence::Evidence;
use crate::engine::joint::JointProbabilityCalculator;
use crate::engine::marginals::{MarginalAccumulator, Marginals};
use crate::engine::model::InheritanceModel;
use crate::engine::numeric_kernels::Summation;
use crate::engine::parallel_enumeration::{self, PartitionStats, DEFAULT_PARTITIONS};
use crate::engine::pedigree::PedigreeGraph;

/// How the hypothesis space is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionMode {
    /// One pass over the whole space on the calling thread.
    Sequential,
    /// Partitions accumulated concurrently on the rayon pool.
    #[cfg(feature = "parallel")]
    Parallel,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        #[cfg(feature = "parallel")]
        {
            ExecutionMode::Parallel
        }
        #[cfg(not(feature = "parallel"))]
        {
            ExecutionMode::Sequential
        }
    }
}

/// Execution options for one inference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InferenceOptions {
    pub execution: ExecutionMode,
    pub summation: Summation,
    /// Number of gene-index partitions for [`ExecutionMode::Parallel`]. Must
    /// be > 0. Sequential runs enumerate in one pass and ignore it.
    pub partitions: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::default(),
            summation: Summation::default(),
            partitions: DEFAULT_PARTITIONS,
        }
    }
}

impl InferenceOptions {
    /// Single-threaded options.
    pub fn sequential() -> Self {
        Self {
            execution: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    fn validate(self) -> Result<Self, InferenceError> {
        if self.partitions == 0 {
            return Err(InferenceError::invalid_config(
                ModelTable::Options,
                "partitions must be > 0",
            ));
        }
        Ok(self)
    }
}

/// Runtime diagnostics emitted by one inference run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceDiagnostics {
    /// Number of people in the pedigree.
    pub persons: usize,
    /// People whose trait was not fixed by evidence.
    pub unknown_traits: usize,
    /// Hypotheses enumerated and evaluated.
    pub hypotheses_evaluated: u64,
    /// Hypotheses whose joint probability was exactly zero.
    pub zero_probability_hypotheses: u64,
    /// Partitions the space was split into (1 for sequential runs).
    pub partitions: usize,
    /// Strategy the marginals were accumulated with. `LogDomain` when a linear
    /// run underflowed and was recomputed.
    pub summation: Summation,
    /// Total unnormalized mass: the probability of the evidence under the model.
    /// Zero when it underflows `f64`.
    pub evidence_probability: f64,
    /// Natural log of the evidence probability.
    pub log_evidence_probability: f64,
}

/// Computes every person's posterior gene and trait marginals with default options.
///
/// # Example
///
/// ```rust
/// use heredity_core::{infer, parse_and_build, Evidence, InheritanceModel};
///
/// let pedigree = parse_and_build("name,mother,father,trait\nSolo,,,1\n").unwrap();
/// let evidence = Evidence::from_pedigree(&pedigree);
/// let marginals = infer(&pedigree, &evidence, &InheritanceModel::default()).unwrap();
/// let solo = marginals.get("Solo").unwrap();
/// assert!((solo.gene.one - 0.5106).abs() < 1e-4);
/// assert_eq!(solo.trait_.present, 1.0);
/// ```
pub fn infer(
    pedigree: &PedigreeGraph,
    evidence: &Evidence,
    model: &InheritanceModel,
) -> Result<Marginals, InferenceError> {
    infer_with_options(pedigree, evidence, model, InferenceOptions::default())
        .map(|(marginals, _)| marginals)
}

/// Computes marginals with explicit options and returns run diagnostics.
pub fn infer_with_options(
    pedigree: &PedigreeGraph,
    evidence: &Evidence,
    model: &InheritanceModel,
    options: InferenceOptions,
) -> Result<(Marginals, InferenceDiagnostics), InferenceError> {
    let model = model.validate()?;
    let options = options.validate()?;

    let span = tracing::debug_span!(
        "infer",
        persons = pedigree.len(),
        observed = evidence.len(),
        execution = ?options.execution
    );
    let _enter = span.enter();

    let space = HypothesisSpace::new(pedigree, evidence);
    tracing::debug!(
        gene_assignments = space.gene_assignments(),
        trait_subsets = space.trait_subsets(),
        "enumerating hypothesis space"
    );

    let calculator = JointProbabilityCalculator::new(pedigree, &model);
    tracing::trace!(factors = calculator.factor_count(), "tabulated model");

    let (mut accumulator, mut stats) =
        accumulate(&space, &calculator, options, options.summation)?;
    if accumulator.total_mass() == 0.0 && options.summation != Summation::LogDomain {
        // Every joint may have underflowed rather than being impossible.
        let (log_accumulator, log_stats) =
            accumulate(&space, &calculator, options, Summation::LogDomain)?;
        if log_accumulator.log_total_mass() > f64::NEG_INFINITY {
            tracing::warn!(
                log_evidence_probability = log_accumulator.log_total_mass(),
                "evidence probability underflows f64; recomputed in the log domain"
            );
            accumulator = log_accumulator;
            stats = log_stats;
        }
    }

    let diagnostics = InferenceDiagnostics {
        persons: pedigree.len(),
        unknown_traits: space.unknown_traits().len(),
        hypotheses_evaluated: stats.hypotheses,
        zero_probability_hypotheses: accumulator.zero_hypotheses(),
        partitions: stats.partitions,
        summation: accumulator.summation(),
        evidence_probability: accumulator.total_mass(),
        log_evidence_probability: accumulator.log_total_mass(),
    };
    tracing::debug!(
        hypotheses = diagnostics.hypotheses_evaluated,
        zero = diagnostics.zero_probability_hypotheses,
        log_evidence_probability = diagnostics.log_evidence_probability,
        "enumeration complete"
    );

    let marginals = accumulator.normalize(pedigree)?;
    Ok((marginals, diagnostics))
}

fn accumulate(
    space: &HypothesisSpace,
    calculator: &JointProbabilityCalculator,
    options: InferenceOptions,
    summation: Summation,
) -> Result<(MarginalAccumulator, PartitionStats), InferenceError> {
    match options.execution {
        ExecutionMode::Sequential => {
            let accumulator = parallel_enumeration::accumulate_range(
                space,
                calculator,
                0..space.gene_assignments(),
                summation,
            );
            let stats = PartitionStats {
                partitions: 1,
                hypotheses: accumulator.hypotheses(),
            };
            Ok((accumulator, stats))
        }
        #[cfg(feature = "parallel")]
        ExecutionMode::Parallel => parallel_enumeration::accumulate_parallel(
            space,
            calculator,
            summation,
            options.partitions,
        ),
    }
}
