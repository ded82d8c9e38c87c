//! Partitioned and parallel hypothesis accumulation.
//!
//! Every hypothesis contributes independently to the marginals, so the
//! gene-assignment index range is split into contiguous partitions, each
//! enumerated into a private [`MarginalAccumulator`].
//!
//! ## Architecture
//!
//! - **Partitioning**: `0..3^n` split into near-equal contiguous ranges
//! - **Parallel accumulation**: each partition folds into its own accumulator
//! - **Deterministic reduction**: partials are collected in partition order
//!   and merged left to right, so results do not depend on scheduling
//!
//! The partition count is a fixed number rather than a function of the thread
//! pool size, so output is identical on every machine.
//!
//! ## Feature gating
//!
//! Parallel accumulation is behind the `parallel` feature flag. Sequential
//! runs fold the whole range with a single [`accumulate_range`] call, so the
//! partition count only matters when `parallel` is enabled.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::ops::Range;

use crate::engine::enumerate::HypothesisSpace;
#[cfg(any(feature = "parallel", test))]
use crate::engine::errors::InferenceError;
use crate::engine::joint::JointProbabilityCalculator;
use crate::engine::marginals::MarginalAccumulator;
use crate::engine::numeric_kernels::Summation;

/// Partition count used when the caller does not choose one.
pub const DEFAULT_PARTITIONS: usize = 64;

/// Statistics about partitioned accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Number of partitions actually used
    pub partitions: usize,
    /// Number of hypotheses evaluated across all partitions
    pub hypotheses: u64,
}

/// Enumerates the hypotheses whose gene index falls in `genes` and folds
/// their joint probabilities into a fresh accumulator.
pub fn accumulate_range(
    space: &HypothesisSpace,
    calculator: &JointProbabilityCalculator,
    genes: Range<u64>,
    summation: Summation,
) -> MarginalAccumulator {
    let mut accumulator = MarginalAccumulator::new(space.persons(), summation);
    for hypothesis in space.iter_range(genes) {
        match summation {
            Summation::LogDomain => {
                let ln_probability = calculator.log_joint_probability(&hypothesis);
                accumulator.add_ln(&hypothesis, ln_probability);
            }
            Summation::Naive | Summation::Compensated => {
                let probability = calculator.joint_probability(&hypothesis);
                accumulator.add(&hypothesis, probability);
            }
        }
    }
    accumulator
}

/// Accumulates partitions concurrently on the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn accumulate_parallel(
    space: &HypothesisSpace,
    calculator: &JointProbabilityCalculator,
    summation: Summation,
    partitions: usize,
) -> Result<(MarginalAccumulator, PartitionStats), InferenceError> {
    let partials: Vec<_> = space
        .partitions(partitions)
        .into_par_iter()
        .map(|range| accumulate_range(space, calculator, range, summation))
        .collect();
    merge_in_order(space, summation, partials)
}

#[cfg(any(feature = "parallel", test))]
fn merge_in_order(
    space: &HypothesisSpace,
    summation: Summation,
    partials: Vec<MarginalAccumulator>,
) -> Result<(MarginalAccumulator, PartitionStats), InferenceError> {
    let stats = PartitionStats {
        partitions: partials.len(),
        hypotheses: partials.iter().map(|p| p.hypotheses()).sum(),
    };
    let mut merged = MarginalAccumulator::new(space.persons(), summation);
    for partial in &partials {
        merged.merge(partial)?;
    }
    tracing::debug!(
        partitions = stats.partitions,
        hypotheses = stats.hypotheses,
        "merged partial accumulators"
    );
    Ok((merged, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evidence::Evidence;
    use crate::engine::model::InheritanceModel;
    use crate::engine::numeric_kernels::KERNEL_EQUIVALENCE_EPSILON;
    use crate::engine::pedigree::{PedigreeGraph, PersonId};
    use heredity_frontend::PersonRecord;

    /// Partition by partition on the calling thread; the reference for the
    /// parallel path.
    fn accumulate_partitioned(
        space: &HypothesisSpace,
        calculator: &JointProbabilityCalculator,
        summation: Summation,
        partitions: usize,
    ) -> Result<(MarginalAccumulator, PartitionStats), InferenceError> {
        let partials = space
            .partitions(partitions)
            .into_iter()
            .map(|range| accumulate_range(space, calculator, range, summation))
            .collect();
        merge_in_order(space, summation, partials)
    }

    fn family() -> PedigreeGraph {
        PedigreeGraph::from_records(&[
            PersonRecord::new("Arthur").observed(false),
            PersonRecord::new("Molly").observed(false),
            PersonRecord::new("Fred")
                .with_parents("Molly", "Arthur")
                .observed(true),
            PersonRecord::new("Ginny").with_parents("Molly", "Arthur"),
        ])
        .unwrap()
    }

    fn assert_close(lhs: &MarginalAccumulator, rhs: &MarginalAccumulator, persons: usize) {
        for idx in 0..persons {
            let id = PersonId(idx as u32);
            let (a, b) = (lhs.gene_mass(id).unwrap(), rhs.gene_mass(id).unwrap());
            for (x, y) in a.iter().zip(&b) {
                assert!((x - y).abs() <= KERNEL_EQUIVALENCE_EPSILON, "{x} vs {y}");
            }
            let (a, b) = (lhs.trait_mass(id).unwrap(), rhs.trait_mass(id).unwrap());
            for (x, y) in a.iter().zip(&b) {
                assert!((x - y).abs() <= KERNEL_EQUIVALENCE_EPSILON, "{x} vs {y}");
            }
        }
    }

    #[test]
    fn partitioned_matches_single_pass() {
        let graph = family();
        let evidence = Evidence::from_pedigree(&graph);
        let space = HypothesisSpace::new(&graph, &evidence);
        let calc = JointProbabilityCalculator::new(&graph, &InheritanceModel::default());

        let whole = accumulate_range(
            &space,
            &calc,
            0..space.gene_assignments(),
            Summation::Compensated,
        );
        for parts in [1, 3, DEFAULT_PARTITIONS] {
            let (merged, stats) =
                accumulate_partitioned(&space, &calc, Summation::Compensated, parts).unwrap();
            assert_eq!(stats.hypotheses, whole.hypotheses());
            assert_eq!(merged.hypotheses() as u128, space.len());
            assert_close(&merged, &whole, graph.len());
        }
    }

    #[test]
    fn single_partition_is_bit_identical_to_single_pass() {
        let graph = family();
        let evidence = Evidence::from_pedigree(&graph);
        let space = HypothesisSpace::new(&graph, &evidence);
        let calc = JointProbabilityCalculator::new(&graph, &InheritanceModel::default());

        let whole =
            accumulate_range(&space, &calc, 0..space.gene_assignments(), Summation::Naive);
        let (merged, stats) = accumulate_partitioned(&space, &calc, Summation::Naive, 1).unwrap();
        assert_eq!(stats.partitions, 1);
        for idx in 0..graph.len() {
            let id = PersonId(idx as u32);
            assert_eq!(merged.gene_mass(id), whole.gene_mass(id));
            assert_eq!(merged.trait_mass(id), whole.trait_mass(id));
        }
    }

    #[test]
    fn log_domain_partitions_match_linear_single_pass() {
        let graph = family();
        let evidence = Evidence::from_pedigree(&graph);
        let space = HypothesisSpace::new(&graph, &evidence);
        let calc = JointProbabilityCalculator::new(&graph, &InheritanceModel::default());

        let linear = accumulate_range(
            &space,
            &calc,
            0..space.gene_assignments(),
            Summation::Compensated,
        );
        let (log, stats) = accumulate_partitioned(&space, &calc, Summation::LogDomain, 5).unwrap();
        assert_eq!(stats.hypotheses, linear.hypotheses());
        assert!((log.log_total_mass() - linear.total_mass().ln()).abs() < 1e-12);
        for idx in 0..graph.len() {
            let id = PersonId(idx as u32);
            let (a, b) = (log.gene_mass(id).unwrap(), linear.gene_mass(id).unwrap());
            for (x, y) in a.iter().zip(&b) {
                assert!((x - y).abs() <= 1e-12 * y.max(1e-300), "{x} vs {y}");
            }
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_is_deterministic_and_matches_partitioned() {
        let graph = family();
        let evidence = Evidence::from_pedigree(&graph);
        let space = HypothesisSpace::new(&graph, &evidence);
        let calc = JointProbabilityCalculator::new(&graph, &InheritanceModel::default());

        let (sequential, _) =
            accumulate_partitioned(&space, &calc, Summation::Compensated, 8).unwrap();
        let (first, stats) =
            accumulate_parallel(&space, &calc, Summation::Compensated, 8).unwrap();
        assert_eq!(stats.partitions, 8);
        assert_eq!(first, sequential);
        for _ in 0..5 {
            let (next, _) =
                accumulate_parallel(&space, &calc, Summation::Compensated, 8).unwrap();
            assert_eq!(next, first);
        }
    }
}
