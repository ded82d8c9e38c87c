//! # Hypothesis Enumeration
//!
//! Lazily produces every hypothesis consistent with the evidence.
//!
//! ## Algorithm
//!
//! - **Gene assignments**: each index `k` in `0..3^n` is read as `n` base-3
//!   digits; digit `i` is person `i`'s copy count. This walks every pair of
//!   disjoint (one-copy, two-copy) sets exactly once.
//! - **Trait subsets**: observed people are pruned up front. Only the `u`
//!   people with unknown trait vary, so each gene assignment is paired with
//!   the `2^u` submasks of the unknown set, OR-ed with the observed-present set.
//!
//! Nothing is materialized; peak memory is constant. The gene index range can
//! be split into contiguous partitions for parallel workers.
//!
//! Enumeration is exponential (`3^n * 2^u` hypotheses) and intended for
//! pedigrees of tens of people.

use std::ops::Range;

use crate::engine::evidence::Evidence;
use crate::engine::hypothesis::{Hypothesis, PersonSet};
use crate::engine::pedigree::PedigreeGraph;

/// Enumerates every hypothesis over `pedigree` that agrees with `evidence`.
///
/// The returned iterator is a pure function of its inputs; calling this again
/// restarts the sequence.
pub fn enumerate(pedigree: &PedigreeGraph, evidence: &Evidence) -> Hypotheses {
    HypothesisSpace::new(pedigree, evidence).iter()
}

/// The evidence-pruned hypothesis space of one pedigree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HypothesisSpace {
    persons: u32,
    /// People whose trait varies across hypotheses.
    unknown: PersonSet,
    /// People fixed to have the trait.
    present: PersonSet,
}

impl HypothesisSpace {
    pub fn new(pedigree: &PedigreeGraph, evidence: &Evidence) -> Self {
        let population = PersonSet::first(pedigree.len());
        let observed = evidence.observed().intersection(population);
        Self {
            persons: pedigree.len() as u32,
            unknown: population.difference(observed),
            present: evidence.present().intersection(population),
        }
    }

    /// Number of people.
    pub fn persons(&self) -> usize {
        self.persons as usize
    }

    /// People whose trait is not fixed by evidence.
    pub fn unknown_traits(&self) -> PersonSet {
        self.unknown
    }

    /// `3^n`: the number of gene assignments.
    pub fn gene_assignments(&self) -> u64 {
        3u64.pow(self.persons)
    }

    /// `2^u`: the number of trait subsets paired with each gene assignment.
    pub fn trait_subsets(&self) -> u64 {
        1u64 << self.unknown.len()
    }

    /// Total number of hypotheses produced by [`HypothesisSpace::iter`].
    pub fn len(&self) -> u128 {
        u128::from(self.gene_assignments()) * u128::from(self.trait_subsets())
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every hypothesis in the space.
    pub fn iter(&self) -> Hypotheses {
        self.iter_range(0..self.gene_assignments())
    }

    /// Hypotheses whose gene assignment index falls in `genes`.
    pub fn iter_range(&self, genes: Range<u64>) -> Hypotheses {
        let end = genes.end.min(self.gene_assignments());
        Hypotheses {
            persons: self.persons,
            unknown: self.unknown,
            present: self.present,
            genes: genes.start.min(end)..end,
            current: None,
            traits: TraitSubsets::exhausted(),
        }
    }

    /// Splits the gene assignment range into at most `parts` contiguous,
    /// non-empty ranges of near-equal size, in ascending order.
    pub fn partitions(&self, parts: usize) -> Vec<Range<u64>> {
        partition_range(self.gene_assignments(), parts)
    }
}

fn partition_range(total: u64, parts: usize) -> Vec<Range<u64>> {
    let parts = (parts.max(1) as u64).min(total.max(1));
    let base = total / parts;
    let extra = total % parts;
    let mut ranges = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for part in 0..parts {
        let size = base + u64::from(part < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Reads `index` as base-3 digits, one per person.
fn decode_gene_assignment(mut index: u64, persons: u32) -> (PersonSet, PersonSet) {
    let mut one_gene = 0u64;
    let mut two_genes = 0u64;
    for person in 0..persons {
        match index % 3 {
            1 => one_gene |= 1 << person,
            2 => two_genes |= 1 << person,
            _ => {}
        }
        index /= 3;
    }
    (PersonSet(one_gene), PersonSet(two_genes))
}

/// Submasks of a mask in ascending numeric order, starting with the empty set.
#[derive(Debug, Clone, Copy)]
struct TraitSubsets {
    mask: u64,
    next: Option<u64>,
}

impl TraitSubsets {
    fn new(mask: PersonSet) -> Self {
        Self {
            mask: mask.0,
            next: Some(0),
        }
    }

    fn exhausted() -> Self {
        Self {
            mask: 0,
            next: None,
        }
    }
}

impl Iterator for TraitSubsets {
    type Item = PersonSet;

    fn next(&mut self) -> Option<PersonSet> {
        let current = self.next?;
        let following = current.wrapping_sub(self.mask) & self.mask;
        self.next = (following != 0).then_some(following);
        Some(PersonSet(current))
    }
}

/// Lazy iterator over a (sub)range of a [`HypothesisSpace`].
#[derive(Debug, Clone)]
pub struct Hypotheses {
    persons: u32,
    unknown: PersonSet,
    present: PersonSet,
    genes: Range<u64>,
    current: Option<(PersonSet, PersonSet)>,
    traits: TraitSubsets,
}

impl Iterator for Hypotheses {
    type Item = Hypothesis;

    fn next(&mut self) -> Option<Hypothesis> {
        loop {
            if let Some((one_gene, two_genes)) = self.current {
                if let Some(free) = self.traits.next() {
                    return Some(Hypothesis {
                        one_gene,
                        two_genes,
                        has_trait: free.union(self.present),
                    });
                }
            }
            let index = self.genes.next()?;
            self.current = Some(decode_gene_assignment(index, self.persons));
            self.traits = TraitSubsets::new(self.unknown);
        }
    }
}
