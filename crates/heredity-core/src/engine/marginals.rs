//! # Marginal Accumulation
//!
//! Folds weighted hypotheses into per-person unnormalized marginals, then
//! normalizes them once enumeration is complete.
//!
//! The pipeline is linear: create empty, [`MarginalAccumulator::add`] once per
//! hypothesis, [`MarginalAccumulator::normalize`] once. Partial accumulators
//! built over disjoint parts of the hypothesis space combine with
//! [`MarginalAccumulator::merge`], an elementwise sum.

use crate::engine::errors::{Distribution, InferenceError};
use crate::engine::hypothesis::{Hypothesis, PersonSet};
use crate::engine::model::GeneCount;
use crate::engine::numeric_kernels::{normalized, normalized_ln, ProbabilitySum, Summation};
use crate::engine::pedigree::{PedigreeGraph, PersonId};

/// Unnormalized per-person gene and trait mass.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalAccumulator {
    summation: Summation,
    /// `[person][gene]`
    gene: Vec<[ProbabilitySum; 3]>,
    /// `[person][has_trait as usize]`
    traits: Vec<[ProbabilitySum; 2]>,
    total: ProbabilitySum,
    hypotheses: u64,
    zero_hypotheses: u64,
}

impl MarginalAccumulator {
    /// Zeroed buckets for `persons` people.
    pub fn new(persons: usize, summation: Summation) -> Self {
        Self {
            summation,
            gene: vec![[ProbabilitySum::ZERO; 3]; persons],
            traits: vec![[ProbabilitySum::ZERO; 2]; persons],
            total: ProbabilitySum::ZERO,
            hypotheses: 0,
            zero_hypotheses: 0,
        }
    }

    pub fn for_pedigree(pedigree: &PedigreeGraph, summation: Summation) -> Self {
        Self::new(pedigree.len(), summation)
    }

    /// Adds `probability` to each person's bucket for their hypothesized
    /// gene count and trait value.
    pub fn add(&mut self, hypothesis: &Hypothesis, probability: f64) {
        if self.summation == Summation::LogDomain {
            return self.add_ln(hypothesis, probability.ln());
        }
        if !self.count(hypothesis, probability == 0.0) {
            return;
        }
        let summation = self.summation;
        self.total.add(probability, summation);
        for (idx, (gene, traits)) in self.gene.iter_mut().zip(&mut self.traits).enumerate() {
            let id = PersonId(idx as u32);
            gene[hypothesis.gene_count(id).index()].add(probability, summation);
            traits[usize::from(hypothesis.has_trait(id))].add(probability, summation);
        }
    }

    /// Like [`Self::add`], with the probability given as its natural log.
    ///
    /// Linear strategies exponentiate first, so only
    /// [`Summation::LogDomain`] keeps joints below `f64::MIN_POSITIVE`.
    pub fn add_ln(&mut self, hypothesis: &Hypothesis, ln_probability: f64) {
        if self.summation != Summation::LogDomain {
            return self.add(hypothesis, ln_probability.exp());
        }
        if !self.count(hypothesis, ln_probability == f64::NEG_INFINITY) {
            return;
        }
        self.total.add_ln(ln_probability);
        for (idx, (gene, traits)) in self.gene.iter_mut().zip(&mut self.traits).enumerate() {
            let id = PersonId(idx as u32);
            gene[hypothesis.gene_count(id).index()].add_ln(ln_probability);
            traits[usize::from(hypothesis.has_trait(id))].add_ln(ln_probability);
        }
    }

    /// Records one hypothesis; returns whether it carries mass.
    fn count(&mut self, hypothesis: &Hypothesis, is_zero: bool) -> bool {
        debug_assert!(
            hypothesis.is_well_formed(PersonSet::first(self.gene.len())),
            "hypothesis outside the accumulator's population: {hypothesis:?}"
        );
        self.hypotheses += 1;
        if is_zero {
            self.zero_hypotheses += 1;
        }
        !is_zero
    }

    /// Elementwise sum with a partial accumulator over a disjoint part of the space.
    pub fn merge(&mut self, other: &MarginalAccumulator) -> Result<(), InferenceError> {
        if other.gene.len() != self.gene.len() {
            return Err(InferenceError::Internal(format!(
                "cannot merge accumulators over {} and {} people",
                self.gene.len(),
                other.gene.len()
            )));
        }
        let summation = self.summation;
        for (mine, theirs) in self.gene.iter_mut().zip(&other.gene) {
            for (bucket, partial) in mine.iter_mut().zip(theirs) {
                bucket.merge(partial, summation);
            }
        }
        for (mine, theirs) in self.traits.iter_mut().zip(&other.traits) {
            for (bucket, partial) in mine.iter_mut().zip(theirs) {
                bucket.merge(partial, summation);
            }
        }
        self.total.merge(&other.total, summation);
        self.hypotheses += other.hypotheses;
        self.zero_hypotheses += other.zero_hypotheses;
        Ok(())
    }

    /// Number of people tracked.
    pub fn persons(&self) -> usize {
        self.gene.len()
    }

    /// Hypotheses folded in so far.
    pub fn hypotheses(&self) -> u64 {
        self.hypotheses
    }

    /// Hypotheses folded in with probability exactly zero.
    pub fn zero_hypotheses(&self) -> u64 {
        self.zero_hypotheses
    }

    /// Summation strategy of every bucket.
    pub fn summation(&self) -> Summation {
        self.summation
    }

    /// Sum of all probabilities folded in: the probability of the evidence.
    pub fn total_mass(&self) -> f64 {
        self.total.value()
    }

    /// Natural log of [`Self::total_mass`], exact even where the linear total underflows.
    pub fn log_total_mass(&self) -> f64 {
        self.total.ln_value()
    }

    /// Unnormalized gene mass of `id`, indexed by [`GeneCount::index`].
    pub fn gene_mass(&self, id: PersonId) -> Option<[f64; 3]> {
        self.gene
            .get(id.index())
            .map(|buckets| buckets.map(|b| b.value()))
    }

    /// Unnormalized trait mass of `id`, indexed by `has_trait as usize`.
    pub fn trait_mass(&self, id: PersonId) -> Option<[f64; 2]> {
        self.traits
            .get(id.index())
            .map(|buckets| buckets.map(|b| b.value()))
    }

    /// Divides every person's two distributions by their own totals.
    ///
    /// Fails with [`InferenceError::IndeterminateEvidence`] when a total is
    /// exactly zero, i.e. the evidence has zero probability under the model.
    /// Log-domain buckets are compared by their logs, so only a genuinely
    /// empty distribution fails.
    pub fn normalize(&self, pedigree: &PedigreeGraph) -> Result<Marginals, InferenceError> {
        if pedigree.len() != self.persons() {
            return Err(InferenceError::Internal(format!(
                "accumulator tracks {} people but pedigree has {}",
                self.persons(),
                pedigree.len()
            )));
        }

        let mut persons = Vec::with_capacity(pedigree.len());
        for person in pedigree.persons() {
            let indeterminate = |distribution| InferenceError::IndeterminateEvidence {
                person: person.name.to_string(),
                distribution,
            };
            let gene = self.gene[person.id.index()];
            let traits = self.traits[person.id.index()];
            let (gene, traits) = match self.summation {
                Summation::LogDomain => (
                    normalized_ln(gene.map(|b| b.ln_value())),
                    normalized_ln(traits.map(|b| b.ln_value())),
                ),
                _ => (
                    normalized(gene.map(|b| b.value())),
                    normalized(traits.map(|b| b.value())),
                ),
            };
            let [zero, one, two] = gene.ok_or_else(|| indeterminate(Distribution::Gene))?;
            let [absent, present] = traits.ok_or_else(|| indeterminate(Distribution::Trait))?;
            persons.push(PersonMarginal {
                name: person.name.to_string(),
                gene: GeneDistribution { zero, one, two },
                trait_: TraitDistribution { present, absent },
            });
        }

        tracing::trace!(persons = persons.len(), "normalized marginals");
        Ok(Marginals { persons })
    }
}

/// Posterior distribution over gene copies.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneDistribution {
    pub zero: f64,
    pub one: f64,
    pub two: f64,
}

impl GeneDistribution {
    pub fn probability(&self, gene: GeneCount) -> f64 {
        match gene {
            GeneCount::Zero => self.zero,
            GeneCount::One => self.one,
            GeneCount::Two => self.two,
        }
    }

    pub fn total(&self) -> f64 {
        self.zero + self.one + self.two
    }
}

/// Posterior distribution over trait presence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitDistribution {
    pub present: f64,
    pub absent: f64,
}

impl TraitDistribution {
    pub fn probability(&self, has_trait: bool) -> f64 {
        if has_trait {
            self.present
        } else {
            self.absent
        }
    }

    pub fn total(&self) -> f64 {
        self.present + self.absent
    }
}

/// Normalized marginals of one person.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonMarginal {
    pub name: String,
    pub gene: GeneDistribution,
    #[cfg_attr(feature = "serde", serde(rename = "trait"))]
    pub trait_: TraitDistribution,
}

/// Normalized marginals for every person, in pedigree id order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marginals {
    persons: Vec<PersonMarginal>,
}

impl Marginals {
    pub fn get(&self, name: &str) -> Option<&PersonMarginal> {
        self.persons.iter().find(|p| p.name == name)
    }

    pub fn by_id(&self, id: PersonId) -> Option<&PersonMarginal> {
        self.persons.get(id.index())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersonMarginal> {
        self.persons.iter()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

impl<'a> IntoIterator for &'a Marginals {
    type Item = &'a PersonMarginal;
    type IntoIter = std::slice::Iter<'a, PersonMarginal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
