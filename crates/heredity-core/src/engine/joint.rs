//! # Joint Probability
//!
//! Computes the probability of one complete hypothesis under an
//! [`InheritanceModel`].
//!
//! ## Model
//!
//! Each person contributes one factor and the joint is their product:
//!
//! - **Root** (no listed parents): `prior[g] * P(trait = t | g)`
//! - **Child**: `P(g | mother's g, father's g) * P(trait = t | g)`
//!
//! A parent passes on an active allele with probability
//!
//! | parent copies | P(transmit active) |
//! |---|---|
//! | 0 | `mutation_rate` |
//! | 1 | `0.5` |
//! | 2 | `1 - mutation_rate` |
//!
//! Mutation is applied only to homozygous parents; a heterozygous parent
//! transmits either allele with probability exactly one half. With
//! `pt(x)` the transmit-active probability and `pn(x) = 1 - pt(x)`:
//!
//! ```text
//! P(child = 0) = pn(mother) * pn(father)
//! P(child = 1) = pt(mother) * pn(father) + pn(mother) * pt(father)
//! P(child = 2) = pt(mother) * pt(father)
//! ```
//!
//! Parents' copy counts are fixed by the hypothesis, so each factor depends
//! only on values already in the hypothesis; marginalizing over parents
//! happens in the outer enumeration, never here.

use crate::engine::hypothesis::Hypothesis;
use crate::engine::model::{GeneCount, InheritanceModel};
use crate::engine::pedigree::{Parents, PedigreeGraph, PersonId};

/// Probability that a parent with `parent` copies passes on an active allele.
#[inline]
pub fn transmit_probability(model: &InheritanceModel, parent: GeneCount) -> f64 {
    match parent {
        GeneCount::Zero => model.mutation_rate,
        GeneCount::One => 0.5,
        GeneCount::Two => 1.0 - model.mutation_rate,
    }
}

/// Distribution of a child's copy count given both parents' copy counts,
/// indexed by [`GeneCount::index`].
pub fn inheritance_distribution(
    model: &InheritanceModel,
    mother: GeneCount,
    father: GeneCount,
) -> [f64; 3] {
    let mother_active = transmit_probability(model, mother);
    let father_active = transmit_probability(model, father);
    let mother_inactive = 1.0 - mother_active;
    let father_inactive = 1.0 - father_active;
    [
        mother_inactive * father_inactive,
        mother_active * father_inactive + mother_inactive * father_active,
        mother_active * father_active,
    ]
}

/// Joint probability of `hypothesis`.
///
/// Convenience wrapper that builds a [`JointProbabilityCalculator`] for a
/// single call. `model` is expected to have passed
/// [`InheritanceModel::validate`].
pub fn joint_probability(
    pedigree: &PedigreeGraph,
    hypothesis: &Hypothesis,
    model: &InheritanceModel,
) -> f64 {
    JointProbabilityCalculator::new(pedigree, model).joint_probability(hypothesis)
}

#[derive(Debug, Clone, Copy)]
struct Factor {
    person: PersonId,
    parents: Option<Parents>,
}

/// Evaluates hypotheses against precomputed model tables.
///
/// Construction flattens the pedigree into one factor per person and
/// tabulates the prior, the trait likelihood and the 3x3x3 inheritance table,
/// so each evaluation is a product of table lookups.
#[derive(Debug, Clone)]
pub struct JointProbabilityCalculator {
    factors: Vec<Factor>,
    prior: [f64; 3],
    /// `[gene][has_trait as usize]`
    trait_likelihood: [[f64; 2]; 3],
    /// `[mother][father][child]`
    inheritance: [[[f64; 3]; 3]; 3],
}

impl JointProbabilityCalculator {
    pub fn new(pedigree: &PedigreeGraph, model: &InheritanceModel) -> Self {
        let factors = pedigree
            .persons()
            .iter()
            .map(|p| Factor {
                person: p.id,
                parents: p.parents,
            })
            .collect();

        let mut trait_likelihood = [[0.0; 2]; 3];
        let mut inheritance = [[[0.0; 3]; 3]; 3];
        for gene in GeneCount::ALL {
            let row = model.trait_given_gene.row(gene);
            trait_likelihood[gene.index()] = [row.absent, row.present];
            for father in GeneCount::ALL {
                inheritance[gene.index()][father.index()] =
                    inheritance_distribution(model, gene, father);
            }
        }

        Self {
            factors,
            prior: model.gene_prior.to_array(),
            trait_likelihood,
            inheritance,
        }
    }

    /// Number of factors (people) in a joint.
    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    /// Probability of `person`'s gene count given the rest of the hypothesis.
    #[inline]
    pub fn gene_probability(
        &self,
        hypothesis: &Hypothesis,
        person: PersonId,
        parents: Option<Parents>,
    ) -> f64 {
        let gene = hypothesis.gene_count(person);
        match parents {
            None => self.prior[gene.index()],
            Some(Parents { mother, father }) => {
                self.inheritance[hypothesis.gene_count(mother).index()]
                    [hypothesis.gene_count(father).index()][gene.index()]
            }
        }
    }

    /// One person's factor: gene probability times trait likelihood.
    #[inline]
    pub fn person_contribution(
        &self,
        hypothesis: &Hypothesis,
        person: PersonId,
        parents: Option<Parents>,
    ) -> f64 {
        let gene = hypothesis.gene_count(person);
        let has_trait = hypothesis.has_trait(person);
        self.gene_probability(hypothesis, person, parents)
            * self.trait_likelihood[gene.index()][usize::from(has_trait)]
    }

    /// Joint probability of `hypothesis`, in `[0, 1]`.
    ///
    /// Stops multiplying as soon as a factor is zero.
    pub fn joint_probability(&self, hypothesis: &Hypothesis) -> f64 {
        let mut joint = 1.0;
        for factor in &self.factors {
            joint *= self.person_contribution(hypothesis, factor.person, factor.parents);
            if joint == 0.0 {
                break;
            }
        }
        joint
    }

    /// Natural log of [`Self::joint_probability`], summed factor by factor;
    /// `-inf` when the joint is zero.
    pub fn log_joint_probability(&self, hypothesis: &Hypothesis) -> f64 {
        let mut log_joint = 0.0;
        for factor in &self.factors {
            let contribution =
                self.person_contribution(hypothesis, factor.person, factor.parents);
            if contribution == 0.0 {
                return f64::NEG_INFINITY;
            }
            log_joint += contribution.ln();
        }
        log_joint
    }
}
