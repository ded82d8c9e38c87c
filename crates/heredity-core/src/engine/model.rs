//! Inheritance model configuration.
//!
//! The model is three fixed tables: the unconditional prior over gene copy
//! counts, the probability of the trait given a copy count, and the per-allele
//! mutation rate applied during transmission. It is an immutable value passed
//! explicitly to every stage of inference.

use crate::engine::errors::{InferenceError, ModelTable};
use crate::engine::numeric_kernels::{sum_probabilities, Summation};

/// Tolerance used when checking that a probability table sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Number of copies of the gene a person carries.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneCount {
    Zero = 0,
    One = 1,
    Two = 2,
}

impl GeneCount {
    /// All copy counts in ascending order.
    pub const ALL: [GeneCount; 3] = [GeneCount::Zero, GeneCount::One, GeneCount::Two];

    /// Dense index for table lookups.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of gene copies.
    #[inline]
    pub fn copies(self) -> u8 {
        self as u8
    }

    pub fn from_copies(copies: u8) -> Option<Self> {
        match copies {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

/// Unconditional distribution of gene copies for people without listed parents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct GenePrior {
    pub zero: f64,
    pub one: f64,
    pub two: f64,
}

impl Default for GenePrior {
    fn default() -> Self {
        Self {
            zero: 0.96,
            one: 0.03,
            two: 0.01,
        }
    }
}

impl GenePrior {
    #[inline]
    pub fn probability(&self, gene: GeneCount) -> f64 {
        match gene {
            GeneCount::Zero => self.zero,
            GeneCount::One => self.one,
            GeneCount::Two => self.two,
        }
    }

    /// The table indexed by [`GeneCount::index`].
    pub fn to_array(&self) -> [f64; 3] {
        [self.zero, self.one, self.two]
    }
}

/// Probability of the trait being present or absent for one copy count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct TraitLikelihood {
    pub present: f64,
    pub absent: f64,
}

impl TraitLikelihood {
    #[inline]
    pub fn probability(&self, has_trait: bool) -> f64 {
        if has_trait {
            self.present
        } else {
            self.absent
        }
    }
}

/// Trait likelihood per gene copy count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct TraitGivenGene {
    pub zero: TraitLikelihood,
    pub one: TraitLikelihood,
    pub two: TraitLikelihood,
}

impl Default for TraitGivenGene {
    fn default() -> Self {
        Self {
            zero: TraitLikelihood {
                present: 0.01,
                absent: 0.99,
            },
            one: TraitLikelihood {
                present: 0.56,
                absent: 0.44,
            },
            two: TraitLikelihood {
                present: 0.65,
                absent: 0.35,
            },
        }
    }
}

impl TraitGivenGene {
    #[inline]
    pub fn row(&self, gene: GeneCount) -> &TraitLikelihood {
        match gene {
            GeneCount::Zero => &self.zero,
            GeneCount::One => &self.one,
            GeneCount::Two => &self.two,
        }
    }

    #[inline]
    pub fn probability(&self, gene: GeneCount, has_trait: bool) -> f64 {
        self.row(gene).probability(has_trait)
    }
}

/// Prior, likelihood, and mutation tables for one inference run.
///
/// `Default` gives the reference tables:
///
/// | copies | prior | P(trait) | P(no trait) |
/// |---|---|---|---|
/// | 0 | 0.96 | 0.01 | 0.99 |
/// | 1 | 0.03 | 0.56 | 0.44 |
/// | 2 | 0.01 | 0.65 | 0.35 |
///
/// with a mutation rate of 0.01.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct InheritanceModel {
    pub gene_prior: GenePrior,
    pub trait_given_gene: TraitGivenGene,
    /// Probability that a transmitted allele flips state.
    pub mutation_rate: f64,
}

impl Default for InheritanceModel {
    fn default() -> Self {
        Self {
            gene_prior: GenePrior::default(),
            trait_given_gene: TraitGivenGene::default(),
            mutation_rate: 0.01,
        }
    }
}

impl InheritanceModel {
    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Checks every table before any enumeration starts.
    pub fn validate(self) -> Result<Self, InferenceError> {
        check_distribution(ModelTable::GenePrior, &self.gene_prior.to_array())?;
        for gene in GeneCount::ALL {
            let row = self.trait_given_gene.row(gene);
            check_distribution(
                ModelTable::TraitGivenGene(gene.copies()),
                &[row.present, row.absent],
            )?;
        }
        if !is_probability(self.mutation_rate) {
            return Err(InferenceError::invalid_config(
                ModelTable::MutationRate,
                format!("{} is not within [0, 1]", self.mutation_rate),
            ));
        }
        Ok(self)
    }
}

fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn check_distribution(table: ModelTable, values: &[f64]) -> Result<(), InferenceError> {
    if let Some(bad) = values.iter().find(|v| !is_probability(**v)) {
        return Err(InferenceError::invalid_config(
            table,
            format!("entry {} is not a probability in [0, 1]", bad),
        ));
    }
    let total = sum_probabilities(values.iter().copied(), Summation::Compensated);
    if (total - 1.0).abs() > SUM_TOLERANCE {
        return Err(InferenceError::invalid_config(
            table,
            format!("entries sum to {}, expected 1", total),
        ));
    }
    Ok(())
}
