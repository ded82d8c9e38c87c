//! Compact hypothesis representation.
//!
//! A hypothesis assigns every person a gene copy count and a trait value. It is
//! stored as three bitsets over dense [`PersonId`]s: the one-copy set, the
//! two-copy set (disjoint from the first; everyone else has zero copies), and
//! the set of people with the trait.

use std::fmt;

use crate::engine::model::GeneCount;
use crate::engine::pedigree::PersonId;

/// A set of people, one bit per [`PersonId`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PersonSet(pub u64);

impl PersonSet {
    pub const EMPTY: PersonSet = PersonSet(0);

    /// The set `{0, 1, .., count - 1}`.
    pub fn first(count: usize) -> Self {
        match count {
            0 => Self::EMPTY,
            c if c >= 64 => Self(u64::MAX),
            c => Self((1u64 << c) - 1),
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = PersonId>) -> Self {
        let mut set = Self::EMPTY;
        for id in ids {
            set.insert(id);
        }
        set
    }

    #[inline]
    pub fn contains(self, id: PersonId) -> bool {
        self.0 & bit(id) != 0
    }

    #[inline]
    pub fn insert(&mut self, id: PersonId) {
        self.0 |= bit(id);
    }

    #[inline]
    pub fn remove(&mut self, id: PersonId) {
        self.0 &= !bit(id);
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn union(self, other: PersonSet) -> PersonSet {
        PersonSet(self.0 | other.0)
    }

    #[inline]
    pub fn intersection(self, other: PersonSet) -> PersonSet {
        PersonSet(self.0 & other.0)
    }

    #[inline]
    pub fn difference(self, other: PersonSet) -> PersonSet {
        PersonSet(self.0 & !other.0)
    }

    #[inline]
    pub fn is_disjoint(self, other: PersonSet) -> bool {
        self.0 & other.0 == 0
    }

    #[inline]
    pub fn is_subset(self, other: PersonSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Members in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = PersonId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros();
            bits &= bits - 1;
            Some(PersonId(idx))
        })
    }
}

#[inline]
fn bit(id: PersonId) -> u64 {
    debug_assert!(id.0 < 64, "person id {} exceeds bitset width", id.0);
    1u64 << id.0
}

impl fmt::Debug for PersonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|id| id.0)).finish()
    }
}

/// One complete assignment of gene counts and trait values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hypothesis {
    pub one_gene: PersonSet,
    pub two_genes: PersonSet,
    pub has_trait: PersonSet,
}

impl Hypothesis {
    /// Hypothesized copy count for `id`.
    #[inline]
    pub fn gene_count(&self, id: PersonId) -> GeneCount {
        if self.two_genes.contains(id) {
            GeneCount::Two
        } else if self.one_gene.contains(id) {
            GeneCount::One
        } else {
            GeneCount::Zero
        }
    }

    /// Hypothesized trait value for `id`.
    #[inline]
    pub fn has_trait(&self, id: PersonId) -> bool {
        self.has_trait.contains(id)
    }

    /// The gene sets are disjoint and every set stays within `population`.
    pub fn is_well_formed(&self, population: PersonSet) -> bool {
        self.one_gene.is_disjoint(self.two_genes)
            && self.one_gene.is_subset(population)
            && self.two_genes.is_subset(population)
            && self.has_trait.is_subset(population)
    }
}
