//! Trait evidence for an inference run.
//!
//! Evidence fixes the trait value of some people. It starts from the
//! observations carried by the pedigree records and can be adjusted by name
//! before inference, which lets callers ask "what if" questions against the
//! same immutable [`PedigreeGraph`].

use crate::engine::errors::InferenceError;
use crate::engine::hypothesis::PersonSet;
use crate::engine::pedigree::{PedigreeGraph, PersonId};

/// Observed trait values, keyed by person id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evidence {
    /// People whose trait value is known.
    observed: PersonSet,
    /// People known to have the trait. Always a subset of `observed`.
    present: PersonSet,
}

impl Evidence {
    /// No observations.
    pub fn none() -> Self {
        Self::default()
    }

    /// The observations carried by the pedigree records.
    pub fn from_pedigree(pedigree: &PedigreeGraph) -> Self {
        let mut evidence = Self::none();
        for person in pedigree.persons() {
            if let Some(has_trait) = person.observed.as_bool() {
                evidence.set(person.id, has_trait);
            }
        }
        evidence
    }

    /// Records that `name` does (or does not) have the trait.
    pub fn observe(
        &mut self,
        pedigree: &PedigreeGraph,
        name: &str,
        has_trait: bool,
    ) -> Result<&mut Self, InferenceError> {
        let id = pedigree.require(name)?;
        self.set(id, has_trait);
        Ok(self)
    }

    /// Drops any observation for `name`.
    pub fn forget(
        &mut self,
        pedigree: &PedigreeGraph,
        name: &str,
    ) -> Result<&mut Self, InferenceError> {
        let id = pedigree.require(name)?;
        self.observed.remove(id);
        self.present.remove(id);
        Ok(self)
    }

    /// Observed trait for `id`, `None` when unknown.
    #[inline]
    pub fn get(&self, id: PersonId) -> Option<bool> {
        self.observed
            .contains(id)
            .then(|| self.present.contains(id))
    }

    /// People whose trait is known.
    #[inline]
    pub fn observed(&self) -> PersonSet {
        self.observed
    }

    /// People known to have the trait.
    #[inline]
    pub fn present(&self) -> PersonSet {
        self.present
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Whether a hypothesized trait set agrees with every observation.
    #[inline]
    pub fn is_consistent_with(&self, has_trait: PersonSet) -> bool {
        has_trait.intersection(self.observed) == self.present
    }

    fn set(&mut self, id: PersonId, has_trait: bool) {
        self.observed.insert(id);
        if has_trait {
            self.present.insert(id);
        } else {
            self.present.remove(id);
        }
    }
}
