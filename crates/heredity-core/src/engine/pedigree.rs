//! # Pedigree Graph
//!
//! Immutable family structure used by inference.
//!
//! ## Design
//!
//! - Every person is mapped once, at construction, to a dense [`PersonId`]
//!   in `0..len()`, in input order. Hypotheses use these ids as bit positions.
//! - A person has either both parents or neither. People without parents are
//!   roots and draw their gene count from the prior; everyone else inherits
//!   from exactly their two parents, so only one hop of traversal is needed.
//! - O(1) name lookups via an `FxHashMap` index.
//!
//! Acyclicity is assumed, not checked: inference only ever looks at a
//! person's direct parents, so a cycle cannot make it loop.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::engine::errors::InferenceError;
use heredity_frontend::{PersonRecord, TraitObservation};

/// Largest pedigree exact enumeration supports.
///
/// Gene assignments are indexed by a base-3 counter in a `u64`, and 3^40 is
/// the largest power of three that fits.
pub const MAX_INDIVIDUALS: usize = 40;

/// A dense identifier for a person in the pedigree.
///
/// Uses u32 internally; ids are assigned in input order starting at 0.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonId(pub u32);

impl PersonId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Both parents of a non-root person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub mother: PersonId,
    pub father: PersonId,
}

/// One person of the pedigree.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub name: Arc<str>,
    pub parents: Option<Parents>,
    /// Trait observation carried by the input record.
    pub observed: TraitObservation,
}

impl Person {
    /// People without listed parents draw their gene count from the prior.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parents.is_none()
    }
}

/// Family structure mapping names to people and their parent links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PedigreeGraph {
    persons: Vec<Person>,
    index: FxHashMap<Arc<str>, PersonId>,
}

impl PedigreeGraph {
    /// Builds the graph from input records, re-validating structure.
    ///
    /// Fails with [`InferenceError::MalformedPedigree`] on a duplicate name, a
    /// parent that is not in `records` or is the person themself, exactly one
    /// listed parent, or an unrecognized trait literal; and with
    /// [`InferenceError::PedigreeTooLarge`] beyond [`MAX_INDIVIDUALS`].
    pub fn from_records(records: &[PersonRecord]) -> Result<Self, InferenceError> {
        if records.len() > MAX_INDIVIDUALS {
            return Err(InferenceError::PedigreeTooLarge {
                count: records.len(),
                max: MAX_INDIVIDUALS,
            });
        }

        let mut index = FxHashMap::default();
        index.reserve(records.len());
        let mut names = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                return Err(InferenceError::malformed("", "person name is empty"));
            }
            let name: Arc<str> = Arc::from(record.name.as_str());
            if index.insert(name.clone(), PersonId(idx as u32)).is_some() {
                return Err(InferenceError::malformed(
                    &record.name,
                    "name is listed more than once",
                ));
            }
            names.push(name);
        }

        let resolve = |record: &PersonRecord, role: &str, parent: &str| {
            if parent == record.name {
                return Err(InferenceError::malformed(
                    &record.name,
                    format!("{} is the person themself", role),
                ));
            }
            index.get(parent).copied().ok_or_else(|| {
                InferenceError::malformed(
                    &record.name,
                    format!("{} '{}' is not listed in the pedigree", role, parent),
                )
            })
        };

        let mut persons = Vec::with_capacity(records.len());
        for (record, name) in records.iter().zip(names) {
            let parents = match (record.mother.as_deref(), record.father.as_deref()) {
                (None, None) => None,
                (Some(mother), Some(father)) => Some(Parents {
                    mother: resolve(record, "mother", mother)?,
                    father: resolve(record, "father", father)?,
                }),
                _ => {
                    return Err(InferenceError::malformed(
                        &record.name,
                        "mother and father must both be listed or both be blank",
                    ))
                }
            };
            let observed = record.trait_observation().ok_or_else(|| {
                InferenceError::malformed(
                    &record.name,
                    format!(
                        "unrecognized trait literal '{}'",
                        record.trait_literal.as_deref().unwrap_or_default()
                    ),
                )
            })?;
            persons.push(Person {
                id: PersonId(persons.len() as u32),
                name,
                parents,
                observed,
            });
        }

        Ok(Self { persons, index })
    }

    /// Number of people.
    #[inline]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// People in id order.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// Looks a person up by id.
    #[inline]
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(id.index())
    }

    /// Looks a person up by name.
    pub fn get(&self, name: &str) -> Option<&Person> {
        self.index.get(name).and_then(|id| self.person(*id))
    }

    /// Resolves a name to its id.
    pub fn id_of(&self, name: &str) -> Option<PersonId> {
        self.index.get(name).copied()
    }

    /// Resolves a name to its id, failing with [`InferenceError::UnknownIndividual`].
    pub fn require(&self, name: &str) -> Result<PersonId, InferenceError> {
        self.id_of(name)
            .ok_or_else(|| InferenceError::UnknownIndividual(name.to_string()))
    }

    /// All names in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.persons.iter().map(|p| &*p.name)
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> {
        (0..self.persons.len() as u32).map(PersonId)
    }

    /// Parents of `id`, `None` for roots and unknown ids.
    #[inline]
    pub fn parents(&self, id: PersonId) -> Option<Parents> {
        self.person(id).and_then(|p| p.parents)
    }

    /// Ids of people without listed parents.
    pub fn roots(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.persons.iter().filter(|p| p.is_root()).map(|p| p.id)
    }
}
