//! # Pedigree Records
//!
//! Parsed, unvalidated pedigree rows. Each row names one person, optionally
//! their mother and father, and an optional trait observation literal.
//!
//! Trait literals are kept raw so that the engine can reject unrecognized
//! encodings with its own error type. [`TraitObservation::from_literal`]
//! defines which encodings are recognized.

/// The root of a parsed pedigree file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PedigreeAst {
    /// Person rows in file order.
    pub records: Vec<PersonRecord>,
}

/// One row of the pedigree file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    /// Unique person name.
    pub name: String,
    /// Mother's name, `None` when the field is blank.
    pub mother: Option<String>,
    /// Father's name, `None` when the field is blank.
    pub father: Option<String>,
    /// Raw trait literal, `None` when the field is blank.
    pub trait_literal: Option<String>,
    /// 1-based line of the row in the source, when parsed from text.
    pub line: Option<u32>,
}

impl PersonRecord {
    /// A person without parents and without a trait observation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mother: None,
            father: None,
            trait_literal: None,
            line: None,
        }
    }

    /// Sets both parents.
    pub fn with_parents(mut self, mother: impl Into<String>, father: impl Into<String>) -> Self {
        self.mother = Some(mother.into());
        self.father = Some(father.into());
        self
    }

    /// Sets the raw trait literal.
    pub fn with_trait(mut self, literal: impl Into<String>) -> Self {
        self.trait_literal = Some(literal.into());
        self
    }

    /// Sets the trait literal from an observed value, using the `1`/`0` encoding.
    pub fn observed(self, has_trait: bool) -> Self {
        self.with_trait(if has_trait { "1" } else { "0" })
    }

    /// Interprets the trait literal. `None` means the literal is not recognized.
    pub fn trait_observation(&self) -> Option<TraitObservation> {
        TraitObservation::from_literal(self.trait_literal.as_deref())
    }
}

/// Tri-state trait observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraitObservation {
    /// The trait was observed.
    Present,
    /// The trait was observed to be absent.
    Absent,
    /// No observation.
    #[default]
    Unknown,
}

impl TraitObservation {
    /// Parses a trait literal.
    ///
    /// Recognized: `1`/`0`, `true`/`false`, `yes`/`no` (case-insensitive).
    /// A missing or blank literal is [`TraitObservation::Unknown`].
    pub fn from_literal(literal: Option<&str>) -> Option<Self> {
        let Some(raw) = literal.map(str::trim) else {
            return Some(Self::Unknown);
        };
        if raw.is_empty() {
            return Some(Self::Unknown);
        }
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(Self::Present),
            "0" | "false" | "no" => Some(Self::Absent),
            _ => None,
        }
    }

    /// The observed value, or `None` when unknown.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<Option<bool>> for TraitObservation {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Present,
            Some(false) => Self::Absent,
            None => Self::Unknown,
        }
    }
}
