//! Error types for pedigree construction and inference.

use std::fmt;

use thiserror::Error;

impl From<heredity_frontend::FrontendError> for InferenceError {
    fn from(err: heredity_frontend::FrontendError) -> Self {
        match err {
            heredity_frontend::FrontendError::ParseError(msg) => InferenceError::ParseError(msg),
            heredity_frontend::FrontendError::ValidationDiagnostic(diag) => {
                let reason = match diag.line {
                    Some(line) => format!("{} (at line {})", diag.message, line),
                    None => diag.message.clone(),
                };
                InferenceError::MalformedPedigree {
                    person: diag.person().unwrap_or_default().to_string(),
                    reason,
                }
            }
            _ => InferenceError::Internal(format!("unexpected frontend error: {:?}", err)),
        }
    }
}

/// Configuration table named by an [`InferenceError::InvalidConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTable {
    GenePrior,
    /// Row of the trait-given-gene table for the given copy count.
    TraitGivenGene(u8),
    MutationRate,
    Options,
}

impl fmt::Display for ModelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenePrior => write!(f, "gene prior"),
            Self::TraitGivenGene(copies) => write!(f, "trait given gene (row {})", copies),
            Self::MutationRate => write!(f, "mutation rate"),
            Self::Options => write!(f, "inference options"),
        }
    }
}

/// Which per-person marginal an [`InferenceError::IndeterminateEvidence`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Gene,
    Trait,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gene => write!(f, "gene"),
            Self::Trait => write!(f, "trait"),
        }
    }
}

/// Errors that can occur while loading a pedigree or running inference.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Syntax error in the pedigree source.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Dangling parent reference, asymmetric parents, or an unrecognized trait literal.
    #[error("malformed pedigree [person '{person}']: {reason}")]
    MalformedPedigree { person: String, reason: String },

    /// A model table or option failed validation.
    #[error("invalid configuration [{table}]: {message}")]
    InvalidConfiguration { table: ModelTable, message: String },

    /// A marginal had zero total mass: the evidence is impossible under the model.
    #[error("indeterminate evidence [person '{person}']: {distribution} marginal has zero total probability")]
    IndeterminateEvidence {
        person: String,
        distribution: Distribution,
    },

    /// A name that is not part of the pedigree.
    #[error("unknown individual '{0}'")]
    UnknownIndividual(String),

    /// The pedigree exceeds what exact enumeration supports.
    #[error("pedigree has {count} individuals; exact enumeration supports at most {max}")]
    PedigreeTooLarge { count: usize, max: usize },

    /// Internal error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl InferenceError {
    pub(crate) fn malformed(person: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPedigree {
            person: person.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(table: ModelTable, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            table,
            message: message.into(),
        }
    }
}
