//! # Semantic Validation
//!
//! Checks the loader contract on a parsed pedigree:
//!
//! - every person has a non-empty, unique name
//! - mother and father are both present or both absent
//! - parent names resolve to rows of the same pedigree
//! - nobody is listed as their own parent
//! - trait literals use a recognized encoding
//!
//! Validation is separate from parsing to provide clear, actionable error messages.

use std::collections::HashSet;

use crate::ast::{PedigreeAst, PersonRecord};
use crate::errors::{FrontendError, ValidationContext};

/// Performs semantic validation on a parsed pedigree.
///
/// Stops at the first problem, reported as a
/// [`FrontendError::ValidationDiagnostic`] naming the person and line.
///
/// # Example
///
/// ```rust
/// use heredity_frontend::{parse_pedigree, validate_pedigree};
///
/// let ast = parse_pedigree("name,mother,father,trait\nHarry,Lily,,\n").unwrap();
/// assert!(validate_pedigree(&ast).is_err());
/// ```
pub fn validate_pedigree(ast: &PedigreeAst) -> Result<(), FrontendError> {
    let mut names = HashSet::with_capacity(ast.records.len());
    for record in &ast.records {
        if record.name.trim().is_empty() {
            return Err(FrontendError::validation(
                "person name is empty",
                None,
                record.line,
            ));
        }
        if !names.insert(record.name.as_str()) {
            return Err(person_error(record, "name is listed more than once"));
        }
    }

    for record in &ast.records {
        validate_parents(record, &names)?;
        if record.trait_observation().is_none() {
            return Err(person_error(
                record,
                format!(
                    "unrecognized trait literal '{}'",
                    record.trait_literal.as_deref().unwrap_or_default()
                ),
            ));
        }
    }

    Ok(())
}

fn validate_parents(record: &PersonRecord, names: &HashSet<&str>) -> Result<(), FrontendError> {
    match (record.mother.as_deref(), record.father.as_deref()) {
        (None, None) => Ok(()),
        (Some(_), None) => Err(person_error(record, "mother is listed without a father")),
        (None, Some(_)) => Err(person_error(record, "father is listed without a mother")),
        (Some(mother), Some(father)) => {
            for (role, parent) in [("mother", mother), ("father", father)] {
                if parent == record.name {
                    return Err(person_error(record, format!("{} is the person themself", role)));
                }
                if !names.contains(parent) {
                    return Err(person_error(
                        record,
                        format!("{} '{}' is not listed in the pedigree", role, parent),
                    ));
                }
            }
            Ok(())
        }
    }
}

fn person_error(record: &PersonRecord, message: impl Into<String>) -> FrontendError {
    FrontendError::validation(
        message,
        Some(ValidationContext::Person {
            name: record.name.clone(),
        }),
        record.line,
    )
}
