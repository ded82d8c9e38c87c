//! # Pedigree Parser
//!
//! This module implements the parser for pedigree CSV files using the Pest parser generator.
//!
//! ## Overview
//!
//! The parser transforms source text into a [`PedigreeAst`] without performing
//! semantic validation. It handles:
//!
//! - A header row naming the columns, matched case-insensitively
//! - Bare and double-quoted fields
//! - `\n` and `\r\n` line endings, and blank lines
//!
//! The columns `name`, `mother`, `father` and `trait` are required; any other
//! column is ignored. Blank `mother`, `father` and `trait` fields become `None`.
//!
//! ## Grammar
//!
//! The grammar is defined in `grammar.pest` using Pest's PEG syntax.

use crate::ast::{PedigreeAst, PersonRecord};
use crate::errors::FrontendError;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct PedigreeParser;

const NAME_COLUMN: &str = "name";
const MOTHER_COLUMN: &str = "mother";
const FATHER_COLUMN: &str = "father";
const TRAIT_COLUMN: &str = "trait";

/// Parses pedigree CSV source into an AST.
///
/// This is a pure syntactic parser. Use [`crate::validate::validate_pedigree`]
/// to check parent references and trait literals.
///
/// # Example
///
/// ```rust
/// use heredity_frontend::parse_pedigree;
///
/// let ast = parse_pedigree("name,mother,father,trait\nJames,,,1\n").unwrap();
/// assert_eq!(ast.records.len(), 1);
/// assert_eq!(ast.records[0].trait_literal.as_deref(), Some("1"));
/// ```
pub fn parse_pedigree(source: &str) -> Result<PedigreeAst, FrontendError> {
    let mut pairs = PedigreeParser::parse(Rule::file, source)
        .map_err(|e| FrontendError::ParseError(e.to_string()))?;

    let Some(file_pair) = pairs.next() else {
        return Err(FrontendError::ParseError("empty input".into()));
    };
    debug_assert_eq!(file_pair.as_rule(), Rule::file);

    let mut rows = file_pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::row)
        .map(build_row)
        .filter(|row| !row.is_blank());

    let header = rows
        .next()
        .ok_or_else(|| FrontendError::ParseError("missing header row".into()))?;
    let columns = ColumnLayout::from_header(&header)?;

    let mut records = Vec::new();
    for row in rows {
        if row.fields.len() != header.fields.len() {
            return Err(FrontendError::ParseError(format!(
                "line {}: expected {} fields, found {}",
                row.line,
                header.fields.len(),
                row.fields.len()
            )));
        }
        records.push(columns.record(row));
    }

    Ok(PedigreeAst { records })
}

#[derive(Debug)]
struct RawRow {
    line: u32,
    fields: Vec<String>,
}

impl RawRow {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

fn build_row(pair: Pair<Rule>) -> RawRow {
    let line = pair.as_span().start_pos().line_col().0 as u32;
    let fields = pair.into_inner().map(build_field).collect();
    RawRow { line, fields }
}

fn build_field(pair: Pair<Rule>) -> String {
    match pair.as_rule() {
        Rule::quoted => pair
            .into_inner()
            .next()
            .map(|inner| inner.as_str().replace("\"\"", "\""))
            .unwrap_or_default(),
        _ => pair.as_str().trim().to_string(),
    }
}

/// Positions of the required columns within a row.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    name: usize,
    mother: usize,
    father: usize,
    trait_: usize,
}

impl ColumnLayout {
    fn from_header(header: &RawRow) -> Result<Self, FrontendError> {
        let find = |column: &str| -> Result<usize, FrontendError> {
            let mut matches = header
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.trim().eq_ignore_ascii_case(column))
                .map(|(idx, _)| idx);
            let idx = matches.next().ok_or_else(|| {
                FrontendError::ParseError(format!(
                    "line {}: header is missing the '{}' column",
                    header.line, column
                ))
            })?;
            if matches.next().is_some() {
                return Err(FrontendError::ParseError(format!(
                    "line {}: header lists the '{}' column more than once",
                    header.line, column
                )));
            }
            Ok(idx)
        };

        Ok(Self {
            name: find(NAME_COLUMN)?,
            mother: find(MOTHER_COLUMN)?,
            father: find(FATHER_COLUMN)?,
            trait_: find(TRAIT_COLUMN)?,
        })
    }

    fn record(self, row: RawRow) -> PersonRecord {
        let field = |idx: usize| {
            let value = row.fields[idx].trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        PersonRecord {
            name: row.fields[self.name].trim().to_string(),
            mother: field(self.mother),
            father: field(self.father),
            trait_literal: field(self.trait_),
            line: Some(row.line),
        }
    }
}
