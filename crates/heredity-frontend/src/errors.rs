//! Error types for parsing and validation.

use std::fmt;

use thiserror::Error;

/// Semantic validation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationContext {
    /// A person row.
    Person { name: String },
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person { name } => write!(f, "person '{}'", name),
        }
    }
}

/// Rich semantic validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub message: String,
    pub context: Option<ValidationContext>,
    /// 1-based source line.
    pub line: Option<u32>,
}

impl ValidationDiagnostic {
    /// Name of the person the diagnostic refers to, if any.
    pub fn person(&self) -> Option<&str> {
        match &self.context {
            Some(ValidationContext::Person { name }) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error")?;
        if let Some(ctx) = &self.context {
            write!(f, " [{}]", ctx)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(line) = self.line {
            write!(f, " (at line {})", line)?;
        }
        Ok(())
    }
}

/// Errors that can occur during parsing or validation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// Syntax error during parsing.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Semantic validation error with context and optional source line.
    #[error("{0}")]
    ValidationDiagnostic(ValidationDiagnostic),
}

impl FrontendError {
    /// Build a context-aware validation diagnostic.
    pub fn validation(
        message: impl Into<String>,
        context: Option<ValidationContext>,
        line: Option<u32>,
    ) -> Self {
        Self::ValidationDiagnostic(ValidationDiagnostic {
            message: message.into(),
            context,
            line,
        })
    }

    /// Returns the rich validation diagnostic if present.
    pub fn validation_diagnostic(&self) -> Option<&ValidationDiagnostic> {
        match self {
            Self::ValidationDiagnostic(diag) => Some(diag),
            _ => None,
        }
    }
}
