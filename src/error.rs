//! Domain error types

use thiserror::Error;

/// Reasons a structural edit or a save of a form schema is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Cannot save empty form")]
    NoFields,
    #[error("Form name cannot be empty")]
    EmptyName,
    #[error("Field index {index} is out of bounds (form has {len} fields)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Option index {index} is out of bounds (field has {len} options)")]
    OptionOutOfBounds { index: usize, len: usize },
}

/// Errors produced while compiling or evaluating a formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("unterminated {what} starting at position {position}")]
    Unterminated { what: &'static str, position: usize },
    #[error("invalid number literal '{literal}'")]
    InvalidNumber { literal: String },
    #[error("unexpected {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },
    #[error("unexpected end of formula, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("formula is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("formula has more than {limit} values and operators")]
    TooLong { limit: usize },
    #[error("reference to '{name}' is not one of the formula inputs")]
    UnknownReference { name: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator '{op}' needs numbers, got '{value}'")]
    NotANumber { op: &'static str, value: String },
    #[error("result is not a finite number")]
    NonFinite,
}

/// Why a derived field could not be computed during a derivation pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivationError {
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error("field takes part in a dependency cycle")]
    Cycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_messages_match_user_alerts() {
        assert_eq!(SchemaError::NoFields.to_string(), "Cannot save empty form");
        assert_eq!(SchemaError::EmptyName.to_string(), "Form name cannot be empty");
    }

    #[test]
    fn test_derivation_error_wraps_formula_error() {
        let err: DerivationError = FormulaError::DivisionByZero.into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
