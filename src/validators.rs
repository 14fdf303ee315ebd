// ✅ Field Validators - Per-field acceptance criteria
// A validator is an ordered chain of checks bound to one named field;
// all records of a schema share the same bound validator.

use crate::value::{FieldValue, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Tag for the error taxonomy, for callers that match on the failure kind
/// without destructuring the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    TypeMismatch,
    NegativeValue,
    EmptyValue,
    Arity,
    UnknownField,
}

/// A validation failure. All variants are local, synchronous and
/// non-retryable; the caller must supply a corrected value and re-attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is not of the declared kind and cannot be losslessly coerced.
    TypeMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// Numeric value below zero where a positive one is required.
    NegativeValue { field: String, value: FieldValue },
    /// Zero-length value where a non-empty one is required.
    EmptyValue { field: String },
    /// Wrong number of values supplied at construction.
    Arity { expected: usize, supplied: usize },
    /// Access or assignment to a field the schema never declared.
    UnknownField { name: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            ValidationError::NegativeValue { .. } => ValidationErrorKind::NegativeValue,
            ValidationError::EmptyValue { .. } => ValidationErrorKind::EmptyValue,
            ValidationError::Arity { .. } => ValidationErrorKind::Arity,
            ValidationError::UnknownField { .. } => ValidationErrorKind::UnknownField,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", field, expected, found),
            ValidationError::NegativeValue { field, value } => {
                write!(f, "{}: expected >= 0, got {}", field, value)
            }
            ValidationError::EmptyValue { field } => {
                write!(f, "{}: must be non-empty", field)
            }
            ValidationError::Arity { expected, supplied } => {
                write!(f, "expected {} field values, got {}", expected, supplied)
            }
            ValidationError::UnknownField { name } => {
                write!(f, "no declared field named '{}'", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CHECKS
// ============================================================================

/// One base predicate in a validator's chain.
///
/// Composed validators are the conjunction of their checks; the first
/// failing check determines the reported error kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Check {
    /// Value must be of (or losslessly coerce into) this kind.
    Kind(ValueKind),
    /// Numeric value must be >= 0.
    Positive,
    /// Sized value must have length > 0.
    NonEmpty,
}

// ============================================================================
// FIELD VALIDATOR
// ============================================================================

/// The acceptance criterion for one field's value.
///
/// Created unbound by the constructor functions below, then bound to its
/// field name exactly once when the schema is declared. After binding the
/// validator never changes; it is metadata shared by every record of the
/// schema, not per-record state.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidator {
    field: String,
    checks: Vec<Check>,
}

impl FieldValidator {
    /// An unbound validator accepting only the given kind.
    pub fn of_kind(kind: ValueKind) -> Self {
        FieldValidator {
            field: String::new(),
            checks: vec![Check::Kind(kind)],
        }
    }

    /// Append a predicate to the chain.
    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Associate this validator with its field name. Called once per
    /// (validator, field) pair, at schema-declaration time.
    pub fn bind(mut self, field: &str) -> Self {
        self.field = field.to_string();
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The declared kind from the chain's kind check, if it has one.
    pub fn expected_kind(&self) -> Option<ValueKind> {
        self.checks.iter().find_map(|check| match check {
            Check::Kind(kind) => Some(*kind),
            _ => None,
        })
    }

    /// Run the full chain over a candidate value.
    ///
    /// Returns the value, coerced into its canonical form where a lossless
    /// coercion applies (raw string -> declared kind, integer -> float).
    /// The candidate is consumed; the caller's source is never mutated.
    pub fn check(&self, value: FieldValue) -> Result<FieldValue, ValidationError> {
        let mut value = value;
        for check in &self.checks {
            value = self.apply(*check, value)?;
        }
        Ok(value)
    }

    fn apply(&self, check: Check, value: FieldValue) -> Result<FieldValue, ValidationError> {
        match check {
            Check::Kind(expected) => self.coerce(expected, value),
            Check::Positive => match numeric_view(&value) {
                Some(n) if n < 0.0 => Err(ValidationError::NegativeValue {
                    field: self.field.clone(),
                    value,
                }),
                Some(_) => Ok(value),
                None => Err(ValidationError::TypeMismatch {
                    field: self.field.clone(),
                    expected: ValueKind::Float,
                    found: value.kind(),
                }),
            },
            Check::NonEmpty => match value.len() {
                Some(0) => Err(ValidationError::EmptyValue {
                    field: self.field.clone(),
                }),
                Some(_) => Ok(value),
                None => Err(ValidationError::TypeMismatch {
                    field: self.field.clone(),
                    expected: ValueKind::Str,
                    found: value.kind(),
                }),
            },
        }
    }

    /// Kind check with lossless coercion.
    ///
    /// Raw strings parse into the expected kind (rows arrive as strings),
    /// and integers widen to floats. Lossy paths (float -> integer,
    /// bool -> integer) are rejected.
    fn coerce(&self, expected: ValueKind, value: FieldValue) -> Result<FieldValue, ValidationError> {
        let found = value.kind();
        let coerced = match (expected, value) {
            (ValueKind::Integer, FieldValue::Int(n)) => Some(FieldValue::Int(n)),
            (ValueKind::Integer, FieldValue::Str(s)) => {
                s.trim().parse::<i64>().ok().map(FieldValue::Int)
            }
            (ValueKind::Float, FieldValue::Float(x)) => Some(FieldValue::Float(x)),
            (ValueKind::Float, FieldValue::Int(n)) => Some(FieldValue::Float(n as f64)),
            (ValueKind::Float, FieldValue::Str(s)) => {
                s.trim().parse::<f64>().ok().map(FieldValue::Float)
            }
            (ValueKind::Bool, FieldValue::Bool(b)) => Some(FieldValue::Bool(b)),
            (ValueKind::Bool, FieldValue::Str(s)) => {
                s.trim().parse::<bool>().ok().map(FieldValue::Bool)
            }
            (ValueKind::Str, FieldValue::Str(s)) => Some(FieldValue::Str(s)),
            (ValueKind::List, FieldValue::List(items)) => Some(FieldValue::List(items)),
            _ => None,
        };
        coerced.ok_or_else(|| ValidationError::TypeMismatch {
            field: self.field.clone(),
            expected,
            found,
        })
    }
}

/// Numeric reading of a value, tolerant of raw string cells so that check
/// order never changes a validator's accept/reject outcome.
fn numeric_view(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Int(n) => Some(*n as f64),
        FieldValue::Float(x) => Some(*x),
        FieldValue::Str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// ============================================================================
// CONSTRUCTOR FUNCTIONS
// ============================================================================

pub fn integer() -> FieldValidator {
    FieldValidator::of_kind(ValueKind::Integer)
}

pub fn float() -> FieldValidator {
    FieldValidator::of_kind(ValueKind::Float)
}

pub fn boolean() -> FieldValidator {
    FieldValidator::of_kind(ValueKind::Bool)
}

pub fn string() -> FieldValidator {
    FieldValidator::of_kind(ValueKind::Str)
}

pub fn list() -> FieldValidator {
    FieldValidator::of_kind(ValueKind::List)
}

/// Integer that is >= 0.
pub fn positive_integer() -> FieldValidator {
    integer().with_check(Check::Positive)
}

/// Float that is >= 0.
pub fn positive_float() -> FieldValidator {
    float().with_check(Check::Positive)
}

/// String with length > 0.
pub fn non_empty_string() -> FieldValidator {
    string().with_check(Check::NonEmpty)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_validator_accepts_declared_kind() {
        let v = integer().bind("shares");
        assert_eq!(v.check(FieldValue::Int(50)), Ok(FieldValue::Int(50)));

        let v = string().bind("name");
        assert_eq!(v.check(FieldValue::from("IBM")), Ok(FieldValue::from("IBM")));
    }

    #[test]
    fn test_typed_validator_rejects_wrong_kind() {
        let v = integer().bind("shares");
        let err = v.check(FieldValue::Bool(true)).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TypeMismatch);
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "shares".to_string(),
                expected: ValueKind::Integer,
                found: ValueKind::Bool,
            }
        );
    }

    #[test]
    fn test_raw_string_coercion() {
        let v = positive_integer().bind("shares");
        assert_eq!(v.check(FieldValue::from("50")), Ok(FieldValue::Int(50)));

        let v = positive_float().bind("price");
        assert_eq!(v.check(FieldValue::from("91.1")), Ok(FieldValue::Float(91.1)));

        let v = boolean().bind("active");
        assert_eq!(v.check(FieldValue::from("true")), Ok(FieldValue::Bool(true)));
    }

    #[test]
    fn test_unparseable_string_is_type_mismatch() {
        let v = positive_float().bind("price");
        let err = v.check(FieldValue::from("x")).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TypeMismatch);
    }

    #[test]
    fn test_integer_widens_to_float() {
        let v = float().bind("price");
        assert_eq!(v.check(FieldValue::Int(91)), Ok(FieldValue::Float(91.0)));
    }

    #[test]
    fn test_lossy_coercion_rejected() {
        // float -> integer would truncate
        let v = integer().bind("shares");
        assert!(v.check(FieldValue::Float(50.5)).is_err());
        assert!(v.check(FieldValue::Float(50.0)).is_err());

        // bool -> integer
        let v = integer().bind("flag");
        assert!(v.check(FieldValue::Bool(true)).is_err());
    }

    #[test]
    fn test_positive_rejects_negative() {
        let v = positive_integer().bind("shares");
        let err = v.check(FieldValue::Int(-50)).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::NegativeValue);

        // zero is allowed
        assert_eq!(v.check(FieldValue::Int(0)), Ok(FieldValue::Int(0)));
    }

    #[test]
    fn test_non_empty_rejects_empty() {
        let v = non_empty_string().bind("name");
        let err = v.check(FieldValue::from("")).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::EmptyValue);
        assert_eq!(v.check(FieldValue::from("IBM")), Ok(FieldValue::from("IBM")));
    }

    #[test]
    fn test_composed_checks_are_conjunctive() {
        let v = positive_integer().bind("shares");

        // fails the kind check
        assert_eq!(
            v.check(FieldValue::from("x")).unwrap_err().kind(),
            ValidationErrorKind::TypeMismatch
        );
        // passes the kind check, fails the range check
        assert_eq!(
            v.check(FieldValue::Int(-1)).unwrap_err().kind(),
            ValidationErrorKind::NegativeValue
        );
        // passes both
        assert_eq!(v.check(FieldValue::Int(1)), Ok(FieldValue::Int(1)));
    }

    #[test]
    fn test_check_order_does_not_change_outcome() {
        let kind_first = FieldValidator::of_kind(ValueKind::Integer)
            .with_check(Check::Positive)
            .bind("shares");
        let positive_first = FieldValidator {
            field: String::new(),
            checks: vec![Check::Positive, Check::Kind(ValueKind::Integer)],
        }
        .bind("shares");

        for candidate in [
            FieldValue::Int(5),
            FieldValue::Int(-5),
            FieldValue::from("5"),
            FieldValue::from("-5"),
            FieldValue::from("x"),
            FieldValue::Bool(true),
        ] {
            assert_eq!(
                kind_first.check(candidate.clone()).is_ok(),
                positive_first.check(candidate.clone()).is_ok(),
                "order changed outcome for {:?}",
                candidate
            );
        }
    }

    #[test]
    fn test_expected_kind() {
        assert_eq!(positive_integer().expected_kind(), Some(ValueKind::Integer));
        assert_eq!(non_empty_string().expected_kind(), Some(ValueKind::Str));
        assert_eq!(
            FieldValidator {
                field: String::new(),
                checks: vec![Check::Positive],
            }
            .expected_kind(),
            None
        );
    }

    #[test]
    fn test_bound_name_appears_in_errors() {
        let v = non_empty_string().bind("name");
        assert_eq!(
            v.check(FieldValue::from("")).unwrap_err().to_string(),
            "name: must be non-empty"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::TypeMismatch {
            field: "price".to_string(),
            expected: ValueKind::Float,
            found: ValueKind::Str,
        };
        assert_eq!(err.to_string(), "price: expected float, found string");

        let err = ValidationError::Arity {
            expected: 3,
            supplied: 2,
        };
        assert_eq!(err.to_string(), "expected 3 field values, got 2");

        let err = ValidationError::UnknownField {
            name: "sharez".to_string(),
        };
        assert_eq!(err.to_string(), "no declared field named 'sharez'");
    }
}
