// 📐 Record Layer - Fixed-shape records gated by validators
// A Schema is the ordered set of (field name, validator) pairs, declared
// once and shared by every record built from it. Records can never hold a
// value for an undeclared field, and never hold an unvalidated value.

use crate::validators::{FieldValidator, ValidationError};
use crate::value::FieldValue;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// SCHEMA
// ============================================================================

/// The ordered field set of a record type.
///
/// Built once through [`SchemaBuilder`] and held behind an `Arc`: the
/// validators inside are metadata shared by all records, never mutated
/// after declaration.
#[derive(Debug, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldValidator)>,
}

/// A field name declared twice in one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateFieldError {
    pub name: String,
}

impl fmt::Display for DuplicateFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}' declared more than once", self.name)
    }
}

impl std::error::Error for DuplicateFieldError {}

pub struct SchemaBuilder {
    fields: Vec<(String, FieldValidator)>,
    duplicate: Option<String>,
}

impl SchemaBuilder {
    /// Declare the next field, in order. The validator is bound to the
    /// field name here; binding happens exactly once.
    pub fn field(mut self, name: &str, validator: FieldValidator) -> Self {
        if self.fields.iter().any(|(declared, _)| declared == name) {
            self.duplicate.get_or_insert_with(|| name.to_string());
            return self;
        }
        self.fields.push((name.to_string(), validator.bind(name)));
        self
    }

    pub fn build(self) -> Result<Arc<Schema>, DuplicateFieldError> {
        match self.duplicate {
            Some(name) => Err(DuplicateFieldError { name }),
            None => Ok(Arc::new(Schema {
                fields: self.fields,
            })),
        }
    }
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            fields: Vec::new(),
            duplicate: None,
        }
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The bound validator for a declared field.
    pub fn validator(&self, name: &str) -> Option<&FieldValidator> {
        self.fields
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, validator)| validator)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(declared, _)| declared == name)
    }

    /// Build a record from one value per declared field, in declared order.
    ///
    /// Fails with `Arity` on a count mismatch, otherwise with the first
    /// failing field's error. Atomic in effect: on failure no record is
    /// observable.
    pub fn construct(
        self: &Arc<Self>,
        values: Vec<FieldValue>,
    ) -> Result<Record, ValidationError> {
        if values.len() != self.fields.len() {
            return Err(ValidationError::Arity {
                expected: self.fields.len(),
                supplied: values.len(),
            });
        }
        let mut validated = Vec::with_capacity(values.len());
        for ((_, validator), value) in self.fields.iter().zip(values) {
            validated.push(validator.check(value)?);
        }
        Ok(Record {
            schema: Arc::clone(self),
            values: validated,
        })
    }

    /// Build a record from a row of raw string fields, as supplied by a
    /// row source. Each field's coercion happens inside its validator.
    pub fn from_row<S: AsRef<str>>(self: &Arc<Self>, row: &[S]) -> Result<Record, ValidationError> {
        self.construct(
            row.iter()
                .map(|cell| FieldValue::Str(cell.as_ref().to_string()))
                .collect(),
        )
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One instance of a schema: a validated value per declared field.
///
/// The record exclusively owns its values; the validators are shared
/// through the schema `Arc`. A record only ever exists in the valid state.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<FieldValue>,
}

impl Record {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Current validated value of a declared field.
    pub fn get(&self, name: &str) -> Result<&FieldValue, ValidationError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| ValidationError::UnknownField {
                name: name.to_string(),
            })?;
        Ok(&self.values[index])
    }

    /// Assign a declared field, routing through its bound validator.
    ///
    /// Validation runs before storage: a failed set leaves the prior
    /// value untouched. A successful call is the only way field state
    /// changes after construction.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| ValidationError::UnknownField {
                name: name.to_string(),
            })?;
        let validated = self.schema.fields[index].1.check(value.into())?;
        self.values[index] = validated;
        Ok(())
    }

    /// Values in declared field order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{
        non_empty_string, positive_float, positive_integer, ValidationErrorKind,
    };

    fn portfolio_schema() -> Arc<Schema> {
        Schema::builder()
            .field("name", non_empty_string())
            .field("shares", positive_integer())
            .field("price", positive_float())
            .build()
            .unwrap()
    }

    #[test]
    fn test_construct_valid_record() {
        let schema = portfolio_schema();
        let record = schema
            .construct(vec![
                FieldValue::from("IBM"),
                FieldValue::Int(50),
                FieldValue::Float(91.1),
            ])
            .unwrap();

        assert_eq!(record.get("name").unwrap(), &FieldValue::from("IBM"));
        assert_eq!(record.get("shares").unwrap(), &FieldValue::Int(50));
        assert_eq!(record.get("price").unwrap(), &FieldValue::Float(91.1));
    }

    #[test]
    fn test_construct_arity_mismatch() {
        let schema = portfolio_schema();
        let err = schema
            .construct(vec![FieldValue::from("IBM"), FieldValue::Int(50)])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Arity {
                expected: 3,
                supplied: 2
            }
        );
    }

    #[test]
    fn test_construct_fails_fast_on_first_bad_field() {
        let schema = portfolio_schema();

        // both shares and price are invalid; shares is declared first
        let err = schema
            .construct(vec![
                FieldValue::from("IBM"),
                FieldValue::Int(-50),
                FieldValue::from("x"),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::NegativeValue);
    }

    #[test]
    fn test_construct_negative_shares_rejected() {
        let schema = portfolio_schema();
        let err = schema
            .construct(vec![
                FieldValue::from("IBM"),
                FieldValue::Int(-50),
                FieldValue::Float(91.1),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::NegativeValue);
    }

    #[test]
    fn test_construct_empty_name_rejected() {
        let schema = portfolio_schema();
        let err = schema
            .construct(vec![
                FieldValue::from(""),
                FieldValue::Int(50),
                FieldValue::Float(91.1),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::EmptyValue);
    }

    #[test]
    fn test_from_row_coerces_raw_strings() {
        let schema = portfolio_schema();
        let record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        assert_eq!(record.get("shares").unwrap(), &FieldValue::Int(50));
        assert_eq!(record.get("price").unwrap(), &FieldValue::Float(91.1));
    }

    #[test]
    fn test_from_row_bad_cell_rejected() {
        let schema = portfolio_schema();
        let err = schema.from_row(&["IBM", "fifty", "91.1"]).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TypeMismatch);
    }

    #[test]
    fn test_set_updates_after_validation() {
        let schema = portfolio_schema();
        let mut record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        // sell 5 shares, then record the new position
        let held = record.get("shares").unwrap().as_int().unwrap();
        record.set("shares", held - 5).unwrap();
        assert_eq!(record.get("shares").unwrap(), &FieldValue::Int(45));
    }

    #[test]
    fn test_failed_set_leaves_prior_value() {
        let schema = portfolio_schema();
        let mut record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        let err = record.set("price", "x").unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TypeMismatch);
        assert_eq!(record.get("price").unwrap(), &FieldValue::Float(91.1));

        let err = record.set("shares", -1).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::NegativeValue);
        assert_eq!(record.get("shares").unwrap(), &FieldValue::Int(50));
    }

    #[test]
    fn test_set_is_idempotent_on_current_value() {
        let schema = portfolio_schema();
        let mut record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        let current = record.get("price").unwrap().clone();
        record.set("price", current.clone()).unwrap();
        assert_eq!(record.get("price").unwrap(), &current);
    }

    #[test]
    fn test_unknown_field_get_and_set() {
        let schema = portfolio_schema();
        let mut record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        let err = record.get("sharez").unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::UnknownField);

        let err = record.set("sharez", 10).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::UnknownField);
    }

    #[test]
    fn test_validators_shared_not_owned() {
        let schema = portfolio_schema();
        let a = schema.from_row(&["IBM", "50", "91.1"]).unwrap();
        let b = schema.from_row(&["AAPL", "100", "187.5"]).unwrap();

        assert!(Arc::ptr_eq(a.schema(), b.schema()));
    }

    #[test]
    fn test_duplicate_field_rejected_at_build_time() {
        let result = Schema::builder()
            .field("name", non_empty_string())
            .field("name", non_empty_string())
            .build();
        assert_eq!(
            result.unwrap_err(),
            DuplicateFieldError {
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn test_schema_accessors() {
        let schema = portfolio_schema();
        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
        assert_eq!(schema.field_names(), vec!["name", "shares", "price"]);
        assert_eq!(schema.validator("shares").unwrap().field_name(), "shares");
        assert!(schema.validator("sharez").is_none());
    }

    #[test]
    fn test_set_accepts_raw_string_with_coercion() {
        let schema = portfolio_schema();
        let mut record = schema.from_row(&["IBM", "50", "91.1"]).unwrap();

        record.set("shares", "45").unwrap();
        assert_eq!(record.get("shares").unwrap(), &FieldValue::Int(45));
    }
}
