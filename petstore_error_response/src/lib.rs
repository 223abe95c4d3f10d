#![deny(missing_docs)]
//! Plain json error bodies shared by the petstore http adapters.

use std::collections::BTreeMap;

/// A plain old json error response for use with axum.
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct ErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
}

/// Error response for rejected input, one message per offending field
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    /// Message to explain failure
    pub message: String,
    /// field name -> reason
    pub errors: BTreeMap<String, String>,
}

impl From<FieldErrors> for ValidationErrorResponse {
    fn from(errors: FieldErrors) -> Self {
        ValidationErrorResponse {
            message: "Validation failed".to_string(),
            errors: errors.0,
        }
    }
}

/// Collects every field violation of a payload instead of stopping at the first one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Records `field is required` when the value is empty or only whitespace
    pub fn require_non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{field} is required"));
        }
    }

    /// The message recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// true when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// number of offending fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Ok when no violation was recorded, otherwise the collected errors
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
