//! Form validation.
//!
//! A [`Form`] wraps a submitted field -> values payload together with an
//! accumulator of per-field error messages. Checks are declarative and
//! independent: each records its own message and none short-circuits the
//! others, so a single field can carry several messages. Templates display
//! the first message recorded for a field.
//!
//! Purely in-memory; no I/O.

use std::collections::HashMap;

use serde::Serialize;

/// Per-field validation error messages, in the order they were recorded.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// First message recorded for a field, or "" if the field is clean.
    pub fn get(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// True iff no field has any recorded message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A submitted form payload plus its accumulated validation errors.
///
/// Created fresh per request. On validation failure it is re-embedded into
/// the template data so the form redisplays with prior input and messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Form {
    /// Submitted field -> values mapping (multi-value).
    pub values: HashMap<String, Vec<String>>,
    /// Validation errors recorded so far.
    pub errors: FormErrors,
}

impl Form {
    /// Wrap a decoded urlencoded payload.
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in pairs {
            values.entry(key).or_default().push(value);
        }
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    /// First submitted value for a field, or "" if absent.
    pub fn get(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(|vs| vs.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Record an error for every named field whose trimmed value is empty.
    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if self.get(field).trim().is_empty() {
                self.errors.add(field, "This field cannot be blank");
            }
        }
    }

    /// Record an error if the field's value exceeds `max` Unicode code
    /// points. Empty values are skipped; blankness is `required`'s job.
    pub fn max_length(&mut self, field: &str, max: usize) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if value.chars().count() > max {
            self.errors.add(
                field,
                format!("This field is too long (max is {max} characters)"),
            );
        }
    }

    /// Record an error if the field's value is not exactly one of the
    /// permitted options. Empty values are skipped.
    pub fn permitted_values(&mut self, field: &str, options: &[&str]) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if !options.contains(&value) {
            self.errors.add(field, "This field is invalid");
        }
    }

    /// True iff no check has recorded an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
