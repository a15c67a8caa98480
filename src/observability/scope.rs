//! ObservationScope for automatic begin/outcome logging

use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that logs when an operation begins and how it ended
///
/// # Usage
///
/// ```ignore
/// let scope = ObservationScope::with_fields("ITEM_READ", &[("id", "7")]);
/// // ... do work ...
/// scope.complete(); // logs ITEM_READ_COMPLETE
/// ```
///
/// # Behavior
///
/// - `{name}_BEGIN` on creation (INFO)
/// - `{name}_COMPLETE` from `complete()` (INFO)
/// - `{name}_REJECTED` from `reject()` (WARN)
/// - `{name}_FAILED` from `fail()` (ERROR)
/// - `{name}_INCOMPLETE` on drop without an outcome (WARN), e.g. when the
///   client disconnects and the request future is dropped
///
/// Every outcome line carries the begin fields, anything added with
/// [`record`](ObservationScope::record), and `elapsed_ms`.
pub struct ObservationScope<'a> {
    name: &'a str,
    finished: bool,
    fields: Vec<(&'a str, String)>,
    started: Instant,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope with fields repeated on every line
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            finished: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as successfully completed with additional fields
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.finish(Severity::Info, "COMPLETE", extra_fields);
    }

    /// Mark the scope as refused because of the caller's input
    pub fn reject(mut self, reason: &str) {
        self.finish(Severity::Warn, "REJECTED", &[("reason", reason)]);
    }

    /// Mark the scope as failed
    pub fn fail(mut self, reason: &str) {
        self.finish(Severity::Error, "FAILED", &[("reason", reason)]);
    }

    /// Attach a field to the outcome line, e.g. an id learned mid-operation
    pub fn record(&mut self, key: &'a str, value: impl Into<String>) {
        self.fields.push((key, value.into()));
    }

    #[cfg(test)]
    pub(crate) fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if an outcome has been logged
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self, severity: Severity, outcome: &str, extra_fields: &[(&str, &str)]) {
        self.finished = true;
        let event = format!("{}_{}", self.name, outcome);
        let elapsed = self.started.elapsed().as_millis().to_string();

        let mut all_fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", &elapsed));

        Logger::log(severity, &event, &all_fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.finish(Severity::Warn, "INCOMPLETE", &[]);
        }
    }
}
