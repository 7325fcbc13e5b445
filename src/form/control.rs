//! Form control

use crate::form::{
    errors::{ErrorKind, FieldErrors, ValidationError},
    validators::Validator,
};

/// One field of the form: its value, validation state and interaction flags.
///
/// A control the user may not edit keeps its value in the submitted payload:
/// a frozen identifier is still sent.
#[derive(Debug, Clone)]
pub struct FormControl {
    value: String,
    validators: Vec<Validator>,
    errors: FieldErrors,
    async_error: Option<ValidationError>,
    pending: bool,
    generation: u64,
    touched: bool,
    dirty: bool,
    editable: bool,
}

impl FormControl {
    /// Create an empty, editable control.
    pub fn new(validators: Vec<Validator>) -> Self {
        let mut control = Self {
            value: String::new(),
            validators,
            errors: FieldErrors::new(),
            async_error: None,
            pending: false,
            generation: 0,
            touched: false,
            dirty: false,
            editable: true,
        };

        control.run_validators();

        control
    }

    /// Current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Active errors, synchronous first.
    pub fn errors(&self) -> FieldErrors {
        let mut errors = self.errors.clone();
        errors.extend(self.async_error.clone());
        errors
    }

    /// Whether an error of `kind` is active.
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors
            .iter()
            .chain(self.async_error.as_ref())
            .any(|error| error.kind() == kind)
    }

    /// No active errors. A pending control is not valid.
    pub fn is_valid(&self) -> bool {
        !self.pending && self.errors.is_empty() && self.async_error.is_none()
    }

    /// Whether any error is active.
    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty() || self.async_error.is_some()
    }

    /// Whether the synchronous validators pass.
    pub fn is_sync_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether an asynchronous check is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the user has left the field or a submit was attempted.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether the user has changed the value.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the user may change the value.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub(crate) fn set_value(&mut self, value: &str, user_edit: bool) {
        value.clone_into(&mut self.value);

        if user_edit {
            self.dirty = true;
        }

        self.async_error = None;
        self.pending = false;
        self.generation += 1;
        self.run_validators();
    }

    pub(crate) fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub(crate) fn mark_touched(&mut self) {
        self.touched = true;
    }

    pub(crate) fn reset(&mut self) {
        self.set_value("", false);
        self.touched = false;
        self.dirty = false;
    }

    /// Start an asynchronous check of the current value. Returns the token
    /// the result must present to be applied.
    pub(crate) fn begin_async_check(&mut self) -> u64 {
        self.pending = true;
        self.generation
    }

    /// Apply an asynchronous result. Returns `false`, leaving the control
    /// untouched, when the value changed since the check began.
    pub(crate) fn resolve_async_check(
        &mut self,
        generation: u64,
        error: Option<ValidationError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        self.pending = false;
        self.async_error = error;

        true
    }

    fn run_validators(&mut self) {
        let value = &self.value;

        self.errors = self
            .validators
            .iter()
            .filter_map(|validator| validator.validate(value))
            .collect();
    }
}
