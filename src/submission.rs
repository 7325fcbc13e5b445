//! Submission
//!
//! Single-flight submission of the product form to the record store.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    form::ProductForm,
    lifecycle::Mode,
    navigation::Navigator,
    scope::CancellationScope,
    store::ProductStore,
};

/// Message for a submit attempted on an invalid form.
pub const FORM_INVALID_MESSAGE: &str = "Formulario inválido";

/// Message for a failed save whose error carries no message of its own.
pub const SAVE_ERROR_MESSAGE: &str = "Error al guardar producto";

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Ready to submit.
    #[default]
    Idle,

    /// A create or update is in flight.
    Submitting,

    /// The product was saved. Terminal.
    Succeeded,

    /// The last attempt failed. A new attempt may start.
    Failed,
}

impl SubmissionState {
    /// Whether a new submit may start from this state.
    pub fn accepts_submit(self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed)
    }
}

/// Outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The product was saved.
    Success,

    /// Nothing was saved.
    Failure {
        /// Message for the user
        message: String,
    },
}

/// Submission state machine: `Idle → Submitting → {Succeeded, Failed}`, with
/// `Failed` accepting a new attempt.
#[derive(Clone)]
pub struct Submitter {
    state: Arc<Mutex<SubmissionState>>,
    store: Arc<dyn ProductStore>,
    navigator: Arc<dyn Navigator>,
    listing_route: String,
    scope: CancellationScope,
}

impl Debug for Submitter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Submitter")
            .field("state", &*self.state.lock())
            .field("listing_route", &self.listing_route)
            .finish_non_exhaustive()
    }
}

impl Submitter {
    /// Create an idle submitter.
    pub fn new(
        store: Arc<dyn ProductStore>,
        navigator: Arc<dyn Navigator>,
        listing_route: impl Into<String>,
        scope: CancellationScope,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
            store,
            navigator,
            listing_route: listing_route.into(),
            scope,
        }
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        *self.state.lock()
    }

    /// Validate, serialize and save the form.
    ///
    /// Returns `None` without doing anything when a submission is already in
    /// flight or has already succeeded, and when the form is torn down before
    /// the store answers. An invalid form fails immediately, with every field
    /// marked touched and no call to the store. On success the user is sent to
    /// the listing.
    pub async fn submit(&self, form: &ProductForm, mode: &Mode) -> Option<SubmissionResult> {
        if self.scope.is_signalled() {
            return None;
        }

        if !form.is_valid() {
            if !self.transition_from_ready(SubmissionState::Failed) {
                debug!("submit ignored, submission in progress");
                return None;
            }

            form.mark_all_as_touched();
            debug!("submit rejected, form invalid");

            return Some(SubmissionResult::Failure {
                message: FORM_INVALID_MESSAGE.to_string(),
            });
        }

        if !self.transition_from_ready(SubmissionState::Submitting) {
            debug!("submit ignored, submission in progress");
            return None;
        }

        let product = form.raw_value();

        info!(id = %product.id, ?mode, "submitting product");

        let saved = match mode {
            Mode::Create => self.store.create(product).await,
            Mode::Edit { id } => self.store.update(id.clone(), product).await,
        };

        if self.scope.is_signalled() {
            debug!("form torn down, submission result dropped");
            return None;
        }

        match saved {
            Ok(product) => {
                *self.state.lock() = SubmissionState::Succeeded;
                info!(id = %product.id, "product saved");

                self.navigator.go_to(&self.listing_route);

                Some(SubmissionResult::Success)
            }
            Err(source) => {
                *self.state.lock() = SubmissionState::Failed;
                warn!(%source, "failed to save product");

                Some(SubmissionResult::Failure {
                    message: source
                        .message()
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| SAVE_ERROR_MESSAGE.to_string()),
                })
            }
        }
    }

    fn transition_from_ready(&self, next: SubmissionState) -> bool {
        let mut state = self.state.lock();

        if !state.accepts_submit() {
            return false;
        }

        *state = next;

        true
    }
}
