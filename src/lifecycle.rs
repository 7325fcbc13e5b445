//! Form lifecycle
//!
//! Resolves create or edit mode, loads the record being edited, wires the
//! derived revision date and the identifier check, and owns the form's
//! cancellation scope until teardown.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    str::FromStr,
    sync::Arc,
};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::{
    cache::SelectedProductCache,
    config::{ConfigError, FormConfig},
    derived::watch_release_date,
    form::{ErrorKind, Field, ProductForm, messages::error_message},
    navigation::Navigator,
    products::{Product, ProductId},
    scope::CancellationScope,
    store::ProductStore,
    submission::{SubmissionResult, SubmissionState, Submitter},
    uniqueness::UniquenessValidator,
};

/// Message shown when the product to edit cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar producto";

/// Collaborators the form talks to.
#[derive(Clone)]
pub struct FormContext {
    /// Remote record store
    pub store: Arc<dyn ProductStore>,

    /// Last selected product
    pub cache: Arc<dyn SelectedProductCache>,

    /// Router
    pub navigator: Arc<dyn Navigator>,
}

impl Debug for FormContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FormContext").finish_non_exhaustive()
    }
}

/// Whether the form creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// A new product; the identifier is typed by the user and checked for
    /// uniqueness.
    #[default]
    Create,

    /// An existing product; the identifier is frozen.
    Edit {
        /// Identifier of the product being edited
        id: ProductId,
    },
}

/// Drives one product form from mount to teardown.
pub struct ProductFormController {
    form: ProductForm,
    config: FormConfig,
    context: FormContext,
    scope: CancellationScope,
    mode: Mutex<Option<Mode>>,
    message: Mutex<String>,
    submitter: Submitter,
}

impl Debug for ProductFormController {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProductFormController")
            .field("form", &self.form)
            .field("mode", &*self.mode.lock())
            .field("message", &*self.message.lock())
            .field("submitter", &self.submitter)
            .finish_non_exhaustive()
    }
}

impl ProductFormController {
    /// Mount a new, uninitialised form.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is inconsistent.
    pub fn new(context: FormContext, config: FormConfig) -> Result<Self, ConfigError> {
        let form = ProductForm::new(&config)?;

        Ok(Self::with_form(context, config, form))
    }

    /// Mount a controller around an already built form.
    pub fn with_form(context: FormContext, config: FormConfig, form: ProductForm) -> Self {
        let scope = CancellationScope::new();

        let submitter = Submitter::new(
            Arc::clone(&context.store),
            Arc::clone(&context.navigator),
            config.listing_route.clone(),
            scope.clone(),
        );

        Self {
            form,
            config,
            context,
            scope,
            mode: Mutex::new(None),
            message: Mutex::new(String::new()),
            submitter,
        }
    }

    /// Resolve the mode from the identifier in the route, if any, and wire
    /// the form accordingly.
    ///
    /// In edit mode the identifier is frozen and the product is loaded, from
    /// the selected product cache if it holds that product, otherwise with one
    /// fetch. A failed fetch sets [`LOAD_ERROR_MESSAGE`] and schedules a
    /// redirect to the listing. In create mode the identifier uniqueness check
    /// is attached.
    ///
    /// Must be awaited on a Tokio runtime; the identifier checks of the form
    /// run there, whichever thread later writes the identifier. Calling it
    /// again returns the mode resolved the first time.
    pub async fn initialize(&self, external_id: Option<&str>) -> Mode {
        let mode = {
            let mut slot = self.mode.lock();

            if let Some(mode) = slot.as_ref() {
                warn!(?mode, "form already initialised");
                return mode.clone();
            }

            let mode = match external_id.filter(|id| !id.is_empty()) {
                Some(id) => Mode::Edit {
                    id: ProductId::new(id),
                },
                None => Mode::Create,
            };

            *slot = Some(mode.clone());
            mode
        };

        info!(?mode, "initialising product form");

        watch_release_date(&self.form, &self.scope);

        match &mode {
            Mode::Edit { id } => {
                self.form.set_editable(Field::Id, false);
                self.load_for_edit(id).await;
            }
            Mode::Create => match Handle::try_current() {
                Ok(runtime) => UniquenessValidator::new(
                    Arc::clone(&self.context.store),
                    self.config.verify_timeout(),
                    self.scope.clone(),
                    runtime,
                )
                .attach(&self.form),
                Err(source) => warn!(%source, "no Tokio runtime, identifier check disabled"),
            },
        }

        mode
    }

    /// The form being driven.
    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Resolved mode, `None` before [`initialize`](Self::initialize).
    pub fn mode(&self) -> Option<Mode> {
        self.mode.lock().clone()
    }

    /// Message currently shown to the user, empty when there is none.
    pub fn error_message(&self) -> String {
        self.message.lock().clone()
    }

    /// Submission lifecycle state.
    pub fn submission_state(&self) -> SubmissionState {
        self.submitter.state()
    }

    /// Submit the form. See [`Submitter::submit`].
    ///
    /// The visible message is cleared when an attempt starts and replaced by
    /// the failure message, if any.
    pub async fn submit(&self) -> Option<SubmissionResult> {
        if !self.submitter.state().accepts_submit() {
            debug!("submit ignored, submission in progress");
            return None;
        }

        self.set_message("");

        let mode = self.mode().unwrap_or_default();
        let result = self.submitter.submit(&self.form, &mode).await?;

        if let SubmissionResult::Failure { message } = &result {
            self.set_message(message);
        }

        Some(result)
    }

    /// Restore the form: reload the product in edit mode, clear it in create
    /// mode. The visible message is cleared either way.
    pub async fn reset(&self) {
        self.set_message("");

        match self.mode() {
            Some(Mode::Edit { id }) => self.load_for_edit(&id).await,
            Some(Mode::Create) | None => self.form.reset(),
        }
    }

    /// Leave the form for the listing.
    pub fn cancel(&self) {
        self.context.navigator.go_to(&self.config.listing_route);
    }

    /// Message for the errors of the field named `field_name`; empty when the
    /// field has no errors or does not exist.
    pub fn field_error_message(&self, field_name: &str) -> String {
        Field::from_str(field_name)
            .map(|field| error_message(&self.form.errors(field)))
            .unwrap_or_default()
    }

    /// Whether the field named `field_name` should show an error: it has one
    /// (of `kind`, when given) and the user has touched or changed it.
    pub fn has_error(&self, field_name: &str, kind: Option<ErrorKind>) -> bool {
        let Ok(field) = Field::from_str(field_name) else {
            return false;
        };

        self.form.with_control(field, |control| {
            let failing = match kind {
                Some(kind) => control.has_error(kind),
                None => control.is_invalid(),
            };

            failing && (control.is_dirty() || control.is_touched())
        })
    }

    /// End the form's lifetime. Every subscription and pending continuation
    /// stops, and the selected product is forgotten. Idempotent.
    pub fn teardown(&self) {
        if self.scope.signal() {
            info!("product form torn down");
            self.context.cache.clear();
        }
    }

    async fn load_for_edit(&self, id: &ProductId) {
        if let Some(product) = self.context.cache.get() {
            if product.id == *id {
                debug!(%id, "product loaded from selection");
                self.populate(&product);
                return;
            }

            debug!(%id, selected = %product.id, "selected product is a different product");
        }

        let fetched = tokio::select! {
            biased;
            () = self.scope.signalled() => return,
            fetched = self.context.store.get_by_id(id.clone()) => fetched,
        };

        if self.scope.is_signalled() {
            return;
        }

        match fetched {
            Ok(product) => {
                debug!(%id, "product fetched");
                self.populate(&product);
            }
            Err(source) => {
                warn!(%id, %source, "failed to load product");
                self.set_message(LOAD_ERROR_MESSAGE);
                self.schedule_redirect();
            }
        }
    }

    fn populate(&self, product: &Product) {
        let release = product.date_release.to_input().unwrap_or_default();
        let revision = product.date_revision.to_input().unwrap_or_default();

        self.form.patch(Field::Id, product.id.as_str());
        self.form.patch(Field::Name, &product.name);
        self.form.patch(Field::Description, &product.description);
        self.form.patch(Field::Logo, &product.logo);
        self.form.patch(Field::DateRelease, &release);
        self.form.patch(Field::DateRevision, &revision);
        self.form.set_editable(Field::Id, false);
    }

    fn schedule_redirect(&self) {
        let delay = self.config.load_error_redirect_delay();
        let sleep = tokio::time::sleep(delay);
        let scope = self.scope.clone();
        let navigator = Arc::clone(&self.context.navigator);
        let route = self.config.listing_route.clone();

        debug!(?delay, %route, "redirect scheduled");

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = scope.signalled() => debug!("redirect cancelled by teardown"),
                () = sleep => navigator.go_to(&route),
            }
        });
    }

    fn set_message(&self, message: &str) {
        *self.message.lock() = message.to_string();
    }
}
