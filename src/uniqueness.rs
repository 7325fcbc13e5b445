//! Identifier uniqueness check
//!
//! Asks the record store whether the typed identifier is taken. Only attached
//! to forms creating a new product.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use tokio::{runtime::Handle, time::timeout};
use tracing::{debug, warn};

use crate::{
    form::{Field, ProductForm, ValidationError},
    products::ProductId,
    scope::CancellationScope,
    store::ProductStore,
};

/// Asynchronous validator for the identifier field.
///
/// Checks run on the runtime given at construction, so identifier writes may
/// come from any thread.
#[derive(Clone)]
pub struct UniquenessValidator {
    store: Arc<dyn ProductStore>,
    timeout: Duration,
    scope: CancellationScope,
    runtime: Handle,
}

impl Debug for UniquenessValidator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UniquenessValidator")
            .field("timeout", &self.timeout)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl UniquenessValidator {
    /// Create a validator whose checks run on `runtime` and give up after
    /// `timeout`.
    pub fn new(
        store: Arc<dyn ProductStore>,
        timeout: Duration,
        scope: CancellationScope,
        runtime: Handle,
    ) -> Self {
        Self {
            store,
            timeout,
            scope,
            runtime,
        }
    }

    /// Check the identifier on every change, starting with its current value.
    pub fn attach(self, form: &ProductForm) {
        let scope = self.scope.clone();
        let current = form.value(Field::Id);

        self.check(form, &current);

        form.subscribe(Field::Id, &scope, move |form, value| self.check(form, value));
    }

    /// Issue one check for `value`.
    ///
    /// Nothing is sent while the synchronous validators fail. Results that
    /// arrive after the value changed again are discarded. A failed or timed
    /// out query leaves the identifier valid.
    pub fn check(&self, form: &ProductForm, value: &str) {
        if self.scope.is_signalled() {
            return;
        }

        if !form.with_control(Field::Id, |control| control.is_sync_valid()) {
            return;
        }

        let generation = form.begin_async_check(Field::Id);
        let id = ProductId::new(value);

        debug!(%id, generation, "checking identifier");

        let store = Arc::clone(&self.store);
        let scope = self.scope.clone();
        let limit = self.timeout;
        let form = form.clone();

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = scope.signalled() => return,
                outcome = timeout(limit, store.verify_id(id.clone())) => outcome,
            };

            let error = match outcome {
                Ok(Ok(true)) => Some(ValidationError::IdExists),
                Ok(Ok(false)) => None,
                Ok(Err(source)) => {
                    warn!(%id, %source, "identifier check failed");
                    None
                }
                Err(_elapsed) => {
                    warn!(%id, timeout = ?limit, "identifier check timed out");
                    None
                }
            };

            if scope.is_signalled() {
                return;
            }

            if form.resolve_async_check(Field::Id, generation, error) {
                debug!(%id, generation, "identifier check resolved");
            } else {
                debug!(%id, generation, "discarded stale identifier check");
            }
        });
    }
}
