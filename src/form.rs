//! Product form
//!
//! Working copy of a product plus per-field validation state. Writes notify
//! field listeners synchronously, in subscription order; each listener is
//! bound to a [`CancellationScope`] and is dropped once its scope completes.

pub mod control;
pub mod errors;
pub mod fields;
pub mod messages;
pub mod validators;

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::{Zoned, civil::Date};
use parking_lot::Mutex;
use tracing::trace;

use crate::{
    calendar::DateValue,
    config::{ConfigError, FormConfig},
    derived::revision_date_for,
    products::{Product, ProductId},
    scope::CancellationScope,
};

pub use control::FormControl;
pub use errors::{ErrorKind, FieldErrors, ValidationError};
pub use fields::{Field, UnknownField};
pub use validators::Validator;

type Listener = Arc<dyn Fn(&ProductForm, &str) + Send + Sync>;

struct Subscription {
    field: Field,
    scope: CancellationScope,
    listener: Listener,
}

#[derive(Debug)]
struct Controls {
    id: FormControl,
    name: FormControl,
    description: FormControl,
    logo: FormControl,
    date_release: FormControl,
    date_revision: FormControl,
}

impl Controls {
    fn get(&self, field: Field) -> &FormControl {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Logo => &self.logo,
            Field::DateRelease => &self.date_release,
            Field::DateRevision => &self.date_revision,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut FormControl {
        match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::Logo => &mut self.logo,
            Field::DateRelease => &mut self.date_release,
            Field::DateRevision => &mut self.date_revision,
        }
    }

    fn value(&self, field: Field) -> String {
        self.get(field).value().to_string()
    }

    /// The revision date holds the value derived from the release date.
    fn dates_consistent(&self) -> bool {
        let release = self.get(Field::DateRelease).value();
        let revision = self.get(Field::DateRevision).value();

        revision_date_for(release).is_some_and(|derived| derived == revision)
    }
}

/// Shared handle to a product form. Clones refer to the same form.
#[derive(Clone)]
pub struct ProductForm {
    controls: Arc<Mutex<Controls>>,
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl Debug for ProductForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProductForm")
            .field("controls", &*self.controls.lock())
            .field("subscriptions", &self.subscriptions.lock().len())
            .finish()
    }
}

impl ProductForm {
    /// Build an empty form with the validators described by `config`.
    ///
    /// The revision date starts out read-only: it is only ever derived.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the logo pattern does not compile or a
    /// length range is empty.
    pub fn new(config: &FormConfig) -> Result<Self, ConfigError> {
        Self::with_today(config, Zoned::now().date())
    }

    /// Build an empty form, using `today` as the earliest release date when
    /// that rule is enabled.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the logo pattern does not compile or a
    /// length range is empty.
    pub fn with_today(config: &FormConfig, today: Date) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut release = vec![Validator::Required, Validator::Date];
        if config.enforce_min_release_date {
            release.push(Validator::MinDate(today));
        }

        let mut date_revision = FormControl::new(vec![Validator::Required]);
        date_revision.set_editable(false);

        let controls = Controls {
            id: FormControl::new(vec![
                Validator::Required,
                Validator::MinLength(config.id_length.min),
                Validator::MaxLength(config.id_length.max),
            ]),
            name: FormControl::new(vec![
                Validator::Required,
                Validator::MinLength(config.name_length.min),
                Validator::MaxLength(config.name_length.max),
            ]),
            description: FormControl::new(vec![
                Validator::Required,
                Validator::MinLength(config.description_length.min),
                Validator::MaxLength(config.description_length.max),
            ]),
            logo: FormControl::new(vec![
                Validator::Required,
                Validator::pattern(&config.logo_pattern)?,
            ]),
            date_release: FormControl::new(release),
            date_revision,
        };

        Ok(Self {
            controls: Arc::new(Mutex::new(controls)),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Inspect a control.
    pub fn with_control<R>(&self, field: Field, f: impl FnOnce(&FormControl) -> R) -> R {
        f(self.controls.lock().get(field))
    }

    /// Current value of `field`.
    pub fn value(&self, field: Field) -> String {
        self.with_control(field, |control| control.value().to_string())
    }

    /// Active errors of `field`.
    pub fn errors(&self, field: Field) -> FieldErrors {
        self.with_control(field, FormControl::errors)
    }

    /// Listen to value changes of `field` until `scope` completes.
    pub fn subscribe(
        &self,
        field: Field,
        scope: &CancellationScope,
        listener: impl Fn(&ProductForm, &str) + Send + Sync + 'static,
    ) {
        self.subscriptions.lock().push(Subscription {
            field,
            scope: scope.clone(),
            listener: Arc::new(listener),
        });
    }

    /// Write a value typed by the user. Marks the field dirty.
    pub fn input(&self, field: Field, value: &str) {
        self.controls.lock().get_mut(field).set_value(value, true);
        self.notify(field, value);
    }

    /// Write a value programmatically. Listeners are notified; the field is
    /// not marked dirty.
    pub fn patch(&self, field: Field, value: &str) {
        self.controls.lock().get_mut(field).set_value(value, false);
        self.notify(field, value);
    }

    /// Write a value without notifying listeners or marking the field dirty.
    pub fn patch_silently(&self, field: Field, value: &str) {
        self.controls.lock().get_mut(field).set_value(value, false);
    }

    /// Allow or forbid user edits of `field`. The value is still submitted.
    pub fn set_editable(&self, field: Field, editable: bool) {
        self.controls.lock().get_mut(field).set_editable(editable);
    }

    /// Mark a single field touched.
    pub fn mark_touched(&self, field: Field) {
        self.controls.lock().get_mut(field).mark_touched();
    }

    /// Mark every field touched so that its errors become visible.
    pub fn mark_all_as_touched(&self) {
        let mut controls = self.controls.lock();

        for field in Field::ALL {
            controls.get_mut(field).mark_touched();
        }
    }

    /// Whether every user-editable field is valid, no check is pending and
    /// the revision date is the one derived from the release date.
    ///
    /// Read-only fields are not validated on their own, as their values are
    /// not the user's to fix.
    pub fn is_valid(&self) -> bool {
        let controls = self.controls.lock();

        Field::ALL
            .into_iter()
            .map(|field| controls.get(field))
            .filter(|control| control.is_editable())
            .all(FormControl::is_valid)
            && controls.dates_consistent()
    }

    /// Whether any field has an asynchronous check in flight.
    pub fn is_pending(&self) -> bool {
        let controls = self.controls.lock();

        Field::ALL
            .into_iter()
            .any(|field| controls.get(field).is_pending())
    }

    /// Every field, editable or not, as a product. Dates are taken verbatim.
    pub fn raw_value(&self) -> Product {
        let controls = self.controls.lock();

        Product {
            id: ProductId::new(controls.value(Field::Id)),
            name: controls.value(Field::Name),
            description: controls.value(Field::Description),
            logo: controls.value(Field::Logo),
            date_release: DateValue::Text(controls.value(Field::DateRelease)),
            date_revision: DateValue::Text(controls.value(Field::DateRevision)),
        }
    }

    /// Clear every value and flag. Listeners see the cleared values.
    pub fn reset(&self) {
        {
            let mut controls = self.controls.lock();

            for field in Field::ALL {
                controls.get_mut(field).reset();
            }
        }

        for field in Field::ALL {
            self.notify(field, "");
        }
    }

    pub(crate) fn begin_async_check(&self, field: Field) -> u64 {
        self.controls.lock().get_mut(field).begin_async_check()
    }

    pub(crate) fn resolve_async_check(
        &self,
        field: Field,
        generation: u64,
        error: Option<ValidationError>,
    ) -> bool {
        self.controls
            .lock()
            .get_mut(field)
            .resolve_async_check(generation, error)
    }

    fn notify(&self, field: Field, value: &str) {
        let listeners: Vec<Listener> = {
            let mut subscriptions = self.subscriptions.lock();

            subscriptions.retain(|subscription| !subscription.scope.is_signalled());

            subscriptions
                .iter()
                .filter(|subscription| subscription.field == field)
                .map(|subscription| Arc::clone(&subscription.listener))
                .collect()
        };

        trace!(%field, listeners = listeners.len(), "field changed");

        for listener in listeners {
            listener(self, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn form() -> Result<ProductForm, ConfigError> {
        ProductForm::new(&FormConfig::default())
    }

    fn fill_valid(form: &ProductForm) {
        form.input(Field::Id, "trj-crd");
        form.input(Field::Name, "Tarjeta de crédito");
        form.input(Field::Description, "Tarjeta de consumo bajo la modalidad");
        form.input(Field::Logo, "https://example.com/logo.png");
        form.input(Field::DateRelease, "2024-01-15");
        form.patch_silently(Field::DateRevision, "2025-01-15");
    }

    #[test]
    fn empty_form_is_invalid() -> TestResult {
        let form = form()?;

        assert!(!form.is_valid());
        assert!(form.with_control(Field::Name, |c| c.has_error(ErrorKind::Required)));

        Ok(())
    }

    #[test]
    fn filled_form_is_valid() -> TestResult {
        let form = form()?;

        fill_valid(&form);

        assert!(form.is_valid());

        Ok(())
    }

    #[test]
    fn read_only_fields_do_not_affect_validity() -> TestResult {
        let form = form()?;
        fill_valid(&form);

        form.set_editable(Field::Id, false);
        form.patch(Field::Id, "");

        assert!(form.is_valid());
        assert!(!form.with_control(Field::DateRevision, FormControl::is_editable));

        Ok(())
    }

    #[test]
    fn release_date_must_be_a_usable_date() -> TestResult {
        let form = form()?;
        fill_valid(&form);

        for release in ["15/01/2024", "9999-06-01"] {
            form.input(Field::DateRelease, release);

            assert!(
                form.with_control(Field::DateRelease, |c| c.has_error(ErrorKind::InvalidDate)),
                "{release} should be flagged"
            );
            assert!(!form.is_valid(), "{release} should invalidate the form");
        }

        Ok(())
    }

    #[test]
    fn revision_out_of_step_with_release_blocks_validity() -> TestResult {
        let form = form()?;
        fill_valid(&form);

        form.patch_silently(Field::DateRevision, "2026-01-15");
        assert!(!form.is_valid());

        form.patch_silently(Field::DateRevision, "2025-01-15");
        assert!(form.is_valid());

        Ok(())
    }

    #[test]
    fn pending_check_blocks_validity() -> TestResult {
        let form = form()?;
        fill_valid(&form);

        form.begin_async_check(Field::Id);

        assert!(form.is_pending());
        assert!(!form.is_valid());

        Ok(())
    }

    #[test]
    fn raw_value_includes_read_only_identifier() -> TestResult {
        let form = form()?;
        fill_valid(&form);
        form.set_editable(Field::Id, false);

        let product = form.raw_value();

        assert_eq!(product.id, ProductId::from("trj-crd"));
        assert_eq!(product.date_release, DateValue::from("2024-01-15"));
        assert_eq!(product.date_revision, DateValue::from("2025-01-15"));

        Ok(())
    }

    #[test]
    fn listeners_fire_in_subscription_order() -> TestResult {
        let form = form()?;
        let scope = CancellationScope::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            form.subscribe(Field::Name, &scope, move |_, value| {
                seen.lock().push(format!("{tag}:{value}"));
            });
        }

        form.input(Field::Name, "Producto");

        assert_eq!(*seen.lock(), ["first:Producto", "second:Producto"]);

        Ok(())
    }

    #[test]
    fn silent_patch_and_signalled_scope_do_not_notify() -> TestResult {
        let form = form()?;
        let scope = CancellationScope::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        form.subscribe(Field::Name, &scope, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        form.patch_silently(Field::Name, "Producto");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        form.patch(Field::Name, "Producto");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        scope.signal();
        form.input(Field::Name, "Otro producto");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[test]
    fn min_release_date_rule_is_opt_in() -> TestResult {
        let today = date(2025, 6, 1);
        let strict = FormConfig {
            enforce_min_release_date: true,
            ..FormConfig::default()
        };

        let relaxed_form = ProductForm::with_today(&FormConfig::default(), today)?;
        relaxed_form.input(Field::DateRelease, "2020-01-01");
        assert!(relaxed_form.errors(Field::DateRelease).is_empty());

        let strict_form = ProductForm::with_today(&strict, today)?;
        strict_form.input(Field::DateRelease, "2020-01-01");
        assert_eq!(
            strict_form.errors(Field::DateRelease).as_slice(),
            [ValidationError::MinDate { min: today }]
        );

        Ok(())
    }

    #[test]
    fn reset_clears_values_and_flags() -> TestResult {
        let form = form()?;
        fill_valid(&form);
        form.mark_all_as_touched();

        form.reset();

        for field in Field::ALL {
            assert_eq!(form.value(field), "", "{field} should be empty");
            assert!(
                !form.with_control(field, FormControl::is_touched),
                "{field} should be untouched"
            );
        }

        Ok(())
    }
}
