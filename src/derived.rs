//! Derived revision date
//!
//! Keeps `date_revision` one year after `date_release`.

use tracing::debug;

use crate::{
    calendar::{add_years, format_date_for_input, parse_date},
    form::{Field, ProductForm},
    scope::CancellationScope,
};

/// Revision date for a release date, or `None` if the release date is empty
/// or not a date.
pub fn revision_date_for(release: &str) -> Option<String> {
    parse_date(release)
        .and_then(|date| add_years(date, 1))
        .map(format_date_for_input)
}

/// Recompute the revision date on every release date change until `scope`
/// completes.
///
/// The write is silent and does not mark the revision dirty. An empty or
/// unparsable release date leaves the previous revision date in place.
pub fn watch_release_date(form: &ProductForm, scope: &CancellationScope) {
    let guard = scope.clone();

    form.subscribe(Field::DateRelease, scope, move |form, release| {
        if guard.is_signalled() {
            return;
        }

        let Some(revision) = revision_date_for(release) else {
            debug!(release, "release date not usable, revision kept");
            return;
        };

        form.patch_silently(Field::DateRevision, &revision);
    });
}
