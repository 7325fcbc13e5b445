//! Navigation.

use mockall::automock;

/// Route changes requested by the form.
#[automock]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`. Fire and forget.
    fn go_to(&self, route: &str);
}
