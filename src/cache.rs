//! Selected product cache.
//!
//! Holds the product the user last navigated to, so an edit form can be
//! populated without a round trip.

use mockall::automock;
use parking_lot::RwLock;

use crate::products::Product;

/// Cache of the product the user last selected.
#[automock]
pub trait SelectedProductCache: Send + Sync {
    /// The last selected product, if any.
    fn get(&self) -> Option<Product>;

    /// Forget the selected product.
    fn clear(&self);
}

/// Process-wide cache backed by a lock.
#[derive(Debug, Default)]
pub struct InMemorySelectedProduct {
    selected: RwLock<Option<Product>>,
}

impl InMemorySelectedProduct {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `product` as the current selection.
    pub fn select(&self, product: Product) {
        *self.selected.write() = Some(product);
    }
}

impl SelectedProductCache for InMemorySelectedProduct {
    fn get(&self) -> Option<Product> {
        self.selected.read().clone()
    }

    fn clear(&self) {
        self.selected.write().take();
    }
}
