//! Record store.
//!
//! The remote home of product records. The form only consumes this interface;
//! transports live elsewhere.

pub mod errors;

use async_trait::async_trait;
use mockall::automock;

use crate::products::{Product, ProductId};

pub use errors::ProductStoreError;

/// Remote record store for products.
#[automock]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Retrieve a single product.
    async fn get_by_id(&self, id: ProductId) -> Result<Product, ProductStoreError>;

    /// Whether a product with the given id already exists.
    async fn verify_id(&self, id: ProductId) -> Result<bool, ProductStoreError>;

    /// Creates a new product.
    async fn create(&self, product: Product) -> Result<Product, ProductStoreError>;

    /// Replaces the product stored under `id`.
    async fn update(&self, id: ProductId, product: Product)
    -> Result<Product, ProductStoreError>;
}
