//! Shared fixtures for the form scenarios.

#![expect(dead_code, reason = "each test binary uses a different subset")]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use product_form::prelude::*;

pub fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let spawned continuations run to completion.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock, then let woken tasks run.
pub async fn advance(millis: u64) {
    tokio::time::advance(Duration::from_millis(millis)).await;
    settle().await;
}

pub fn product(id: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: "Tarjeta de crédito".to_string(),
        description: "Tarjeta de consumo bajo la modalidad".to_string(),
        logo: "https://example.com/logo.png".to_string(),
        date_release: DateValue::from("2024-01-15"),
        date_revision: DateValue::from("2025-01-15"),
    }
}

pub fn fill_valid(form: &ProductForm, id: &str) {
    form.input(Field::Id, id);
    form.input(Field::Name, "Tarjeta de crédito");
    form.input(Field::Description, "Tarjeta de consumo bajo la modalidad");
    form.input(Field::Logo, "https://example.com/logo.png");
    form.input(Field::DateRelease, "2024-01-15");
}

/// Navigator that remembers every route it was sent to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

/// Record store whose writes wait for [`GatedStore::release`] and whose
/// identifier checks can be made to hang.
#[derive(Debug, Default)]
pub struct GatedStore {
    creates: AtomicUsize,
    updates: AtomicUsize,
    verifies: AtomicUsize,
    gate: Notify,
    hang_verify: bool,
    taken: Vec<String>,
}

impl GatedStore {
    pub fn with_taken_ids(ids: &[&str]) -> Self {
        Self {
            taken: ids.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn hanging_verify() -> Self {
        Self {
            hang_verify: true,
            ..Self::default()
        }
    }

    /// Let one pending write complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for GatedStore {
    async fn get_by_id(&self, _id: ProductId) -> Result<Product, ProductStoreError> {
        Err(ProductStoreError::NotFound)
    }

    async fn verify_id(&self, id: ProductId) -> Result<bool, ProductStoreError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);

        if self.hang_verify {
            std::future::pending::<()>().await;
        }

        Ok(self.taken.iter().any(|taken| taken == id.as_str()))
    }

    async fn create(&self, product: Product) -> Result<Product, ProductStoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        Ok(product)
    }

    async fn update(&self, _id: ProductId, product: Product) -> Result<Product, ProductStoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        Ok(product)
    }
}

pub struct Harness {
    pub controller: Arc<ProductFormController>,
    pub navigator: Arc<RecordingNavigator>,
    pub cache: Arc<InMemorySelectedProduct>,
}

pub fn harness(store: Arc<dyn ProductStore>) -> Result<Harness, ConfigError> {
    init_tracing();

    let navigator = Arc::new(RecordingNavigator::default());
    let cache = Arc::new(InMemorySelectedProduct::new());

    let context = FormContext {
        store,
        cache: Arc::clone(&cache) as Arc<dyn SelectedProductCache>,
        navigator: Arc::clone(&navigator) as Arc<dyn Navigator>,
    };

    Ok(Harness {
        controller: Arc::new(ProductFormController::new(context, FormConfig::default())?),
        navigator,
        cache,
    })
}
