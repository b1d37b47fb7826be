//! The per-entity CRUD service.
//!
//! A `ResourceService` wraps one `ResourceBackend` and one
//! `ResourceStore`. Every operation sets the loading flag, performs a
//! single request, and settles the store from the response. Failures
//! are fully absorbed here: operations return `()`, and callers
//! observe only the published error message and the cleared loading
//! flag.
//!
//! Operations do not serialize against each other. Two overlapping
//! mutations race at the HTTP layer and the one whose response arrives
//! last determines the cache's final state.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error};

use shopfront_api::{Category, Product, Resource, ResourceId, StoreEvent};

use crate::backend::ResourceBackend;
use crate::store::ResourceStore;

/// Category service as wired by the frontend.
pub type CategoryService = ResourceService<Category>;
/// Product service as wired by the frontend.
pub type ProductService = ResourceService<Product>;

pub struct ResourceService<R: Resource> {
    backend: Arc<dyn ResourceBackend<R>>,
    store: ResourceStore<R>,
}

impl<R: Resource> ResourceService<R> {
    /// Create an idle service with an empty cache. Most callers want
    /// [`ResourceService::init`], which also performs the initial
    /// fetch.
    pub fn new(backend: Arc<dyn ResourceBackend<R>>) -> Self {
        Self {
            backend,
            store: ResourceStore::new(),
        }
    }

    /// Create a service and populate its cache with one initial fetch.
    ///
    /// The fetch follows the same error contract as [`fetch_all`]: a
    /// failure leaves the cache empty and publishes a message instead
    /// of propagating.
    ///
    /// [`fetch_all`]: ResourceService::fetch_all
    pub async fn init(backend: Arc<dyn ResourceBackend<R>>) -> Arc<Self> {
        let service = Arc::new(Self::new(backend));
        service.fetch_all().await;
        service
    }

    /// Replace the cached collection wholesale with the server's.
    pub async fn fetch_all(&self) {
        self.store.begin();
        match self.backend.fetch_all().await {
            Ok(items) => {
                debug!("[ResourceService] fetched {} {} item(s)", items.len(), R::KIND);
                self.store.replace_all(items);
            }
            Err(e) => self.record_failure("fetch", e),
        }
    }

    /// Create an entity from a draft and append the server's result.
    pub async fn add(&self, draft: R::Draft) {
        self.store.begin();
        match self.backend.create(&draft).await {
            Ok(created) => {
                debug!(
                    "[ResourceService] created {} id={:?}",
                    R::KIND,
                    created.id()
                );
                self.store.append(created);
            }
            Err(e) => self.record_failure("create", e),
        }
    }

    /// Apply a partial update and replace the cached entity with the
    /// server's result.
    pub async fn update(&self, id: ResourceId, update: R::Update) {
        self.store.begin();
        match self.backend.update(id, &update).await {
            Ok(updated) => {
                debug!("[ResourceService] updated {} id={}", R::KIND, id);
                self.store.replace_item(id, updated);
            }
            Err(e) => self.record_failure("update", e),
        }
    }

    /// Delete an entity and drop it from the cache.
    pub async fn remove(&self, id: ResourceId) {
        self.store.begin();
        match self.backend.delete(id).await {
            Ok(()) => {
                debug!("[ResourceService] deleted {} id={}", R::KIND, id);
                self.store.remove_item(id);
            }
            Err(e) => self.record_failure("delete", e),
        }
    }

    /// Read-only view of the cached collection.
    pub fn items(&self) -> watch::Receiver<Vec<R>> {
        self.store.items()
    }

    /// Read-only view of the in-flight flag.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.store.loading()
    }

    /// Read-only view of the published error message.
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.store.error()
    }

    /// Subscribe to operation outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Clear the error state unconditionally.
    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    fn record_failure(&self, operation: &str, e: shopfront_api::ApiError) {
        let message = e.to_string();
        error!(
            "[ResourceService] {} {} failed: {}",
            R::KIND,
            operation,
            message
        );
        self.store.fail(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use shopfront_api::{ApiError, CategoryDraft, CategoryUpdate, ProductDraft};

    fn draft(name: &str, description: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_populates_cache_from_backend() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        backend.create(&draft("Tools", "Hand tools")).await.unwrap();

        let service = CategoryService::init(backend).await;
        let items = service.items();
        assert_eq!(items.borrow().len(), 1);
        assert!(!*service.loading().borrow());
    }

    #[tokio::test]
    async fn test_add_appends_created_entity_exactly_once() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(backend).await;

        service.add(draft("Tools", "Hand tools")).await;

        let items = service.items();
        let list = items.borrow();
        assert_eq!(list.len(), 1);
        assert!(list[0].id.is_some());
        assert!(list[0].created_at.is_some());
        assert!(!*service.loading().borrow());
    }

    #[tokio::test]
    async fn test_update_replaces_only_the_matching_entity() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(backend).await;
        service.add(draft("Tools", "Hand tools")).await;
        service.add(draft("Garden", "Outdoor")).await;

        let first_id = service.items().borrow()[0].id.unwrap();
        service
            .update(
                first_id,
                CategoryUpdate {
                    name: Some("Tools & Hardware".to_string()),
                    description: None,
                },
            )
            .await;

        let items = service.items();
        let list = items.borrow();
        assert_eq!(list[0].name, "Tools & Hardware");
        assert_eq!(list[0].description, "Hand tools");
        assert_eq!(list[1].name, "Garden");
    }

    #[tokio::test]
    async fn test_remove_filters_the_entity_out() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(backend).await;
        service.add(draft("Tools", "")).await;
        service.add(draft("Garden", "")).await;

        let id = service.items().borrow()[0].id.unwrap();
        service.remove(id).await;

        let items = service.items();
        assert!(items.borrow().iter().all(|c| c.id != Some(id)));
        assert_eq!(items.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_wholesale() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(Arc::clone(&backend) as _).await;
        service.add(draft("Tools", "")).await;

        // The backend gains an entity the cache has never seen.
        backend.insert(Category {
            id: Some(500),
            name: "External".to_string(),
            description: String::new(),
            created_at: None,
        });

        service.fetch_all().await;
        let items = service.items();
        assert_eq!(items.borrow().len(), 2);
        assert!(items.borrow().iter().any(|c| c.id == Some(500)));
    }

    #[tokio::test]
    async fn test_failure_publishes_message_and_keeps_items() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(Arc::clone(&backend) as _).await;
        service.add(draft("Tools", "")).await;
        let before = service.items().borrow().clone();

        backend.fail_next(ApiError::Server {
            status: 500,
            message: "internal error".to_string(),
        });
        service.add(draft("Garden", "")).await;

        let error = service.error().borrow().clone();
        assert_eq!(error.as_deref(), Some("Server error (500): internal error"));
        assert!(!*service.loading().borrow());
        assert_eq!(*service.items().borrow(), before);
    }

    #[tokio::test]
    async fn test_subsequent_success_clears_error() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(Arc::clone(&backend) as _).await;

        backend.fail_next(ApiError::Client {
            message: "network unreachable".to_string(),
        });
        service.fetch_all().await;
        assert!(service.error().borrow().is_some());

        service.fetch_all().await;
        assert!(service.error().borrow().is_none());
    }

    #[tokio::test]
    async fn test_clear_error_is_unconditional() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(Arc::clone(&backend) as _).await;

        backend.fail_next(ApiError::Client {
            message: "offline".to_string(),
        });
        service.fetch_all().await;

        service.clear_error();
        assert!(service.error().borrow().is_none());
    }

    #[tokio::test]
    async fn test_create_then_rename_preserves_description() {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = CategoryService::init(backend).await;

        service.add(draft("Tools", "Hand tools")).await;
        let id = service.items().borrow()[0].id.unwrap();

        service
            .update(
                id,
                CategoryUpdate {
                    name: Some("Tools & Hardware".to_string()),
                    description: None,
                },
            )
            .await;

        let items = service.items();
        let list = items.borrow();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Tools & Hardware");
        assert_eq!(list[0].description, "Hand tools");
    }

    #[tokio::test]
    async fn test_product_service_assigns_ids() {
        let backend = Arc::new(FakeBackend::<Product>::new());
        let service = ProductService::init(backend).await;

        service
            .add(ProductDraft {
                name: "Hammer".to_string(),
                description: String::new(),
                price: 12.5,
                category_id: 1,
            })
            .await;

        let items = service.items();
        let list = items.borrow();
        assert_eq!(list.len(), 1);
        assert!(list[0].id.is_some());
        assert_eq!(list[0].price, 12.5);
    }
}
