use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::warn;

use shopfront::{CategoryService, ProductService};
use shopfront_api::{Category, Product, ProductDraft, ProductUpdate, ResourceId, StoreEvent};

/// Label shown when a product's category reference does not resolve
/// in the cached category collection.
const NO_CATEGORY_LABEL: &str = "No category";

/// Controller for the product management page.
///
/// Unlike the category page, the form is a draft plus a separate
/// `editing_id`: the identifier never travels through the form. The
/// page also watches the category service for the cross-entity name
/// lookup.
pub struct ProductsPage {
    products: Arc<ProductService>,
    items: watch::Receiver<Vec<Product>>,
    loading: watch::Receiver<bool>,
    error: watch::Receiver<Option<String>>,
    category_items: watch::Receiver<Vec<Category>>,
    categories_loading: watch::Receiver<bool>,
    events: broadcast::Receiver<StoreEvent>,
    pub form: ProductDraft,
    pub editing_id: Option<ResourceId>,
}

impl ProductsPage {
    pub fn new(products: Arc<ProductService>, categories: &CategoryService) -> Self {
        let items = products.items();
        let loading = products.loading();
        let error = products.error();
        let events = products.subscribe();
        Self {
            products,
            items,
            loading,
            error,
            category_items: categories.items(),
            categories_loading: categories.loading(),
            events,
            form: ProductDraft::default(),
            editing_id: None,
        }
    }

    /// Snapshot of the cached collection, in display order.
    pub fn products(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn categories_loading(&self) -> bool {
        *self.categories_loading.borrow()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Submit the form: update when an entity is being edited, create
    /// otherwise. Free-text fields are sanitized before submission;
    /// the form resets only when the operation succeeds.
    pub async fn save(&mut self) {
        let mut draft = self.form.clone();
        draft.name = sanitize_input(&draft.name);
        draft.description = sanitize_input(&draft.description);

        match self.editing_id {
            Some(id) => {
                let update = ProductUpdate::from(&draft);
                self.products.update(id, update).await;
            }
            None => self.products.add(draft).await,
        }
        self.process_events();
    }

    /// Copy an existing product into the form for editing and drop any
    /// stale error so the page shows the fresh edit state.
    pub fn edit(&mut self, product: &Product) {
        self.editing_id = product.id;
        self.form = ProductDraft::from(product);
        self.products.clear_error();
    }

    /// Delete a product; when it was the one being edited, the form
    /// goes back to drafting.
    pub async fn delete(&mut self, id: ResourceId) {
        self.products.remove(id).await;
        if self.editing_id == Some(id) {
            self.reset_form();
        }
        self.process_events();
    }

    /// Display name for a product's category reference. Referential
    /// integrity is not enforced locally; an unresolved reference
    /// renders under the fallback label.
    pub fn category_name(&self, category_id: ResourceId) -> String {
        self.category_items
            .borrow()
            .iter()
            .find(|c| c.id == Some(category_id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| NO_CATEGORY_LABEL.to_string())
    }

    /// Coerce a select-widget value into the numeric foreign key.
    /// Unparseable input falls back to 0, the unset sentinel of the
    /// empty form.
    pub fn set_category_id(&mut self, raw: &str) {
        self.form.category_id = raw.trim().parse().unwrap_or(0);
    }

    /// Drain pending store events, resetting the form after a
    /// successful create or update. Returns the number of events
    /// handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    handled += 1;
                    if matches!(
                        event,
                        StoreEvent::Created { .. } | StoreEvent::Updated { .. }
                    ) {
                        self.reset_form();
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("[ProductsPage] event stream lagged by {} messages", n);
                }
                Err(_) => break,
            }
        }
        handled
    }

    pub fn reset_form(&mut self) {
        self.editing_id = None;
        self.form = ProductDraft::default();
    }

    /// Re-fetch the product collection wholesale.
    pub async fn refresh(&self) {
        self.products.fetch_all().await;
    }

    /// Clear the shared error state unconditionally.
    pub fn clear_error(&self) {
        self.products.clear_error();
    }
}

/// Strip characters considered unsafe for downstream storage from
/// free-text input: quotes, semicolons and backslashes are dropped,
/// SQL-style comment markers are removed until none remain, whitespace
/// runs collapse to a single space and the result is trimmed.
///
/// Defense-in-depth convenience only; the backend owns real
/// validation.
pub fn sanitize_input(text: &str) -> String {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '\\'))
        .collect();
    while cleaned.contains("--") {
        cleaned = cleaned.replace("--", "");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
