use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::warn;

use shopfront::CategoryService;
use shopfront_api::{Category, CategoryDraft, CategoryUpdate, ResourceId, StoreEvent};

/// Controller for the category management page.
///
/// The form is a full `Category`: when it carries an identifier the
/// form is editing an existing entity, otherwise it drafts a new one.
pub struct CategoriesPage {
    service: Arc<CategoryService>,
    items: watch::Receiver<Vec<Category>>,
    loading: watch::Receiver<bool>,
    error: watch::Receiver<Option<String>>,
    events: broadcast::Receiver<StoreEvent>,
    pub form: Category,
}

impl CategoriesPage {
    pub fn new(service: Arc<CategoryService>) -> Self {
        let items = service.items();
        let loading = service.loading();
        let error = service.error();
        let events = service.subscribe();
        Self {
            service,
            items,
            loading,
            error,
            events,
            form: Category::default(),
        }
    }

    /// Snapshot of the cached collection, in display order.
    pub fn categories(&self) -> Vec<Category> {
        self.items.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Submit the form: update when it carries an identifier, create
    /// otherwise. The form resets only when the operation succeeds, so
    /// a failure preserves in-progress edits.
    pub async fn save(&mut self) {
        match self.form.id {
            Some(id) => {
                let update = CategoryUpdate::from(&self.form);
                self.service.update(id, update).await;
            }
            None => {
                let draft = CategoryDraft::from(&self.form);
                self.service.add(draft).await;
            }
        }
        self.process_events();
    }

    /// Copy an existing category into the form for editing and drop
    /// any stale error so the page shows the fresh edit state.
    pub fn edit(&mut self, category: &Category) {
        self.form = category.clone();
        self.service.clear_error();
    }

    /// Delete a category; when it was the one being edited, the form
    /// goes back to drafting.
    pub async fn delete(&mut self, id: ResourceId) {
        self.service.remove(id).await;
        if self.form.id == Some(id) {
            self.reset_form();
        }
        self.process_events();
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
                    warn!("[CategoriesPage] event stream lagged by {} messages", n);
                }
                Err(_) => break,
            }
        }
        handled
    }

    pub fn reset_form(&mut self) {
        self.form = Category::default();
    }

    /// Re-fetch the collection wholesale.
    pub async fn refresh(&self) {
        self.service.fetch_all().await;
    }

    /// Clear the shared error state unconditionally.
    pub fn clear_error(&self) {
        self.service.clear_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront::testing::FakeBackend;
    use shopfront::ResourceService;
    use shopfront_api::ApiError;

    async fn page() -> (CategoriesPage, Arc<FakeBackend<Category>>) {
        let backend = Arc::new(FakeBackend::<Category>::new());
        let service = ResourceService::init(Arc::clone(&backend) as _).await;
        (CategoriesPage::new(service), backend)
    }

    #[tokio::test]
    async fn test_save_creates_and_resets_the_form() {
        let (mut page, _backend) = page().await;
        page.form.name = "Tools".to_string();
        page.form.description = "Hand tools".to_string();

        page.save().await;

        let categories = page.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Tools");
        assert!(categories[0].id.is_some());
        assert_eq!(page.form, Category::default());
    }

    #[tokio::test]
    async fn test_save_with_identifier_updates() {
        let (mut page, _backend) = page().await;
        page.form.name = "Tools".to_string();
        page.save().await;

        let existing = page.categories()[0].clone();
        page.edit(&existing);
        page.form.name = "Tools & Hardware".to_string();
        page.save().await;

        let categories = page.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Tools & Hardware");
        assert_eq!(page.form, Category::default());
    }

    #[tokio::test]
    async fn test_failed_save_preserves_the_form() {
        let (mut page, backend) = page().await;
        page.form.name = "Tools".to_string();

        backend.fail_next(ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        page.save().await;

        assert_eq!(page.form.name, "Tools");
        assert_eq!(
            page.error_message().as_deref(),
            Some("Server error (500): boom")
        );
        assert!(page.categories().is_empty());
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn test_edit_clears_a_stale_error() {
        let (mut page, backend) = page().await;
        page.form.name = "Tools".to_string();
        page.save().await;

        backend.fail_next(ApiError::Client {
            message: "offline".to_string(),
        });
        page.form.name = "Garden".to_string();
        page.save().await;
        assert!(page.error_message().is_some());

        let existing = page.categories()[0].clone();
        page.edit(&existing);
        assert!(page.error_message().is_none());
        assert_eq!(page.form.name, "Tools");
    }

    #[tokio::test]
    async fn test_delete_resets_form_only_when_editing_the_victim() {
        let (mut page, _backend) = page().await;
        page.form.name = "Tools".to_string();
        page.save().await;
        page.form.name = "Garden".to_string();
        page.save().await;

        let categories = page.categories();
        let tools = categories[0].clone();
        let garden = categories[1].clone();

        page.edit(&tools);
        page.delete(garden.id.unwrap()).await;
        assert_eq!(page.form.name, "Tools");

        page.delete(tools.id.unwrap()).await;
        assert_eq!(page.form, Category::default());
        assert!(page.categories().is_empty());
    }
}
