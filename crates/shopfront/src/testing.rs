//! In-memory fake backend for service and page tests.
//!
//! The fake plays the server's role: it assigns ids, stamps
//! `created_at`, merges partial updates, and can be told to fail the
//! next request to exercise the error path. No HTTP is involved.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use shopfront_api::{
    ApiError, Category, CategoryDraft, CategoryUpdate, Product, ProductDraft, ProductUpdate,
    Resource, ResourceId,
};

use crate::backend::ResourceBackend;

/// Server-side behavior the fake needs per entity type: how to build
/// an entity from a draft and how to merge a partial update.
pub trait FakeMaterialize: Resource {
    fn materialize(draft: &Self::Draft, id: ResourceId) -> Self;
    fn merge(&self, update: &Self::Update) -> Self;
}

impl FakeMaterialize for Category {
    fn materialize(draft: &CategoryDraft, id: ResourceId) -> Self {
        Category {
            id: Some(id),
            name: draft.name.clone(),
            description: draft.description.clone(),
            created_at: Some(Utc::now()),
        }
    }

    fn merge(&self, update: &CategoryUpdate) -> Self {
        let mut merged = self.clone();
        if let Some(name) = &update.name {
            merged.name = name.clone();
        }
        if let Some(description) = &update.description {
            merged.description = description.clone();
        }
        merged
    }
}

impl FakeMaterialize for Product {
    fn materialize(draft: &ProductDraft, id: ResourceId) -> Self {
        Product {
            id: Some(id),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            category_id: draft.category_id,
            created_at: Some(Utc::now()),
        }
    }

    fn merge(&self, update: &ProductUpdate) -> Self {
        let mut merged = self.clone();
        if let Some(name) = &update.name {
            merged.name = name.clone();
        }
        if let Some(description) = &update.description {
            merged.description = description.clone();
        }
        if let Some(price) = update.price {
            merged.price = price;
        }
        if let Some(category_id) = update.category_id {
            merged.category_id = category_id;
        }
        merged
    }
}

pub struct FakeBackend<R> {
    items: Mutex<Vec<R>>,
    next_id: AtomicI64,
    fail_next: Mutex<Option<ApiError>>,
}

impl<R: FakeMaterialize> FakeBackend<R> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_next: Mutex::new(None),
        }
    }

    /// Put an entity into the fake's collection directly, simulating a
    /// change made by another client.
    pub fn insert(&self, item: R) {
        self.items.lock().unwrap().push(item);
    }

    /// Make the next request fail with the given error. One-shot.
    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.fail_next.lock().unwrap().take()
    }

    fn not_found(id: ResourceId) -> ApiError {
        ApiError::Server {
            status: 404,
            message: format!("{} {} not found", R::KIND, id),
        }
    }
}

impl<R: FakeMaterialize> Default for FakeBackend<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: FakeMaterialize> ResourceBackend<R> for FakeBackend<R> {
    async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = R::materialize(draft, id);
        self.items.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: ResourceId, update: &R::Update) -> Result<R, ApiError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|r| r.id() == Some(id)) {
            Some(slot) => {
                let merged = slot.merge(update);
                *slot = merged.clone();
                Ok(merged)
            }
            None => Err(Self::not_found(id)),
        }
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ApiError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|r| r.id() != Some(id));
        if items.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
