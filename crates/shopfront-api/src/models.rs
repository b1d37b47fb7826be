//! Entity models and their request shapes.
//!
//! Each entity comes in three forms:
//! - the full model as returned by the backend (`Category`, `Product`),
//!   with server-assigned `id` and `created_at`;
//! - a draft, the creation payload and page form state (the model minus
//!   the server-assigned fields);
//! - a partial update, where every field is optional and unset fields
//!   are omitted from the PUT body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// Ties an entity model to its draft and partial-update shapes so the
/// service and backend layers can be generic over the entity type.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Creation payload: the entity without server-assigned fields.
    type Draft: Serialize + Send + Sync;
    /// Partial update payload: every field optional.
    type Update: Serialize + Send + Sync;

    /// Short label used in log messages.
    const KIND: &'static str;

    /// Server-assigned identifier, absent on a not-yet-created entity.
    fn id(&self) -> Option<ResourceId>;
}

/// A product category as exchanged with the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Creation payload for a category. Doubles as the empty form via
/// `Default`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

/// Partial update for a category; only set fields reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Category {
    type Draft = CategoryDraft;
    type Update = CategoryUpdate;

    const KIND: &'static str = "category";

    fn id(&self) -> Option<ResourceId> {
        self.id
    }
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

impl From<&Category> for CategoryUpdate {
    fn from(category: &Category) -> Self {
        Self {
            name: Some(category.name.clone()),
            description: Some(category.description.clone()),
        }
    }
}

/// A product as exchanged with the backend.
///
/// `category_id` is a foreign key into the category collection; the
/// client does not enforce referential integrity, an unresolved
/// reference simply renders under a fallback label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Creation payload for a product. Doubles as the empty form via
/// `Default` (price 0.0, category 0 meaning "unset").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: ResourceId,
}

/// Partial update for a product; only set fields reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
}

impl Resource for Product {
    type Draft = ProductDraft;
    type Update = ProductUpdate;

    const KIND: &'static str = "product";

    fn id(&self) -> Option<ResourceId> {
        self.id
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category_id: product.category_id,
        }
    }
}

impl From<&ProductDraft> for ProductUpdate {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: Some(draft.name.clone()),
            description: Some(draft.description.clone()),
            price: Some(draft.price),
            category_id: Some(draft.category_id),
        }
    }
}
