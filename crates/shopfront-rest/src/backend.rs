use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::info;

use shopfront::ResourceBackend;
use shopfront_api::{ApiError, Resource, ResourceId};

use crate::client::RestClient;

/// REST implementation of [`ResourceBackend`] for one entity
/// collection.
///
/// The wire contract, against the collection's base URL:
/// - `GET {base}` reads the whole collection
/// - `POST {base}` creates from a draft and returns the entity
/// - `PUT {base}/{id}` applies a partial update and returns the entity
/// - `DELETE {base}/{id}` deletes; the response body is ignored
pub struct RestBackend<R> {
    client: Arc<RestClient>,
    base_url: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RestBackend<R> {
    pub fn new(client: Arc<RestClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    fn item_url(&self, id: ResourceId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl<R> ResourceBackend<R> for RestBackend<R>
where
    R: Resource + DeserializeOwned,
{
    async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        let url = &self.base_url;
        let response = self
            .client
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| RestClient::transport_error(e, url, "fetch the collection"))?;
        let response = RestClient::handle_response(response, url).await?;
        let items: Vec<R> = response
            .json()
            .await
            .map_err(|e| RestClient::transport_error(e, url, "decode the collection"))?;
        info!("[RestBackend] fetched {} {} item(s)", items.len(), R::KIND);
        Ok(items)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let url = &self.base_url;
        let response = self
            .client
            .request(Method::POST, url)
            .json(draft)
            .send()
            .await
            .map_err(|e| RestClient::transport_error(e, url, "create the entity"))?;
        let response = RestClient::handle_response(response, url).await?;
        response
            .json()
            .await
            .map_err(|e| RestClient::transport_error(e, url, "decode the created entity"))
    }

    async fn update(&self, id: ResourceId, update: &R::Update) -> Result<R, ApiError> {
        let url = self.item_url(id);
        let response = self
            .client
            .request(Method::PUT, &url)
            .json(update)
            .send()
            .await
            .map_err(|e| RestClient::transport_error(e, &url, "update the entity"))?;
        let response = RestClient::handle_response(response, &url).await?;
        response
            .json()
            .await
            .map_err(|e| RestClient::transport_error(e, &url, "decode the updated entity"))
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        let response = self
            .client
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| RestClient::transport_error(e, &url, "delete the entity"))?;
        RestClient::handle_response(response, &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use shopfront_api::Category;

    fn backend(base_url: &str) -> RestBackend<Category> {
        let client = Arc::new(RestClient::new(Duration::from_secs(5)));
        RestBackend::new(client, base_url)
    }

    #[test]
    fn test_item_url_appends_the_id() {
        let backend = backend("http://localhost:3000/api/categories");
        assert_eq!(
            backend.item_url(7),
            "http://localhost:3000/api/categories/7"
        );
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let backend = backend("http://localhost:3000/api/categories/");
        assert_eq!(backend.base_url, "http://localhost:3000/api/categories");
        assert_eq!(
            backend.item_url(7),
            "http://localhost:3000/api/categories/7"
        );
    }
}
