//! Products and their variations.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::instrument;

use storekeep_core::Result;
use storekeep_core::resources::{
    Extra, ListQuery, Page, Product, ProductInput, ProductQuery, Variation,
};

use super::{CrudResource, Resource};
use crate::client::ApiClient;

const PRODUCTS: &str = "/products";

/// `/products`. Text fields are sanitised on create and update.
#[derive(Debug, Clone)]
pub struct ProductsApi {
    resource: Resource,
}

impl ProductsApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            resource: Resource::new(client, PRODUCTS, "products"),
        }
    }

    /// List with the dashboard's default filters applied.
    pub async fn search(&self, query: ProductQuery) -> Result<Page<Product>> {
        self.list(query.into()).await
    }

    /// Raw batch call: `{create: [...], update: [...], delete: [...]}`.
    pub async fn batch(&self, operations: &Value) -> Result<Value> {
        self.resource
            .client
            .post(&format!("{}/batch", PRODUCTS), operations)
            .await?
            .value()
    }

    /// Delete several products in one batch call.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn bulk_delete(&self, ids: &[u64]) -> Result<Value> {
        self.batch(&json!({ "delete": ids })).await
    }

    /// Ask the backend to re-sync one product from the store.
    pub async fn sync(&self, id: u64) -> Result<Value> {
        let client = &self.resource.client;
        client
            .execute(client.request(Method::POST, &format!("{}/{}/sync", PRODUCTS, id))?)
            .await?
            .value()
    }

    /// Variations of one product.
    pub fn variations(&self, product_id: u64) -> VariationsApi {
        VariationsApi {
            resource: Resource::new(
                &self.resource.client,
                format!("{}/{}/variations", PRODUCTS, product_id),
                "variations",
            ),
        }
    }
}

#[async_trait]
impl CrudResource for ProductsApi {
    type Item = Product;
    type Input = ProductInput;

    async fn list(&self, query: ListQuery) -> Result<Page<Product>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Product> {
        self.resource.get(id).await
    }

    async fn create(&self, input: ProductInput) -> Result<Product> {
        self.resource.create(&input.sanitized()).await
    }

    async fn update(&self, id: u64, input: ProductInput) -> Result<Product> {
        self.resource.update(id, &input.sanitized()).await
    }

    async fn delete(&self, id: u64) -> Result<Value> {
        self.resource.delete(id).await
    }
}

/// `/products/{id}/variations`. Variations are edited as attribute maps.
#[derive(Debug, Clone)]
pub struct VariationsApi {
    resource: Resource,
}

#[async_trait]
impl CrudResource for VariationsApi {
    type Item = Variation;
    type Input = Extra;

    async fn list(&self, query: ListQuery) -> Result<Page<Variation>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Variation> {
        self.resource.get(id).await
    }

    async fn create(&self, input: Extra) -> Result<Variation> {
        self.resource.create(&input).await
    }

    async fn update(&self, id: u64, input: Extra) -> Result<Variation> {
        self.resource.update(id, &input).await
    }

    async fn delete(&self, id: u64) -> Result<Value> {
        self.resource.delete(id).await
    }
}
