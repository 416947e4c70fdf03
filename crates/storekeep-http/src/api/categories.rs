//! Product categories.

use async_trait::async_trait;
use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{Category, CategoryInput, ListQuery, Page};

use super::{CrudResource, Resource};
use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct CategoriesApi {
    resource: Resource,
}

impl CategoriesApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/products/categories", "categories"),
        }
    }
}

#[async_trait]
impl CrudResource for CategoriesApi {
    type Item = Category;
    type Input = CategoryInput;

    async fn list(&self, query: ListQuery) -> Result<Page<Category>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Category> {
        self.resource.get(id).await
    }

    async fn create(&self, input: CategoryInput) -> Result<Category> {
        self.resource.create(&input.sanitized()).await
    }

    async fn update(&self, id: u64, input: CategoryInput) -> Result<Category> {
        self.resource.update(id, &input.sanitized()).await
    }

    async fn delete(&self, id: u64) -> Result<Value> {
        self.resource.delete(id).await
    }
}
