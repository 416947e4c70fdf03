//! Store customers.

use async_trait::async_trait;
use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{Customer, CustomerInput, ListQuery, Page};

use super::{CrudResource, Resource};
use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct CustomersApi {
    resource: Resource,
}

impl CustomersApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/customers", "customers"),
        }
    }
}

#[async_trait]
impl CrudResource for CustomersApi {
    type Item = Customer;
    type Input = CustomerInput;

    async fn list(&self, query: ListQuery) -> Result<Page<Customer>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Customer> {
        self.resource.get(id).await
    }

    async fn create(&self, input: CustomerInput) -> Result<Customer> {
        self.resource.create(&input).await
    }

    async fn update(&self, id: u64, input: CustomerInput) -> Result<Customer> {
        self.resource.update(id, &input).await
    }

    async fn delete(&self, id: u64) -> Result<Value> {
        self.resource.delete(id).await
    }
}
