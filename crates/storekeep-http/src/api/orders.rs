//! Orders. The dashboard reads and updates them but never creates or
//! deletes them.

use async_trait::async_trait;
use serde_json::Value;

use storekeep_core::resources::{ListQuery, Order, OrderUpdate, Page};
use storekeep_core::{Error, Result};

use super::{CrudResource, Resource};
use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct OrdersApi {
    resource: Resource,
}

impl OrdersApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/orders", "orders"),
        }
    }
}

#[async_trait]
impl CrudResource for OrdersApi {
    type Item = Order;
    type Input = OrderUpdate;

    async fn list(&self, query: ListQuery) -> Result<Page<Order>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Order> {
        self.resource.get(id).await
    }

    async fn create(&self, _input: OrderUpdate) -> Result<Order> {
        Err(Error::Unsupported {
            operation: "create order".to_string(),
        })
    }

    async fn update(&self, id: u64, input: OrderUpdate) -> Result<Order> {
        self.resource.update(id, &input).await
    }

    async fn delete(&self, _id: u64) -> Result<Value> {
        Err(Error::Unsupported {
            operation: "delete order".to_string(),
        })
    }
}
